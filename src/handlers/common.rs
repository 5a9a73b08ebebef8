use std::collections::BTreeSet;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::repositories::{DocumentListQuery, DocumentSortColumn, ListDirection};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct DocumentListParams {
    #[param(default = 20, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
    #[param(default = 0, minimum = 0)]
    pub offset: Option<i64>,
    /// fileName, title, version, format, uploadedAt, lastModifiedAt, uploadedBy, teamId or projectId
    #[param(default = "uploadedAt")]
    pub order_by: Option<String>,
    /// ASC or DESC
    #[param(default = "DESC")]
    pub order_direction: Option<String>,
}

impl DocumentListParams {
    /// Apply defaults and fall back on anything outside the allow-lists
    pub fn to_query(&self) -> DocumentListQuery {
        DocumentListQuery {
            limit: self.limit.unwrap_or(20).clamp(1, 100) as u64,
            offset: self.offset.unwrap_or(0).max(0) as u64,
            order_by: DocumentSortColumn::parse(self.order_by.as_deref()),
            direction: ListDirection::parse(self.order_direction.as_deref()),
        }
    }
}

/// Split a comma separated query value into a set, dropping blanks
pub fn split_list(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim and drop empty strings from optional text
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let query = DocumentListParams::default().to_query();
        assert_eq!(query, DocumentListQuery::default());
    }

    #[test]
    fn test_list_params_clamp_and_fallback() {
        let params = DocumentListParams {
            limit: Some(0),
            offset: Some(-5),
            order_by: Some("uploadedAt DESC; --".to_string()),
            order_direction: Some("random".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.limit, 1);
        assert_eq!(query.offset, 0);
        assert_eq!(query.order_by, DocumentSortColumn::UploadedAt);
        assert_eq!(query.direction, ListDirection::Desc);

        let params = DocumentListParams {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(params.to_query().limit, 100);
    }

    #[test]
    fn test_split_list() {
        let set = split_list(Some("GET, POST,,GET "));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["GET", "POST"]);
        assert!(split_list(None).is_empty());
    }
}
