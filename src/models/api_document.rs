use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_VERSION_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

/// Kind of API specification stored in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    OpenapiJson,
    OpenapiYaml,
    PostmanCollection,
    Other,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::OpenapiJson => "openapi-json",
            DocumentFormat::OpenapiYaml => "openapi-yaml",
            DocumentFormat::PostmanCollection => "postman-collection",
            DocumentFormat::Other => "other",
        }
    }

    /// Media type used when the file name gives no hint
    pub fn media_type(&self) -> &'static str {
        match self {
            DocumentFormat::OpenapiJson | DocumentFormat::PostmanCollection => "application/json",
            DocumentFormat::OpenapiYaml => "application/x-yaml",
            DocumentFormat::Other => "application/octet-stream",
        }
    }

    /// Best guess from the file name and leading bytes of an upload
    pub fn detect(file_name: &str, content: &[u8]) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            return DocumentFormat::OpenapiYaml;
        }
        if lower.ends_with(".json") {
            let head = String::from_utf8_lossy(&content[..content.len().min(4096)]);
            if head.contains("_postman_id") || head.contains("schema.getpostman.com") {
                return DocumentFormat::PostmanCollection;
            }
            return DocumentFormat::OpenapiJson;
        }
        DocumentFormat::Other
    }
}

impl FromStr for DocumentFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "openapi-json" => Ok(DocumentFormat::OpenapiJson),
            "openapi-yaml" => Ok(DocumentFormat::OpenapiYaml),
            "postman-collection" => Ok(DocumentFormat::PostmanCollection),
            "other" => Ok(DocumentFormat::Other),
            _ => Err(()),
        }
    }
}

/// Stored metadata of an uploaded API specification document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    pub id: String,
    pub file_name: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub format: DocumentFormat,
    pub storage_path: String,
    pub uploaded_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub uploaded_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub last_modified_at: Option<OffsetDateTime>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Upload-shaped input for a new document
#[derive(Debug, Clone, Default)]
pub struct NewApiDocument {
    pub file_name: String,
    pub content: Vec<u8>,
    pub title: Option<String>,
    pub version: Option<String>,
    /// Raw format field as submitted; detected from the file when absent
    pub format: Option<String>,
    pub uploaded_by: Option<String>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl NewApiDocument {
    /// Collect every violation instead of stopping at the first one
    pub fn validate(&self, max_bytes: usize) -> Vec<String> {
        let mut errors = Vec::new();

        if self.file_name.trim().is_empty() {
            errors.push("fileName is required".to_string());
        } else if self.file_name.contains(['/', '\\']) || self.file_name.contains("..") {
            errors.push("fileName must not contain path separators".to_string());
        }

        if self.content.is_empty() {
            errors.push("file must not be empty".to_string());
        } else if self.content.len() > max_bytes {
            errors.push(format!("file exceeds the maximum size of {} bytes", max_bytes));
        }

        if let Some(format) = &self.format {
            if DocumentFormat::from_str(format).is_err() {
                errors.push(format!(
                    "format must be one of openapi-json, openapi-yaml, postman-collection, other (got '{}')",
                    format
                ));
            }
        }

        if self.title.as_ref().is_some_and(|t| t.chars().count() > MAX_TITLE_LEN) {
            errors.push(format!("title must be at most {} characters", MAX_TITLE_LEN));
        }
        if self.version.as_ref().is_some_and(|v| v.chars().count() > MAX_VERSION_LEN) {
            errors.push(format!("version must be at most {} characters", MAX_VERSION_LEN));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            errors.push(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            ));
        }

        if self.tags.len() > MAX_TAGS {
            errors.push(format!("at most {} tags are allowed", MAX_TAGS));
        }
        for tag in &self.tags {
            if tag.trim().is_empty() {
                errors.push("tags must not be empty".to_string());
            } else if tag.chars().count() > MAX_TAG_LEN {
                errors.push(format!("tag '{}' exceeds {} characters", tag, MAX_TAG_LEN));
            }
        }

        // JSON documents must at least parse
        if errors.is_empty() && self.resolved_format().media_type() == "application/json" {
            if let Err(e) = serde_json::from_slice::<serde_json::Value>(&self.content) {
                errors.push(format!("file is not valid JSON: {}", e));
            }
        }

        errors
    }

    /// Submitted format, or the detected one
    pub fn resolved_format(&self) -> DocumentFormat {
        self.format
            .as_deref()
            .and_then(|f| DocumentFormat::from_str(f).ok())
            .unwrap_or_else(|| DocumentFormat::detect(&self.file_name, &self.content))
    }
}
