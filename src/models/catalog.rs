use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a cataloged API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Active,
    Development,
    Deprecated,
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStatus::Active => "active",
            ApiStatus::Development => "development",
            ApiStatus::Deprecated => "deprecated",
        }
    }

    /// Sort weight; higher sorts later in ascending order
    pub fn priority(&self) -> u8 {
        match self {
            ApiStatus::Active => 3,
            ApiStatus::Development => 2,
            ApiStatus::Deprecated => 1,
        }
    }
}

impl FromStr for ApiStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ApiStatus::Active),
            "development" => Ok(ApiStatus::Development),
            "deprecated" => Ok(ApiStatus::Deprecated),
            _ => Err(()),
        }
    }
}

/// One API endpoint record as shown in the catalog.
///
/// Snapshots are built from backend records per request and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub method: Option<String>,
    pub endpoint: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub status: Option<ApiStatus>,
}

impl ApiEntry {
    /// Status with the `active` default applied
    pub fn effective_status(&self) -> ApiStatus {
        self.status.unwrap_or(ApiStatus::Active)
    }

    /// Field value as a string, missing fields read as ""
    pub fn field(&self, field: CatalogField) -> &str {
        match field {
            CatalogField::Name => self.name.as_deref().unwrap_or_default(),
            CatalogField::Method => self.method.as_deref().unwrap_or_default(),
            CatalogField::Endpoint => self.endpoint.as_deref().unwrap_or_default(),
            CatalogField::Category => self.category.as_deref().unwrap_or_default(),
            CatalogField::Owner => self.owner.as_deref().unwrap_or_default(),
            CatalogField::Status => self.status.map(|s| s.as_str()).unwrap_or_default(),
        }
    }
}

/// Sortable and facetable catalog columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogField {
    #[default]
    Name,
    Method,
    Endpoint,
    Category,
    Owner,
    Status,
}

impl FromStr for CatalogField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(CatalogField::Name),
            "method" => Ok(CatalogField::Method),
            "endpoint" => Ok(CatalogField::Endpoint),
            "category" => Ok(CatalogField::Category),
            "owner" => Ok(CatalogField::Owner),
            "status" => Ok(CatalogField::Status),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortConfig {
    pub field: CatalogField,
    pub direction: SortDirection,
}

/// Allow-lists per dimension; an empty set leaves that dimension unrestricted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub status: BTreeSet<String>,
    pub method: BTreeSet<String>,
    pub category: BTreeSet<String>,
    pub owner: BTreeSet<String>,
}
