use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;
use crate::handlers::common::split_list;
use crate::middlewares::BackendToken;
use crate::models::{ApiEntry, CatalogField, Company, FilterConfig, SortConfig};
use crate::services::backend::{fetch_api_entries, fetch_companies};
use crate::services::CatalogService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CatalogParams {
    /// Restrict to one company's endpoints
    pub company: Option<String>,
    /// Case-insensitive text matched against name, endpoint, category, owner and method
    pub search: Option<String>,
    /// Comma separated allow-list of statuses
    pub status: Option<String>,
    /// Comma separated allow-list of HTTP methods
    pub method: Option<String>,
    /// Comma separated allow-list of categories
    pub category: Option<String>,
    /// Comma separated allow-list of owners
    pub owner: Option<String>,
    /// name, method, endpoint, category, owner or status
    #[param(default = "name")]
    pub sort: Option<String>,
    /// asc or desc
    #[param(default = "asc")]
    pub direction: Option<String>,
}

impl CatalogParams {
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            status: split_list(self.status.as_deref())
                .into_iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            method: split_list(self.method.as_deref()),
            category: split_list(self.category.as_deref()),
            owner: split_list(self.owner.as_deref()),
        }
    }

    /// Unknown sort fields or directions fall back to the defaults
    pub fn sort_config(&self) -> SortConfig {
        SortConfig {
            field: self
                .sort
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            direction: self
                .direction
                .as_deref()
                .and_then(|d| d.parse().ok())
                .unwrap_or_default(),
        }
    }
}

/// Option lists for each filter dimension, taken from the unfiltered set
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogFacets {
    pub status: Vec<String>,
    pub method: Vec<String>,
    pub category: Vec<String>,
    pub owner: Vec<String>,
}

impl CatalogFacets {
    fn from_entries(entries: &[ApiEntry]) -> Self {
        Self {
            status: CatalogService::unique_values(entries, CatalogField::Status),
            method: CatalogService::unique_values(entries, CatalogField::Method),
            category: CatalogService::unique_values(entries, CatalogField::Category),
            owner: CatalogService::unique_values(entries, CatalogField::Owner),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub data: Vec<ApiEntry>,
    pub total: usize,
    pub facets: CatalogFacets,
    pub sort: SortConfig,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyListResponse {
    pub data: Vec<Company>,
    pub total: usize,
}

// ============ Handlers ============

/// Search, filter and sort the caller's API catalog
#[utoipa::path(
    get,
    path = "/api/catalog/apis",
    params(CatalogParams),
    responses(
        (status = 200, description = "Filtered and sorted catalog", body = CatalogResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend failure")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Catalog"
)]
pub async fn list_catalog(
    token: BackendToken,
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<CatalogResponse>> {
    let entries = fetch_api_entries(
        state.backend.as_ref(),
        token.as_str(),
        params.company.as_deref(),
    )
    .await?;

    let facets = CatalogFacets::from_entries(&entries);
    let sort = params.sort_config();
    let filtered = CatalogService::filter(
        &entries,
        &params.filter_config(),
        params.search.as_deref().unwrap_or_default(),
    );
    let data = CatalogService::sort(&filtered, &sort);

    Ok(Json(CatalogResponse {
        total: data.len(),
        data,
        facets,
        sort,
    }))
}

/// List the caller's companies
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Companies", body = CompanyListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend failure")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Catalog"
)]
pub async fn list_companies(
    token: BackendToken,
    State(state): State<AppState>,
) -> AppResult<Json<CompanyListResponse>> {
    let companies = fetch_companies(state.backend.as_ref(), token.as_str()).await?;

    Ok(Json(CompanyListResponse {
        total: companies.len(),
        data: companies,
    }))
}
