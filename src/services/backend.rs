use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ApiEntry, ApiStatus, AuthSession, BackendUser, Company};

pub const ENDPOINTS_COLLECTION: &str = "endpoints";
pub const COMPANIES_COLLECTION: &str = "companies";
const USERS_COLLECTION: &str = "users";
const PAGE_SIZE: u32 = 200;
const MAX_PAGES: u32 = 50;

/// Listing options understood by the backend's record API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Backend filter expression, e.g. `company = "abc"`
    pub filter: Option<String>,
    /// Comma separated fields, `-` prefix for descending
    pub sort: Option<String>,
}

/// Hosted backend-as-a-service: authentication and generic record listing
#[async_trait]
pub trait Backend: Send + Sync {
    /// Password login against the users collection
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// All records of a collection visible to the token holder
    async fn list_records(
        &self,
        collection: &str,
        query: &RecordQuery,
        token: &str,
    ) -> AppResult<Vec<Value>>;
}

/// Equality filter with the value quoted for the backend's filter syntax
pub fn eq_filter(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{} = \"{}\"", field, escaped)
}

/// HTTP client for a PocketBase-style REST backend
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    page: u32,
    #[serde(rename = "totalPages")]
    total_pages: u32,
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    record: Value,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn collection_url(&self, collection: &str, action: &str) -> AppResult<String> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(AppError::Validation(format!(
                "Invalid collection name '{}'",
                collection
            )));
        }
        Ok(format!(
            "{}/api/collections/{}/{}",
            self.base_url, collection, action
        ))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let url = self.collection_url(USERS_COLLECTION, "auth-with-password")?;
        let response = self
            .client
            .post(&url)
            .json(&json!({ "identity": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AppError::InvalidCredentials);
            }
            status => {
                return Err(AppError::Upstream(format!(
                    "backend login returned {}",
                    status
                )));
            }
        }

        let body: AuthResponse = response.json().await?;
        Ok(AuthSession {
            token: body.token,
            user: coerce_user(&body.record)?,
        })
    }

    async fn list_records(
        &self,
        collection: &str,
        query: &RecordQuery,
        token: &str,
    ) -> AppResult<Vec<Value>> {
        let url = self.collection_url(collection, "records")?;
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let mut params = vec![
                ("page", page.to_string()),
                ("perPage", PAGE_SIZE.to_string()),
            ];
            if let Some(filter) = &query.filter {
                params.push(("filter", filter.clone()));
            }
            if let Some(sort) = &query.sort {
                params.push(("sort", sort.clone()));
            }

            let response = self
                .client
                .get(&url)
                .header("Authorization", token)
                .query(&params)
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => {}
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(AppError::Unauthorized);
                }
                status => {
                    return Err(AppError::Upstream(format!(
                        "backend listing of {} returned {}",
                        collection, status
                    )));
                }
            }

            let body: RecordPage = response.json().await?;
            records.extend(body.items);

            match next_page(page, body.page, body.total_pages) {
                PageStep::Next(next) => page = next,
                PageStep::Done => break,
                PageStep::Capped => {
                    tracing::warn!(
                        "Stopped listing {} after {} of {} pages; remaining records are omitted",
                        collection,
                        page,
                        body.total_pages
                    );
                    break;
                }
            }
        }

        tracing::debug!("Fetched {} {} records", records.len(), collection);
        Ok(records)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PageStep {
    Next(u32),
    Done,
    /// Pages remain but the cap is reached
    Capped,
}

fn next_page(requested: u32, returned: u32, total_pages: u32) -> PageStep {
    if returned >= total_pages {
        PageStep::Done
    } else if requested >= MAX_PAGES {
        PageStep::Capped
    } else {
        PageStep::Next(requested + 1)
    }
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a backend endpoint record; non-object records yield `None`
pub fn coerce_api_entry(record: &Value) -> Option<ApiEntry> {
    if !record.is_object() {
        return None;
    }

    let status = string_field(record, "status").and_then(|raw| {
        raw.parse::<ApiStatus>()
            .map_err(|_| tracing::debug!("Unrecognized API status '{}'", raw))
            .ok()
    });

    Some(ApiEntry {
        id: string_field(record, "id"),
        name: string_field(record, "name"),
        method: string_field(record, "method"),
        endpoint: string_field(record, "endpoint").or_else(|| string_field(record, "path")),
        category: string_field(record, "category"),
        owner: string_field(record, "owner"),
        status,
    })
}

/// Companies need at least an id and a name
pub fn coerce_company(record: &Value) -> Option<Company> {
    Some(Company {
        id: string_field(record, "id")?,
        name: string_field(record, "name")?,
        description: string_field(record, "description"),
        industry: string_field(record, "industry"),
        created: string_field(record, "created"),
    })
}

pub fn coerce_user(record: &Value) -> AppResult<BackendUser> {
    let id = string_field(record, "id")
        .ok_or_else(|| AppError::Upstream("backend user record has no id".to_string()))?;

    Ok(BackendUser {
        id,
        email: string_field(record, "email"),
        name: string_field(record, "name"),
    })
}

/// Endpoint records for the caller, optionally scoped to one company
pub async fn fetch_api_entries(
    backend: &dyn Backend,
    token: &str,
    company: Option<&str>,
) -> AppResult<Vec<ApiEntry>> {
    let query = RecordQuery {
        filter: company.map(|c| eq_filter("company", c)),
        sort: None,
    };
    let records = backend
        .list_records(ENDPOINTS_COLLECTION, &query, token)
        .await?;

    let total = records.len();
    let entries: Vec<ApiEntry> = records.iter().filter_map(coerce_api_entry).collect();
    if entries.len() < total {
        tracing::warn!(
            "Skipped {} malformed endpoint record(s)",
            total - entries.len()
        );
    }
    Ok(entries)
}

pub async fn fetch_companies(backend: &dyn Backend, token: &str) -> AppResult<Vec<Company>> {
    let query = RecordQuery {
        filter: None,
        sort: Some("name".to_string()),
    };
    let records = backend
        .list_records(COMPANIES_COLLECTION, &query, token)
        .await?;

    let total = records.len();
    let companies: Vec<Company> = records.iter().filter_map(coerce_company).collect();
    if companies.len() < total {
        tracing::warn!(
            "Skipped {} malformed company record(s)",
            total - companies.len()
        );
    }
    Ok(companies)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::routing::get;
    use axum::{Json, Router};

    #[test]
    fn test_next_page() {
        assert_eq!(next_page(1, 1, 3), PageStep::Next(2));
        assert_eq!(next_page(3, 3, 3), PageStep::Done);
        assert_eq!(next_page(1, 1, 0), PageStep::Done);
        assert_eq!(next_page(MAX_PAGES, MAX_PAGES, MAX_PAGES), PageStep::Done);
        assert_eq!(next_page(MAX_PAGES, MAX_PAGES, MAX_PAGES + 10), PageStep::Capped);
    }

    #[derive(Deserialize)]
    struct PageParams {
        page: u32,
    }

    async fn endless_pages(
        State(hits): State<Arc<AtomicU32>>,
        Query(params): Query<PageParams>,
    ) -> Json<Value> {
        hits.fetch_add(1, Ordering::SeqCst);
        Json(json!({
            "page": params.page,
            "totalPages": MAX_PAGES + 10,
            "items": [{"id": format!("r{}", params.page)}]
        }))
    }

    #[tokio::test]
    async fn test_list_records_stops_at_page_cap() {
        let hits = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route("/api/collections/endpoints/records", get(endless_pages))
            .with_state(hits.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let backend =
            HttpBackend::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        let records = backend
            .list_records("endpoints", &RecordQuery::default(), "token")
            .await
            .unwrap();

        assert_eq!(records.len(), MAX_PAGES as usize);
        assert_eq!(hits.load(Ordering::SeqCst), MAX_PAGES);
        assert_eq!(records.last().unwrap()["id"], json!(format!("r{}", MAX_PAGES)));
    }

    #[test]
    fn test_eq_filter_escapes_quotes() {
        assert_eq!(eq_filter("company", "abc"), r#"company = "abc""#);
        assert_eq!(
            eq_filter("company", r#"x" || id != ""#),
            r#"company = "x\" || id != \"""#
        );
    }

    #[test]
    fn test_coerce_api_entry_types_fields() {
        let record = json!({
            "id": "r1",
            "name": "List users",
            "method": "GET",
            "path": "/users",
            "category": 42,
            "owner": "  ",
            "status": "Deprecated"
        });

        let entry = coerce_api_entry(&record).unwrap();
        assert_eq!(entry.id.as_deref(), Some("r1"));
        assert_eq!(entry.endpoint.as_deref(), Some("/users"));
        assert_eq!(entry.category, None);
        assert_eq!(entry.owner, None);
        assert_eq!(entry.status, Some(ApiStatus::Deprecated));
    }

    #[test]
    fn test_coerce_api_entry_unknown_status_is_absent() {
        let entry = coerce_api_entry(&json!({ "name": "x", "status": "retired" })).unwrap();
        assert_eq!(entry.status, None);
        assert_eq!(entry.effective_status(), ApiStatus::Active);
    }

    #[test]
    fn test_coerce_rejects_non_objects() {
        assert!(coerce_api_entry(&json!("endpoint")).is_none());
        assert!(coerce_api_entry(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_coerce_company_requires_id_and_name() {
        assert!(coerce_company(&json!({ "id": "c1" })).is_none());
        let company = coerce_company(&json!({ "id": "c1", "name": "Acme" })).unwrap();
        assert_eq!(company.name, "Acme");
        assert_eq!(company.industry, None);
    }

    #[test]
    fn test_coerce_user_requires_id() {
        assert!(matches!(
            coerce_user(&json!({ "email": "a@b.c" })),
            Err(AppError::Upstream(_))
        ));
        let user = coerce_user(&json!({ "id": "u1", "email": "a@b.c" })).unwrap();
        assert_eq!(user.id, "u1");
    }

    #[test]
    fn test_collection_name_is_validated() {
        let backend = HttpBackend::new("http://localhost:8090/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.collection_url("endpoints", "records").unwrap(),
            "http://localhost:8090/api/collections/endpoints/records"
        );
        assert!(backend.collection_url("../admins", "records").is_err());
    }
}
