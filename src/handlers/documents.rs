use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::handlers::common::{non_empty, DocumentListParams};
use crate::models::{ApiDocument, NewApiDocument};
use crate::repositories::{ApiDocumentRepository, Pagination};
use crate::services::documents::inline_disposition;
use crate::services::DocumentService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub data: Vec<ApiDocument>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FileParams {
    /// Document ID
    pub id: Option<String>,
}

/// Multipart form accepted by the upload endpoint
#[allow(dead_code)]
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UploadDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    /// openapi-json, openapi-yaml, postman-collection or other
    pub format: Option<String>,
    pub uploaded_by: Option<String>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub description: Option<String>,
    /// JSON array or comma separated list
    pub tags: Option<String>,
}

// ============ Handlers ============

/// List uploaded API documents
#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentListParams),
    responses(
        (status = 200, description = "Page of documents", body = DocumentListResponse),
        (status = 500, description = "Storage failure")
    ),
    tag = "Documents"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> AppResult<Json<DocumentListResponse>> {
    let query = params.to_query();
    let db = state.store.open().await?;

    let (data, pagination) = ApiDocumentRepository::list_page(db, &query).await?;

    Ok(Json(DocumentListResponse { data, pagination }))
}

/// Download a document's bytes for inline display
#[utoipa::path(
    get,
    path = "/api/files",
    params(FileParams),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Missing id"),
        (status = 404, description = "Document or file not found"),
        (status = 500, description = "Storage failure")
    ),
    tag = "Documents"
)]
pub async fn get_document_file(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
) -> AppResult<Response> {
    let id = non_empty(params.id)
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;

    let db = state.store.open().await?;
    let file = DocumentService::open_file(db, &state.config.app_root, &id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.len)
        .header(
            header::CONTENT_DISPOSITION,
            inline_disposition(&file.file_name),
        )
        .body(Body::from_stream(ReaderStream::new(file.file)))
        .map_err(|e| AppError::Internal(format!("Failed to build file response: {}", e)))
}

/// Upload an API specification document
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = ApiDocument),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Storage path already exists")
    ),
    tag = "Documents"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiDocument>)> {
    let mut input = NewApiDocument::default();
    let mut explicit_name = None;
    let mut has_file = false;
    let mut errors = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            has_file = true;
            input.file_name = field.file_name().unwrap_or_default().to_string();
            input.content = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?
                .to_vec();
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field {}: {}", name, e)))?;
        let value = non_empty(Some(text));

        match name.as_str() {
            "fileName" => explicit_name = value,
            "title" => input.title = value,
            "version" => input.version = value,
            "format" => input.format = value,
            "uploadedBy" => input.uploaded_by = value,
            "teamId" => input.team_id = value,
            "projectId" => input.project_id = value,
            "description" => input.description = value,
            "tags" => match parse_tags(value.as_deref()) {
                Ok(tags) => input.tags = tags,
                Err(e) => errors.push(e),
            },
            other => tracing::debug!("Ignoring unknown upload field {}", other),
        }
    }

    if !has_file {
        errors.push("file is required".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::InvalidInput(errors));
    }
    if let Some(name) = explicit_name {
        input.file_name = name;
    }

    let db = state.store.open().await?;
    let document = DocumentService::upload(
        db,
        &state.config.app_root,
        &state.config.upload_dir,
        state.config.max_upload_bytes,
        input,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// Tags arrive either as a JSON array or comma separated
fn parse_tags(value: Option<&str>) -> Result<Vec<String>, String> {
    match value {
        None => Ok(Vec::new()),
        Some(text) if text.starts_with('[') => serde_json::from_str::<Vec<String>>(text)
            .map(|tags| tags.into_iter().map(|t| t.trim().to_string()).collect())
            .map_err(|e| format!("tags must be a JSON array of strings: {}", e)),
        Some(text) => Ok(text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()),
    }
}
