use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::api_document::{self, ActiveModel, Column, Entity as ApiDocumentEntity};
use crate::error::{AppError, AppResult};
use crate::models::{ApiDocument, DocumentFormat};

/// Columns a listing may be ordered by; anything else falls back to `uploadedAt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentSortColumn {
    FileName,
    Title,
    Version,
    Format,
    #[default]
    UploadedAt,
    LastModifiedAt,
    UploadedBy,
    TeamId,
    ProjectId,
}

impl DocumentSortColumn {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("fileName") => Self::FileName,
            Some("title") => Self::Title,
            Some("version") => Self::Version,
            Some("format") => Self::Format,
            Some("uploadedAt") => Self::UploadedAt,
            Some("lastModifiedAt") => Self::LastModifiedAt,
            Some("uploadedBy") => Self::UploadedBy,
            Some("teamId") => Self::TeamId,
            Some("projectId") => Self::ProjectId,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileName => "fileName",
            Self::Title => "title",
            Self::Version => "version",
            Self::Format => "format",
            Self::UploadedAt => "uploadedAt",
            Self::LastModifiedAt => "lastModifiedAt",
            Self::UploadedBy => "uploadedBy",
            Self::TeamId => "teamId",
            Self::ProjectId => "projectId",
        }
    }

    fn column(&self) -> Column {
        match self {
            Self::FileName => Column::FileName,
            Self::Title => Column::Title,
            Self::Version => Column::Version,
            Self::Format => Column::Format,
            Self::UploadedAt => Column::UploadedAt,
            Self::LastModifiedAt => Column::LastModifiedAt,
            Self::UploadedBy => Column::UploadedBy,
            Self::TeamId => Column::TeamId,
            Self::ProjectId => Column::ProjectId,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListDirection {
    Asc,
    #[default]
    Desc,
}

impl ListDirection {
    /// Case-insensitive ASC/DESC; anything else means DESC
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("ASC") => Self::Asc,
            _ => Self::Desc,
        }
    }

    fn order(&self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Validated listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentListQuery {
    pub limit: u64,
    pub offset: u64,
    pub order_by: DocumentSortColumn,
    pub direction: ListDirection,
}

impl Default for DocumentListQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            order_by: DocumentSortColumn::default(),
            direction: ListDirection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub page_count: u64,
    pub current_page: u64,
}

impl Pagination {
    pub fn new(total: u64, limit: u64, offset: u64) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            limit,
            offset,
            page_count: total.div_ceil(limit),
            current_page: offset / limit + 1,
        }
    }
}

/// What the file endpoint needs to locate and label a stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFileRef {
    pub storage_path: String,
    pub file_name: String,
    pub format: DocumentFormat,
}

/// Collision-resistant identifier for a new document row
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Document metadata repository for database operations
pub struct ApiDocumentRepository;

impl ApiDocumentRepository {
    /// Insert a document; a duplicate storage path is a conflict
    pub async fn create(db: &DatabaseConnection, doc: &ApiDocument) -> AppResult<ApiDocument> {
        let model = ActiveModel {
            id: Set(doc.id.clone()),
            file_name: Set(doc.file_name.clone()),
            title: Set(doc.title.clone()),
            version: Set(doc.version.clone()),
            format: Set(doc.format.as_str().to_string()),
            storage_path: Set(doc.storage_path.clone()),
            uploaded_by: Set(doc.uploaded_by.clone()),
            uploaded_at: Set(format_timestamp(doc.uploaded_at)?),
            last_modified_at: Set(doc.last_modified_at.map(format_timestamp).transpose()?),
            team_id: Set(doc.team_id.clone()),
            project_id: Set(doc.project_id.clone()),
            description: Set(doc.description.clone()),
            tags: Set(Some(encode_tags(&doc.tags)?)),
        };

        let result = model.insert(db).await?;
        result.try_into()
    }

    /// Find document by ID
    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> AppResult<ApiDocument> {
        let model = ApiDocumentEntity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

        model.try_into()
    }

    /// Storage location, name and format of a document, if the row exists
    pub async fn find_file_ref(
        db: &DatabaseConnection,
        id: &str,
    ) -> AppResult<Option<StoredFileRef>> {
        let row = ApiDocumentEntity::find_by_id(id.to_string())
            .select_only()
            .column(Column::StoragePath)
            .column(Column::FileName)
            .column(Column::Format)
            .into_tuple::<(String, String, String)>()
            .one(db)
            .await?;

        Ok(row.map(|(storage_path, file_name, format)| StoredFileRef {
            storage_path,
            file_name,
            format: parse_format(&format),
        }))
    }

    /// One ordered page of documents
    pub async fn list(
        db: &DatabaseConnection,
        query: &DocumentListQuery,
    ) -> AppResult<Vec<ApiDocument>> {
        let models = ApiDocumentEntity::find()
            .order_by(query.order_by.column(), query.direction.order())
            .order_by_asc(Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(db)
            .await?;

        models.into_iter().map(ApiDocument::try_from).collect()
    }

    /// Count all documents
    pub async fn count(db: &DatabaseConnection) -> AppResult<u64> {
        let count = ApiDocumentEntity::find().count(db).await?;
        Ok(count)
    }

    /// Page plus pagination metadata
    pub async fn list_page(
        db: &DatabaseConnection,
        query: &DocumentListQuery,
    ) -> AppResult<(Vec<ApiDocument>, Pagination)> {
        let documents = Self::list(db, query).await?;
        let total = Self::count(db).await?;
        Ok((documents, Pagination::new(total, query.limit, query.offset)))
    }
}

/// Fixed-width UTC text so the column orders chronologically
fn format_timestamp(value: OffsetDateTime) -> AppResult<String> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .map_err(|e| AppError::Internal(format!("Timestamp formatting failed: {}", e)))
}

fn parse_timestamp(value: &str) -> AppResult<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| AppError::Database(format!("Invalid stored timestamp '{}': {}", value, e)))
}

fn encode_tags(tags: &[String]) -> AppResult<String> {
    serde_json::to_string(tags)
        .map_err(|e| AppError::Internal(format!("Tag encoding failed: {}", e)))
}

fn decode_tags(value: Option<&str>) -> AppResult<Vec<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| AppError::Database(format!("Invalid stored tags '{}': {}", text, e))),
    }
}

fn parse_format(value: &str) -> DocumentFormat {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown document format '{}' treated as other", value);
        DocumentFormat::Other
    })
}

// Conversion from SeaORM model to our domain model
impl TryFrom<api_document::Model> for ApiDocument {
    type Error = AppError;

    fn try_from(m: api_document::Model) -> AppResult<Self> {
        Ok(Self {
            format: parse_format(&m.format),
            uploaded_at: parse_timestamp(&m.uploaded_at)?,
            last_modified_at: m
                .last_modified_at
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(parse_timestamp)
                .transpose()?,
            tags: decode_tags(m.tags.as_deref())?,
            id: m.id,
            file_name: m.file_name,
            title: m.title,
            version: m.version,
            storage_path: m.storage_path,
            uploaded_by: m.uploaded_by,
            team_id: m.team_id,
            project_id: m.project_id,
            description: m.description,
        })
    }
}
