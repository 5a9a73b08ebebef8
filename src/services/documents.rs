use std::path::{Component, Path, PathBuf};

use sea_orm::DatabaseConnection;
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::{ApiDocument, DocumentFormat, NewApiDocument};
use crate::repositories::{generate_id, ApiDocumentRepository};

/// A stored document ready to be streamed back
#[derive(Debug)]
pub struct DocumentFile {
    pub file: tokio::fs::File,
    pub len: u64,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Media type by file extension, if the extension is known
pub fn content_type_from_name(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    let media_type = match extension.as_str() {
        "json" => "application/json",
        "yaml" | "yml" => "text/yaml",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(media_type)
}

/// Extension first, stored format second
pub fn resolve_content_type(file_name: &str, format: DocumentFormat) -> &'static str {
    content_type_from_name(file_name).unwrap_or_else(|| format.media_type())
}

/// Value for an inline `Content-Disposition` header.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
pub fn inline_disposition(file_name: &str) -> String {
    let cleaned: String = file_name.chars().filter(|c| !c.is_control()).collect();
    let fallback: String = cleaned
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_ascii() => c,
            _ => '_',
        })
        .collect();

    if cleaned.is_ascii() {
        return format!("inline; filename=\"{}\"", fallback);
    }

    let encoded: String = cleaned
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect();
    format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

/// Join a stored relative path onto the root, refusing anything that escapes it
fn resolve_storage_path(root: &Path, storage_path: &str) -> Option<PathBuf> {
    let relative = Path::new(storage_path);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }
    Some(root.join(relative))
}

pub struct DocumentService;

impl DocumentService {
    /// Look up a document by id and open its bytes.
    ///
    /// Missing metadata, an empty storage path and a missing file all
    /// surface as `NotFound`.
    pub async fn open_file(
        db: &DatabaseConnection,
        app_root: &Path,
        id: &str,
    ) -> AppResult<DocumentFile> {
        let file_ref = ApiDocumentRepository::find_file_ref(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

        if file_ref.storage_path.trim().is_empty() {
            return Err(AppError::NotFound("Document file".to_string()));
        }

        let path = resolve_storage_path(app_root, &file_ref.storage_path).ok_or_else(|| {
            tracing::warn!(
                "Document {} has a storage path outside the root: {}",
                id,
                file_ref.storage_path
            );
            AppError::NotFound("Document file".to_string())
        })?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(AppError::NotFound("Document file".to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Document {} is missing on disk at {}", id, path.display());
                return Err(AppError::NotFound("Document file".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let file = tokio::fs::File::open(&path).await?;

        Ok(DocumentFile {
            file,
            len: metadata.len(),
            content_type: resolve_content_type(&file_ref.file_name, file_ref.format),
            file_name: file_ref.file_name,
        })
    }

    /// Validate an upload, write its bytes under the upload directory and
    /// record its metadata.
    pub async fn upload(
        db: &DatabaseConnection,
        app_root: &Path,
        upload_dir: &str,
        max_bytes: usize,
        input: NewApiDocument,
    ) -> AppResult<ApiDocument> {
        let errors = input.validate(max_bytes);
        if !errors.is_empty() {
            return Err(AppError::InvalidInput(errors));
        }

        let id = generate_id();
        let storage_path = format!(
            "{}/{}-{}",
            upload_dir.trim_end_matches('/'),
            id,
            input.file_name
        );
        let path = resolve_storage_path(app_root, &storage_path)
            .ok_or_else(|| AppError::Internal(format!("Invalid upload path {}", storage_path)))?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, &input.content).await?;

        let document = ApiDocument {
            format: input.resolved_format(),
            id,
            file_name: input.file_name,
            title: input.title,
            version: input.version,
            storage_path,
            uploaded_by: input.uploaded_by,
            uploaded_at: OffsetDateTime::now_utc(),
            last_modified_at: None,
            team_id: input.team_id,
            project_id: input.project_id,
            description: input.description,
            tags: input.tags,
        };

        match ApiDocumentRepository::create(db, &document).await {
            Ok(stored) => {
                tracing::info!("Stored document {} at {}", stored.id, stored.storage_path);
                Ok(stored)
            }
            Err(e) => {
                // Do not leave orphaned bytes behind
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove {}: {}", path.display(), remove_err);
                }
                Err(e)
            }
        }
    }
}
