use time::{Duration, OffsetDateTime};

use aran_sentinel::models::{ApiDocument, DocumentFormat};
use aran_sentinel::repositories::{generate_id, ApiDocumentRepository};
use aran_sentinel::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// A document record that is not yet stored
    pub fn document(&self, file_name: &str, format: DocumentFormat) -> ApiDocument {
        let id = generate_id();
        ApiDocument {
            storage_path: format!("uploads/{}-{}", id, file_name),
            id,
            file_name: file_name.to_string(),
            title: Some(format!("Title of {}", file_name)),
            version: Some("1.0.0".to_string()),
            format,
            uploaded_by: Some("tester".to_string()),
            uploaded_at: OffsetDateTime::now_utc(),
            last_modified_at: None,
            team_id: None,
            project_id: None,
            description: None,
            tags: vec!["test".to_string()],
        }
    }

    /// Store metadata only
    pub async fn insert(&self, doc: &ApiDocument) -> ApiDocument {
        let db = self.state.store.open().await.unwrap();
        ApiDocumentRepository::create(db, doc).await.unwrap()
    }

    /// Store metadata and write the bytes under the app root
    pub async fn insert_with_file(&self, doc: &ApiDocument, content: &[u8]) -> ApiDocument {
        let path = self.state.config.app_root.join(&doc.storage_path);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, content).await.unwrap();
        self.insert(doc).await
    }

    /// Documents named `doc-0.json`, `doc-1.json`, ... uploaded one minute apart
    pub async fn insert_many(&self, count: usize) -> Vec<ApiDocument> {
        let base = OffsetDateTime::now_utc() - Duration::hours(1);
        let mut docs = Vec::with_capacity(count);
        for i in 0..count {
            let mut doc = self.document(&format!("doc-{}.json", i), DocumentFormat::OpenapiJson);
            doc.uploaded_at = base + Duration::minutes(i as i64);
            docs.push(self.insert(&doc).await);
        }
        docs
    }
}
