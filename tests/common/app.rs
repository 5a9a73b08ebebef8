use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use aran_sentinel::build_router;
use aran_sentinel::config::Config;
use aran_sentinel::error::{AppError, AppResult};
use aran_sentinel::models::{AuthSession, BackendUser};
use aran_sentinel::services::{Backend, GenerativeModel, RecordQuery};
use aran_sentinel::state::AppState;

pub const TEST_TOKEN: &str = "test-session-token";
pub const TEST_EMAIL: &str = "analyst@example.com";
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Test configuration rooted in a temporary directory
pub fn test_config(root: &Path) -> Config {
    Config {
        app_root: root.to_path_buf(),
        data_dir: "data".to_string(),
        database_file: "api_documents.db".to_string(),
        upload_dir: "uploads".to_string(),
        max_upload_bytes: 64 * 1024,
        backend_url: "http://backend.invalid".to_string(),
        ai_base_url: "http://model.invalid/v1".to_string(),
        ai_model: "test-model".to_string(),
        ai_api_key: None,
        http_timeout_secs: 5,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// In-process backend holding records per collection
#[derive(Default)]
pub struct FakeBackend {
    records: Mutex<HashMap<String, Vec<Value>>>,
    queries: Mutex<Vec<(String, RecordQuery)>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn set_records(&self, collection: &str, records: Vec<Value>) {
        self.records
            .lock()
            .unwrap()
            .insert(collection.to_string(), records);
    }

    /// Queries received so far, oldest first
    pub fn queries(&self) -> Vec<(String, RecordQuery)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        if email != TEST_EMAIL || password != TEST_PASSWORD {
            return Err(AppError::InvalidCredentials);
        }
        Ok(AuthSession {
            token: TEST_TOKEN.to_string(),
            user: BackendUser {
                id: "user_1".to_string(),
                email: Some(email.to_string()),
                name: Some("Analyst".to_string()),
            },
        })
    }

    async fn list_records(
        &self,
        collection: &str,
        query: &RecordQuery,
        token: &str,
    ) -> AppResult<Vec<Value>> {
        if token != TEST_TOKEN {
            return Err(AppError::Unauthorized);
        }
        self.queries
            .lock()
            .unwrap()
            .push((collection.to_string(), query.clone()));

        Ok(self
            .records
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}

/// Model that answers every prompt with a canned reply
#[derive(Default)]
pub struct FakeModel {
    reply: Mutex<String>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeModel {
    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, _system: &str, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.reply.lock().unwrap().clone();
        if reply.is_empty() {
            return Err(AppError::Upstream("model unavailable".to_string()));
        }
        Ok(reply)
    }
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub backend: Arc<FakeBackend>,
    pub model: Arc<FakeModel>,
    pub root: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(root.path());

        // Use in-process fakes for the backend and the model
        let backend = Arc::new(FakeBackend::default());
        let model = Arc::new(FakeModel::default());

        let state = AppState::with_services(config, backend.clone(), model.clone())
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            backend,
            model,
            root,
        }
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", TEST_TOKEN)
    }
}
