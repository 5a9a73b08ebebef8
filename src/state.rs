use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{Backend, GenerativeModel, HttpBackend, ModelConfig, OpenAiCompatibleModel};
use crate::store::DocumentStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Document metadata store, opened once per process
    pub store: DocumentStore,
    pub config: Config,
    /// Backend-as-a-service for auth and tenant records
    pub backend: Arc<dyn Backend>,
    /// Model behind the AI flows
    pub model: Arc<dyn GenerativeModel>,
}

impl AppState {
    /// Create a new AppState with HTTP clients built from the config
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let backend = HttpBackend::new(&config.backend_url, timeout)
            .map_err(|e| AppStateError::Client(e.to_string()))?;

        let model = OpenAiCompatibleModel::new(ModelConfig {
            base_url: config.ai_base_url.clone(),
            model: config.ai_model.clone(),
            api_key: config.ai_api_key.clone(),
            timeout,
            temperature: 0.1,
        })
        .map_err(|e| AppStateError::Client(e.to_string()))?;

        Self::with_services(config, Arc::new(backend), Arc::new(model)).await
    }

    /// Create AppState with custom backend and model (for testing)
    pub async fn with_services(
        config: Config,
        backend: Arc<dyn Backend>,
        model: Arc<dyn GenerativeModel>,
    ) -> Result<Self, AppStateError> {
        let store = DocumentStore::new(config.database_path());

        // Open during startup so requests never race schema initialization
        store
            .open()
            .await
            .map_err(|e| AppStateError::Storage(e.to_string()))?;

        tokio::fs::create_dir_all(config.upload_path())
            .await
            .map_err(|e| AppStateError::Storage(e.to_string()))?;

        Ok(Self {
            store,
            config,
            backend,
            model,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Document store error: {0}")]
    Storage(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}
