use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub app_root: PathBuf,
    pub data_dir: String,
    pub database_file: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,

    // External services
    pub backend_url: String,
    pub ai_base_url: String,
    pub ai_model: String,
    pub ai_api_key: Option<String>,
    pub http_timeout_secs: u64,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Storage
            app_root: PathBuf::from(env::var("APP_ROOT").unwrap_or_else(|_| ".".to_string())),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            database_file: env::var("DATABASE_FILE")
                .unwrap_or_else(|_| "api_documents.db".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES"))?,

            // External services
            backend_url: env::var("BACKEND_URL")
                .map_err(|_| ConfigError::Missing("BACKEND_URL"))?,
            ai_base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434/v1".to_string()),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "llama3.1".to_string()),
            ai_api_key: env::var("AI_API_KEY").ok().filter(|key| !key.is_empty()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("HTTP_TIMEOUT_SECS"))?,

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Absolute-or-root-relative location of the SQLite file
    pub fn database_path(&self) -> PathBuf {
        self.app_root.join(&self.data_dir).join(&self.database_file)
    }

    /// Directory uploaded documents are written to
    pub fn upload_path(&self) -> PathBuf {
        self.app_root.join(&self.upload_dir)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
