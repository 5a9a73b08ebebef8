use std::path::{Path, PathBuf};
use std::sync::Arc;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};

/// Lazily opened SQLite file holding document metadata.
///
/// Clones share one connection cell, so the file is opened and the schema
/// initialized at most once no matter how many callers race on first use.
#[derive(Clone)]
pub struct DocumentStore {
    path: PathBuf,
    connection: Arc<OnceCell<DatabaseConnection>>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            connection: Arc::new(OnceCell::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the connection has been established
    pub fn is_open(&self) -> bool {
        self.connection.initialized()
    }

    /// Get the shared connection, opening the store on first call
    pub async fn open(&self) -> AppResult<&DatabaseConnection> {
        self.connection
            .get_or_try_init(|| connect(&self.path))
            .await
    }
}

async fn connect(path: &Path) -> AppResult<DatabaseConnection> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        // create_dir_all treats an existing directory as success
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::Database(format!(
                "cannot create storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let is_new = !tokio::fs::try_exists(path).await.map_err(|e| {
        AppError::Database(format!("cannot access {}: {}", path.display(), e))
    })?;

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if is_new {
        tracing::info!("Initializing document store schema at {}", path.display());
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    tracing::info!("Document store opened at {}", path.display());
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
