//! # Database Pool Management
//!
//! Opening the catalog database and handing out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::new("…/bellows.db")      DbConfig::in_memory()              │
//! │        │  Storage::File                   │  Storage::Memory           │
//! │        │  WAL, parent dir created         │  one pinned connection     │
//! │        └──────────────┬───────────────────┘                            │
//! │                       ▼                                                 │
//! │            Database::open(config)  ──► migrations (unless disabled)    │
//! │                       │                                                 │
//! │          ┌────────────┴────────────┐                                    │
//! │          ▼                         ▼                                    │
//! │    db.parts()                db.admins()                               │
//! │    PartRepository            AdminRepository                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode so catalog reads from configurator
//! sessions never wait on an admin write.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::admin::AdminRepository;
use crate::repository::part::PartRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    File(PathBuf),
    /// Gone when the pool closes. Tests only.
    Memory,
}

/// How to open the catalog database.
///
/// ## Example
/// ```rust
/// use bellows_db::DbConfig;
/// use std::time::Duration;
///
/// let config = DbConfig::new("/var/lib/bellows/bellows.db")
///     .max_connections(8)
///     .busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_connections, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage: Storage,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// How long a request waits for a free connection. Default: 10s
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked database before failing. Default: 5s
    pub busy_timeout: Duration,

    /// Apply pending migrations when opening. Default: true
    pub migrate: bool,
}

impl DbConfig {
    /// A file database; the file and its directory are created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            storage: Storage::File(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// A private in-memory database on a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            storage: Storage::Memory,
            max_connections: 1,
            ..DbConfig::new(PathBuf::new())
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }

    fn describe(&self) -> String {
        match &self.storage {
            Storage::File(path) => path.display().to_string(),
            Storage::Memory => "in-memory".to_string(),
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.storage {
            Storage::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
            Storage::Memory => SqliteConnectOptions::new().in_memory(true),
        };

        options.busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout);

        match self.storage {
            // Every new connection would see a fresh, empty database.
            Storage::Memory => options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            Storage::File(_) => options
                .min_connections(1)
                .idle_timeout(Some(Duration::from_secs(600))),
        }
    }
}

async fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", parent.display(), e))),
        _ => Ok(()),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the catalog database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies pending migrations.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - file or directory not usable
    /// * `Err(DbError::MigrationFailed)` - schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(database = %config.describe(), "Opening catalog database");

        if let Storage::File(path) = &config.storage {
            ensure_parent_dir(path).await?;
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalog parts.
    pub fn parts(&self) -> PartRepository {
        PartRepository::new(self.pool.clone())
    }

    /// Admin accounts.
    pub fn admins(&self) -> AdminRepository {
        AdminRepository::new(self.pool.clone())
    }

    /// Closes every connection; later queries fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    /// `SELECT 1` round trip.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.parts().count().await.unwrap(), 0);
        assert_eq!(db.admins().count().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/bellows-test.db")
            .max_connections(10)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.migrate);
        assert_eq!(
            config.storage,
            Storage::File(PathBuf::from("/tmp/bellows-test.db"))
        );

        let memory = DbConfig::in_memory();
        assert_eq!(memory.storage, Storage::Memory);
        assert_eq!(memory.max_connections, 1);
        assert_eq!(memory.describe(), "in-memory");
    }

    #[tokio::test]
    async fn test_file_database_creates_directory() {
        let dir = std::env::temp_dir().join(format!("bellows-db-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("bellows.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());
        db.close().await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}
