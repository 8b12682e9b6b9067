//! # Database Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied in sequence order; sqlx records each applied version in
//! `_sqlx_migrations`.
//!
//! ```text
//! 001_initial_schema.sql   bellows_parts (NOCASE unique part_number,
//!                          non-negative CHECKs), admin_users
//! ```
//!
//! Applied files are checksummed: change the schema with a new
//! `NNN_description.sql`, never by editing an old one.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every pending migration. A no-op when the schema is current.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, before) = migration_status(pool).await?;
    debug!(total, applied = before, "Migration check");

    MIGRATOR.run(pool).await?;

    if before < total {
        info!(applied = total - before, "Schema migrated");
    }
    Ok(())
}

/// `(embedded, applied)` migration counts, for diagnostics.
///
/// A database that has never been migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.iter().count();

    let applied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    .map(|n| n.max(0) as usize)
    .unwrap_or(0);

    Ok((embedded, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_fresh_database_reports_nothing_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(applied, 0);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }
}
