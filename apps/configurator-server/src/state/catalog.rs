//! # Catalog State
//!
//! The configurator reads the catalog from an in-memory snapshot, never from
//! the database directly. Handlers clone the `Arc` and release the lock
//! before doing any work, so a refresh never waits on a slow request.
//!
//! ```text
//! startup ───────────┐
//! admin create ──────┤
//! admin update ──────┼──► refresh() ──► PartRepository::get_all ──► swap Arc
//! admin delete ──────┤
//! admin import ──────┘
//! ```

use std::sync::{Arc, RwLock};

use tracing::info;

use bellows_core::Part;
use bellows_db::Database;

#[derive(Debug, Default)]
pub struct CatalogState {
    parts: RwLock<Arc<Vec<Part>>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current catalog, sorted by part number.
    pub fn snapshot(&self) -> Arc<Vec<Part>> {
        self.parts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-reads the store and swaps the snapshot. Returns the new size.
    ///
    /// A failed read yields an empty catalog (logged by the repository).
    pub async fn refresh(&self, db: &Database) -> usize {
        let parts = db.parts().get_all().await;
        let count = parts.len();

        *self.parts.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(parts);

        info!(count, "Catalog snapshot refreshed");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellows_db::catalog::default_catalog;
    use bellows_db::DbConfig;
    use chrono::Utc;

    #[tokio::test]
    async fn test_refresh_swaps_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = CatalogState::new();
        assert!(catalog.snapshot().is_empty());

        let before = catalog.snapshot();
        db.parts().import(&default_catalog(Utc::now())).await;
        let count = catalog.refresh(&db).await;

        assert_eq!(count, 21);
        assert_eq!(catalog.snapshot().len(), 21);
        // Earlier snapshots are unaffected
        assert!(before.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_store_failure_is_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.parts().import(&default_catalog(Utc::now())).await;
        let catalog = CatalogState::new();
        catalog.refresh(&db).await;

        db.close().await;
        assert_eq!(catalog.refresh(&db).await, 0);
        assert!(catalog.snapshot().is_empty());
    }
}
