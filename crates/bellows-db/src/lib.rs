//! # bellows-db: Catalog Store
//!
//! Database access for the bellows configurator: the parts catalog and the
//! admin accounts that maintain it. SQLite through sqlx.
//!
//! ```text
//! GET /api/catalog ─────► PartRepository::get_all ──┐
//! /api/admin/parts ─────► PartRepository (CRUD)    ├──► SqlitePool ──► bellows.db
//! /api/auth/sign-in ────► AdminRepository ─────────┘        ▲
//!                                             migrations/sqlite/*.sql
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Part and admin repositories
//! - [`catalog`] - The default catalog used by seeding and bulk import
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bellows_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bellows.db")).await?;
//! let parts = db.parts().get_all().await; // never fails, empty on error
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, Storage};

pub use repository::admin::{AdminRepository, AdminUser};
pub use repository::part::{ImportSummary, PartRepository};
