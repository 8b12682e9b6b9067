//! # Repository Module
//!
//! Database repository implementations for the catalog store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Server handler                                                        │
//! │       │                                                                 │
//! │       │  db.parts().search("a240")                                     │
//! │       ▼                                                                 │
//! │  PartRepository                                                        │
//! │  ├── get_all()            never fails (configurator read path)         │
//! │  ├── list_all() / search() / get_by_part_number()                      │
//! │  ├── insert() / update() / delete()                                    │
//! │  ├── import()             per-row, reports imported vs skipped         │
//! │  └── probe_write()        diagnostics                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`part::PartRepository`] - Catalog CRUD and search
//! - [`admin::AdminRepository`] - Admin accounts and password checks

pub mod admin;
pub mod part;
