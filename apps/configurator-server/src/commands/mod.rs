//! # HTTP Handlers
//!
//! Everything the browser UI calls, one file per area.
//!
//! ```text
//! commands/
//! ├── mod.rs           ◄─── You are here (exports)
//! ├── health.rs        ◄─── Liveness + database check
//! ├── catalog.rs       ◄─── Bootstrap and catalog snapshot
//! ├── configurator.rs  ◄─── Sessions, events, quote, document export
//! ├── auth.rs          ◄─── Admin sign-in / session / sign-out
//! ├── admin.rs         ◄─── Catalog CRUD, import, uploads, diagnostics
//! └── images.rs        ◄─── Serving the image bucket
//! ```
//!
//! ## Handler Shape
//! ```rust,ignore
//! async fn list_parts(
//!     _admin: AdminSession,               ◄── rejects with 401 before the body runs
//!     State(state): State<AppState>,
//!     Query(params): Query<SearchParams>,
//! ) -> ApiResult<Json<Vec<Part>>>
//! ```

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod configurator;
pub mod health;
pub mod images;
