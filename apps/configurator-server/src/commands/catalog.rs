//! # Catalog Commands
//!
//! The UI makes one blocking call before its first render:
//!
//! ```text
//! GET /api/bootstrap
//!   ├── catalog_size  (0 means "no parts yet", not an error)
//!   ├── options       cuff types and application categories
//!   └── admin         present only with a valid bearer token
//! ```

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use bellows_core::{CatalogOptions, Part};

use crate::auth::extract_bearer_token;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub email: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapView {
    pub catalog_size: usize,
    pub options: CatalogOptions,
    pub admin: Option<AdminView>,
}

/// `GET /api/bootstrap`
pub async fn bootstrap(State(state): State<AppState>, headers: HeaderMap) -> Json<BootstrapView> {
    // An invalid or revoked token simply means "not signed in" here.
    let admin = extract_bearer_token(&headers)
        .and_then(|token| state.jwt.validate(token).ok())
        .map(|claims| AdminView {
            email: claims.email,
            expires_at: claims.exp,
        });

    Json(BootstrapView {
        catalog_size: state.catalog.snapshot().len(),
        options: state.options.as_ref().clone(),
        admin,
    })
}

/// `GET /api/catalog`: the snapshot the configurator filters.
pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<Part>> {
    Json(state.catalog.snapshot().as_ref().clone())
}
