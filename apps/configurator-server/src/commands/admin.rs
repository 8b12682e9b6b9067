//! # Admin Commands
//!
//! Catalog maintenance behind a signed-in session. Every successful
//! mutation refreshes the configurator's catalog snapshot before returning.
//!
//! ```text
//! GET    /api/admin/parts?search=a240         list / search
//! POST   /api/admin/parts                     create   (part number formatted, validated)
//! PUT    /api/admin/parts/{part_number}       update   (part number immutable)
//! DELETE /api/admin/parts/{part_number}       delete
//! POST   /api/admin/import                    load the default catalog
//! POST   /api/admin/images?file_name=x.png    upload a product image (raw body)
//! GET    /api/admin/diagnostics               probes + counts
//! ```

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use bellows_core::validation::{format_part_number_input, validate_part_input};
use bellows_core::{Part, PartInput};
use bellows_db::catalog::default_catalog;
use bellows_db::migrations::migration_status;
use bellows_db::ImportSummary;

use crate::auth::AdminSession;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::storage::StoredImage;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadParams {
    pub file_name: String,
}

/// `GET /api/admin/parts`
pub async fn list_parts(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Part>>> {
    let parts = match params.search.as_deref() {
        Some(term) => state.db.parts().search(term).await?,
        None => state.db.parts().list_all().await?,
    };
    Ok(Json(parts))
}

/// `POST /api/admin/parts`
///
/// ## Returns
/// * `400 VALIDATION_ERROR` - malformed part number or a negative value
/// * `409 DUPLICATE` - part number already exists (case-insensitive)
pub async fn create_part(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Json(mut input): Json<PartInput>,
) -> ApiResult<(StatusCode, Json<Part>)> {
    input.part_number = format_part_number_input(&input.part_number);
    validate_part_input(&input)?;

    let part = state
        .db
        .parts()
        .insert(&Part::from_input(input, Utc::now()))
        .await?;
    state.catalog.refresh(&state.db).await;

    info!(admin = %admin.email, part_number = %part.part_number, "Part created");
    Ok((StatusCode::CREATED, Json(part)))
}

/// `PUT /api/admin/parts/{part_number}`
///
/// The part number in the body is ignored; the path names the part.
pub async fn update_part(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(part_number): Path<String>,
    Json(mut input): Json<PartInput>,
) -> ApiResult<Json<Part>> {
    input.part_number = part_number.clone();
    validate_part_input(&input)?;

    let part = state.db.parts().update(&part_number, &input).await?;
    state.catalog.refresh(&state.db).await;

    info!(admin = %admin.email, part_number = %part_number, "Part updated");
    Ok(Json(part))
}

/// `DELETE /api/admin/parts/{part_number}`
pub async fn delete_part(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(part_number): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.parts().delete(&part_number).await?;
    state.catalog.refresh(&state.db).await;

    info!(admin = %admin.email, part_number = %part_number, "Part deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/import`: parts that already exist are skipped.
pub async fn import_catalog(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
) -> ApiResult<Json<ImportSummary>> {
    let summary = state.db.parts().import(&default_catalog(Utc::now())).await;
    state.catalog.refresh(&state.db).await;

    info!(
        admin = %admin.email,
        imported = summary.imported,
        skipped = summary.skipped,
        "Default catalog imported"
    );
    Ok(Json(summary))
}

/// `POST /api/admin/images?file_name=…`: the request body is the image.
pub async fn upload_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<StoredImage>)> {
    let stored = state.images.save(&params.file_name, &body).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Probe {
    pub ok: bool,
    pub error: Option<String>,
}

impl<E: std::fmt::Display> From<Result<(), E>> for Probe {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Probe {
                ok: true,
                error: None,
            },
            Err(e) => Probe {
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub database_write: Probe,
    pub image_bucket: Probe,
    pub part_count: i64,
    pub catalog_snapshot: usize,
    pub admin_count: i64,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub open_sessions: usize,
}

/// `GET /api/admin/diagnostics`
pub async fn diagnostics(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> ApiResult<Json<Diagnostics>> {
    let database_write = Probe::from(state.db.parts().probe_write().await);
    let image_bucket = Probe::from(state.images.probe().await);
    let (migrations_total, migrations_applied) = migration_status(state.db.pool()).await?;

    Ok(Json(Diagnostics {
        database_write,
        image_bucket,
        part_count: state.db.parts().count().await?,
        catalog_snapshot: state.catalog.snapshot().len(),
        admin_count: state.db.admins().count().await?,
        migrations_total,
        migrations_applied,
        open_sessions: state.sessions.len(),
    }))
}
