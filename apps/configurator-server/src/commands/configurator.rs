//! # Configurator Commands
//!
//! A browser tab opens a session, streams [`ConfiguratorEvent`]s at it and
//! gets the whole derived view back after each one.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sessions/{id}/document                                      │
//! │       │                                                                 │
//! │       ├── busy?            ──► 409 BUSY                                 │
//! │       ├── no part?         ──► 400 "No part number selected"            │
//! │       ▼                                                                 │
//! │  notifier.submit ─── blank name/e-mail ──► 400, nothing sent/rendered  │
//! │       │  relay down ──► continue, X-Quote-Warning header               │
//! │       ▼                                                                 │
//! │  renderer.render (logo + product image, with fallbacks)                │
//! │       ├──► export_dir/BSI_Quotation_<part>.pdf  (failure only logged)  │
//! │       ▼                                                                 │
//! │  200 application/pdf, attachment                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use bellows_core::{
    ConfigurationDisplay, Configuration, ConfiguratorEvent, ConfiguratorPhase, CoreError, Part,
    SelectionView,
};
use bellows_quote::SubmissionOutcome;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, ConfiguratorSession};

/// Response header carrying the relay warning on a degraded export.
pub const QUOTE_WARNING_HEADER: &str = "x-quote-warning";

/// Everything the UI renders for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub phase: ConfiguratorPhase,
    pub configuration: Configuration,
    pub selection: SelectionView,
    pub display: ConfigurationDisplay,
    pub busy: bool,
}

impl SessionView {
    fn build(id: Uuid, session: &ConfiguratorSession, catalog: &[Part]) -> Self {
        let configurator = &session.configurator;
        SessionView {
            id,
            phase: configurator.phase(catalog),
            configuration: configurator.configuration().clone(),
            selection: configurator.selection(catalog),
            display: ConfigurationDisplay::from_configuration(configurator.configuration()),
            busy: session.busy,
        }
    }
}

/// `POST /api/sessions`
pub async fn create_session(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let catalog = state.catalog.snapshot();
    let id = state.sessions.create();
    let view = state
        .sessions
        .with_session(id, |session| SessionView::build(id, session, &catalog))?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let catalog = state.catalog.snapshot();
    let view = state
        .sessions
        .with_session(id, |session| SessionView::build(id, session, &catalog))?;
    Ok(Json(view))
}

/// `DELETE /api/sessions/{id}`
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/sessions/{id}/events`
///
/// ## Returns
/// * `404 NOT_FOUND` - unknown session, or `select_part` with a part that is
///   not in the catalog (the configuration is left untouched)
pub async fn apply_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<ConfiguratorEvent>,
) -> ApiResult<Json<SessionView>> {
    let catalog = state.catalog.snapshot();

    let view = state.sessions.with_session(id, |session| {
        session.configurator.apply(&catalog, event)?;
        Ok::<_, ApiError>(SessionView::build(id, session, &catalog))
    })??;

    Ok(Json(view))
}

/// `POST /api/sessions/{id}/quote`: submits without rendering.
pub async fn submit_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SubmissionOutcome>> {
    let _guard = state.sessions.begin_submission(id)?;

    let display = state.sessions.with_session(id, |session| {
        ConfigurationDisplay::from_configuration(session.configurator.configuration())
    })?;

    let outcome = state.notifier.submit(&display, Utc::now()).await?;
    Ok(Json(outcome))
}

/// `POST /api/sessions/{id}/document`: submits, then renders the summary.
pub async fn export_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let _guard = state.sessions.begin_submission(id)?;
    let catalog = state.catalog.snapshot();

    let (display, image_url) = state.sessions.with_session(id, |session| {
        let configurator = &session.configurator;
        let image_url = configurator
            .selected_part(&catalog)
            .and_then(|part| part.image_url.clone());
        (
            ConfigurationDisplay::from_configuration(configurator.configuration()),
            image_url,
        )
    })?;

    if display.part_number.is_none() {
        return Err(CoreError::NoPartSelected.into());
    }

    let outcome = state.notifier.submit(&display, Utc::now()).await?;
    let document = state.renderer.render(&display, image_url.as_deref()).await?;

    if let Err(e) = document.save_to(&state.config.export_dir).await {
        warn!(error = %e, file = %document.file_name, "Exported document not kept on disk");
    }

    info!(
        session_id = %id,
        file = %document.file_name,
        delivered = outcome.delivered,
        "Quotation document exported"
    );

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/pdf")
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        );
    if let Some(warning) = outcome.warning {
        response = response.header(QUOTE_WARNING_HEADER, warning);
    }

    response
        .body(Body::from(document.bytes))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}
