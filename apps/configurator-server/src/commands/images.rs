//! Serves the image bucket at `/images/{*key}`.

use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::storage::content_type;

/// `GET /images/{*key}`
pub async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let bytes = state.images.read(&key).await?;

    Ok((
        [
            (CONTENT_TYPE, content_type(&key)),
            // Keys are never reused
            (CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        bytes,
    ))
}
