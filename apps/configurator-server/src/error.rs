//! # API Error Type
//!
//! Unified error type for every HTTP handler.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Configurator                       │
//! │                                                                         │
//! │  Browser                         Rust Backend                           │
//! │  ───────                         ────────────                           │
//! │                                                                         │
//! │  POST /api/admin/parts                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler -> Result<Json<T>, ApiError>                            │  │
//! │  │         │                                                        │  │
//! │  │  DbError::UniqueViolation ──────────┐                            │  │
//! │  │  ValidationError::InvalidFormat ────┼──► ApiError ──► (status,   │  │
//! │  │  CoreError::PartNotFound ───────────┤              JSON body)    │  │
//! │  │  QuoteError::Validation ────────────┘                            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 409 { "code": "DUPLICATE", "message": "part_number '…' …" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport and asset failures never arrive here: the quote crate turns
//! them into warnings and fallbacks before the handler sees them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bellows_core::{CoreError, ValidationError};
use bellows_db::DbError;
use bellows_quote::QuoteError;

/// What the browser receives when a request fails.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Part not found: 104-020-0001"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Unique value already taken (409)
    Duplicate,

    /// Missing, expired or revoked admin session (401)
    Unauthorized,

    /// A submission is already in flight on this session (409)
    Busy,

    /// Database operation failed (500)
    DatabaseError,

    /// Image bucket or export directory unavailable (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Duplicate | ErrorCode::Busy => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError | ErrorCode::StorageError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn busy() -> Self {
        ApiError::new(
            ErrorCode::Busy,
            "A quote request is already being processed for this session",
        )
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation(e) => {
                tracing::warn!("Constraint violated: {}", e);
                ApiError::validation("Values must not be negative")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::QueryFailed(e) | DbError::Hashing(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Duplicate { .. } => ApiError::new(ErrorCode::Duplicate, err.to_string()),
            other => ApiError::validation(other.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PartNotFound(part_number) => ApiError::not_found("Part", &part_number),
            CoreError::NoPartSelected => ApiError::validation("No part number selected"),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Validation(e) => e.into(),
            QuoteError::NoPartSelected => ApiError::validation("No part number selected"),
            QuoteError::Io(e) => {
                tracing::error!("Document storage failed: {}", e);
                ApiError::storage("Document could not be stored")
            }
            other => {
                tracing::error!("Quote processing failed: {}", other);
                ApiError::internal(other.to_string())
            }
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
