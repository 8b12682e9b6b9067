//! # Database Error Types
//!
//! ```text
//! sqlx::Error ──► DbError (constraint kind, pool state) ──► ApiError (server)
//! ```
//!
//! The configurator's catalog read never surfaces these: see
//! [`crate::PartRepository::get_all`].

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that key.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a part number that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the row.
    ///
    /// ## When This Occurs
    /// - Creating a part whose number already exists (case-insensitive)
    /// - Creating a second admin with the same e-mail
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A CHECK or NOT NULL constraint rejected the row (e.g. a negative dimension).
    #[error("Constraint violated: {0}")]
    CheckViolation(String),

    /// The database file could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for another reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Names the field and offending value of a UniqueViolation; SQLite only
    /// reports the index columns.
    pub(crate) fn with_duplicate_value(self, field: &str, value: &str) -> Self {
        match self {
            DbError::UniqueViolation { .. } => DbError::duplicate(field, value),
            other => other,
        }
    }
}

/// ```text
/// Database(UniqueViolation)           → UniqueViolation { field: <table.column> }
/// Database(Check | NotNull | FK)      → CheckViolation
/// Database(other)                     → QueryFailed
/// PoolTimedOut                        → PoolExhausted
/// PoolClosed                          → ConnectionFailed
/// RowNotFound                         → NotFound
/// anything else                       → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => {
                        // "UNIQUE constraint failed: bellows_parts.part_number"
                        let field = message
                            .rsplit_once(": ")
                            .map(|(_, columns)| columns.to_string())
                            .unwrap_or_else(|| "unknown".to_string());
                        DbError::duplicate(field, "unknown")
                    }
                    ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::ForeignKeyViolation => DbError::CheckViolation(message),
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
