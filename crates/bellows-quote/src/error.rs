//! # Quote Error Types
//!
//! Only [`QuoteError::Validation`] ever reaches a customer as a failure.
//! Transport and asset errors are caught where they happen and turned into
//! warnings or omitted visuals.

use bellows_core::ValidationError;
use thiserror::Error;

/// Errors from quote submission and document rendering.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The request was rejected locally; nothing was sent.
    ///
    /// ## When This Occurs
    /// - Contact name or e-mail is blank
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The notification endpoint could not be reached.
    #[error("Quote notification failed: {0}")]
    Transport(String),

    /// An image could not be fetched or decoded.
    #[error("Asset '{reference}' unavailable: {reason}")]
    Asset { reference: String, reason: String },

    /// The document could not be assembled.
    #[error("Document rendering failed: {0}")]
    Render(String),

    /// Export requested without a selected part.
    #[error("No part selected")]
    NoPartSelected,

    /// Writing the exported document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    pub fn asset(reference: impl Into<String>, reason: impl ToString) -> Self {
        QuoteError::Asset {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        QuoteError::Transport(err.to_string())
    }
}

impl From<printpdf::Error> for QuoteError {
    fn from(err: printpdf::Error) -> Self {
        QuoteError::Render(err.to_string())
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;
