//! # bellows-quote: Quote Submission & Document Rendering
//!
//! The two outbound effects of a quote request.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ConfigurationDisplay                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  QuoteNotifier::submit ──── Err(Validation) ──► abort, nothing sent    │
//! │       │                                                                 │
//! │       │ Ok(outcome)  (outcome.warning set when the relay was down)     │
//! │       ▼                                                                 │
//! │  DocumentRenderer::render                                              │
//! │       ├── AssetLoader: logo          ──► fallback: text heading        │
//! │       ├── AssetLoader: product image ──► fallback: empty frame         │
//! │       └── draw_summary(PdfSurface)   ──► BSI_Quotation_<part>.pdf      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`notifier`] - HTTP POST of the fixed-key quote payload
//! - [`document`] - page layout over the [`DrawingSurface`] trait
//! - [`pdf`] - `printpdf` implementation of the surface
//! - [`assets`] - image bytes from URLs or local files
//! - [`error`] - [`QuoteError`]

pub mod assets;
pub mod document;
pub mod error;
pub mod notifier;
pub mod pdf;

pub use assets::AssetLoader;
pub use document::{
    document_file_name, draw_summary, DocumentAssets, DocumentRenderer, DrawingSurface,
    ProductImage, RenderedDocument,
};
pub use error::{QuoteError, QuoteResult};
pub use notifier::{NotifierConfig, QuoteNotifier, SubmissionOutcome, TRANSPORT_WARNING};
pub use pdf::PdfSurface;
