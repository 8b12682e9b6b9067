//! # bellows-core: Pure Configurator Logic
//!
//! This crate is the **heart** of the bellows configurator. It contains the
//! unit conversions, catalog filtering and configurator state machine as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bellows Configurator Architecture                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │    Part Selection ──► Specifications ──► Contact ──► Export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    configurator-server                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bellows-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌───────────┐  ┌──────────────┐  ┌───────────┐  │   │
//! │  │   │  units  │  │ selection │  │ configurator │  │   quote   │  │   │
//! │  │   │ in/mm   │─►│ diameters │─►│ Configuration│─►│  payload  │  │   │
//! │  │   │ psig/bar│  │ lengths   │  │ events       │  │  display  │  │   │
//! │  │   └─────────┘  └───────────┘  └──────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌──────────────────────┐  ┌───▼──────────────────────────────────┐    │
//! │  │ bellows-db (catalog) │  │ bellows-quote (mail relay, PDF)      │    │
//! │  └──────────────────────┘  └──────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Part, CycleFormat, CuffType, ...)
//! - [`units`] - Unit conversion engine (canonical ↔ display)
//! - [`selection`] - Catalog narrowing by typed diameter/length
//! - [`configurator`] - The configurator state machine
//! - [`quote`] - Display strings and the outbound quote payload
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Canonical storage**: every numeric field of a [`Part`] is stored in one
//!    unit system (in, PSIG, °F, lbf/in, ft·lbs/deg). Display units are derived.
//! 2. **Lenient input**: unparseable numeric text is zero, never an error.
//! 3. **One source of truth**: the [`configurator::Configuration`] value is
//!    mutated only through [`configurator::ConfiguratorEvent`]s; every derived
//!    view is recomputed from it on demand.
//!
//! ## Example Usage
//!
//! ```rust
//! use bellows_core::units::{self, LengthUnit, TemperatureUnit};
//!
//! assert_eq!(units::length_to_display(4.0, LengthUnit::Mm), "101.60");
//! assert_eq!(units::temperature_to_display("200", TemperatureUnit::Celsius), "93");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod configurator;
pub mod error;
pub mod quote;
pub mod selection;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use configurator::{
    Axis, Configuration, Configurator, ConfiguratorEvent, ConfiguratorPhase, ContactDetails,
    LinearAxisKind,
};
pub use error::{CoreError, ValidationError};
pub use quote::{ConfigurationDisplay, QuotePayload};
pub use selection::{SelectionQuery, SelectionView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Part number reserved for the admin write-access probe.
///
/// Never offered to customers; created and immediately deleted by diagnostics.
pub const PROBE_PART_NUMBER: &str = "999-999-9999";

/// Prefix of every exported quotation document.
pub const DOCUMENT_PREFIX: &str = "BSI_Quotation";

/// Lead source reported in every quote payload unless configured otherwise.
pub const DEFAULT_LEAD_SOURCE: &str = "BSI Online Configurator";
