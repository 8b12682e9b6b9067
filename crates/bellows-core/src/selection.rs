//! # Selection Resolver
//!
//! Narrows the catalog by the diameter and overall length the user typed.
//!
//! ## Matching Rule
//! A part matches when its canonical value, converted to the current display
//! unit and formatted, is **string-equal** to the query. There is no numeric
//! tolerance: under `IN` the query `"4.00"` matches a 4 in part, `"4"` does not.
//!
//! ```text
//!   catalog ──┬──► available_diameters(unit)           all sizes, sorted
//!             │
//!             ├──► available_lengths(query)            only when a diameter
//!             │                                        query is present
//!             └──► available_part_numbers(query)       empty query = wildcard
//! ```
//!
//! Views are plain functions of their inputs and are recomputed on every call.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Part;
use crate::units::{length_to_display, LengthUnit};

// =============================================================================
// Query
// =============================================================================

/// What the user typed into the two dimension inputs, with their units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionQuery {
    pub diameter: String,
    pub diameter_unit: LengthUnit,
    pub length: String,
    pub length_unit: LengthUnit,
}

impl SelectionQuery {
    pub fn is_empty(&self) -> bool {
        self.diameter.is_empty() && self.length.is_empty()
    }

    fn diameter_matches(&self, part: &Part) -> bool {
        self.diameter.is_empty()
            || length_to_display(part.pipe_size_in, self.diameter_unit) == self.diameter
    }

    fn length_matches(&self, part: &Part) -> bool {
        self.length.is_empty()
            || length_to_display(part.overall_length_in, self.length_unit) == self.length
    }
}

// =============================================================================
// Derived Views
// =============================================================================

/// Distinct nominal sizes across the whole catalog, ascending, in `unit`.
pub fn available_diameters(catalog: &[Part], unit: LengthUnit) -> Vec<String> {
    sorted_distinct(catalog.iter().map(|p| p.pipe_size_in), unit)
}

/// Distinct overall lengths of the parts whose diameter matches the query.
///
/// Empty while no diameter has been typed.
pub fn available_lengths(catalog: &[Part], query: &SelectionQuery) -> Vec<String> {
    if query.diameter.is_empty() {
        return Vec::new();
    }
    sorted_distinct(
        catalog
            .iter()
            .filter(|p| query.diameter_matches(p))
            .map(|p| p.overall_length_in),
        query.length_unit,
    )
}

/// Part numbers matching both queries, in catalog order.
pub fn available_part_numbers(catalog: &[Part], query: &SelectionQuery) -> Vec<String> {
    catalog
        .iter()
        .filter(|p| query.diameter_matches(p) && query.length_matches(p))
        .map(|p| p.part_number.clone())
        .collect()
}

/// Looks a part up by its exact part number.
pub fn find_part<'a>(catalog: &'a [Part], part_number: &str) -> Option<&'a Part> {
    catalog.iter().find(|p| p.part_number == part_number)
}

fn sorted_distinct(values: impl Iterator<Item = f64>, unit: LengthUnit) -> Vec<String> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let mut shown: Vec<String> = values
        .into_iter()
        .map(|v| length_to_display(v, unit))
        .collect();
    // Display is monotone in the value, so equal strings are adjacent.
    shown.dedup();
    shown
}

// =============================================================================
// Selection View
// =============================================================================

/// The three datalists the UI offers, resolved together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionView {
    pub diameters: Vec<String>,
    pub lengths: Vec<String>,
    pub part_numbers: Vec<String>,
}

impl SelectionView {
    pub fn resolve(catalog: &[Part], query: &SelectionQuery) -> Self {
        SelectionView {
            diameters: available_diameters(catalog, query.diameter_unit),
            lengths: available_lengths(catalog, query),
            part_numbers: available_part_numbers(catalog, query),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
