//! # Validation Module
//!
//! Business-rule validation for admin input and quote contact details.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                      │
//! │  └── Part-number input masking (format_part_number_input)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Server handler (Rust)                                        │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (part_number COLLATE NOCASE)                               │
//! │  └── CHECK (numeric columns >= 0)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric text typed into the configurator is never validated here: it is
//! coerced by [`crate::units::parse_value`].

use crate::configurator::ContactDetails;
use crate::error::ValidationError;
use crate::types::PartInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Image extensions accepted by the image bucket.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

// =============================================================================
// Part Number
// =============================================================================

/// Validates a part number.
///
/// ## Rules
/// - Exactly `NNN-NNN-NNNN`: three digits, three digits, four digits
///
/// ## Example
/// ```rust
/// use bellows_core::validation::validate_part_number;
///
/// assert!(validate_part_number("104-020-0001").is_ok());
/// assert!(validate_part_number("1040200001").is_err());
/// assert!(validate_part_number("").is_err());
/// ```
pub fn validate_part_number(part_number: &str) -> ValidationResult<()> {
    let part_number = part_number.trim();

    if part_number.is_empty() {
        return Err(ValidationError::required("part_number"));
    }

    let groups: Vec<&str> = part_number.split('-').collect();
    let well_formed = groups.len() == 3
        && groups
            .iter()
            .zip([3usize, 3, 4])
            .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_digit()));

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "part_number".to_string(),
            reason: "must look like 000-000-0000".to_string(),
        });
    }

    Ok(())
}

/// Masks free typing into the part-number shape.
///
/// Keeps digits only, caps at ten, and inserts hyphens after the third and
/// sixth digit.
///
/// ## Example
/// ```rust
/// use bellows_core::validation::format_part_number_input;
///
/// assert_eq!(format_part_number_input("104020"), "104-020");
/// assert_eq!(format_part_number_input("104-020-00015"), "104-020-0001");
/// ```
pub fn format_part_number_input(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).take(10).collect();

    let mut out = String::with_capacity(12);
    for (i, digit) in digits.iter().enumerate() {
        if i == 3 || i == 6 {
            out.push('-');
        }
        out.push(*digit);
    }
    out
}

// =============================================================================
// Part Input
// =============================================================================

/// Validates an admin create/update form.
///
/// ## Rules
/// - Part number well formed
/// - Every numeric field is non-negative
pub fn validate_part_input(input: &PartInput) -> ValidationResult<()> {
    validate_part_number(&input.part_number)?;

    let numeric = [
        ("pipe_size_in", input.pipe_size_in),
        ("bellows_id_in", input.bellows_id_in),
        ("bellows_od_in", input.bellows_od_in),
        ("live_length_in", input.live_length_in),
        ("overall_length_in", input.overall_length_in),
        ("max_allowable_pressure_psig", input.max_allowable_pressure_psig),
        ("axial_movement_in", input.axial_movement_in),
        ("axial_spring_rate_lbf_in", input.axial_spring_rate_lbf_in),
        ("lateral_movement_in", input.lateral_movement_in),
        ("lateral_spring_rate_lbf_in", input.lateral_spring_rate_lbf_in),
        ("angular_movement_deg", input.angular_movement_deg),
        ("angular_spring_rate_ft_lbs_deg", input.angular_spring_rate_ft_lbs_deg),
    ];

    for (field, value) in numeric {
        if value.is_nan() || value < 0.0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Contact
// =============================================================================

/// Validates the contact block of a quote request.
///
/// ## Rules
/// - Name and e-mail must not be blank; every other field is optional
pub fn validate_contact(contact: &ContactDetails) -> ValidationResult<()> {
    if contact.name.trim().is_empty() {
        return Err(ValidationError::required("contact name"));
    }
    if contact.email.trim().is_empty() {
        return Err(ValidationError::required("email"));
    }
    Ok(())
}

// =============================================================================
// Images
// =============================================================================

/// Validates an uploaded file name and returns its lower-cased extension.
pub fn validate_image_extension(file_name: &str) -> ValidationResult<String> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::NotAllowed {
            field: "image extension".to_string(),
            allowed: ALLOWED_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        });
    }

    Ok(extension)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_part_number() {
        assert!(validate_part_number("104-020-0001").is_ok());
        assert!(validate_part_number(" 999-999-9999 ").is_ok());

        assert!(validate_part_number("").is_err());
        assert!(validate_part_number("104-020-001").is_err());
        assert!(validate_part_number("104-0200-001").is_err());
        assert!(validate_part_number("ABC-020-0001").is_err());
        assert!(validate_part_number("104-020-0001-1").is_err());
    }

    #[test]
    fn test_format_part_number_input() {
        assert_eq!(format_part_number_input(""), "");
        assert_eq!(format_part_number_input("10"), "10");
        assert_eq!(format_part_number_input("104"), "104");
        assert_eq!(format_part_number_input("1040"), "104-0");
        assert_eq!(format_part_number_input("1040200001"), "104-020-0001");
        assert_eq!(format_part_number_input("ab104x020y00019"), "104-020-0001");
    }

    #[test]
    fn test_validate_part_input() {
        let mut input = PartInput {
            part_number: "104-020-0001".to_string(),
            pipe_size_in: 4.0,
            ..PartInput::default()
        };
        assert!(validate_part_input(&input).is_ok());

        input.axial_movement_in = -0.5;
        assert!(matches!(
            validate_part_input(&input),
            Err(ValidationError::Negative { .. })
        ));

        input.axial_movement_in = f64::NAN;
        assert!(validate_part_input(&input).is_err());

        input.axial_movement_in = 0.0;
        input.part_number = "bad".to_string();
        assert!(matches!(
            validate_part_input(&input),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_contact() {
        let mut contact = ContactDetails::default();
        assert!(validate_contact(&contact).is_err());

        contact.name = "Dana".to_string();
        assert!(validate_contact(&contact).is_err());

        contact.email = "dana@example.com".to_string();
        assert!(validate_contact(&contact).is_ok());
    }

    #[test]
    fn test_validate_image_extension() {
        assert_eq!(validate_image_extension("photo.PNG").unwrap(), "png");
        assert_eq!(validate_image_extension("a.b.webp").unwrap(), "webp");
        assert!(validate_image_extension("script.svg").is_err());
        assert!(validate_image_extension("noext").is_err());
    }
}
