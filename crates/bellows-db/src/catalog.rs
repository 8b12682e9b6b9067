//! # Default Catalog
//!
//! A deterministic starter catalog of standard bellows, used by the `seed`
//! binary and by the admin "import default catalog" action.
//!
//! ## Part Number Scheme
//! ```text
//! 1SS-LLL-NNNN
//!  │   │    └── sequence within the size/length pair
//!  │   └─────── overall length in inches (zero padded)
//!  └─────────── 100 + nominal pipe size in inches
//!
//! 104-020-0001  →  4" pipe size, 20" overall length
//! ```

use bellows_core::{CycleFormat, Part, PartInput};
use chrono::{DateTime, Utc};

/// Nominal pipe sizes in inches.
const PIPE_SIZES_IN: [f64; 7] = [2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 12.0];

/// Overall lengths in inches.
const OVERALL_LENGTHS_IN: [f64; 3] = [8.0, 12.0, 20.0];

const WELD_END_ALLOWANCE_IN: f64 = 4.0;

/// Builds the default catalog with every timestamp set to `now`.
pub fn default_catalog(now: DateTime<Utc>) -> Vec<Part> {
    let mut parts = Vec::with_capacity(PIPE_SIZES_IN.len() * OVERALL_LENGTHS_IN.len());

    for size in PIPE_SIZES_IN {
        for length in OVERALL_LENGTHS_IN {
            parts.push(Part::from_input(standard_part(size, length), now));
        }
    }

    parts
}

fn standard_part(size: f64, length: f64) -> PartInput {
    let live_length = length - WELD_END_ALLOWANCE_IN;
    let large_bore = size >= 8.0;

    // Longer live length buys movement and softens the spring.
    let axial_movement = round3(live_length * 0.0625);
    let lateral_movement = round3(live_length * 0.025);
    let axial_rate = (size * 480.0 / live_length).round();
    let lateral_rate = (size * size * 160.0 / (live_length * live_length)).round();

    PartInput {
        part_number: format!("{:03}-{:03}-0001", 100 + size as u32, length as u32),
        pipe_size_in: size,
        bellows_id_in: size + 0.5,
        bellows_od_in: round3(size + 0.5 + size * 0.25 + 1.0),
        live_length_in: live_length,
        overall_length_in: length,
        pressure_psig: if large_bore { "FV/50" } else { "FV/150" }.to_string(),
        max_allowable_pressure_psig: if large_bore { 75.0 } else { 225.0 },
        temperature_f: "800".to_string(),
        number_of_cycles: "2000".to_string(),
        cycles_format: CycleFormat::NonConcurrent,
        bellows_material: "ASTM A240".to_string(),
        bellows_material_grade: "TP321".to_string(),
        number_of_plys: if large_bore { "2" } else { "1" }.to_string(),
        axial_movement_in: axial_movement,
        axial_spring_rate_lbf_in: axial_rate,
        lateral_movement_in: lateral_movement,
        lateral_spring_rate_lbf_in: lateral_rate,
        angular_movement_deg: if large_bore { 3.0 } else { 5.0 },
        angular_spring_rate_ft_lbs_deg: round3(size * 1.5),
        weld_neck_material: "ASTM A106".to_string(),
        weld_neck_grade: "GR B".to_string(),
        image_url: None,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellows_core::validation::{validate_part_input, validate_part_number};
    use std::collections::HashSet;

    #[test]
    fn test_part_numbers_are_unique_and_valid() {
        let catalog = default_catalog(Utc::now());
        assert_eq!(catalog.len(), 21);

        let numbers: HashSet<&str> = catalog.iter().map(|p| p.part_number.as_str()).collect();
        assert_eq!(numbers.len(), catalog.len());

        for part in &catalog {
            validate_part_number(&part.part_number).unwrap();
        }
        assert!(numbers.contains("104-020-0001"));
        assert!(numbers.contains("112-008-0001"));
    }

    #[test]
    fn test_parts_pass_admin_validation() {
        let now = Utc::now();
        for size in PIPE_SIZES_IN {
            for length in OVERALL_LENGTHS_IN {
                let input = standard_part(size, length);
                validate_part_input(&input).unwrap();
                assert!(input.live_length_in > 0.0);
                assert_eq!(Part::from_input(input, now).created_at, now);
            }
        }
    }
}
