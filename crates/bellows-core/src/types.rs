//! # Domain Types
//!
//! Core domain types used throughout the bellows configurator.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │        Part         │   │   CycleFormat   │   │    CuffType     │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  part_number (key)  │   │  NonConcurrent  │   │  Straight       │   │
//! │  │  pipe_size_in       │   │  Concurrent     │   │  U              │   │
//! │  │  overall_length_in  │   └─────────────────┘   │  Without        │   │
//! │  │  temperature_f      │                         │  Truncated      │   │
//! │  │  spring rates ...   │   ┌─────────────────┐   └─────────────────┘   │
//! │  └─────────────────────┘   │ Application     │                         │
//! │                            │ Category        │   CatalogOptions        │
//! │                            │ Oil & Gas ...   │   (static option data)  │
//! │                            │ Other           │                         │
//! │                            └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Units
//! Every numeric field is stored in exactly one unit: inches, PSIG, °F,
//! lbf/in and ft·lbs/deg. Field names carry the unit suffix so a reader
//! never has to guess. Display units live in [`crate::units`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Part
// =============================================================================

/// An immutable catalog record for one bellows assembly.
///
/// `part_number` is unique within the catalog and has the form `NNN-NNN-NNNN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Part {
    /// Business key, `NNN-NNN-NNNN`.
    pub part_number: String,

    /// Nominal pipe size (in).
    pub pipe_size_in: f64,

    /// Bellows inside diameter (in).
    pub bellows_id_in: f64,

    /// Bellows outside diameter (in).
    pub bellows_od_in: f64,

    /// Live (convoluted) length (in).
    pub live_length_in: f64,

    /// Overall length including cuffs (in).
    pub overall_length_in: f64,

    /// Pressure rating in PSIG. Free text: may carry a prefix such as `FV/`.
    pub pressure_psig: String,

    /// Maximum allowable working pressure (PSIG).
    pub max_allowable_pressure_psig: f64,

    /// Temperature rating in °F, as entered.
    pub temperature_f: String,

    /// Rated cycle count, as entered.
    pub number_of_cycles: String,

    /// Whether the rated movements occur together.
    pub cycles_format: CycleFormat,

    /// Material specification (e.g. `ASTM A240`).
    pub bellows_material: String,

    /// Material grade (e.g. `321`).
    pub bellows_material_grade: String,

    /// Ply count, as entered.
    pub number_of_plys: String,

    /// Rated axial movement (in).
    pub axial_movement_in: f64,

    /// Axial spring rate (lbf/in).
    pub axial_spring_rate_lbf_in: f64,

    /// Rated lateral movement (in).
    pub lateral_movement_in: f64,

    /// Lateral spring rate (lbf/in).
    pub lateral_spring_rate_lbf_in: f64,

    /// Rated angular movement (deg).
    pub angular_movement_deg: f64,

    /// Angular spring rate (ft·lbs/deg).
    pub angular_spring_rate_ft_lbs_deg: f64,

    /// Weld-neck material specification.
    pub weld_neck_material: String,

    /// Weld-neck material grade.
    pub weld_neck_grade: String,

    /// Public URL of the product photo, if one was uploaded.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Part {
    /// Creates a part record from admin form input.
    ///
    /// Timestamps are passed in so this stays free of clock access.
    pub fn from_input(input: PartInput, now: DateTime<Utc>) -> Self {
        Part {
            part_number: input.part_number,
            pipe_size_in: input.pipe_size_in,
            bellows_id_in: input.bellows_id_in,
            bellows_od_in: input.bellows_od_in,
            live_length_in: input.live_length_in,
            overall_length_in: input.overall_length_in,
            pressure_psig: input.pressure_psig,
            max_allowable_pressure_psig: input.max_allowable_pressure_psig,
            temperature_f: input.temperature_f,
            number_of_cycles: input.number_of_cycles,
            cycles_format: input.cycles_format,
            bellows_material: input.bellows_material,
            bellows_material_grade: input.bellows_material_grade,
            number_of_plys: input.number_of_plys,
            axial_movement_in: input.axial_movement_in,
            axial_spring_rate_lbf_in: input.axial_spring_rate_lbf_in,
            lateral_movement_in: input.lateral_movement_in,
            lateral_spring_rate_lbf_in: input.lateral_spring_rate_lbf_in,
            angular_movement_deg: input.angular_movement_deg,
            angular_spring_rate_ft_lbs_deg: input.angular_spring_rate_ft_lbs_deg,
            weld_neck_material: input.weld_neck_material,
            weld_neck_grade: input.weld_neck_grade,
            image_url: input.image_url.filter(|url| !url.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive match on part number or material, used by the admin list.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.part_number.to_lowercase().contains(&term)
            || self.bellows_material.to_lowercase().contains(&term)
    }
}

/// The editable fields of a [`Part`], as submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PartInput {
    pub part_number: String,
    pub pipe_size_in: f64,
    pub bellows_id_in: f64,
    pub bellows_od_in: f64,
    pub live_length_in: f64,
    pub overall_length_in: f64,
    pub pressure_psig: String,
    pub max_allowable_pressure_psig: f64,
    pub temperature_f: String,
    pub number_of_cycles: String,
    pub cycles_format: CycleFormat,
    pub bellows_material: String,
    pub bellows_material_grade: String,
    pub number_of_plys: String,
    pub axial_movement_in: f64,
    pub axial_spring_rate_lbf_in: f64,
    pub lateral_movement_in: f64,
    pub lateral_spring_rate_lbf_in: f64,
    pub angular_movement_deg: f64,
    pub angular_spring_rate_ft_lbs_deg: f64,
    pub weld_neck_material: String,
    pub weld_neck_grade: String,
    pub image_url: Option<String>,
}

impl Default for PartInput {
    fn default() -> Self {
        PartInput {
            part_number: String::new(),
            pipe_size_in: 0.0,
            bellows_id_in: 0.0,
            bellows_od_in: 0.0,
            live_length_in: 0.0,
            overall_length_in: 0.0,
            pressure_psig: String::new(),
            max_allowable_pressure_psig: 0.0,
            temperature_f: String::new(),
            number_of_cycles: String::new(),
            cycles_format: CycleFormat::default(),
            bellows_material: String::new(),
            bellows_material_grade: String::new(),
            number_of_plys: String::new(),
            axial_movement_in: 0.0,
            axial_spring_rate_lbf_in: 0.0,
            lateral_movement_in: 0.0,
            lateral_spring_rate_lbf_in: 0.0,
            angular_movement_deg: 0.0,
            angular_spring_rate_ft_lbs_deg: 0.0,
            weld_neck_material: String::new(),
            weld_neck_grade: String::new(),
            image_url: None,
        }
    }
}

// =============================================================================
// Cycle Format
// =============================================================================

/// Whether rated movements are applied together or one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CycleFormat {
    #[default]
    NonConcurrent,
    Concurrent,
}

impl CycleFormat {
    /// Label used in display strings and documents.
    pub fn label(&self) -> &'static str {
        match self {
            CycleFormat::NonConcurrent => "Non-concurrent",
            CycleFormat::Concurrent => "Concurrent",
        }
    }
}

// =============================================================================
// Cuff Type
// =============================================================================

/// End configuration at each end of the bellows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CuffType {
    /// Straight cuff on both ends.
    StraightCuff,
    /// U-shaped cuff on both ends.
    UCuff,
    /// Convolutions only, no cuffs.
    WithoutCuffs,
    /// Convolutions cut at the root.
    Truncated,
}

impl CuffType {
    /// All cuff types in catalog order.
    pub const ALL: [CuffType; 4] = [
        CuffType::StraightCuff,
        CuffType::UCuff,
        CuffType::WithoutCuffs,
        CuffType::Truncated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CuffType::StraightCuff => "STRAIGHT CUFF BOTH ENDS",
            CuffType::UCuff => "U CUFF BOTH ENDS",
            CuffType::WithoutCuffs => "WITHOUT CUFFS",
            CuffType::Truncated => "TRUNCATED CONVOLUTIONS",
        }
    }
}

// =============================================================================
// Application Category
// =============================================================================

/// Industry the bellows will be used in.
///
/// `Other` is paired with free text held by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationCategory {
    OilAndGas,
    PowerGeneration,
    AerospaceSpaceDefense,
    MarineExpansionJoints,
    IndustrialOem,
    WaterWastewater,
    Automotive,
    PulpAndPaper,
    Other,
}

impl ApplicationCategory {
    pub const ALL: [ApplicationCategory; 9] = [
        ApplicationCategory::OilAndGas,
        ApplicationCategory::PowerGeneration,
        ApplicationCategory::AerospaceSpaceDefense,
        ApplicationCategory::MarineExpansionJoints,
        ApplicationCategory::IndustrialOem,
        ApplicationCategory::WaterWastewater,
        ApplicationCategory::Automotive,
        ApplicationCategory::PulpAndPaper,
        ApplicationCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationCategory::OilAndGas => "Oil & Gas",
            ApplicationCategory::PowerGeneration => "Power Generation",
            ApplicationCategory::AerospaceSpaceDefense => "Aerospace, Space and Defense",
            ApplicationCategory::MarineExpansionJoints => "Marine Bellows and Expansion Joints",
            ApplicationCategory::IndustrialOem => "Industrial and OEM",
            ApplicationCategory::WaterWastewater => "Water and Wastewater",
            ApplicationCategory::Automotive => "Automotive",
            ApplicationCategory::PulpAndPaper => "Pulp and Paper",
            ApplicationCategory::Other => "Other",
        }
    }
}

// =============================================================================
// Catalog Options
// =============================================================================

/// Static option lists offered by the configurator.
///
/// Injected into [`crate::Configurator`] instead of living in globals, so a
/// deployment can narrow the lists without touching the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogOptions {
    /// Cuff types in display order. The first entry is the reset default.
    pub cuff_types: Vec<CuffType>,

    /// Application categories in display order.
    pub applications: Vec<ApplicationCategory>,
}

impl CatalogOptions {
    /// The cuff type a fresh or reset configuration starts with.
    pub fn default_cuff(&self) -> CuffType {
        self.cuff_types
            .first()
            .copied()
            .unwrap_or(CuffType::StraightCuff)
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            cuff_types: CuffType::ALL.to_vec(),
            applications: ApplicationCategory::ALL.to_vec(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
