//! # Configurator State Machine
//!
//! One [`Configuration`] value per browser session, mutated only through
//! [`ConfiguratorEvent`]s applied by a [`Configurator`].
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐  type dia/len   ┌──────────┐  select part  ┌────────────┐ │
//! │   │  Empty  │ ──────────────► │ Querying │ ────────────► │PartSelected│ │
//! │   └─────────┘                 └──────────┘               └─────┬──────┘ │
//! │        ▲                        ▲     ▲                        │        │
//! │        │ clear queries          │     │ edit dia/len     edit a spec    │
//! │        │                        │     │ (full reset)     field          │
//! │        └────────────────────────┘     │                        ▼        │
//! │                                       │                  ┌──────────┐   │
//! │                                       └───────────────── │Customized│   │
//! │                                                          └──────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Editing the diameter or length query, or clearing the part number,
//!   drops the selected part and resets every specification field.
//! - Selecting a part re-seeds the queries and every specification field
//!   from the part's canonical data, overwriting manual edits.
//! - Changing the temperature unit with a part selected re-derives the
//!   temperature from the part's canonical °F; without a part the text on
//!   screen is converted once.
//! - Toggling a movement axis never touches its base values or units.
//! - `Customized` is computed against the selected part: a field edited
//!   back to the part's value returns the session to `PartSelected`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::selection::{find_part, SelectionQuery, SelectionView};
use crate::types::{ApplicationCategory, CatalogOptions, CuffType, CycleFormat, Part};
use crate::units::{
    self, format_plain, parse_value, AngularSpringRateUnit, DisplayUnit, LengthUnit,
    MovementUnit, PressureUnit, SpringRateUnit, TemperatureUnit,
};

// =============================================================================
// Movement Axes
// =============================================================================

/// Axial or lateral movement. Base values are canonical text (in, lbf/in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinearAxis {
    pub enabled: bool,
    pub movement_in: String,
    pub movement_unit: MovementUnit,
    pub spring_rate_lbf_in: String,
    pub spring_unit: SpringRateUnit,
}

impl Default for LinearAxis {
    fn default() -> Self {
        LinearAxis {
            enabled: false,
            movement_in: "0".to_string(),
            movement_unit: MovementUnit::default(),
            spring_rate_lbf_in: "0".to_string(),
            spring_unit: SpringRateUnit::default(),
        }
    }
}

impl LinearAxis {
    /// Movement in the axis' display unit, with the unit label.
    pub fn display_movement(&self) -> String {
        format!(
            "{} {}",
            units::movement_to_display(parse_value(&self.movement_in), self.movement_unit),
            self.movement_unit.label()
        )
    }

    /// Spring rate in the axis' display unit, with the unit label.
    pub fn display_spring_rate(&self) -> String {
        format!(
            "{} {}",
            units::spring_rate_to_display(parse_value(&self.spring_rate_lbf_in), self.spring_unit),
            self.spring_unit.label()
        )
    }

    fn seed(&mut self, movement_in: f64, spring_rate_lbf_in: f64) {
        self.movement_in = format_plain(movement_in);
        self.spring_rate_lbf_in = format_plain(spring_rate_lbf_in);
    }
}

/// Angular movement. Base values are canonical text (deg, ft·lbs/deg).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AngularAxis {
    pub enabled: bool,
    pub movement_deg: String,
    pub spring_rate_ft_lbs_deg: String,
    pub spring_unit: AngularSpringRateUnit,
}

impl Default for AngularAxis {
    fn default() -> Self {
        AngularAxis {
            enabled: false,
            movement_deg: "0".to_string(),
            spring_rate_ft_lbs_deg: "0".to_string(),
            spring_unit: AngularSpringRateUnit::default(),
        }
    }
}

impl AngularAxis {
    pub fn display_movement(&self) -> String {
        format!("{} Deg", self.movement_deg)
    }

    pub fn display_spring_rate(&self) -> String {
        format!(
            "{} {}",
            units::angular_spring_rate_to_display(
                parse_value(&self.spring_rate_ft_lbs_deg),
                self.spring_unit
            ),
            self.spring_unit.label()
        )
    }
}

/// Names one of the three movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Axial,
    Lateral,
    Angular,
}

/// Names one of the two axes that carry a distance unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LinearAxisKind {
    Axial,
    Lateral,
}

// =============================================================================
// Contact Details
// =============================================================================

/// Who is asking for the quote and where it ships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ContactDetails {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

// =============================================================================
// Configuration
// =============================================================================

/// The current configuration of one configurator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Configuration {
    pub selected_part: Option<String>,
    pub query: SelectionQuery,

    pub pressure: String,
    pub pressure_unit: PressureUnit,
    pub temperature: String,
    pub temperature_unit: TemperatureUnit,
    pub cycles: String,
    pub cycle_format: CycleFormat,
    pub material_spec: String,
    pub material_grade: String,
    pub plys: String,

    pub axial: LinearAxis,
    pub lateral: LinearAxis,
    pub angular: AngularAxis,

    pub cuff: CuffType,
    pub application: Option<ApplicationCategory>,
    pub custom_application: String,

    pub contact: ContactDetails,
}

impl Configuration {
    /// A blank configuration using the option defaults.
    pub fn new(options: &CatalogOptions) -> Self {
        Configuration {
            selected_part: None,
            query: SelectionQuery::default(),
            pressure: String::new(),
            pressure_unit: PressureUnit::Psig,
            temperature: String::new(),
            temperature_unit: TemperatureUnit::Fahrenheit,
            cycles: String::new(),
            cycle_format: CycleFormat::NonConcurrent,
            material_spec: String::new(),
            material_grade: String::new(),
            plys: String::new(),
            axial: LinearAxis::default(),
            lateral: LinearAxis::default(),
            angular: AngularAxis::default(),
            cuff: options.default_cuff(),
            application: None,
            custom_application: String::new(),
            contact: ContactDetails::default(),
        }
    }

    /// The application text shown to humans: free text when `Other`.
    pub fn application_text(&self) -> String {
        match self.application {
            Some(ApplicationCategory::Other) => self.custom_application.clone(),
            Some(category) => category.label().to_string(),
            None => String::new(),
        }
    }

    fn linear_axis_mut(&mut self, kind: LinearAxisKind) -> &mut LinearAxis {
        match kind {
            LinearAxisKind::Axial => &mut self.axial,
            LinearAxisKind::Lateral => &mut self.lateral,
        }
    }

    /// Resets every specification field. Queries, contact details and the
    /// axis base values and units are kept.
    fn reset_specification(&mut self, options: &CatalogOptions) {
        self.pressure.clear();
        self.pressure_unit = PressureUnit::Psig;
        self.temperature.clear();
        self.temperature_unit = TemperatureUnit::Fahrenheit;
        self.cycles.clear();
        self.cycle_format = CycleFormat::NonConcurrent;
        self.material_spec.clear();
        self.material_grade.clear();
        self.plys.clear();
        self.axial.enabled = false;
        self.lateral.enabled = false;
        self.angular.enabled = false;
        self.application = None;
        self.custom_application.clear();
        self.cuff = options.default_cuff();
    }

    /// Re-seeds queries and specification fields from a part's canonical data.
    fn seed_from_part(&mut self, part: &Part) {
        self.selected_part = Some(part.part_number.clone());
        self.query.diameter = units::length_to_display(part.pipe_size_in, self.query.diameter_unit);
        self.query.length = units::length_to_display(part.overall_length_in, self.query.length_unit);

        self.pressure = part.pressure_psig.clone();
        self.pressure_unit = PressureUnit::Psig;
        self.temperature = units::temperature_to_display(&part.temperature_f, self.temperature_unit);
        self.cycles = part.number_of_cycles.clone();
        self.cycle_format = part.cycles_format;
        self.material_spec = part.bellows_material.clone();
        self.material_grade = part.bellows_material_grade.clone();
        self.plys = part.number_of_plys.clone();

        self.axial
            .seed(part.axial_movement_in, part.axial_spring_rate_lbf_in);
        self.lateral
            .seed(part.lateral_movement_in, part.lateral_spring_rate_lbf_in);
        self.angular.movement_deg = format_plain(part.angular_movement_deg);
        self.angular.spring_rate_ft_lbs_deg = format_plain(part.angular_spring_rate_ft_lbs_deg);
    }

    /// True when any specification field differs from what selecting `part`
    /// would show in the current display units. Enabling or disabling an
    /// axis and choosing a movement display unit do not count.
    fn differs_from(&self, part: &Part) -> bool {
        let seeded_pressure =
            units::convert_pressure_text(&part.pressure_psig, PressureUnit::Psig, self.pressure_unit);
        let seeded_temperature =
            units::temperature_to_display(&part.temperature_f, self.temperature_unit);

        self.pressure != seeded_pressure
            || self.temperature != seeded_temperature
            || self.cycles != part.number_of_cycles
            || self.cycle_format != part.cycles_format
            || self.material_spec != part.bellows_material
            || self.material_grade != part.bellows_material_grade
            || self.plys != part.number_of_plys
            || self.axial.movement_in != format_plain(part.axial_movement_in)
            || self.axial.spring_rate_lbf_in != format_plain(part.axial_spring_rate_lbf_in)
            || self.lateral.movement_in != format_plain(part.lateral_movement_in)
            || self.lateral.spring_rate_lbf_in != format_plain(part.lateral_spring_rate_lbf_in)
            || self.angular.movement_deg != format_plain(part.angular_movement_deg)
            || self.angular.spring_rate_ft_lbs_deg
                != format_plain(part.angular_spring_rate_ft_lbs_deg)
    }
}

/// Where a configuration is in its lifecycle. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConfiguratorPhase {
    Empty,
    Querying,
    PartSelected,
    Customized,
}

// =============================================================================
// Events
// =============================================================================

/// Every user action the configurator reacts to.
///
/// Axis base values (`SetMovement`, `SetSpringRate`) are canonical text:
/// inches, lbf/in, degrees or ft·lbs/deg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfiguratorEvent {
    SetDiameterQuery { value: String },
    SetLengthQuery { value: String },
    SetDiameterUnit { unit: LengthUnit },
    SetLengthUnit { unit: LengthUnit },
    /// An empty part number clears the selection.
    SelectPart { part_number: String },

    SetPressure { value: String },
    SetPressureUnit { unit: PressureUnit },
    SetTemperature { value: String },
    SetTemperatureUnit { unit: TemperatureUnit },
    SetCycles { value: String },
    SetCycleFormat { format: CycleFormat },
    SetMaterialSpec { value: String },
    SetMaterialGrade { value: String },
    SetPlys { value: String },

    ToggleAxis { axis: Axis, enabled: bool },
    SetMovement { axis: Axis, value: String },
    SetSpringRate { axis: Axis, value: String },
    SetMovementUnit { axis: LinearAxisKind, unit: MovementUnit },
    SetSpringRateUnit { axis: LinearAxisKind, unit: SpringRateUnit },
    SetAngularSpringRateUnit { unit: AngularSpringRateUnit },

    SetCuff { cuff: CuffType },
    SetApplication { category: Option<ApplicationCategory> },
    SetCustomApplication { value: String },
    SetContact { contact: ContactDetails },
}

// =============================================================================
// Configurator
// =============================================================================

/// Owns a [`Configuration`] and the option data it was built with.
#[derive(Debug, Clone)]
pub struct Configurator {
    options: CatalogOptions,
    config: Configuration,
}

impl Configurator {
    pub fn new(options: CatalogOptions) -> Self {
        let config = Configuration::new(&options);
        Configurator { options, config }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Derives the phase. A selected part that has since left the catalog
    /// has no stored values to differ from and stays `PartSelected`.
    pub fn phase(&self, catalog: &[Part]) -> ConfiguratorPhase {
        if self.config.selected_part.is_none() {
            return if self.config.query.is_empty() {
                ConfiguratorPhase::Empty
            } else {
                ConfiguratorPhase::Querying
            };
        }

        match self.selected_part(catalog) {
            Some(part) if self.config.differs_from(part) => ConfiguratorPhase::Customized,
            _ => ConfiguratorPhase::PartSelected,
        }
    }

    /// The selected part, looked up in the given catalog snapshot.
    pub fn selected_part<'a>(&self, catalog: &'a [Part]) -> Option<&'a Part> {
        self.config
            .selected_part
            .as_deref()
            .and_then(|pn| find_part(catalog, pn))
    }

    /// Datalists for the current queries. Recomputed on every call.
    pub fn selection(&self, catalog: &[Part]) -> SelectionView {
        SelectionView::resolve(catalog, &self.config.query)
    }

    /// Applies one event.
    ///
    /// ## Errors
    /// - [`CoreError::PartNotFound`] when `SelectPart` names a part that is
    ///   not in `catalog`. The configuration is left untouched.
    pub fn apply(&mut self, catalog: &[Part], event: ConfiguratorEvent) -> CoreResult<()> {
        let config = &mut self.config;

        match event {
            // -----------------------------------------------------------------
            // Selection
            // -----------------------------------------------------------------
            ConfiguratorEvent::SetDiameterQuery { value } => {
                config.query.diameter = value;
                config.selected_part = None;
                config.reset_specification(&self.options);
            }
            ConfiguratorEvent::SetLengthQuery { value } => {
                config.query.length = value;
                config.selected_part = None;
                config.reset_specification(&self.options);
            }
            ConfiguratorEvent::SetDiameterUnit { unit } => {
                let from = config.query.diameter_unit;
                config.query.diameter = units::convert_display(&config.query.diameter, from, unit);
                config.query.diameter_unit = unit;
            }
            ConfiguratorEvent::SetLengthUnit { unit } => {
                let from = config.query.length_unit;
                config.query.length = units::convert_display(&config.query.length, from, unit);
                config.query.length_unit = unit;
            }
            ConfiguratorEvent::SelectPart { part_number } => {
                if part_number.is_empty() {
                    config.selected_part = None;
                    config.reset_specification(&self.options);
                } else {
                    let part = find_part(catalog, &part_number)
                        .ok_or_else(|| CoreError::PartNotFound(part_number.clone()))?;
                    config.seed_from_part(part);
                }
            }

            // -----------------------------------------------------------------
            // Unit toggles
            // -----------------------------------------------------------------
            ConfiguratorEvent::SetPressureUnit { unit } => {
                config.pressure =
                    units::convert_pressure_text(&config.pressure, config.pressure_unit, unit);
                config.pressure_unit = unit;
            }
            ConfiguratorEvent::SetTemperatureUnit { unit } => {
                let part = config
                    .selected_part
                    .as_deref()
                    .and_then(|pn| find_part(catalog, pn));
                config.temperature = match part {
                    Some(part) => units::temperature_to_display(&part.temperature_f, unit),
                    None => units::convert_temperature_text(
                        &config.temperature,
                        config.temperature_unit,
                        unit,
                    ),
                };
                config.temperature_unit = unit;
            }
            ConfiguratorEvent::SetMovementUnit { axis, unit } => {
                config.linear_axis_mut(axis).movement_unit = unit;
            }
            ConfiguratorEvent::SetSpringRateUnit { axis, unit } => {
                config.linear_axis_mut(axis).spring_unit = unit;
            }
            ConfiguratorEvent::SetAngularSpringRateUnit { unit } => {
                config.angular.spring_unit = unit;
            }

            // -----------------------------------------------------------------
            // Specification fields
            // -----------------------------------------------------------------
            ConfiguratorEvent::SetPressure { value } => config.pressure = value,
            ConfiguratorEvent::SetTemperature { value } => config.temperature = value,
            ConfiguratorEvent::SetCycles { value } => config.cycles = value,
            ConfiguratorEvent::SetCycleFormat { format } => config.cycle_format = format,
            ConfiguratorEvent::SetMaterialSpec { value } => config.material_spec = value,
            ConfiguratorEvent::SetMaterialGrade { value } => config.material_grade = value,
            ConfiguratorEvent::SetPlys { value } => config.plys = value,
            ConfiguratorEvent::ToggleAxis { axis, enabled } => match axis {
                Axis::Axial => config.axial.enabled = enabled,
                Axis::Lateral => config.lateral.enabled = enabled,
                Axis::Angular => config.angular.enabled = enabled,
            },
            ConfiguratorEvent::SetMovement { axis, value } => match axis {
                Axis::Axial => config.axial.movement_in = value,
                Axis::Lateral => config.lateral.movement_in = value,
                Axis::Angular => config.angular.movement_deg = value,
            },
            ConfiguratorEvent::SetSpringRate { axis, value } => match axis {
                Axis::Axial => config.axial.spring_rate_lbf_in = value,
                Axis::Lateral => config.lateral.spring_rate_lbf_in = value,
                Axis::Angular => config.angular.spring_rate_ft_lbs_deg = value,
            },

            // -----------------------------------------------------------------
            // Options and contact
            // -----------------------------------------------------------------
            ConfiguratorEvent::SetCuff { cuff } => config.cuff = cuff,
            ConfiguratorEvent::SetApplication { category } => config.application = category,
            ConfiguratorEvent::SetCustomApplication { value } => config.custom_application = value,
            ConfiguratorEvent::SetContact { contact } => config.contact = contact,
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PartInput;
    use chrono::Utc;

    fn sample_part() -> Part {
        Part::from_input(
            PartInput {
                part_number: "104-020-0001".to_string(),
                pipe_size_in: 4.0,
                overall_length_in: 20.0,
                pressure_psig: "150".to_string(),
                temperature_f: "200".to_string(),
                number_of_cycles: "2000".to_string(),
                cycles_format: CycleFormat::Concurrent,
                bellows_material: "ASTM A240".to_string(),
                bellows_material_grade: "321".to_string(),
                number_of_plys: "2".to_string(),
                axial_movement_in: 1.5,
                axial_spring_rate_lbf_in: 100.0,
                lateral_movement_in: 0.25,
                lateral_spring_rate_lbf_in: 900.0,
                angular_movement_deg: 5.0,
                angular_spring_rate_ft_lbs_deg: 10.0,
                ..PartInput::default()
            },
            Utc::now(),
        )
    }

    fn catalog() -> Vec<Part> {
        vec![sample_part()]
    }

    fn apply(c: &mut Configurator, catalog: &[Part], event: ConfiguratorEvent) {
        c.apply(catalog, event).unwrap();
    }

    fn select(c: &mut Configurator, catalog: &[Part]) {
        apply(
            c,
            catalog,
            ConfiguratorEvent::SelectPart {
                part_number: "104-020-0001".to_string(),
            },
        );
    }

    #[test]
    fn test_phases() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Empty);

        apply(&mut c, &catalog, ConfiguratorEvent::SetDiameterQuery { value: "4.00".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Querying);

        select(&mut c, &catalog);
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);

        apply(&mut c, &catalog, ConfiguratorEvent::SetPressure { value: "175".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Customized);

        apply(&mut c, &catalog, ConfiguratorEvent::SetLengthQuery { value: String::new() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Querying);

        apply(&mut c, &catalog, ConfiguratorEvent::SetDiameterQuery { value: String::new() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Empty);
    }

    #[test]
    fn test_edit_back_to_part_value_is_not_customized() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);

        apply(&mut c, &catalog, ConfiguratorEvent::SetPressure { value: "175".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Customized);

        apply(&mut c, &catalog, ConfiguratorEvent::SetPressure { value: "150".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);

        apply(&mut c, &catalog, ConfiguratorEvent::SetMovement { axis: Axis::Lateral, value: "0.5".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Customized);

        apply(&mut c, &catalog, ConfiguratorEvent::SetMovement { axis: Axis::Lateral, value: "0.25".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);
    }

    #[test]
    fn test_display_only_changes_are_not_customized() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);

        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Axial, enabled: true });
        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Angular, enabled: true });
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetMovementUnit { axis: LinearAxisKind::Axial, unit: MovementUnit::Mm },
        );
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Celsius });
        apply(&mut c, &catalog, ConfiguratorEvent::SetPressureUnit { unit: PressureUnit::Bar });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);

        apply(&mut c, &catalog, ConfiguratorEvent::SetPlys { value: "3".to_string() });
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Customized);

        // Part removed from the catalog after selection
        assert_eq!(c.phase(&[]), ConfiguratorPhase::PartSelected);
    }

    #[test]
    fn test_select_part_seeds_every_field() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        apply(&mut c, &catalog, ConfiguratorEvent::SetMaterialSpec { value: "Inconel".to_string() });
        apply(&mut c, &catalog, ConfiguratorEvent::SetCycles { value: "1".to_string() });

        select(&mut c, &catalog);
        let config = c.configuration();
        assert_eq!(config.selected_part.as_deref(), Some("104-020-0001"));
        assert_eq!(config.query.diameter, "4.00");
        assert_eq!(config.query.length, "20.00");
        assert_eq!(config.pressure, "150");
        assert_eq!(config.pressure_unit, PressureUnit::Psig);
        assert_eq!(config.temperature, "200");
        assert_eq!(config.cycles, "2000");
        assert_eq!(config.cycle_format, CycleFormat::Concurrent);
        assert_eq!(config.material_spec, "ASTM A240");
        assert_eq!(config.material_grade, "321");
        assert_eq!(config.plys, "2");
        assert_eq!(config.axial.movement_in, "1.5");
        assert_eq!(config.lateral.spring_rate_lbf_in, "900");
        assert_eq!(config.angular.movement_deg, "5");
    }

    #[test]
    fn test_select_part_overwrites_manual_edits() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperature { value: "900".to_string() });
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetMovement { axis: Axis::Axial, value: "9".to_string() },
        );

        select(&mut c, &catalog);
        assert_eq!(c.configuration().temperature, "200");
        assert_eq!(c.configuration().axial.movement_in, "1.5");
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);
    }

    #[test]
    fn test_select_part_uses_current_display_units() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        apply(&mut c, &catalog, ConfiguratorEvent::SetDiameterUnit { unit: LengthUnit::Mm });
        apply(&mut c, &catalog, ConfiguratorEvent::SetLengthUnit { unit: LengthUnit::Ft });
        select(&mut c, &catalog);
        assert_eq!(c.configuration().query.diameter, "101.60");
        assert_eq!(c.configuration().query.length, "1.667");
    }

    #[test]
    fn test_unknown_part_is_rejected_without_change() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        let before = c.configuration().clone();
        let result = c.apply(
            &catalog,
            ConfiguratorEvent::SelectPart { part_number: "999-000-0000".to_string() },
        );
        assert!(matches!(result, Err(CoreError::PartNotFound(_))));
        assert_eq!(c.configuration(), &before);
    }

    #[test]
    fn test_query_edit_is_full_reset() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Axial, enabled: true });
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Celsius });
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetApplication { category: Some(ApplicationCategory::Automotive) },
        );
        apply(&mut c, &catalog, ConfiguratorEvent::SetCuff { cuff: CuffType::UCuff });

        apply(&mut c, &catalog, ConfiguratorEvent::SetLengthQuery { value: "12.00".to_string() });

        let config = c.configuration();
        assert_eq!(config.selected_part, None);
        assert!(config.pressure.is_empty());
        assert!(config.temperature.is_empty());
        assert_eq!(config.temperature_unit, TemperatureUnit::Fahrenheit);
        assert!(config.cycles.is_empty());
        assert!(config.material_spec.is_empty());
        assert!(config.plys.is_empty());
        assert!(!config.axial.enabled);
        assert_eq!(config.application, None);
        assert_eq!(config.cuff, CuffType::StraightCuff);
        assert_eq!(config.query.diameter, "4.00");
    }

    #[test]
    fn test_clearing_part_number_resets() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::SelectPart { part_number: String::new() });
        assert_eq!(c.configuration().selected_part, None);
        assert!(c.configuration().pressure.is_empty());
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::Querying);
    }

    #[test]
    fn test_temperature_rederived_from_canonical() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Celsius });
        select(&mut c, &catalog);
        assert_eq!(c.configuration().temperature, "93");

        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Fahrenheit });
        assert_eq!(c.configuration().temperature, "200");
    }

    #[test]
    fn test_temperature_converted_in_place_without_part() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperature { value: "100".to_string() });
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Celsius });
        assert_eq!(c.configuration().temperature, "38");
        apply(&mut c, &catalog, ConfiguratorEvent::SetTemperatureUnit { unit: TemperatureUnit::Fahrenheit });
        assert_eq!(c.configuration().temperature, "100");
    }

    #[test]
    fn test_pressure_unit_toggle_converts_once() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::SetPressureUnit { unit: PressureUnit::Bar });
        assert_eq!(c.configuration().pressure, "10.34");
        assert_eq!(c.phase(&catalog), ConfiguratorPhase::PartSelected);
    }

    #[test]
    fn test_diameter_unit_toggle_keeps_selection() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::SetDiameterUnit { unit: LengthUnit::Mm });
        assert_eq!(c.configuration().query.diameter, "101.60");
        assert_eq!(c.configuration().selected_part.as_deref(), Some("104-020-0001"));
        assert_eq!(c.selection(&catalog).part_numbers, vec!["104-020-0001"]);
    }

    #[test]
    fn test_axis_toggle_preserves_base_value_and_unit() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Axial, enabled: true });
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetMovement { axis: Axis::Axial, value: "2.25".to_string() },
        );
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetMovementUnit { axis: LinearAxisKind::Axial, unit: MovementUnit::Mm },
        );

        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Axial, enabled: false });
        apply(&mut c, &catalog, ConfiguratorEvent::ToggleAxis { axis: Axis::Axial, enabled: true });

        let axial = &c.configuration().axial;
        assert!(axial.enabled);
        assert_eq!(axial.movement_in, "2.25");
        assert_eq!(axial.movement_unit, MovementUnit::Mm);
        assert_eq!(axial.display_movement(), "57.150 mm");
    }

    #[test]
    fn test_axis_display_strings() {
        let catalog = catalog();
        let mut c = Configurator::new(CatalogOptions::default());
        select(&mut c, &catalog);
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetSpringRateUnit { axis: LinearAxisKind::Axial, unit: SpringRateUnit::NPerMm },
        );
        apply(
            &mut c,
            &catalog,
            ConfiguratorEvent::SetAngularSpringRateUnit { unit: AngularSpringRateUnit::NmPerDeg },
        );

        let config = c.configuration();
        assert_eq!(config.axial.display_movement(), "1.500 in");
        assert_eq!(config.axial.display_spring_rate(), "17.513 N/mm");
        assert_eq!(config.lateral.display_spring_rate(), "900 LBF/IN");
        assert_eq!(config.angular.display_movement(), "5 Deg");
        assert_eq!(config.angular.display_spring_rate(), "13.558 n-m/deg");
    }

    #[test]
    fn test_application_text() {
        let options = CatalogOptions::default();
        let mut config = Configuration::new(&options);
        assert_eq!(config.application_text(), "");

        config.application = Some(ApplicationCategory::PowerGeneration);
        assert_eq!(config.application_text(), "Power Generation");

        config.application = Some(ApplicationCategory::Other);
        config.custom_application = "Cryogenic test stand".to_string();
        assert_eq!(config.application_text(), "Cryogenic test stand");
    }

    #[test]
    fn test_event_json_shape() {
        let event: ConfiguratorEvent =
            serde_json::from_str(r#"{"type":"set_diameter_unit","unit":"MM"}"#).unwrap();
        assert_eq!(event, ConfiguratorEvent::SetDiameterUnit { unit: LengthUnit::Mm });

        let event: ConfiguratorEvent =
            serde_json::from_str(r#"{"type":"toggle_axis","axis":"lateral","enabled":true}"#)
                .unwrap();
        assert_eq!(event, ConfiguratorEvent::ToggleAxis { axis: Axis::Lateral, enabled: true });
    }
}
