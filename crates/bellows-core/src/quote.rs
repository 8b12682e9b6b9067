//! # Quote Display & Payload
//!
//! Turns a [`Configuration`] into the human-readable strings shared by the
//! quote notification and the exported document.
//!
//! ```text
//!   Configuration ──► ConfigurationDisplay ──┬──► QuotePayload (JSON, fixed keys)
//!                                            └──► document layout
//! ```
//!
//! Both outputs read the same [`ConfigurationDisplay`], so the e-mail and the
//! document can never disagree about a value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::configurator::{Configuration, ContactDetails};
use crate::error::ValidationError;
use crate::units::DisplayUnit;
use crate::validation::validate_contact;

/// Placeholder used by every movement summary when its axis is disabled.
pub const NO_MOVEMENT: &str = "None";

// =============================================================================
// Display Strings
// =============================================================================

/// Movement and rate of one enabled axis, each with its unit label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MovementDisplay {
    pub movement: String,
    pub rate: String,
}

impl MovementDisplay {
    /// `"<movement> (Rate: <rate>)"`.
    pub fn summary(&self) -> String {
        format!("{} (Rate: {})", self.movement, self.rate)
    }
}

fn movement_summary(movement: &Option<MovementDisplay>) -> String {
    movement
        .as_ref()
        .map(MovementDisplay::summary)
        .unwrap_or_else(|| NO_MOVEMENT.to_string())
}

/// Resolved display strings for every visible field of a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConfigurationDisplay {
    pub part_number: Option<String>,
    pub nominal_diameter: String,
    pub overall_length: String,
    pub end_configuration: String,
    pub application: String,
    pub plys: String,
    pub pressure: String,
    pub temperature: String,
    pub cycles: String,
    pub material: String,
    /// `None` when the axis is disabled.
    pub axial: Option<MovementDisplay>,
    pub lateral: Option<MovementDisplay>,
    pub angular: Option<MovementDisplay>,
    pub contact: ContactDetails,
}

impl ConfigurationDisplay {
    pub fn from_configuration(config: &Configuration) -> Self {
        let query = &config.query;

        let axial = config.axial.enabled.then(|| MovementDisplay {
            movement: config.axial.display_movement(),
            rate: config.axial.display_spring_rate(),
        });
        let lateral = config.lateral.enabled.then(|| MovementDisplay {
            movement: config.lateral.display_movement(),
            rate: config.lateral.display_spring_rate(),
        });
        let angular = config.angular.enabled.then(|| MovementDisplay {
            movement: config.angular.display_movement(),
            rate: config.angular.display_spring_rate(),
        });

        ConfigurationDisplay {
            part_number: config.selected_part.clone(),
            nominal_diameter: format!("{} {}", query.diameter, query.diameter_unit.label()),
            overall_length: format!("{} {}", query.length, query.length_unit.label()),
            end_configuration: config.cuff.label().to_string(),
            application: config.application_text(),
            plys: config.plys.clone(),
            pressure: format!("{} {}", config.pressure, config.pressure_unit.label()),
            temperature: format!("{} {}", config.temperature, config.temperature_unit.label()),
            cycles: format!("{} ({})", config.cycles, config.cycle_format.label()),
            material: format!("{} {}", config.material_spec, config.material_grade),
            axial,
            lateral,
            angular,
            contact: config.contact.clone(),
        }
    }

    pub fn axial_summary(&self) -> String {
        movement_summary(&self.axial)
    }

    pub fn lateral_summary(&self) -> String {
        movement_summary(&self.lateral)
    }

    pub fn angular_summary(&self) -> String {
        movement_summary(&self.angular)
    }

    /// `address, city, postal, country` exactly as entered.
    pub fn location(&self) -> String {
        let c = &self.contact;
        format!("{}, {}, {}, {}", c.address, c.city, c.postal_code, c.country)
    }
}

// =============================================================================
// Quote Payload
// =============================================================================

/// The flat JSON object posted to the quote notification endpoint.
///
/// Key names are part of the contract with the mail relay and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotePayload {
    #[serde(rename = "_subject")]
    pub subject: String,
    #[serde(rename = "_replyto")]
    pub reply_to: String,
    pub recipient: String,
    #[serde(rename = "Lead_Source")]
    pub lead_source: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    #[serde(rename = "Customer_Name")]
    pub customer_name: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Part_Number")]
    pub part_number: String,
    #[serde(rename = "Nominal_Diameter")]
    pub nominal_diameter: String,
    #[serde(rename = "Overall_Length")]
    pub overall_length: String,
    #[serde(rename = "End_Configuration")]
    pub end_configuration: String,
    #[serde(rename = "Application")]
    pub application: String,
    #[serde(rename = "Design_Pressure")]
    pub design_pressure: String,
    #[serde(rename = "Design_Temperature")]
    pub design_temperature: String,
    #[serde(rename = "Required_Cycles")]
    pub required_cycles: String,
    #[serde(rename = "Material_Spec")]
    pub material_spec: String,

    #[serde(rename = "Axial_Movement")]
    pub axial_movement: String,
    #[serde(rename = "Lateral_Movement")]
    pub lateral_movement: String,
    #[serde(rename = "Angular_Movement")]
    pub angular_movement: String,
}

impl QuotePayload {
    /// Assembles the payload.
    ///
    /// ## Errors
    /// Contact name and e-mail are required. Nothing else is checked.
    pub fn build(
        display: &ConfigurationDisplay,
        recipient: &str,
        lead_source: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_contact(&display.contact)?;

        let contact = &display.contact;
        let subject_part = display.part_number.as_deref().unwrap_or("Custom");

        Ok(QuotePayload {
            subject: format!("New Configurator Inquiry: {} from {}", subject_part, contact.name),
            reply_to: contact.email.clone(),
            recipient: recipient.to_string(),
            lead_source: lead_source.to_string(),
            timestamp: timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            customer_name: contact.name.clone(),
            company: contact.company.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            location: display.location(),
            part_number: display
                .part_number
                .clone()
                .unwrap_or_else(|| "Custom Configuration".to_string()),
            nominal_diameter: display.nominal_diameter.clone(),
            overall_length: display.overall_length.clone(),
            end_configuration: display.end_configuration.clone(),
            application: display.application.clone(),
            design_pressure: display.pressure.clone(),
            design_temperature: display.temperature.clone(),
            required_cycles: display.cycles.clone(),
            material_spec: display.material.clone(),
            axial_movement: display.axial_summary(),
            lateral_movement: display.lateral_summary(),
            angular_movement: display.angular_summary(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
