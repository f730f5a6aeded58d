//! # Measure Normalizer
//!
//! Splits the free-text "measure" attached to a recipe ingredient
//! (e.g. "2 cups", "1.5 tbsp", "pinch") into a numeric quantity and a unit.
//!
//! Only a plain leading decimal number is recognised. Fractions such as
//! "1/2 cup" are left untouched and reported as quantity 0 with the whole
//! text as the unit.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Leading numeric token of a measure
pub const LEADING_NUMBER_PATTERN: &str = r"^(\d+(?:\.\d+)?)";

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(LEADING_NUMBER_PATTERN).expect("Leading number pattern should be valid");
}

/// Quantity and unit extracted from a measure string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMeasure {
    /// Leading number, or 0 when the measure does not start with one
    pub quantity: f64,
    /// Whatever follows the number, trimmed
    pub unit: String,
}

impl ParsedMeasure {
    /// Whether a usable numeric quantity was found
    pub fn has_quantity(&self) -> bool {
        self.quantity > 0.0
    }
}

/// Parse a measure string into quantity and unit.
///
/// ```rust
/// use meal_planner::measure::parse_measure;
///
/// let parsed = parse_measure("1.5 tbsp");
/// assert_eq!(parsed.quantity, 1.5);
/// assert_eq!(parsed.unit, "tbsp");
///
/// let parsed = parse_measure("1/2 cup");
/// assert_eq!(parsed.quantity, 0.0);
/// assert_eq!(parsed.unit, "1/2 cup");
/// ```
pub fn parse_measure(measure: &str) -> ParsedMeasure {
    let measure = measure.trim();

    if let Some(number) = LEADING_NUMBER.find(measure) {
        let rest = &measure[number.end()..];
        // "1/2" is a fraction, not the number 1
        if !rest.starts_with('/') {
            if let Ok(quantity) = number.as_str().parse::<f64>() {
                let unit = rest.trim().to_string();
                trace!("Parsed measure '{}' as {} '{}'", measure, quantity, unit);
                return ParsedMeasure { quantity, unit };
            }
        }
    }

    ParsedMeasure {
        quantity: 0.0,
        unit: measure.to_string(),
    }
}

/// Quantity part of a measure, 0 when absent
pub fn extract_quantity(measure: &str) -> f64 {
    parse_measure(measure).quantity
}

/// Unit part of a measure
pub fn extract_unit(measure: &str) -> String {
    parse_measure(measure).unit
}
