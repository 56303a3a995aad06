//! Slider value tables — formatted `[v v v ...]` lists for a config UI.

use crate::error::{Error, Result};
use serde::Serialize;

/// Hard cap on generated values; anything larger is a mistyped step.
const MAX_VALUES: i64 = 100_000;

/// Highest accepted precision.
const MAX_DECIMAL_PLACES: usize = 12;

#[derive(Debug, Clone, Serialize)]
pub struct SliderSpec {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub decimal_places: usize,
}

impl SliderSpec {
    fn validate(&self) -> Result<()> {
        for (field, value) in [("start", self.start), ("end", self.end), ("step", self.step)] {
            if !value.is_finite() {
                return Err(Error::validation_invalid_argument(
                    field,
                    format!("{} must be a finite number", field),
                    Some(value.to_string()),
                    None,
                ));
            }
        }

        if self.step == 0.0 {
            return Err(Error::validation_invalid_argument(
                "step",
                "Step must be non-zero",
                Some("0".to_string()),
                None,
            ));
        }

        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(Error::validation_invalid_argument(
                "decimal_places",
                format!("Decimal places capped at {}", MAX_DECIMAL_PLACES),
                Some(self.decimal_places.to_string()),
                None,
            ));
        }

        Ok(())
    }

    /// Number of values in the range. Truncated, not rounded, so a step
    /// that does not divide the range evenly stops short of `end`.
    fn count(&self) -> i64 {
        ((self.end - self.start) / self.step + 1.0) as i64
    }
}

/// Format the slider range as a space-separated, bracket-wrapped list.
/// An empty range (end unreachable from start with this step) is `[]`.
pub fn format_values(spec: &SliderSpec) -> Result<String> {
    spec.validate()?;

    let count = spec.count();
    if count > MAX_VALUES {
        return Err(Error::validation_invalid_argument(
            "step",
            format!("Range would produce {} values (cap {})", count, MAX_VALUES),
            Some(spec.step.to_string()),
            Some("Use a coarser step".to_string()),
        ));
    }

    let values: Vec<String> = (0..count.max(0))
        .map(|i| format!("{:.*}", spec.decimal_places, i as f64 * spec.step + spec.start))
        .collect();

    Ok(format!("[{}]", values.join(" ")))
}
