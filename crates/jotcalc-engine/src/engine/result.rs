//! The engine's output type.
//!
//! Every call to [`super::calculate`] builds a fresh [`CalculationResult`].
//! Consumers match on the variant; there are no optional fields to probe.

use serde::Serialize;
use std::fmt;

use super::error::EvalError;
use super::expr::OperationLabel;
use super::format::{NumberLocale, format_result};
use crate::timezone::{ZoneId, ZoneTime};

/// Discriminant of [`CalculationResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Single,
    Horizontal,
    Vertical,
    Mixed,
    Timezone,
    Error,
}

impl CalculationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationKind::Single => "single",
            CalculationKind::Horizontal => "horizontal",
            CalculationKind::Vertical => "vertical",
            CalculationKind::Mixed => "mixed",
            CalculationKind::Timezone => "timezone",
            CalculationKind::Error => "error",
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric result over one or more operands.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Calculation {
    pub numbers: Vec<f64>,
    pub result: f64,
    pub operation: OperationLabel,
    pub formatted: String,
    pub original: String,
}

impl Calculation {
    pub fn new(
        numbers: Vec<f64>,
        result: f64,
        operation: OperationLabel,
        original: &str,
        locale: &NumberLocale,
    ) -> Calculation {
        Calculation {
            numbers,
            result,
            operation,
            formatted: format_result(result, locale),
            original: original.to_string(),
        }
    }
}

/// The result of one horizontal line inside a mixed block.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HorizontalPart {
    /// Zero-based line number in the original text.
    pub line_index: usize,
    pub result: CalculationResult,
}

/// Per-line horizontal results followed by a vertical total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MixedCalculation {
    /// Values summed vertically: single-number lines and horizontal results.
    pub numbers: Vec<f64>,
    pub result: f64,
    pub formatted: String,
    pub original: String,
    pub horizontal_parts: Vec<HorizontalPart>,
    /// Present when more than one value was summed.
    pub vertical_total: Option<Box<CalculationResult>>,
}

/// Times across the six reference zones.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimezoneCalculation {
    pub original: String,
    pub zones: Vec<ZoneTime>,
    pub hour_offset: i64,
    /// True when the user typed a time instead of asking for "now".
    pub is_specific_time: bool,
    pub source_zone: Option<ZoneId>,
    /// The first row as `H:MM AM ZONE`.
    pub formatted: String,
}

impl TimezoneCalculation {
    pub fn new(
        original: &str,
        zones: Vec<ZoneTime>,
        hour_offset: i64,
        source_zone: Option<ZoneId>,
    ) -> TimezoneCalculation {
        let formatted = zones
            .first()
            .map(|row| format!("{} {}", row.time, row.label))
            .unwrap_or_default();
        TimezoneCalculation {
            original: original.to_string(),
            zones,
            hour_offset,
            is_specific_time: source_zone.is_some(),
            source_zone,
            formatted,
        }
    }
}

/// A calculation that could not produce a number, e.g. division by zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationError {
    pub original: String,
    pub message: String,
    pub formatted: String,
}

impl CalculationError {
    pub fn new(original: &str, error: &EvalError) -> CalculationError {
        let formatted = match error {
            EvalError::DivisionByZero => "#DIV/0!",
            _ => "#ERR!",
        };
        CalculationError {
            original: original.to_string(),
            message: error.to_string(),
            formatted: formatted.to_string(),
        }
    }
}

/// Everything [`super::calculate`] can return.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalculationResult {
    Single(Calculation),
    Horizontal(Calculation),
    Vertical(Calculation),
    Mixed(MixedCalculation),
    Timezone(TimezoneCalculation),
    Error(CalculationError),
}

impl CalculationResult {
    pub fn kind(&self) -> CalculationKind {
        match self {
            CalculationResult::Single(_) => CalculationKind::Single,
            CalculationResult::Horizontal(_) => CalculationKind::Horizontal,
            CalculationResult::Vertical(_) => CalculationKind::Vertical,
            CalculationResult::Mixed(_) => CalculationKind::Mixed,
            CalculationResult::Timezone(_) => CalculationKind::Timezone,
            CalculationResult::Error(_) => CalculationKind::Error,
        }
    }

    /// Operands, in input order. Empty for time zone and error results.
    pub fn numbers(&self) -> &[f64] {
        match self {
            CalculationResult::Single(c)
            | CalculationResult::Horizontal(c)
            | CalculationResult::Vertical(c) => &c.numbers,
            CalculationResult::Mixed(m) => &m.numbers,
            CalculationResult::Timezone(_) | CalculationResult::Error(_) => &[],
        }
    }

    /// The numeric result. Absent for time zones; NaN for errors.
    pub fn result(&self) -> Option<f64> {
        match self {
            CalculationResult::Single(c)
            | CalculationResult::Horizontal(c)
            | CalculationResult::Vertical(c) => Some(c.result),
            CalculationResult::Mixed(m) => Some(m.result),
            CalculationResult::Timezone(_) => None,
            CalculationResult::Error(_) => Some(f64::NAN),
        }
    }

    /// The numeric result, only when it can safely feed further arithmetic.
    pub fn value(&self) -> Option<f64> {
        self.result().filter(|v| v.is_finite())
    }

    pub fn operation(&self) -> OperationLabel {
        match self {
            CalculationResult::Single(c)
            | CalculationResult::Horizontal(c)
            | CalculationResult::Vertical(c) => c.operation,
            CalculationResult::Mixed(_) => OperationLabel::Mixed,
            CalculationResult::Timezone(_) | CalculationResult::Error(_) => OperationLabel::None,
        }
    }

    pub fn formatted(&self) -> &str {
        match self {
            CalculationResult::Single(c)
            | CalculationResult::Horizontal(c)
            | CalculationResult::Vertical(c) => &c.formatted,
            CalculationResult::Mixed(m) => &m.formatted,
            CalculationResult::Timezone(t) => &t.formatted,
            CalculationResult::Error(e) => &e.formatted,
        }
    }

    pub fn original(&self) -> &str {
        match self {
            CalculationResult::Single(c)
            | CalculationResult::Horizontal(c)
            | CalculationResult::Vertical(c) => &c.original,
            CalculationResult::Mixed(m) => &m.original,
            CalculationResult::Timezone(t) => &t.original,
            CalculationResult::Error(e) => &e.original,
        }
    }

    /// True for "now"-relative results that go stale as the clock moves.
    pub fn is_live(&self) -> bool {
        matches!(self, CalculationResult::Timezone(t) if !t.is_specific_time)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CalculationResult::Error(_))
    }
}
