//! Classifying a note's text and routing it to the right calculation.
//!
//! First match wins:
//!
//! 1. `H:MM AM|PM ZONE [±N]` → time zone conversion of a typed time
//! 2. `time [±N]` → time zone conversion of the current instant
//! 3. several lines → mixed block, or a vertical column
//! 4. whitespace or operators → horizontal expression
//! 5. a bare number → single
//! 6. anything else → `None`

use chrono::{DateTime, Utc};
use tracing::debug;

use super::arith::evaluate;
use super::error::EvalError;
use super::expr::{OperationLabel, ParsedExpression, calculate_from_elements, parse_expression};
use super::format::NumberLocale;
use super::number::{is_number, parse_number};
use super::preprocess::{extract_numbers, has_subexpression, sanitize_expression};
use super::result::{
    Calculation, CalculationError, CalculationResult, HorizontalPart, MixedCalculation,
    TimezoneCalculation,
};
use super::tokenize::{is_operator_char, space_separated_elements};
use crate::timezone::{
    LocalZone, convert_now, convert_specific, parse_specific_time, parse_time_command,
};

/// Ambient inputs of a calculation: the clock, the caller's zone and the
/// number locale. Passing them in keeps [`calculate`] deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    pub now: DateTime<Utc>,
    pub local_zone: LocalZone,
    pub locale: NumberLocale,
}

impl Context {
    pub fn new(now: DateTime<Utc>, local_zone: LocalZone) -> Context {
        Context {
            now,
            local_zone,
            locale: NumberLocale::default(),
        }
    }

    /// The wall clock and the zone from the environment.
    pub fn system() -> Context {
        Context::new(Utc::now(), LocalZone::from_env())
    }

    pub fn with_locale(mut self, locale: NumberLocale) -> Context {
        self.locale = locale;
        self
    }

    pub fn with_zone(mut self, local_zone: LocalZone) -> Context {
        self.local_zone = local_zone;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Context {
        self.now = now;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Horizontal,
    Vertical,
}

/// Evaluate the text of one note.
///
/// Returns `None` for blank input or text with nothing to calculate.
pub fn calculate(text: &str, ctx: &Context) -> Option<CalculationResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(spec) = parse_specific_time(trimmed) {
        debug!(zone = %spec.zone, "specific time conversion");
        let zones = convert_specific(ctx.now, &spec);
        return Some(CalculationResult::Timezone(TimezoneCalculation::new(
            trimmed,
            zones,
            spec.hour_offset,
            Some(spec.zone),
        )));
    }

    if let Some(hour_offset) = parse_time_command(trimmed) {
        debug!(hour_offset, "current time conversion");
        let zones = convert_now(ctx.now, &ctx.local_zone, hour_offset);
        return Some(CalculationResult::Timezone(TimezoneCalculation::new(
            trimmed,
            zones,
            hour_offset,
            None,
        )));
    }

    if trimmed.contains('\n') {
        return calculate_lines(trimmed, ctx);
    }

    if is_expression_line(trimmed) {
        return calculate_horizontal(trimmed, ctx);
    }

    calculate_single(trimmed, ctx)
}

/// A line is an expression when it has whitespace, or operator characters
/// that are not just the sign of a single number (`-5`, `900-`).
fn is_expression_line(line: &str) -> bool {
    line.chars().any(char::is_whitespace)
        || (line.chars().any(is_operator_char) && !is_number(line))
}

fn calculate_single(text: &str, ctx: &Context) -> Option<CalculationResult> {
    let value = parse_number(text)?;
    debug!(value, "single number");
    Some(CalculationResult::Single(Calculation::new(
        vec![value],
        value,
        OperationLabel::None,
        text,
        &ctx.locale,
    )))
}

fn from_parsed(
    parsed: Result<ParsedExpression, EvalError>,
    layout: Layout,
    original: &str,
    ctx: &Context,
) -> CalculationResult {
    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(error = %err, "calculation failed");
            return CalculationResult::Error(CalculationError::new(original, &err));
        }
    };

    let many = parsed.numbers.len() > 1;
    let calc = Calculation::new(
        parsed.numbers,
        parsed.result,
        parsed.operation,
        original,
        &ctx.locale,
    );
    match (many, layout) {
        (false, _) => CalculationResult::Single(calc),
        (true, Layout::Horizontal) => CalculationResult::Horizontal(calc),
        (true, Layout::Vertical) => CalculationResult::Vertical(calc),
    }
}

/// Evaluate one line as a horizontal expression.
pub fn calculate_horizontal(line: &str, ctx: &Context) -> Option<CalculationResult> {
    if has_subexpression(line) {
        return calculate_parenthesized(line, ctx);
    }

    let parsed = match parse_expression(&[line]) {
        Ok(Some(parsed)) if parsed.numbers.len() >= 2 => Ok(parsed),
        Err(err) => Err(err),
        _ => {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let elements = space_separated_elements(&parts);
            if elements.len() < 2 {
                // One operand is not a calculation; the whole line must be a number.
                debug!(line, operands = elements.len(), "too few operands on line");
                return calculate_single(line, ctx);
            }
            calculate_from_elements(&elements)
        }
    };

    Some(from_parsed(parsed, Layout::Horizontal, line, ctx))
}

fn calculate_parenthesized(line: &str, ctx: &Context) -> Option<CalculationResult> {
    let sanitized = sanitize_expression(line);
    let evaluation = match evaluate(&sanitized) {
        Ok(evaluation) => evaluation,
        Err(EvalError::DivisionByZero) => {
            return Some(CalculationResult::Error(CalculationError::new(
                line,
                &EvalError::DivisionByZero,
            )));
        }
        Err(err) => {
            debug!(error = %err, expression = %sanitized, "parenthesized expression rejected");
            return None;
        }
    };

    let numbers = extract_numbers(line);
    if numbers.is_empty() {
        return None;
    }
    let parsed = ParsedExpression {
        numbers,
        result: evaluation.value,
        operation: OperationLabel::from_operators(evaluation.operators),
    };
    Some(from_parsed(Ok(parsed), Layout::Horizontal, line, ctx))
}

/// Several lines: horizontal lines are evaluated on their own and their
/// results summed with the plain numbers; without any horizontal line the
/// lines form one vertical column.
fn calculate_lines(text: &str, ctx: &Context) -> Option<CalculationResult> {
    let mut parts: Vec<HorizontalPart> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines.push(line);

        if is_expression_line(line) {
            if let Some(result) = calculate_horizontal(line, ctx) {
                // Errors are shown per line but never summed.
                if let Some(value) = result.value() {
                    values.push(value);
                }
                parts.push(HorizontalPart { line_index, result });
            }
        } else if let Some(value) = parse_number(line) {
            values.push(value);
        }
    }

    if parts.is_empty() {
        debug!(lines = lines.len(), "vertical column");
        return match parse_expression(&lines) {
            Ok(Some(parsed)) => Some(from_parsed(Ok(parsed), Layout::Vertical, text, ctx)),
            Ok(None) => None,
            Err(err) => Some(from_parsed(Err(err), Layout::Vertical, text, ctx)),
        };
    }

    if values.is_empty() {
        // Every horizontal line failed; surface the first failure.
        return parts.into_iter().next().map(|part| match part.result {
            CalculationResult::Error(err) => CalculationResult::Error(CalculationError {
                original: text.to_string(),
                ..err
            }),
            other => other,
        });
    }

    let total: f64 = values.iter().sum();
    let vertical_total = (values.len() > 1).then(|| {
        Box::new(CalculationResult::Vertical(Calculation::new(
            values.clone(),
            total,
            OperationLabel::Addition,
            text,
            &ctx.locale,
        )))
    });
    debug!(parts = parts.len(), values = values.len(), total, "mixed block");

    let calc = Calculation::new(values, total, OperationLabel::Mixed, text, &ctx.locale);
    Some(CalculationResult::Mixed(MixedCalculation {
        numbers: calc.numbers,
        result: calc.result,
        formatted: calc.formatted,
        original: calc.original,
        horizontal_parts: parts,
        vertical_total,
    }))
}
