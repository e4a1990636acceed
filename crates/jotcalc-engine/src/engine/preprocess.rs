//! Preparing parenthesized lines for the arithmetic evaluator.
//!
//! A line only goes to [`super::arith::evaluate`] when some parenthesis group
//! holds more than a bare (accounting-negative) number. Before evaluation the
//! line is reduced to the arithmetic alphabet:
//!
//! - `×` → `*` and `÷` → `/`
//! - exponent literals are written out: `1e3` → `1000`
//! - accounting groups become negations: `(500)` → `(-(500))`
//! - implicit multiplication: `2(3+4)` → `2*(3+4)`, `(1+1)3` → `(1+1)*3`
//! - everything outside `[0-9+\-*/().\s]` is dropped

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::number::parse_number;

/// One number literal: grouping commas, decimals, exponent.
const NUMBER_LITERAL: &str = r"(?:\d[\d,]*(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

fn paren_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^()]*)\)").unwrap())
}

fn bare_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*[+-]?\s*[$€£¥₹]?\s*{NUMBER_LITERAL}\s*$")).unwrap()
    })
}

fn digit_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)\s*\(").unwrap())
}

fn close_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)\s*(\d)").unwrap())
}

/// A parenthesized bare number. Capture 1 is the sign, if any.
fn number_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"\(\s*([+-]?)\s*[$€£¥₹]?\s*{NUMBER_LITERAL}\s*\)")).unwrap()
    })
}

fn exponent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\d[\d,]*(?:\.\d*)?|\.\d+)[eE][+-]?\d+").unwrap())
}

/// A number group, or a number standing on its own.
fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"\(\s*[+-]?\s*[$€£¥₹]?\s*{NUMBER_LITERAL}\s*\)|{NUMBER_LITERAL}"
        ))
        .unwrap()
    })
}

/// True when the text holds a parenthesized sub-expression, or parentheses
/// that do not balance.
pub fn has_subexpression(text: &str) -> bool {
    let opens = text.matches('(').count();
    let closes = text.matches(')').count();
    if opens == 0 && closes == 0 {
        return false;
    }
    if opens != closes {
        return true;
    }
    paren_group_re()
        .captures_iter(text)
        .any(|caps| !bare_number_re().is_match(&caps[1]))
}

/// Reduce a line to something [`super::arith::evaluate`] accepts.
pub fn sanitize_expression(text: &str) -> String {
    let normalized = text.replace('×', "*").replace('÷', "/");
    let expanded = exponent_re().replace_all(&normalized, |caps: &Captures| {
        match parse_number(&caps[0]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    });
    // Unsigned groups only; `(-7)` is already ordinary grouping.
    let negated = number_group_re().replace_all(&expanded, |caps: &Captures| {
        if caps[1].is_empty() {
            format!("(-{})", &caps[0])
        } else {
            caps[0].to_string()
        }
    });
    let with_mul = digit_open_re().replace_all(&negated, "${1}*(");
    let with_mul = close_digit_re().replace_all(&with_mul, ")*${1}");
    with_mul
        .chars()
        .filter(|&c| c.is_ascii_digit() || "+-*/().".contains(c) || c.is_whitespace())
        .collect()
}

/// Every standalone numeric substring of the original text, for display.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    numeric_re()
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}
