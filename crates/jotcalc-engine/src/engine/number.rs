//! Number token parsing.
//!
//! Tokens typed into a note are loosely formatted: currency symbols, thousands
//! separators, percentages and the two accounting conventions for negatives
//! (`(500)` and SAP-style `500-`) all have to be understood. Precedence is:
//!
//! 1. trailing minus (`900-` → `-900`)
//! 2. percentage suffix (`12%` → `0.12`)
//! 3. currency/grouping strip (`$ € £ ¥ ₹`, `,`, whitespace)
//! 4. accounting parentheses (`(123.45)` → `-123.45`); nested layers count
//!    once and a signed inner value is plain grouping (`(-7)` → `-7`)
//! 5. plain float parse with optional exponent (`1e5`), rejecting
//!    non-finite values

use serde::Serialize;

pub(crate) const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];

pub(crate) fn is_currency_symbol(c: char) -> bool {
    CURRENCY_SYMBOLS.contains(&c)
}

/// Parse a single token into a finite number.
pub fn parse_number(token: &str) -> Option<f64> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(body) = trimmed.strip_suffix('-')
        && is_trailing_minus_body(body)
    {
        return parse_plain(body).map(|n| -n);
    }

    if let Some(body) = trimmed.strip_suffix('%') {
        return parse_plain(body).map(|n| n / 100.0);
    }

    parse_plain(trimmed)
}

/// True when `parse_number` accepts the token.
pub fn is_number(token: &str) -> bool {
    parse_number(token).is_some()
}

/// Everything before a trailing `-` must be digits, separators, an exponent
/// marker or currency.
fn is_trailing_minus_body(body: &str) -> bool {
    body.chars().any(|c| c.is_ascii_digit())
        && body.chars().all(|c| {
            c.is_ascii_digit()
                || matches!(c, '.' | ',' | 'e' | 'E')
                || c.is_whitespace()
                || is_currency_symbol(c)
        })
}

/// Strip every layer of parentheses wrapping the whole token.
fn strip_parens(s: &str) -> Option<&str> {
    let mut inner = s.strip_prefix('(')?.strip_suffix(')')?;
    while let Some(next) = inner.strip_prefix('(').and_then(|i| i.strip_suffix(')')) {
        inner = next;
    }
    Some(inner)
}

fn parse_plain(token: &str) -> Option<f64> {
    let stripped: String = token
        .chars()
        .filter(|&c| !is_currency_symbol(c) && c != ',' && !c.is_whitespace())
        .collect();

    let value = match strip_parens(&stripped) {
        Some(inner) if inner.starts_with(['+', '-']) => parse_float(inner)?,
        Some(inner) => -parse_float(inner)?,
        None => parse_float(&stripped)?,
    };
    value.is_finite().then_some(value)
}

fn parse_float(s: &str) -> Option<f64> {
    // `f64::from_str` also takes "inf" and "NaN"; neither is a number here.
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// The notation a numeric token was written in. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormatKind {
    Percentage,
    TrailingMinus,
    AccountingParentheses,
    Currency,
    Standard,
}

/// Classify how a token was written, or `None` if it is not a number.
pub fn detect_number_format(token: &str) -> Option<NumberFormatKind> {
    let t = token.trim();
    if !is_number(t) {
        return None;
    }

    let kind = if t.ends_with('%') {
        NumberFormatKind::Percentage
    } else if t.ends_with('-') {
        NumberFormatKind::TrailingMinus
    } else if t.starts_with('(')
        && strip_parens(t).is_some_and(|inner| !inner.trim_start().starts_with(['+', '-']))
    {
        NumberFormatKind::AccountingParentheses
    } else if t.chars().any(is_currency_symbol) {
        NumberFormatKind::Currency
    } else {
        NumberFormatKind::Standard
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_number(".25"), Some(0.25));
        assert_eq!(parse_number("+7"), Some(7.0));
    }

    #[test]
    fn test_currency_and_grouping() {
        assert_eq!(parse_number("$1,234.56"), Some(1234.56));
        assert_eq!(parse_number("€ 1 000"), Some(1000.0));
        assert_eq!(parse_number("₹99"), Some(99.0));
    }

    #[test]
    fn test_accounting_parentheses() {
        assert_eq!(parse_number("(500)"), Some(-500.0));
        assert_eq!(parse_number("($123.45)"), Some(-123.45));
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(parse_number("((5))"), Some(-5.0));
        assert_eq!(parse_number("( ($12) )"), Some(-12.0));
        assert_eq!(parse_number("(-7)"), Some(-7.0));
        assert_eq!(parse_number("((+7))"), Some(7.0));
        assert_eq!(parse_number("()"), None);
        assert_eq!(parse_number("(5)(6)"), None);
    }

    #[test]
    fn test_exponent() {
        assert_eq!(parse_number("1e5"), Some(100000.0));
        assert_eq!(parse_number("2.5E-1"), Some(0.25));
        assert_eq!(parse_number("1e5-"), Some(-100000.0));
        assert_eq!(parse_number("e5"), None);
        assert_eq!(parse_number("1e"), None);
    }

    #[test]
    fn test_trailing_minus() {
        assert_eq!(parse_number("900-"), Some(-900.0));
        assert_eq!(parse_number("1,250.50-"), Some(-1250.5));
        assert_eq!(parse_number("£12-"), Some(-12.0));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("abc-"), None);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(parse_number("12%"), Some(0.12));
        assert_eq!(parse_number("150%"), Some(1.5));
        assert_eq!(parse_number("%"), None);
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1e400"), None);
        assert_eq!(parse_number("1.2.3"), None);
        assert!(!is_number("+"));
    }

    #[test]
    fn test_detect_number_format() {
        assert_eq!(detect_number_format("12%"), Some(NumberFormatKind::Percentage));
        assert_eq!(detect_number_format("900-"), Some(NumberFormatKind::TrailingMinus));
        assert_eq!(
            detect_number_format("(45)"),
            Some(NumberFormatKind::AccountingParentheses)
        );
        assert_eq!(detect_number_format("$5"), Some(NumberFormatKind::Currency));
        assert_eq!(detect_number_format("5"), Some(NumberFormatKind::Standard));
        assert_eq!(detect_number_format("(-5)"), Some(NumberFormatKind::Standard));
        assert_eq!(detect_number_format("five"), None);
    }
}
