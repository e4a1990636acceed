//! Rendering numbers with the caller's separators.

use serde::{Deserialize, Serialize};

/// Separators used when rendering numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub group_separator: String,
    pub decimal_separator: String,
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale {
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Maximum fractional digits shown for non-integer results.
pub const MAX_FRACTION_DIGITS: usize = 6;

/// Format a result for display.
///
/// Integers get no decimals; other values get up to six, with trailing zeros
/// trimmed. Non-finite values render as error markers.
pub fn format_result(n: f64, locale: &NumberLocale) -> String {
    if n.is_nan() {
        return "#NAN!".to_string();
    }
    if n.is_infinite() {
        return "#INF!".to_string();
    }

    let text = if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, n);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::new();
    // Tiny negatives round to "-0"; show plain zero.
    if negative && !(frac_part.is_none() && int_part.bytes().all(|b| b == b'0')) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, &locale.group_separator));
    if let Some(frac) = frac_part {
        out.push_str(&locale.decimal_separator);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
