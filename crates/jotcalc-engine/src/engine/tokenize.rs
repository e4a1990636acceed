//! Splitting a line of text into numbers and operators.
//!
//! Two entry points exist. [`tokenize_math_expression`] scans one string
//! character by character and is used for operator-adjacent input such as
//! `2+3-1*4`. [`space_separated_elements`] works on pre-split parts (words of
//! a line, or the lines of a column) where operators may be glued to numbers
//! (`+5`, `5*`) or stand alone.

use serde::Serialize;
use tracing::trace;

use super::expr::Element;
use super::number::{is_currency_symbol, parse_number};

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' | '×' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

/// True for any character that acts as an arithmetic operator.
pub fn is_operator_char(c: char) -> bool {
    Operator::from_char(c).is_some()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Nothing consumed yet.
    Idle,
    /// Accumulating characters of a number.
    InNumber,
    /// A number was just emitted.
    AfterNumber,
    /// An operator was just emitted.
    InOperator,
}

struct Scanner {
    tokens: Vec<Token>,
    buffer: String,
    state: ScanState,
}

impl Scanner {
    fn new() -> Self {
        Scanner {
            tokens: Vec::new(),
            buffer: String::new(),
            state: ScanState::Idle,
        }
    }

    fn buffer_has_digits(&self) -> bool {
        self.buffer.chars().any(|c| c.is_ascii_digit())
    }

    /// Emit the buffered number, if it parses. A buffer that does not parse
    /// (a lone `-`, a bare `$`) is dropped.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if let Some(n) = parse_number(&text) {
            self.tokens.push(Token::Number(n));
        } else {
            trace!(buffer = %text, "dropping unparseable number buffer");
        }
        self.state = match self.tokens.last() {
            Some(Token::Number(_)) => ScanState::AfterNumber,
            Some(Token::Operator(_)) => ScanState::InOperator,
            None => ScanState::Idle,
        };
    }

    fn push_operator(&mut self, op: Operator) {
        self.tokens.push(Token::Operator(op));
        self.state = ScanState::InOperator;
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ',' || c == '%' || is_currency_symbol(c)
}

/// After an `e` inside a number: digits, optionally signed, make an exponent.
fn starts_exponent<I: Iterator<Item = char>>(mut rest: I) -> bool {
    match rest.next() {
        Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

/// A `-` right after digits is a trailing minus when nothing numeric follows.
fn ends_trailing_minus(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(c) => c.is_whitespace() || is_operator_char(c),
    }
}

/// Scan a single string into number and operator tokens.
pub fn tokenize_math_expression(input: &str) -> Vec<Token> {
    let mut scanner = Scanner::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if is_number_char(c) {
            scanner.buffer.push(c);
            scanner.state = ScanState::InNumber;
            continue;
        }

        if matches!(c, 'e' | 'E')
            && scanner.state == ScanState::InNumber
            && scanner.buffer_has_digits()
            && !scanner.buffer.contains(['e', 'E'])
            && starts_exponent(chars.clone())
        {
            scanner.buffer.push(c);
            if let Some(sign) = chars.next_if(|&n| n == '+' || n == '-') {
                scanner.buffer.push(sign);
            }
            continue;
        }

        // A parenthesized bare number is an accounting negative: `(500)`.
        if c == '(' {
            scanner.flush();
            scanner.buffer.push('(');
            scanner.state = ScanState::InNumber;
            continue;
        }
        if c == ')' {
            if scanner.buffer.starts_with('(') {
                scanner.buffer.push(')');
            }
            scanner.flush();
            continue;
        }

        if c == '-' {
            // Must run before generic operator handling: `900-` is one number.
            if scanner.state == ScanState::InNumber
                && scanner.buffer_has_digits()
                && ends_trailing_minus(chars.peek().copied())
            {
                scanner.buffer.push('-');
                scanner.flush();
                continue;
            }

            scanner.flush();
            match scanner.state {
                ScanState::Idle | ScanState::InOperator => {
                    scanner.buffer.push('-');
                    scanner.state = ScanState::InNumber;
                }
                ScanState::InNumber | ScanState::AfterNumber => {
                    scanner.push_operator(Operator::Subtract);
                }
            }
            continue;
        }

        if let Some(op) = Operator::from_char(c) {
            scanner.flush();
            scanner.push_operator(op);
            continue;
        }

        scanner.flush();
    }
    scanner.flush();

    scanner.tokens
}

/// Fold tokens into elements: each number takes the operator right before it.
pub fn elements_from_tokens(tokens: &[Token]) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut pending = Operator::Add;
    for token in tokens {
        match *token {
            Token::Operator(op) => pending = op,
            Token::Number(value) => {
                elements.push(Element::new(pending, value));
                pending = Operator::Add;
            }
        }
    }
    elements
}

/// Single-string mode. Needs at least number-operator-number worth of tokens.
pub fn math_elements(input: &str) -> Option<Vec<Element>> {
    let tokens = tokenize_math_expression(input);
    if tokens.len() < 3 {
        return None;
    }
    Some(elements_from_tokens(&tokens))
}

/// Space-separated mode over already split parts.
pub fn space_separated_elements<S: AsRef<str>>(parts: &[S]) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut current = Operator::Add;
    // An operator was typed on its own and is waiting for its operand.
    let mut explicit = false;

    for part in parts {
        let part = part.as_ref().trim();
        let (Some(first), Some(last)) = (part.chars().next(), part.chars().next_back()) else {
            continue;
        };

        if part.chars().count() == 1
            && let Some(op) = Operator::from_char(first)
        {
            current = op;
            explicit = true;
            continue;
        }

        if last == '-'
            && let Some(value) = parse_number(part)
        {
            elements.push(Element::new(current, value));
            current = Operator::Add;
            explicit = false;
            continue;
        }

        if !explicit
            && let Some(op) = Operator::from_char(first)
            && let Some(value) = parse_number(&part[first.len_utf8()..])
        {
            elements.push(Element::new(op, value));
            current = Operator::Add;
            continue;
        }

        if let Some(op) = Operator::from_char(last)
            && let Some(value) = parse_number(&part[..part.len() - last.len_utf8()])
        {
            elements.push(Element::new(current, value));
            current = op;
            explicit = true;
            continue;
        }

        if let Some(value) = parse_number(part) {
            elements.push(Element::new(current, value));
            current = Operator::Add;
            explicit = false;
            continue;
        }

        trace!(part, "skipping non-numeric part");
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(elements: &[Element]) -> Vec<(char, f64)> {
        elements
            .iter()
            .map(|e| (e.operator.symbol(), e.value))
            .collect()
    }

    #[test]
    fn test_tokenize_operator_adjacent() {
        let tokens = tokenize_math_expression("2+3-1*4");
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Add),
                Token::Number(3.0),
                Token::Operator(Operator::Subtract),
                Token::Number(1.0),
                Token::Operator(Operator::Multiply),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_unicode_operators() {
        let tokens = tokenize_math_expression("6×2÷3");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1], Token::Operator(Operator::Multiply));
        assert_eq!(tokens[3], Token::Operator(Operator::Divide));
    }

    #[test]
    fn test_trailing_minus_before_operator() {
        let tokens = tokenize_math_expression("900-+100");
        assert_eq!(
            tokens,
            vec![
                Token::Number(-900.0),
                Token::Operator(Operator::Add),
                Token::Number(100.0),
            ]
        );
    }

    #[test]
    fn test_trailing_minus_at_end() {
        let tokens = tokenize_math_expression("100+50-");
        assert_eq!(tokens.last(), Some(&Token::Number(-50.0)));
    }

    #[test]
    fn test_binary_minus_between_digits() {
        let tokens = tokenize_math_expression("10-5");
        assert_eq!(tokens[1], Token::Operator(Operator::Subtract));
    }

    #[test]
    fn test_binary_minus_after_space() {
        let tokens = tokenize_math_expression("10 - 5");
        assert_eq!(tokens[1], Token::Operator(Operator::Subtract));
        assert_eq!(tokens[2], Token::Number(5.0));
    }

    #[test]
    fn test_leading_negative_literal() {
        let tokens = tokenize_math_expression("-5+3");
        assert_eq!(tokens[0], Token::Number(-5.0));
    }

    #[test]
    fn test_negative_literal_after_operator() {
        let tokens = tokenize_math_expression("4*-2");
        assert_eq!(
            tokens,
            vec![
                Token::Number(4.0),
                Token::Operator(Operator::Multiply),
                Token::Number(-2.0),
            ]
        );
    }

    #[test]
    fn test_currency_in_number_buffer() {
        let tokens = tokenize_math_expression("$1,200 + $300");
        assert_eq!(tokens[0], Token::Number(1200.0));
        assert_eq!(tokens[2], Token::Number(300.0));
    }

    #[test]
    fn test_accounting_parentheses_in_expression() {
        let tokens = tokenize_math_expression("(500) + 200");
        assert_eq!(
            tokens,
            vec![
                Token::Number(-500.0),
                Token::Operator(Operator::Add),
                Token::Number(200.0),
            ]
        );
    }

    #[test]
    fn test_exponent_stays_in_number() {
        let tokens = tokenize_math_expression("1e5 + 1");
        assert_eq!(
            tokens,
            vec![
                Token::Number(100000.0),
                Token::Operator(Operator::Add),
                Token::Number(1.0),
            ]
        );
        let tokens = tokenize_math_expression("2E-3*4");
        assert_eq!(tokens[0], Token::Number(0.002));
        assert_eq!(tokens[1], Token::Operator(Operator::Multiply));
    }

    #[test]
    fn test_letter_e_after_number_is_not_exponent() {
        let tokens = tokenize_math_expression("5eggs+2");
        assert_eq!(
            tokens,
            vec![
                Token::Number(5.0),
                Token::Operator(Operator::Add),
                Token::Number(2.0),
            ]
        );
        let tokens = tokenize_math_expression("3e-x");
        assert_eq!(tokens[0], Token::Number(3.0));
    }

    #[test]
    fn test_nested_parentheses_number() {
        let tokens = tokenize_math_expression("((5))+1");
        assert_eq!(
            tokens,
            vec![
                Token::Number(-5.0),
                Token::Operator(Operator::Add),
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_math_elements_needs_three_tokens() {
        assert!(math_elements("42 7").is_none());
        assert!(math_elements("5+").is_none());
        let elements = math_elements("25 30 45").unwrap();
        assert_eq!(values(&elements), vec![('+', 25.0), ('+', 30.0), ('+', 45.0)]);
    }

    #[test]
    fn test_space_separated_plain() {
        let elements = space_separated_elements(&["42", "0"]);
        assert_eq!(values(&elements), vec![('+', 42.0), ('+', 0.0)]);
    }

    #[test]
    fn test_space_separated_glued_operators() {
        let elements = space_separated_elements(&["10", "*5", "2/", "4"]);
        assert_eq!(
            values(&elements),
            vec![('+', 10.0), ('*', 5.0), ('+', 2.0), ('/', 4.0)]
        );
    }

    #[test]
    fn test_space_separated_standalone_operator() {
        let elements = space_separated_elements(&["10", "x", "-", "3"]);
        assert_eq!(values(&elements), vec![('+', 10.0), ('-', 3.0)]);
    }

    #[test]
    fn test_space_separated_sign_after_operator() {
        let elements = space_separated_elements(&["10", "*", "-2"]);
        assert_eq!(values(&elements), vec![('+', 10.0), ('*', -2.0)]);
    }

    #[test]
    fn test_space_separated_trailing_minus_first() {
        let elements = space_separated_elements(&["100", "900-"]);
        assert_eq!(values(&elements), vec![('+', 100.0), ('+', -900.0)]);
    }

    #[test]
    fn test_space_separated_skips_words() {
        let elements = space_separated_elements(&["rent", "1200", "food", "300"]);
        assert_eq!(values(&elements), vec![('+', 1200.0), ('+', 300.0)]);
    }
}
