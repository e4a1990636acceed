//! Element folding.
//!
//! Elements are folded into a running total in strict left-to-right order.
//! There is no operator precedence: `2+3*4` is `(2+3)*4 = 20`.

use serde::Serialize;

use super::error::EvalError;
use super::tokenize::{Operator, math_elements, space_separated_elements};

/// An operand paired with the operator that applies it to the running total.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Element {
    pub operator: Operator,
    pub value: f64,
}

impl Element {
    pub fn new(operator: Operator, value: f64) -> Element {
        Element { operator, value }
    }
}

/// What kind of arithmetic produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationLabel {
    None,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Mixed,
}

impl OperationLabel {
    fn of(op: Operator) -> OperationLabel {
        match op {
            Operator::Add => OperationLabel::Addition,
            Operator::Subtract => OperationLabel::Subtraction,
            Operator::Multiply => OperationLabel::Multiplication,
            Operator::Divide => OperationLabel::Division,
        }
    }

    /// Label for a sequence of operators applied between operands.
    pub fn from_operators<I: IntoIterator<Item = Operator>>(ops: I) -> OperationLabel {
        let mut ops = ops.into_iter();
        let Some(first) = ops.next() else {
            return OperationLabel::None;
        };
        if ops.all(|op| op == first) {
            OperationLabel::of(first)
        } else {
            OperationLabel::Mixed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationLabel::None => "none",
            OperationLabel::Addition => "addition",
            OperationLabel::Subtraction => "subtraction",
            OperationLabel::Multiplication => "multiplication",
            OperationLabel::Division => "division",
            OperationLabel::Mixed => "mixed",
        }
    }
}

/// The outcome of folding a list of elements.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedExpression {
    pub numbers: Vec<f64>,
    pub result: f64,
    pub operation: OperationLabel,
}

fn label_for(elements: &[Element]) -> OperationLabel {
    match elements {
        [] => OperationLabel::None,
        [only] => match only.operator {
            Operator::Add => OperationLabel::None,
            op => OperationLabel::of(op),
        },
        [_, rest @ ..] => OperationLabel::from_operators(rest.iter().map(|e| e.operator)),
    }
}

/// Fold elements left to right, starting from zero.
pub fn calculate_from_elements(elements: &[Element]) -> Result<ParsedExpression, EvalError> {
    let mut total = 0.0;
    for element in elements {
        total = match element.operator {
            Operator::Add => total + element.value,
            Operator::Subtract => total - element.value,
            Operator::Multiply => total * element.value,
            Operator::Divide => {
                if element.value == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                total / element.value
            }
        };
    }

    Ok(ParsedExpression {
        numbers: elements.iter().map(|e| e.value).collect(),
        result: total,
        operation: label_for(elements),
    })
}

/// Parse and fold a list of parts.
///
/// One part is scanned as an operator-adjacent expression and yields
/// `Ok(None)` when it holds fewer than three tokens, so the caller can fall
/// back to splitting on whitespace. Several parts use space-separated mode.
pub fn parse_expression<S: AsRef<str>>(parts: &[S]) -> Result<Option<ParsedExpression>, EvalError> {
    let elements = match parts {
        [] => return Ok(None),
        [single] => match math_elements(single.as_ref()) {
            Some(elements) => elements,
            None => return Ok(None),
        },
        _ => space_separated_elements(parts),
    };

    if elements.is_empty() {
        return Ok(None);
    }
    calculate_from_elements(&elements).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(op: char, value: f64) -> Element {
        Element::new(Operator::from_char(op).unwrap(), value)
    }

    #[test]
    fn test_left_to_right_without_precedence() {
        let parsed = calculate_from_elements(&[el('+', 2.0), el('+', 3.0), el('*', 4.0)]).unwrap();
        assert_eq!(parsed.result, 20.0);
        assert_eq!(parsed.operation, OperationLabel::Mixed);
    }

    #[test]
    fn test_uniform_addition() {
        let parsed = calculate_from_elements(&[el('+', 2.0), el('+', 3.0), el('+', 4.0)]).unwrap();
        assert_eq!(parsed.result, 9.0);
        assert_eq!(parsed.operation, OperationLabel::Addition);
        assert_eq!(parsed.numbers, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_uniform_subtraction() {
        let parsed = calculate_from_elements(&[el('+', 10.0), el('-', 3.0), el('-', 2.0)]).unwrap();
        assert_eq!(parsed.result, 5.0);
        assert_eq!(parsed.operation, OperationLabel::Subtraction);
    }

    #[test]
    fn test_uniform_multiplication() {
        let parsed = calculate_from_elements(&[el('+', 2.0), el('*', 3.0), el('*', 4.0)]).unwrap();
        assert_eq!(parsed.result, 24.0);
        assert_eq!(parsed.operation, OperationLabel::Multiplication);
    }

    #[test]
    fn test_single_element_labels() {
        let plus = calculate_from_elements(&[el('+', 5.0)]).unwrap();
        assert_eq!(plus.operation, OperationLabel::None);
        let minus = calculate_from_elements(&[el('-', 5.0)]).unwrap();
        assert_eq!(minus.operation, OperationLabel::Subtraction);
        assert_eq!(minus.result, -5.0);
    }

    #[test]
    fn test_division_by_zero_aborts() {
        let err = calculate_from_elements(&[el('+', 10.0), el('/', 0.0), el('+', 1.0)]);
        assert_eq!(err, Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_parse_expression_single_part() {
        let parsed = parse_expression(&["10-4/2"]).unwrap().unwrap();
        assert_eq!(parsed.result, 3.0);
        assert!(parse_expression(&["10"]).unwrap().is_none());
    }

    #[test]
    fn test_parse_expression_column() {
        let parsed = parse_expression(&["100", "250", "(50)"]).unwrap().unwrap();
        assert_eq!(parsed.result, 300.0);
        assert_eq!(parsed.operation, OperationLabel::Addition);
    }

    #[test]
    fn test_parse_expression_nothing_numeric() {
        assert!(parse_expression(&["apples", "pears"]).unwrap().is_none());
        assert!(parse_expression::<&str>(&[]).unwrap().is_none());
    }
}
