//! Evaluation errors.

use thiserror::Error;

/// Errors raised while folding elements or evaluating a parenthesized
/// expression. None of these escape [`crate::engine::calculate`]: they become
/// `None` or [`crate::engine::CalculationResult::Error`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("Unexpected input after expression at offset {0}")]
    TrailingInput(usize),

    #[error("Expression nested too deeply")]
    TooDeep,
}
