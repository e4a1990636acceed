//! Expression engine API.
//!
//! Turns the free-form text of a note into a [`CalculationResult`]:
//!
//! - [`parse_number`], [`is_number`], [`detect_number_format`] - number tokens
//!   with currency, grouping, percent and accounting negatives
//! - [`tokenize_math_expression`], [`space_separated_elements`] - splitting a
//!   line into operators and operands
//! - [`parse_expression`], [`calculate_from_elements`] - strict left-to-right
//!   folding of operands
//! - [`evaluate`] - the precedence-aware evaluator used for parenthesized lines
//! - [`calculate`] - classification and dispatch of a whole note
//! - [`format_result`] - rendering numbers for display

mod arith;
mod calculate;
mod error;
mod expr;
mod format;
mod number;
mod preprocess;
mod result;
mod tokenize;

pub use arith::{Evaluation, evaluate};
pub use calculate::{Context, calculate, calculate_horizontal};
pub use error::EvalError;
pub use expr::{Element, OperationLabel, ParsedExpression, calculate_from_elements, parse_expression};
pub use format::{MAX_FRACTION_DIGITS, NumberLocale, format_result};
pub use number::{NumberFormatKind, detect_number_format, is_number, parse_number};
pub use preprocess::{extract_numbers, has_subexpression, sanitize_expression};
pub use result::{
    Calculation, CalculationError, CalculationKind, CalculationResult, HorizontalPart,
    MixedCalculation, TimezoneCalculation,
};
pub use tokenize::{
    Operator, Token, elements_from_tokens, is_operator_char, math_elements,
    space_separated_elements, tokenize_math_expression,
};
