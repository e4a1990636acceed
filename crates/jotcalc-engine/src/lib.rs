//! jotcalc_engine - Expression engine for free-form calculator notes.

pub mod engine;
pub mod timezone;

pub use engine::{CalculationResult, Context, calculate};
