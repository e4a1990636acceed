//! jotcalc-core - UI-agnostic board of calculator notes + storage.

pub mod board;
pub mod error;
pub mod storage;

pub use board::{Board, Note, NoteId, NoteState, UndoAction};
pub use error::{JotError, Result};

pub use jotcalc_engine::{CalculationResult, Context};
