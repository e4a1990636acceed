//! Error types for Jotcalc core.

use thiserror::Error;

use crate::board::NoteId;

/// Errors that can occur while editing, loading or saving a board
#[derive(Error, Debug)]
pub enum JotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("No file path set")]
    NoFilePath,

    #[error("No such note: {0}")]
    NoSuchNote(NoteId),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, JotError>;
