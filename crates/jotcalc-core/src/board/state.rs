use jotcalc_engine::{CalculationResult, Context, calculate};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::Result;

/// Maximum number of undo entries to keep
pub(crate) const MAX_UNDO_STACK: usize = 100;

/// Identifier of a note, unique within one board. Ids grow with creation
/// order, so iterating notes by id is iterating them oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The user-owned part of a note: where it sits and what it says.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteState {
    pub x: i64,
    pub y: i64,
    pub text: String,
}

/// A free-form text note on the board together with its latest result.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub x: i64,
    pub y: i64,
    pub text: String,
    /// Recomputed on every edit and load, never read from disk.
    pub result: Option<CalculationResult>,
}

impl Note {
    pub fn new(id: NoteId, state: NoteState, ctx: &Context) -> Note {
        let result = calculate(&state.text, ctx);
        Note {
            id,
            x: state.x,
            y: state.y,
            text: state.text,
            result,
        }
    }

    pub fn state(&self) -> NoteState {
        NoteState {
            x: self.x,
            y: self.y,
            text: self.text.clone(),
        }
    }

    pub fn recalculate(&mut self, ctx: &Context) {
        self.result = calculate(&self.text, ctx);
    }

    /// The formatted result, or an empty string when nothing was calculated.
    pub fn display(&self) -> &str {
        self.result.as_ref().map(|r| r.formatted()).unwrap_or("")
    }

    pub fn is_live(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.is_live())
    }
}

/// Represents an undoable change to a single note
#[derive(Clone, Debug)]
pub struct UndoAction {
    pub note_id: NoteId,
    pub old_note: Option<NoteState>,
    pub new_note: Option<NoteState>,
}

/// UI-agnostic board of notes.
pub struct Board {
    pub notes: BTreeMap<NoteId, Note>,
    pub(crate) next_id: u64,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the board has been modified since the last save or load
    pub modified: bool,
    pub undo_stack: Vec<UndoAction>,
    pub redo_stack: Vec<UndoAction>,
}

impl Board {
    /// Create an empty board. Does not touch the filesystem.
    pub fn new() -> Self {
        Board {
            notes: BTreeMap::new(),
            next_id: 1,
            file_path: None,
            modified: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Create a board and load a file if provided. A path that does not
    /// exist yet becomes the save target of an empty board.
    pub fn with_file(path: Option<PathBuf>, ctx: &Context) -> Result<Self> {
        let mut board = Self::new();
        if let Some(p) = path {
            if p.exists() {
                board.load_file(&p, ctx)?;
            } else {
                board.file_path = Some(p);
            }
        }
        Ok(board)
    }

    pub(crate) fn allocate_id(&mut self) -> NoteId {
        let id = NoteId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    /// Notes in creation order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
