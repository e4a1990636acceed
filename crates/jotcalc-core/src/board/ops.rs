use chrono::{DateTime, Utc};
use jotcalc_engine::Context;
use tracing::debug;

use super::state::MAX_UNDO_STACK;
use super::{Board, Note, NoteId, NoteState, UndoAction};
use crate::error::{JotError, Result};

impl Board {
    fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.modified = true;
    }

    /// Put a note into the given state, or remove it for `None`.
    fn apply_note_state(&mut self, id: NoteId, state: Option<NoteState>, ctx: &Context) {
        match state {
            Some(state) => {
                self.notes.insert(id, Note::new(id, state, ctx));
            }
            None => {
                self.notes.remove(&id);
            }
        }
    }

    /// Place a new note and calculate it.
    pub fn add_note(&mut self, x: i64, y: i64, text: &str, ctx: &Context) -> NoteId {
        let id = self.allocate_id();
        let state = NoteState {
            x,
            y,
            text: text.to_string(),
        };
        self.notes.insert(id, Note::new(id, state.clone(), ctx));
        self.push_undo(UndoAction {
            note_id: id,
            old_note: None,
            new_note: Some(state),
        });
        debug!(note = %id, "added note");
        id
    }

    /// Replace a note's text and recalculate it.
    pub fn set_text(&mut self, id: NoteId, text: &str, ctx: &Context) -> Result<()> {
        let note = self.notes.get_mut(&id).ok_or(JotError::NoSuchNote(id))?;
        if note.text == text {
            return Ok(());
        }
        let old = note.state();
        note.text = text.to_string();
        note.recalculate(ctx);
        let new = note.state();
        self.push_undo(UndoAction {
            note_id: id,
            old_note: Some(old),
            new_note: Some(new),
        });
        Ok(())
    }

    /// Move a note. Its result does not depend on position and is kept.
    pub fn move_note(&mut self, id: NoteId, x: i64, y: i64) -> Result<()> {
        let note = self.notes.get_mut(&id).ok_or(JotError::NoSuchNote(id))?;
        if (note.x, note.y) == (x, y) {
            return Ok(());
        }
        let old = note.state();
        note.x = x;
        note.y = y;
        let new = note.state();
        self.push_undo(UndoAction {
            note_id: id,
            old_note: Some(old),
            new_note: Some(new),
        });
        Ok(())
    }

    /// Remove a note, returning it.
    pub fn delete_note(&mut self, id: NoteId) -> Result<Note> {
        let note = self.notes.remove(&id).ok_or(JotError::NoSuchNote(id))?;
        self.push_undo(UndoAction {
            note_id: id,
            old_note: Some(note.state()),
            new_note: None,
        });
        debug!(note = %id, "deleted note");
        Ok(note)
    }

    /// Undo the last change. Returns the note it touched.
    pub fn undo(&mut self, ctx: &Context) -> Result<NoteId> {
        let action = self.undo_stack.pop().ok_or(JotError::NothingToUndo)?;
        let current = self.notes.get(&action.note_id).map(Note::state);
        self.redo_stack.push(UndoAction {
            note_id: action.note_id,
            old_note: action.old_note.clone(),
            new_note: current,
        });
        self.apply_note_state(action.note_id, action.old_note, ctx);
        self.modified = true;
        Ok(action.note_id)
    }

    /// Redo the last undone change. Returns the note it touched.
    pub fn redo(&mut self, ctx: &Context) -> Result<NoteId> {
        let action = self.redo_stack.pop().ok_or(JotError::NothingToRedo)?;
        let current = self.notes.get(&action.note_id).map(Note::state);
        self.undo_stack.push(UndoAction {
            note_id: action.note_id,
            old_note: current,
            new_note: action.new_note.clone(),
        });
        self.apply_note_state(action.note_id, action.new_note, ctx);
        self.modified = true;
        Ok(action.note_id)
    }

    /// Recalculate every note.
    pub fn recalculate_all(&mut self, ctx: &Context) {
        for note in self.notes.values_mut() {
            note.recalculate(ctx);
        }
    }

    /// Recalculate notes showing the current time. Returns how many changed.
    pub fn refresh_live(&mut self, ctx: &Context) -> usize {
        let mut changed = 0;
        for note in self.notes.values_mut().filter(|n| n.is_live()) {
            let before = note.result.take();
            note.recalculate(ctx);
            if note.result != before {
                changed += 1;
            }
        }
        changed
    }

    /// When live clocks next need refreshing: the next minute boundary after
    /// `now`, or `None` if no note shows the current time.
    pub fn next_live_refresh(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.notes().any(Note::is_live) {
            return None;
        }
        let next_minute = (now.timestamp().div_euclid(60) + 1) * 60;
        DateTime::from_timestamp(next_minute, 0)
    }
}
