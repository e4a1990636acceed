use super::{Board, Note};
use crate::error::{JotError, Result};
use crate::storage::{parse_jot_content, write_jot, write_markdown};
use jotcalc_engine::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

const MAX_BOARD_FILE_BYTES: u64 = 1_048_576; // 1 MiB

fn read_board_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_BOARD_FILE_BYTES {
        return Err(JotError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: board file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_BOARD_FILE_BYTES
            ),
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

impl Board {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(JotError::NoFilePath);
        };

        write_jot(path, self)?;
        info!(path = %path.display(), notes = self.len(), "saved board");
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to a new path and make it the current file.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.file_path = Some(path.to_path_buf());
        self.save_file()
    }

    /// Load from file, replacing every note. Results are recalculated
    /// against `ctx`; nothing computed is read from disk.
    pub fn load_file(&mut self, path: &Path, ctx: &Context) -> Result<()> {
        // Parse before touching state so a bad file leaves the board as is.
        let content = read_board_file(path)?;
        let states = parse_jot_content(&content)?;

        self.notes = BTreeMap::new();
        self.next_id = 1;
        for state in states {
            let id = self.allocate_id();
            self.notes.insert(id, Note::new(id, state, ctx));
        }
        info!(path = %path.display(), notes = self.len(), "loaded board");

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Export the board with its results as a markdown document.
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_markdown(path, self)?;
        info!(path = %path.display(), "exported markdown");
        Ok(())
    }
}
