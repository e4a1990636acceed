//! Writer for .jot file format

use crate::board::Board;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write a Board to a .jot file
pub fn write_jot(path: &Path, board: &Board) -> Result<()> {
    let content = write_jot_content(board);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Board to a .jot format string. Notes are written oldest first so
/// a reload keeps their order.
pub fn write_jot_content(board: &Board) -> String {
    let mut lines = vec!["# Jotcalc Board".to_string()];

    for note in board.notes() {
        lines.push(format!(
            "@{},{}: \"{}\"",
            note.x,
            note.y,
            escape_jot_text(&note.text)
        ));
    }

    lines.join("\n") + "\n"
}

fn escape_jot_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
