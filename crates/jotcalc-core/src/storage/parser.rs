//! Parser for .jot file format

use crate::board::NoteState;
use crate::error::{JotError, Result};
use std::fs;
use std::path::Path;

/// Parse a .jot file and return its notes in file order
pub fn parse_jot(path: &Path) -> Result<Vec<NoteState>> {
    let content = fs::read_to_string(path)?;
    parse_jot_content(&content)
}

/// Parse .jot content from a string
pub fn parse_jot_content(content: &str) -> Result<Vec<NoteState>> {
    let mut notes = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "@X,Y: "TEXT"" format
        let parse_err = |message: String| JotError::Parse {
            line: line_num + 1,
            message,
        };
        let Some((pos_str, value_str)) = line
            .strip_prefix('@')
            .and_then(|rest| rest.split_once(':'))
        else {
            return Err(parse_err("Expected '@X,Y: \"TEXT\"' format".to_string()));
        };

        let (x, y) = parse_position(pos_str.trim())
            .ok_or_else(|| parse_err(format!("Invalid position: {}", pos_str.trim())))?;

        let value_str = value_str.trim();
        let Some(text) = value_str
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
        else {
            return Err(parse_err(format!(
                "Invalid note text: {}. Text must be quoted.",
                value_str
            )));
        };

        notes.push(NoteState {
            x,
            y,
            text: unescape_jot_text(text),
        });
    }

    Ok(notes)
}

fn parse_position(s: &str) -> Option<(i64, i64)> {
    let (x, y) = s.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn unescape_jot_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
