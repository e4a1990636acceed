//! Markdown export functionality

use crate::board::{Board, Note};
use jotcalc_engine::CalculationResult;
use jotcalc_engine::engine::TimezoneCalculation;
use std::fmt::Write;
use std::path::Path;

/// Write the board to a markdown file
pub fn write_markdown(path: &Path, board: &Board) -> std::io::Result<()> {
    std::fs::write(path, markdown_content(board))
}

/// Render the board as markdown: one table row per note, then a time zone
/// table for every note that produced one.
pub fn markdown_content(board: &Board) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render(&mut out, board);
    out
}

fn render(out: &mut String, board: &Board) -> std::fmt::Result {
    writeln!(out, "# Board")?;
    writeln!(out)?;

    if board.is_empty() {
        writeln!(out, "*Empty board*")?;
        return Ok(());
    }

    writeln!(out, "| Note | Position | Input | Result |")?;
    writeln!(out, "|---|---|---|---|")?;
    for note in board.notes() {
        writeln!(
            out,
            "| {} | {}, {} | {} | {} |",
            note.id,
            note.x,
            note.y,
            escape_markdown(&note.text),
            escape_markdown(note.display())
        )?;
    }

    for note in board.notes() {
        if let Some(CalculationResult::Timezone(tz)) = &note.result {
            render_zones(out, note, tz)?;
        }
    }

    Ok(())
}

fn render_zones(out: &mut String, note: &Note, tz: &TimezoneCalculation) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "## {}: {}", note.id, escape_markdown(&tz.original))?;
    writeln!(out)?;
    writeln!(out, "| Zone | Time |")?;
    writeln!(out, "|---|---|")?;
    for row in &tz.zones {
        let night = if row.is_night { " (night)" } else { "" };
        if row.is_local_or_source {
            writeln!(out, "| **{}** | **{}**{} |", row.label, row.time, night)?;
        } else {
            writeln!(out, "| {} | {}{} |", row.label, row.time, night)?;
        }
    }
    Ok(())
}

/// Escape special markdown characters in note content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\r', "").replace('\n', "<br>")
}
