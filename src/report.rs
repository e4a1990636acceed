//! Plain-text rendering of results for the terminal.

use jotcalc_core::{Board, CalculationResult};
use std::fmt::Write;

/// Render one result. Numeric results print their formatted value; mixed
/// blocks list each horizontal line before the total; time zone results
/// print one row per zone with the local or source zone marked.
pub fn render_result(result: &CalculationResult) -> String {
    let mut out = String::new();
    match result {
        CalculationResult::Mixed(mixed) => {
            let lines: Vec<&str> = mixed.original.lines().collect();
            for part in &mixed.horizontal_parts {
                let line = lines.get(part.line_index).map(|l| l.trim()).unwrap_or("");
                let _ = writeln!(out, "{} = {}", line, part.result.formatted());
            }
            out.push_str(&mixed.formatted);
        }
        CalculationResult::Timezone(tz) => {
            let rows: Vec<String> = tz
                .zones
                .iter()
                .map(|row| {
                    let marker = if row.is_local_or_source { '*' } else { ' ' };
                    format!("{} {:<4} {:>8}", marker, row.label.abbreviation(), row.time)
                })
                .collect();
            out.push_str(&rows.join("\n"));
        }
        other => out.push_str(other.formatted()),
    }
    out
}

/// One line per note: id, position and the formatted result.
pub fn render_board(board: &Board) -> String {
    board
        .notes()
        .map(|note| format!("{} ({}, {}): {}", note.id, note.x, note.y, note.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
