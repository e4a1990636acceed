//! File format handling for Jotcalc boards.

mod md;
mod parser;
mod writer;

pub use md::{markdown_content, write_markdown};
pub use parser::{parse_jot, parse_jot_content};
pub use writer::{write_jot, write_jot_content};
