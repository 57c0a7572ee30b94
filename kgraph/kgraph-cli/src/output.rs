//! Output formatting for the kgraph CLI.
//!
//! Human output uses colored messages and tables; JSON output prints the
//! serialized result DTO so it can be piped into other tools.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;
use serde::Serialize;
use std::fmt::Display;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Print a success message
pub fn success(msg: impl Display) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: impl Display) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: impl Display) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: impl Display) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a section header
pub fn header(msg: impl Display) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: impl Display, value: impl Display) {
    println!("  {}: {}", style(key).cyan(), value);
}

pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        Self { table }
    }

    pub fn header<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String> + Display,
    {
        let row: Vec<Cell> = headers.into_iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
        self.table.set_header(row);
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String> + Display,
    {
        let row: Vec<Cell> = cells.into_iter().map(Cell::new).collect();
        self.table.add_row(row);
        self
    }

    pub fn build(self) -> Table {
        self.table
    }

    pub fn print(self) {
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a score with a fixed precision, or a dash when absent.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.4}", s),
        None => "-".to_string(),
    }
}

/// Shorten a UUID-like id to its first segment for table display.
pub fn short_id(id: impl Display) -> String {
    let full = id.to_string();
    match full.split_once('-') {
        Some((head, _)) => head.to_string(),
        None => full,
    }
}

/// Print data as pretty JSON
pub fn json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
