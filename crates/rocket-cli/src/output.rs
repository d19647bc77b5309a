// crates/rocket-cli/src/output.rs
//
// Output formatting utilities for the Rocket CLI.
// Supports table and JSON output modes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use rocket_core::Timestamp;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Print rows as a table, or `json` as pretty JSON.
pub fn emit<T: Tabled, J: Serialize>(format: OutputFormat, rows: &[T], json: &J) {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(none)");
            } else {
                println!("{}", format_table(rows));
            }
        }
        OutputFormat::Json => println!("{}", format_json(json)),
    }
}

/// Render a unix timestamp as RFC 3339 UTC.
pub fn format_timestamp(ts: Timestamp) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}
