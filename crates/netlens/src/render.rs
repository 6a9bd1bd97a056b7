//! Table output rendering.

use crate::cli::OutputFormat;
use chrono::{DateTime, SecondsFormat, Utc};
use netlens_engine::{Table, Value};

/// Columns holding epoch milliseconds.
const TIME_COLUMNS: &[&str] = &["timestamp"];

/// Renders a table in the requested format.
pub fn render(table: &Table, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&table.to_json())?),
        OutputFormat::Text => Ok(render_text(table)),
    }
}

fn format_time(value: &Value) -> String {
    match value.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => value.to_string(),
    }
}

fn cell(column: &str, value: &Value) -> String {
    if TIME_COLUMNS.contains(&column) {
        format_time(value)
    } else {
        value.to_string()
    }
}

/// Aligned plain-text table; an empty table prints its header only.
pub fn render_text(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| cell(column, value))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|c| c.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = padded_line(table.columns.iter().map(String::as_str), &widths);
    out.push('\n');
    for row in &cells {
        out.push_str(&padded_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn padded_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = values
        .zip(widths)
        .map(|(v, w)| format!("{:<width$}", v, width = *w))
        .collect();
    padded.join("  ").trim_end().to_string()
}
