//! Table formatting utilities for CLI list commands
//!
//! Every list and lookup view builds [`TableRow`]s and hands them to a
//! [`TableFormatter`], which renders aligned text, CSV, Markdown or bare
//! keys. JSON and YAML go through serde on the row structs themselves, see
//! [`print_records`].

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{count_noun, format_number, truncate_str};
use crate::cli::OutputFormat;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 material(s) found.")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }

    /// Summary unless the user asked for quiet output
    pub fn for_output(quiet: bool) -> Self {
        if quiet {
            Self::for_pipe()
        } else {
            Self::default()
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Natural key of the row (cyan colored)
    Key(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Quantity, price or rate
    Number(f64),
    /// Whole number such as a row count or surrogate id
    Integer(i64),
    /// Stock level, red when below the minimum
    Stock { qty: f64, min: f64 },
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for aligned text output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Key(key) => {
                let shown = truncate_str(key, width);
                format!("{:<width$}", style(shown).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width);
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", format_number(*n), width = width),
            CellValue::Integer(n) => format!("{:>width$}", n, width = width),
            CellValue::Stock { qty, min } => {
                let shown = format_number(*qty);
                if qty < min {
                    format!("{:>width$}", style(shown).red().bold(), width = width)
                } else {
                    format!("{:>width$}", shown, width = width)
                }
            }
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Get raw string value (no formatting; used for CSV and key output)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Key(s) | CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Stock { qty, .. } => format_number(*qty),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Empty => "-".to_string(),
            CellValue::Stock { qty, min } if qty < min => format!("**{}**", format_number(*qty)),
            other => other.raw().replace('|', "\\|"),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with key, header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    /// Value printed by `--format id`
    pub key: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that renders rows in the text formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible_columns: &[&str]) -> Result<()> {
        print!("{}", self.render(rows, format, visible_columns)?);
        Ok(())
    }

    /// Render rows in the specified format
    ///
    /// JSON and YAML are not table formats; they fall back to aligned text here.
    pub fn render(&self, rows: &[TableRow], format: OutputFormat, visible_columns: &[&str]) -> Result<String> {
        let columns: Vec<&ColumnDef> = self
            .columns
            .iter()
            .filter(|c| visible_columns.contains(&c.key))
            .collect();

        match format {
            OutputFormat::Csv => render_csv(rows, &columns),
            OutputFormat::Md => Ok(render_md(rows, &columns)),
            OutputFormat::Id => Ok(rows.iter().map(|r| format!("{}\n", r.key)).collect()),
            _ => Ok(self.render_tsv(rows, &columns)),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> Vec<usize> {
        columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // Grow to fit the header, shrink to fit the content, never past the cap
                col.header.len().max(max_content.min(col.width))
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> String {
        let widths = self.calculate_widths(rows, columns);
        let mut out = String::new();

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            out.push_str(parts.join("  ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&count_noun(rows.len(), self.entity_name));
            out.push('\n');
        }

        out
    }
}

fn csv_header(header: &str) -> String {
    header.to_lowercase().replace(' ', "_")
}

fn render_csv(rows: &[TableRow], columns: &[&ColumnDef]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| csv_header(c.header)))
        .into_diagnostic()?;

    for row in rows {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|c| row.get(c.key).map(CellValue::raw).unwrap_or_default()),
            )
            .into_diagnostic()?;
    }

    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}

fn render_md(rows: &[TableRow], columns: &[&ColumnDef]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header.to_string()));

    for row in rows {
        builder.push_record(columns.iter().map(|c| {
            row.get(c.key)
                .map(CellValue::format_md)
                .unwrap_or_else(|| "-".to_string())
        }));
    }

    let mut out = builder.build().with(Style::markdown()).to_string();
    out.push('\n');
    out
}

/// Print a list in the requested format
///
/// JSON and YAML serialize `records` directly; the other formats render `rows`.
pub fn print_records<T: Serialize>(
    records: &[T],
    rows: &[TableRow],
    formatter: &TableFormatter<'_>,
    format: OutputFormat,
    visible_columns: &[&str],
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records).into_diagnostic()?;
            println!("{}", json);
            Ok(())
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(records).into_diagnostic()?;
            print!("{}", yaml);
            Ok(())
        }
        _ => formatter.output(rows, format, visible_columns),
    }
}
