//! Core formatting traits and the plain text implementation

use crate::{
    analysis::{Analysis, TokenColor, TokenDetail, NOT_APPLICABLE},
    error::{AppError, Result},
    models::{ProbeDefinition, ProbeResult, RunResult},
};
use std::fmt::Write as _;

/// Longest error string shown per probe
pub const MAX_ERROR_CHARS: usize = 200;

/// Main trait for report formatting
pub trait OutputFormatter {
    /// Run id, start time and duration
    fn format_run_header(&self, run: &RunResult) -> Result<String>;

    /// One line per probe
    fn format_probe_results(&self, results: &[ProbeResult]) -> Result<String>;

    /// Both readiness scores and the compact status strings
    fn format_readiness(&self, analysis: &Analysis) -> Result<String>;

    /// Expanded tokens with markers
    fn format_findings(&self, tokens: &[TokenDetail]) -> Result<String>;

    /// Probe catalog as a table
    fn format_catalog(&self, catalog: &[ProbeDefinition]) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show per-probe error strings
    pub show_errors: bool,
    /// Add the probe URL under each probe line
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: crate::defaults::DEFAULT_ENABLE_COLOR,
            show_errors: false,
            verbose_mode: false,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

pub(crate) fn write_failed(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// `n/10`, or `n/a` for the not-applicable sentinel
pub fn score_label(score: i32) -> String {
    if score == NOT_APPLICABLE || score < 0 {
        "n/a".to_string()
    } else {
        format!("{}/10", score)
    }
}

/// Finding marker for a token color
pub fn finding_marker(color: TokenColor) -> &'static str {
    match color {
        TokenColor::Green => "[OK]",
        TokenColor::Blue => "[INFO]",
        TokenColor::Orange => "[WARN]",
        TokenColor::Red => "[FAIL]",
        TokenColor::Yellow => "[INFO]",
    }
}

/// Cut an error string to `max` characters, marking the cut
pub fn truncate_error(error: &str, max: usize) -> String {
    if error.chars().count() <= max {
        error.to_string()
    } else {
        let mut cut: String = error.chars().take(max).collect();
        cut.push('…');
        cut
    }
}

/// `25ms`, or `-` for probes that never ran
pub fn format_time(time_ms: Option<u64>) -> String {
    match time_ms {
        Some(ms) => format!("{}ms", ms),
        None => "-".to_string(),
    }
}

/// Message plus reference link, as shown in findings
pub fn finding_text(token: &TokenDetail) -> String {
    let message = if token.message.is_empty() {
        token.token.as_str()
    } else {
        token.message.as_ref()
    };
    match &token.more_info {
        Some(link) => format!("{} [more: {}]", message, link),
        None => message.to_string(),
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Trailing `ip=` and `err=` fields for a probe line
    pub(crate) fn probe_suffix(&self, result: &ProbeResult) -> String {
        let mut suffix = String::new();
        if let Some(ip) = result.ip.as_ref().filter(|ip| ip.has_address()) {
            suffix.push_str(&format!(" ip={}", ip.ip));
            if let Some(asn) = ip.asn {
                suffix.push_str(&format!(" asn={}", asn));
            }
        }
        if self.options.show_errors {
            if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
                suffix.push_str(&format!(" err={}", truncate_error(error, MAX_ERROR_CHARS)));
            }
        }
        suffix
    }

    pub(crate) fn catalog_table(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Probe", Alignment::Left, 16),
                Column::new("Category", Alignment::Left, 12),
                Column::new("IPv6", Alignment::Center, 4),
                Column::new("Large", Alignment::Center, 5),
                Column::new("Description", Alignment::Left, 48),
            ],
            show_borders: true,
        }
    }

    pub(crate) fn catalog_rows(&self, catalog: &[ProbeDefinition]) -> Vec<RowData> {
        let flag = |set: bool| if set { "yes" } else { "no" }.to_string();
        catalog
            .iter()
            .map(|def| {
                vec![
                    def.name.to_string(),
                    def.category.clone(),
                    flag(def.requires_ipv6),
                    flag(def.large_payload),
                    def.description.clone(),
                ]
            })
            .collect()
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }
        let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
        output.push_str(&self.create_row(&headers, &widths, format));
        output.push('\n');
        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
        }

        output
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                content.max(col.header.len()).min(col.max_width)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();
        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx).map(|c| &c.alignment).unwrap_or(&Alignment::Left);
            let padded = self.align_text(cell, width, alignment);

            if format.show_borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.chars().take(width).collect();
        }

        let padding = width - len;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left = padding / 2;
                format!("{}{}{}", " ".repeat(left), text, " ".repeat(padding - left))
            }
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_run_header(&self, run: &RunResult) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Run ID: {}", run.run_id).map_err(write_failed)?;
        write!(
            output,
            "Started: {}, Duration: {} ms",
            run.started_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            run.duration_ms
        )
        .map_err(write_failed)?;
        Ok(output)
    }

    fn format_probe_results(&self, results: &[ProbeResult]) -> Result<String> {
        let mut output = String::new();
        for result in results {
            writeln!(
                output,
                "- {:<16} {:<7} {:>7}{}",
                result.name.as_str(),
                result.status.as_str(),
                format_time(result.time_ms),
                self.probe_suffix(result)
            )
            .map_err(write_failed)?;
            if self.options.verbose_mode && !result.url.is_empty() {
                writeln!(output, "    {}", result.url).map_err(write_failed)?;
            }
        }
        Ok(output.trim_end().to_string())
    }

    fn format_readiness(&self, analysis: &Analysis) -> Result<String> {
        Ok(format!(
            "Readiness: IPv4 {} | IPv6 {} (mini {} / {})",
            score_label(analysis.score_transition),
            score_label(analysis.score_strict),
            analysis.mini_primary,
            analysis.mini_secondary
        ))
    }

    fn format_findings(&self, tokens: &[TokenDetail]) -> Result<String> {
        if tokens.is_empty() {
            return Ok(String::new());
        }

        let mut output = String::from("Findings:");
        for token in tokens {
            write!(
                output,
                "\n  {:<6} {:<7} {} (v4={} v6={})",
                finding_marker(token.color),
                token.color.as_str(),
                finding_text(token),
                token.score_transition,
                token.score_strict
            )
            .map_err(write_failed)?;
        }
        Ok(output)
    }

    fn format_catalog(&self, catalog: &[ProbeDefinition]) -> Result<String> {
        if catalog.is_empty() {
            return Ok("No probes defined.".to_string());
        }
        Ok(self.create_table(&self.catalog_table(), &self.catalog_rows(catalog)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }
}
