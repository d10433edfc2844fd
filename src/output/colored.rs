//! Colored formatter for terminals
//!
//! Same layout as the plain formatter with ANSI colors on statuses, scores
//! and finding markers.

use super::formatter::{
    finding_marker, finding_text, format_time, score_label, write_failed, FormattingOptions, OutputFormatter,
    PlainFormatter,
};
use crate::{
    analysis::{Analysis, TokenColor, TokenDetail},
    error::Result,
    models::{ProbeDefinition, ProbeResult, RunResult},
    types::Status,
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::TrueColor { r: 255, g: 165, b: 0 },
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    pub fn for_status(&self, status: Status) -> Color {
        match status {
            Status::Ok => self.success,
            Status::Slow => Color::Yellow,
            Status::Timeout => self.warning,
            Status::Bad | Status::Error => self.error,
            Status::Skipped => self.muted,
        }
    }

    pub fn for_token(&self, color: TokenColor) -> Color {
        match color {
            TokenColor::Green => self.success,
            TokenColor::Red => self.error,
            TokenColor::Blue => self.header,
            TokenColor::Orange => self.warning,
            TokenColor::Yellow => Color::Yellow,
        }
    }

    /// Full marks green, half or better yellow, else red
    pub fn for_score(&self, score: i32) -> Color {
        match score {
            10 => self.success,
            5..=9 => Color::Yellow,
            s if s < 0 => self.muted,
            _ => self.error,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn score(&self, score: i32) -> ColoredString {
        self.colorize(&score_label(score), self.color_scheme.for_score(score))
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_run_header(&self, run: &RunResult) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "{} {}", self.bold("Run ID:"), self.colorize(&run.run_id, self.color_scheme.info))
            .map_err(write_failed)?;
        write!(
            output,
            "{} {}, {} {} ms",
            self.bold("Started:"),
            run.started_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.bold("Duration:"),
            run.duration_ms
        )
        .map_err(write_failed)?;
        Ok(output)
    }

    fn format_probe_results(&self, results: &[ProbeResult]) -> Result<String> {
        let mut output = String::new();
        for result in results {
            // Pad before coloring so ANSI codes do not skew the columns
            let status = format!("{:<7}", result.status.as_str());
            writeln!(
                output,
                "- {:<16} {} {:>7}{}",
                result.name.as_str(),
                self.colorize(&status, self.color_scheme.for_status(result.status)),
                format_time(result.time_ms),
                self.plain_formatter.probe_suffix(result)
            )
            .map_err(write_failed)?;
            if self.options.verbose_mode && !result.url.is_empty() {
                writeln!(output, "    {}", self.colorize(&result.url, self.color_scheme.muted)).map_err(write_failed)?;
            }
        }
        Ok(output.trim_end().to_string())
    }

    fn format_readiness(&self, analysis: &Analysis) -> Result<String> {
        Ok(format!(
            "{} IPv4 {} | IPv6 {} (mini {} / {})",
            self.bold("Readiness:"),
            self.score(analysis.score_transition),
            self.score(analysis.score_strict),
            analysis.mini_primary,
            analysis.mini_secondary
        ))
    }

    fn format_findings(&self, tokens: &[TokenDetail]) -> Result<String> {
        if tokens.is_empty() {
            return Ok(String::new());
        }

        let mut output = self.bold("Findings:").to_string();
        for token in tokens {
            let color = self.color_scheme.for_token(token.color);
            let marker = format!("{:<6}", finding_marker(token.color));
            let name = format!("{:<7}", token.color.as_str());
            write!(
                output,
                "\n  {} {} {} (v4={} v6={})",
                self.colorize(&marker, color),
                self.colorize(&name, color),
                finding_text(token),
                token.score_transition,
                token.score_strict
            )
            .map_err(write_failed)?;
        }
        Ok(output)
    }

    fn format_catalog(&self, catalog: &[ProbeDefinition]) -> Result<String> {
        let table = self.plain_formatter.format_catalog(catalog)?;
        Ok(self.colorize(&table, self.color_scheme.info).to_string())
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("WARNING:", self.color_scheme.warning), warning))
    }
}
