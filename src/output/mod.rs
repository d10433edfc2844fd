//! Report rendering
//!
//! Text reports go through an [`OutputFormatter`] (plain or colored); JSON
//! reports serialize the run and its analysis side by side.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    finding_marker, score_label, truncate_error, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat, MAX_ERROR_CHARS,
};

use crate::{
    analysis::Analysis,
    error::{ErrorContext, Result},
    models::{Config, ProbeDefinition, RunResult},
};
use serde::Serialize;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    pub fn create_formatter(options: FormattingOptions) -> Box<dyn OutputFormatter> {
        if options.enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(FormattingOptions {
            enable_color: config.enable_color && !config.json_output,
            show_errors: config.show_errors,
            verbose_mode: config.verbose,
        })
    }

    /// Plain text formatter for scripts and logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(FormattingOptions {
            enable_color: false,
            ..Default::default()
        })
    }
}

/// The JSON document printed by `--json`
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub run: &'a RunResult,
    pub analysis: &'a Analysis,
}

/// Pretty JSON for a run and its analysis
pub fn render_json(run: &RunResult, analysis: &Analysis) -> Result<String> {
    serde_json::to_string_pretty(&Report { run, analysis }).context("Failed to serialize report")
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    json: bool,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter, json: false }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::from_config(config),
            json: config.json_output,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Full report: header, probes, readiness and findings
    pub fn display_report(&self, run: &RunResult, analysis: &Analysis) -> Result<String> {
        if self.json {
            return render_json(run, analysis);
        }

        let mut sections = vec![
            self.formatter.format_run_header(run)?,
            self.formatter.format_probe_results(&run.results)?,
            String::new(),
            self.formatter.format_readiness(analysis)?,
        ];
        let findings = self.formatter.format_findings(&analysis.tokens)?;
        if !findings.is_empty() {
            sections.push(findings);
        }
        Ok(sections.join("\n"))
    }

    pub fn display_catalog(&self, catalog: &[ProbeDefinition]) -> Result<String> {
        if self.json {
            return serde_json::to_string_pretty(catalog).context("Failed to serialize catalog");
        }
        self.formatter.format_catalog(catalog)
    }

    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }
}
