//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        // .env values only fill variables not already set
        EnvManager::load_env_file(self.cli.debug)?;

        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(domain) = &cli.domain {
            config.domain = domain.trim().to_string();
        }
        if let Some(lookup) = &cli.lookup_domain {
            config.lookup_domain = Some(lookup.trim().to_string());
        }
        if let Some(timeout) = cli.timeout {
            config.timeout_ms = timeout.as_millis() as u64;
        }
        if let Some(slow) = cli.slow {
            config.slow_threshold_ms = slow.as_millis() as u64;
        }
        if let Some(packet_size) = cli.packet_size {
            config.packet_size = packet_size;
        }
        if !cli.tests.is_empty() {
            config.tests = cli.tests.clone();
        }
        for (name, url) in &cli.endpoints {
            config.endpoint_overrides.insert(*name, url.clone());
        }
        if let Some(concurrency) = cli.concurrency {
            config.concurrency = concurrency;
        }

        if cli.color {
            config.enable_color = true;
        } else if cli.no_color || cli.json {
            config.enable_color = false;
        }

        // CLI-only switches
        config.json_output = cli.json;
        config.show_errors = cli.show_errors;
        config.show_catalog = cli.catalog;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Load the complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for verbose/debug output
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Domain: {}", config.domain));
    summary.push(format!("Lookup Domain: {}", config.effective_lookup_domain()));
    summary.push(format!("Timeout: {}ms", config.timeout_ms));
    summary.push(format!("Slow Threshold: {}ms", config.slow_threshold_ms));
    summary.push(format!("Packet Size: {} bytes", config.packet_size));
    summary.push(format!("Concurrency: {}", config.concurrency));
    let probes: Vec<&str> = config.probes().iter().map(|p| p.as_str()).collect();
    summary.push(format!("Probes: {}", probes.join(", ")));
    if !config.endpoint_overrides.is_empty() {
        let overrides: Vec<String> = config
            .endpoint_overrides
            .iter()
            .map(|(name, url)| format!("{}={}", name, url))
            .collect();
        summary.push(format!("Endpoint Overrides: {}", overrides.join(", ")));
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
