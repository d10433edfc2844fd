//! Configuration data model and validation

use crate::config::endpoints::default_endpoints;
use crate::types::{AppError, ProbeName, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Longest timeout accepted for a single probe
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);
/// Largest payload fill accepted for MTU probes
pub const MAX_PACKET_SIZE: usize = 65_535;
/// Most probes allowed in flight at once
pub const MAX_CONCURRENCY: usize = 64;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base domain the probe hostnames hang off
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Domain for the ASN lookup probes (defaults to `domain`)
    #[serde(default)]
    pub lookup_domain: Option<String>,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Responses slower than this are classified `slow`
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,

    /// Payload fill size for the MTU probes
    #[serde(default = "default_packet_size")]
    pub packet_size: usize,

    /// Client identifier sent as the User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Cap on bytes read from a probe response body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Probes allowed in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Probe subset to run; empty runs all of them
    #[serde(default)]
    pub tests: Vec<ProbeName>,

    /// Per-probe URL overrides; an empty URL leaves the probe unconfigured
    #[serde(default)]
    pub endpoint_overrides: BTreeMap<ProbeName, String>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Emit JSON instead of the text report
    #[serde(default)]
    pub json_output: bool,

    /// Include per-probe error strings in the text report
    #[serde(default)]
    pub show_errors: bool,

    /// Print the probe catalog instead of running
    #[serde(default)]
    pub show_catalog: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            lookup_domain: None,
            timeout_ms: default_timeout_ms(),
            slow_threshold_ms: default_slow_threshold_ms(),
            packet_size: default_packet_size(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
            concurrency: default_concurrency(),
            tests: Vec::new(),
            endpoint_overrides: BTreeMap::new(),
            enable_color: default_enable_color(),
            json_output: false,
            show_errors: false,
            show_catalog: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }

    /// Lookup domain, falling back to the base domain
    pub fn effective_lookup_domain(&self) -> &str {
        match self.lookup_domain.as_deref().map(str::trim) {
            Some(lookup) if !lookup.is_empty() => lookup,
            _ => &self.domain,
        }
    }

    /// Probes to run, in the order they will be declared to the runner
    pub fn probes(&self) -> Vec<ProbeName> {
        if self.tests.is_empty() {
            ProbeName::ALL.to_vec()
        } else {
            self.tests.clone()
        }
    }

    /// Endpoint map: templated defaults with overrides applied
    pub fn endpoints(&self) -> BTreeMap<ProbeName, String> {
        let mut endpoints = default_endpoints(&self.domain, self.effective_lookup_domain(), self.packet_size);
        for (name, url) in &self.endpoint_overrides {
            let url = url.trim();
            if url.is_empty() {
                endpoints.remove(name);
            } else {
                endpoints.insert(*name, url.to_string());
            }
        }
        endpoints
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(AppError::config("Domain cannot be empty"));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout() > MAX_TIMEOUT {
            return Err(AppError::config(format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT.as_secs())));
        }

        if self.slow_threshold_ms == 0 {
            return Err(AppError::config("Slow threshold must be greater than 0"));
        }

        if self.packet_size == 0 || self.packet_size > MAX_PACKET_SIZE {
            return Err(AppError::config(format!(
                "Packet size must be between 1 and {} bytes, got {}",
                MAX_PACKET_SIZE, self.packet_size
            )));
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(AppError::config(format!(
                "Concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY, self.concurrency
            )));
        }

        if self.max_body_bytes == 0 {
            return Err(AppError::config("Maximum body size must be greater than 0"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(AppError::config("User agent cannot be empty"));
        }

        for (name, url) in &self.endpoint_overrides {
            if url.trim().is_empty() {
                continue;
            }
            match url::Url::parse(url.trim()) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => {
                    return Err(AppError::config(format!(
                        "Endpoint for {} must use http or https, got '{}'",
                        name,
                        parsed.scheme()
                    )));
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid endpoint URL for {} '{}': {}", name, url, e)));
                }
            }
        }

        Ok(())
    }

    /// Merge `TESTIPV6_*` environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge settings from any key/value source shaped like the environment
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(domain) = lookup("TESTIPV6_DOMAIN") {
            self.domain = domain.trim().to_string();
        }

        if let Some(lookup_domain) = lookup("TESTIPV6_LOOKUP_DOMAIN") {
            self.lookup_domain = Some(lookup_domain.trim().to_string());
        }

        if let Some(timeout) = lookup("TESTIPV6_TIMEOUT") {
            self.timeout_ms = duration_ms(&timeout, "TESTIPV6_TIMEOUT")?;
        }

        if let Some(slow) = lookup("TESTIPV6_SLOW") {
            self.slow_threshold_ms = duration_ms(&slow, "TESTIPV6_SLOW")?;
        }

        if let Some(packet_size) = lookup("TESTIPV6_PACKET_SIZE") {
            self.packet_size = packet_size.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TESTIPV6_PACKET_SIZE value '{}': {}", packet_size, e)))?;
        }

        if let Some(user_agent) = lookup("TESTIPV6_USER_AGENT") {
            self.user_agent = user_agent;
        }

        if let Some(tests) = lookup("TESTIPV6_TESTS") {
            self.tests = ProbeName::parse_list(&tests)
                .map_err(|e| AppError::config(format!("Invalid TESTIPV6_TESTS value '{}': {}", tests, e)))?;
        }

        if let Some(concurrency) = lookup("TESTIPV6_CONCURRENCY") {
            self.concurrency = concurrency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TESTIPV6_CONCURRENCY value '{}': {}", concurrency, e)))?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Parse a duration such as `15s`, `500ms`, `2m` or bare seconds (`15`, `1.5`)
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::parse("Duration cannot be empty"));
    }

    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| AppError::parse(format!("Invalid duration '{}'", input)))?;

    let seconds = match unit.trim() {
        "" | "s" | "sec" | "secs" => value,
        "ms" => value / 1000.0,
        "m" | "min" => value * 60.0,
        other => {
            return Err(AppError::parse(format!("Unknown duration unit '{}' in '{}'", other, input)));
        }
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AppError::parse(format!("Invalid duration '{}'", input)));
    }

    Ok(Duration::from_secs_f64(seconds))
}

fn duration_ms(value: &str, key: &str) -> Result<u64> {
    parse_duration(value)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))
}

// Default value functions for serde
fn default_domain() -> String {
    crate::defaults::DEFAULT_DOMAIN.to_string()
}

fn default_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_slow_threshold_ms() -> u64 {
    crate::defaults::DEFAULT_SLOW_THRESHOLD.as_millis() as u64
}

fn default_packet_size() -> usize {
    crate::defaults::DEFAULT_PACKET_SIZE
}

fn default_user_agent() -> String {
    crate::defaults::DEFAULT_USER_AGENT.to_string()
}

fn default_max_body_bytes() -> usize {
    crate::defaults::DEFAULT_MAX_BODY_BYTES
}

fn default_concurrency() -> usize {
    crate::defaults::DEFAULT_CONCURRENCY
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
