//! Configuration validation utilities and rules

use crate::{
    error::{AppError, Result},
    models::Config,
};
use colored::Colorize;

/// Smallest MTU every IPv6 link must carry
pub const IPV6_MIN_MTU: usize = 1280;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and collect non-fatal warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Hard errors first
        config.validate()?;

        warnings.extend(Self::validate_timing(config));
        warnings.extend(Self::validate_packet_size(config));
        warnings.extend(Self::validate_endpoints(config)?);

        Ok(warnings)
    }

    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.slow_threshold_ms >= config.timeout_ms {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Slow threshold ({}ms) is not below the timeout ({}ms); no probe can be classified slow",
                    config.slow_threshold_ms, config.timeout_ms
                ),
            ));
        }

        if config.timeout_ms < 1000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Timeout of {}ms may be too short for distant endpoints", config.timeout_ms),
            ));
        } else if config.timeout_ms > 60_000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Long timeout of {}s will slow down failure detection", config.timeout_ms / 1000),
            ));
        }

        warnings
    }

    fn validate_packet_size(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.packet_size < IPV6_MIN_MTU {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Packet size of {} bytes is below the {}-byte IPv6 minimum MTU; MTU probes cannot detect fragmentation problems",
                    config.packet_size, IPV6_MIN_MTU
                ),
            ));
        }

        warnings
    }

    fn validate_endpoints(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let endpoints = config.endpoints();

        for name in config.probes() {
            let Some(url) = endpoints.get(&name) else {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Probe {} has no endpoint configured and will be skipped", name),
                ));
                continue;
            };

            let parsed = url::Url::parse(url)
                .map_err(|e| AppError::config(format!("Invalid endpoint for {} '{}': {}", name, url, e)))?;

            if parsed.scheme() == "http" {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Endpoint for {} uses HTTP instead of HTTPS: {}", name, url),
                ));
            }

            if let Some(url::Host::Ipv4(ip)) = parsed.host() {
                if ip.is_loopback() || ip.is_private() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Endpoint for {} targets a private/local address {}", name, ip),
                    ));
                }
            }
        }

        Ok(warnings)
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Color name for terminal display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "blue",
            Self::Warning => "yellow",
            Self::Error => "red",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
