//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::{parse_duration, MAX_CONCURRENCY, MAX_PACKET_SIZE, MAX_TIMEOUT};
use crate::types::ProbeName;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; already-set variables win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# testipv6 Configuration
#
# Values here act as defaults and can be overridden by command-line
# arguments. Variables already set in the environment take precedence
# over this file.

# Base domain the probe hostnames hang off (ipv4.<domain>, ds.<domain> ...)
# TESTIPV6_DOMAIN=test-ipv6.com

# Domain for the ASN lookup probes (defaults to TESTIPV6_DOMAIN)
# TESTIPV6_LOOKUP_DOMAIN=test-ipv6.com

# Per-probe timeout (15s, 500ms, 2m or bare seconds)
# TESTIPV6_TIMEOUT=15s

# Responses slower than this are reported as slow
# TESTIPV6_SLOW=5s

# Payload fill size in bytes for the MTU probes
# TESTIPV6_PACKET_SIZE=1600

# Client identifier sent as the User-Agent header
# TESTIPV6_USER_AGENT=testipv6

# Probe subset to run (comma-separated, empty runs all)
# TESTIPV6_TESTS=ipv4_dns,ipv6_dns,dual_stack,dual_stack_mtu,ipv6_mtu,dns_v6_resolver,asn_v4,asn_v6

# Probes allowed in flight at once (1 runs them sequentially)
# TESTIPV6_CONCURRENCY=8

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example: a private mirror with a shorter timeout
# TESTIPV6_DOMAIN=test-ipv6.example.net
# TESTIPV6_TIMEOUT=5s
# TESTIPV6_SLOW=2s
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "TESTIPV6_DOMAIN" | "TESTIPV6_LOOKUP_DOMAIN" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
                if value.contains("://") || value.contains('/') {
                    return Err(AppError::config(format!("{} must be a bare domain name, got '{}'", key, value)));
                }
            }
            "TESTIPV6_TIMEOUT" => {
                let timeout = parse_duration(value)
                    .map_err(|e| AppError::config(format!("Invalid TESTIPV6_TIMEOUT value '{}': {}", value, e)))?;
                if timeout.is_zero() || timeout > MAX_TIMEOUT {
                    return Err(AppError::config(format!(
                        "TESTIPV6_TIMEOUT must be between 1ms and {}s, got: {}",
                        MAX_TIMEOUT.as_secs(),
                        value
                    )));
                }
            }
            "TESTIPV6_SLOW" => {
                let slow = parse_duration(value)
                    .map_err(|e| AppError::config(format!("Invalid TESTIPV6_SLOW value '{}': {}", value, e)))?;
                if slow.is_zero() {
                    return Err(AppError::config("TESTIPV6_SLOW must be greater than 0"));
                }
            }
            "TESTIPV6_PACKET_SIZE" => {
                let size: usize = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid TESTIPV6_PACKET_SIZE value '{}': {}", value, e)))?;
                if size == 0 || size > MAX_PACKET_SIZE {
                    return Err(AppError::config(format!(
                        "TESTIPV6_PACKET_SIZE must be between 1 and {}, got: {}",
                        MAX_PACKET_SIZE, size
                    )));
                }
            }
            "TESTIPV6_USER_AGENT" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("TESTIPV6_USER_AGENT cannot be empty"));
                }
            }
            "TESTIPV6_TESTS" => {
                ProbeName::parse_list(value)
                    .map_err(|e| AppError::config(format!("Invalid TESTIPV6_TESTS value: {}", e)))?;
            }
            "TESTIPV6_CONCURRENCY" => {
                let concurrency: usize = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid TESTIPV6_CONCURRENCY value '{}': {}", value, e)))?;
                if concurrency == 0 || concurrency > MAX_CONCURRENCY {
                    return Err(AppError::config(format!(
                        "TESTIPV6_CONCURRENCY must be between 1 and {}, got: {}",
                        MAX_CONCURRENCY, concurrency
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Not one of ours
            }
        }

        Ok(())
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("TESTIPV6_DOMAIN", "Base domain for probe hostnames", "test-ipv6.com"),
            ("TESTIPV6_LOOKUP_DOMAIN", "Domain for ASN lookup probes", "test-ipv6.com"),
            ("TESTIPV6_TIMEOUT", "Per-probe timeout (max 300s)", "15s"),
            ("TESTIPV6_SLOW", "Slow response threshold", "5s"),
            ("TESTIPV6_PACKET_SIZE", "MTU probe payload size (1-65535)", "1600"),
            ("TESTIPV6_USER_AGENT", "User-Agent header value", "testipv6"),
            ("TESTIPV6_TESTS", "Comma-separated probe subset", "ipv4_dns,ipv6_dns"),
            ("TESTIPV6_CONCURRENCY", "Probes in flight at once (1-64)", "8"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<24} {}\n", var, description));
            help.push_str(&format!("  {:<24} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(e.to_string());
                }
            }
        }

        warnings
    }

    /// Check an env file's contents without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Err(e) = Self::validate_env_var(key, value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", var)), "missing {}", var);
        }
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("testipv6 Configuration"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("TESTIPV6_DOMAIN", "test-ipv6.com").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_TIMEOUT", "15s").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_TIMEOUT", "500ms").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_SLOW", "5").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_PACKET_SIZE", "1280").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_TESTS", "ipv4_dns,asn_v6").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_CONCURRENCY", "1").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());

        assert!(EnvManager::validate_env_var("TESTIPV6_DOMAIN", "https://test-ipv6.com").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_DOMAIN", "").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_TIMEOUT", "0").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_TIMEOUT", "301s").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_SLOW", "0ms").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_PACKET_SIZE", "0").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_PACKET_SIZE", "65536").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_TESTS", "ipv4_dns,client_info").is_err());
        assert!(EnvManager::validate_env_var("TESTIPV6_CONCURRENCY", "65").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("TESTIPV6_DOMAIN"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_check_env_file_reports_bad_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "TESTIPV6_TIMEOUT=10s").unwrap();
        writeln!(file, "TESTIPV6_PACKET_SIZE=huge").unwrap();
        file.flush().unwrap();

        let warnings = EnvManager::check_env_file(file.path()).unwrap().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("TESTIPV6_PACKET_SIZE"));
    }

    #[test]
    fn test_check_missing_env_file() {
        let result = EnvManager::check_env_file(Path::new("/nonexistent/.env.testipv6")).unwrap();
        assert!(result.is_none());
    }
}
