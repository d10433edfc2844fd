//! Command-line interface

use crate::types::ProbeName;
use clap::{ArgAction, Parser};
use std::time::Duration;

/// testipv6 - IPv4/IPv6 connectivity and readiness diagnostics
#[derive(Parser, Debug, Clone)]
#[command(name = "testipv6")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base domain the probe hostnames hang off
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Domain for the ASN lookup probes
    #[arg(long, value_name = "DOMAIN")]
    pub lookup_domain: Option<String>,

    /// Per-probe timeout (15s, 500ms, 2m or bare seconds)
    #[arg(short, long, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Responses slower than this are reported as slow
    #[arg(long, value_parser = parse_duration_arg)]
    pub slow: Option<Duration>,

    /// Payload fill size in bytes for the MTU probes
    #[arg(long, value_name = "BYTES")]
    pub packet_size: Option<usize>,

    /// Comma-separated probe subset (default: all)
    #[arg(long, value_name = "LIST", value_delimiter = ',', value_parser = parse_probe_name)]
    pub tests: Vec<ProbeName>,

    /// Override one probe's URL as name=url; an empty url skips the probe
    #[arg(long = "endpoint", value_name = "NAME=URL", action = ArgAction::Append, value_parser = parse_endpoint)]
    pub endpoints: Vec<(ProbeName, String)>,

    /// Probes allowed in flight at once
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Print the run and its analysis as JSON
    #[arg(long)]
    pub json: bool,

    /// Include per-probe error strings in the text report
    #[arg(long)]
    pub show_errors: bool,

    /// Print the probe catalog and exit
    #[arg(long)]
    pub catalog: bool,

    /// List supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Write a commented .env.example to the current directory and exit
    #[arg(long)]
    pub init_env: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.catalog && self.show_errors {
            return Err("--show-errors has no effect with --catalog".to_string());
        }

        if self.env_help && self.init_env {
            return Err("Cannot specify both --env-help and --init-env".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    crate::models::config::parse_duration(s).map_err(|e| e.to_string())
}

fn parse_probe_name(s: &str) -> Result<ProbeName, String> {
    s.parse::<ProbeName>().map_err(|e| e.to_string())
}

/// Parse `name=url`
fn parse_endpoint(s: &str) -> Result<(ProbeName, String), String> {
    let (name, url) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=URL, got '{}'", s))?;
    let name = name.parse::<ProbeName>().map_err(|e| e.to_string())?;
    Ok((name, url.trim().to_string()))
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_are_unset() {
        let cli = Cli::parse_from(["testipv6"]);
        assert!(cli.domain.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.tests.is_empty());
        assert!(cli.endpoints.is_empty());
        assert!(!cli.json);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "testipv6",
            "--domain", "example.net",
            "--lookup-domain", "lookup.example.net",
            "--timeout", "3s",
            "--slow", "750ms",
            "--packet-size", "1400",
            "--tests", "ipv4_dns,dual_stack",
            "--endpoint", "ipv6_mtu=https://mtu.example.net/ip/",
            "--endpoint", "asn_v4=",
            "--concurrency", "2",
            "--json",
            "--show-errors",
            "--no-color",
            "--verbose",
            "--debug",
        ]);

        assert_eq!(cli.domain.as_deref(), Some("example.net"));
        assert_eq!(cli.lookup_domain.as_deref(), Some("lookup.example.net"));
        assert_eq!(cli.timeout, Some(Duration::from_secs(3)));
        assert_eq!(cli.slow, Some(Duration::from_millis(750)));
        assert_eq!(cli.packet_size, Some(1400));
        assert_eq!(cli.tests, vec![ProbeName::Ipv4Dns, ProbeName::DualStack]);
        assert_eq!(
            cli.endpoints,
            vec![
                (ProbeName::Ipv6Mtu, "https://mtu.example.net/ip/".to_string()),
                (ProbeName::AsnV4, String::new()),
            ]
        );
        assert_eq!(cli.concurrency, Some(2));
        assert!(cli.json && cli.show_errors && cli.no_color && cli.verbose && cli.debug);
    }

    #[test]
    fn test_unknown_probe_is_usage_error() {
        assert!(Cli::try_parse_from(["testipv6", "--tests", "ipv4_dns,client_info"]).is_err());
        assert!(Cli::try_parse_from(["testipv6", "--endpoint", "bogus=https://x"]).is_err());
        assert!(Cli::try_parse_from(["testipv6", "--endpoint", "ipv4_dns"]).is_err());
    }

    #[test]
    fn test_bad_duration_is_usage_error() {
        assert!(Cli::try_parse_from(["testipv6", "--timeout", "soon"]).is_err());
        assert!(Cli::try_parse_from(["testipv6", "--slow", "5h"]).is_err());
    }

    #[test]
    fn test_conflicting_color_flags() {
        let cli = Cli::parse_from(["testipv6", "--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_env_flags_are_exclusive() {
        assert!(Cli::parse_from(["testipv6", "--env-help"]).validate().is_ok());
        assert!(Cli::parse_from(["testipv6", "--env-help", "--init-env"]).validate().is_err());
    }

    #[test]
    fn test_use_colors() {
        assert!(!Cli::parse_from(["testipv6", "--no-color"]).use_colors());
        assert!(Cli::parse_from(["testipv6", "--color"]).use_colors());
        assert!(!Cli::parse_from(["testipv6", "--json"]).use_colors());
    }
}
