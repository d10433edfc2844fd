//! Additional comprehensive tests for configuration parsing and validation

use super::{default_endpoints, validate_config, ConfigParser, EnvManager};
use crate::{cli::Cli, models::Config, types::ProbeName};
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

/// Edge cases in configuration values
mod config_edge_cases {
    use super::*;

    #[test]
    fn test_config_at_boundaries() {
        let mut config = Config::default();
        config.timeout_ms = 300_000;
        config.packet_size = 65_535;
        config.concurrency = 64;
        assert!(config.validate().is_ok());

        config.concurrency = 65;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_every_probe_overridden_to_empty_is_valid() {
        let mut config = Config::default();
        for name in ProbeName::ALL {
            config.endpoint_overrides.insert(name, String::new());
        }
        assert!(config.validate().is_ok());
        assert!(config.endpoints().is_empty());

        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), ProbeName::ALL.len());
    }

    #[test]
    fn test_subset_only_warns_for_selected_probes() {
        let mut config = Config::default();
        config.tests = vec![ProbeName::Ipv4Dns];
        config.endpoint_overrides.insert(ProbeName::AsnV6, String::new());
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_international_domain_templating() {
        let endpoints = default_endpoints("xn--fsq.xn--0zwm56d", "", 1280);
        let url = url::Url::parse(&endpoints[&ProbeName::DualStack]).unwrap();
        assert_eq!(url.host_str(), Some("ds.xn--fsq.xn--0zwm56d"));
    }

    #[test]
    fn test_packet_size_flows_into_mtu_urls() {
        let mut config = Config::default();
        config.packet_size = 1500;
        let endpoints = config.endpoints();
        let url = url::Url::parse(&endpoints[&ProbeName::Ipv6Mtu]).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("size".to_string(), "1500".to_string())));
        let fill = pairs.iter().find(|(k, _)| k == "fill").map(|(_, v)| v.len());
        assert_eq!(fill, Some(1500));
    }
}

/// Environment variable and .env handling
mod env_parsing_tests {
    use super::*;

    #[test]
    fn test_env_file_loading_does_not_override_set_vars() {
        use std::sync::Mutex;
        static MUTEX: Mutex<()> = Mutex::new(());
        let _guard = MUTEX.lock().unwrap();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TESTIPV6_COMPREHENSIVE_PROBE=from-file").unwrap();
        writeln!(file, "TESTIPV6_COMPREHENSIVE_SET=from-file").unwrap();
        file.flush().unwrap();

        std::env::set_var("TESTIPV6_COMPREHENSIVE_SET", "from-env");
        EnvManager::load_env_file_from(file.path(), false).unwrap();

        assert_eq!(std::env::var("TESTIPV6_COMPREHENSIVE_PROBE").unwrap(), "from-file");
        assert_eq!(std::env::var("TESTIPV6_COMPREHENSIVE_SET").unwrap(), "from-env");

        std::env::remove_var("TESTIPV6_COMPREHENSIVE_PROBE");
        std::env::remove_var("TESTIPV6_COMPREHENSIVE_SET");
    }

    #[test]
    fn test_whitespace_tolerated_in_values() {
        assert!(EnvManager::validate_env_var("TESTIPV6_PACKET_SIZE", " 1400 ").is_ok());
        assert!(EnvManager::validate_env_var("TESTIPV6_TESTS", " ipv4_dns , ipv6_dns ").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", " true ").is_ok());
    }

    #[test]
    fn test_merge_rejects_out_of_range_after_parse() {
        let mut config = Config::default();
        config
            .merge_from_lookup(|key| (key == "TESTIPV6_CONCURRENCY").then(|| "0".to_string()))
            .unwrap();
        assert!(config.validate().is_err());
    }
}

/// CLI to config precedence
mod precedence_tests {
    use super::*;

    #[test]
    fn test_endpoint_flag_beats_env_domain() {
        let mut config = Config::default();
        config
            .merge_from_lookup(|key| (key == "TESTIPV6_DOMAIN").then(|| "env.example".to_string()))
            .unwrap();

        let cli = Cli::parse_from(["testipv6", "--endpoint", "ipv4_dns=https://cli.example/ip/"]);
        ConfigParser::new(cli).apply_cli_overrides(&mut config);

        let endpoints = config.endpoints();
        assert_eq!(endpoints[&ProbeName::Ipv4Dns], "https://cli.example/ip/");
        assert!(endpoints[&ProbeName::Ipv6Dns].contains("ipv6.env.example"));
    }

    #[test]
    fn test_repeated_endpoint_flag_last_wins() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "testipv6",
            "--endpoint", "asn_v4=https://first.example/",
            "--endpoint", "asn_v4=https://second.example/",
        ]);
        ConfigParser::new(cli).apply_cli_overrides(&mut config);
        assert_eq!(config.endpoint_overrides[&ProbeName::AsnV4], "https://second.example/");
    }

    #[test]
    fn test_catalog_flag_carried() {
        let mut config = Config::default();
        ConfigParser::new(Cli::parse_from(["testipv6", "--catalog"])).apply_cli_overrides(&mut config);
        assert!(config.show_catalog);
    }
}
