//! Type definitions shared across the probe runner and the analyzer

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// The eight fixed probe kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeName {
    /// A-only hostname reachability
    #[serde(rename = "ipv4_dns")]
    Ipv4Dns,
    /// AAAA-only hostname reachability
    #[serde(rename = "ipv6_dns")]
    Ipv6Dns,
    /// A+AAAA hostname reachability
    DualStack,
    /// Large payload via the dual-stack hostname
    DualStackMtu,
    /// Large payload via an IPv6-only hostname
    #[serde(rename = "ipv6_mtu")]
    Ipv6Mtu,
    /// Resolver can reach an IPv6-only authoritative server
    #[serde(rename = "dns_v6_resolver")]
    DnsV6Resolver,
    /// ASN lookup over IPv4
    #[serde(rename = "asn_v4")]
    AsnV4,
    /// ASN lookup over IPv6
    #[serde(rename = "asn_v6")]
    AsnV6,
}

impl ProbeName {
    /// Every probe in declaration order; this is also the default run order
    pub const ALL: [ProbeName; 8] = [
        ProbeName::Ipv4Dns,
        ProbeName::Ipv6Dns,
        ProbeName::DualStack,
        ProbeName::DualStackMtu,
        ProbeName::Ipv6Mtu,
        ProbeName::DnsV6Resolver,
        ProbeName::AsnV4,
        ProbeName::AsnV6,
    ];

    /// Stable wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeName::Ipv4Dns => "ipv4_dns",
            ProbeName::Ipv6Dns => "ipv6_dns",
            ProbeName::DualStack => "dual_stack",
            ProbeName::DualStackMtu => "dual_stack_mtu",
            ProbeName::Ipv6Mtu => "ipv6_mtu",
            ProbeName::DnsV6Resolver => "dns_v6_resolver",
            ProbeName::AsnV4 => "asn_v4",
            ProbeName::AsnV6 => "asn_v6",
        }
    }

    /// Parse a comma-separated probe list, ignoring blank entries
    pub fn parse_list(list: &str) -> Result<Vec<ProbeName>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ProbeName::from_str)
            .collect()
    }
}

impl fmt::Display for ProbeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ProbeName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = ProbeName::ALL.iter().map(|n| n.as_str()).collect();
                AppError::validation(format!(
                    "Unknown probe name '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Outcome classification for a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// 2xx/3xx within the slow threshold
    Ok,
    /// 2xx/3xx but slower than the slow threshold
    Slow,
    /// Completed HTTP exchange with a non-success status code
    Bad,
    /// Deadline expired or the run was cancelled
    Timeout,
    /// No endpoint configured for this probe
    Skipped,
    /// Any other transport failure
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Slow => "slow",
            Status::Bad => "bad",
            Status::Timeout => "timeout",
            Status::Skipped => "skipped",
            Status::Error => "error",
        }
    }

    /// `ok` or `slow`
    pub fn is_healthy(&self) -> bool {
        matches!(self, Status::Ok | Status::Slow)
    }

    /// `bad`, `timeout` or `error`
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Status::Bad | Status::Timeout | Status::Error)
    }

    /// Single character used in the compact status strings
    pub fn as_char(&self) -> char {
        match self {
            Status::Ok => 'o',
            Status::Slow => 's',
            Status::Timeout => 't',
            Status::Bad | Status::Error => 'b',
            Status::Skipped => 'x',
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address family reported by a probe endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum IpFamily {
    Ipv4,
    Ipv6,
    #[default]
    Unknown,
}

impl IpFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpFamily::Ipv4 => "ipv4",
            IpFamily::Ipv6 => "ipv6",
            IpFamily::Unknown => "unknown",
        }
    }
}

impl From<String> for IpFamily {
    fn from(value: String) -> Self {
        IpFamily::from(value.as_str())
    }
}

impl From<&str> for IpFamily {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ipv4") {
            IpFamily::Ipv4
        } else if value.eq_ignore_ascii_case("ipv6") {
            IpFamily::Ipv6
        } else {
            IpFamily::Unknown
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
