//! Probe outcome data models
//!
//! Field names on the wire follow the JSON shape the probe service and its
//! web front end already use (`runId`, `timeMs`, `httpStatusCode` ...).

use crate::types::{IpFamily, ProbeName, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a probe endpoint reported about the address it saw
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IpObservation {
    /// Address as reported by the endpoint
    #[serde(default)]
    pub ip: String,

    /// Address family
    #[serde(rename = "type", default)]
    pub family: IpFamily,

    /// Tunnel subtype such as `Teredo` or `6to4`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Proxy / routing annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,

    /// Autonomous system number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,

    /// Autonomous system name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_name: Option<String>,
}

impl IpObservation {
    /// Create an observation with just an address and family
    pub fn new<S: Into<String>>(ip: S, family: IpFamily) -> Self {
        Self {
            ip: ip.into(),
            family,
            ..Default::default()
        }
    }

    /// Attach a tunnel subtype
    pub fn with_subtype<S: Into<String>>(mut self, subtype: S) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Attach ASN metadata
    pub fn with_asn<S: Into<String>>(mut self, asn: u32, name: S) -> Self {
        self.asn = Some(asn);
        self.asn_name = Some(name.into());
        self
    }

    /// True when an address string is present
    pub fn has_address(&self) -> bool {
        !self.ip.is_empty()
    }

    /// Case-insensitive tunnel subtype comparison
    pub fn is_subtype(&self, name: &str) -> bool {
        self.subtype
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case(name))
            .unwrap_or(false)
    }

    /// Teredo or 6to4
    pub fn is_tunnel(&self) -> bool {
        self.is_subtype("Teredo") || self.is_subtype("6to4")
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub name: ProbeName,
    pub status: Status,

    /// Elapsed milliseconds; absent for skipped probes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<u64>,

    #[serde(default)]
    pub url: String,

    #[serde(rename = "packetSizeBytes", default, skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpObservation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Precise elapsed time, not serialized
    #[serde(skip)]
    pub elapsed: Option<Duration>,
}

impl ProbeResult {
    /// A probe with no configured endpoint
    pub fn skipped(name: ProbeName) -> Self {
        Self {
            name,
            status: Status::Skipped,
            time_ms: None,
            url: String::new(),
            packet_size: None,
            ip: None,
            notes: Some("no endpoint configured".to_string()),
            http_status_code: None,
            error: None,
            elapsed: None,
        }
    }

    /// A probe that was attempted against `url`
    pub fn attempted<S: Into<String>>(name: ProbeName, url: S, status: Status, elapsed: Duration) -> Self {
        Self {
            name,
            status,
            time_ms: Some(elapsed.as_millis() as u64),
            url: url.into(),
            packet_size: None,
            ip: None,
            notes: None,
            http_status_code: None,
            error: None,
            elapsed: Some(elapsed),
        }
    }

    pub fn with_observation(mut self, ip: Option<IpObservation>) -> Self {
        self.ip = ip;
        self
    }

    pub fn with_http_status(mut self, code: u16) -> Self {
        self.http_status_code = Some(code);
        self
    }

    pub fn with_error<S: Into<String>>(mut self, error: S) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = Some(packet_size);
        self
    }

    /// Observed address if it belongs to `family`
    pub fn observation_of(&self, family: IpFamily) -> Option<&IpObservation> {
        self.ip.as_ref().filter(|obs| obs.family == family)
    }
}

/// Aggregate outcome of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,

    /// First IPv4 observation across the run, in probe order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<IpObservation>,

    /// First IPv6 observation across the run, in probe order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<IpObservation>,

    #[serde(default)]
    pub results: Vec<ProbeResult>,

    pub slow_threshold_ms: u64,
    pub timeout_ms: u64,
    pub packet_size_bytes: usize,
}

impl RunResult {
    /// An empty run, mostly useful for tests and replaying stored results
    pub fn empty<S: Into<String>>(run_id: S) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            duration_ms: 0,
            ipv4: None,
            ipv6: None,
            results: Vec::new(),
            slow_threshold_ms: crate::defaults::DEFAULT_SLOW_THRESHOLD.as_millis() as u64,
            timeout_ms: crate::defaults::DEFAULT_TIMEOUT.as_millis() as u64,
            packet_size_bytes: crate::defaults::DEFAULT_PACKET_SIZE,
        }
    }

    /// First result for a given probe
    pub fn result_for(&self, name: ProbeName) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Count of results with the given status
    pub fn count_status(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

/// Catalog entry describing one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeDefinition {
    pub name: ProbeName,
    pub description: String,
    pub category: String,
    #[serde(rename = "requiresIPv6")]
    pub requires_ipv6: bool,
    pub large_payload: bool,
    #[serde(rename = "exampleURL", default, skip_serializing_if = "String::is_empty")]
    pub example_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_size: Option<usize>,
}
