//! Data models for probe results and configuration

pub mod config;
pub mod probe;

// Re-export main model types
pub use config::Config;
pub use probe::{IpObservation, ProbeDefinition, ProbeResult, RunResult};
