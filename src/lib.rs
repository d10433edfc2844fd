//! testipv6
//!
//! Determines a client's IPv4/IPv6 connectivity quality by running a fixed
//! battery of HTTP probes against specially-named endpoints and turning the
//! outcomes into an explainable verdict: diagnostic tokens with colors and
//! messages, plus dual-stack and IPv6-only readiness scores.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod runner;
pub mod types;

// Re-export commonly used types
pub use analysis::{analyze, Analysis, DiagnosticToken, TokenColor, TokenDetail};
pub use error::{AppError, Result};
pub use models::{Config, IpObservation, ProbeDefinition, ProbeResult, RunResult};
pub use runner::{CancelHandle, CancelSignal, ProbeRunner, RunOverrides, RunnerOptions};
pub use types::{IpFamily, ProbeName, Status};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Version line including build metadata when available
pub fn build_info() -> String {
    let mut info = format!("{} v{} ({})", PKG_NAME, VERSION, env!("TARGET_TRIPLE"));
    if let Some(commit) = option_env!("GIT_COMMIT") {
        info.push_str(&format!(" commit {}", commit));
    }
    info.push_str(&format!(", built {}", env!("BUILD_TIME")));
    info.push_str(&format!("\n{}", PKG_DESCRIPTION));
    info
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_DOMAIN: &str = "test-ipv6.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
    pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(5);
    pub const DEFAULT_PACKET_SIZE: usize = 1600;
    pub const DEFAULT_USER_AGENT: &str = concat!("testipv6/", env!("CARGO_PKG_VERSION"));
    /// Upper bound on how much of a probe response body is read
    pub const DEFAULT_MAX_BODY_BYTES: usize = 4 << 20;
    pub const DEFAULT_CONCURRENCY: usize = 8;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
