//! Configuration management module

pub mod endpoints;
pub mod env;
pub mod parser;
pub mod validation;

// Re-export main functionality
pub use endpoints::default_endpoints;
pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use validation::{validate_config, ConfigValidator, ValidationLevel, ValidationWarning};

// Re-export from models for convenience
pub use crate::models::Config;

// Additional comprehensive tests in separate module
#[cfg(test)]
mod comprehensive_tests;
