//! Configuration module for Pichound
//!
//! Handles loading, parsing, and validating TOML configuration files.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
pub use validation::validate;
