//! Application glue module
//!
//! Configuration and application-level utilities.

mod config;

pub use config::{default_config_path, Config, ConfigError, HeadlessConfig, TermConfig};
