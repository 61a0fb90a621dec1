//! Configuration for the chain gateway.
//!
//! Files may be TOML, JSON or YAML. `${VAR}` placeholders are substituted
//! from the environment before parsing, and a small set of environment
//! variables override individual settings afterwards.

pub mod loader;
pub mod serde_helpers;
pub mod types;

pub use loader::{ConfigFormat, ConfigLoader};
pub use types::{ChainConfig, GatewayConfig, GatewaySettingsConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Unsupported config format: {0}")]
	UnsupportedFormat(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}
