//! Error types for contract violations.
//!
//! Expected failures of a call are reported as [`crate::NormalizedError`] values.
//! This enum only covers mistakes made while constructing requests or wiring
//! the gateway together.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	#[error("Unknown operation: {0}")]
	UnknownOperation(String),

	#[error("Unknown wire style: {0}")]
	UnknownWireStyle(String),

	#[error("Configuration error: {0}")]
	Config(String),
}
