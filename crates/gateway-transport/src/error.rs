//! Transport error types.

use std::time::Duration;
use thiserror::Error;

/// Why a single attempt produced no response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
	#[error("Connection failed: {0}")]
	Connect(String),

	#[error("Attempt timed out after {0:?}")]
	Timeout(Duration),

	#[error("Request failed: {0}")]
	Request(String),

	/// The call itself is unusable (bad URL, bad header). Never retried.
	#[error("Invalid request: {0}")]
	Invalid(String),
}

impl AttemptError {
	pub fn is_retryable(&self) -> bool {
		!matches!(self, AttemptError::Invalid(_))
	}
}

/// Every attempt failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport failed after {attempts} attempt(s): {reason}")]
pub struct TransportError {
	pub attempts: u32,
	/// Most recent 5xx status seen, if any attempt got that far.
	pub last_status: Option<u16>,
	pub reason: String,
}

#[derive(Error, Debug)]
pub enum ClientBuildError {
	#[error("Failed to create HTTP client: {0}")]
	Build(#[from] reqwest::Error),
}
