//! Normalized results returned to callers.

use crate::{chains::ChainId, operations::Operation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field name to value mapping carried by a successful result.
pub type Payload = Map<String, Value>;

/// Error taxonomy shared by every chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	/// Chain id not present in the registry. No network call was made.
	UnknownChain,
	/// Operation outside the adapter's supported set. No network call was made.
	UnsupportedOperation,
	/// Params missing or of the wrong shape. No network call was made.
	InvalidParams,
	/// Connection failures, attempt timeouts or 5xx responses outlasted the retries.
	TransportFailure,
	/// Non-2xx response that was not retried.
	HttpError,
	/// Body could not be decoded.
	MalformedResponse,
	/// Body decoded but carried a wire-level error object.
	RpcError,
	/// Invocation deadline elapsed before completion.
	Timeout,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::UnknownChain => "UnknownChain",
			ErrorKind::UnsupportedOperation => "UnsupportedOperation",
			ErrorKind::InvalidParams => "InvalidParams",
			ErrorKind::TransportFailure => "TransportFailure",
			ErrorKind::HttpError => "HttpError",
			ErrorKind::MalformedResponse => "MalformedResponse",
			ErrorKind::RpcError => "RpcError",
			ErrorKind::Timeout => "Timeout",
		}
	}

	/// True for kinds that were rejected before any network call.
	pub fn is_fail_fast(&self) -> bool {
		matches!(
			self,
			ErrorKind::UnknownChain | ErrorKind::UnsupportedOperation | ErrorKind::InvalidParams
		)
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
	pub kind: ErrorKind,
	pub http_status: Option<u16>,
	pub message: String,
	pub chain_id: ChainId,
	pub operation: Operation,
	pub retryable: bool,
}

impl fmt::Display for NormalizedError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} on {}/{}: {}",
			self.kind, self.chain_id, self.operation, self.message
		)
	}
}

/// The only type callers see.
///
/// Fields are private so that `success` and `error` can never disagree:
/// results are built through [`NormalizedResult::success`] or
/// [`NormalizedResult::failure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
	success: bool,
	chain_id: ChainId,
	operation: Operation,
	payload: Payload,
	error: Option<NormalizedError>,
}

impl NormalizedResult {
	pub fn success(chain_id: ChainId, operation: Operation, payload: Payload) -> Self {
		Self {
			success: true,
			chain_id,
			operation,
			payload,
			error: None,
		}
	}

	pub fn failure(error: NormalizedError) -> Self {
		Self {
			success: false,
			chain_id: error.chain_id.clone(),
			operation: error.operation,
			payload: Payload::new(),
			error: Some(error),
		}
	}

	pub fn is_success(&self) -> bool {
		self.success
	}

	pub fn chain_id(&self) -> &ChainId {
		&self.chain_id
	}

	pub fn operation(&self) -> Operation {
		self.operation
	}

	pub fn payload(&self) -> &Payload {
		&self.payload
	}

	pub fn into_payload(self) -> Payload {
		self.payload
	}

	pub fn error(&self) -> Option<&NormalizedError> {
		self.error.as_ref()
	}

	pub fn error_kind(&self) -> Option<ErrorKind> {
		self.error.as_ref().map(|e| e.kind)
	}

	/// Looks up a payload field.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.payload.get(field)
	}
}
