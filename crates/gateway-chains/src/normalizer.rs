//! Maps observed conditions onto the shared error taxonomy.
//!
//! This is the single place that decides `ErrorKind`, `retryable` and the
//! user-facing message. Adapters, the transport and the gateway only report
//! what happened.

use crate::adapter::{AdapterError, ResponseFault};
use gateway_transport::TransportError;
use gateway_types::{ChainId, ErrorKind, NormalizedError, NormalizedResult, Operation, Payload};
use std::time::Duration;

/// Something that ended an invocation without a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	UnknownChain,
	UnsupportedOperation,
	InvalidParams(String),
	Transport(TransportError),
	Fault(ResponseFault),
	Timeout(Duration),
}

impl From<ResponseFault> for Condition {
	fn from(fault: ResponseFault) -> Self {
		Condition::Fault(fault)
	}
}

impl From<TransportError> for Condition {
	fn from(error: TransportError) -> Self {
		Condition::Transport(error)
	}
}

impl From<AdapterError> for Condition {
	fn from(error: AdapterError) -> Self {
		match error {
			AdapterError::Unsupported(_) => Condition::UnsupportedOperation,
			AdapterError::InvalidParams(reason) | AdapterError::Config(reason) => {
				Condition::InvalidParams(reason)
			}
		}
	}
}

pub fn success(chain_id: &ChainId, operation: Operation, payload: Payload) -> NormalizedResult {
	NormalizedResult::success(chain_id.clone(), operation, payload)
}

pub fn failure(chain_id: &ChainId, operation: Operation, condition: Condition) -> NormalizedResult {
	NormalizedResult::failure(classify(chain_id, operation, condition))
}

/// Normalizes the outcome of response handling.
pub fn normalize(
	chain_id: &ChainId,
	operation: Operation,
	outcome: Result<Payload, ResponseFault>,
) -> NormalizedResult {
	match outcome {
		Ok(payload) => success(chain_id, operation, payload),
		Err(fault) => failure(chain_id, operation, fault.into()),
	}
}

/// Builds the error value for `condition`.
pub fn classify(chain_id: &ChainId, operation: Operation, condition: Condition) -> NormalizedError {
	let (kind, http_status, message) = match condition {
		Condition::UnknownChain => (
			ErrorKind::UnknownChain,
			None,
			format!("chain '{}' is not registered", chain_id),
		),
		Condition::UnsupportedOperation => (
			ErrorKind::UnsupportedOperation,
			None,
			format!("operation {} is not supported by chain '{}'", operation, chain_id),
		),
		Condition::InvalidParams(reason) => (ErrorKind::InvalidParams, None, reason),
		Condition::Transport(error) => (
			ErrorKind::TransportFailure,
			error.last_status,
			error.to_string(),
		),
		Condition::Fault(fault) => {
			let message = fault.to_string();
			match fault {
				ResponseFault::Http { status, .. } => (ErrorKind::HttpError, Some(status), message),
				ResponseFault::Malformed(_) => (ErrorKind::MalformedResponse, None, message),
				ResponseFault::Rpc { .. } => (ErrorKind::RpcError, None, message),
			}
		}
		Condition::Timeout(elapsed) => (
			ErrorKind::Timeout,
			None,
			format!("deadline exceeded after {}ms", elapsed.as_millis()),
		),
	};

	NormalizedError {
		kind,
		http_status,
		message,
		chain_id: chain_id.clone(),
		operation,
		retryable: is_retryable(kind, http_status),
	}
}

/// Whether a caller may reasonably try the same request again later.
pub fn is_retryable(kind: ErrorKind, http_status: Option<u16>) -> bool {
	match kind {
		ErrorKind::TransportFailure | ErrorKind::Timeout => true,
		ErrorKind::HttpError => matches!(http_status, Some(408) | Some(429) | Some(500..=599)),
		ErrorKind::UnknownChain
		| ErrorKind::UnsupportedOperation
		| ErrorKind::InvalidParams
		| ErrorKind::MalformedResponse
		| ErrorKind::RpcError => false,
	}
}
