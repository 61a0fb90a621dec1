//! The chain adapter contract.

use crate::normalizer;
use gateway_types::{
	AdapterSpec, ChainId, NormalizedResult, Operation, Payload, RawResponse, WireCall, WireStyle,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors raised while constructing an adapter or building a wire call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
	#[error("Invalid params: {0}")]
	InvalidParams(String),

	#[error("Operation {0} is not supported")]
	Unsupported(Operation),

	#[error("Adapter configuration error: {0}")]
	Config(String),
}

/// What went wrong with a response, as observed by an adapter.
///
/// Adapters only say which condition occurred; [`crate::normalizer`] decides
/// how that maps onto the error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFault {
	/// Non-2xx status. `body` is a lossy text preview, never decoded.
	Http { status: u16, body: String },
	/// Body could not be decoded or lacked the expected shape.
	Malformed(String),
	/// Body decoded but carried an error object.
	Rpc { code: Option<i64>, message: String },
}

impl fmt::Display for ResponseFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResponseFault::Http { status, body } if body.is_empty() => write!(f, "HTTP {}", status),
			ResponseFault::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
			ResponseFault::Malformed(reason) => write!(f, "malformed response: {}", reason),
			ResponseFault::Rpc {
				code: Some(code),
				message,
			} => write!(f, "RPC error {}: {}", code, message),
			ResponseFault::Rpc { code: None, message } => write!(f, "RPC error: {}", message),
		}
	}
}

const BODY_PREVIEW_LIMIT: usize = 256;

/// Checks the status code and decodes the body as JSON.
///
/// Non-2xx responses are reported without attempting to decode them.
pub fn decode_body(raw: &RawResponse) -> Result<Value, ResponseFault> {
	if !raw.is_success() {
		let text = String::from_utf8_lossy(&raw.body);
		let preview: String = text.trim().chars().take(BODY_PREVIEW_LIMIT).collect();
		return Err(ResponseFault::Http {
			status: raw.status,
			body: preview,
		});
	}

	serde_json::from_slice(&raw.body).map_err(|e| ResponseFault::Malformed(e.to_string()))
}

/// Translation layer between logical operations and one chain's wire format.
///
/// Implementations are pure: they never perform I/O, so a single instance is
/// shared by every concurrent call for its chain.
pub trait ChainAdapter: Send + Sync + fmt::Debug {
	/// Configuration the adapter was built from.
	fn spec(&self) -> &AdapterSpec;

	/// Operations this adapter accepts.
	fn supported_operations(&self) -> &BTreeSet<Operation>;

	/// Builds the wire call for `operation`.
	///
	/// # Arguments
	///
	/// * `operation` - The logical operation to perform
	/// * `params` - Positional parameters, interpreted per operation
	///
	/// # Errors
	///
	/// Returns [`AdapterError::InvalidParams`] when `params` do not fit the
	/// operation and [`AdapterError::Unsupported`] for operations outside
	/// [`ChainAdapter::supported_operations`].
	fn build_request(&self, operation: Operation, params: &[Value]) -> Result<WireCall, AdapterError>;

	/// Turns a decoded 2xx body into the operation's payload.
	fn extract_payload(&self, operation: Operation, body: Value) -> Result<Payload, ResponseFault>;

	fn chain_id(&self) -> &ChainId {
		&self.spec().chain_id
	}

	fn wire_style(&self) -> WireStyle {
		self.spec().wire_style
	}

	fn supports(&self, operation: Operation) -> bool {
		self.supported_operations().contains(&operation)
	}

	/// Full response handling: status check, decode, payload extraction and
	/// normalization.
	///
	/// # Returns
	///
	/// A successful result carrying the operation's payload, or a failed one
	/// whose kind is `HttpError`, `MalformedResponse` or `RpcError`.
	fn parse_response(&self, operation: Operation, raw: RawResponse) -> NormalizedResult {
		let outcome = decode_body(&raw).and_then(|body| self.extract_payload(operation, body));
		normalizer::normalize(self.chain_id(), operation, outcome)
	}
}

/// Effective operation set for `spec` given what the wire style can do.
pub fn resolve_operations(
	spec: &AdapterSpec,
	capabilities: &BTreeSet<Operation>,
) -> Result<BTreeSet<Operation>, AdapterError> {
	match &spec.supported_operations {
		None => Ok(capabilities.clone()),
		Some(requested) => {
			if let Some(op) = requested.iter().find(|op| !capabilities.contains(op)) {
				return Err(AdapterError::Config(format!(
					"chain '{}' ({}) cannot serve {}",
					spec.chain_id, spec.wire_style, op
				)));
			}
			Ok(requested.clone())
		}
	}
}

/// Checks `operation` against `supported` before any request is built.
pub fn ensure_supported(
	supported: &BTreeSet<Operation>,
	operation: Operation,
) -> Result<(), AdapterError> {
	if supported.contains(&operation) {
		Ok(())
	} else {
		Err(AdapterError::Unsupported(operation))
	}
}
