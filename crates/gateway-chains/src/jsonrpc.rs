//! JSON-RPC 2.0 envelope shared by the EVM and Solana adapters.

use crate::adapter::ResponseFault;
use gateway_types::WireCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request body. Field order matches what nodes and proxies log.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
	pub jsonrpc: &'static str,
	pub method: &'a str,
	pub params: Value,
	pub id: u64,
}

impl<'a> JsonRpcRequest<'a> {
	pub fn new(method: &'a str, params: Value, id: u64) -> Self {
		Self {
			jsonrpc: "2.0",
			method,
			params,
			id,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcError {
	pub code: i64,
	pub message: String,
	#[serde(default)]
	pub data: Option<Value>,
}

/// Monotonic request ids, starting at 1.
#[derive(Debug)]
pub struct RequestIds(AtomicU64);

impl RequestIds {
	pub fn new() -> Self {
		Self(AtomicU64::new(1))
	}

	pub fn next(&self) -> u64 {
		self.0.fetch_add(1, Ordering::Relaxed)
	}
}

impl Default for RequestIds {
	fn default() -> Self {
		Self::new()
	}
}

/// POST call carrying a JSON-RPC request to `url`.
pub fn build_call(
	url: &str,
	headers: &[(String, String)],
	method: &str,
	params: Value,
	id: u64,
) -> WireCall {
	WireCall::post_json(url, &JsonRpcRequest::new(method, params, id))
		.with_headers(headers.iter().cloned())
}

/// Extracts `result` from a decoded response, surfacing an embedded `error`.
///
/// A `null` result is valid (e.g. unknown block hash); a missing one is not.
pub fn into_result(body: Value) -> Result<Value, ResponseFault> {
	let Value::Object(mut object) = body else {
		return Err(ResponseFault::Malformed(
			"JSON-RPC response is not an object".to_string(),
		));
	};

	if let Some(error) = object.remove("error").filter(|e| !e.is_null()) {
		return Err(match serde_json::from_value::<JsonRpcError>(error.clone()) {
			Ok(rpc) => {
				let message = match rpc.data {
					Some(data) if !data.is_null() => format!("{} ({})", rpc.message, data),
					_ => rpc.message,
				};
				ResponseFault::Rpc {
					code: Some(rpc.code),
					message,
				}
			}
			Err(_) => ResponseFault::Rpc {
				code: None,
				message: match error {
					Value::String(s) => s,
					other => other.to_string(),
				},
			},
		});
	}

	object
		.remove("result")
		.ok_or_else(|| ResponseFault::Malformed("JSON-RPC response has no result".to_string()))
}
