//! Caller requests and their wire-level counterparts.

use crate::{chains::ChainId, errors::GatewayError, operations::Operation};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A caller's request: which chain, which operation, and positional params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
	pub chain_id: ChainId,
	pub operation: Operation,
	#[serde(default)]
	pub params: Vec<Value>,
}

impl Request {
	pub fn new(chain_id: impl Into<ChainId>, operation: Operation, params: Vec<Value>) -> Self {
		Self {
			chain_id: chain_id.into(),
			operation,
			params,
		}
	}

	/// Builds a request from the string form used by the caller-facing API.
	///
	/// # Errors
	///
	/// Returns an error if the chain id is empty or the operation name is not
	/// a known [`Operation`].
	pub fn parse(chain_id: &str, operation: &str, params: Vec<Value>) -> crate::Result<Self> {
		let chain_id = chain_id.parse::<ChainId>()?;
		let operation = operation.parse::<Operation>()?;
		Ok(Self::new(chain_id, operation, params))
	}
}

/// HTTP verb used for a wire call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	Get,
	Post,
}

impl fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HttpMethod::Get => f.write_str("GET"),
			HttpMethod::Post => f.write_str("POST"),
		}
	}
}

impl std::str::FromStr for HttpMethod {
	type Err = GatewayError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"GET" => Ok(HttpMethod::Get),
			"POST" => Ok(HttpMethod::Post),
			other => Err(GatewayError::Config(format!(
				"unsupported HTTP method: {}",
				other
			))),
		}
	}
}

/// A fully-resolved network call produced by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct WireCall {
	pub method: HttpMethod,
	pub url: String,
	pub body: Option<Bytes>,
	pub headers: Vec<(String, String)>,
}

impl WireCall {
	pub fn get(url: impl Into<String>) -> Self {
		Self {
			method: HttpMethod::Get,
			url: url.into(),
			body: None,
			headers: Vec::new(),
		}
	}

	/// POST with a JSON body; sets the content type.
	///
	/// Structs keep their declared field order on the wire.
	pub fn post_json<T: Serialize + ?Sized>(url: impl Into<String>, body: &T) -> Self {
		// Serializing plain data structures into a buffer cannot fail.
		let body = serde_json::to_vec(body).unwrap_or_default();
		Self {
			method: HttpMethod::Post,
			url: url.into(),
			body: Some(Bytes::from(body)),
			headers: vec![("content-type".to_string(), "application/json".to_string())],
		}
	}

	pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.headers
			.extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Body decoded as JSON, mainly for logging and tests.
	pub fn json_body(&self) -> Option<Value> {
		self.body
			.as_ref()
			.and_then(|b| serde_json::from_slice(b).ok())
	}
}

/// Transport-level result. Never leaves the adapter boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
	pub status: u16,
	pub body: Bytes,
	pub headers: Vec<(String, String)>,
}

impl RawResponse {
	pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
		Self {
			status,
			body: body.into(),
			headers: Vec::new(),
		}
	}

	pub fn json(status: u16, body: &Value) -> Self {
		Self::new(status, body.to_string())
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	pub fn is_server_error(&self) -> bool {
		(500..600).contains(&self.status)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_request_parse() {
		let req = Request::parse("Ethereum", "get_balance", vec![json!("0xabc")]).unwrap();
		assert_eq!(req.chain_id, ChainId::new("ethereum"));
		assert_eq!(req.operation, Operation::GetBalance);
		assert_eq!(req.params, vec![json!("0xabc")]);
	}

	#[test]
	fn test_request_parse_rejects_unknown_operation() {
		assert!(Request::parse("ethereum", "Transfer", vec![]).is_err());
		assert!(Request::parse("", "GetBlock", vec![]).is_err());
	}

	#[test]
	fn test_request_deserialize_without_params() {
		let req: Request =
			serde_json::from_str(r#"{"chain_id":"aptos","operation":"GetLatestLedgerInfo"}"#)
				.unwrap();
		assert!(req.params.is_empty());
	}

	#[test]
	fn test_post_json_sets_content_type() {
		let call = WireCall::post_json("http://node", &json!({"a": 1}));
		assert_eq!(call.method, HttpMethod::Post);
		assert_eq!(call.json_body(), Some(json!({"a": 1})));
		assert!(call
			.headers
			.iter()
			.any(|(k, v)| k == "content-type" && v == "application/json"));
	}

	#[test]
	fn test_raw_response_status_classes() {
		assert!(RawResponse::new(200, "").is_success());
		assert!(RawResponse::new(204, "").is_success());
		assert!(!RawResponse::new(404, "").is_success());
		assert!(RawResponse::new(503, "").is_server_error());
		assert!(!RawResponse::new(429, "").is_server_error());
	}
}
