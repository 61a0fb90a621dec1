//! Route-template engine shared by the REST-style adapters.
//!
//! A REST chain is described entirely by data: one [`RouteTemplate`] per
//! operation. Defaults come from the adapter, and configuration can replace
//! any of them.

use crate::adapter::{ensure_supported, resolve_operations, AdapterError, ResponseFault};
use crate::params;
use gateway_types::{AdapterSpec, HttpMethod, Operation, RouteTemplate, WireCall};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Resolved routes and operation set for one REST chain.
#[derive(Debug, Clone)]
pub struct RestEndpoint {
	routes: HashMap<Operation, RouteTemplate>,
	operations: BTreeSet<Operation>,
}

impl RestEndpoint {
	/// Overlays the configured routes on `defaults` and validates the result.
	///
	/// The operations a REST chain can serve are exactly those with a route.
	pub fn new(
		spec: &AdapterSpec,
		defaults: HashMap<Operation, RouteTemplate>,
	) -> Result<Self, AdapterError> {
		let mut routes = defaults;
		routes.extend(spec.routes.iter().map(|(op, route)| (*op, route.clone())));

		for (operation, route) in &routes {
			validate_route(route).map_err(|reason| {
				AdapterError::Config(format!(
					"chain '{}': route for {} is invalid: {}",
					spec.chain_id, operation, reason
				))
			})?;
		}

		let capabilities: BTreeSet<Operation> = routes.keys().copied().collect();
		let operations = resolve_operations(spec, &capabilities)?;

		Ok(Self { routes, operations })
	}

	pub fn operations(&self) -> &BTreeSet<Operation> {
		&self.operations
	}

	pub fn route(&self, operation: Operation) -> Option<&RouteTemplate> {
		self.routes.get(&operation)
	}

	/// Builds the call for `operation` against `spec`'s base URL.
	pub fn build(
		&self,
		spec: &AdapterSpec,
		operation: Operation,
		params: &[Value],
	) -> Result<WireCall, AdapterError> {
		ensure_supported(&self.operations, operation)?;
		let route = self
			.routes
			.get(&operation)
			.ok_or(AdapterError::Unsupported(operation))?;

		let (path, consumed) = render_path(&route.path, params)?;
		let url = if path.is_empty() || path == "/" {
			spec.base().to_string()
		} else if path.starts_with('/') {
			format!("{}{}", spec.base(), path)
		} else {
			format!("{}/{}", spec.base(), path)
		};

		let call = match route.method {
			HttpMethod::Get => WireCall::get(url),
			HttpMethod::Post => {
				let mut body = Map::new();
				for (offset, field) in route.body_fields.iter().enumerate() {
					let index = consumed + offset;
					let value = params.get(index).filter(|v| !v.is_null()).ok_or_else(|| {
						AdapterError::InvalidParams(format!("missing param {} ({})", index, field))
					})?;
					body.insert(field.clone(), value.clone());
				}
				WireCall::post_json(url, &Value::Object(body))
			}
		};

		Ok(call.with_headers(spec.headers.iter().cloned()))
	}
}

/// Substitutes `{name}` placeholders with consecutive params.
///
/// Returns the rendered path and how many params it consumed.
fn render_path(template: &str, params: &[Value]) -> Result<(String, usize), AdapterError> {
	let mut rendered = String::with_capacity(template.len());
	let mut rest = template;
	let mut index = 0;

	while let Some(start) = rest.find('{') {
		rendered.push_str(&rest[..start]);
		let end = rest[start..]
			.find('}')
			.map(|len| start + len)
			.ok_or_else(|| AdapterError::Config(format!("unterminated placeholder in {}", template)))?;
		let name = &rest[start + 1..end];
		rendered.push_str(&params::path_segment(params, index, name)?);
		index += 1;
		rest = &rest[end + 1..];
	}
	rendered.push_str(rest);

	Ok((rendered, index))
}

fn validate_route(route: &RouteTemplate) -> Result<(), String> {
	let opens = route.path.matches('{').count();
	let closes = route.path.matches('}').count();
	if opens != closes {
		return Err(format!("unbalanced braces in '{}'", route.path));
	}
	if route.placeholders().iter().any(|name| name.trim().is_empty()) {
		return Err(format!("empty placeholder in '{}'", route.path));
	}
	if route.method == HttpMethod::Get && !route.body_fields.is_empty() {
		return Err("GET routes cannot carry body fields".to_string());
	}
	if route.path.contains("://") {
		return Err("path must be relative to the base URL".to_string());
	}
	Ok(())
}

/// Default payload field for an operation's response.
pub fn payload_key(operation: Operation) -> &'static str {
	match operation {
		Operation::GetBlock => "block",
		Operation::GetTransaction => "transaction",
		Operation::GetAccountInfo => "account",
		Operation::GetBalance => "balance",
		Operation::GetLatestLedgerInfo => "ledger",
		Operation::GetAccountResources => "resources",
		Operation::GetObject => "object",
	}
}

/// Rejects 2xx bodies that carry an `error` member.
pub fn check_error_body(body: &Value) -> Result<(), ResponseFault> {
	let Some(object) = body.as_object() else {
		return Ok(());
	};
	let Some(error) = object.get("error").filter(|e| !e.is_null()) else {
		return Ok(());
	};

	let (code, mut message) = match error {
		Value::String(message) => (None, message.clone()),
		Value::Object(details) => (
			details.get("code").and_then(Value::as_i64),
			details
				.get("message")
				.and_then(Value::as_str)
				.map(str::to_string)
				.unwrap_or_else(|| error.to_string()),
		),
		other => (None, other.to_string()),
	};

	let error_code = error
		.get("error_code")
		.or_else(|| object.get("error_code"))
		.and_then(Value::as_str);
	if let Some(error_code) = error_code {
		message = format!("{} ({})", message, error_code);
	}

	Err(ResponseFault::Rpc { code, message })
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::WireStyle;
	use serde_json::json;

	fn defaults() -> HashMap<Operation, RouteTemplate> {
		HashMap::from([
			(Operation::GetAccountInfo, RouteTemplate::get("/accounts/{address}")),
			(Operation::GetLatestLedgerInfo, RouteTemplate::get("/")),
			(Operation::GetObject, RouteTemplate::post("/getObject", &["object_id"])),
		])
	}

	fn spec() -> AdapterSpec {
		AdapterSpec::new("test", "https://node.example/v1/", WireStyle::AptosRest)
	}

	#[test]
	fn test_path_rendering() {
		let endpoint = RestEndpoint::new(&spec(), defaults()).unwrap();
		let call = endpoint
			.build(&spec(), Operation::GetAccountInfo, &[json!("0x1")])
			.unwrap();
		assert_eq!(call.method, HttpMethod::Get);
		assert_eq!(call.url, "https://node.example/v1/accounts/0x1");
		assert!(call.body.is_none());
	}

	#[test]
	fn test_root_route_is_base_url() {
		let endpoint = RestEndpoint::new(&spec(), defaults()).unwrap();
		let call = endpoint
			.build(&spec(), Operation::GetLatestLedgerInfo, &[])
			.unwrap();
		assert_eq!(call.url, "https://node.example/v1");
	}

	#[test]
	fn test_post_body_fields() {
		let endpoint = RestEndpoint::new(&spec(), defaults()).unwrap();
		let call = endpoint
			.build(&spec(), Operation::GetObject, &[json!("0x5")])
			.unwrap();
		assert_eq!(call.method, HttpMethod::Post);
		assert_eq!(call.url, "https://node.example/v1/getObject");
		assert_eq!(call.json_body(), Some(json!({"object_id": "0x5"})));

		let err = endpoint.build(&spec(), Operation::GetObject, &[]).unwrap_err();
		assert!(matches!(err, AdapterError::InvalidParams(_)));
	}

	#[test]
	fn test_path_params_validated() {
		let endpoint = RestEndpoint::new(&spec(), defaults()).unwrap();
		for bad in [json!("0x1/resources"), json!("a?b"), json!(""), json!({"x": 1})] {
			let err = endpoint
				.build(&spec(), Operation::GetAccountInfo, &[bad])
				.unwrap_err();
			assert!(matches!(err, AdapterError::InvalidParams(_)));
		}
	}

	#[test]
	fn test_configured_route_overrides_default() {
		let spec = spec().with_route(
			Operation::GetAccountInfo,
			RouteTemplate::get("/v2/account/{address}/info"),
		);
		let endpoint = RestEndpoint::new(&spec, defaults()).unwrap();
		let call = endpoint
			.build(&spec, Operation::GetAccountInfo, &[json!("0x1")])
			.unwrap();
		assert_eq!(call.url, "https://node.example/v1/v2/account/0x1/info");
	}

	#[test]
	fn test_configured_route_extends_capabilities() {
		let spec = spec().with_route(Operation::GetBalance, RouteTemplate::get("/balance/{address}"));
		let endpoint = RestEndpoint::new(&spec, defaults()).unwrap();
		assert!(endpoint.operations().contains(&Operation::GetBalance));
	}

	#[test]
	fn test_invalid_routes_rejected() {
		for route in [
			RouteTemplate::get("/accounts/{address"),
			RouteTemplate::get("/accounts/{}"),
			RouteTemplate {
				method: HttpMethod::Get,
				path: "/x".to_string(),
				body_fields: vec!["a".to_string()],
			},
		] {
			let spec = spec().with_route(Operation::GetBlock, route);
			assert!(matches!(
				RestEndpoint::new(&spec, defaults()),
				Err(AdapterError::Config(_))
			));
		}
	}

	#[test]
	fn test_headers_attached() {
		let spec = spec().with_header("x-aptos-client", "gateway");
		let endpoint = RestEndpoint::new(&spec, defaults()).unwrap();
		let call = endpoint
			.build(&spec, Operation::GetLatestLedgerInfo, &[])
			.unwrap();
		assert_eq!(
			call.headers,
			vec![("x-aptos-client".to_string(), "gateway".to_string())]
		);
	}

	#[test]
	fn test_error_body_detection() {
		assert!(check_error_body(&json!({"data": 1})).is_ok());
		assert!(check_error_body(&json!({"error": null, "data": 1})).is_ok());
		assert!(check_error_body(&json!([1, 2])).is_ok());

		assert_eq!(
			check_error_body(&json!({"error": "object not found"})).unwrap_err(),
			ResponseFault::Rpc {
				code: None,
				message: "object not found".to_string()
			}
		);
		assert_eq!(
			check_error_body(&json!({"error": {"code": -32602, "message": "bad id"}})).unwrap_err(),
			ResponseFault::Rpc {
				code: Some(-32602),
				message: "bad id".to_string()
			}
		);
		assert_eq!(
			check_error_body(&json!({"error": {"message": "gone"}, "error_code": "resource_not_found"}))
				.unwrap_err(),
			ResponseFault::Rpc {
				code: None,
				message: "gone (resource_not_found)".to_string()
			}
		);
	}
}
