//! Per-chain adapter configuration.

use crate::{chains::ChainId, chains::WireStyle, operations::Operation, request::HttpMethod};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// REST route for one operation.
///
/// `{name}` placeholders in `path` are filled from the request params in the
/// order they appear. Each entry of `body_fields` then takes the next unused
/// param and becomes a member of the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTemplate {
	pub method: HttpMethod,
	pub path: String,
	#[serde(default)]
	pub body_fields: Vec<String>,
}

impl RouteTemplate {
	pub fn get(path: impl Into<String>) -> Self {
		Self {
			method: HttpMethod::Get,
			path: path.into(),
			body_fields: Vec::new(),
		}
	}

	pub fn post(path: impl Into<String>, body_fields: &[&str]) -> Self {
		Self {
			method: HttpMethod::Post,
			path: path.into(),
			body_fields: body_fields.iter().map(|f| f.to_string()).collect(),
		}
	}

	/// Names of the `{placeholder}` segments in `path`, in order.
	pub fn placeholders(&self) -> Vec<&str> {
		let mut names = Vec::new();
		let mut rest = self.path.as_str();
		while let Some(start) = rest.find('{') {
			let Some(len) = rest[start..].find('}') else {
				break;
			};
			names.push(&rest[start + 1..start + len]);
			rest = &rest[start + len + 1..];
		}
		names
	}

	/// Number of params this route consumes.
	pub fn arity(&self) -> usize {
		self.placeholders().len() + self.body_fields.len()
	}
}

/// Everything needed to construct one chain's adapter.
///
/// Built once at startup and never mutated. `supported_operations = None`
/// means "whatever the wire style can do"; `routes` only overrides the
/// defaults of REST styles.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSpec {
	pub chain_id: ChainId,
	pub base_url: String,
	pub wire_style: WireStyle,
	pub supported_operations: Option<BTreeSet<Operation>>,
	pub routes: HashMap<Operation, RouteTemplate>,
	pub headers: Vec<(String, String)>,
	pub timeout: Option<Duration>,
	pub operation_timeouts: HashMap<Operation, Duration>,
	pub max_retries: Option<u32>,
}

impl AdapterSpec {
	pub fn new(chain_id: impl Into<ChainId>, base_url: impl Into<String>, wire_style: WireStyle) -> Self {
		Self {
			chain_id: chain_id.into(),
			base_url: base_url.into(),
			wire_style,
			supported_operations: None,
			routes: HashMap::new(),
			headers: Vec::new(),
			timeout: None,
			operation_timeouts: HashMap::new(),
			max_retries: None,
		}
	}

	pub fn with_operations<I: IntoIterator<Item = Operation>>(mut self, ops: I) -> Self {
		self.supported_operations = Some(ops.into_iter().collect());
		self
	}

	pub fn with_route(mut self, operation: Operation, route: RouteTemplate) -> Self {
		self.routes.insert(operation, route);
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	pub fn with_operation_timeout(mut self, operation: Operation, timeout: Duration) -> Self {
		self.operation_timeouts.insert(operation, timeout);
		self
	}

	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = Some(max_retries);
		self
	}

	/// Per-attempt timeout for `operation`, falling back to `default`.
	pub fn timeout_for(&self, operation: Operation, default: Duration) -> Duration {
		self.operation_timeouts
			.get(&operation)
			.copied()
			.or(self.timeout)
			.unwrap_or(default)
	}

	/// Base URL without a trailing slash.
	pub fn base(&self) -> &str {
		self.base_url.trim_end_matches('/')
	}
}
