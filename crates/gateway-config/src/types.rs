//! Configuration file schema.

use crate::serde_helpers::{
	deserialize_chain_map, deserialize_operation_list, deserialize_operation_map,
	serialize_chain_map, serialize_operation_map,
};
use gateway_types::{AdapterSpec, ChainId, Operation, RouteTemplate, WireStyle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
	#[serde(default)]
	pub gateway: GatewaySettingsConfig,

	#[serde(
		default,
		deserialize_with = "deserialize_chain_map",
		serialize_with = "serialize_chain_map"
	)]
	pub chains: BTreeMap<ChainId, ChainConfig>,
}

impl GatewayConfig {
	/// One adapter spec per configured chain, in chain id order.
	pub fn adapter_specs(&self) -> Vec<AdapterSpec> {
		self.chains
			.iter()
			.map(|(chain_id, chain)| chain.to_adapter_spec(chain_id))
			.collect()
	}
}

/// Gateway-wide settings (`[gateway]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettingsConfig {
	pub name: String,
	pub log_level: String,
	/// Per-attempt timeout when neither the chain nor the operation sets one.
	pub default_timeout_ms: u64,
	pub max_retries: u32,
	pub backoff_base_ms: u64,
	pub backoff_max_ms: u64,
	/// Upper bound on concurrently in-flight calls within one batch.
	pub max_concurrency: usize,
	/// Overall deadline applied to `invoke` and `invoke_batch`.
	pub request_deadline_ms: Option<u64>,
}

impl Default for GatewaySettingsConfig {
	fn default() -> Self {
		Self {
			name: "chain-gateway".to_string(),
			log_level: "info".to_string(),
			default_timeout_ms: 10_000,
			max_retries: 3,
			backoff_base_ms: 200,
			backoff_max_ms: 5_000,
			max_concurrency: 16,
			request_deadline_ms: None,
		}
	}
}

impl GatewaySettingsConfig {
	pub fn default_timeout(&self) -> Duration {
		Duration::from_millis(self.default_timeout_ms)
	}

	pub fn backoff_base(&self) -> Duration {
		Duration::from_millis(self.backoff_base_ms)
	}

	pub fn backoff_max(&self) -> Duration {
		Duration::from_millis(self.backoff_max_ms)
	}

	pub fn request_deadline(&self) -> Option<Duration> {
		self.request_deadline_ms.map(Duration::from_millis)
	}
}

/// One chain (`[chains.<id>]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
	pub base_url: String,
	pub wire_style: WireStyle,

	/// Subset of the wire style's operations; all of them when absent.
	#[serde(
		default,
		deserialize_with = "deserialize_operation_list",
		skip_serializing_if = "Option::is_none"
	)]
	pub supported_operations: Option<Vec<Operation>>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_ms: Option<u64>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_retries: Option<u32>,

	#[serde(default)]
	pub headers: BTreeMap<String, String>,

	#[serde(
		default,
		deserialize_with = "deserialize_operation_map",
		serialize_with = "serialize_operation_map"
	)]
	pub operation_timeouts: HashMap<Operation, u64>,

	/// REST route overrides.
	#[serde(
		default,
		deserialize_with = "deserialize_operation_map",
		serialize_with = "serialize_operation_map"
	)]
	pub routes: HashMap<Operation, RouteTemplate>,
}

impl ChainConfig {
	pub fn new(base_url: impl Into<String>, wire_style: WireStyle) -> Self {
		Self {
			base_url: base_url.into(),
			wire_style,
			supported_operations: None,
			timeout_ms: None,
			max_retries: None,
			headers: BTreeMap::new(),
			operation_timeouts: HashMap::new(),
			routes: HashMap::new(),
		}
	}

	pub fn to_adapter_spec(&self, chain_id: &ChainId) -> AdapterSpec {
		let mut spec = AdapterSpec::new(chain_id.clone(), self.base_url.clone(), self.wire_style);

		if let Some(operations) = &self.supported_operations {
			spec = spec.with_operations(operations.iter().copied());
		}
		for (operation, route) in &self.routes {
			spec = spec.with_route(*operation, route.clone());
		}
		for (name, value) in &self.headers {
			spec = spec.with_header(name.clone(), value.clone());
		}
		if let Some(timeout_ms) = self.timeout_ms {
			spec = spec.with_timeout(Duration::from_millis(timeout_ms));
		}
		for (operation, timeout_ms) in &self.operation_timeouts {
			spec = spec.with_operation_timeout(*operation, Duration::from_millis(*timeout_ms));
		}
		if let Some(max_retries) = self.max_retries {
			spec = spec.with_max_retries(max_retries);
		}

		spec
	}
}
