//! Registry of chain adapters.
//!
//! The `ChainRegistry` maps chain ids to their adapters. It is assembled once
//! through a [`RegistryBuilder`] and is immutable afterwards, so it can be
//! shared behind an `Arc` and read from any number of concurrent invocations
//! without locking.

use crate::adapter::{AdapterError, ChainAdapter};
use crate::factory::create_adapter;
use gateway_types::{AdapterSpec, ChainId};
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	#[error("Chain {0} already registered")]
	AlreadyRegistered(ChainId),

	#[error("Chain {0} not configured")]
	UnknownChain(ChainId),

	#[error(transparent)]
	Adapter(#[from] AdapterError),
}

/// Immutable chain id to adapter table.
pub struct ChainRegistry {
	adapters: HashMap<ChainId, Arc<dyn ChainAdapter>>,
}

impl ChainRegistry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Builds a registry with one adapter per spec.
	///
	/// # Errors
	///
	/// Returns an error if any adapter cannot be constructed or two specs
	/// share a chain id.
	pub fn from_specs<I>(specs: I) -> Result<Self, RegistryError>
	where
		I: IntoIterator<Item = AdapterSpec>,
	{
		let mut builder = RegistryBuilder::new();
		for spec in specs {
			builder = builder.register(spec)?;
		}
		Ok(builder.build())
	}

	/// Retrieves the adapter for `chain_id`.
	///
	/// # Arguments
	///
	/// * `chain_id` - Normalized id of the chain to look up
	///
	/// # Errors
	///
	/// Returns [`RegistryError::UnknownChain`] if the chain is not registered.
	pub fn lookup(&self, chain_id: &ChainId) -> Result<Arc<dyn ChainAdapter>, RegistryError> {
		self.get(chain_id)
			.ok_or_else(|| RegistryError::UnknownChain(chain_id.clone()))
	}

	/// Retrieves the adapter for `chain_id`, if any.
	///
	/// # Returns
	///
	/// * `Some(adapter)` if the chain is registered
	/// * `None` if the chain is not registered
	pub fn get(&self, chain_id: &ChainId) -> Option<Arc<dyn ChainAdapter>> {
		self.adapters.get(chain_id).cloned()
	}

	/// Registered chain ids, sorted.
	pub fn chains(&self) -> Vec<ChainId> {
		let mut chains: Vec<ChainId> = self.adapters.keys().cloned().collect();
		chains.sort();
		chains
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

impl fmt::Debug for ChainRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainRegistry")
			.field("adapters", &self.chains())
			.finish()
	}
}

/// Collects adapters before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
	adapters: HashMap<ChainId, Arc<dyn ChainAdapter>>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates the adapter for `spec` and registers it.
	///
	/// # Arguments
	///
	/// * `spec` - Chain configuration; its wire style selects the adapter
	///
	/// # Errors
	///
	/// Returns [`RegistryError::Adapter`] if the spec is rejected by the
	/// adapter, or [`RegistryError::AlreadyRegistered`] for a duplicate chain id.
	pub fn register(self, spec: AdapterSpec) -> Result<Self, RegistryError> {
		let adapter = create_adapter(spec)?;
		self.register_adapter(adapter)
	}

	/// Registers an already-constructed adapter.
	///
	/// # Arguments
	///
	/// * `adapter` - The adapter to register, already wrapped in `Arc`
	///
	/// # Errors
	///
	/// Returns an error if an adapter for the same chain id is already registered.
	pub fn register_adapter(mut self, adapter: Arc<dyn ChainAdapter>) -> Result<Self, RegistryError> {
		let chain_id = adapter.chain_id().clone();
		if self.adapters.contains_key(&chain_id) {
			return Err(RegistryError::AlreadyRegistered(chain_id));
		}

		info!(
			"Registering {} adapter for chain {} ({} operations)",
			adapter.wire_style(),
			chain_id,
			adapter.supported_operations().len()
		);
		self.adapters.insert(chain_id, adapter);
		Ok(self)
	}

	pub fn build(self) -> ChainRegistry {
		ChainRegistry {
			adapters: self.adapters,
		}
	}
}

impl fmt::Debug for RegistryBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryBuilder")
			.field("adapters", &self.adapters.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::ResponseFault;
	use gateway_types::{Operation, Payload, WireCall, WireStyle};
	use serde_json::Value;
	use std::collections::BTreeSet;

	// Mock chain adapter for testing
	#[derive(Debug)]
	struct MockAdapter {
		spec: AdapterSpec,
		operations: BTreeSet<Operation>,
	}

	impl MockAdapter {
		fn new(chain: &str) -> Self {
			Self {
				spec: AdapterSpec::new(chain, "http://mock", WireStyle::EvmJsonRpc),
				operations: [Operation::GetBlock].into_iter().collect(),
			}
		}
	}

	impl ChainAdapter for MockAdapter {
		fn spec(&self) -> &AdapterSpec {
			&self.spec
		}

		fn supported_operations(&self) -> &BTreeSet<Operation> {
			&self.operations
		}

		fn build_request(&self, _: Operation, _: &[Value]) -> Result<WireCall, AdapterError> {
			Ok(WireCall::get("http://mock"))
		}

		fn extract_payload(&self, _: Operation, _: Value) -> Result<Payload, ResponseFault> {
			Ok(Payload::new())
		}
	}

	#[test]
	fn test_registry_register_and_get() {
		let registry = ChainRegistry::builder()
			.register_adapter(Arc::new(MockAdapter::new("ethereum")))
			.unwrap()
			.build();

		let retrieved = registry.get(&ChainId::new("ethereum")).unwrap();
		assert_eq!(retrieved.chain_id(), &ChainId::new("ethereum"));

		// Non-existent chain should return None
		assert!(registry.get(&ChainId::new("polygon")).is_none());
	}

	#[test]
	fn test_registry_duplicate_registration() {
		let result = ChainRegistry::builder()
			.register_adapter(Arc::new(MockAdapter::new("ethereum")))
			.unwrap()
			.register_adapter(Arc::new(MockAdapter::new("ethereum")));

		assert_eq!(
			result.unwrap_err(),
			RegistryError::AlreadyRegistered(ChainId::new("ethereum"))
		);
	}

	#[test]
	fn test_lookup_unknown_chain() {
		let registry = ChainRegistry::builder().build();
		assert!(registry.is_empty());
		assert_eq!(
			registry.lookup(&ChainId::new("polygon")).unwrap_err(),
			RegistryError::UnknownChain(ChainId::new("polygon"))
		);
	}

	#[test]
	fn test_from_specs() {
		let registry = ChainRegistry::from_specs([
			AdapterSpec::new("sui", "https://sui.example", WireStyle::SuiRest),
			AdapterSpec::new("aptos", "https://aptos.example/v1", WireStyle::AptosRest),
			AdapterSpec::new("ethereum", "https://eth.example", WireStyle::EvmJsonRpc),
		])
		.unwrap();

		assert_eq!(registry.len(), 3);
		assert_eq!(
			registry.chains(),
			vec![
				ChainId::new("aptos"),
				ChainId::new("ethereum"),
				ChainId::new("sui")
			]
		);
		assert_eq!(
			registry.lookup(&ChainId::new("aptos")).unwrap().wire_style(),
			WireStyle::AptosRest
		);
	}

	#[test]
	fn test_from_specs_propagates_adapter_errors() {
		let result = ChainRegistry::from_specs([AdapterSpec::new(
			"aptos",
			"https://aptos.example/v1",
			WireStyle::AptosRest,
		)
		.with_operations([Operation::GetBalance])]);

		assert!(matches!(result, Err(RegistryError::Adapter(AdapterError::Config(_)))));
	}

	#[test]
	fn test_same_wire_style_different_chains() {
		let registry = ChainRegistry::from_specs([
			AdapterSpec::new("ethereum", "https://eth.example", WireStyle::EvmJsonRpc),
			AdapterSpec::new("nethermind", "http://127.0.0.1:8545", WireStyle::EvmJsonRpc),
			AdapterSpec::new("avalanche", "https://avax.example/ext/bc/C/rpc", WireStyle::EvmJsonRpc),
		])
		.unwrap();

		let avalanche = registry.lookup(&ChainId::new("avalanche")).unwrap();
		assert_eq!(avalanche.spec().base(), "https://avax.example/ext/bc/C/rpc");
		assert_eq!(registry.len(), 3);
	}
}
