//! Adapter construction by wire style.

use crate::adapter::{AdapterError, ChainAdapter};
use crate::implementations::{AptosAdapter, EvmAdapter, SolanaAdapter, SuiAdapter};
use gateway_types::{AdapterSpec, WireStyle};
use std::sync::Arc;
use tracing::debug;

/// Builds the adapter matching `spec.wire_style`.
///
/// # Errors
///
/// Returns [`AdapterError::Config`] if `spec` asks for operations the wire
/// style cannot serve, or carries an invalid route template.
pub fn create_adapter(spec: AdapterSpec) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
	if spec.base_url.trim().is_empty() {
		return Err(AdapterError::Config(format!(
			"chain '{}' has no base URL",
			spec.chain_id
		)));
	}

	debug!(
		"Creating {} adapter for chain {} at {}",
		spec.wire_style, spec.chain_id, spec.base_url
	);

	let adapter: Arc<dyn ChainAdapter> = match spec.wire_style {
		WireStyle::EvmJsonRpc => Arc::new(EvmAdapter::new(spec)?),
		WireStyle::SolanaJsonRpc => Arc::new(SolanaAdapter::new(spec)?),
		WireStyle::AptosRest => Arc::new(AptosAdapter::new(spec)?),
		WireStyle::SuiRest => Arc::new(SuiAdapter::new(spec)?),
	};

	Ok(adapter)
}
