//! Chain adapter implementations.
//!
//! - **evm**: Ethereum, Nethermind and other `eth_*` JSON-RPC nodes
//! - **solana**: Solana JSON-RPC
//! - **aptos**: Aptos fullnode REST API (path-based GETs)
//! - **sui**: Sui REST-over-POST lookups
//!
//! The two REST adapters share the route-template engine in `rest`.

pub mod aptos;
pub mod evm;
pub mod rest;
pub mod solana;
pub mod sui;

pub use aptos::AptosAdapter;
pub use evm::EvmAdapter;
pub use solana::SolanaAdapter;
pub use sui::SuiAdapter;

use gateway_types::Payload;
use serde_json::Value;

/// Single-field payload.
pub(crate) fn payload_with(field: &str, value: Value) -> Payload {
	let mut payload = Payload::new();
	payload.insert(field.to_string(), value);
	payload
}
