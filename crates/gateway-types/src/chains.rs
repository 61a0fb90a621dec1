//! Chain-related types.

use crate::errors::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain identifier.
///
/// Chains are named rather than numbered because several of the supported
/// networks have no EIP-155 style numeric id. Names are stored lower-cased so
/// `"Ethereum"` and `"ethereum"` resolve to the same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
	pub const ETHEREUM: &'static str = "ethereum";
	pub const NETHERMIND: &'static str = "nethermind";
	pub const AVALANCHE: &'static str = "avalanche";
	pub const SOLANA: &'static str = "solana";
	pub const APTOS: &'static str = "aptos";
	pub const SUI: &'static str = "sui";

	pub fn new(name: impl AsRef<str>) -> Self {
		Self(name.as_ref().trim().to_ascii_lowercase())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ChainId {
	type Err = GatewayError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		if s.trim().is_empty() {
			return Err(GatewayError::InvalidRequest(
				"chain id must not be empty".to_string(),
			));
		}
		Ok(ChainId::new(s))
	}
}

impl From<&str> for ChainId {
	fn from(s: &str) -> Self {
		ChainId::new(s)
	}
}

impl From<String> for ChainId {
	fn from(s: String) -> Self {
		ChainId::new(s)
	}
}

impl From<ChainId> for String {
	fn from(id: ChainId) -> Self {
		id.0
	}
}

/// Request/response convention of a chain's API.
///
/// The two JSON-RPC styles share the envelope but differ in method names and
/// integer encoding; the two REST styles differ in whether lookups are path
/// segments (Aptos) or POST bodies (Sui).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireStyle {
	EvmJsonRpc,
	SolanaJsonRpc,
	AptosRest,
	SuiRest,
}

impl WireStyle {
	pub fn is_json_rpc(&self) -> bool {
		matches!(self, WireStyle::EvmJsonRpc | WireStyle::SolanaJsonRpc)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			WireStyle::EvmJsonRpc => "evm_json_rpc",
			WireStyle::SolanaJsonRpc => "solana_json_rpc",
			WireStyle::AptosRest => "aptos_rest",
			WireStyle::SuiRest => "sui_rest",
		}
	}
}

impl fmt::Display for WireStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for WireStyle {
	type Err = GatewayError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"evm_json_rpc" | "evm" => Ok(WireStyle::EvmJsonRpc),
			"solana_json_rpc" | "solana" => Ok(WireStyle::SolanaJsonRpc),
			"aptos_rest" | "aptos" => Ok(WireStyle::AptosRest),
			"sui_rest" | "sui" => Ok(WireStyle::SuiRest),
			other => Err(GatewayError::UnknownWireStyle(other.to_string())),
		}
	}
}
