//! Logical operations a caller can request from any chain.

use crate::errors::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain-agnostic action.
///
/// Adapters declare which subset they support; the gateway rejects anything
/// outside that subset before touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
	GetBlock,
	GetTransaction,
	GetAccountInfo,
	GetBalance,
	GetLatestLedgerInfo,
	GetAccountResources,
	GetObject,
}

impl Operation {
	pub const ALL: [Operation; 7] = [
		Operation::GetBlock,
		Operation::GetTransaction,
		Operation::GetAccountInfo,
		Operation::GetBalance,
		Operation::GetLatestLedgerInfo,
		Operation::GetAccountResources,
		Operation::GetObject,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Operation::GetBlock => "GetBlock",
			Operation::GetTransaction => "GetTransaction",
			Operation::GetAccountInfo => "GetAccountInfo",
			Operation::GetBalance => "GetBalance",
			Operation::GetLatestLedgerInfo => "GetLatestLedgerInfo",
			Operation::GetAccountResources => "GetAccountResources",
			Operation::GetObject => "GetObject",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Operation {
	type Err = GatewayError;

	/// Accepts `GetBalance`, `getbalance` and `get_balance`.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let wanted: String = s
			.trim()
			.chars()
			.filter(|c| *c != '_' && *c != '-')
			.collect::<String>()
			.to_ascii_lowercase();

		Operation::ALL
			.iter()
			.copied()
			.find(|op| op.as_str().to_ascii_lowercase() == wanted)
			.ok_or_else(|| GatewayError::UnknownOperation(s.to_string()))
	}
}
