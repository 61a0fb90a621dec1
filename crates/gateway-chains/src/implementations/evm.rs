//! EVM JSON-RPC adapter.
//!
//! Serves Ethereum mainnet-style nodes, Nethermind, and any other client that
//! speaks the `eth_*` namespace. Integers go out as `0x` hex quantities and
//! come back as decimal strings.

use super::payload_with;
use crate::adapter::{ensure_supported, resolve_operations, AdapterError, ChainAdapter, ResponseFault};
use crate::jsonrpc::{self, RequestIds};
use crate::{numeric, params};
use gateway_types::{AdapterSpec, Operation, Payload, WireCall};
use serde_json::{json, Value};
use std::collections::BTreeSet;

const BLOCK_TAGS: [&str; 5] = ["latest", "earliest", "pending", "safe", "finalized"];

const BLOCK_QUANTITY_FIELDS: &[&str] = &[
	"number",
	"timestamp",
	"gasUsed",
	"gasLimit",
	"baseFeePerGas",
	"difficulty",
	"totalDifficulty",
	"size",
	"blobGasUsed",
	"excessBlobGas",
];

const TRANSACTION_QUANTITY_FIELDS: &[&str] = &[
	"blockNumber",
	"transactionIndex",
	"nonce",
	"value",
	"gas",
	"gasPrice",
	"maxFeePerGas",
	"maxPriorityFeePerGas",
	"chainId",
	"type",
	"v",
];

/// Adapter for `eth_*` JSON-RPC endpoints.
#[derive(Debug)]
pub struct EvmAdapter {
	spec: AdapterSpec,
	operations: BTreeSet<Operation>,
	ids: RequestIds,
}

impl EvmAdapter {
	pub fn capabilities() -> BTreeSet<Operation> {
		[
			Operation::GetBlock,
			Operation::GetTransaction,
			Operation::GetBalance,
			Operation::GetLatestLedgerInfo,
		]
		.into_iter()
		.collect()
	}

	pub fn new(spec: AdapterSpec) -> Result<Self, AdapterError> {
		let operations = resolve_operations(&spec, &Self::capabilities())?;
		Ok(Self {
			spec,
			operations,
			ids: RequestIds::new(),
		})
	}

	fn method_for(operation: Operation) -> Result<&'static str, AdapterError> {
		match operation {
			Operation::GetBlock => Ok("eth_getBlockByNumber"),
			Operation::GetTransaction => Ok("eth_getTransactionByHash"),
			Operation::GetBalance => Ok("eth_getBalance"),
			Operation::GetLatestLedgerInfo => Ok("eth_blockNumber"),
			other => Err(AdapterError::Unsupported(other)),
		}
	}

	/// Block selector: integer (hex-encoded on the wire), hex/decimal string, or tag.
	fn block_param(params: &[Value], index: usize) -> Result<String, AdapterError> {
		if let Some(Value::String(tag)) = params.get(index) {
			let tag = tag.trim().to_ascii_lowercase();
			if BLOCK_TAGS.contains(&tag.as_str()) {
				return Ok(tag);
			}
		}

		match params::optional_u256(params, index) {
			None => Ok("latest".to_string()),
			Some(Ok(number)) => Ok(numeric::to_hex_quantity(number)),
			Some(Err(reason)) => Err(AdapterError::InvalidParams(format!(
				"param {} (block) must be a block number or one of {:?}: {}",
				index, BLOCK_TAGS, reason
			))),
		}
	}

	fn normalize_transaction(transaction: &mut Value) {
		numeric::normalize_value(transaction, TRANSACTION_QUANTITY_FIELDS);
	}

	fn normalize_block(block: &mut Value) {
		numeric::normalize_value(block, BLOCK_QUANTITY_FIELDS);
		if let Some(Value::Array(transactions)) = block.get_mut("transactions") {
			transactions.iter_mut().for_each(Self::normalize_transaction);
		}
	}

	fn quantity(result: &Value, what: &str) -> Result<Value, ResponseFault> {
		numeric::to_decimal_string(result)
			.map(Value::String)
			.ok_or_else(|| ResponseFault::Malformed(format!("{} is not a quantity: {}", what, result)))
	}
}

impl ChainAdapter for EvmAdapter {
	fn spec(&self) -> &AdapterSpec {
		&self.spec
	}

	fn supported_operations(&self) -> &BTreeSet<Operation> {
		&self.operations
	}

	fn build_request(&self, operation: Operation, params: &[Value]) -> Result<WireCall, AdapterError> {
		ensure_supported(&self.operations, operation)?;
		let method = Self::method_for(operation)?;

		let wire_params = match operation {
			Operation::GetBlock => json!([Self::block_param(params, 0)?, true]),
			Operation::GetTransaction => {
				json!([params::required_str(params, 0, "transaction hash")?])
			}
			Operation::GetBalance => json!([
				params::required_str(params, 0, "address")?,
				Self::block_param(params, 1)?
			]),
			_ => json!([]),
		};

		Ok(jsonrpc::build_call(
			self.spec.base(),
			&self.spec.headers,
			method,
			wire_params,
			self.ids.next(),
		))
	}

	fn extract_payload(&self, operation: Operation, body: Value) -> Result<Payload, ResponseFault> {
		let mut result = jsonrpc::into_result(body)?;

		match operation {
			Operation::GetBalance => Ok(payload_with("balance", Self::quantity(&result, "balance")?)),
			Operation::GetLatestLedgerInfo => Ok(payload_with(
				"block_number",
				Self::quantity(&result, "block number")?,
			)),
			Operation::GetBlock => {
				Self::normalize_block(&mut result);
				Ok(payload_with("block", result))
			}
			Operation::GetTransaction => {
				Self::normalize_transaction(&mut result);
				Ok(payload_with("transaction", result))
			}
			other => Err(ResponseFault::Malformed(format!(
				"no payload mapping for {}",
				other
			))),
		}
	}
}
