//! Solana JSON-RPC adapter.

use super::payload_with;
use crate::adapter::{ensure_supported, resolve_operations, AdapterError, ChainAdapter, ResponseFault};
use crate::jsonrpc::{self, RequestIds};
use crate::{numeric, params};
use gateway_types::{AdapterSpec, Operation, Payload, WireCall};
use serde_json::{json, Value};
use std::collections::BTreeSet;

const BLOCK_FIELDS: &[&str] = &["blockHeight", "parentSlot", "blockTime"];
const TRANSACTION_FIELDS: &[&str] = &["slot", "blockTime"];

/// Adapter for Solana's JSON-RPC API.
#[derive(Debug)]
pub struct SolanaAdapter {
	spec: AdapterSpec,
	operations: BTreeSet<Operation>,
	ids: RequestIds,
}

impl SolanaAdapter {
	pub fn capabilities() -> BTreeSet<Operation> {
		[
			Operation::GetAccountInfo,
			Operation::GetBlock,
			Operation::GetBalance,
			Operation::GetTransaction,
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
			Operation::GetAccountInfo => Ok("getAccountInfo"),
			Operation::GetBlock => Ok("getBlock"),
			Operation::GetBalance => Ok("getBalance"),
			Operation::GetTransaction => Ok("getTransaction"),
			Operation::GetLatestLedgerInfo => Ok("getSlot"),
			other => Err(AdapterError::Unsupported(other)),
		}
	}

	/// Splits an `RpcResponse` (`{context: {slot}, value}`) into its parts.
	fn with_context(result: Value) -> Result<(Value, Value), ResponseFault> {
		let Value::Object(mut object) = result else {
			return Err(ResponseFault::Malformed(
				"expected a {context, value} result".to_string(),
			));
		};

		let slot = object
			.get("context")
			.and_then(|context| context.get("slot"))
			.and_then(numeric::to_decimal_string)
			.ok_or_else(|| ResponseFault::Malformed("result has no context.slot".to_string()))?;
		let value = object
			.remove("value")
			.ok_or_else(|| ResponseFault::Malformed("result has no value".to_string()))?;

		Ok((value, Value::String(slot)))
	}

	fn decimal(value: &Value, what: &str) -> Result<Value, ResponseFault> {
		numeric::to_decimal_string(value)
			.map(Value::String)
			.ok_or_else(|| ResponseFault::Malformed(format!("{} is not an integer: {}", what, value)))
	}
}

impl ChainAdapter for SolanaAdapter {
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
			Operation::GetAccountInfo | Operation::GetBalance => {
				json!([params::required_str(params, 0, "pubkey")?])
			}
			Operation::GetBlock => json!([params::required_u64(params, 0, "slot")?]),
			Operation::GetTransaction => json!([params::required_str(params, 0, "signature")?]),
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
			Operation::GetAccountInfo => {
				let (mut account, slot) = Self::with_context(result)?;
				numeric::normalize_value(&mut account, &["lamports", "rentEpoch"]);
				let mut payload = payload_with("account", account);
				payload.insert("slot".to_string(), slot);
				Ok(payload)
			}
			Operation::GetBalance => {
				let (lamports, slot) = Self::with_context(result)?;
				let mut payload = payload_with("balance", Self::decimal(&lamports, "balance")?);
				payload.insert("slot".to_string(), slot);
				Ok(payload)
			}
			Operation::GetBlock => {
				numeric::normalize_value(&mut result, BLOCK_FIELDS);
				Ok(payload_with("block", result))
			}
			Operation::GetTransaction => {
				numeric::normalize_value(&mut result, TRANSACTION_FIELDS);
				Ok(payload_with("transaction", result))
			}
			Operation::GetLatestLedgerInfo => Ok(payload_with("slot", Self::decimal(&result, "slot")?)),
			other => Err(ResponseFault::Malformed(format!(
				"no payload mapping for {}",
				other
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::{ErrorKind, RawResponse, WireStyle};

	const PUBKEY: &str = "83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri";

	fn adapter() -> SolanaAdapter {
		SolanaAdapter::new(AdapterSpec::new(
			"solana",
			"https://api.mainnet-beta.solana.com",
			WireStyle::SolanaJsonRpc,
		))
		.unwrap()
	}

	fn ok(result: Value) -> RawResponse {
		RawResponse::json(200, &json!({"jsonrpc": "2.0", "id": 1, "result": result}))
	}

	#[test]
	fn test_get_block_sends_integer_slot() {
		let call = adapter()
			.build_request(Operation::GetBlock, &[json!("430")])
			.unwrap();
		assert_eq!(
			call.json_body().unwrap(),
			json!({"jsonrpc": "2.0", "method": "getBlock", "params": [430], "id": 1})
		);
	}

	#[test]
	fn test_get_account_info_request() {
		let call = adapter()
			.build_request(Operation::GetAccountInfo, &[json!(PUBKEY)])
			.unwrap();
		let body = call.json_body().unwrap();
		assert_eq!(body["method"], json!("getAccountInfo"));
		assert_eq!(body["params"], json!([PUBKEY]));
	}

	#[test]
	fn test_get_slot_takes_no_params() {
		let call = adapter()
			.build_request(Operation::GetLatestLedgerInfo, &[json!("ignored")])
			.unwrap();
		let body = call.json_body().unwrap();
		assert_eq!(body["method"], json!("getSlot"));
		assert_eq!(body["params"], json!([]));
	}

	#[test]
	fn test_invalid_slot_rejected() {
		let err = adapter()
			.build_request(Operation::GetBlock, &[json!("tip")])
			.unwrap_err();
		assert!(matches!(err, AdapterError::InvalidParams(_)));
	}

	#[test]
	fn test_object_lookup_unsupported() {
		assert!(!adapter().supports(Operation::GetObject));
		assert!(!adapter().supports(Operation::GetAccountResources));
	}

	#[test]
	fn test_balance_with_context() {
		let result = adapter().parse_response(
			Operation::GetBalance,
			ok(json!({"context": {"slot": 1}, "value": 0})),
		);
		assert!(result.is_success());
		assert_eq!(result.get("balance"), Some(&json!("0")));
		assert_eq!(result.get("slot"), Some(&json!("1")));
	}

	#[test]
	fn test_account_info_value_and_slot() {
		let result = adapter().parse_response(
			Operation::GetAccountInfo,
			ok(json!({
				"context": {"slot": 341197053},
				"value": {"lamports": 88849814690250u64, "owner": "11111111111111111111111111111111", "executable": false}
			})),
		);
		let account = result.get("account").unwrap();
		assert_eq!(account["lamports"], json!("88849814690250"));
		assert_eq!(account["owner"], json!("11111111111111111111111111111111"));
		assert_eq!(result.get("slot"), Some(&json!("341197053")));
	}

	#[test]
	fn test_missing_account_is_null() {
		let result = adapter().parse_response(
			Operation::GetAccountInfo,
			ok(json!({"context": {"slot": 5}, "value": null})),
		);
		assert!(result.is_success());
		assert_eq!(result.get("account"), Some(&json!(null)));
	}

	#[test]
	fn test_context_required() {
		let result = adapter().parse_response(Operation::GetBalance, ok(json!(42)));
		assert_eq!(result.error_kind(), Some(ErrorKind::MalformedResponse));
	}

	#[test]
	fn test_slot_is_decimal_string() {
		let result = adapter().parse_response(Operation::GetLatestLedgerInfo, ok(json!(1234)));
		assert_eq!(result.get("slot"), Some(&json!("1234")));
	}

	#[test]
	fn test_block_fields() {
		let result = adapter().parse_response(
			Operation::GetBlock,
			ok(json!({"blockHeight": 428, "parentSlot": 429, "blockTime": null, "blockhash": "3Eq21v"})),
		);
		let block = result.get("block").unwrap();
		assert_eq!(block["blockHeight"], json!("428"));
		assert_eq!(block["parentSlot"], json!("429"));
		assert_eq!(block["blockTime"], json!(null));
		assert_eq!(block["blockhash"], json!("3Eq21v"));
	}

	#[test]
	fn test_skipped_slot_error() {
		let result = adapter().parse_response(
			Operation::GetBlock,
			RawResponse::json(
				200,
				&json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32007, "message": "Slot 430 was skipped"}}),
			),
		);
		let error = result.error().unwrap();
		assert_eq!(error.kind, ErrorKind::RpcError);
		assert!(error.message.contains("-32007"));
	}
}
