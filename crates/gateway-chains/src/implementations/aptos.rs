//! Aptos fullnode REST adapter.
//!
//! Lookups are path-based GETs against the `/v1` API. The ledger info
//! endpoint is the base URL itself.

use super::payload_with;
use super::rest::{self, RestEndpoint};
use crate::adapter::{AdapterError, ChainAdapter, ResponseFault};
use crate::numeric;
use gateway_types::{AdapterSpec, Operation, Payload, RouteTemplate, WireCall};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// Aptos encodes u64 values as decimal strings; these are canonicalized.
const NUMERIC_FIELDS: &[&str] = &[
	"sequence_number",
	"ledger_version",
	"oldest_ledger_version",
	"block_height",
	"oldest_block_height",
	"epoch",
	"ledger_timestamp",
	"chain_id",
	"version",
	"gas_used",
	"block_timestamp",
	"first_version",
	"last_version",
	"timestamp",
];

#[derive(Debug)]
pub struct AptosAdapter {
	spec: AdapterSpec,
	endpoint: RestEndpoint,
}

impl AptosAdapter {
	pub fn default_routes() -> HashMap<Operation, RouteTemplate> {
		HashMap::from([
			(Operation::GetAccountInfo, RouteTemplate::get("/accounts/{address}")),
			(
				Operation::GetAccountResources,
				RouteTemplate::get("/accounts/{address}/resources"),
			),
			(
				Operation::GetTransaction,
				RouteTemplate::get("/transactions/by_hash/{hash}"),
			),
			(Operation::GetLatestLedgerInfo, RouteTemplate::get("/")),
			(Operation::GetBlock, RouteTemplate::get("/blocks/by_height/{height}")),
		])
	}

	pub fn new(spec: AdapterSpec) -> Result<Self, AdapterError> {
		let endpoint = RestEndpoint::new(&spec, Self::default_routes())?;
		Ok(Self { spec, endpoint })
	}
}

impl ChainAdapter for AptosAdapter {
	fn spec(&self) -> &AdapterSpec {
		&self.spec
	}

	fn supported_operations(&self) -> &BTreeSet<Operation> {
		self.endpoint.operations()
	}

	fn build_request(&self, operation: Operation, params: &[Value]) -> Result<WireCall, AdapterError> {
		self.endpoint.build(&self.spec, operation, params)
	}

	fn extract_payload(&self, operation: Operation, mut body: Value) -> Result<Payload, ResponseFault> {
		rest::check_error_body(&body)?;

		match &mut body {
			Value::Array(items) => items
				.iter_mut()
				.for_each(|item| numeric::normalize_value(item, NUMERIC_FIELDS)),
			other => numeric::normalize_value(other, NUMERIC_FIELDS),
		}

		Ok(payload_with(rest::payload_key(operation), body))
	}
}
