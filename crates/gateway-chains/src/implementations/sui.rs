//! Sui adapter (REST-over-POST).

use super::payload_with;
use super::rest::{self, RestEndpoint};
use crate::adapter::{AdapterError, ChainAdapter, ResponseFault};
use crate::numeric;
use gateway_types::{AdapterSpec, Operation, Payload, RouteTemplate, WireCall};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const NUMERIC_FIELDS: &[&str] = &["sequenceNumber", "epoch", "timestampMs", "version", "checkpoint"];

#[derive(Debug)]
pub struct SuiAdapter {
	spec: AdapterSpec,
	endpoint: RestEndpoint,
}

impl SuiAdapter {
	pub fn default_routes() -> HashMap<Operation, RouteTemplate> {
		HashMap::from([
			(Operation::GetObject, RouteTemplate::post("/getObject", &["object_id"])),
			(
				Operation::GetAccountInfo,
				RouteTemplate::post("/getAddressInfo", &["address"]),
			),
			(
				Operation::GetLatestLedgerInfo,
				RouteTemplate::post("/getLatestCheckpoint", &[]),
			),
			(
				Operation::GetTransaction,
				RouteTemplate::post("/getTransaction", &["transaction_digest"]),
			),
		])
	}

	pub fn new(spec: AdapterSpec) -> Result<Self, AdapterError> {
		let endpoint = RestEndpoint::new(&spec, Self::default_routes())?;
		Ok(Self { spec, endpoint })
	}

	fn payload_key(operation: Operation) -> &'static str {
		match operation {
			Operation::GetLatestLedgerInfo => "checkpoint",
			other => rest::payload_key(other),
		}
	}
}

impl ChainAdapter for SuiAdapter {
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
		numeric::normalize_value(&mut body, NUMERIC_FIELDS);
		Ok(payload_with(Self::payload_key(operation), body))
	}
}
