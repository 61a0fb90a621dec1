//! Serde helpers for configuration deserialization

use gateway_types::{ChainId, Operation};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Deserializes a map keyed by chain id, normalizing the keys.
pub fn deserialize_chain_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<ChainId, T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let map = BTreeMap::<String, T>::deserialize(deserializer)?;

	let mut chains = BTreeMap::new();
	for (key, value) in map {
		let chain_id = key
			.parse::<ChainId>()
			.map_err(|_| serde::de::Error::custom(format!("Invalid chain ID: {:?}", key)))?;
		if chains.insert(chain_id.clone(), value).is_some() {
			return Err(serde::de::Error::custom(format!(
				"Chain {} is configured more than once",
				chain_id
			)));
		}
	}
	Ok(chains)
}

pub fn serialize_chain_map<S, T>(map: &BTreeMap<ChainId, T>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize,
{
	let string_map: BTreeMap<&str, &T> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
	string_map.serialize(serializer)
}

/// Deserializes a map keyed by operation name (`GetBlock`, `get_block`, ...).
pub fn deserialize_operation_map<'de, D, T>(
	deserializer: D,
) -> Result<HashMap<Operation, T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let map = HashMap::<String, T>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			k.parse::<Operation>()
				.map(|op| (op, v))
				.map_err(|_| serde::de::Error::custom(format!("Invalid operation: {}", k)))
		})
		.collect()
}

pub fn serialize_operation_map<S, T>(
	map: &HashMap<Operation, T>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize,
{
	let string_map: BTreeMap<&str, &T> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
	string_map.serialize(serializer)
}

/// Deserializes an optional list of operation names.
pub fn deserialize_operation_list<'de, D>(deserializer: D) -> Result<Option<Vec<Operation>>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(names) = Option::<Vec<String>>::deserialize(deserializer)? else {
		return Ok(None);
	};

	names
		.iter()
		.map(|name| {
			name.parse::<Operation>()
				.map_err(|_| serde::de::Error::custom(format!("Invalid operation: {}", name)))
		})
		.collect::<Result<Vec<_>, _>>()
		.map(Some)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, Deserialize, Serialize)]
	struct TestStruct {
		#[serde(
			deserialize_with = "deserialize_chain_map",
			serialize_with = "serialize_chain_map"
		)]
		chains: BTreeMap<ChainId, String>,
		#[serde(
			default,
			deserialize_with = "deserialize_operation_map",
			serialize_with = "serialize_operation_map"
		)]
		timeouts: HashMap<Operation, u64>,
		#[serde(default, deserialize_with = "deserialize_operation_list")]
		operations: Option<Vec<Operation>>,
	}

	#[test]
	fn test_chain_keys_are_normalized() {
		let parsed: TestStruct = toml::from_str(
			r#"
[chains]
Ethereum = "https://eth.example.com"
aptos = "https://aptos.example.com/v1"
"#,
		)
		.unwrap();

		assert_eq!(parsed.chains.len(), 2);
		assert_eq!(
			parsed.chains.get(&ChainId::new("ethereum")),
			Some(&"https://eth.example.com".to_string())
		);
		assert!(parsed.operations.is_none());
	}

	#[test]
	fn test_duplicate_chain_after_normalization() {
		let result: Result<TestStruct, _> =
			serde_json::from_str(r#"{"chains": {"Sui": "a", "sui": "b"}}"#);
		assert!(result.is_err());
	}

	#[test]
	fn test_operation_map_and_list() {
		let parsed: TestStruct = serde_json::from_str(
			r#"{
				"chains": {},
				"timeouts": {"GetBlock": 15000, "get_balance": 2000},
				"operations": ["GetBlock", "get-latest-ledger-info"]
			}"#,
		)
		.unwrap();

		assert_eq!(parsed.timeouts.get(&Operation::GetBlock), Some(&15000));
		assert_eq!(parsed.timeouts.get(&Operation::GetBalance), Some(&2000));
		assert_eq!(
			parsed.operations,
			Some(vec![Operation::GetBlock, Operation::GetLatestLedgerInfo])
		);
	}

	#[test]
	fn test_invalid_operation_name() {
		let result: Result<TestStruct, _> =
			serde_json::from_str(r#"{"chains": {}, "timeouts": {"Transfer": 1}}"#);
		assert!(result.is_err());
	}

	#[test]
	fn test_serialization_roundtrip() {
		let parsed: TestStruct = serde_json::from_str(
			r#"{"chains": {"ethereum": "https://eth"}, "timeouts": {"GetBlock": 10}}"#,
		)
		.unwrap();
		let json = serde_json::to_value(&parsed).unwrap();
		assert_eq!(json["chains"]["ethereum"], "https://eth");
		assert_eq!(json["timeouts"]["GetBlock"], 10);
	}
}
