//! Quantity normalization.
//!
//! Chains disagree on how they encode integers: EVM nodes send `0x`-prefixed
//! hex strings, Solana sends JSON numbers, Aptos sends decimal strings. All of
//! them leave the gateway as canonical decimal strings. Parsing goes through
//! a 256-bit integer so balances in wei stay exact.

use alloy_primitives::U256;
use serde_json::{Map, Value};

/// Parses a `0x` hex or plain decimal string.
///
/// Returns `None` for empty digits, stray characters, signs, or values that
/// do not fit in 256 bits.
pub fn parse_u256(input: &str) -> Option<U256> {
	let input = input.trim();
	if let Some(digits) = input
		.strip_prefix("0x")
		.or_else(|| input.strip_prefix("0X"))
	{
		if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		U256::from_str_radix(digits, 16).ok()
	} else {
		if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		U256::from_str_radix(input, 10).ok()
	}
}

/// Decimal string for a JSON quantity (hex string, decimal string or
/// non-negative integer).
pub fn to_decimal_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => parse_u256(s).map(|n| n.to_string()),
		Value::Number(n) => n.as_u64().map(|n| n.to_string()),
		_ => None,
	}
}

/// `0x`-prefixed lowercase hex for a quantity, as EVM nodes expect it.
pub fn to_hex_quantity(value: U256) -> String {
	format!("0x{:x}", value)
}

/// Rewrites the listed fields of `object` to decimal strings.
///
/// Fields that are absent, `null`, or not quantities are left as they are.
pub fn normalize_fields(object: &mut Map<String, Value>, fields: &[&str]) {
	for field in fields {
		if let Some(value) = object.get_mut(*field) {
			if let Some(decimal) = to_decimal_string(value) {
				*value = Value::String(decimal);
			}
		}
	}
}

/// Applies [`normalize_fields`] when `value` is an object; no-op otherwise.
pub fn normalize_value(value: &mut Value, fields: &[&str]) {
	if let Value::Object(object) = value {
		normalize_fields(object, fields);
	}
}
