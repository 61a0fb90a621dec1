//! Positional parameter helpers shared by the adapters.

use crate::adapter::AdapterError;
use crate::numeric;
use alloy_primitives::U256;
use serde_json::Value;

/// Non-empty string at `index`.
pub fn required_str<'a>(params: &'a [Value], index: usize, name: &str) -> Result<&'a str, AdapterError> {
	match params.get(index) {
		Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim()),
		Some(other) => Err(AdapterError::InvalidParams(format!(
			"param {} ({}) must be a non-empty string, got {}",
			index, name, other
		))),
		None => Err(AdapterError::InvalidParams(format!(
			"missing param {} ({})",
			index, name
		))),
	}
}

/// Unsigned integer at `index`, given as a JSON number, decimal string or hex string.
pub fn required_u64(params: &[Value], index: usize, name: &str) -> Result<u64, AdapterError> {
	let value = params.get(index).ok_or_else(|| {
		AdapterError::InvalidParams(format!("missing param {} ({})", index, name))
	})?;

	let parsed = match value {
		Value::Number(n) => n.as_u64(),
		Value::String(s) => numeric::parse_u256(s).and_then(|n| u64::try_from(n).ok()),
		_ => None,
	};

	parsed.ok_or_else(|| {
		AdapterError::InvalidParams(format!(
			"param {} ({}) must be an unsigned integer, got {}",
			index, name, value
		))
	})
}

/// Quantity at `index` that may be a full 256-bit value.
pub fn optional_u256(params: &[Value], index: usize) -> Option<Result<U256, String>> {
	params.get(index).map(|value| match value {
		Value::Number(n) => n
			.as_u64()
			.map(U256::from)
			.ok_or_else(|| format!("{} is not an unsigned integer", value)),
		Value::String(s) => numeric::parse_u256(s).ok_or_else(|| format!("{} is not a quantity", value)),
		other => Err(format!("{} is not a quantity", other)),
	})
}

/// Param rendered as a URL path segment.
pub fn path_segment(params: &[Value], index: usize, name: &str) -> Result<String, AdapterError> {
	let segment = match params.get(index) {
		Some(Value::String(s)) => s.trim().to_string(),
		Some(Value::Number(n)) => n.to_string(),
		Some(other) => {
			return Err(AdapterError::InvalidParams(format!(
				"param {} ({}) cannot be used in a path: {}",
				index, name, other
			)))
		}
		None => {
			return Err(AdapterError::InvalidParams(format!(
				"missing param {} ({})",
				index, name
			)))
		}
	};

	if segment.is_empty()
		|| segment
			.chars()
			.any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
	{
		return Err(AdapterError::InvalidParams(format!(
			"param {} ({}) is not a valid path segment: {:?}",
			index, name, segment
		)));
	}

	Ok(segment)
}
