//! Subcommand handlers.
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

use anyhow::{Context, Result};
use gateway_config::{ConfigLoader, GatewayConfig};
use gateway_core::Gateway;
use gateway_types::{NormalizedResult, Request};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// One entry of a batch file.
#[derive(Debug, Deserialize)]
pub struct BatchEntry {
	#[serde(alias = "chain_id")]
	pub chain: String,
	pub operation: String,
	#[serde(default)]
	pub params: Vec<Value>,
}

/// Row printed by `chains`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ChainSummary {
	pub chain: String,
	pub wire_style: String,
	pub base_url: String,
	pub operations: Vec<String>,
}

/// Parses a command-line parameter as JSON, falling back to a plain string.
///
/// `17000000` becomes a number and `0xabc` stays a string.
pub fn parse_param(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub async fn invoke(
	gateway: &Gateway,
	chain: &str,
	operation: &str,
	params: &[String],
	deadline_ms: Option<u64>,
) -> Result<NormalizedResult> {
	let params = params.iter().map(|p| parse_param(p)).collect();
	let request = Request::parse(chain, operation, params)?;

	let result = match deadline_ms {
		Some(ms) => {
			let deadline = Instant::now() + Duration::from_millis(ms);
			gateway.invoke_with_deadline(&request, deadline).await
		}
		None => gateway.invoke(&request).await,
	};
	Ok(result)
}

pub async fn load_batch(path: &Path) -> Result<Vec<Request>> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("failed to read batch file {}", path.display()))?;
	parse_batch(&content)
}

pub fn parse_batch(content: &str) -> Result<Vec<Request>> {
	let entries: Vec<BatchEntry> =
		serde_json::from_str(content).context("batch file must be a JSON array of requests")?;

	entries
		.into_iter()
		.enumerate()
		.map(|(index, entry)| {
			Request::parse(&entry.chain, &entry.operation, entry.params)
				.with_context(|| format!("invalid request at index {}", index))
		})
		.collect()
}

pub async fn batch(gateway: &Gateway, path: &Path) -> Result<Vec<NormalizedResult>> {
	let requests = load_batch(path).await?;
	info!("Running batch of {} request(s)", requests.len());
	Ok(gateway.invoke_batch(&requests).await)
}

pub fn chains(gateway: &Gateway) -> Vec<ChainSummary> {
	let registry = gateway.registry();
	registry
		.chains()
		.into_iter()
		.filter_map(|chain_id| registry.get(&chain_id))
		.map(|adapter| ChainSummary {
			chain: adapter.chain_id().to_string(),
			wire_style: adapter.wire_style().to_string(),
			base_url: adapter.spec().base_url.clone(),
			operations: adapter
				.supported_operations()
				.iter()
				.map(|op| op.to_string())
				.collect(),
		})
		.collect()
}

pub async fn load_config(path: &Path) -> Result<GatewayConfig> {
	ConfigLoader::new()
		.with_file(path)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Tracing level: an explicit `--log-level` (or `GATEWAY_LOG_LEVEL`) wins
/// over the configuration's `log_level`.
pub fn log_level(cli: Option<&str>, config: &GatewayConfig) -> String {
	cli.unwrap_or(&config.gateway.log_level).to_string()
}

/// Summary line for a configuration that loaded and validated.
pub fn describe_config(config: &GatewayConfig) -> String {
	let chains: Vec<&str> = config.chains.keys().map(|c| c.as_str()).collect();
	format!(
		"Configuration '{}' is valid: {} chain(s) [{}]",
		config.gateway.name,
		chains.len(),
		chains.join(", ")
	)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
