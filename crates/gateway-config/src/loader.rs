//! Configuration loading from files and environment.

use crate::types::GatewayConfig;
use crate::ConfigError;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Chain base URLs can be replaced with `RPC_URL_<CHAIN>` (upper-cased id).
const RPC_URL_PREFIX: &str = "RPC_URL_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Ok(ConfigFormat::Toml),
			Some("json") => Ok(ConfigFormat::Json),
			Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
			_ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
		}
	}
}

/// Configuration loader with environment variable substitution
#[derive(Debug, Clone)]
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "GATEWAY_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Reads, substitutes, parses, overrides and validates the configured file.
	pub async fn load(&self) -> Result<GatewayConfig, ConfigError> {
		let Some(path) = &self.file_path else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};
		info!("Loading configuration from {:?}", path);

		let format = ConfigFormat::from_path(path)?;
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				ConfigError::FileNotFound(path.display().to_string())
			} else {
				ConfigError::IoError(e)
			}
		})?;

		let environment: HashMap<String, String> = env::vars().collect();
		self.load_with_env(&content, format, &environment)
	}

	/// Same pipeline as [`ConfigLoader::load`] for in-memory content and an
	/// explicit environment.
	pub fn load_with_env(
		&self,
		content: &str,
		format: ConfigFormat,
		environment: &HashMap<String, String>,
	) -> Result<GatewayConfig, ConfigError> {
		let substituted = substitute_env_vars(content, environment)?;
		let mut config = Self::parse(&substituted, format)?;
		self.apply_env_overrides(&mut config, environment)?;
		Self::validate(&config)?;
		Ok(config)
	}

	/// Parses without substitution, overrides or validation.
	pub fn parse(content: &str, format: ConfigFormat) -> Result<GatewayConfig, ConfigError> {
		match format {
			ConfigFormat::Toml => toml::from_str(content)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e))),
			ConfigFormat::Json => serde_json::from_str(content)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {}", e))),
			ConfigFormat::Yaml => serde_yaml::from_str(content)
				.map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e))),
		}
	}

	fn apply_env_overrides(
		&self,
		config: &mut GatewayConfig,
		environment: &HashMap<String, String>,
	) -> Result<(), ConfigError> {
		let var = |name: &str| environment.get(&format!("{}{}", self.env_prefix, name));

		if let Some(log_level) = var("LOG_LEVEL") {
			debug!("Overriding log level from environment");
			config.gateway.log_level = log_level.clone();
		}

		if let Some(max_retries) = var("MAX_RETRIES") {
			config.gateway.max_retries = max_retries.trim().parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid {}MAX_RETRIES: {}", self.env_prefix, e))
			})?;
		}

		if let Some(timeout_ms) = var("TIMEOUT_MS") {
			config.gateway.default_timeout_ms = timeout_ms.trim().parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid {}TIMEOUT_MS: {}", self.env_prefix, e))
			})?;
		}

		for (name, url) in environment {
			let Some(suffix) = name.strip_prefix(RPC_URL_PREFIX) else {
				continue;
			};
			for (chain_id, chain) in config.chains.iter_mut() {
				if env_suffix(chain_id.as_str()) == suffix {
					debug!("Overriding RPC URL for chain {} from environment", chain_id);
					chain.base_url = url.clone();
				}
			}
		}

		Ok(())
	}

	/// Checks invariants serde cannot express.
	pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
		let settings = &config.gateway;

		if config.chains.is_empty() {
			return Err(ConfigError::ValidationError(
				"At least one chain must be configured".to_string(),
			));
		}
		if settings.default_timeout_ms == 0 {
			return Err(ConfigError::ValidationError(
				"default_timeout_ms must be positive".to_string(),
			));
		}
		if settings.max_concurrency == 0 {
			return Err(ConfigError::ValidationError(
				"max_concurrency must be positive".to_string(),
			));
		}
		if settings.request_deadline_ms == Some(0) {
			return Err(ConfigError::ValidationError(
				"request_deadline_ms must be positive".to_string(),
			));
		}
		if settings.backoff_base_ms == 0 || settings.backoff_base_ms > settings.backoff_max_ms {
			return Err(ConfigError::ValidationError(format!(
				"backoff_base_ms ({}) must be positive and not exceed backoff_max_ms ({})",
				settings.backoff_base_ms, settings.backoff_max_ms
			)));
		}

		for (chain_id, chain) in &config.chains {
			let url = chain.base_url.trim();
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				return Err(ConfigError::ValidationError(format!(
					"Chain {}: base_url must be an http(s) URL, got {:?}",
					chain_id, chain.base_url
				)));
			}
			if chain.timeout_ms == Some(0) {
				return Err(ConfigError::ValidationError(format!(
					"Chain {}: timeout_ms must be positive",
					chain_id
				)));
			}
			if let Some((operation, _)) = chain.operation_timeouts.iter().find(|(_, ms)| **ms == 0) {
				return Err(ConfigError::ValidationError(format!(
					"Chain {}: timeout for {} must be positive",
					chain_id, operation
				)));
			}
			if matches!(&chain.supported_operations, Some(ops) if ops.is_empty()) {
				return Err(ConfigError::ValidationError(format!(
					"Chain {}: supported_operations must not be empty",
					chain_id
				)));
			}
		}

		Ok(())
	}
}

/// Environment-variable form of a chain id: `avalanche-fuji` -> `AVALANCHE_FUJI`.
fn env_suffix(chain_id: &str) -> String {
	chain_id
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
		.collect()
}

/// Replaces every `${VAR_NAME}` with its value from `environment`.
fn substitute_env_vars(
	content: &str,
	environment: &HashMap<String, String>,
) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
		.map_err(|e| ConfigError::ParseError(e.to_string()))?;

	let mut missing = None;
	let substituted = re.replace_all(content, |caps: &Captures| match environment.get(&caps[1]) {
		Some(value) => value.clone(),
		None => {
			missing.get_or_insert_with(|| caps[1].to_string());
			String::new()
		}
	});

	match missing {
		Some(var_name) => Err(ConfigError::EnvVarNotFound(var_name)),
		None => Ok(substituted.into_owned()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use gateway_types::{ChainId, Operation, WireStyle};
	use std::io::Write;
	
	const TOML: &str = r#"
[gateway]
name = "test-gateway"
default_timeout_ms = 5000
max_retries = 2

[chains.ethereum]
base_url = "https://eth.example.com"
wire_style = "evm_json_rpc"
headers = { "x-api-key" = "${ETH_KEY}" }

[chains.ethereum.operation_timeouts]
GetBlock = 15000

[chains.aptos]
base_url = "https://fullnode.example/v1"
wire_style = "aptos_rest"
supported_operations = ["GetAccountInfo", "GetLatestLedgerInfo"]
"#;

	fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_toml_parsing_with_substitution() {
		let config = ConfigLoader::new()
			.load_with_env(TOML, ConfigFormat::Toml, &env(&[("ETH_KEY", "secret")]))
			.unwrap();

		assert_eq!(config.gateway.name, "test-gateway");
		assert_eq!(config.gateway.default_timeout_ms, 5000);
		assert_eq!(config.gateway.max_concurrency, 16);
		assert_eq!(config.chains.len(), 2);

		let eth = config.chains.get(&ChainId::new("ethereum")).unwrap();
		assert_eq!(eth.headers.get("x-api-key"), Some(&"secret".to_string()));
		assert_eq!(eth.operation_timeouts.get(&Operation::GetBlock), Some(&15000));

		let aptos = config.chains.get(&ChainId::new("aptos")).unwrap();
		assert_eq!(aptos.wire_style, WireStyle::AptosRest);
		assert_eq!(
			aptos.supported_operations,
			Some(vec![Operation::GetAccountInfo, Operation::GetLatestLedgerInfo])
		);
	}

	#[test]
	fn test_missing_env_var() {
		let err = ConfigLoader::new()
			.load_with_env(TOML, ConfigFormat::Toml, &HashMap::new())
			.unwrap_err();
		assert!(matches!(err, ConfigError::EnvVarNotFound(var) if var == "ETH_KEY"));
	}

	#[test]
	fn test_env_overrides() {
		let config = ConfigLoader::new()
			.load_with_env(
				TOML,
				ConfigFormat::Toml,
				&env(&[
					("ETH_KEY", "k"),
					("GATEWAY_LOG_LEVEL", "debug"),
					("GATEWAY_MAX_RETRIES", "7"),
					("GATEWAY_TIMEOUT_MS", "2500"),
					("RPC_URL_ETHEREUM", "http://127.0.0.1:8545"),
					("RPC_URL_POLYGON", "http://ignored"),
				]),
			)
			.unwrap();

		assert_eq!(config.gateway.log_level, "debug");
		assert_eq!(config.gateway.max_retries, 7);
		assert_eq!(config.gateway.default_timeout_ms, 2500);
		assert_eq!(
			config.chains[&ChainId::new("ethereum")].base_url,
			"http://127.0.0.1:8545"
		);
		assert_eq!(config.chains.len(), 2);
	}

	#[test]
	fn test_invalid_override_value() {
		let err = ConfigLoader::new()
			.load_with_env(
				TOML,
				ConfigFormat::Toml,
				&env(&[("ETH_KEY", "k"), ("GATEWAY_MAX_RETRIES", "many")]),
			)
			.unwrap_err();
		assert!(matches!(err, ConfigError::ValidationError(_)));
	}

	#[test]
	fn test_custom_env_prefix() {
		let config = ConfigLoader::new()
			.with_env_prefix("CGW_")
			.load_with_env(
				TOML,
				ConfigFormat::Toml,
				&env(&[("ETH_KEY", "k"), ("CGW_MAX_RETRIES", "0"), ("GATEWAY_MAX_RETRIES", "9")]),
			)
			.unwrap();
		assert_eq!(config.gateway.max_retries, 0);
	}

	#[test]
	fn test_json_parsing() {
		let json = r#"{
			"gateway": {"max_concurrency": 4},
			"chains": {
				"Solana": {"base_url": "https://api.solana.example", "wire_style": "solana_json_rpc"}
			}
		}"#;
		let config = ConfigLoader::new()
			.load_with_env(json, ConfigFormat::Json, &HashMap::new())
			.unwrap();
		assert_eq!(config.gateway.max_concurrency, 4);
		assert!(config.chains.contains_key(&ChainId::new("solana")));
	}

	#[test]
	fn test_yaml_parsing() {
		let yaml = r#"
chains:
  sui:
    base_url: https://sui.example
    wire_style: sui_rest
    max_retries: 1
"#;
		let config = ConfigLoader::new()
			.load_with_env(yaml, ConfigFormat::Yaml, &HashMap::new())
			.unwrap();
		assert_eq!(config.chains[&ChainId::new("sui")].max_retries, Some(1));
	}

	#[test]
	fn test_validation_rules() {
		let cases = [
			("[gateway]\nname = \"empty\"\n", "At least one chain"),
			(
				"[chains.eth]\nbase_url = \"ftp://node\"\nwire_style = \"evm_json_rpc\"\n",
				"http(s)",
			),
			(
				"[gateway]\nmax_concurrency = 0\n[chains.eth]\nbase_url = \"http://node\"\nwire_style = \"evm_json_rpc\"\n",
				"max_concurrency",
			),
			(
				"[gateway]\nbackoff_base_ms = 6000\n[chains.eth]\nbase_url = \"http://node\"\nwire_style = \"evm_json_rpc\"\n",
				"backoff_base_ms",
			),
			(
				"[chains.eth]\nbase_url = \"http://node\"\nwire_style = \"evm_json_rpc\"\ntimeout_ms = 0\n",
				"timeout_ms",
			),
			(
				"[chains.eth]\nbase_url = \"http://node\"\nwire_style = \"evm_json_rpc\"\noperation_timeouts = { GetBlock = 0 }\n",
				"GetBlock",
			),
		];

		for (toml, expected) in cases {
			let err = ConfigLoader::new()
				.load_with_env(toml, ConfigFormat::Toml, &HashMap::new())
				.unwrap_err();
			assert!(
				err.to_string().contains(expected),
				"expected {:?} in {}",
				expected,
				err
			);
		}
	}

	#[test]
	fn test_unknown_wire_style_is_parse_error() {
		let toml = "[chains.eth]\nbase_url = \"http://node\"\nwire_style = \"graphql\"\n";
		let err = ConfigLoader::new()
			.load_with_env(toml, ConfigFormat::Toml, &HashMap::new())
			.unwrap_err();
		assert!(matches!(err, ConfigError::ParseError(_)));
	}

	#[test]
	fn test_env_suffix() {
		assert_eq!(env_suffix("ethereum"), "ETHEREUM");
		assert_eq!(env_suffix("avalanche-fuji"), "AVALANCHE_FUJI");
	}

	#[test]
	fn test_format_detection() {
		assert_eq!(
			ConfigFormat::from_path(Path::new("gateway.yml")).unwrap(),
			ConfigFormat::Yaml
		);
		assert!(matches!(
			ConfigFormat::from_path(Path::new("gateway.ini")),
			Err(ConfigError::UnsupportedFormat(_))
		));
	}

	#[tokio::test]
	async fn test_load_from_file() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		file.write_all(
			b"[chains.nethermind]\nbase_url = \"http://127.0.0.1:8545\"\nwire_style = \"evm_json_rpc\"\n",
		)
		.unwrap();

		let config = ConfigLoader::new().with_file(file.path()).load().await.unwrap();
		let specs = config.adapter_specs();
		assert_eq!(specs.len(), 1);
		assert_eq!(specs[0].chain_id, ChainId::new("nethermind"));
	}

	#[tokio::test]
	async fn test_missing_file() {
		let err = ConfigLoader::new()
			.with_file("/nonexistent/gateway.toml")
			.load()
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::FileNotFound(_)));

		let err = ConfigLoader::new().load().await.unwrap_err();
		assert!(matches!(err, ConfigError::FileNotFound(_)));
	}
}
