//! Builder for creating a [`Gateway`].

use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::settings::GatewaySettings;
use gateway_chains::ChainRegistry;
use gateway_config::{ConfigLoader, GatewayConfig};
use gateway_transport::{ReqwestClient, RetryPolicy, RetryTransport, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Assembles a gateway from configuration, or from explicit parts.
///
/// Explicit parts take precedence over whatever the configuration would
/// produce. Without a transport, a pooled reqwest client wrapped in the
/// configured retry policy is created.
#[derive(Default)]
pub struct GatewayBuilder {
	config: Option<GatewayConfig>,
	config_path: Option<PathBuf>,
	registry: Option<ChainRegistry>,
	transport: Option<Arc<dyn Transport>>,
	settings: Option<GatewaySettings>,
}

impl GatewayBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(mut self, config: GatewayConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.config_path = Some(path.into());
		self
	}

	pub fn with_registry(mut self, registry: ChainRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn with_settings(mut self, settings: GatewaySettings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub async fn build(self) -> Result<Gateway, CoreError> {
		// Load configuration either from provided config or from file
		let config = match (self.config, self.config_path) {
			(Some(config), _) => Some(config),
			(None, Some(path)) => Some(ConfigLoader::new().with_file(path).load().await?),
			(None, None) => None,
		};

		let settings = self
			.settings
			.or_else(|| config.as_ref().map(|c| GatewaySettings::from(&c.gateway)))
			.unwrap_or_default();

		let registry = match (self.registry, &config) {
			(Some(registry), _) => registry,
			(None, Some(config)) => ChainRegistry::from_specs(config.adapter_specs())?,
			(None, None) => {
				return Err(CoreError::Configuration(
					"either a configuration or a chain registry is required".to_string(),
				))
			}
		};

		let transport = match self.transport {
			Some(transport) => transport,
			None => {
				let policy = config
					.as_ref()
					.map(|c| RetryPolicy::new(c.gateway.backoff_base(), c.gateway.backoff_max()))
					.unwrap_or_default();
				let client = ReqwestClient::new()?;
				Arc::new(RetryTransport::new(client).with_policy(policy)) as Arc<dyn Transport>
			}
		};

		info!(
			"Gateway ready with {} chain(s): {:?}",
			registry.len(),
			registry.chains()
		);

		Ok(Gateway::new(Arc::new(registry), transport, settings))
	}
}
