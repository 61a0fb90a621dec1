//! Gateway-wide defaults.

use gateway_config::GatewaySettingsConfig;
use std::time::Duration;

/// Defaults applied when a chain's spec does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
	/// Per-attempt timeout.
	pub default_timeout: Duration,
	pub max_retries: u32,
	/// Batch worker limit; the effective limit is `min(len, max_concurrency)`.
	pub max_concurrency: usize,
	/// Deadline applied to `invoke`/`invoke_batch` when the caller gives none.
	pub request_deadline: Option<Duration>,
}

impl Default for GatewaySettings {
	fn default() -> Self {
		Self {
			default_timeout: Duration::from_secs(10),
			max_retries: 3,
			max_concurrency: 16,
			request_deadline: None,
		}
	}
}

impl From<&GatewaySettingsConfig> for GatewaySettings {
	fn from(config: &GatewaySettingsConfig) -> Self {
		Self {
			default_timeout: config.default_timeout(),
			max_retries: config.max_retries,
			max_concurrency: config.max_concurrency,
			request_deadline: config.request_deadline(),
		}
	}
}
