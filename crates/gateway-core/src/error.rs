use gateway_chains::RegistryError;
use gateway_config::ConfigError;
use gateway_transport::ClientBuildError;
use thiserror::Error;

/// Errors raised while assembling a [`crate::Gateway`].
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("Registry error: {0}")]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Transport(#[from] ClientBuildError),
}
