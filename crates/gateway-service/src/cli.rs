use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for the chain gateway.
#[derive(Parser, Debug)]
#[command(name = "chain-gateway")]
#[command(about = "Multi-chain RPC gateway", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to the gateway configuration file (TOML, JSON or YAML)
	#[arg(
		short,
		long,
		value_name = "FILE",
		env = "GATEWAY_CONFIG",
		default_value = "config/gateway.toml"
	)]
	pub config: PathBuf,

	/// Log level (trace, debug, info, warn, error); defaults to the
	/// configuration's `log_level`
	#[arg(long, env = "GATEWAY_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// Emit logs as JSON lines
	#[arg(long)]
	pub json_logs: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run a single operation against one chain
	Invoke {
		/// Chain id as configured, e.g. `ethereum`
		chain: String,

		/// Operation name, e.g. `GetBalance` or `get_balance`
		operation: String,

		/// Positional parameters; values that parse as JSON are passed as JSON
		params: Vec<String>,

		/// Overall deadline in milliseconds
		#[arg(long, value_name = "MS")]
		deadline_ms: Option<u64>,
	},

	/// Run a JSON file of requests concurrently and print results in order
	Batch {
		/// JSON array of `{"chain", "operation", "params"}` objects
		file: PathBuf,
	},

	/// List configured chains and the operations each one serves
	Chains,

	/// Check the configuration and exit
	Validate,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_invoke_with_params() {
		let cli = Cli::try_parse_from([
			"chain-gateway",
			"invoke",
			"ethereum",
			"GetBlock",
			"17000000",
			"--deadline-ms",
			"2000",
		])
		.unwrap();

		assert_eq!(cli.config, PathBuf::from("config/gateway.toml"));
		match cli.command {
			Command::Invoke {
				chain,
				operation,
				params,
				deadline_ms,
			} => {
				assert_eq!(chain, "ethereum");
				assert_eq!(operation, "GetBlock");
				assert_eq!(params, vec!["17000000".to_string()]);
				assert_eq!(deadline_ms, Some(2000));
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_deadline_flag_after_several_params() {
		let cli = Cli::try_parse_from([
			"chain-gateway",
			"invoke",
			"ethereum",
			"GetBalance",
			"0xabc",
			"latest",
			"--deadline-ms",
			"50",
		])
		.unwrap();

		let Command::Invoke {
			params,
			deadline_ms,
			..
		} = cli.command
		else {
			panic!("expected invoke");
		};
		assert_eq!(params, vec!["0xabc".to_string(), "latest".to_string()]);
		assert_eq!(deadline_ms, Some(50));
	}

	#[test]
	fn test_parse_global_flags() {
		let cli = Cli::try_parse_from([
			"chain-gateway",
			"--config",
			"gateway.yaml",
			"--json-logs",
			"--log-level",
			"debug",
			"chains",
		])
		.unwrap();

		assert_eq!(cli.config, PathBuf::from("gateway.yaml"));
		assert!(cli.json_logs);
		assert_eq!(cli.log_level.as_deref(), Some("debug"));
		assert!(matches!(cli.command, Command::Chains));
	}

	#[test]
	fn test_subcommand_is_required() {
		assert!(Cli::try_parse_from(["chain-gateway"]).is_err());
	}
}
