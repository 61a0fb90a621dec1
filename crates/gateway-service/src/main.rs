//! `chain-gateway`: command-line front end for the multi-chain RPC gateway.

use anyhow::{Context, Result};
use clap::Parser;
use gateway_chains::ChainRegistry;
use gateway_core::Gateway;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let cli = Cli::parse();

	let config = commands::load_config(&cli.config).await?;

	let log_level = commands::log_level(cli.log_level.as_deref(), &config);
	setup_tracing(&log_level, cli.json_logs);
	info!("Loaded configuration from {:?}", cli.config);

	if let Command::Validate = cli.command {
		let registry = ChainRegistry::from_specs(config.adapter_specs())
			.context("Failed to build chain registry")?;
		info!("Registry built with {} chain(s)", registry.len());
		println!("{}", commands::describe_config(&config));
		return Ok(ExitCode::SUCCESS);
	}

	let gateway = Gateway::builder()
		.with_config(config)
		.build()
		.await
		.context("Failed to build gateway")?;

	match cli.command {
		Command::Invoke {
			chain,
			operation,
			params,
			deadline_ms,
		} => {
			let result =
				commands::invoke(&gateway, &chain, &operation, &params, deadline_ms)
					.await
					.context("Invalid request")?;
			commands::print_json(&result)?;
			if result.is_success() {
				Ok(ExitCode::SUCCESS)
			} else {
				Ok(ExitCode::FAILURE)
			}
		}
		Command::Batch { file } => {
			let results = commands::batch(&gateway, &file)
				.await
				.context("Failed to run batch")?;
			let failed = results.iter().filter(|r| !r.is_success()).count();
			commands::print_json(&results)?;
			if failed > 0 {
				error!("{} of {} request(s) failed", failed, results.len());
				Ok(ExitCode::FAILURE)
			} else {
				Ok(ExitCode::SUCCESS)
			}
		}
		Command::Chains => {
			commands::print_json(&commands::chains(&gateway))?;
			Ok(ExitCode::SUCCESS)
		}
		Command::Validate => Ok(ExitCode::SUCCESS),
	}
}

/// Logs go to stderr so that stdout carries only results.
fn setup_tracing(log_level: &str, json: bool) {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

	let registry = tracing_subscriber::registry().with(env_filter);
	if json {
		registry
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		registry
			.with(fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}
