//! Command-line entry point: `dyndns-function-client <CONFIG>`.

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use tracing_subscriber::EnvFilter;
// self
use dyndns_function_client::config::ClientConfig;

/// Update a DNS record through an authenticated cloud-function trigger.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Path to the INI file holding the `[client_config]` section.
	config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();
	let config = ClientConfig::load(&cli.config)
		.wrap_err_with(|| format!("Failed to load {}.", cli.config.display()))?;
	let receipt = dyndns_function_client::run(&config).await?;

	println!("DNS for {} successfully updated", receipt.hostname);

	Ok(())
}
