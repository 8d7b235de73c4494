//! Main entry point for the GrubDash service.
//!
//! Loads the configuration, builds the engine over the configured store and
//! serves the dishes and orders API until interrupted.

use clap::Parser;
use grub_config::Config;
use grub_core::GrubEngine;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line arguments for the GrubDash service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file. Built-in defaults are used when omitted.
	#[arg(short, long, env = "GRUBDASH_CONFIG")]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the GrubDash service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file, or falls back to defaults
/// 4. Builds the engine and loads any seed data
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started GrubDash");

	let config = match &args.config {
		Some(path) => Config::from_file(path).await?,
		None => {
			tracing::info!("No configuration file given, using defaults");
			Config::default()
		},
	};
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let engine = Arc::new(GrubEngine::from_config(&config).await?);
	grub_service::start_server(&config, engine).await?;

	tracing::info!("Stopped GrubDash");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_defaults() {
		let args = Args::try_parse_from(["grubdash"]).unwrap();
		assert!(args.config.is_none() || std::env::var("GRUBDASH_CONFIG").is_ok());
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args =
			Args::try_parse_from(["grubdash", "--config", "custom.toml", "-l", "debug"]).unwrap();
		assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
		assert_eq!(args.log_level, "debug");
	}
}
