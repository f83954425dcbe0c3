//! Local chain environment
//!
//! Runs an anvil node in the foreground for manual work against the
//! deployment and clock commands.

pub mod anvil;

use crate::{cli::output::Display, core::logging, types::error::Result};
use tracing::info;

pub use anvil::{AnvilInstance, AnvilOptions};

/// Start anvil and keep it running until Ctrl-C
pub async fn run_until_interrupted(options: AnvilOptions) -> Result<()> {
	logging::operation_start("env start", &options.url());
	let instance = AnvilInstance::spawn(options).await?;
	logging::operation_success("Environment start", &instance.url());
	Display::kv("RPC URL", &instance.url());
	Display::kv("Chain ID", &instance.options().chain_id.to_string());
	Display::kv("PID", &instance.pid().to_string());
	Display::info("Press Ctrl-C to stop the node");

	tokio::signal::ctrl_c().await?;
	info!(pid = instance.pid(), "Interrupted, stopping Anvil");
	drop(instance);
	Ok(())
}
