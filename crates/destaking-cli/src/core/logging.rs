//! Logging setup and operation reporting
//!
//! Terminal output for the user goes through [`Display`]; every user-facing
//! message here is paired with a structured `tracing` event so a run can be
//! followed in the logs with `RUST_LOG=destaking_cli=debug`.

use crate::cli::output::Display;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging
///
/// `RUST_LOG` wins when set; otherwise the harness logs at `info` (or
/// `debug` with `verbose`) and other crates at `warn`.
pub fn init_logging(verbose: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default_filter = if verbose {
		"destaking_cli=debug,warn"
	} else {
		"destaking_cli=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	let _ = tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.try_init();
}

pub fn operation_start(operation: &str, context: &str) {
	info!(operation = operation, context = context, "Operation started");
}

pub fn operation_success(operation: &str, details: &str) {
	Display::success(&format!("{operation} completed"));
	info!(
		operation = operation,
		details = details,
		"Operation completed successfully"
	);
}

pub fn operation_error(operation: &str, error: &dyn std::fmt::Display) {
	Display::error(&format!("{operation} failed: {error}"));
	error!(operation = operation, error = %error, "Operation failed");
}

pub fn operation_warning(operation: &str, message: &str) {
	Display::warning(message);
	warn!(operation = operation, message = message, "Operation warning");
}

/// A contract creation confirmed on chain
pub fn contract_deployed(name: &str, address: &str, tx_hash: &str) {
	Display::success(&format!("{name} deployed at {address}"));
	Display::kv("tx", tx_hash);
	info!(contract = name, address = address, tx_hash = tx_hash, "Contract deployed");
}

/// Progress through a fixed number of steps, logged only
pub fn operation_progress(operation: &str, step: &str, current: u64, total: u64) {
	info!(
		operation = operation,
		step = step,
		current = current,
		total = total,
		"Operation progress"
	);
}
