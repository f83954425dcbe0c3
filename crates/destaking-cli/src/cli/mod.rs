//! Command-line interface definitions and parsing
//!
//! Defines the `destaking` command tree with clap and the terminal output
//! helpers its handlers use.

pub mod commands;
pub mod output;

use crate::constants;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deployment driver and staking scenario harness
#[derive(Parser, Debug)]
#[command(name = "destaking")]
#[command(about = "Deploy the destaking contracts and exercise the staking scenario")]
#[command(version)]
pub struct Cli {
	/// Configuration file; the environment is used when it does not exist
	#[arg(
		short,
		long,
		global = true,
		env = constants::CONFIG_ENV_VAR,
		default_value = destaking_config::DEFAULT_CONFIG_FILE
	)]
	pub config: PathBuf,

	/// Log at debug level unless RUST_LOG is set
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Deploy the token, staking and staking-farm contracts
	Deploy(commands::DeployCommand),

	/// Run the staking scenario against a simulated chain
	Scenario(commands::ScenarioCommand),

	/// Control the simulated chain clock
	Time(commands::TimeCommand),

	/// Local chain environment
	Env(commands::EnvCommand),

	/// Verify a recorded deployment on Etherscan
	Verify(commands::VerifyCommand),

	/// Inspect saved deployment records
	Deployments(commands::DeploymentsCommand),

	/// Show the effective configuration
	Config,

	/// Byte helpers for fixtures and contract arguments
	Util(commands::UtilCommand),
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn command_tree_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_deploy_flags() {
		let cli = Cli::parse_from(["destaking", "deploy", "--dry-run", "--artifacts", "out"]);
		match cli.command {
			Commands::Deploy(cmd) => {
				assert!(cmd.dry_run);
				assert_eq!(cmd.artifacts, Some(PathBuf::from("out")));
				assert!(!cmd.no_save);
			},
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn parses_time_increase() {
		let cli = Cli::parse_from(["destaking", "-v", "time", "increase", "86400"]);
		assert!(cli.verbose);
		match cli.command {
			Commands::Time(commands::TimeCommand {
				command: commands::TimeSubcommand::Increase { seconds },
				..
			}) => assert_eq!(seconds, 86_400),
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn parses_util_bytes32() {
		let cli = Cli::parse_from(["destaking", "util", "bytes32", "300"]);
		assert!(matches!(
			cli.command,
			Commands::Util(commands::UtilCommand {
				command: commands::UtilSubcommand::Bytes32 { .. }
			})
		));
	}
}
