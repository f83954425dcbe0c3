//! Main binary entry point for the destaking harness
//!
//! Parses arguments, sets up logging and dispatches each command to its
//! operation handler.

use anyhow::Result;
use clap::Parser;
use destaking_cli::{
	cli::{
		commands::{
			DeployCommand, DeploymentsCommand, DeploymentsSubcommand, EnvCommand, EnvSubcommand,
			ScenarioCommand, TimeCommand, TimeSubcommand, UtilCommand, UtilSubcommand,
			VerifyCommand,
		},
		output::Display,
		Cli, Commands,
	},
	core::{blockchain::Provider, clock::Clock, logging},
	operations::{
		deploy::{ContractDeployer, DeploySchedule},
		env::{self, AnvilOptions},
		scenario::{self, ScenarioOptions},
		verify::VerifyOps,
	},
	utils, Context,
};
use std::{path::Path, sync::Arc};
use tracing::{info, instrument};

#[tokio::main]
async fn main() -> Result<()> {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let config = cli.config.as_path();
	match cli.command {
		Commands::Deploy(cmd) => handle_deploy(config, cmd).await,
		Commands::Scenario(cmd) => handle_scenario(config, cmd).await,
		Commands::Time(cmd) => handle_time(config, cmd).await,
		Commands::Env(cmd) => handle_env(cmd).await,
		Commands::Verify(cmd) => handle_verify(config, cmd).await,
		Commands::Deployments(cmd) => handle_deployments(config, cmd).await,
		Commands::Config => handle_config(config).await,
		Commands::Util(cmd) => handle_util(cmd),
	}
}

/// Handle deploy command
#[instrument(skip(cmd))]
async fn handle_deploy(config: &Path, cmd: DeployCommand) -> Result<()> {
	let ctx = Arc::new(Context::load(Some(config)).await?);
	let deployer = match cmd.artifacts {
		Some(dir) => ContractDeployer::with_path(ctx.clone(), dir),
		None => ContractDeployer::new(ctx.clone()),
	};

	if cmd.dry_run {
		Display::header("Deployment Plan (dry run)");
		let schedule = DeploySchedule::now(ctx.config.deploy.timestamp_unit);
		Display::kv("Artifacts", &deployer.artifacts_dir().display().to_string());
		let available = destaking_types::artifact::list(deployer.artifacts_dir());
		Display::kv("Available", &format!("{} contracts", available.len()));
		Display::kv("Schedule", &format!("{:?} ({})", schedule.boundaries(), schedule.unit));

		for planned in deployer.plan(&schedule)? {
			Display::section(&planned.contract);
			if planned.args.is_empty() {
				Display::kv("Arguments", "none");
			} else {
				Display::kv("Arguments", &planned.args.join(", "));
			}
			Display::kv("Init code", &format!("{} bytes", planned.init_code_len));
		}
		Display::info("Nothing was sent");
		return Ok(());
	}

	Display::header("Deploying Contracts");
	Display::kv("Network", ctx.network());
	Display::kv("RPC", &ctx.config.network.rpc_url);

	let save = ctx.config.deployments.save && !cmd.no_save;
	if !save {
		logging::operation_warning(
			"Deployment",
			"Deployment records are disabled, addresses will only be printed",
		);
	}
	let summary = match deployer.deploy_all(save).await {
		Ok(summary) => summary,
		Err(e) => {
			logging::operation_error("Deployment", &e);
			return Err(e.into());
		},
	};

	Display::section("Summary");
	Display::kv("Chain", &summary.chain.to_string());
	Display::kv("Deployer", &summary.deployer.to_string());
	Display::kv(
		"Schedule",
		&format!("{:?} ({})", summary.schedule.boundaries(), summary.schedule.unit),
	);
	for deployed in summary.contracts() {
		Display::kv(deployed.handle.name(), &deployed.handle.address().to_string());
	}
	for path in &summary.records {
		info!(path = %path.display(), "Deployment record written");
	}
	if !summary.records.is_empty() {
		Display::kv(
			"Records",
			&ctx.deployment_store()
				.root()
				.join(&summary.network)
				.display()
				.to_string(),
		);
	}
	logging::operation_success("Deployment", &summary.network);
	Ok(())
}

/// Handle scenario command
#[instrument(skip(cmd))]
async fn handle_scenario(config: &Path, cmd: ScenarioCommand) -> Result<()> {
	Display::header("Staking Scenario");

	let mut options = ScenarioOptions::new(cmd.artifacts);
	options.rpc_url = cmd.rpc_url;
	options.port = cmd.port;
	// The scenario runs without a config file; use its receipt policy when present.
	if config.exists() {
		options.policy = Context::load(Some(config)).await?.receipt_policy();
	}

	let report = match scenario::run_scenario(&options).await {
		Ok(report) => report,
		Err(e) => {
			logging::operation_error("Scenario", &e);
			return Err(e.into());
		},
	};

	Display::kv("RPC", &report.rpc_url);
	Display::kv("Staking", &report.staking.to_string());
	Display::kv("LSP expiration", &report.lsp_expiration.to_string());
	for step in &report.steps {
		Display::section(&step.name);
		for check in &step.checks {
			Display::check(&check.label, &check.value.to_string());
		}
	}
	logging::operation_success(
		"Scenario",
		&format!("{} steps, {} checks", report.steps.len(), report.check_count()),
	);
	Ok(())
}

/// Handle time command
#[instrument(skip(cmd))]
async fn handle_time(config: &Path, cmd: TimeCommand) -> Result<()> {
	let provider = match cmd.rpc_url {
		Some(url) => Provider::connect(&url, None).await?,
		None => Context::load(Some(config)).await?.read_provider().await?,
	};
	let clock = Clock::new(provider);

	match cmd.command {
		TimeSubcommand::Increase { seconds } => {
			clock.increase(seconds).await?;
			Display::success(&format!("Advanced chain time by {seconds}s"));
			Display::kv("Latest block time", &clock.latest_timestamp().await?.to_string());
		},
		TimeSubcommand::Mine => {
			clock.mine().await?;
			Display::success("Mined one block");
		},
		TimeSubcommand::Now => {
			println!("{}", clock.latest_timestamp().await?);
		},
	}
	Ok(())
}

/// Handle environment command
#[instrument(skip(cmd))]
async fn handle_env(cmd: EnvCommand) -> Result<()> {
	match cmd.command {
		EnvSubcommand::Start {
			port,
			chain_id,
			block_time,
		} => {
			Display::header("Starting Local Environment");
			let options = AnvilOptions {
				port,
				chain_id,
				block_time,
				..AnvilOptions::default()
			};
			env::run_until_interrupted(options).await?;
			Display::success("Environment stopped");
		},
	}
	Ok(())
}

/// Handle verify command
#[instrument(skip(cmd))]
async fn handle_verify(config: &Path, cmd: VerifyCommand) -> Result<()> {
	let ctx = Arc::new(Context::load(Some(config)).await?);
	Display::header(&format!("Verifying {}", cmd.contract));

	let record = VerifyOps::new(ctx)
		.verify(&cmd.contract, &cmd.source, cmd.network.as_deref())
		.await?;

	Display::kv("Address", &record.address.to_string());
	logging::operation_success("Verification", &record.contract_name);
	Ok(())
}

/// Handle deployments command
#[instrument(skip(cmd))]
async fn handle_deployments(config: &Path, cmd: DeploymentsCommand) -> Result<()> {
	let ctx = Context::load(Some(config)).await?;
	match cmd.command {
		DeploymentsSubcommand::List { network } => {
			let network = network.as_deref().unwrap_or(ctx.network());
			Display::header(&format!("Deployments on {network}"));

			let records = ctx.deployment_store().list(network)?;
			if records.is_empty() {
				Display::warning("No deployment records found");
				Display::next_steps(&["Deploy the contracts with 'destaking deploy'"]);
				return Ok(());
			}
			for record in records {
				Display::section(&record.contract_name);
				Display::kv("Address", &record.address.to_string());
				Display::kv("Transaction", &record.transaction_hash.to_string());
				if let Some(block) = record.block_number {
					Display::kv("Block", &block.to_string());
				}
				if !record.args.is_empty() {
					Display::kv("Arguments", &record.args.join(", "));
				}
			}
		},
	}
	Ok(())
}

/// Handle config command
#[instrument]
async fn handle_config(config: &Path) -> Result<()> {
	Display::header("Current Configuration");

	match Context::load(Some(config)).await {
		Ok(ctx) => {
			let config = &ctx.config;
			Display::kv("Network", &config.network.name);
			Display::kv("RPC URL", &config.network.rpc_url);
			Display::kv(
				"Chain ID",
				&config
					.network
					.chain_id
					.map(|id| id.to_string())
					.unwrap_or_else(|| "any".to_string()),
			);
			match ctx.signer() {
				Ok(signer) => Display::kv("Deployer", &signer.address().to_string()),
				Err(e) => Display::warning(&format!("Signer unavailable: {e}")),
			}
			Display::kv("Artifacts", &config.artifacts.dir.display().to_string());
			Display::kv("Deployments", &config.deployments.dir.display().to_string());
			Display::kv("Timestamp unit", &config.deploy.timestamp_unit.to_string());
			Display::kv(
				"Etherscan",
				if config.etherscan.is_some() {
					"configured"
				} else {
					"not configured"
				},
			);
		},
		Err(e) => {
			info!(error = %e, "No usable configuration");
			Display::warning(&format!("No configuration loaded: {e}"));
			Display::next_steps(&[
				"Create destaking.toml, or",
				"Set RINKEBY_CLIENT_URL and NMONIC (or PRIVATE_KEY) in the environment or .env",
			]);
		},
	}
	Ok(())
}

/// Handle util command
fn handle_util(cmd: UtilCommand) -> Result<()> {
	match cmd.command {
		UtilSubcommand::RandomBytes32 => println!("{}", utils::random_bytes32()),
		UtilSubcommand::Bytes32 { value } => println!("{}", utils::bytes32(value)),
	}
	Ok(())
}
