use crate::constants;
use clap::Args;
use std::path::PathBuf;

/// The staking scenario: deploy mock tokens and the staking contract, then
/// stake, unstake across every reward tier and withdraw leftover rewards
#[derive(Args, Debug)]
pub struct ScenarioCommand {
	/// Artifacts containing ErcMock20 and Staking
	#[arg(short, long, default_value = constants::DEFAULT_SCENARIO_ARTIFACTS)]
	pub artifacts: PathBuf,

	/// Run against an existing node instead of starting anvil
	#[arg(long)]
	pub rpc_url: Option<String>,

	/// Port for the spawned anvil (a free port by default)
	#[arg(short, long, conflicts_with = "rpc_url")]
	pub port: Option<u16>,
}
