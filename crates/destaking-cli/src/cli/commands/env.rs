use crate::constants;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct EnvCommand {
	#[command(subcommand)]
	pub command: EnvSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EnvSubcommand {
	/// Run anvil in the foreground with the test mnemonic
	Start {
		#[arg(short, long, default_value_t = constants::anvil::DEFAULT_PORT)]
		port: u16,

		#[arg(long, default_value_t = constants::anvil::CHAIN_ID)]
		chain_id: u64,

		/// Mine on an interval instead of on every transaction
		#[arg(long)]
		block_time: Option<u64>,
	},
}
