use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct TimeCommand {
	/// Node to talk to, overriding `network.rpc_url`
	#[arg(long, global = true)]
	pub rpc_url: Option<String>,

	#[command(subcommand)]
	pub command: TimeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TimeSubcommand {
	/// Advance block time and mine a block
	Increase {
		/// Seconds to advance
		seconds: u64,
	},

	/// Mine one block
	Mine,

	/// Print the latest block timestamp
	Now,
}
