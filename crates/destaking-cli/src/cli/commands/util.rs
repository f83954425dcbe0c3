use alloy_primitives::U256;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct UtilCommand {
	#[command(subcommand)]
	pub command: UtilSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UtilSubcommand {
	/// Print 32 random bytes as hex
	RandomBytes32,

	/// Print an integer left-padded to 32 bytes
	Bytes32 {
		/// Decimal or 0x-prefixed hex integer
		value: U256,
	},
}
