use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct DeploymentsCommand {
	#[command(subcommand)]
	pub command: DeploymentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DeploymentsSubcommand {
	/// List recorded deployments of a network
	List {
		/// Network name (the configured network by default)
		#[arg(short, long)]
		network: Option<String>,
	},
}
