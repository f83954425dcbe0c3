use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct VerifyCommand {
	/// Contract name as saved in the deployment records
	pub contract: String,

	/// Flattened Solidity source file
	#[arg(short, long)]
	pub source: PathBuf,

	/// Network whose records to use (the configured network by default)
	#[arg(short, long)]
	pub network: Option<String>,
}
