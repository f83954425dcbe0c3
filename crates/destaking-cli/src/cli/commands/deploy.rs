use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DeployCommand {
	/// Artifacts directory, overriding `artifacts.dir`
	#[arg(short, long)]
	pub artifacts: Option<PathBuf>,

	/// Load artifacts and encode constructor data without sending anything
	#[arg(long)]
	pub dry_run: bool,

	/// Do not write deployment records
	#[arg(long)]
	pub no_save: bool,
}
