//! Argument structures for each `destaking` subcommand.

mod deploy;
mod deployments;
mod env;
mod scenario;
mod time;
mod util;
mod verify;

pub use deploy::DeployCommand;
pub use deployments::{DeploymentsCommand, DeploymentsSubcommand};
pub use env::{EnvCommand, EnvSubcommand};
pub use scenario::ScenarioCommand;
pub use time::{TimeCommand, TimeSubcommand};
pub use util::{UtilCommand, UtilSubcommand};
pub use verify::VerifyCommand;
