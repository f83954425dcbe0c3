//! Common types for the destaking harness.
//!
//! This crate holds the data types shared by the configuration layer and the
//! command-line harness: chain identifiers, compiled contract artifacts,
//! secret handling and time units used by the deployment schedule.

/// Compiled contract artifacts (ABI and creation bytecode).
pub mod artifact;
/// Chain identifiers.
pub mod chain;
/// Secure string type for mnemonics, private keys and API keys.
pub mod secret_string;
/// Time units and day arithmetic for deployment schedules.
pub mod time;

pub use artifact::{ArtifactError, ContractArtifact};
pub use chain::ChainId;
pub use secret_string::SecretString;
pub use time::{TimestampUnit, SECONDS_PER_DAY};
