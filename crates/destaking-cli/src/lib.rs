//! Deployment driver and scenario harness for the destaking contracts
//!
//! The library behind the `destaking` binary: it deploys the token, staking
//! and staking-farm contracts to a configured network, drives the staking
//! scenario against a simulated chain, controls the chain clock and verifies
//! deployed sources on Etherscan.

pub mod cli;
pub mod constants;
pub mod context;
pub mod core;
pub mod operations;
pub mod types;
pub mod utils;

pub use context::Context;
pub use types::error::{Error, Result};
