//! High-level operation implementations for CLI commands
//!
//! Each submodule holds the logic behind one command group: deploying the
//! production contracts, running the staking scenario, managing a local
//! anvil node and verifying sources on Etherscan.

pub mod deploy;
pub mod env;
pub mod scenario;
pub mod verify;

pub use deploy::ContractDeployer;
pub use scenario::StakingScenario;
pub use verify::VerifyOps;
