//! Environment variable names read when no config file is present.

/// RPC endpoint, in lookup order. The second name is the one the Hardhat
/// network config used.
pub const RPC_URL: &[&str] = &["RINKEBY_CLIENT_URL", "RPC_RINKEYBY", "DESTAKING_RPC_URL"];

/// Deployment mnemonic. The spelling matches the existing `.env` files.
pub const MNEMONIC: &str = "NMONIC";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const ADDRESS: &str = "ADDRESS";
pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
pub const ETHERSCAN_API_URL: &str = "ETHERSCAN_API_URL";

pub const NETWORK: &str = "DESTAKING_NETWORK";
pub const CHAIN_ID: &str = "DESTAKING_CHAIN_ID";
pub const ARTIFACTS_DIR: &str = "DESTAKING_ARTIFACTS";
pub const TIMESTAMP_UNIT: &str = "DESTAKING_TIMESTAMP_UNIT";
