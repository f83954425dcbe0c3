//! Constants used by the local chain, the staking scenario and the CLI
//!
//! Contains the well-known anvil development accounts, the contract names the
//! scenario deploys and the default locations of artifacts and configuration.

/// Default anvil development accounts
///
/// These are the public test accounts derived from anvil's default mnemonic
/// and must never hold real funds.
pub mod anvil_accounts {
	/// Mnemonic anvil uses when started without `--mnemonic`
	pub const MNEMONIC: &str = "test test test test test test test test test test test junk";

	/// Account #0, deployer and first staker of the scenario
	pub const ALICE_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

	pub const ALICE_PRIVATE_KEY: &str =
		"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	/// Account #1
	pub const BOB_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

	/// Account #2
	pub const CARL_ADDRESS: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
}

/// Local chain defaults
pub mod anvil {
	pub const DEFAULT_PORT: u16 = 8545;
	pub const CHAIN_ID: u64 = 31337;
	pub const ACCOUNTS: u32 = 10;
	/// Starting balance of each account, in ether
	pub const BALANCE: u64 = 10_000;
	pub const READY_ATTEMPTS: u32 = 30;
	pub const READY_INTERVAL_MS: u64 = 500;
}

/// Contract names the staking scenario deploys
pub mod scenario_contracts {
	pub const MOCK_TOKEN: &str = "ErcMock20";
	pub const STAKING: &str = "Staking";
}

/// Where the scenario looks for artifacts when none is given
pub const DEFAULT_SCENARIO_ARTIFACTS: &str = "artifacts";

/// Environment variable holding the config file path
pub const CONFIG_ENV_VAR: &str = "DESTAKING_CONFIG";

/// Etherscan verification polling
pub mod etherscan {
	pub const STATUS_ATTEMPTS: u32 = 10;
	pub const STATUS_INTERVAL_SECS: u64 = 5;
}
