//! Error types and result handling for the destaking harness
//!
//! One error enum covers every subsystem of the harness: RPC access,
//! transaction confirmation, contract encoding, deployment, the staking
//! scenario checks, the local chain process and Etherscan verification.

use alloy_primitives::{Address, B256, U256};
use std::path::PathBuf;

/// Convenience Result type alias using the local Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	// Chain errors
	#[error("RPC request failed: {0}")]
	RpcError(String),

	#[error("Invalid RPC URL: {0}")]
	InvalidRpcUrl(String),

	#[error("Connected to chain {actual}, expected chain {expected}")]
	ChainMismatch { expected: u64, actual: u64 },

	#[error("No receipt for transaction {0} before timeout")]
	ReceiptTimeout(B256),

	#[error("Transaction {0} reverted")]
	TransactionReverted(B256),

	// Signer errors
	#[error("Invalid private key: {0}")]
	InvalidPrivateKey(String),

	#[error("Invalid mnemonic: {0}")]
	InvalidMnemonic(String),

	#[error("Signer address {actual} does not match configured deployer {expected}")]
	AddressMismatch { expected: String, actual: Address },

	#[error("No signer configured for this operation")]
	MissingSigner,

	// Contract errors
	#[error("Invalid ABI: {0}")]
	InvalidAbi(String),

	#[error("Invalid constructor argument for {contract}: {reason}")]
	InvalidConstructorArgs { contract: String, reason: String },

	#[error("Contract call failed: {0}")]
	ContractCallFailed(String),

	#[error("Deployment failed: {0}")]
	DeploymentFailed(String),

	#[error("No deployment record for {contract} on {network}")]
	DeploymentNotFound { contract: String, network: String },

	#[error(transparent)]
	Artifact(#[from] destaking_types::ArtifactError),

	// Scenario errors
	#[error("{step}: {check} expected {expected}, got {actual}")]
	CheckFailed {
		step: String,
		check: String,
		expected: U256,
		actual: U256,
	},

	// Local chain errors
	#[error("Failed to start anvil: {0}")]
	AnvilStartFailed(String),

	#[error("Chain at {0} did not become ready")]
	ChainNotReady(String),

	// Verification errors
	#[error("Etherscan request failed: {0}")]
	Etherscan(String),

	#[error("Verification failed: {0}")]
	VerificationFailed(String),

	#[error("Etherscan is not configured (set ETHERSCAN_API_KEY or [etherscan])")]
	EtherscanNotConfigured,

	// Storage errors
	#[error("Failed to write {}: {source}", path.display())]
	StorageError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Config(#[from] destaking_config::ConfigError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
