//! Configuration module for the destaking harness.
//!
//! Configuration comes from one of two places:
//!
//! - a TOML file (default `destaking.toml`) whose string values may reference
//!   environment variables as `${VAR}` or `${VAR:-default}`;
//! - the process environment alone, using the variable names the
//!   legacy deployment scripts read (`RINKEBY_CLIENT_URL`, `NMONIC`, `PRIVATE_KEY`,
//!   `ADDRESS`, `ETHERSCAN_API_KEY`).
//!
//! Only presence is validated: an RPC URL must be set to load, and a signing
//! secret before anything is signed.

pub mod env_vars;

use destaking_types::{SecretString, TimestampUnit};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Configuration error: {0}")]
	Parse(String),
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Complete harness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	pub network: NetworkConfig,
	#[serde(default)]
	pub account: AccountConfig,
	#[serde(default)]
	pub artifacts: ArtifactsConfig,
	#[serde(default)]
	pub deploy: DeployConfig,
	#[serde(default)]
	pub deployments: DeploymentsConfig,
	#[serde(default)]
	pub etherscan: Option<EtherscanConfig>,
	#[serde(default)]
	pub solidity: SolidityConfig,
}

/// RPC endpoint the deployment and clock commands talk to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	#[serde(default = "default_network_name")]
	pub name: String,
	pub rpc_url: String,
	/// Expected chain id. When set, the harness refuses to run against a
	/// node reporting a different one.
	#[serde(default)]
	pub chain_id: Option<u64>,
	#[serde(default = "default_receipt_timeout_seconds")]
	pub receipt_timeout_seconds: u64,
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
}

/// Signing account. Exactly one of `mnemonic` or `private_key` is used;
/// the mnemonic wins when both are present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
	#[serde(default, deserialize_with = "deserialize_optional_secret")]
	pub mnemonic: Option<SecretString>,
	#[serde(default, deserialize_with = "deserialize_optional_secret")]
	pub private_key: Option<SecretString>,
	#[serde(default)]
	pub derivation_index: u32,
	/// Deployer address the derived signer must match, if given.
	#[serde(default, deserialize_with = "deserialize_optional_string")]
	pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
	#[serde(default = "default_artifacts_dir")]
	pub dir: PathBuf,
}

/// Contract names and constructor constants of the production deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
	#[serde(default = "default_token_contract")]
	pub token_contract: String,
	#[serde(default = "default_x_token_contract")]
	pub x_token_contract: String,
	#[serde(default = "default_staking_contract")]
	pub staking_contract: String,
	#[serde(default = "default_farm_contract")]
	pub farm_contract: String,
	#[serde(default = "default_staking_name")]
	pub staking_name: String,
	#[serde(default = "default_staking_reward_total")]
	pub staking_reward_total: String,
	#[serde(default = "default_farm_name")]
	pub farm_name: String,
	#[serde(default = "default_farm_reward_total")]
	pub farm_reward_total: String,
	#[serde(default)]
	pub timestamp_unit: TimestampUnit,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentsConfig {
	#[serde(default = "default_deployments_dir")]
	pub dir: PathBuf,
	#[serde(default = "default_true")]
	pub save: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EtherscanConfig {
	pub api_key: SecretString,
	#[serde(default = "default_etherscan_api_url")]
	pub api_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolidityConfig {
	/// Full solc version string as Etherscan expects it.
	#[serde(default = "default_compiler_version")]
	pub compiler_version: String,
	#[serde(default)]
	pub optimizer_runs: Option<u32>,
	#[serde(default = "default_license_type")]
	pub license_type: u8,
}

fn default_network_name() -> String {
	"rinkeby".to_string()
}

fn default_receipt_timeout_seconds() -> u64 {
	120
}

fn default_poll_interval_ms() -> u64 {
	1000
}

fn default_artifacts_dir() -> PathBuf {
	PathBuf::from("build/contracts")
}

fn default_token_contract() -> String {
	"DominationToken".to_string()
}

fn default_x_token_contract() -> String {
	"DominationXToken".to_string()
}

fn default_staking_contract() -> String {
	"Destaking".to_string()
}

fn default_farm_contract() -> String {
	"DestakingFarm".to_string()
}

fn default_staking_name() -> String {
	"CE STAKING".to_string()
}

fn default_staking_reward_total() -> String {
	"33171875000000000000000000".to_string()
}

fn default_farm_name() -> String {
	"CE STAKING FARM".to_string()
}

fn default_farm_reward_total() -> String {
	"3300000000000000000000".to_string()
}

fn default_deployments_dir() -> PathBuf {
	PathBuf::from("deployments")
}

fn default_true() -> bool {
	true
}

fn default_etherscan_api_url() -> String {
	"https://api-rinkeby.etherscan.io/api".to_string()
}

fn default_compiler_version() -> String {
	"v0.8.5+commit.a4f2e591".to_string()
}

fn default_license_type() -> u8 {
	// MIT
	3
}

impl Default for ArtifactsConfig {
	fn default() -> Self {
		Self {
			dir: default_artifacts_dir(),
		}
	}
}

impl Default for DeployConfig {
	fn default() -> Self {
		Self {
			token_contract: default_token_contract(),
			x_token_contract: default_x_token_contract(),
			staking_contract: default_staking_contract(),
			farm_contract: default_farm_contract(),
			staking_name: default_staking_name(),
			staking_reward_total: default_staking_reward_total(),
			farm_name: default_farm_name(),
			farm_reward_total: default_farm_reward_total(),
			timestamp_unit: TimestampUnit::default(),
		}
	}
}

impl Default for DeploymentsConfig {
	fn default() -> Self {
		Self {
			dir: default_deployments_dir(),
			save: true,
		}
	}
}

impl Default for SolidityConfig {
	fn default() -> Self {
		Self {
			compiler_version: default_compiler_version(),
			optimizer_runs: None,
			license_type: default_license_type(),
		}
	}
}

/// Empty strings (typically from `${VAR:-}`) count as absent.
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value
		.filter(|s| !s.trim().is_empty())
		.map(SecretString::from))
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = Option::<String>::deserialize(deserializer)?;
	Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable
/// `VAR_NAME`, or with `default` for `${VAR_NAME:-default}` when unset.
/// References inside full-line `#` comments are left as written.
pub fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	resolve_vars_with(input, |name| std::env::var(name).ok())
}

/// Same as [`resolve_env_vars`] with an explicit variable lookup.
pub fn resolve_vars_with(
	input: &str,
	lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let Some(full_match) = cap.get(0) else {
			continue;
		};
		// Full-line TOML comments are copied through untouched.
		let line_start = input[..full_match.start()]
			.rfind('\n')
			.map_or(0, |i| i + 1);
		if input[line_start..full_match.start()].trim_start().starts_with('#') {
			continue;
		}

		let var_name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match (lookup(var_name), default_value) {
			(Some(v), _) => v,
			(None, Some(default)) => default.to_string(),
			(None, None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{var_name}' not found"
				)))
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file, resolving `${VAR}` references
	/// against the process environment.
	pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		let resolved = resolve_env_vars(&raw)?;
		resolved.parse()
	}

	/// Builds a configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_vars(|name| std::env::var(name).ok())
	}

	/// Builds a configuration from an arbitrary variable lookup, falling back
	/// to defaults for everything but the RPC URL and signing secret.
	pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

		let rpc_url = env_vars::RPC_URL
			.iter()
			.find_map(|name| get(name))
			.ok_or_else(|| {
				ConfigError::Validation(format!(
					"No RPC endpoint configured (set one of {})",
					env_vars::RPC_URL.join(", ")
				))
			})?;

		let mut deploy = DeployConfig::default();
		if let Some(unit) = get(env_vars::TIMESTAMP_UNIT) {
			deploy.timestamp_unit = unit.parse().map_err(ConfigError::Validation)?;
		}

		let config = Self {
			network: NetworkConfig {
				name: get(env_vars::NETWORK).unwrap_or_else(default_network_name),
				rpc_url,
				chain_id: get(env_vars::CHAIN_ID)
					.map(|id| {
						id.parse::<u64>().map_err(|e| {
							ConfigError::Validation(format!("Invalid chain id '{id}': {e}"))
						})
					})
					.transpose()?,
				receipt_timeout_seconds: default_receipt_timeout_seconds(),
				poll_interval_ms: default_poll_interval_ms(),
			},
			account: AccountConfig {
				mnemonic: get(env_vars::MNEMONIC).map(SecretString::from),
				private_key: get(env_vars::PRIVATE_KEY).map(SecretString::from),
				derivation_index: 0,
				address: get(env_vars::ADDRESS),
			},
			artifacts: ArtifactsConfig {
				dir: get(env_vars::ARTIFACTS_DIR)
					.map(PathBuf::from)
					.unwrap_or_else(default_artifacts_dir),
			},
			deploy,
			deployments: DeploymentsConfig::default(),
			etherscan: get(env_vars::ETHERSCAN_API_KEY).map(|key| EtherscanConfig {
				api_key: SecretString::from(key),
				api_url: get(env_vars::ETHERSCAN_API_URL)
					.unwrap_or_else(default_etherscan_api_url),
			}),
			solidity: SolidityConfig::default(),
		};

		config.validate()?;
		Ok(config)
	}

	/// Loads from `path` when the file exists, otherwise from the
	/// environment.
	pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		match path {
			Some(path) if path.exists() => Self::from_file(path).await,
			Some(path) if path != Path::new(DEFAULT_CONFIG_FILE) => Err(ConfigError::Validation(
				format!("Configuration file not found: {}", path.display()),
			)),
			_ => Self::from_env(),
		}
	}

	/// Checks that the values needed to reach the chain are present.
	///
	/// The signing secret is optional here so read-only commands work without
	/// one; see [`Config::validate_signer`].
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.network.rpc_url.trim().is_empty() {
			return Err(ConfigError::Validation("network.rpc_url cannot be empty".into()));
		}
		if self.network.receipt_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"network.receipt_timeout_seconds must be greater than zero".into(),
			));
		}
		if self.network.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"network.poll_interval_ms must be greater than zero".into(),
			));
		}
		Ok(())
	}

	/// Checks that a mnemonic or private key is configured.
	pub fn validate_signer(&self) -> Result<(), ConfigError> {
		if self.account.mnemonic.is_none() && self.account.private_key.is_none() {
			return Err(ConfigError::Validation(format!(
				"No signing secret configured (set account.mnemonic / account.private_key, or {} / {})",
				env_vars::MNEMONIC,
				env_vars::PRIVATE_KEY
			)));
		}
		Ok(())
	}
}

/// Config file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "destaking.toml";

impl std::str::FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}
