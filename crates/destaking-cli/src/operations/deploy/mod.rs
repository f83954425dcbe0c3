//! Contract deployment operations
//!
//! Deploys the production contract set in dependency order: the token, the
//! secondary token, the staking contract and the staking farm. Each creation
//! transaction must be mined successfully before the next one is sent, since
//! later constructors take earlier addresses. A failure stops the sequence;
//! contracts already deployed stay deployed and keep their records.

pub mod schedule;
pub mod store;

use crate::{
	core::{
		blockchain::TxSender,
		contracts::{self, encode_constructor_args, init_code, DeployedContract},
		logging,
	},
	types::error::{Error, Result},
	Context,
};
use alloy_primitives::{Address, Bytes};
use destaking_config::DeployConfig;
use destaking_types::{ChainId, ContractArtifact};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};
use tracing::{info, instrument};

pub use schedule::DeploySchedule;
pub use store::{DeploymentRecord, DeploymentStore};

/// The four production artifacts, loaded before anything is sent
#[derive(Debug, Clone)]
pub struct DeploymentArtifacts {
	pub token: ContractArtifact,
	pub x_token: ContractArtifact,
	pub staking: ContractArtifact,
	pub farm: ContractArtifact,
}

impl DeploymentArtifacts {
	pub fn load(dir: &Path, config: &DeployConfig) -> Result<Self> {
		let load =
			|name: &str| -> Result<ContractArtifact> { Ok(ContractArtifact::find(dir, name)?) };

		Ok(Self {
			token: load(&config.token_contract)?,
			x_token: load(&config.x_token_contract)?,
			staking: load(&config.staking_contract)?,
			farm: load(&config.farm_contract)?,
		})
	}
}

/// `(name, token, t0, t1, t2, t3, rewardTotal)`
pub fn staking_args(
	config: &DeployConfig,
	token: Address,
	schedule: &DeploySchedule,
) -> Vec<String> {
	let mut args = vec![config.staking_name.clone(), token.to_string()];
	args.extend(schedule.as_args());
	args.push(config.staking_reward_total.clone());
	args
}

/// `(name, token, xToken, t0, t1, t2, t3, rewardTotal)`
pub fn farm_args(
	config: &DeployConfig,
	token: Address,
	x_token: Address,
	schedule: &DeploySchedule,
) -> Vec<String> {
	let mut args = vec![config.farm_name.clone(), token.to_string(), x_token.to_string()];
	args.extend(schedule.as_args());
	args.push(config.farm_reward_total.clone());
	args
}

/// One creation transaction as it would be sent
#[derive(Debug, Clone)]
pub struct PlannedDeployment {
	pub contract: String,
	pub args: Vec<String>,
	pub encoded_args: Bytes,
	pub init_code_len: usize,
}

/// Result of a full deployment run
#[derive(Debug, Clone)]
pub struct DeploymentSummary {
	pub network: String,
	pub chain: ChainId,
	pub deployer: Address,
	pub schedule: DeploySchedule,
	pub token: DeployedContract,
	pub x_token: DeployedContract,
	pub staking: DeployedContract,
	pub farm: DeployedContract,
	/// Record files written, empty when saving is disabled
	pub records: Vec<PathBuf>,
}

impl DeploymentSummary {
	pub fn contracts(&self) -> [&DeployedContract; 4] {
		[&self.token, &self.x_token, &self.staking, &self.farm]
	}
}

/// Contract deployment operations handler
#[derive(Clone)]
pub struct ContractDeployer {
	ctx: Arc<Context>,
	artifacts_dir: PathBuf,
}

impl ContractDeployer {
	/// Deployer reading artifacts from the configured directory
	pub fn new(ctx: Arc<Context>) -> Self {
		let artifacts_dir = ctx.config.artifacts.dir.clone();
		Self { ctx, artifacts_dir }
	}

	/// Deployer reading artifacts from `artifacts_dir` instead of the
	/// configured directory
	///
	/// # Arguments
	/// * `ctx` - Shared context with network and account configuration
	/// * `artifacts_dir` - Directory searched for compiled artifacts
	pub fn with_path(ctx: Arc<Context>, artifacts_dir: PathBuf) -> Self {
		Self { ctx, artifacts_dir }
	}

	pub fn artifacts_dir(&self) -> &Path {
		&self.artifacts_dir
	}

	pub fn load_artifacts(&self) -> Result<DeploymentArtifacts> {
		DeploymentArtifacts::load(&self.artifacts_dir, &self.ctx.config.deploy)
	}

	/// Encode every creation transaction without sending anything
	///
	/// Addresses of not-yet-deployed dependencies are the zero address.
	pub fn plan(&self, schedule: &DeploySchedule) -> Result<Vec<PlannedDeployment>> {
		let artifacts = self.load_artifacts()?;
		let config = &self.ctx.config.deploy;

		let steps = [
			(&artifacts.token, Vec::new()),
			(&artifacts.x_token, Vec::new()),
			(
				&artifacts.staking,
				staking_args(config, Address::ZERO, schedule),
			),
			(
				&artifacts.farm,
				farm_args(config, Address::ZERO, Address::ZERO, schedule),
			),
		];

		steps
			.into_iter()
			.map(|(artifact, args)| {
				let encoded_args = encode_constructor_args(artifact, &args)?;
				let init_code_len = init_code(artifact, &encoded_args).len();
				Ok(PlannedDeployment {
					contract: artifact.name.clone(),
					args,
					encoded_args,
					init_code_len,
				})
			})
			.collect()
	}

	/// Deploy the full contract set on the configured network
	///
	/// # Arguments
	/// * `save` - Write a deployment record after each mined contract
	///
	/// # Returns
	/// Addresses, schedule and written record paths of the run
	///
	/// # Errors
	/// Returns error if an artifact is missing, a constructor argument does
	/// not fit its ABI type, or any creation transaction fails
	#[instrument(skip(self), fields(network = %self.ctx.network()))]
	pub async fn deploy_all(&self, save: bool) -> Result<DeploymentSummary> {
		let artifacts = self.load_artifacts()?;
		let config = &self.ctx.config.deploy;

		let provider = self.ctx.provider().await?;
		let chain = provider.chain();
		let deployer = provider
			.signer_address()
			.ok_or(Error::MissingSigner)?;
		info!(chain = %chain, deployer = %deployer, "Starting contract deployment");

		let sender = TxSender::new(provider);
		let store = save.then(|| self.ctx.deployment_store());
		let mut records = Vec::new();

		let token = self
			.deploy_one(&sender, &artifacts.token, Vec::new(), 1, store.as_ref(), &mut records)
			.await?;
		let x_token = self
			.deploy_one(&sender, &artifacts.x_token, Vec::new(), 2, store.as_ref(), &mut records)
			.await?;

		let schedule = DeploySchedule::now(config.timestamp_unit);
		info!(
			unit = %schedule.unit,
			start = schedule.start,
			"Deployment schedule fixed"
		);

		let staking = self
			.deploy_one(
				&sender,
				&artifacts.staking,
				staking_args(config, token.handle.address(), &schedule),
				3,
				store.as_ref(),
				&mut records,
			)
			.await?;
		let farm = self
			.deploy_one(
				&sender,
				&artifacts.farm,
				farm_args(
					config,
					token.handle.address(),
					x_token.handle.address(),
					&schedule,
				),
				4,
				store.as_ref(),
				&mut records,
			)
			.await?;

		info!(chain = %chain, "Contract deployment completed successfully");
		Ok(DeploymentSummary {
			network: self.ctx.network().to_string(),
			chain,
			deployer,
			schedule,
			token,
			x_token,
			staking,
			farm,
			records,
		})
	}

	/// Deploy one artifact and, when a store is given, record it right after
	/// its receipt so a later failure leaves the earlier records in place.
	async fn deploy_one(
		&self,
		sender: &TxSender,
		artifact: &ContractArtifact,
		args: Vec<String>,
		position: u64,
		store: Option<&DeploymentStore>,
		records: &mut Vec<PathBuf>,
	) -> Result<DeployedContract> {
		logging::operation_progress("deploy", &artifact.name, position, 4);
		let deployed = contracts::deploy(sender, artifact, &args).await?;
		logging::contract_deployed(
			&artifact.name,
			&deployed.handle.address().to_string(),
			&deployed.transaction_hash.to_string(),
		);

		if let Some(store) = store {
			let record = DeploymentRecord::new(sender.provider().chain(), &deployed, args);
			records.push(store.save(self.ctx.network(), &record)?);
		}
		Ok(deployed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::testing::{mined_receipt, received_methods, signing_node};
	use alloy_primitives::{hex, B256};
	use destaking_types::TimestampUnit;
	use serde_json::json;
	use wiremock::{matchers::method, Mock, MockServer};

	fn schedule() -> DeploySchedule {
		DeploySchedule::from_millis(1_000, TimestampUnit::Milliseconds)
	}

	#[test]
	fn staking_args_use_configured_constants() {
		let token: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
		let args = staking_args(&DeployConfig::default(), token, &schedule());
		assert_eq!(
			args,
			vec![
				"CE STAKING".to_string(),
				token.to_string(),
				"1000".to_string(),
				"86401000".to_string(),
				"172801000".to_string(),
				"259201000".to_string(),
				"33171875000000000000000000".to_string(),
			]
		);
	}

	#[test]
	fn farm_args_carry_both_tokens() {
		let token = Address::repeat_byte(0x01);
		let x_token = Address::repeat_byte(0x02);
		let args = farm_args(&DeployConfig::default(), token, x_token, &schedule());
		assert_eq!(args.len(), 8);
		assert_eq!(args[0], "CE STAKING FARM");
		assert_eq!(args[1], token.to_string());
		assert_eq!(args[2], x_token.to_string());
		assert_eq!(args[3..7], schedule().as_args()[..]);
		assert_eq!(args[7], "3300000000000000000000");
	}

	#[test]
	fn address_args_parse_back() {
		let token = Address::repeat_byte(0xab);
		let args = staking_args(&DeployConfig::default(), token, &schedule());
		assert_eq!(args[1].parse::<Address>().unwrap(), token);
	}

	fn write_artifact(dir: &Path, name: &str, inputs: &[(&str, &str)]) {
		let mut abi = Vec::new();
		if !inputs.is_empty() {
			let inputs: Vec<_> = inputs
				.iter()
				.map(|(name, ty)| json!({ "name": name, "type": ty }))
				.collect();
			abi.push(json!({
				"type": "constructor",
				"stateMutability": "nonpayable",
				"inputs": inputs
			}));
		}
		let artifact = json!({ "contractName": name, "abi": abi, "bytecode": "0x6080" });
		std::fs::write(dir.join(format!("{name}.json")), artifact.to_string()).unwrap();
	}

	fn write_contract_set(dir: &Path) {
		let schedule_inputs = [
			("start", "uint256"),
			("phase1", "uint256"),
			("phase2", "uint256"),
			("end", "uint256"),
		];
		write_artifact(dir, "DominationToken", &[]);
		write_artifact(dir, "DominationXToken", &[]);
		let mut staking = vec![("name", "string"), ("token", "address")];
		staking.extend(schedule_inputs);
		staking.push(("rewardTotal", "uint256"));
		write_artifact(dir, "Destaking", &staking);
		let mut farm = vec![("name", "string"), ("token", "address"), ("xToken", "address")];
		farm.extend(schedule_inputs);
		farm.push(("rewardTotal", "uint256"));
		write_artifact(dir, "DestakingFarm", &farm);
	}

	fn config(rpc_url: &str, artifacts_dir: &Path) -> destaking_config::Config {
		let artifacts_dir = artifacts_dir.display().to_string();
		destaking_config::Config::from_vars(|name| match name {
			"RINKEBY_CLIENT_URL" => Some(rpc_url.to_string()),
			"PRIVATE_KEY" => Some(crate::constants::anvil_accounts::ALICE_PRIVATE_KEY.to_string()),
			"DESTAKING_ARTIFACTS" => Some(artifacts_dir.clone()),
			_ => None,
		})
		.unwrap()
	}

	#[test]
	fn plan_encodes_every_deployment_in_order() {
		let dir = tempfile::TempDir::new().unwrap();
		write_contract_set(dir.path());
		let config = config("http://127.0.0.1:8545", dir.path());
		let deployer = ContractDeployer::new(Arc::new(Context::new(config)));

		let plan = deployer.plan(&schedule()).unwrap();
		let names: Vec<_> = plan.iter().map(|p| p.contract.as_str()).collect();
		assert_eq!(
			names,
			vec!["DominationToken", "DominationXToken", "Destaking", "DestakingFarm"]
		);
		assert!(plan[0].encoded_args.is_empty());
		assert_eq!(plan[0].init_code_len, 2);
		// Static head of seven and eight words, plus the padded name.
		assert_eq!(plan[2].encoded_args.len(), 7 * 32 + 2 * 32);
		assert_eq!(plan[3].encoded_args.len(), 8 * 32 + 2 * 32);
		assert_eq!(plan[3].init_code_len, 2 + plan[3].encoded_args.len());
	}

	#[test]
	fn missing_artifact_stops_before_sending() {
		let dir = tempfile::TempDir::new().unwrap();
		let config = config("http://127.0.0.1:8545", dir.path());
		let deployer = ContractDeployer::new(Arc::new(Context::new(config)));
		assert!(matches!(
			deployer.load_artifacts(),
			Err(Error::Artifact(_))
		));
	}

	const TOKEN: Address = Address::repeat_byte(0x11);
	const X_TOKEN: Address = Address::repeat_byte(0x22);
	const STAKING: Address = Address::repeat_byte(0x33);
	const FARM: Address = Address::repeat_byte(0x44);

	fn tx_hashes() -> Vec<B256> {
		(1..=4u8).map(B256::repeat_byte).collect()
	}

	/// Raw signed transactions the node received, in order
	async fn raw_transactions(server: &MockServer) -> Vec<String> {
		received_methods(server)
			.await
			.into_iter()
			.filter(|(method, _)| method == "eth_sendRawTransaction")
			.filter_map(|(_, params)| params.get(0)?.as_str().map(str::to_lowercase))
			.collect()
	}

	#[tokio::test]
	async fn deploy_all_feeds_receipt_addresses_into_later_constructors() {
		let dir = tempfile::TempDir::new().unwrap();
		write_contract_set(dir.path());
		let hashes = tx_hashes();
		let receipts = [TOKEN, X_TOKEN, STAKING, FARM]
			.iter()
			.zip(&hashes)
			.map(|(address, hash)| mined_receipt(*hash, Some(*address), true))
			.collect();

		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(signing_node(&hashes, receipts))
			.mount(&server)
			.await;

		let deployer =
			ContractDeployer::new(Arc::new(Context::new(config(&server.uri(), dir.path()))));
		let summary = deployer.deploy_all(false).await.unwrap();

		assert_eq!(summary.token.handle.address(), TOKEN);
		assert_eq!(summary.x_token.handle.address(), X_TOKEN);
		assert_eq!(summary.staking.handle.address(), STAKING);
		assert_eq!(summary.farm.handle.address(), FARM);
		assert_eq!(summary.farm.transaction_hash, hashes[3]);
		assert!(summary.records.is_empty());

		let raw = raw_transactions(&server).await;
		assert_eq!(raw.len(), 4);
		let token_hex = hex::encode(TOKEN);
		let x_token_hex = hex::encode(X_TOKEN);
		assert!(!raw[0].contains(&token_hex));
		assert!(raw[2].contains(&token_hex));
		assert!(!raw[2].contains(&x_token_hex));
		assert!(raw[3].contains(&token_hex));
		assert!(raw[3].contains(&x_token_hex));
	}

	#[tokio::test]
	async fn reverted_deployment_stops_sequence_and_keeps_earlier_records() {
		let dir = tempfile::TempDir::new().unwrap();
		write_contract_set(dir.path());
		let hashes = tx_hashes();
		let receipts = vec![
			mined_receipt(hashes[0], Some(TOKEN), true),
			mined_receipt(hashes[1], Some(X_TOKEN), true),
			mined_receipt(hashes[2], Some(STAKING), false),
			mined_receipt(hashes[3], Some(FARM), true),
		];

		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(signing_node(&hashes, receipts))
			.mount(&server)
			.await;

		let records_dir = tempfile::TempDir::new().unwrap();
		let mut config = config(&server.uri(), dir.path());
		config.deployments.dir = records_dir.path().to_path_buf();
		let ctx = Arc::new(Context::new(config));

		let result = ContractDeployer::new(ctx.clone()).deploy_all(true).await;
		assert!(matches!(result, Err(Error::TransactionReverted(h)) if h == hashes[2]));
		assert_eq!(raw_transactions(&server).await.len(), 3);

		let records = ctx.deployment_store().list(ctx.network()).unwrap();
		let saved: Vec<_> = records
			.iter()
			.map(|r| (r.contract_name.as_str(), r.address))
			.collect();
		assert_eq!(
			saved,
			vec![("DominationToken", TOKEN), ("DominationXToken", X_TOKEN)]
		);
	}
}
