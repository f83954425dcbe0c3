//! Shared application context
//!
//! Holds the loaded configuration and builds the services operations need
//! from it: the deployment signer, connected providers and the deployment
//! record store.

use crate::{
	core::{
		blockchain::{Provider, ReceiptPolicy},
		signer,
	},
	operations::deploy::store::DeploymentStore,
	types::error::Result,
};
use alloy_signer_local::PrivateKeySigner;
use destaking_config::Config;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
}

impl Context {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Load configuration from `path` (or the environment) and build a context
	pub async fn load(path: Option<&Path>) -> Result<Self> {
		let config = Config::load(path).await?;
		debug!(network = %config.network.name, "Configuration loaded");
		Ok(Self::new(config))
	}

	/// Network name used for deployment records
	pub fn network(&self) -> &str {
		&self.config.network.name
	}

	pub fn receipt_policy(&self) -> ReceiptPolicy {
		ReceiptPolicy::new(
			self.config.network.receipt_timeout_seconds,
			self.config.network.poll_interval_ms,
		)
	}

	/// The configured deployment signer
	pub fn signer(&self) -> Result<PrivateKeySigner> {
		self.config.validate_signer()?;
		signer::from_account(&self.config.account)
	}

	/// Provider for the configured network, signing with the deployment account
	pub async fn provider(&self) -> Result<Provider> {
		self.provider_for(&self.config.network.rpc_url, Some(self.signer()?))
			.await
	}

	/// Read-only provider for the configured network
	pub async fn read_provider(&self) -> Result<Provider> {
		self.provider_for(&self.config.network.rpc_url, None).await
	}

	/// Provider for an arbitrary endpoint, sharing the configured receipt policy
	pub async fn provider_for(
		&self,
		rpc_url: &str,
		signer: Option<PrivateKeySigner>,
	) -> Result<Provider> {
		let expected = if rpc_url == self.config.network.rpc_url {
			self.config.network.chain_id
		} else {
			None
		};
		let provider = Provider::connect_expecting(rpc_url, signer, expected).await?;
		Ok(provider.with_policy(self.receipt_policy()))
	}

	pub fn deployment_store(&self) -> DeploymentStore {
		DeploymentStore::new(&self.config.deployments.dir)
	}
}
