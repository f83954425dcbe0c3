//! Contract source verification
//!
//! Verifies a recorded deployment on Etherscan using the constructor
//! arguments saved with its deployment record.

pub mod etherscan;

use crate::{
	constants,
	operations::deploy::store::DeploymentRecord,
	types::error::{Error, Result},
	Context,
};
use destaking_types::ChainId;
use std::{path::Path, sync::Arc, time::Duration};
use tracing::{info, instrument};

pub use etherscan::{EtherscanClient, Submission, VerificationRequest, VerificationStatus};

pub struct VerifyOps {
	ctx: Arc<Context>,
}

impl VerifyOps {
	pub fn new(ctx: Arc<Context>) -> Self {
		Self { ctx }
	}

	/// Build the verification request for a saved deployment
	pub fn request_for(&self, record: &DeploymentRecord, source_code: String) -> VerificationRequest {
		let solidity = &self.ctx.config.solidity;
		VerificationRequest {
			address: record.address,
			contract_name: record.contract_name.clone(),
			source_code,
			compiler_version: solidity.compiler_version.clone(),
			optimizer_runs: solidity.optimizer_runs,
			constructor_args: record.constructor_args.clone(),
			license_type: solidity.license_type,
		}
	}

	/// Verify `contract` as deployed on `network` (the configured network
	/// when `None`) against a flattened source file
	///
	/// # Arguments
	/// * `contract` - Contract name of a saved deployment record
	/// * `source` - Flattened single-file Solidity source
	/// * `network` - Record directory to read, defaults to the configured network
	///
	/// # Returns
	/// The deployment record that was verified
	///
	/// # Errors
	/// Returns error if Etherscan is not configured, no deployment record
	/// exists, the record belongs to a local chain, the source cannot be
	/// read, or verification fails
	#[instrument(skip(self, source))]
	pub async fn verify(
		&self,
		contract: &str,
		source: &Path,
		network: Option<&str>,
	) -> Result<DeploymentRecord> {
		let etherscan = self
			.ctx
			.config
			.etherscan
			.as_ref()
			.ok_or(Error::EtherscanNotConfigured)?;
		let network = network.unwrap_or(self.ctx.network());

		let record = self.ctx.deployment_store().load(network, contract)?;
		let chain = ChainId::from_u64(record.chain_id);
		if chain.is_local() {
			return Err(Error::VerificationFailed(format!(
				"{contract} was deployed on local chain {chain}"
			)));
		}
		let source_code = tokio::fs::read_to_string(source).await?;

		let client = EtherscanClient::new(&etherscan.api_url, etherscan.api_key.clone())?;
		let guid = match client.submit(&self.request_for(&record, source_code)).await? {
			Submission::Queued(guid) => guid,
			Submission::AlreadyVerified => {
				info!(contract = contract, address = %record.address, "Contract already verified");
				return Ok(record);
			},
		};
		info!(contract = contract, guid = %guid, "Verification submitted");

		client
			.wait_for_verification(
				&guid,
				constants::etherscan::STATUS_ATTEMPTS,
				Duration::from_secs(constants::etherscan::STATUS_INTERVAL_SECS),
			)
			.await?;
		info!(contract = contract, address = %record.address, "Contract verified");
		Ok(record)
	}
}
