//! Deployment records on disk
//!
//! Every deployed contract is written to
//! `<dir>/<network>/<ContractName>.json`, alongside a `.chainId` marker, so
//! later commands (verification, scripts) can find addresses and constructor
//! arguments without scraping terminal output.

use crate::{
	core::contracts::DeployedContract,
	types::error::{Error, Result},
};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, B256};
use destaking_types::ChainId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
	pub contract_name: String,
	pub address: Address,
	pub chain_id: u64,
	pub transaction_hash: B256,
	pub block_number: Option<u64>,
	/// Constructor arguments as given, before ABI coercion
	pub args: Vec<String>,
	/// ABI-encoded constructor arguments, as Etherscan expects them
	pub constructor_args: Bytes,
	pub abi: JsonAbi,
	pub deployed_at: i64,
}

impl DeploymentRecord {
	pub fn new(chain: ChainId, deployed: &DeployedContract, args: Vec<String>) -> Self {
		Self {
			contract_name: deployed.handle.name().to_string(),
			address: deployed.handle.address(),
			chain_id: chain.id(),
			transaction_hash: deployed.transaction_hash,
			block_number: deployed.block_number,
			args,
			constructor_args: deployed.constructor_args.clone(),
			abi: deployed.handle.abi().clone(),
			deployed_at: chrono::Utc::now().timestamp(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct DeploymentStore {
	root: PathBuf,
}

impl DeploymentStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	fn network_dir(&self, network: &str) -> PathBuf {
		self.root.join(network)
	}

	fn record_path(&self, network: &str, contract: &str) -> PathBuf {
		self.network_dir(network).join(format!("{contract}.json"))
	}

	/// Write a record, replacing any earlier deployment of the same contract
	///
	/// # Arguments
	/// * `network` - Network directory name, e.g. `rinkeby`
	/// * `record` - Record to write as `<ContractName>.json`
	///
	/// # Returns
	/// Path of the written record file
	///
	/// # Errors
	/// Returns [`Error::StorageError`] with the underlying I/O error if the
	/// directory or a file cannot be written
	pub fn save(&self, network: &str, record: &DeploymentRecord) -> Result<PathBuf> {
		let dir = self.network_dir(network);
		std::fs::create_dir_all(&dir).map_err(storage_error(&dir))?;

		let chain_marker = dir.join(".chainId");
		std::fs::write(&chain_marker, record.chain_id.to_string())
			.map_err(storage_error(&chain_marker))?;

		let path = self.record_path(network, &record.contract_name);
		let json = serde_json::to_string_pretty(record)?;
		std::fs::write(&path, json).map_err(storage_error(&path))?;

		debug!(path = %path.display(), contract = %record.contract_name, "Saved deployment record");
		Ok(path)
	}

	/// Read the record of `contract` on `network`
	///
	/// # Errors
	/// Returns [`Error::DeploymentNotFound`] if no record file exists
	pub fn load(&self, network: &str, contract: &str) -> Result<DeploymentRecord> {
		let path = self.record_path(network, contract);
		if !path.is_file() {
			return Err(Error::DeploymentNotFound {
				contract: contract.to_string(),
				network: network.to_string(),
			});
		}
		let content = std::fs::read_to_string(&path)?;
		Ok(serde_json::from_str(&content)?)
	}

	/// All records of a network, sorted by contract name
	pub fn list(&self, network: &str) -> Result<Vec<DeploymentRecord>> {
		let dir = self.network_dir(network);
		if !dir.is_dir() {
			return Ok(Vec::new());
		}

		let mut records = Vec::new();
		for entry in std::fs::read_dir(&dir)? {
			let path = entry?.path();
			if path.extension().and_then(|e| e.to_str()) != Some("json") {
				continue;
			}
			records.push(read_record(&path)?);
		}
		records.sort_by(|a, b| a.contract_name.cmp(&b.contract_name));
		Ok(records)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

fn storage_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
	move |source| Error::StorageError {
		path: path.to_path_buf(),
		source,
	}
}

fn read_record(path: &Path) -> Result<DeploymentRecord> {
	let content = std::fs::read_to_string(path)?;
	Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::contracts::ContractHandle;
	use std::sync::Arc;
	use tempfile::TempDir;

	fn deployed(name: &str, byte: u8) -> DeployedContract {
		DeployedContract {
			handle: ContractHandle::new(name, Address::repeat_byte(byte), Arc::new(JsonAbi::new())),
			transaction_hash: B256::repeat_byte(byte),
			block_number: Some(7),
			constructor_args: Bytes::from(vec![0u8; 32]),
		}
	}

	#[test]
	fn save_and_load_round_trip() {
		let dir = TempDir::new().unwrap();
		let store = DeploymentStore::new(dir.path());
		let record = DeploymentRecord::new(
			ChainId::Rinkeby,
			&deployed("Destaking", 0x11),
			vec!["CE STAKING".to_string()],
		);

		let path = store.save("rinkeby", &record).unwrap();
		assert!(path.ends_with("rinkeby/Destaking.json"));
		assert_eq!(
			std::fs::read_to_string(dir.path().join("rinkeby/.chainId")).unwrap(),
			"4"
		);

		let loaded = store.load("rinkeby", "Destaking").unwrap();
		assert_eq!(loaded, record);
	}

	#[test]
	fn list_is_sorted_and_skips_markers() {
		let dir = TempDir::new().unwrap();
		let store = DeploymentStore::new(dir.path());
		for (name, byte) in [("DestakingFarm", 4u8), ("DominationToken", 1), ("Destaking", 3)] {
			let record = DeploymentRecord::new(ChainId::Anvil, &deployed(name, byte), vec![]);
			store.save("localhost", &record).unwrap();
		}

		let names: Vec<_> = store
			.list("localhost")
			.unwrap()
			.into_iter()
			.map(|r| r.contract_name)
			.collect();
		assert_eq!(names, vec!["Destaking", "DestakingFarm", "DominationToken"]);
		assert!(store.list("mainnet").unwrap().is_empty());
	}

	#[test]
	fn write_failure_keeps_io_error() {
		let dir = TempDir::new().unwrap();
		let blocker = dir.path().join("not-a-dir");
		std::fs::write(&blocker, "").unwrap();
		let store = DeploymentStore::new(&blocker);
		let record = DeploymentRecord::new(ChainId::Anvil, &deployed("Destaking", 3), vec![]);

		let err = store.save("localhost", &record).unwrap_err();
		assert!(matches!(&err, Error::StorageError { path, .. } if path.ends_with("localhost")));
		assert!(std::error::Error::source(&err).is_some());
		assert!(err.to_string().contains("not-a-dir"));
	}

	#[test]
	fn missing_record_is_reported() {
		let dir = TempDir::new().unwrap();
		let store = DeploymentStore::new(dir.path());
		assert!(matches!(
			store.load("rinkeby", "Destaking"),
			Err(Error::DeploymentNotFound { .. })
		));
	}
}
