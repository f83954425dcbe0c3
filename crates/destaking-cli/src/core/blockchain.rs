//! Blockchain provider and transaction management
//!
//! This module wraps an alloy provider bound to one RPC endpoint and, when a
//! signer is supplied, a wallet that signs every outgoing transaction. The
//! [`TxSender`] submits transactions and polls for their receipts so callers
//! only continue once a transaction is mined.

use crate::types::error::{Error, Result};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{DynProvider, Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::{BlockNumberOrTag, TransactionReceipt, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::RetryBackoffLayer;
use destaking_types::ChainId;
use std::time::Duration;
use tracing::debug;

/// How long to wait for receipts and how often to ask for them.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
	pub timeout: Duration,
	pub poll_interval: Duration,
}

impl Default for ReceiptPolicy {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs(120),
			poll_interval: Duration::from_secs(1),
		}
	}
}

impl ReceiptPolicy {
	pub fn new(timeout_seconds: u64, poll_interval_ms: u64) -> Self {
		Self {
			timeout: Duration::from_secs(timeout_seconds),
			poll_interval: Duration::from_millis(poll_interval_ms),
		}
	}
}

/// Blockchain provider wrapper with chain-specific configuration
///
/// Holds a type-erased alloy provider with retrying HTTP transport. When built
/// with a signer the provider carries a wallet filler, so transactions sent
/// through it are signed locally and never rely on node-managed accounts.
#[derive(Clone)]
pub struct Provider {
	inner: DynProvider,
	chain: ChainId,
	signer: Option<Address>,
	policy: ReceiptPolicy,
}

impl std::fmt::Debug for Provider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Provider")
			.field("chain", &self.chain)
			.field("signer", &self.signer)
			.field("inner", &"<DynProvider>")
			.finish()
	}
}

impl Provider {
	/// Connect to an RPC endpoint
	///
	/// Builds the provider, then queries the chain id to test the connection.
	///
	/// # Arguments
	/// * `rpc_url` - HTTP RPC endpoint
	/// * `signer` - Optional signer used for every transaction sent through
	///   this provider
	///
	/// # Errors
	/// Returns Error if the URL is invalid or the node does not answer
	pub async fn connect(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self> {
		let url: url::Url = rpc_url
			.parse()
			.map_err(|e| Error::InvalidRpcUrl(format!("{rpc_url}: {e}")))?;

		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry
			1000, // backoff in milliseconds
			10,   // compute units per second
		);
		let client = RpcClient::builder().layer(retry_layer).http(url);

		let signer_address = signer.as_ref().map(|s| s.address());
		let inner = match signer {
			Some(signer) => ProviderBuilder::new()
				.wallet(EthereumWallet::from(signer))
				.connect_client(client)
				.erased(),
			None => ProviderBuilder::new().connect_client(client).erased(),
		};

		let chain_id = inner
			.get_chain_id()
			.await
			.map_err(|e| Error::RpcError(format!("Failed to connect to {rpc_url}: {e}")))?;

		debug!(rpc_url = rpc_url, chain_id = chain_id, "Connected to node");

		Ok(Self {
			inner,
			chain: ChainId::from_u64(chain_id),
			signer: signer_address,
			policy: ReceiptPolicy::default(),
		})
	}

	/// Connect with a signer whose chain id is pinned to `expected_chain`,
	/// failing if the node reports a different chain.
	pub async fn connect_expecting(
		rpc_url: &str,
		signer: Option<PrivateKeySigner>,
		expected_chain: Option<u64>,
	) -> Result<Self> {
		let signer = signer.map(|s| s.with_chain_id(expected_chain));
		let provider = Self::connect(rpc_url, signer).await?;
		if let Some(expected) = expected_chain {
			if provider.chain.id() != expected {
				return Err(Error::ChainMismatch {
					expected,
					actual: provider.chain.id(),
				});
			}
		}
		Ok(provider)
	}

	pub fn with_policy(mut self, policy: ReceiptPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn chain(&self) -> ChainId {
		self.chain
	}

	/// Address of the signer attached to this provider, if any
	pub fn signer_address(&self) -> Option<Address> {
		self.signer
	}

	pub fn policy(&self) -> ReceiptPolicy {
		self.policy
	}

	/// Access underlying Alloy provider for raw RPC calls
	pub fn inner(&self) -> &DynProvider {
		&self.inner
	}

	/// Timestamp of the latest block, in seconds
	pub async fn latest_timestamp(&self) -> Result<u64> {
		let block = self
			.inner
			.get_block_by_number(BlockNumberOrTag::Latest)
			.await
			.map_err(|e| Error::RpcError(format!("Failed to get latest block: {e}")))?
			.ok_or_else(|| Error::RpcError("Node returned no latest block".to_string()))?;
		Ok(block.header.timestamp)
	}

	/// Execute a read-only call and return the raw return data
	pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
		let tx = TransactionRequest::default().to(to).input(data.into());
		self.inner
			.call(tx)
			.await
			.map_err(|e| Error::ContractCallFailed(format!("eth_call to {to} failed: {e}")))
	}
}

/// Transaction sender with receipt polling
///
/// Sends transactions through a [`Provider`] (whose wallet fills nonce, gas
/// and signature) and waits for the receipt according to the provider's
/// [`ReceiptPolicy`].
#[derive(Debug, Clone)]
pub struct TxSender {
	provider: Provider,
}

impl TxSender {
	pub fn new(provider: Provider) -> Self {
		Self { provider }
	}

	pub fn provider(&self) -> &Provider {
		&self.provider
	}

	/// Submit a transaction and return its hash
	///
	/// # Errors
	/// Returns Error if the provider has no signer or submission fails
	pub async fn send(&self, tx: TransactionRequest) -> Result<B256> {
		if self.provider.signer.is_none() {
			return Err(Error::MissingSigner);
		}

		let pending = self
			.provider
			.inner
			.send_transaction(tx)
			.await
			.map_err(|e| Error::RpcError(format!("Failed to send transaction: {e}")))?;

		Ok(*pending.tx_hash())
	}

	/// Poll for a transaction receipt until it appears or the policy's
	/// timeout elapses
	pub async fn wait(&self, hash: B256) -> Result<TransactionReceipt> {
		let policy = self.provider.policy;
		let deadline = tokio::time::Instant::now() + policy.timeout;

		loop {
			if let Some(receipt) = self
				.provider
				.inner
				.get_transaction_receipt(hash)
				.await
				.map_err(|e| Error::RpcError(format!("Failed to get receipt: {e}")))?
			{
				return Ok(receipt);
			}

			if tokio::time::Instant::now() >= deadline {
				return Err(Error::ReceiptTimeout(hash));
			}

			tokio::time::sleep(policy.poll_interval).await;
		}
	}

	/// Submit a transaction, wait for it to be mined and require success
	///
	/// # Errors
	/// Returns Error if submission fails, no receipt arrives in time or the
	/// transaction reverted
	pub async fn send_and_wait(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
		let hash = self.send(tx).await?;
		let receipt = self.wait(hash).await?;
		if !receipt.status() {
			return Err(Error::TransactionReverted(hash));
		}
		Ok(receipt)
	}
}
