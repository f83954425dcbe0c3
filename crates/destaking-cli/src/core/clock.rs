//! Simulated chain clock control
//!
//! Test nodes (anvil, hardhat) let callers move block time forward. Advancing
//! is always followed by mining a block so the new timestamp is visible to
//! the next call.

use crate::{
	core::blockchain::Provider,
	types::error::{Error, Result},
};
use alloy_provider::Provider as AlloyProvider;
use destaking_types::SECONDS_PER_DAY;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Clock {
	provider: Provider,
}

impl Clock {
	pub fn new(provider: Provider) -> Self {
		Self { provider }
	}

	/// Advance block time by `seconds` and mine a block
	///
	/// # Arguments
	/// * `seconds` - Offset added to the node's clock
	///
	/// # Errors
	/// Returns error if the node does not support `evm_increaseTime` or
	/// `evm_mine`
	pub async fn increase(&self, seconds: u64) -> Result<()> {
		self.request("evm_increaseTime", (seconds,)).await?;
		self.mine().await?;
		debug!(seconds = seconds, "Advanced chain time");
		Ok(())
	}

	pub async fn increase_days(&self, days: u64) -> Result<()> {
		self.increase(days * SECONDS_PER_DAY).await
	}

	/// Mine one block
	pub async fn mine(&self) -> Result<()> {
		self.request("evm_mine", ()).await?;
		Ok(())
	}

	/// Timestamp of the latest block, in seconds
	pub async fn latest_timestamp(&self) -> Result<u64> {
		self.provider.latest_timestamp().await
	}

	async fn request<P>(&self, method: &'static str, params: P) -> Result<Value>
	where
		P: serde::Serialize + Clone + std::fmt::Debug + Send + Sync + Unpin,
	{
		self.provider
			.inner()
			.raw_request::<P, Value>(Cow::Borrowed(method), params)
			.await
			.map_err(|e| Error::RpcError(format!("{method} failed: {e}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::testing::{received_methods, JsonRpcResponder};
	use serde_json::json;
	use wiremock::{matchers::method, Mock, MockServer};

	async fn mock_node() -> MockServer {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(
				JsonRpcResponder::new()
					.with("eth_chainId", "0x7a69")
					.with("evm_increaseTime", 86400)
					.with("evm_mine", "0x0"),
			)
			.mount(&server)
			.await;
		server
	}

	#[tokio::test]
	async fn increase_advances_then_mines() {
		let server = mock_node().await;
		let provider = Provider::connect(&server.uri(), None).await.unwrap();
		Clock::new(provider).increase(86400).await.unwrap();

		let calls: Vec<_> = received_methods(&server)
			.await
			.into_iter()
			.filter(|(m, _)| m.starts_with("evm_"))
			.collect();
		assert_eq!(calls.len(), 2);
		assert_eq!(calls[0].0, "evm_increaseTime");
		assert_eq!(calls[0].1, json!([86400]));
		assert_eq!(calls[1].0, "evm_mine");
	}

	#[tokio::test]
	async fn increase_days_converts_to_seconds() {
		let server = mock_node().await;
		let provider = Provider::connect(&server.uri(), None).await.unwrap();
		Clock::new(provider).increase_days(34).await.unwrap();

		let calls = received_methods(&server).await;
		let (_, params) = calls
			.iter()
			.find(|(m, _)| m == "evm_increaseTime")
			.unwrap();
		assert_eq!(params, &json!([2_937_600]));
	}

	#[tokio::test]
	async fn rpc_errors_name_the_method() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(JsonRpcResponder::new().with("eth_chainId", "0x1"))
			.mount(&server)
			.await;

		let provider = Provider::connect(&server.uri(), None).await.unwrap();
		let err = Clock::new(provider).mine().await.unwrap_err();
		assert!(err.to_string().contains("evm_mine"));
	}
}
