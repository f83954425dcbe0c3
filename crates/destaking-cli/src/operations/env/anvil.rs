//! Anvil process management
//!
//! Starts a local anvil node seeded with the standard test mnemonic, waits
//! for it to answer JSON-RPC, and kills it when the handle is dropped. The
//! scenario runs against such a node so every run starts from a fresh chain.

use crate::{
	constants::{anvil, anvil_accounts},
	types::error::{Error, Result},
};
use std::{
	net::TcpListener,
	process::{Child, Command, Stdio},
	time::Duration,
};
use tokio::time::sleep;
use tracing::{debug, info};

/// Command-line options for one anvil process
#[derive(Debug, Clone)]
pub struct AnvilOptions {
	pub port: u16,
	pub accounts: u32,
	pub balance: u64,
	pub mnemonic: String,
	pub chain_id: u64,
	/// Interval mining in seconds; `None` mines on every transaction
	pub block_time: Option<u64>,
}

impl Default for AnvilOptions {
	fn default() -> Self {
		Self {
			port: anvil::DEFAULT_PORT,
			accounts: anvil::ACCOUNTS,
			balance: anvil::BALANCE,
			mnemonic: anvil_accounts::MNEMONIC.to_string(),
			chain_id: anvil::CHAIN_ID,
			block_time: None,
		}
	}
}

impl AnvilOptions {
	/// Default options on a port nobody is listening on
	pub fn ephemeral() -> Result<Self> {
		Ok(Self {
			port: free_port()?,
			..Self::default()
		})
	}

	/// Command-line arguments for the `anvil` binary
	pub fn args(&self) -> Vec<String> {
		let mut args = vec![
			"--port".to_string(),
			self.port.to_string(),
			"--accounts".to_string(),
			self.accounts.to_string(),
			"--balance".to_string(),
			self.balance.to_string(),
			"--mnemonic".to_string(),
			self.mnemonic.clone(),
			"--chain-id".to_string(),
			self.chain_id.to_string(),
		];
		if let Some(block_time) = self.block_time {
			args.push("--block-time".to_string());
			args.push(block_time.to_string());
		}
		args
	}

	fn command(&self) -> Command {
		let mut cmd = Command::new("anvil");
		cmd.args(self.args())
			.stdout(Stdio::null())
			.stderr(Stdio::null());
		cmd
	}

	pub fn url(&self) -> String {
		format!("http://127.0.0.1:{}", self.port)
	}
}

/// A running anvil child process, killed on drop
#[derive(Debug)]
pub struct AnvilInstance {
	child: Child,
	options: AnvilOptions,
}

impl AnvilInstance {
	/// Start anvil and wait until it answers `eth_blockNumber`
	///
	/// # Arguments
	/// * `options` - Port, accounts and chain settings passed on the command line
	///
	/// # Returns
	/// The running instance; dropping it stops the process
	///
	/// # Errors
	/// Returns error if the binary cannot be started or the node does not
	/// become ready within the polling window
	pub async fn spawn(options: AnvilOptions) -> Result<Self> {
		info!(port = options.port, chain_id = options.chain_id, "Starting Anvil process");

		let child = options
			.command()
			.spawn()
			.map_err(|e| Error::AnvilStartFailed(format!("Failed to start anvil: {e}")))?;

		let instance = Self { child, options };
		instance.wait_ready().await?;

		info!(
			port = instance.options.port,
			pid = instance.child.id(),
			"Anvil process started successfully"
		);
		Ok(instance)
	}

	pub fn url(&self) -> String {
		self.options.url()
	}

	pub fn pid(&self) -> u32 {
		self.child.id()
	}

	pub fn options(&self) -> &AnvilOptions {
		&self.options
	}

	async fn wait_ready(&self) -> Result<()> {
		let url = self.url();
		for attempt in 0..anvil::READY_ATTEMPTS {
			if check_chain_ready(&url).await {
				debug!(url = %url, attempt = attempt, "Chain is ready and responding");
				return Ok(());
			}
			sleep(Duration::from_millis(anvil::READY_INTERVAL_MS)).await;
		}
		Err(Error::ChainNotReady(url))
	}
}

impl Drop for AnvilInstance {
	fn drop(&mut self) {
		debug!(pid = self.child.id(), "Stopping Anvil process");
		let _ = self.child.kill();
		let _ = self.child.wait();
	}
}

/// Whether a node at `url` answers a JSON-RPC request
pub async fn check_chain_ready(url: &str) -> bool {
	let response = reqwest::Client::new()
		.post(url)
		.json(&serde_json::json!({
			"jsonrpc": "2.0",
			"method": "eth_blockNumber",
			"params": [],
			"id": 1
		}))
		.send()
		.await;

	matches!(response, Ok(r) if r.status().is_success())
}

/// A TCP port free at the time of the call
pub fn free_port() -> Result<u16> {
	let listener = TcpListener::bind("127.0.0.1:0")?;
	Ok(listener.local_addr()?.port())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::testing::JsonRpcResponder;
	use wiremock::{matchers::method, Mock, MockServer};

	#[test]
	fn default_args_match_test_chain() {
		let args = AnvilOptions::default().args();
		assert_eq!(
			args,
			vec![
				"--port",
				"8545",
				"--accounts",
				"10",
				"--balance",
				"10000",
				"--mnemonic",
				anvil_accounts::MNEMONIC,
				"--chain-id",
				"31337",
			]
		);
	}

	#[test]
	fn block_time_is_optional() {
		let options = AnvilOptions {
			block_time: Some(2),
			..AnvilOptions::default()
		};
		let args = options.args();
		assert_eq!(&args[args.len() - 2..], ["--block-time", "2"]);
	}

	#[test]
	fn ephemeral_port_is_free() {
		let options = AnvilOptions::ephemeral().unwrap();
		assert_ne!(options.port, 0);
		assert!(TcpListener::bind(("127.0.0.1", options.port)).is_ok());
		assert_eq!(options.url(), format!("http://127.0.0.1:{}", options.port));
	}

	#[tokio::test]
	async fn readiness_follows_rpc_answers() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(JsonRpcResponder::new().with("eth_blockNumber", "0x0"))
			.mount(&server)
			.await;
		assert!(check_chain_ready(&server.uri()).await);

		let port = free_port().unwrap();
		assert!(!check_chain_ready(&format!("http://127.0.0.1:{port}")).await);
	}
}
