//! Etherscan source verification client
//!
//! Submits single-file Solidity sources through the `verifysourcecode`
//! endpoint and polls `checkverifystatus` until Etherscan reports a result.

use crate::types::error::{Error, Result};
use alloy_primitives::{hex, Address, Bytes};
use destaking_types::SecretString;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Everything Etherscan needs to rebuild and compare one contract
#[derive(Debug, Clone)]
pub struct VerificationRequest {
	pub address: Address,
	pub contract_name: String,
	pub source_code: String,
	/// Full compiler version, e.g. `v0.8.5+commit.a4f2e591`
	pub compiler_version: String,
	pub optimizer_runs: Option<u32>,
	/// ABI-encoded constructor arguments
	pub constructor_args: Bytes,
	pub license_type: u8,
}

impl VerificationRequest {
	fn form(&self, api_key: &str) -> Vec<(&'static str, String)> {
		vec![
			("apikey", api_key.to_string()),
			("module", "contract".to_string()),
			("action", "verifysourcecode".to_string()),
			("contractaddress", self.address.to_string()),
			("sourceCode", self.source_code.clone()),
			("codeformat", "solidity-single-file".to_string()),
			("contractname", self.contract_name.clone()),
			("compilerversion", self.compiler_version.clone()),
			(
				"optimizationUsed",
				u8::from(self.optimizer_runs.is_some()).to_string(),
			),
			("runs", self.optimizer_runs.unwrap_or(200).to_string()),
			// Parameter name as spelled by the Etherscan API.
			("constructorArguements", hex::encode(&self.constructor_args)),
			("licenseType", self.license_type.to_string()),
		]
	}
}

/// Outcome of a `verifysourcecode` submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
	/// Queued for checking under this GUID
	Queued(String),
	AlreadyVerified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
	Pending,
	Verified,
	Failed(String),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
	status: String,
	#[serde(default)]
	message: String,
	#[serde(default)]
	result: String,
}

impl ApiResponse {
	fn is_ok(&self) -> bool {
		self.status == "1"
	}
}

#[derive(Debug, Clone)]
pub struct EtherscanClient {
	client: Client,
	api_url: String,
	api_key: SecretString,
}

impl EtherscanClient {
	/// # Errors
	/// Returns error if HTTP client construction fails
	pub fn new(api_url: &str, api_key: SecretString) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
		Ok(Self {
			client,
			api_url: api_url.to_string(),
			api_key,
		})
	}

	/// Submit a source for verification
	///
	/// # Arguments
	/// * `request` - Contract address, source and compiler settings
	///
	/// # Returns
	/// The GUID to poll, or [`Submission::AlreadyVerified`] when Etherscan
	/// already holds a matching source for the address
	pub async fn submit(&self, request: &VerificationRequest) -> Result<Submission> {
		let form = self.api_key.with_exposed(|key| request.form(key));
		debug!(
			contract = %request.contract_name,
			address = %request.address,
			"Submitting source for verification"
		);

		let response = self.client.post(&self.api_url).form(&form).send().await?;
		let body = Self::parse(response).await?;
		if body.is_ok() {
			return Ok(Submission::Queued(body.result));
		}
		if body.result.to_lowercase().contains("already verified") {
			return Ok(Submission::AlreadyVerified);
		}
		Err(Error::Etherscan(format!("{}: {}", body.message, body.result)))
	}

	pub async fn check_status(&self, guid: &str) -> Result<VerificationStatus> {
		let response = self
			.api_key
			.with_exposed(|key| {
				self.client.get(&self.api_url).query(&[
					("apikey", key),
					("module", "contract"),
					("action", "checkverifystatus"),
					("guid", guid),
				])
			})
			.send()
			.await?;
		let body = Self::parse(response).await?;
		Ok(status_from(&body))
	}

	/// Poll the status of `guid` until it is no longer pending
	///
	/// # Errors
	/// Returns error if verification fails or is still pending after
	/// `attempts` polls
	pub async fn wait_for_verification(
		&self,
		guid: &str,
		attempts: u32,
		interval: Duration,
	) -> Result<()> {
		for attempt in 1..=attempts {
			match self.check_status(guid).await? {
				VerificationStatus::Verified => return Ok(()),
				VerificationStatus::Failed(reason) => return Err(Error::VerificationFailed(reason)),
				VerificationStatus::Pending => {
					debug!(guid = guid, attempt = attempt, "Verification pending");
					if attempt < attempts {
						sleep(interval).await;
					}
				},
			}
		}
		Err(Error::VerificationFailed(format!(
			"still pending after {attempts} checks (guid {guid})"
		)))
	}

	async fn parse(response: Response) -> Result<ApiResponse> {
		if !response.status().is_success() {
			let status = response.status();
			let text = response
				.text()
				.await
				.unwrap_or_else(|_| "Unknown error".to_string());
			return Err(Error::Etherscan(format!("{status}: {text}")));
		}
		response
			.json::<ApiResponse>()
			.await
			.map_err(|e| Error::Etherscan(format!("Invalid response: {e}")))
	}
}

fn status_from(body: &ApiResponse) -> VerificationStatus {
	let result = body.result.to_lowercase();
	if result.contains("pending") {
		VerificationStatus::Pending
	} else if body.is_ok() || result.contains("already verified") {
		VerificationStatus::Verified
	} else {
		VerificationStatus::Failed(body.result.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_string_contains, method, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn request() -> VerificationRequest {
		VerificationRequest {
			address: Address::repeat_byte(0x11),
			contract_name: "Destaking".to_string(),
			source_code: "pragma solidity 0.8.5;".to_string(),
			compiler_version: "v0.8.5+commit.a4f2e591".to_string(),
			optimizer_runs: None,
			constructor_args: Bytes::from(vec![0xab, 0xcd]),
			license_type: 3,
		}
	}

	fn client(server: &MockServer) -> EtherscanClient {
		EtherscanClient::new(&server.uri(), SecretString::from("test-key")).unwrap()
	}

	#[test]
	fn form_carries_unprefixed_constructor_args() {
		let form = request().form("k");
		let get = |name: &str| {
			form.iter()
				.find(|(key, _)| *key == name)
				.map(|(_, value)| value.clone())
				.unwrap()
		};
		assert_eq!(get("constructorArguements"), "abcd");
		assert_eq!(get("optimizationUsed"), "0");
		assert_eq!(get("codeformat"), "solidity-single-file");
		assert_eq!(get("apikey"), "k");
	}

	#[tokio::test]
	async fn submit_returns_guid() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(body_string_contains("action=verifysourcecode"))
			.and(body_string_contains("contractname=Destaking"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "1",
				"message": "OK",
				"result": "guid-123"
			})))
			.expect(1)
			.mount(&server)
			.await;

		let submission = client(&server).submit(&request()).await.unwrap();
		assert_eq!(submission, Submission::Queued("guid-123".to_string()));
	}

	#[tokio::test]
	async fn resubmitting_verified_source_succeeds() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Contract source code already verified"
			})))
			.mount(&server)
			.await;

		let submission = client(&server).submit(&request()).await.unwrap();
		assert_eq!(submission, Submission::AlreadyVerified);
	}

	#[tokio::test]
	async fn submit_surfaces_api_errors() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Invalid API Key"
			})))
			.mount(&server)
			.await;

		let err = client(&server).submit(&request()).await.unwrap_err();
		assert!(matches!(err, Error::Etherscan(msg) if msg.contains("Invalid API Key")));
	}

	#[tokio::test]
	async fn waits_through_pending_status() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(query_param("action", "checkverifystatus"))
			.and(query_param("guid", "guid-123"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Pending in queue"
			})))
			.up_to_n_times(2)
			.with_priority(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(query_param("action", "checkverifystatus"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "1",
				"message": "OK",
				"result": "Pass - Verified"
			})))
			.mount(&server)
			.await;

		client(&server)
			.wait_for_verification("guid-123", 5, Duration::from_millis(1))
			.await
			.unwrap();
		assert_eq!(server.received_requests().await.unwrap().len(), 3);
	}

	#[tokio::test]
	async fn failed_verification_is_an_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Fail - Unable to verify"
			})))
			.mount(&server)
			.await;

		let result = client(&server)
			.wait_for_verification("guid-123", 3, Duration::from_millis(1))
			.await;
		assert!(matches!(result, Err(Error::VerificationFailed(reason)) if reason.contains("Unable")));
	}

	#[tokio::test]
	async fn pending_forever_gives_up() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"status": "0",
				"message": "NOTOK",
				"result": "Pending in queue"
			})))
			.mount(&server)
			.await;

		let result = client(&server)
			.wait_for_verification("guid-123", 2, Duration::from_millis(1))
			.await;
		assert!(matches!(result, Err(Error::VerificationFailed(_))));
		assert_eq!(server.received_requests().await.unwrap().len(), 2);
	}
}
