//! JSON-RPC mock responder for wiremock-backed tests.

use alloy_primitives::{Address, B256};
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};
use wiremock::{Request, Respond, ResponseTemplate};

/// Answers JSON-RPC requests from a method -> result table, echoing the
/// request id. Unknown methods get a `-32601` error.
///
/// Methods registered with [`JsonRpcResponder::with_sequence`] answer with
/// the next result on every call and repeat the last one when exhausted.
#[derive(Clone, Default)]
pub struct JsonRpcResponder {
	results: HashMap<String, Value>,
	sequences: HashMap<String, Vec<Value>>,
	calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl JsonRpcResponder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, method: &str, result: impl Into<Value>) -> Self {
		self.results.insert(method.to_string(), result.into());
		self
	}

	pub fn with_sequence(mut self, method: &str, results: Vec<Value>) -> Self {
		self.sequences.insert(method.to_string(), results);
		self
	}

	fn next_in_sequence(&self, method: &str) -> Option<Value> {
		let sequence = self.sequences.get(method)?;
		let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
		let count = calls.entry(method.to_string()).or_default();
		let result = sequence.get(*count).or_else(|| sequence.last()).cloned();
		*count += 1;
		result
	}

	fn reply(&self, call: &Value) -> Value {
		let id = call.get("id").cloned().unwrap_or(Value::Null);
		let method = call.get("method").and_then(Value::as_str).unwrap_or_default();
		let result = self
			.next_in_sequence(method)
			.or_else(|| self.results.get(method).cloned());
		match result {
			Some(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
			None => json!({
				"jsonrpc": "2.0",
				"id": id,
				"error": { "code": -32601, "message": format!("method {method} not mocked") }
			}),
		}
	}
}

impl Respond for JsonRpcResponder {
	fn respond(&self, request: &Request) -> ResponseTemplate {
		let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
		let reply = match body {
			Value::Array(calls) => Value::Array(calls.iter().map(|c| self.reply(c)).collect()),
			call => self.reply(&call),
		};
		ResponseTemplate::new(200).set_body_json(reply)
	}
}

/// Methods of the JSON-RPC requests a mock server received, in order.
pub async fn received_methods(server: &wiremock::MockServer) -> Vec<(String, Value)> {
	server
		.received_requests()
		.await
		.unwrap_or_default()
		.iter()
		.filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
		.filter_map(|body| {
			let method = body.get("method")?.as_str()?.to_string();
			let params = body.get("params").cloned().unwrap_or(Value::Null);
			Some((method, params))
		})
		.collect()
}

/// Mined receipt; `contract` is the created address for creation
/// transactions. Reverted transactions never carry one.
pub fn mined_receipt(hash: B256, contract: Option<Address>, success: bool) -> Value {
	let status = if success { "0x1" } else { "0x0" };
	let contract_address = match contract {
		Some(address) if success => json!(address),
		_ => Value::Null,
	};
	json!({
		"type": "0x2",
		"status": status,
		"cumulativeGasUsed": "0x5208",
		"logs": [],
		"logsBloom": format!("0x{}", "0".repeat(512)),
		"transactionHash": hash,
		"transactionIndex": "0x0",
		"blockHash": B256::repeat_byte(0xbb),
		"blockNumber": "0x1",
		"gasUsed": "0x5208",
		"effectiveGasPrice": "0x3b9aca00",
		"from": Address::repeat_byte(0xf3),
		"to": null,
		"contractAddress": contract_address,
	})
}

/// Responder for a node that accepts signed transactions: fee, gas and nonce
/// queries succeed, and each `eth_sendRawTransaction` returns the next hash.
pub fn signing_node(hashes: &[B256], receipts: Vec<Value>) -> JsonRpcResponder {
	JsonRpcResponder::new()
		.with("eth_chainId", "0x7a69")
		.with("eth_getTransactionCount", "0x0")
		.with("eth_estimateGas", "0x100000")
		.with("eth_maxPriorityFeePerGas", "0x3b9aca00")
		.with("eth_gasPrice", "0x3b9aca00")
		.with(
			"eth_feeHistory",
			json!({
				"oldestBlock": "0x1",
				"baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
				"gasUsedRatio": [0.5],
				"reward": [["0x3b9aca00"]]
			}),
		)
		.with_sequence(
			"eth_sendRawTransaction",
			hashes.iter().map(|h| json!(h)).collect(),
		)
		.with_sequence("eth_getTransactionReceipt", receipts)
}
