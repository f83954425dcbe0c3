//! Smart contract interaction driven by artifact ABIs
//!
//! Contracts are addressed by method name: call data is encoded from the ABI
//! loaded with the contract's artifact, and return data is decoded the same
//! way. Constructor arguments are given as strings and coerced into the types
//! the ABI declares, which keeps deployment parameters readable in config
//! files and terminal output.

use crate::{
	core::blockchain::{Provider, TxSender},
	types::error::{Error, Result},
};
use alloy_dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use destaking_types::ContractArtifact;
use std::sync::Arc;
use tracing::debug;

/// A deployed contract: address plus the ABI used to talk to it
#[derive(Debug, Clone)]
pub struct ContractHandle {
	name: String,
	address: Address,
	abi: Arc<JsonAbi>,
}

impl ContractHandle {
	pub fn new(name: impl Into<String>, address: Address, abi: Arc<JsonAbi>) -> Self {
		Self {
			name: name.into(),
			address,
			abi,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn address(&self) -> Address {
		self.address
	}

	pub fn abi(&self) -> &JsonAbi {
		&self.abi
	}

	fn function(&self, method: &str) -> Result<&Function> {
		self.abi
			.function(method)
			.and_then(|overloads| overloads.first())
			.ok_or_else(|| {
				Error::InvalidAbi(format!("Function {method} not found in {} ABI", self.name))
			})
	}

	/// Encode call data (selector plus arguments) for `method`
	pub fn encode_call(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes> {
		let function = self.function(method)?;
		function
			.abi_encode_input(args)
			.map(Bytes::from)
			.map_err(|e| Error::InvalidAbi(format!("Failed to encode {}.{method}: {e}", self.name)))
	}

	/// Execute a read-only call and decode its outputs
	pub async fn call(
		&self,
		provider: &Provider,
		method: &str,
		args: &[DynSolValue],
	) -> Result<Vec<DynSolValue>> {
		let data = self.encode_call(method, args)?;
		let output = provider.call(self.address, data).await?;
		self.function(method)?
			.abi_decode_output(&output)
			.map_err(|e| {
				Error::ContractCallFailed(format!("Failed to decode {}.{method}: {e}", self.name))
			})
	}

	/// Execute a read-only call whose first output is an unsigned integer
	pub async fn call_uint(
		&self,
		provider: &Provider,
		method: &str,
		args: &[DynSolValue],
	) -> Result<U256> {
		let outputs = self.call(provider, method, args).await?;
		outputs
			.first()
			.and_then(DynSolValue::as_uint)
			.map(|(value, _)| value)
			.ok_or_else(|| {
				Error::ContractCallFailed(format!(
					"{}.{method} did not return an unsigned integer",
					self.name
				))
			})
	}

	/// Send a state-changing transaction and wait for it to be mined
	pub async fn send(
		&self,
		sender: &TxSender,
		method: &str,
		args: &[DynSolValue],
	) -> Result<TransactionReceipt> {
		let data = self.encode_call(method, args)?;
		let tx = TransactionRequest::default()
			.to(self.address)
			.input(data.into());

		debug!(contract = %self.name, method = method, "Sending contract transaction");
		let receipt = sender.send_and_wait(tx).await?;
		debug!(
			contract = %self.name,
			method = method,
			tx_hash = %receipt.transaction_hash,
			"Contract transaction mined"
		);
		Ok(receipt)
	}
}

/// Coerce string constructor arguments into the artifact's declared
/// parameter types and ABI-encode them (without the bytecode).
pub fn encode_constructor_args(artifact: &ContractArtifact, args: &[String]) -> Result<Bytes> {
	let invalid = |reason: String| Error::InvalidConstructorArgs {
		contract: artifact.name.clone(),
		reason,
	};

	let Some(constructor) = artifact.abi.constructor() else {
		if args.is_empty() {
			return Ok(Bytes::new());
		}
		return Err(invalid(format!(
			"ABI has no constructor but {} arguments were given",
			args.len()
		)));
	};

	if constructor.inputs.len() != args.len() {
		return Err(invalid(format!(
			"expected {} arguments, got {}",
			constructor.inputs.len(),
			args.len()
		)));
	}

	let values = constructor
		.inputs
		.iter()
		.zip(args)
		.map(|(param, raw)| {
			let ty: DynSolType = param
				.resolve()
				.map_err(|e| invalid(format!("unsupported type {}: {e}", param.ty)))?;
			ty.coerce_str(raw)
				.map_err(|e| invalid(format!("{} = {raw:?} is not a valid {}: {e}", param.name, param.ty)))
		})
		.collect::<Result<Vec<_>>>()?;

	constructor
		.abi_encode_input(&values)
		.map(Bytes::from)
		.map_err(|e| invalid(e.to_string()))
}

/// Creation bytecode followed by the encoded constructor arguments
pub fn init_code(artifact: &ContractArtifact, encoded_args: &Bytes) -> Bytes {
	let mut code = artifact.bytecode.to_vec();
	code.extend_from_slice(encoded_args);
	Bytes::from(code)
}

/// Outcome of a contract creation transaction
#[derive(Debug, Clone)]
pub struct DeployedContract {
	pub handle: ContractHandle,
	pub transaction_hash: B256,
	pub block_number: Option<u64>,
	pub constructor_args: Bytes,
}

/// Deploy an artifact and wait for the creation transaction to be mined
///
/// # Errors
/// Returns Error if the arguments do not fit the constructor, the
/// transaction fails, or the receipt carries no contract address
pub async fn deploy(
	sender: &TxSender,
	artifact: &ContractArtifact,
	args: &[String],
) -> Result<DeployedContract> {
	let constructor_args = encode_constructor_args(artifact, args)?;
	let tx = TransactionRequest::default().with_deploy_code(init_code(artifact, &constructor_args));

	let receipt = sender.send_and_wait(tx).await?;
	let address = receipt.contract_address.ok_or_else(|| {
		Error::DeploymentFailed(format!("No contract address in receipt for {}", artifact.name))
	})?;

	debug!(
		contract = %artifact.name,
		address = %address,
		tx_hash = %receipt.transaction_hash,
		"Creation transaction mined"
	);

	Ok(DeployedContract {
		handle: ContractHandle::new(&artifact.name, address, artifact.abi.clone()),
		transaction_hash: receipt.transaction_hash,
		block_number: receipt.block_number,
		constructor_args,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_dyn_abi::DynSolValue;
	use serde_json::json;

	fn staking_artifact() -> ContractArtifact {
		let json = json!({
			"abi": [
				{
					"type": "constructor",
					"stateMutability": "nonpayable",
					"inputs": [
						{ "name": "name_", "type": "string" },
						{ "name": "token_", "type": "address" },
						{ "name": "start_", "type": "uint256" },
						{ "name": "rewardTotal_", "type": "uint256" }
					]
				},
				{
					"type": "function",
					"name": "totalStakedFor",
					"stateMutability": "view",
					"inputs": [{ "name": "addr", "type": "address" }],
					"outputs": [{ "name": "", "type": "uint256" }]
				}
			],
			"bytecode": "0x6080"
		});
		ContractArtifact::from_json("Destaking", &json).unwrap()
	}

	#[test]
	fn constructor_args_follow_abi_types() {
		let artifact = staking_artifact();
		let token = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
		let args = vec![
			"CE STAKING".to_string(),
			token.to_string(),
			"1700000000000".to_string(),
			"33171875000000000000000000".to_string(),
		];
		let encoded = encode_constructor_args(&artifact, &args).unwrap();

		let expected = DynSolValue::Tuple(vec![
			DynSolValue::String("CE STAKING".to_string()),
			DynSolValue::Address(token.parse().unwrap()),
			DynSolValue::Uint(U256::from(1_700_000_000_000u64), 256),
			DynSolValue::Uint(U256::from_str_radix("33171875000000000000000000", 10).unwrap(), 256),
		])
		.abi_encode_params();
		assert_eq!(encoded.as_ref(), expected.as_slice());

		let code = init_code(&artifact, &encoded);
		assert_eq!(&code[..2], &[0x60, 0x80]);
		assert_eq!(code.len(), 2 + encoded.len());
	}

	#[test]
	fn constructor_arity_and_types_are_checked() {
		let artifact = staking_artifact();
		let too_few = encode_constructor_args(&artifact, &["CE STAKING".to_string()]);
		assert!(matches!(too_few, Err(Error::InvalidConstructorArgs { .. })));

		let bad_address = encode_constructor_args(
			&artifact,
			&[
				"CE STAKING".to_string(),
				"not-an-address".to_string(),
				"1".to_string(),
				"2".to_string(),
			],
		);
		assert!(matches!(bad_address, Err(Error::InvalidConstructorArgs { .. })));
	}

	#[test]
	fn contract_without_constructor_takes_no_args() {
		let artifact =
			ContractArtifact::from_json("DominationToken", &json!({ "abi": [], "bytecode": "0x00" }))
				.unwrap();
		assert!(encode_constructor_args(&artifact, &[]).unwrap().is_empty());
		assert!(encode_constructor_args(&artifact, &["x".to_string()]).is_err());
	}

	#[test]
	fn call_data_starts_with_selector() {
		let artifact = staking_artifact();
		let handle = ContractHandle::new("Destaking", Address::ZERO, artifact.abi.clone());
		let carl: Address = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse().unwrap();
		let data = handle
			.encode_call("totalStakedFor", &[DynSolValue::Address(carl)])
			.unwrap();

		let function = artifact.abi.function("totalStakedFor").unwrap()[0].clone();
		assert_eq!(&data[..4], function.selector().as_slice());
		assert_eq!(data.len(), 4 + 32);
		assert!(handle.encode_call("unknown", &[]).is_err());
	}
}
