//! Typed wrappers over the scenario's contract handles
//!
//! Sends go through the caller's [`TxSender`], so the same wrapper serves
//! every staker; reads go through any provider.

use crate::{
	core::{
		blockchain::{Provider, TxSender},
		contracts::ContractHandle,
	},
	types::error::{Error, Result},
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, U256};

fn uint(value: u64) -> DynSolValue {
	DynSolValue::Uint(U256::from(value), 256)
}

/// Mintable ERC-20 used for both DOM and LP
#[derive(Debug, Clone)]
pub struct MockToken {
	handle: ContractHandle,
}

impl MockToken {
	pub fn new(handle: ContractHandle) -> Self {
		Self { handle }
	}

	pub fn address(&self) -> Address {
		self.handle.address()
	}

	/// Mint `amount` to the sender
	///
	/// # Arguments
	/// * `sender` - Staker whose account receives the tokens
	/// * `amount` - Token amount, in base units
	pub async fn mint(&self, sender: &TxSender, amount: u64) -> Result<()> {
		self.handle.send(sender, "mint", &[uint(amount)]).await?;
		Ok(())
	}

	/// Allow `spender` to move `amount` of the sender's tokens
	///
	/// # Arguments
	/// * `sender` - Token owner
	/// * `spender` - Usually the staking contract
	/// * `amount` - Allowance, in base units
	pub async fn approve(&self, sender: &TxSender, spender: Address, amount: u64) -> Result<()> {
		self.handle
			.send(sender, "approve", &[DynSolValue::Address(spender), uint(amount)])
			.await?;
		Ok(())
	}

	pub async fn transfer(&self, sender: &TxSender, to: Address, amount: u64) -> Result<()> {
		self.handle
			.send(sender, "transfer", &[DynSolValue::Address(to), uint(amount)])
			.await?;
		Ok(())
	}

	/// Current balance of `owner`
	pub async fn balance_of(&self, provider: &Provider, owner: Address) -> Result<U256> {
		self.handle
			.call_uint(provider, "balanceOf", &[DynSolValue::Address(owner)])
			.await
	}
}

/// The LP staking contract exercised by the scenario
#[derive(Debug, Clone)]
pub struct StakingPool {
	handle: ContractHandle,
}

impl StakingPool {
	pub fn new(handle: ContractHandle) -> Self {
		Self { handle }
	}

	pub fn address(&self) -> Address {
		self.handle.address()
	}

	pub async fn initialize(&self, sender: &TxSender) -> Result<()> {
		self.handle.send(sender, "initialize", &[]).await?;
		Ok(())
	}

	pub async fn stake(&self, sender: &TxSender, amount: u64) -> Result<()> {
		self.handle.send(sender, "stake", &[uint(amount)]).await?;
		Ok(())
	}

	/// Stake `amount` of the sender's LP on behalf of `staker`
	///
	/// # Arguments
	/// * `sender` - Account paying the LP
	/// * `staker` - Account credited with the stake
	/// * `amount` - LP amount
	pub async fn stake_for(&self, sender: &TxSender, staker: Address, amount: u64) -> Result<()> {
		self.handle
			.send(sender, "stakeFor", &[DynSolValue::Address(staker), uint(amount)])
			.await?;
		Ok(())
	}

	pub async fn unstake(&self, sender: &TxSender, amount: u64) -> Result<()> {
		self.handle.send(sender, "unstake", &[uint(amount)]).await?;
		Ok(())
	}

	/// Return undistributed rewards to the owner
	pub async fn withdraw_leftover(&self, sender: &TxSender) -> Result<()> {
		self.handle.send(sender, "withdrawLeftover", &[]).await?;
		Ok(())
	}

	pub async fn total_staked(&self, provider: &Provider) -> Result<U256> {
		self.handle.call_uint(provider, "totalStaked", &[]).await
	}

	pub async fn total_staked_for(&self, provider: &Provider, staker: Address) -> Result<U256> {
		self.handle
			.call_uint(provider, "totalStakedFor", &[DynSolValue::Address(staker)])
			.await
	}

	pub async fn remaining_dom(&self, provider: &Provider) -> Result<U256> {
		self.handle.call_uint(provider, "remainingDOM", &[]).await
	}

	/// The first `count` fields of `Info(staker)` as unsigned integers
	///
	/// # Arguments
	/// * `provider` - Provider used for the read
	/// * `staker` - Address whose stake info is read
	/// * `count` - Number of leading fields to convert; later fields may have
	///   any type
	///
	/// # Errors
	/// Returns error if the call fails or one of the leading fields is
	/// missing or not an integer
	pub async fn info(&self, provider: &Provider, staker: Address, count: usize) -> Result<Vec<U256>> {
		let outputs = self
			.handle
			.call(provider, "Info", &[DynSolValue::Address(staker)])
			.await?;
		leading_uints(outputs, count)
	}
}

/// Convert the first `count` decoded outputs (a bare list or a single
/// struct) into integers
fn leading_uints(outputs: Vec<DynSolValue>, count: usize) -> Result<Vec<U256>> {
	let values = match outputs.as_slice() {
		[DynSolValue::Tuple(fields)] => fields.clone(),
		_ => outputs,
	};
	if values.len() < count {
		return Err(Error::ContractCallFailed(format!(
			"Info returned {} fields, expected at least {count}",
			values.len()
		)));
	}
	values[..count]
		.iter()
		.enumerate()
		.map(|(i, value)| {
			value.as_uint().map(|(v, _)| v).ok_or_else(|| {
				Error::ContractCallFailed(format!("Info field {i} is not an integer: {value:?}"))
			})
		})
		.collect()
}
