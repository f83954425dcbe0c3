//! Signer construction from mnemonics and private keys.

use crate::types::error::{Error, Result};
use alloy_primitives::Address;
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use destaking_config::AccountConfig;
use std::str::FromStr;

/// Derive the signer at `m/44'/60'/0'/0/{index}` from a BIP-39 phrase.
pub fn from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKeySigner> {
	MnemonicBuilder::<English>::default()
		.phrase(phrase.trim())
		.index(index)
		.map_err(|e| Error::InvalidMnemonic(e.to_string()))?
		.build()
		.map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

pub fn from_private_key(key: &str) -> Result<PrivateKeySigner> {
	PrivateKeySigner::from_str(key.trim()).map_err(|e| Error::InvalidPrivateKey(e.to_string()))
}

/// Build the deployment signer from the account section.
///
/// The mnemonic takes precedence over the private key. When the account
/// names an expected address, the derived signer must match it.
pub fn from_account(account: &AccountConfig) -> Result<PrivateKeySigner> {
	let signer = if let Some(mnemonic) = &account.mnemonic {
		mnemonic.with_exposed(|phrase| from_mnemonic(phrase, account.derivation_index))?
	} else if let Some(key) = &account.private_key {
		key.with_exposed(from_private_key)?
	} else {
		return Err(Error::MissingSigner);
	};

	if let Some(expected) = &account.address {
		check_address(signer.address(), expected)?;
	}

	Ok(signer)
}

/// The first `count` signers of a mnemonic, as the scenario's stakers.
pub fn derive_accounts(phrase: &str, count: u32) -> Result<Vec<PrivateKeySigner>> {
	(0..count).map(|index| from_mnemonic(phrase, index)).collect()
}

fn check_address(actual: Address, expected: &str) -> Result<()> {
	let parsed = Address::from_str(expected.trim()).map_err(|_| Error::AddressMismatch {
		expected: expected.to_string(),
		actual,
	})?;
	if parsed != actual {
		return Err(Error::AddressMismatch {
			expected: expected.to_string(),
			actual,
		});
	}
	Ok(())
}
