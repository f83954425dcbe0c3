//! Chain identifiers for the networks the harness deploys to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an EVM network.
///
/// Known networks get their own variant so they can be named in terminal
/// output and deployment directories; anything else is carried as
/// [`ChainId::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum ChainId {
	Mainnet,
	Rinkeby,
	Sepolia,
	Anvil,
	Custom(u64),
}

impl ChainId {
	pub fn from_u64(id: u64) -> Self {
		match id {
			1 => Self::Mainnet,
			4 => Self::Rinkeby,
			11155111 => Self::Sepolia,
			31337 => Self::Anvil,
			id => Self::Custom(id),
		}
	}

	pub fn id(&self) -> u64 {
		match self {
			Self::Mainnet => 1,
			Self::Rinkeby => 4,
			Self::Sepolia => 11155111,
			Self::Anvil => 31337,
			Self::Custom(id) => *id,
		}
	}

	/// Lower-case network name, used for deployment record directories.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Mainnet => "mainnet",
			Self::Rinkeby => "rinkeby",
			Self::Sepolia => "sepolia",
			Self::Anvil => "localhost",
			Self::Custom(_) => "custom",
		}
	}

	/// Whether the chain is a local development node.
	pub fn is_local(&self) -> bool {
		matches!(self, Self::Anvil)
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.id(), self.name())
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		Self::from_u64(id)
	}
}

impl From<ChainId> for u64 {
	fn from(chain: ChainId) -> Self {
		chain.id()
	}
}
