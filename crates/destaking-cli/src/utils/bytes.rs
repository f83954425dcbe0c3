//! 32-byte value helpers for test fixtures and contract arguments.

use alloy_primitives::{hex, B256, U256};

/// 32 random bytes as `0x`-prefixed hex
pub fn random_bytes32() -> String {
	hex::encode_prefixed(B256::random())
}

/// `value` left-padded to 32 bytes, as `0x`-prefixed hex
pub fn bytes32(value: U256) -> String {
	hex::encode_prefixed(B256::from(value))
}
