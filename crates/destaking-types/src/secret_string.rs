//! Secret string wrapper for mnemonics, private keys and API keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// A string whose contents never show up in `Debug` or `Display` output and
/// are wiped from memory on drop.
///
/// Serializing a `SecretString` writes a redacted marker, so a config dump
/// cannot leak the value.
#[derive(Clone, Default)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	pub fn new(value: impl Into<String>) -> Self {
		Self(Zeroizing::new(value.into()))
	}

	/// Borrow the secret value.
	pub fn expose_secret(&self) -> &str {
		self.0.as_str()
	}

	/// Run a closure with the secret value, keeping the borrow scoped.
	pub fn with_exposed<T>(&self, f: impl FnOnce(&str) -> T) -> T {
		f(self.0.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.expose_secret() == other.expose_secret()
	}
}

impl Serialize for SecretString {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str("[REDACTED]")
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(Self::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_and_display_are_redacted() {
		let secret = SecretString::from("test test test junk");
		assert_eq!(format!("{secret:?}"), "SecretString([REDACTED])");
		assert_eq!(secret.to_string(), "[REDACTED]");
		assert_eq!(secret.expose_secret(), "test test test junk");
	}

	#[test]
	fn test_serialize_never_writes_value() {
		let secret = SecretString::from("0xdeadbeef");
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, "\"[REDACTED]\"");
	}

	#[test]
	fn test_deserialize_and_expose() {
		let secret: SecretString = serde_json::from_str("\"abc\"").unwrap();
		let len = secret.with_exposed(|s| s.len());
		assert_eq!(len, 3);
		assert!(SecretString::from("   ").is_empty());
	}
}
