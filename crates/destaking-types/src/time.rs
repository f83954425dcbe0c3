//! Time units used when computing on-chain schedules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Unit in which schedule timestamps are handed to contract constructors.
///
/// The production deployment passes millisecond timestamps; `Seconds` is
/// available for contracts that compare against `block.timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
	#[default]
	Milliseconds,
	Seconds,
}

impl TimestampUnit {
	/// Length of `days` days expressed in this unit.
	pub fn days(&self, days: u64) -> u64 {
		let seconds = days * SECONDS_PER_DAY;
		match self {
			Self::Milliseconds => seconds * 1_000,
			Self::Seconds => seconds,
		}
	}

	/// Convert a millisecond Unix timestamp into this unit.
	pub fn from_millis(&self, millis: u64) -> u64 {
		match self {
			Self::Milliseconds => millis,
			Self::Seconds => millis / 1_000,
		}
	}
}

impl fmt::Display for TimestampUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Milliseconds => f.write_str("milliseconds"),
			Self::Seconds => f.write_str("seconds"),
		}
	}
}

impl FromStr for TimestampUnit {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"ms" | "millis" | "milliseconds" => Ok(Self::Milliseconds),
			"s" | "secs" | "seconds" => Ok(Self::Seconds),
			other => Err(format!("unknown timestamp unit: {other}")),
		}
	}
}
