//! Phase boundaries passed to the staking constructors.

use destaking_types::TimestampUnit;

/// Day offsets of the three boundaries after the start time.
pub const PHASE_OFFSET_DAYS: [u64; 3] = [1, 2, 3];

/// Start time plus the 1, 2 and 3 day boundaries, in one unit.
///
/// The start is read from the wall clock once, so all four values share the
/// same origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploySchedule {
	pub unit: TimestampUnit,
	pub start: u64,
}

impl DeploySchedule {
	/// Schedule starting at a millisecond Unix timestamp.
	pub fn from_millis(millis: u64, unit: TimestampUnit) -> Self {
		Self {
			unit,
			start: unit.from_millis(millis),
		}
	}

	/// Schedule starting now.
	pub fn now(unit: TimestampUnit) -> Self {
		let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
		Self::from_millis(millis, unit)
	}

	/// `[start, start + 1d, start + 2d, start + 3d]`
	pub fn boundaries(&self) -> [u64; 4] {
		let [a, b, c] = PHASE_OFFSET_DAYS.map(|days| self.start + self.unit.days(days));
		[self.start, a, b, c]
	}

	/// Boundaries as decimal strings, ready for constructor coercion.
	pub fn as_args(&self) -> Vec<String> {
		self.boundaries().iter().map(u64::to_string).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn millisecond_schedule_matches_day_offsets() {
		let schedule = DeploySchedule::from_millis(1_650_000_000_000, TimestampUnit::Milliseconds);
		assert_eq!(
			schedule.boundaries(),
			[
				1_650_000_000_000,
				1_650_086_400_000,
				1_650_172_800_000,
				1_650_259_200_000
			]
		);
	}

	#[test]
	fn second_schedule_truncates_start() {
		let schedule = DeploySchedule::from_millis(1_650_000_000_750, TimestampUnit::Seconds);
		let b = schedule.boundaries();
		assert_eq!(b[0], 1_650_000_000);
		for pair in b.windows(2) {
			assert_eq!(pair[1] - pair[0], 86_400);
		}
	}

	#[test]
	fn args_are_decimal_strings() {
		let schedule = DeploySchedule::from_millis(1_000, TimestampUnit::Milliseconds);
		assert_eq!(
			schedule.as_args(),
			vec!["1000", "86401000", "172801000", "259201000"]
		);
	}

	#[test]
	fn now_is_recent() {
		let schedule = DeploySchedule::now(TimestampUnit::Seconds);
		// 2020-01-01
		assert!(schedule.start > 1_577_836_800);
	}
}
