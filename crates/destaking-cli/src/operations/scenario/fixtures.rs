//! Amounts, delays and expected balances of the staking scenario.

/// LP minted to and approved by each staker
pub const LP_SEED: u64 = 100;
/// DOM minted by alice and moved into the staking contract
pub const DOM_SEED: u64 = 1000;
/// Reward pool size passed to the staking constructor
pub const TOTAL_DOM: u64 = 300;
/// Long-stake period: `lspExpiration` is this far after the chain's clock
pub const LSP_PERIOD_DAYS: u64 = 150;

pub const FIRST_STAKE_DELAY_DAYS: u64 = 1;
pub const ALICE_STAKE: u64 = 30;
pub const SECOND_STAKE_DELAY_DAYS: u64 = 5;
pub const BOB_STAKE: u64 = 20;
pub const STAKE_FOR_AMOUNT: u64 = 50;
pub const UNSTAKE_AMOUNT: u64 = 10;

/// `Info(staker)` right after the first two stakes
pub const INFO_AFTER_STAKE: [u64; 3] = [0, 1, 0];

/// Alice's DOM after `withdrawLeftover`
pub const ALICE_DOM_AFTER_WITHDRAW: u64 = 300;

/// State observed after carl unstakes in one reward phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstakeExpectation {
	pub carl_lp: u64,
	pub carl_dom: u64,
	pub total_staked: u64,
	pub carl_staked: u64,
	pub remaining_dom: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct UnstakePhase {
	pub name: &'static str,
	/// Chain time advanced before unstaking
	pub advance_days: u64,
	pub expect: UnstakeExpectation,
}

/// One unstake per reward tier, in chain-time order
pub const UNSTAKE_PHASES: [UnstakePhase; 4] = [
	UnstakePhase {
		name: "Unstake before 7 days",
		advance_days: 0,
		expect: UnstakeExpectation {
			carl_lp: 110,
			carl_dom: 0,
			total_staked: 90,
			carl_staked: 40,
			remaining_dom: 1000,
		},
	},
	UnstakePhase {
		name: "Unstake between 7 and 120 days",
		advance_days: 34,
		expect: UnstakeExpectation {
			carl_lp: 120,
			carl_dom: 0,
			total_staked: 80,
			carl_staked: 30,
			remaining_dom: 1000,
		},
	},
	UnstakePhase {
		name: "Unstake between 120 and 150 days",
		advance_days: 90,
		expect: UnstakeExpectation {
			carl_lp: 130,
			carl_dom: 0,
			total_staked: 70,
			carl_staked: 20,
			remaining_dom: 1000,
		},
	},
	UnstakePhase {
		name: "Unstake after 150 days",
		advance_days: 30,
		expect: UnstakeExpectation {
			carl_lp: 140,
			carl_dom: 0,
			total_staked: 60,
			carl_staked: 10,
			remaining_dom: 1000,
		},
	},
];
