//! Staking scenario against a simulated chain
//!
//! Deploys two mock tokens and the staking contract, seeds three stakers
//! (alice, bob and carl, the first three accounts of the test mnemonic) and
//! walks through staking, staking on behalf of another account, unstaking in
//! each reward tier and withdrawing the leftover rewards. Chain time is moved
//! forward between steps and every observed balance is compared against the
//! fixtures; the first mismatch ends the run.

pub mod contracts;
pub mod fixtures;

use crate::{
	constants::{anvil_accounts, scenario_contracts},
	core::{
		blockchain::{Provider, ReceiptPolicy, TxSender},
		clock::Clock,
		contracts::deploy,
		logging,
		signer,
	},
	operations::env::{AnvilInstance, AnvilOptions},
	types::error::{Error, Result},
};
use alloy_primitives::{Address, U256};
use destaking_types::{ContractArtifact, SECONDS_PER_DAY};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub use contracts::{MockToken, StakingPool};
use fixtures::*;

/// Where and how to run the scenario
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
	pub artifacts_dir: PathBuf,
	/// Existing node to run against; a fresh anvil is started when `None`
	pub rpc_url: Option<String>,
	/// Port for the spawned anvil; a free one is picked when `None`
	pub port: Option<u16>,
	pub mnemonic: String,
	pub policy: ReceiptPolicy,
}

impl ScenarioOptions {
	pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
		Self {
			artifacts_dir: artifacts_dir.into(),
			rpc_url: None,
			port: None,
			mnemonic: anvil_accounts::MNEMONIC.to_string(),
			policy: ReceiptPolicy::default(),
		}
	}
}

/// One passed comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
	pub label: String,
	pub value: U256,
}

#[derive(Debug, Clone, Default)]
pub struct StepReport {
	pub name: String,
	pub checks: Vec<CheckResult>,
}

impl StepReport {
	fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			checks: Vec::new(),
		}
	}

	/// Record `actual` if it equals `expected`, fail the step otherwise
	pub fn check(&mut self, label: impl Into<String>, expected: u64, actual: U256) -> Result<()> {
		let label = label.into();
		let expected = U256::from(expected);
		if actual != expected {
			return Err(Error::CheckFailed {
				step: self.name.clone(),
				check: label,
				expected,
				actual,
			});
		}
		self.checks.push(CheckResult {
			label,
			value: actual,
		});
		Ok(())
	}
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
	pub rpc_url: String,
	pub staking: Address,
	pub lsp_expiration: u64,
	pub steps: Vec<StepReport>,
}

impl ScenarioReport {
	pub fn check_count(&self) -> usize {
		self.steps.iter().map(|s| s.checks.len()).sum()
	}
}

/// A scenario account with its own signing provider
#[derive(Debug, Clone)]
pub struct Staker {
	pub name: &'static str,
	pub address: Address,
	pub sender: TxSender,
}

/// Deployed and seeded scenario, ready to run
pub struct StakingScenario {
	clock: Clock,
	reader: Provider,
	alice: Staker,
	bob: Staker,
	carl: Staker,
	dom: MockToken,
	lp: MockToken,
	staking: StakingPool,
	lsp_expiration: u64,
	rpc_url: String,
}

impl StakingScenario {
	/// Deploy the contracts and seed the stakers
	///
	/// # Errors
	/// Returns error if an artifact is missing, the node cannot be reached or
	/// any setup transaction fails
	#[instrument(skip(options), fields(artifacts = %options.artifacts_dir.display()))]
	pub async fn setup(rpc_url: &str, options: &ScenarioOptions) -> Result<Self> {
		logging::operation_start("scenario setup", rpc_url);

		let token_artifact =
			ContractArtifact::find(&options.artifacts_dir, scenario_contracts::MOCK_TOKEN)?;
		let staking_artifact =
			ContractArtifact::find(&options.artifacts_dir, scenario_contracts::STAKING)?;

		let signers = signer::derive_accounts(&options.mnemonic, 3)?;
		let mut stakers = Vec::with_capacity(signers.len());
		for (name, signer) in ["alice", "bob", "carl"].into_iter().zip(signers) {
			let address = signer.address();
			let provider = Provider::connect(rpc_url, Some(signer))
				.await?
				.with_policy(options.policy);
			stakers.push(Staker {
				name,
				address,
				sender: TxSender::new(provider),
			});
		}
		let [alice, bob, carl]: [Staker; 3] = stakers
			.try_into()
			.map_err(|_| Error::Other(anyhow::anyhow!("expected three stakers")))?;
		let reader = alice.sender.provider().clone();
		let clock = Clock::new(reader.clone());

		let dom = MockToken::new(
			deploy(&alice.sender, &token_artifact, &["DOM".to_string(), "DOM".to_string()])
				.await?
				.handle,
		);
		let lp = MockToken::new(
			deploy(&alice.sender, &token_artifact, &["LP".to_string(), "LP".to_string()])
				.await?
				.handle,
		);

		let lsp_expiration = clock.latest_timestamp().await? + LSP_PERIOD_DAYS * SECONDS_PER_DAY;
		let staking_args = [
			lp.address().to_string(),
			dom.address().to_string(),
			TOTAL_DOM.to_string(),
			lsp_expiration.to_string(),
		];
		let staking = StakingPool::new(
			deploy(&alice.sender, &staking_artifact, &staking_args)
				.await?
				.handle,
		);
		info!(
			dom = %dom.address(),
			lp = %lp.address(),
			staking = %staking.address(),
			lsp_expiration = lsp_expiration,
			"Scenario contracts deployed"
		);

		let scenario = Self {
			clock,
			reader,
			alice,
			bob,
			carl,
			dom,
			lp,
			staking,
			lsp_expiration,
			rpc_url: rpc_url.to_string(),
		};
		scenario.seed().await?;
		Ok(scenario)
	}

	/// Mint and approve LP for every staker, then fund the staking contract
	/// with alice's DOM
	async fn seed(&self) -> Result<()> {
		let spender = self.staking.address();
		let stakers = [&self.alice, &self.bob, &self.carl];

		// Each staker's own transactions run in order; stakers run concurrently.
		try_join_all(stakers.iter().map(|staker| async move {
			self.lp.mint(&staker.sender, LP_SEED).await?;
			self.lp.approve(&staker.sender, spender, LP_SEED).await
		}))
		.await?;

		self.dom.mint(&self.alice.sender, DOM_SEED).await?;
		self.dom.approve(&self.alice.sender, spender, DOM_SEED).await?;
		self.dom.transfer(&self.alice.sender, spender, DOM_SEED).await?;

		info!(stakers = stakers.len(), "Scenario accounts seeded");
		Ok(())
	}

	/// Run every step in order
	///
	/// # Errors
	/// Returns [`Error::CheckFailed`] on the first mismatching value, or the
	/// underlying error if a transaction or call fails
	#[instrument(skip(self), fields(staking = %self.staking.address()))]
	pub async fn run(&self) -> Result<ScenarioReport> {
		let total = 3 + UNSTAKE_PHASES.len() as u64;
		let mut report = ScenarioReport {
			rpc_url: self.rpc_url.clone(),
			staking: self.staking.address(),
			lsp_expiration: self.lsp_expiration,
			steps: Vec::new(),
		};

		let step = self.stake_after_first_stake().await?;
		logging::operation_progress("scenario", &step.name, 1, total);
		report.steps.push(step);

		let step = self.stake_for().await?;
		logging::operation_progress("scenario", &step.name, 2, total);
		report.steps.push(step);

		for (i, phase) in UNSTAKE_PHASES.iter().enumerate() {
			let step = self.unstake(phase).await?;
			logging::operation_progress("scenario", &step.name, 3 + i as u64, total);
			report.steps.push(step);
		}

		let step = self.withdraw_leftover().await?;
		logging::operation_progress("scenario", &step.name, total, total);
		report.steps.push(step);

		Ok(report)
	}

	async fn stake_after_first_stake(&self) -> Result<StepReport> {
		let mut step = StepReport::new("Stake after first stake");
		let (alice, bob) = (&self.alice, &self.bob);

		self.staking.initialize(&alice.sender).await?;

		self.clock.increase_days(FIRST_STAKE_DELAY_DAYS).await?;
		self.staking.stake(&alice.sender, ALICE_STAKE).await?;
		step.check(
			"alice LP",
			LP_SEED - ALICE_STAKE,
			self.lp.balance_of(&self.reader, alice.address).await?,
		)?;

		self.clock.increase_days(SECOND_STAKE_DELAY_DAYS).await?;
		self.staking.stake(&bob.sender, BOB_STAKE).await?;
		step.check(
			"bob LP",
			LP_SEED - BOB_STAKE,
			self.lp.balance_of(&self.reader, bob.address).await?,
		)?;

		step.check(
			"totalStaked",
			ALICE_STAKE + BOB_STAKE,
			self.staking.total_staked(&self.reader).await?,
		)?;
		step.check(
			"totalStakedFor(alice)",
			ALICE_STAKE,
			self.staking.total_staked_for(&self.reader, alice.address).await?,
		)?;
		step.check(
			"totalStakedFor(bob)",
			BOB_STAKE,
			self.staking.total_staked_for(&self.reader, bob.address).await?,
		)?;
		step.check(
			"remainingDOM",
			DOM_SEED,
			self.staking.remaining_dom(&self.reader).await?,
		)?;

		for staker in [alice, bob] {
			let info = self
				.staking
				.info(&self.reader, staker.address, INFO_AFTER_STAKE.len())
				.await?;
			for (i, (expected, actual)) in INFO_AFTER_STAKE.iter().zip(info).enumerate() {
				step.check(format!("Info({})[{i}]", staker.name), *expected, actual)?;
			}
		}

		Ok(step)
	}

	async fn stake_for(&self) -> Result<StepReport> {
		let mut step = StepReport::new("Stake for");
		let (bob, carl) = (&self.bob, &self.carl);

		self.staking
			.stake_for(&bob.sender, carl.address, STAKE_FOR_AMOUNT)
			.await?;

		step.check(
			"bob LP",
			LP_SEED - BOB_STAKE - STAKE_FOR_AMOUNT,
			self.lp.balance_of(&self.reader, bob.address).await?,
		)?;
		step.check(
			"totalStaked",
			ALICE_STAKE + BOB_STAKE + STAKE_FOR_AMOUNT,
			self.staking.total_staked(&self.reader).await?,
		)?;
		step.check(
			"totalStakedFor(carl)",
			STAKE_FOR_AMOUNT,
			self.staking.total_staked_for(&self.reader, carl.address).await?,
		)?;

		Ok(step)
	}

	async fn unstake(&self, phase: &UnstakePhase) -> Result<StepReport> {
		let mut step = StepReport::new(phase.name);
		let carl = &self.carl;

		if phase.advance_days > 0 {
			self.clock.increase_days(phase.advance_days).await?;
		}
		self.staking.unstake(&carl.sender, UNSTAKE_AMOUNT).await?;

		let expect = phase.expect;
		step.check(
			"carl LP",
			expect.carl_lp,
			self.lp.balance_of(&self.reader, carl.address).await?,
		)?;
		step.check(
			"carl DOM",
			expect.carl_dom,
			self.dom.balance_of(&self.reader, carl.address).await?,
		)?;
		step.check(
			"totalStaked",
			expect.total_staked,
			self.staking.total_staked(&self.reader).await?,
		)?;
		step.check(
			"totalStakedFor(carl)",
			expect.carl_staked,
			self.staking.total_staked_for(&self.reader, carl.address).await?,
		)?;
		step.check(
			"remainingDOM",
			expect.remaining_dom,
			self.staking.remaining_dom(&self.reader).await?,
		)?;

		Ok(step)
	}

	async fn withdraw_leftover(&self) -> Result<StepReport> {
		let mut step = StepReport::new("Withdraw leftover");
		let alice = &self.alice;

		self.staking.withdraw_leftover(&alice.sender).await?;
		step.check(
			"alice DOM",
			ALICE_DOM_AFTER_WITHDRAW,
			self.dom.balance_of(&self.reader, alice.address).await?,
		)?;

		Ok(step)
	}
}

/// Run the scenario end to end
///
/// Attaches to `options.rpc_url` when given; otherwise starts an anvil node
/// that is stopped when the run ends, whatever its outcome.
pub async fn run_scenario(options: &ScenarioOptions) -> Result<ScenarioReport> {
	let mut _node: Option<AnvilInstance> = None;
	let rpc_url = match &options.rpc_url {
		Some(url) => url.clone(),
		None => {
			let anvil = match options.port {
				Some(port) => AnvilOptions {
					port,
					mnemonic: options.mnemonic.clone(),
					..AnvilOptions::default()
				},
				None => AnvilOptions {
					mnemonic: options.mnemonic.clone(),
					..AnvilOptions::ephemeral()?
				},
			};
			let node = AnvilInstance::spawn(anvil).await?;
			let url = node.url();
			_node = Some(node);
			url
		},
	};

	let scenario = StakingScenario::setup(&rpc_url, options).await?;
	scenario.run().await
}

/// Artifacts directory for the scenario when none is given
pub fn default_artifacts_dir() -> &'static Path {
	Path::new(crate::constants::DEFAULT_SCENARIO_ARTIFACTS)
}
