//! Core building blocks: provider and transaction sending, signer
//! derivation, ABI-driven contract handles, chain clock control and logging.

pub mod blockchain;
pub mod clock;
pub mod contracts;
pub mod logging;
pub mod signer;

#[cfg(test)]
pub(crate) mod testing;

pub use blockchain::{Provider, ReceiptPolicy, TxSender};
pub use clock::Clock;
pub use contracts::{ContractHandle, DeployedContract};
