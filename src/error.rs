use thiserror::Error;

/// Failures surfaced by the ledger engine.
///
/// An invalid chain is not an error: validation reports it as a plain
/// boolean (or a [`crate::ledger::ChainFault`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The chain was observed without its genesis block.
    #[error("internal consistency violation: chain is empty")]
    EmptyChain,

    #[error("proof-of-work search gave up after {attempts} attempts")]
    SearchExhausted { attempts: u64 },

    #[error("proof-of-work search cancelled after {attempts} attempts")]
    SearchCancelled { attempts: u64 },

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
