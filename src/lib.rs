//! Single-node append-only ledger secured by a proof-of-work puzzle,
//! with an actix-web surface for mining, fetching and validating the chain.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;

pub use blockchain::{Block, Blockchain, SharedBlockchain};
pub use error::{LedgerError, Result};
