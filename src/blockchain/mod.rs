pub mod block;
pub mod model;
pub mod pow;
pub mod shared;

pub use block::Block;
pub use model::{Blockchain, ChainFault, is_chain_valid, verify_chain};
pub use pow::{CancelToken, SearchBounds, solve_proof_of_work};
pub use shared::SharedBlockchain;

/// Proof-of-Work difficulty (leading zero hex digits). Fixed.
pub const DIFFICULTY: usize = 4;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// `previous_hash` sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
