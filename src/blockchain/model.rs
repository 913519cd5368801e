use log::{debug, info};
use std::fmt;

use super::Block;
use super::pow::{self, SearchBounds};
use crate::error::{LedgerError, Result};

/// Simple in-memory blockchain with Proof-of-Work.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new() -> Self {
        let mut bc = Self { chain: Vec::new() };
        bc.chain.push(Block::genesis());
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Mine and append a new block, searching for its proof without bounds.
    pub fn mine_block(&mut self) -> Result<&Block> {
        self.mine_block_within(&SearchBounds::unbounded())
    }

    /// Mine and append a new block, giving up according to `bounds`.
    pub fn mine_block_within(&mut self, bounds: &SearchBounds) -> Result<&Block> {
        let last = self.last_block()?;
        let proof = pow::solve_proof_of_work(last.proof, bounds)?;
        let previous_hash = last.canonical_hash();
        self.append(proof, previous_hash)
    }

    /// Append a block with an already-solved proof. Callers guarantee that
    /// `proof` and `previous_hash` were derived from the current tail.
    pub(crate) fn append(&mut self, proof: u64, previous_hash: String) -> Result<&Block> {
        let block = Block::new(self.chain.len() as u64 + 1, proof, previous_hash);
        info!(
            "LEDGER - appended block #{} (proof={}, previous_hash={})",
            block.index, block.proof, block.previous_hash
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Validate the whole chain: linkage, index continuity and PoW.
    pub fn is_valid_chain(&self) -> bool {
        is_chain_valid(&self.chain)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Why a chain failed validation. `position` is the 0-based offset of the
/// block whose check against its predecessor failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFault {
    BrokenLink { position: usize },
    InvalidProof { position: usize },
    IndexGap { position: usize },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFault::BrokenLink { position } => {
                write!(f, "block at position {position} does not link to its predecessor")
            }
            ChainFault::InvalidProof { position } => {
                write!(f, "block at position {position} carries an invalid proof")
            }
            ChainFault::IndexGap { position } => {
                write!(f, "block at position {position} breaks index continuity")
            }
        }
    }
}

/// Walk every adjacent pair and report the first failing check.
/// Empty and genesis-only chains have nothing to check.
pub fn verify_chain(chain: &[Block]) -> std::result::Result<(), ChainFault> {
    for (offset, pair) in chain.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let position = offset + 1;

        if current.previous_hash != previous.canonical_hash() {
            debug!("VALIDATE - broken link at position {position}");
            return Err(ChainFault::BrokenLink { position });
        }
        if !pow::is_valid_proof(current.proof, previous.proof) {
            debug!("VALIDATE - invalid proof at position {position}");
            return Err(ChainFault::InvalidProof { position });
        }
        if previous.index.checked_add(1) != Some(current.index) {
            debug!("VALIDATE - index gap at position {position}");
            return Err(ChainFault::IndexGap { position });
        }
    }
    Ok(())
}

pub fn is_chain_valid(chain: &[Block]) -> bool {
    verify_chain(chain).is_ok()
}
