use log::debug;
use std::sync::{Mutex, RwLock, RwLockReadGuard};

use super::model::{self, ChainFault};
use super::pow::{self, SearchBounds};
use super::{Block, Blockchain};
use crate::error::{LedgerError, Result};

/// Thread-safe handle over a [`Blockchain`].
///
/// Mints are serialized by `mint_gate`; the proof search runs without the
/// chain lock so readers are only blocked for the final push.
#[derive(Debug)]
pub struct SharedBlockchain {
    chain: RwLock<Blockchain>,
    mint_gate: Mutex<()>,
    bounds: SearchBounds,
}

impl Default for SharedBlockchain {
    fn default() -> Self {
        Self::new(SearchBounds::unbounded())
    }
}

impl SharedBlockchain {
    pub fn new(bounds: SearchBounds) -> Self {
        Self {
            chain: RwLock::new(Blockchain::new()),
            mint_gate: Mutex::new(()),
            bounds,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Blockchain>> {
        self.chain.read().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Mine the next block and return a copy of it.
    pub fn mine_block(&self) -> Result<Block> {
        let _gate = self.mint_gate.lock().map_err(|_| LedgerError::LockPoisoned)?;

        let tail = self.latest_block()?;
        let proof = pow::solve_proof_of_work(tail.proof, &self.bounds)?;
        let previous_hash = tail.canonical_hash();

        let mut bc = self.chain.write().map_err(|_| LedgerError::LockPoisoned)?;
        // Only mints mutate the chain and we hold the gate, so the tail is unchanged.
        debug_assert_eq!(bc.len() as u64, tail.index);
        let block = bc.append(proof, previous_hash)?.clone();
        debug!("SHARED - chain height now {}", bc.len());
        Ok(block)
    }

    pub fn latest_block(&self) -> Result<Block> {
        self.read()?.last_block().cloned()
    }

    /// Consistent copy of the whole chain.
    pub fn snapshot(&self) -> Result<Vec<Block>> {
        Ok(self.read()?.blocks().to_vec())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn verify(&self) -> Result<std::result::Result<(), ChainFault>> {
        Ok(model::verify_chain(self.read()?.blocks()))
    }

    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.verify()?.is_ok())
    }
}
