use log::debug;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::DIFFICULTY;
use crate::error::{LedgerError, Result};

/// Shared flag that stops an in-flight proof search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional limits for [`solve_proof_of_work`]. The default is unbounded.
#[derive(Debug, Clone, Default)]
pub struct SearchBounds {
    pub max_attempts: Option<u64>,
    pub cancel: Option<CancelToken>,
}

impl SearchBounds {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Lazy sequence of candidate proofs: 1, 2, 3, ...
#[derive(Debug, Clone)]
pub struct Candidates {
    next: Option<u64>,
}

impl Iterator for Candidates {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = current.checked_add(1);
        Some(current)
    }
}

pub fn candidates() -> Candidates {
    Candidates { next: Some(1) }
}

/// Decimal rendering of `proof² - previous_proof²`, with a leading `-`
/// when negative. Squares are taken in u128 so no u64 input overflows.
pub fn proof_preimage(proof: u64, previous_proof: u64) -> String {
    let a = u128::from(proof) * u128::from(proof);
    let b = u128::from(previous_proof) * u128::from(previous_proof);
    if a >= b {
        (a - b).to_string()
    } else {
        format!("-{}", b - a)
    }
}

/// SHA-256 hex digest of the proof preimage.
pub fn proof_digest(proof: u64, previous_proof: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(proof_preimage(proof, previous_proof).as_bytes());
    hex::encode(hasher.finalize())
}

pub fn meets_difficulty(digest: &str) -> bool {
    digest.len() >= DIFFICULTY && digest.bytes().take(DIFFICULTY).all(|c| c == b'0')
}

/// True when `proof` solves the puzzle relative to `previous_proof`.
pub fn is_valid_proof(proof: u64, previous_proof: u64) -> bool {
    meets_difficulty(&proof_digest(proof, previous_proof))
}

/// Find the smallest positive `n` such that
/// `sha256(n² - previous_proof²)` starts with [`DIFFICULTY`] hex zeros.
///
/// Without bounds the search only stops at a solution.
pub fn solve_proof_of_work(previous_proof: u64, bounds: &SearchBounds) -> Result<u64> {
    let mut attempts: u64 = 0;
    for candidate in candidates() {
        if let Some(max) = bounds.max_attempts {
            if attempts >= max {
                debug!("POW - exhausted after {attempts} attempts (prev_proof={previous_proof})");
                return Err(LedgerError::SearchExhausted { attempts });
            }
        }
        if let Some(token) = &bounds.cancel {
            if token.is_cancelled() {
                debug!("POW - cancelled after {attempts} attempts (prev_proof={previous_proof})");
                return Err(LedgerError::SearchCancelled { attempts });
            }
        }
        attempts += 1;
        if is_valid_proof(candidate, previous_proof) {
            debug!("POW - solved prev_proof={previous_proof} -> proof={candidate} ({attempts} attempts)");
            return Ok(candidate);
        }
    }
    Err(LedgerError::SearchExhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preimage_keeps_sign() {
        assert_eq!(proof_preimage(3, 2), "5");
        assert_eq!(proof_preimage(2, 3), "-5");
        assert_eq!(proof_preimage(7, 7), "0");
        assert_eq!(
            proof_preimage(0, u64::MAX),
            format!("-{}", u128::from(u64::MAX) * u128::from(u64::MAX))
        );
    }

    #[test]
    fn candidates_start_at_one() {
        let first: Vec<u64> = candidates().take(3).collect();
        assert_eq!(first, vec![1, 2, 3]);
    }

    #[test]
    fn difficulty_prefix() {
        assert!(meets_difficulty("0000abcdef"));
        assert!(!meets_difficulty("000fabcdef"));
        assert!(!meets_difficulty("000"));
    }

    #[test]
    fn solution_is_first_match() {
        let previous = 1;
        let proof = solve_proof_of_work(previous, &SearchBounds::unbounded()).unwrap();
        assert!(proof_digest(proof, previous).starts_with("0000"));
        assert!((1..proof).all(|m| !is_valid_proof(m, previous)));
    }

    #[test]
    fn solver_is_deterministic() {
        let a = solve_proof_of_work(42, &SearchBounds::unbounded()).unwrap();
        let b = solve_proof_of_work(42, &SearchBounds::unbounded()).unwrap();
        assert_eq!(a, b);
        assert!(is_valid_proof(a, 42));
    }

    #[test]
    fn bounded_search_gives_up_before_solution() {
        let proof = solve_proof_of_work(1, &SearchBounds::unbounded()).unwrap();
        let cap = proof - 1;
        let err = solve_proof_of_work(1, &SearchBounds::unbounded().with_max_attempts(cap))
            .unwrap_err();
        assert_eq!(err, LedgerError::SearchExhausted { attempts: cap });

        let found =
            solve_proof_of_work(1, &SearchBounds::unbounded().with_max_attempts(proof)).unwrap();
        assert_eq!(found, proof);
    }

    #[test]
    fn cancelled_search_stops() {
        let token = CancelToken::new();
        token.cancel();
        let err = solve_proof_of_work(1, &SearchBounds::unbounded().with_cancel(token))
            .unwrap_err();
        assert_eq!(err, LedgerError::SearchCancelled { attempts: 0 });
    }
}
