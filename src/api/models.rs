use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::{Block, SearchBounds, SharedBlockchain};
use crate::error::LedgerError;

/// Shared application state with the in-memory blockchain.
#[derive(Debug, Default)]
pub struct AppState {
    pub blockchain: SharedBlockchain,
}

impl AppState {
    pub fn new(bounds: SearchBounds) -> Self {
        Self {
            blockchain: SharedBlockchain::new(bounds),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub timestamp: String,
    pub proof: u64,
    pub previous_hash: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "Congratulations, you've mined a block",
            index: block.index,
            timestamp: block.timestamp,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
}

/* ---------- Errors ---------- */

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("worker pool unavailable: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::SearchExhausted { .. })
            | ApiError::Ledger(LedgerError::SearchCancelled { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Ledger(LedgerError::EmptyChain)
            | ApiError::Ledger(LedgerError::LockPoisoned)
            | ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
