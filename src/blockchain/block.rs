use chrono::Local;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single block in the ledger. Its hash is never cached on the block;
/// it is recomputed from the content whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // local time, informational
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(1, super::GENESIS_PROOF, String::from(super::GENESIS_PREVIOUS_HASH))
    }

    /// Create a block stamped with the current local time.
    pub fn new(index: u64, proof: u64, previous_hash: String) -> Self {
        Self::new_with_timestamp(index, proof, previous_hash, now_timestamp())
    }

    pub fn new_with_timestamp(
        index: u64,
        proof: u64,
        previous_hash: String,
        timestamp: String,
    ) -> Self {
        Self {
            index,
            timestamp,
            proof,
            previous_hash,
        }
    }

    /// Canonical byte encoding used as the hash preimage.
    ///
    /// Fields are written in lexicographic order of their names, with
    /// `": "` / `", "` separators and JSON-escaped strings, so the output
    /// only depends on the field values:
    /// `{"index": 2, "previous_hash": "..", "proof": 533, "timestamp": ".."}`
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(96 + self.previous_hash.len() + self.timestamp.len());
        out.push_str("{\"index\": ");
        out.push_str(&self.index.to_string());
        out.push_str(", \"previous_hash\": ");
        push_json_str(&mut out, &self.previous_hash);
        out.push_str(", \"proof\": ");
        out.push_str(&self.proof.to_string());
        out.push_str(", \"timestamp\": ");
        push_json_str(&mut out, &self.timestamp);
        out.push('}');
        out.into_bytes()
    }

    /// SHA-256 of [`Block::canonical_bytes`], lowercase hex.
    pub fn canonical_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Current local time as `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn push_json_str(out: &mut String, value: &str) {
    let quoted = serde_json::Value::String(value.to_owned()).to_string();
    out.push_str(&quoted);
}
