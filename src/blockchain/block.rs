use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hasher::{canonical_json, sha256_hex};
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // seconds since the Unix epoch (UTC), microsecond precision
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/// Current time in the block timestamp format.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

impl Block {
    /// The fixed first block: index 1, bootstrap proof, sentinel previous hash.
    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string())
    }

    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self::new_with_timestamp(index, transactions, proof, previous_hash, now_timestamp())
    }

    pub fn new_with_timestamp(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
        timestamp: f64,
    ) -> Self {
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Canonical byte encoding of the block: sorted-key JSON with `", "` and
    /// `": "` separators and ASCII-only strings.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_json(self).expect("block serializes to JSON")
    }

    /// Lowercase hex SHA-256 over the canonical encoding.
    pub fn hash(&self) -> String {
        sha256_hex(&self.canonical_bytes())
    }
}
