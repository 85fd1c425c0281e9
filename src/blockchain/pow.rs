use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Block;
use super::hasher::sha256_hex;
use crate::error::PowError;

/// How many candidates are tried between two cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Shared stop signal for in-flight proof searches.
///
/// Every call to [`Interrupt::trigger`] bumps an epoch; tokens issued before
/// the bump report themselves as cancelled.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    epoch: Arc<AtomicU64>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            epoch: Some(self.epoch.clone()),
            issued_at: self.epoch.load(Ordering::Acquire),
        }
    }

    /// Cancel every search started before this call.
    pub fn trigger(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    epoch: Option<Arc<AtomicU64>>,
    issued_at: u64,
}

impl CancelToken {
    /// A token that is never cancelled.
    #[cfg(test)]
    pub fn never() -> Self {
        Self {
            epoch: None,
            issued_at: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.epoch {
            Some(epoch) => epoch.load(Ordering::Acquire) != self.issued_at,
            None => false,
        }
    }
}

/// Proof-of-work puzzle: `sha256("{last_proof}{proof}{last_hash}")` must
/// start with `difficulty` hex zeros. Difficulty is fixed for a whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn is_valid_proof(&self, last_proof: u64, proof: u64, last_hash: &str) -> bool {
        let guess = format!("{last_proof}{proof}{last_hash}");
        let digest = sha256_hex(guess.as_bytes());
        digest.bytes().take(self.difficulty).all(|c| c == b'0')
    }

    /// Search upward from 0 for a proof valid against `last_block`.
    ///
    /// Fails with `Cancelled` when `cancel` fires, or `Exhausted` if the whole
    /// `u64` range is tried without success.
    pub fn find_proof(&self, last_block: &Block, cancel: &CancelToken) -> Result<u64, PowError> {
        self.find_proof_from(last_block.proof, &last_block.hash(), 0, cancel)
    }

    fn find_proof_from(
        &self,
        last_proof: u64,
        last_hash: &str,
        start: u64,
        cancel: &CancelToken,
    ) -> Result<u64, PowError> {
        let mut proof = start;
        loop {
            if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(PowError::Cancelled);
            }
            if self.is_valid_proof(last_proof, proof, last_hash) {
                return Ok(proof);
            }
            proof = proof.checked_add(1).ok_or(PowError::Exhausted)?;
        }
    }
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(super::DEFAULT_DIFFICULTY)
    }
}
