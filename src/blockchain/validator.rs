use super::{Block, ProofOfWork};
use crate::error::ChainError;

/// Checks hash linkage and proof-of-work across a whole candidate chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    /// All-or-nothing verdict on `chain`: indices run 1..N without gaps, every
    /// block links to its predecessor's hash and carries a valid proof. A lone
    /// genesis block is valid.
    pub fn is_valid(&self, chain: &[Block]) -> bool {
        self.validate(chain).is_ok()
    }

    /// Like [`Self::is_valid`] but names the first offending block.
    pub fn validate(&self, chain: &[Block]) -> Result<(), ChainError> {
        let first = chain.first().ok_or(ChainError::Empty)?;
        if first.index != 1 {
            return Err(ChainError::BadIndex {
                expected: 1,
                found: first.index,
            });
        }

        for pair in chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if current.index != prev.index + 1 {
                return Err(ChainError::BadIndex {
                    expected: prev.index + 1,
                    found: current.index,
                });
            }

            let prev_hash = prev.hash();

            if current.previous_hash != prev_hash {
                return Err(ChainError::BrokenLink {
                    index: current.index,
                });
            }
            if !self.pow.is_valid_proof(prev.proof, current.proof, &prev_hash) {
                return Err(ChainError::InvalidProof {
                    index: current.index,
                });
            }
        }

        Ok(())
    }
}
