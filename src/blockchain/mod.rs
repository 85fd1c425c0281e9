pub mod block;
pub mod hasher;
pub mod ledger;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use ledger::Ledger;
pub use pow::{Interrupt, ProofOfWork};
pub use validator::ChainValidator;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Upper bound on difficulty: a SHA-256 hex digest has 64 characters.
pub const MAX_DIFFICULTY: usize = 64;

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Amount paid to the node that seals a block.
pub const MINING_REWARD: u64 = 1;
