use serde::{Deserialize, Serialize};

/// Sender id used for transactions minted by the node itself (mining rewards).
pub const REWARD_SENDER: &str = "0";

/// A value transfer waiting in (or sealed into) a block.
///
/// There is no signature or uniqueness check: the ledger records what it
/// is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Reward paid to `recipient` for sealing a block.
    pub fn reward(recipient: impl Into<String>, amount: u64) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }
}
