use log::{debug, info};

use super::{Block, ChainValidator, ProofOfWork};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
}

impl Ledger {
    /// Initialize a new ledger holding only the genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            pow,
        }
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    pub fn validator(&self) -> ChainValidator {
        ChainValidator::new(self.pow)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Index the next sealed block will get.
    pub fn next_index(&self) -> u64 {
        self.chain.len() as u64 + 1
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction for the next block. The returned index is advisory:
    /// more transactions (or a chain replacement) may happen before mining.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.push_transaction(Transaction::new(sender, recipient, amount))
    }

    fn push_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        debug!("pending pool size now {}", self.pending.len());
        self.next_index()
    }

    /// Seal the pending pool into a new block linked to `previous_hash`.
    /// An empty hash is refused; use [`Self::seal_on_tip`] to link to the tip.
    pub fn create_block(
        &mut self,
        proof: u64,
        previous_hash: String,
    ) -> Result<&Block, LedgerError> {
        if previous_hash.is_empty() {
            return Err(LedgerError::EmptyPreviousHash);
        }
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.next_index(), transactions, proof, previous_hash);
        info!(
            "sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Seal the pending pool on top of the current tip.
    pub fn seal_on_tip(&mut self, proof: u64) -> Result<&Block, LedgerError> {
        let previous_hash = self.last_block().hash();
        self.create_block(proof, previous_hash)
    }

    /// Finish a mining round: pay `reward` and seal, provided the tip is still
    /// the block the proof was searched against.
    pub fn seal_mined(
        &mut self,
        mined_on: &str,
        proof: u64,
        reward: Transaction,
    ) -> Result<&Block, LedgerError> {
        let tip = self.last_block();
        let tip_hash = tip.hash();
        if tip_hash != mined_on {
            return Err(LedgerError::StaleTip);
        }
        if !self.pow.is_valid_proof(tip.proof, proof, &tip_hash) {
            return Err(LedgerError::ProofMismatch(proof));
        }
        self.push_transaction(reward);
        self.seal_on_tip(proof)
    }

    /// Swap in `candidate` if it is still strictly longer than the local chain.
    /// The pending pool is kept.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            return false;
        }
        info!(
            "replacing chain: {} -> {} blocks",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::pow::CancelToken;

    fn ledger() -> Ledger {
        Ledger::new(ProofOfWork::new(2))
    }

    fn mine(ledger: &mut Ledger) -> Block {
        let proof = ledger
            .pow()
            .find_proof(ledger.last_block(), &CancelToken::never())
            .unwrap();
        ledger.seal_on_tip(proof).unwrap().clone()
    }

    #[test]
    fn starts_with_genesis_and_empty_pool() {
        let l = ledger();
        assert_eq!(l.len(), 1);
        assert_eq!(l.last_block().index, 1);
        assert!(l.pending().is_empty());
    }

    #[test]
    fn add_transaction_returns_next_index() {
        let mut l = ledger();
        assert_eq!(l.add_transaction("a", "b", 1), 2);
        assert_eq!(l.add_transaction("b", "c", 2), 2);
        assert_eq!(l.pending().len(), 2);
    }

    #[test]
    fn create_block_drains_pool_and_links() {
        let mut l = ledger();
        l.add_transaction("a", "b", 1);
        let genesis_hash = l.last_block().hash();
        let block = l.create_block(42, genesis_hash.clone()).unwrap().clone();
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(block.transactions, vec![Transaction::new("a", "b", 1)]);
        assert!(l.pending().is_empty());
        assert_eq!(l.add_transaction("c", "d", 3), 3);
    }

    #[test]
    fn create_block_refuses_empty_previous_hash() {
        let mut l = ledger();
        l.add_transaction("a", "b", 1);
        let err = l.create_block(0, String::new()).unwrap_err();
        assert_eq!(err, LedgerError::EmptyPreviousHash);
        assert_eq!(l.len(), 1);
        assert_eq!(l.pending().len(), 1);
        assert!(l.validator().is_valid(l.chain()));
    }

    #[test]
    fn mining_fresh_ledger_yields_block_two() {
        let mut l = ledger();
        let genesis_hash = l.last_block().hash();
        let block = mine(&mut l);
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_hash);
        assert!(l.pending().is_empty());
        assert!(l.validator().is_valid(l.chain()));
    }

    #[test]
    fn seal_mined_pays_reward() {
        let mut l = ledger();
        l.add_transaction("a", "b", 7);
        let tip = l.last_block().hash();
        let proof = l
            .pow()
            .find_proof(l.last_block(), &CancelToken::never())
            .unwrap();
        let block = l.seal_mined(&tip, proof, Transaction::reward("me", 1)).unwrap();
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[1], Transaction::reward("me", 1));
        assert!(l.pending().is_empty());
    }

    #[test]
    fn seal_mined_rejects_moved_tip() {
        let mut l = ledger();
        let stale = l.last_block().hash();
        mine(&mut l);
        l.add_transaction("a", "b", 1);
        let err = l.seal_mined(&stale, 0, Transaction::reward("me", 1)).unwrap_err();
        assert_eq!(err, LedgerError::StaleTip);
        assert_eq!(l.len(), 2);
        assert_eq!(l.pending().len(), 1);
    }

    #[test]
    fn replace_chain_requires_longer_candidate() {
        let mut other = ledger();
        mine(&mut other);
        mine(&mut other);

        let mut l = ledger();
        l.add_transaction("a", "b", 1);
        assert!(!l.replace_chain(vec![Block::genesis()]));
        assert!(l.replace_chain(other.chain().to_vec()));
        assert_eq!(l.len(), 3);
        assert_eq!(l.pending().len(), 1);
        assert!(!l.replace_chain(other.chain().to_vec()));
    }
}
