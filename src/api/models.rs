use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::blockchain::{Block, Interrupt, Ledger, ProofOfWork};
use crate::config::Config;
use crate::error::ApiError;
use crate::network::{ChainFetcher, ConsensusResolver, HttpChainFetcher, NodeRegistry};
use crate::transaction::Transaction;

/// Shared application state: the node's ledger, its peers and the consensus
/// machinery. Built once in `main` and handed to every worker.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub registry: RwLock<NodeRegistry>,
    pub resolver: ConsensusResolver<Box<dyn ChainFetcher>>,
    /// Stops in-flight proof searches when the chain is replaced.
    pub interrupt: Interrupt,
    pub node_id: String,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpChainFetcher::new(config.peer_timeout)?;
        Ok(Self::with_fetcher(
            ProofOfWork::new(config.difficulty),
            config.node_id.clone(),
            Box::new(fetcher),
        ))
    }

    pub fn with_fetcher(
        pow: ProofOfWork,
        node_id: String,
        fetcher: Box<dyn ChainFetcher>,
    ) -> Self {
        let interrupt = Interrupt::new();
        Self {
            ledger: RwLock::new(Ledger::new(pow)),
            registry: RwLock::new(NodeRegistry::new()),
            resolver: ConsensusResolver::new(fetcher, interrupt.clone()),
            interrupt,
            node_id,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

/// Fields are optional so a missing one can be reported by name.
#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
}

impl NewTxRequest {
    pub fn into_transaction(self) -> Result<Transaction, ApiError> {
        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => {
                Ok(Transaction::new(sender, recipient, amount))
            }
            (sender, recipient, amount) => {
                let mut missing = Vec::new();
                if sender.is_none() {
                    missing.push("sender");
                }
                if recipient.is_none() {
                    missing.push("recipient");
                }
                if amount.is_none() {
                    missing.push("amount");
                }
                Err(ApiError::MissingTransactionFields(missing))
            }
        }
    }
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/* ---------- Health API Models ---------- */

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    pub status: &'static str,
    pub node_id: &'a str,
    pub height: usize,
    pub pending: usize,
    pub peers: usize,
    pub difficulty: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_request_becomes_transaction() {
        let req: NewTxRequest =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","amount":4}"#).unwrap();
        assert_eq!(req.into_transaction().unwrap(), Transaction::new("a", "b", 4));
    }

    #[test]
    fn missing_fields_are_named() {
        let req: NewTxRequest = serde_json::from_str(r#"{"recipient":"b"}"#).unwrap();
        match req.into_transaction() {
            Err(ApiError::MissingTransactionFields(fields)) => {
                assert_eq!(fields, vec!["sender", "amount"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
