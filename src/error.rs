use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Peer address rejected by the node registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid node address: {0:?}")]
    InvalidAddress(String),
}

/// Why a candidate chain failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain has no blocks")]
    Empty,
    #[error("block #{index} does not link to the hash of its predecessor")]
    BrokenLink { index: u64 },
    #[error("block #{index} carries an invalid proof of work")]
    InvalidProof { index: u64 },
    #[error("expected block #{expected}, found #{found}")]
    BadIndex { expected: u64, found: u64 },
}

/// Why a mined proof could not be sealed into a block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("chain tip moved while mining; block discarded")]
    StaleTip,
    #[error("proof {0} does not solve the current tip")]
    ProofMismatch(u64),
    #[error("previous hash must not be empty")]
    EmptyPreviousHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PowError {
    #[error("proof search cancelled")]
    Cancelled,
    #[error("proof search space exhausted")]
    Exhausted,
}

/// Failure talking to a single peer. Absorbed by consensus, never surfaced.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer unreachable: {0}")]
    Unreachable(String),
    #[error("peer answered with status {0}")]
    BadStatus(u16),
    #[error("malformed peer response: {0}")]
    Malformed(String),
    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
}

/// Errors reported to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required transaction fields: {}", .0.join(", "))]
    MissingTransactionFields(Vec<&'static str>),
    #[error("please provide a list of node addresses")]
    MissingNodeList,
    #[error(transparent)]
    InvalidAddress(#[from] RegistryError),
    #[error("mining aborted: {0}")]
    MiningAborted(#[from] PowError),
    #[error(transparent)]
    Seal(#[from] LedgerError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingTransactionFields(_)
            | ApiError::MissingNodeList
            | ApiError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ApiError::MiningAborted(_) | ApiError::Seal(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
