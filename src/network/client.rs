use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::Block;
use crate::error::PeerError;

/// Wire shape of `GET /chain`, served by every node and fetched from peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl PeerChain {
    #[cfg(test)]
    pub fn new(chain: Vec<Block>) -> Self {
        Self {
            length: chain.len(),
            chain,
        }
    }

    /// Reject responses whose `length` disagrees with the blocks they carry.
    pub fn check_length(self) -> Result<Self, PeerError> {
        if self.length != self.chain.len() {
            return Err(PeerError::LengthMismatch {
                reported: self.length,
                actual: self.chain.len(),
            });
        }
        Ok(self)
    }
}

/// Fetches a peer's full chain.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError>;
}

#[async_trait]
impl<T: ChainFetcher + ?Sized> ChainFetcher for Box<T> {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError> {
        (**self).fetch_chain(peer).await
    }
}

/// `ChainFetcher` over plain HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn chain_url(peer: &str) -> Result<String, PeerError> {
        if peer.starts_with('/') {
            return Err(PeerError::Unreachable(format!(
                "{peer} has no host to contact over http"
            )));
        }
        Ok(format!("http://{peer}/chain"))
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError> {
        let url = Self::chain_url(peer)?;
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PeerError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PeerError::BadStatus(status.as_u16()));
        }

        let body: PeerChain = resp
            .json()
            .await
            .map_err(|e| PeerError::Malformed(e.to_string()))?;
        body.check_length()
    }
}
