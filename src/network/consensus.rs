use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::RwLock;

use super::client::{ChainFetcher, PeerChain};
use crate::blockchain::{Block, ChainValidator, Interrupt, Ledger};
use crate::error::PeerError;

/// Outcome of a consensus round: whether the local chain was replaced, and
/// the chain the node holds afterwards.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/// Longest-valid-chain consensus over a set of peers.
pub struct ConsensusResolver<F> {
    fetcher: F,
    interrupt: Interrupt,
}

impl<F: ChainFetcher> ConsensusResolver<F> {
    /// `interrupt` is triggered whenever the local chain gets replaced, so
    /// proof searches on the old tip stop.
    pub fn new(fetcher: F, interrupt: Interrupt) -> Self {
        Self { fetcher, interrupt }
    }

    /// Fetch every peer concurrently. Results come back in `peers` order.
    pub async fn fetch_all(
        &self,
        peers: &[String],
    ) -> Vec<(String, Result<PeerChain, PeerError>)> {
        let fetches = peers.iter().map(|peer| async move {
            let res = self.fetcher.fetch_chain(peer).await;
            (peer.clone(), res)
        });
        join_all(fetches).await
    }

    /// Query `peers` and adopt the longest valid chain strictly longer than
    /// the local one. Peer failures are logged and skipped.
    pub async fn resolve(&self, peers: &[String], ledger: &RwLock<Ledger>) -> Resolution {
        let (local_len, validator) = {
            let ledger = ledger.read().expect("ledger lock poisoned");
            (ledger.len(), ledger.validator())
        };

        let mut peers = peers.to_vec();
        peers.sort();
        peers.dedup();

        let responses = self.fetch_all(&peers).await;
        let candidate = select_longest(&validator, local_len, responses);

        let mut ledger = ledger.write().expect("ledger lock poisoned");
        let replaced = match candidate {
            Some(chain) => ledger.replace_chain(chain),
            None => false,
        };
        if replaced {
            self.interrupt.trigger();
            info!("consensus: adopted peer chain of {} blocks", ledger.len());
        } else {
            debug!("consensus: local chain of {} blocks kept", ledger.len());
        }

        Resolution {
            replaced,
            chain: ledger.chain().to_vec(),
        }
    }
}

/// Pick the longest valid chain strictly longer than `local_len`.
///
/// Equal lengths never displace the current best, so for a fixed set of
/// responses in a fixed order the choice is deterministic.
pub fn select_longest<I>(
    validator: &ChainValidator,
    local_len: usize,
    responses: I,
) -> Option<Vec<Block>>
where
    I: IntoIterator<Item = (String, Result<PeerChain, PeerError>)>,
{
    let mut best_len = local_len;
    let mut best = None;

    for (peer, response) in responses {
        let remote = match response {
            Ok(remote) => remote,
            Err(e) => {
                warn!("consensus: skipping peer {peer}: {e}");
                continue;
            }
        };

        if remote.length <= best_len {
            debug!(
                "consensus: peer {peer} has {} blocks, best so far {best_len}",
                remote.length
            );
            continue;
        }
        if let Err(e) = validator.validate(&remote.chain) {
            debug!("consensus: rejecting chain from {peer}: {e}");
            continue;
        }

        best_len = remote.length;
        best = Some(remote.chain);
    }

    best
}
