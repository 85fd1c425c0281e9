use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Node settings, read from the environment (and `.env`, loaded in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    /// Recipient of mining rewards.
    pub node_id: String,
    /// Peers registered at boot.
    pub peers: Vec<String>,
    /// Period of the background consensus task; `None` disables it.
    pub resolve_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            peer_timeout: Duration::from_secs(5),
            node_id: new_node_id(),
            peers: Vec::new(),
            resolve_interval: None,
        }
    }
}

/// Random node id: a UUIDv4 without hyphens.
pub fn new_node_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_opt(&lookup, "PORT").unwrap_or(defaults.port),
            difficulty: parse_opt::<usize, _>(&lookup, "POW_DIFFICULTY")
                .filter(|d| {
                    let ok = *d <= MAX_DIFFICULTY;
                    if !ok {
                        warn!("POW_DIFFICULTY={d} exceeds {MAX_DIFFICULTY}; using default");
                    }
                    ok
                })
                .unwrap_or(defaults.difficulty),
            peer_timeout: parse_opt(&lookup, "PEER_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.peer_timeout),
            node_id: lookup("NODE_ID")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.node_id),
            peers: lookup("PEERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            resolve_interval: parse_opt::<u64, _>(&lookup, "RESOLVE_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

fn parse_opt<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
