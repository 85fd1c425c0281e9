use log::info;
use std::collections::BTreeSet;
use url::Url;

use crate::error::RegistryError;

/// Normalize a peer address into `host[:port]`, or keep a bare `/path` form.
///
/// `192.168.1.5:5000` and `http://192.168.1.5:5000/` both become
/// `192.168.1.5:5000`. The scheme's default port is spelled out, so
/// `https://node` and `node:443` are the same peer.
pub fn normalize_address(address: &str) -> Result<String, RegistryError> {
    let trimmed = address.trim();
    let invalid = || RegistryError::InvalidAddress(address.to_string());

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    if trimmed.starts_with('/') {
        if trimmed.trim_start_matches('/').is_empty() {
            return Err(invalid());
        }
        return Ok(trimmed.to_string());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;

    Ok(match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Statically registered peers. Ordered, so consensus visits them
/// deterministically.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    peers: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer; re-adding an address that normalizes to a known one is
    /// a no-op. Returns the normalized entry.
    pub fn add_peer(&mut self, address: &str) -> Result<String, RegistryError> {
        let normalized = normalize_address(address)?;
        if self.peers.insert(normalized.clone()) {
            info!("registered peer {normalized}");
        }
        Ok(normalized)
    }

    /// Register several peers at once. Nothing is added unless every address
    /// is valid.
    pub fn add_peers<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<(), RegistryError> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        for peer in normalized {
            if self.peers.insert(peer.clone()) {
                info!("registered peer {peer}");
            }
        }
        Ok(())
    }

    pub fn list_peers(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_and_bare_forms_collapse() {
        let mut reg = NodeRegistry::new();
        assert_eq!(reg.add_peer("192.168.1.5:5000").unwrap(), "192.168.1.5:5000");
        assert_eq!(
            reg.add_peer("http://192.168.1.5:5000").unwrap(),
            "192.168.1.5:5000"
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn default_ports_are_made_explicit() {
        let mut reg = NodeRegistry::new();
        assert_eq!(reg.add_peer("https://node").unwrap(), "node:443");
        assert_eq!(reg.add_peer("https://node:443").unwrap(), "node:443");
        assert_eq!(reg.add_peer("node:443").unwrap(), "node:443");
        assert_eq!(reg.len(), 1);

        assert_eq!(normalize_address("http://node").unwrap(), "node:80");
        assert_eq!(normalize_address("node").unwrap(), "node:80");
        assert_ne!(
            normalize_address("https://node").unwrap(),
            normalize_address("http://node").unwrap()
        );
    }

    #[test]
    fn url_path_and_whitespace_are_dropped() {
        assert_eq!(
            normalize_address("  http://node.local:8000/chain  ").unwrap(),
            "node.local:8000"
        );
        assert_eq!(normalize_address("localhost:5001").unwrap(), "localhost:5001");
        assert_eq!(normalize_address("[::1]:5000").unwrap(), "[::1]:5000");
    }

    #[test]
    fn path_form_is_kept() {
        assert_eq!(normalize_address("/tmp/node.sock").unwrap(), "/tmp/node.sock");
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for bad in ["not a url", "", "   ", "http://", "/", "http://exa mple.com"] {
            assert_eq!(
                normalize_address(bad),
                Err(RegistryError::InvalidAddress(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn failed_add_leaves_registry_untouched() {
        let mut reg = NodeRegistry::new();
        reg.add_peer("a:1").unwrap();
        assert!(reg.add_peer("not a url").is_err());
        assert_eq!(reg.list_peers(), vec!["a:1".to_string()]);
    }

    #[test]
    fn batch_registration_is_all_or_nothing() {
        let mut reg = NodeRegistry::new();
        assert!(reg.add_peers(&["a:1", "not a url", "b:2"]).is_err());
        assert!(reg.is_empty());

        reg.add_peers(&["a:1", "http://a:1", "b:2"]).unwrap();
        assert_eq!(reg.list_peers(), vec!["a:1", "b:2"]);
    }

    #[test]
    fn listing_is_sorted() {
        let mut reg = NodeRegistry::new();
        reg.add_peer("c:3").unwrap();
        reg.add_peer("a:1").unwrap();
        reg.add_peer("b:2").unwrap();
        assert_eq!(reg.list_peers(), vec!["a:1", "b:2", "c:3"]);
    }
}
