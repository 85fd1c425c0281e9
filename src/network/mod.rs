pub mod client;
pub mod consensus;
pub mod registry;

pub use client::{ChainFetcher, HttpChainFetcher};
pub use consensus::ConsensusResolver;
pub use registry::NodeRegistry;
