//! In-memory collaborators for agent social protocol tests.
//!
//! This crate provides fakes for every external collaborator the agent
//! consumes:
//! - `MemoryNetwork` - ledger, tag index and content store in one
//! - `ScriptedBundler` - bundler with a settable balance, price and outage mode
//! - `ManualClock` - wall clock that only moves when told to
//!
//! For a real gateway, use the `pasp-gateway` crate instead.
//!
//! # Example
//!
//! ```rust
//! use pasp_mock::{IndexClient, MemoryNetwork, TagQuery, Tag};
//!
//! #[tokio::main]
//! async fn main() {
//!     let network = MemoryNetwork::new("addr-test");
//!     network
//!         .insert_document("addr-test", vec![Tag::new("App-Name", "agent-social-protocol")], "hi", Some(10))
//!         .await;
//!
//!     let edges = network.query(&TagQuery::protocol()).await.unwrap();
//!     assert_eq!(edges.len(), 1);
//! }
//! ```

mod bundler;
mod clock;
mod network;

// Re-export pasp-core types for convenience
pub use pasp_core::{
    async_trait, BundlerClient, ClientError, ContentFetcher, IndexClient, LedgerClient,
    PriceOracle, SortOrder, Tag, TagQuery, TransactionEdge, Winc,
};

pub use bundler::{BundlerMode, ScriptedBundler};
pub use clock::ManualClock;
pub use network::MemoryNetwork;
