//! Gateway client for the Permaweb Agent Social Protocol.
//!
//! Implements the read-side collaborators over HTTP:
//!
//! - [`IndexClient`](pasp_core::IndexClient) - GraphQL `transactions` /
//!   `transaction` queries against the gateway's tag index
//! - [`ContentFetcher`](pasp_core::ContentFetcher) - `GET {gateway}/{id}`
//!
//! # Example
//!
//! ```no_run
//! use pasp_gateway::{GatewayClient, GatewayConfig};
//! use pasp_core::{Action, IndexClient, TagQuery};
//!
//! # async fn example() -> Result<(), pasp_core::ClientError> {
//! let client = GatewayClient::new(GatewayConfig::default())?;
//! let posts = client.query(&TagQuery::for_action(Action::Post).first(5)).await?;
//! for post in posts {
//!     println!("{} by {}", post.id, post.owner);
//! }
//! # Ok(())
//! # }
//! ```

mod api_types;
pub mod client;
pub mod config;

pub use client::GatewayClient;
pub use config::GatewayConfig;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
