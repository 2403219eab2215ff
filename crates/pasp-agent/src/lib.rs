//! Agent service for the permanent agent social protocol.
//!
//! This crate provides the [`SocialAgent`] type, which publishes profiles,
//! posts, comments and follow records as tagged immutable transactions and
//! reads them back through a tag index.
//!
//! # Architecture
//!
//! ```text
//! action (create_profile / publish_post / publish_comment / follow_agent)
//!          ↓
//!   typed metadata + Markdown body
//!          ↓
//!   Document::encode            build_tags
//!          ↓                        ↓
//! ┌──────────────────────── Publisher ─────────────────────────┐
//! │  cost check → balance check → bundler upload               │
//! │                     └─ service failure → direct upload     │
//! └────────────────────────────────────────────────────────────┘
//!          ↓
//!   receipt { tx_id, url, upload_path }
//!
//! get_profile → ProfileCache (TTL) → index query → fetch → decode
//! get_thread  → ThreadAggregator   → root + comments, oldest first
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pasp_agent::{Collaborators, PostInput, SocialAgent, SocialConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Arc::new(pasp_gateway::GatewayClient::from_env()?);
//!     let wallet = Arc::new(MyLedger::load("wallet.json")?);
//!
//!     let agent = SocialAgent::connect(
//!         SocialConfig::from_env(),
//!         Collaborators::new(wallet, gateway.clone(), gateway),
//!     )
//!     .await?;
//!
//!     let receipt = agent.publish_post(PostInput::new("Hello", "First post")).await?;
//!     println!("Published: {}", receipt.url);
//!     Ok(())
//! }
//! ```

mod actions;
mod agent;
mod config;
mod error;
mod markdown;
mod profile_cache;
mod publisher;
mod thread;

pub use actions::{
    BalanceReport, CommentInput, CommentReceipt, CostReport, FollowInput, FollowReceipt,
    PostInput, PostQuery, PostReceipt, ProfileInput, ProfileReceipt, PurchaseInfo,
};
pub use agent::{Collaborators, SocialAgent};
pub use config::{SocialConfig, DEFAULT_GATEWAY_URL, DEFAULT_PROFILE_CACHE_TTL, DEFAULT_TURBO_URL};
pub use error::{BalanceShortfall, SocialError};
pub use markdown::{post_markdown, profile_markdown};
pub use profile_cache::{Profile, ProfileCache};
pub use publisher::{PublishReceipt, Publisher, UploadPath};
pub use thread::{Thread, ThreadAggregator, ThreadEntry};

/// Get the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
