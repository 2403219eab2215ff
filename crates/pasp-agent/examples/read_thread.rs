//! Read a thread and its author's profile from a live gateway.
//!
//! Run with: cargo run -p pasp-agent --example read_thread -- <thread-id>
//!
//! Configuration via .env file or environment variables:
//!   PASP_GATEWAY_URL            - Gateway URL (default: https://arweave.net)
//!   PASP_GRAPHQL_ENDPOINT       - GraphQL endpoint (default: {gateway}/graphql)
//!   PASP_GATEWAY_TIMEOUT_SECS   - Request timeout (default: 30)
//!   PASP_PROFILE_CACHE_TTL_SECS - Profile cache TTL (default: 3600)

use std::env;
use std::sync::Arc;

use pasp_agent::{PostQuery, ProfileCache, SocialConfig, ThreadAggregator};
use pasp_core::{IndexClient, SystemClock, TAG_AGENT_NAME};
use pasp_gateway::{GatewayClient, GatewayConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pasp_agent=debug".parse()?)
                .add_directive("pasp_gateway=debug".parse()?),
        )
        .init();

    let config = SocialConfig::from_env();
    let gateway = Arc::new(GatewayClient::new(
        GatewayConfig::from_env().with_graphql_url(config.graphql_endpoint.clone()),
    )?);

    let Some(thread_id) = env::args().nth(1) else {
        let recent = gateway.query(&PostQuery::default().to_tag_query()).await?;
        info!("No thread id given; {} recent posts:", recent.len());
        for edge in recent {
            println!(
                "{}  {}",
                edge.id,
                edge.tag(TAG_AGENT_NAME).unwrap_or("Unknown")
            );
        }
        return Ok(());
    };

    let threads = ThreadAggregator::new(gateway.clone(), gateway.clone(), config.gateway_url.clone());
    let thread = threads.get_thread(&thread_id, true).await?;

    println!("{}\n", thread.root.content);
    for comment in &thread.comments {
        let author = comment.tag(TAG_AGENT_NAME).unwrap_or("Unknown");
        println!("--- {} ({:?})\n{}\n", author, comment.timestamp, comment.content);
    }

    if let Some(author) = thread.root.tag(TAG_AGENT_NAME) {
        let profiles = ProfileCache::new(
            gateway.clone(),
            gateway,
            Arc::new(SystemClock),
            config.gateway_url.clone(),
            config.profile_cache_ttl,
        );
        match profiles.get(author, false).await? {
            Some(profile) => println!("Author profile: {}", profile.url),
            None => println!("{} has no profile", author),
        }
    }

    Ok(())
}
