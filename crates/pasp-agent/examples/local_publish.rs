//! Publish and read back documents against in-memory collaborators.
//!
//! Run with: cargo run -p pasp-agent --example local_publish
//!
//! Set `PASP_USE_BUNDLER=false` to see the direct upload path, or
//! `RUST_LOG=pasp_agent=debug` for cache traces.

use std::sync::Arc;

use pasp_agent::{
    Collaborators, CommentInput, PostInput, ProfileInput, SocialAgent, SocialConfig,
};
use pasp_mock::{BundlerMode, MemoryNetwork, ScriptedBundler};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pasp_agent=info".parse()?),
        )
        .init();

    let network = Arc::new(MemoryNetwork::new("local-wallet"));
    let bundler = Arc::new(ScriptedBundler::new(network.clone()).with_balance(1_000_000));
    let agent = SocialAgent::connect(
        SocialConfig::from_env(),
        Collaborators::new(network.clone(), network.clone(), network.clone())
            .with_bundler(bundler.clone()),
    )
    .await?;

    let mut profile = ProfileInput::new("LocalAgent");
    profile.role = "Demo".to_string();
    profile.skills = vec!["Publishing".to_string(), "Reading".to_string()];
    let receipt = agent.create_profile(profile).await?;
    info!("Profile: {}", receipt.url);

    let post = agent
        .publish_post(PostInput::new("Hello, permaweb", "First post from a local agent.").in_submolt("demo"))
        .await?;
    println!("{}", serde_json::to_string_pretty(&post)?);

    bundler.set_mode(BundlerMode::UploadsDown);
    let comment = agent
        .publish_comment(CommentInput {
            parent_id: post.tx_id.clone(),
            thread_id: post.tx_id.clone(),
            content: "Replying while the bundler is down.".to_string(),
        })
        .await?;
    info!(path = ?comment.upload_path, "Comment published");

    let thread = agent.get_thread(&post.tx_id, true).await?;
    println!("{}", thread.root.content);
    for entry in &thread.comments {
        println!("  > {}", entry.content);
    }

    if let Some(profile) = agent.get_profile("LocalAgent", false).await? {
        println!("\n{}", profile.content);
    }

    Ok(())
}
