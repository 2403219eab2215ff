//! Publish path tests against in-memory collaborators.

use std::sync::Arc;

use pasp_agent::{
    Collaborators, CommentInput, FollowInput, PostInput, ProfileInput, SocialAgent,
    SocialConfig, SocialError, UploadPath,
};
use pasp_core::{
    codec, ContentFetcher, Document, IndexClient, Metadata, APP_NAME, PROTOCOL_VERSION,
    TAG_ACTION_TYPE, TAG_AGENT_ID, TAG_AGENT_NAME, TAG_APP_NAME, TAG_PARENT_ID, TAG_SUBMOLT,
    TAG_TAGS, TAG_THREAD_ID, TAG_VERSION, UNKNOWN_AGENT,
};
use pasp_mock::{BundlerMode, MemoryNetwork, ScriptedBundler};

const WALLET: &str = "addr-rakis";

struct Harness {
    network: Arc<MemoryNetwork>,
    bundler: Arc<ScriptedBundler>,
    agent: SocialAgent,
}

async fn harness(config: SocialConfig) -> Harness {
    let network = Arc::new(MemoryNetwork::new(WALLET));
    let bundler = Arc::new(ScriptedBundler::new(network.clone()));
    let collaborators = Collaborators::new(network.clone(), network.clone(), network.clone())
        .with_bundler(bundler.clone());
    let agent = SocialAgent::connect(config, collaborators).await.unwrap();

    Harness {
        network,
        bundler,
        agent,
    }
}

fn config() -> SocialConfig {
    SocialConfig::default().with_gateway_url("https://gw.example")
}

#[tokio::test]
async fn test_create_profile() {
    let h = harness(config()).await;
    let mut input = ProfileInput::new("Rakis");
    input.role = "Archivist".to_string();
    input.skills = vec!["Arweave".to_string()];

    let receipt = h.agent.create_profile(input).await.unwrap();
    assert_eq!(receipt.upload_path, UploadPath::Bundler);
    assert_eq!(receipt.agent_name, "Rakis");
    assert_eq!(receipt.wallet_address, WALLET);
    assert_eq!(receipt.url, format!("https://gw.example/{}", receipt.tx_id));

    let edge = h.network.transaction(&receipt.tx_id).await.unwrap().unwrap();
    assert_eq!(edge.tag(TAG_APP_NAME), Some(APP_NAME));
    assert_eq!(edge.tag(TAG_VERSION), Some(PROTOCOL_VERSION));
    assert_eq!(edge.tag(TAG_ACTION_TYPE), Some("profile"));
    assert_eq!(edge.tag(TAG_AGENT_ID), Some(WALLET));
    assert_eq!(edge.tag(TAG_AGENT_NAME), Some("Rakis"));

    let document = Document::decode(&h.network.fetch(&receipt.tx_id).await.unwrap()).unwrap();
    let Metadata::Profile(meta) = document.metadata else {
        panic!("expected profile metadata");
    };
    assert_eq!(meta.role, "Archivist");
    assert!(document.body.starts_with("# Rakis\n\n**Role:** Archivist"));
    assert!(document.body.contains("- Arweave\n"));
}

#[tokio::test]
async fn test_post_attributed_to_profile_name() {
    let h = harness(config()).await;

    let anonymous = h
        .agent
        .publish_post(PostInput::new("Before", "no profile yet"))
        .await
        .unwrap();
    let edge = h.network.transaction(&anonymous.tx_id).await.unwrap().unwrap();
    assert_eq!(edge.tag(TAG_AGENT_NAME), Some(UNKNOWN_AGENT));

    h.agent.create_profile(ProfileInput::new("Rakis")).await.unwrap();
    assert_eq!(h.agent.agent_name().await.unwrap().as_deref(), Some("Rakis"));

    let input = PostInput::new("Hello", "World")
        .in_submolt("permaweb")
        .with_tags(vec!["arweave".to_string(), "ao".to_string()]);
    let receipt = h.agent.publish_post(input).await.unwrap();
    assert_eq!(receipt.submolt.as_deref(), Some("permaweb"));

    let edge = h.network.transaction(&receipt.tx_id).await.unwrap().unwrap();
    assert_eq!(edge.tag(TAG_AGENT_NAME), Some("Rakis"));
    assert_eq!(edge.tag(TAG_SUBMOLT), Some("permaweb"));
    assert_eq!(edge.tag(TAG_TAGS), Some("arweave,ao"));

    let decoded = codec::decode(&h.network.fetch(&receipt.tx_id).await.unwrap());
    assert_eq!(decoded.body, "# Hello\n\nWorld");
    assert_eq!(decoded.str_field("agent_name"), Some("Rakis"));
}

#[tokio::test]
async fn test_comment_and_follow() {
    let h = harness(config()).await;
    let post = h
        .agent
        .publish_post(PostInput::new("Root", "body"))
        .await
        .unwrap();

    let comment = h
        .agent
        .publish_comment(CommentInput {
            parent_id: post.tx_id.clone(),
            thread_id: post.tx_id.clone(),
            content: "```\n---\nfenced\n---\n```".to_string(),
        })
        .await
        .unwrap();
    let edge = h.network.transaction(&comment.tx_id).await.unwrap().unwrap();
    assert_eq!(edge.tag(TAG_PARENT_ID), Some(post.tx_id.as_str()));
    assert_eq!(edge.tag(TAG_THREAD_ID), Some(post.tx_id.as_str()));

    let decoded = codec::decode(&h.network.fetch(&comment.tx_id).await.unwrap());
    assert_eq!(decoded.body, "```\n---\nfenced\n---\n```");

    let follow = h
        .agent
        .follow_agent(FollowInput {
            agent_name: "Nova".to_string(),
            agent_id: "addr-nova".to_string(),
            reason: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(follow.following_agent, "Nova");

    let decoded = codec::decode(&h.network.fetch(&follow.tx_id).await.unwrap());
    assert_eq!(decoded.body, "I'm following Nova!");
    assert_eq!(decoded.str_field("following_agent_id"), Some("addr-nova"));
    assert_eq!(decoded.str_field("relationship_type"), Some("peer"));
}

#[tokio::test]
async fn test_bundler_outage_falls_back_to_ledger() {
    let h = harness(config()).await;
    h.bundler.set_mode(BundlerMode::UploadsDown);

    let receipt = h
        .agent
        .publish_post(PostInput::new("Degraded", "still lands"))
        .await
        .unwrap();

    assert_eq!(receipt.upload_path, UploadPath::Fallback);
    assert_eq!(h.network.submission_count(), 1);

    let edge = h.network.transaction(&receipt.tx_id).await.unwrap().unwrap();
    assert_eq!(edge.owner, WALLET);
    assert_eq!(edge.tag(TAG_APP_NAME), Some(APP_NAME));
    assert_eq!(edge.tag(TAG_VERSION), Some(PROTOCOL_VERSION));
}

#[tokio::test]
async fn test_insufficient_balance_is_not_downgraded() {
    let h = harness(config().with_free_tier_limit(16)).await;
    h.bundler.set_price(5_000_000_000);
    h.bundler.set_balance(1);

    let err = h
        .agent
        .publish_post(PostInput::new("Too big", "x".repeat(64)))
        .await
        .unwrap_err();

    assert!(matches!(err, SocialError::InsufficientBalance(_)));
    assert!(err.to_string().contains("Connect wallet: addr-rakis"));
    assert_eq!(h.network.submission_count(), 0);
    assert_eq!(h.bundler.upload_calls(), 0);
}

#[tokio::test]
async fn test_disabled_bundler_publishes_directly() {
    let h = harness(config().with_bundler(false)).await;

    let receipt = h
        .agent
        .publish_post(PostInput::new("Direct", "path"))
        .await
        .unwrap();
    assert_eq!(receipt.upload_path, UploadPath::Direct);
    assert_eq!(h.bundler.upload_calls(), 0);

    assert!(matches!(
        h.agent.check_balance().await,
        Err(SocialError::BundlerDisabled)
    ));
    assert!(matches!(h.agent.purchase_info(), Err(SocialError::BundlerDisabled)));
}

#[tokio::test]
async fn test_account_helpers() {
    let h = harness(config().with_free_tier_limit(1024)).await;
    h.bundler.set_balance(1_500_000_000_000);
    h.bundler.set_price(250_000_000);

    let balance = h.agent.check_balance().await.unwrap();
    assert_eq!(balance.balance_winc, 1_500_000_000_000);
    assert_eq!(balance.balance_ar, "1.500000");
    assert_eq!(balance.bundler_address, WALLET);
    assert_eq!(balance.currency, "arweave");

    let free = h.agent.upload_cost(1023).await.unwrap();
    assert!(free.is_free);
    assert_eq!(free.cost_winc, 0);
    assert_eq!(free.free_tier_limit_kb, 1);

    let paid = h.agent.upload_cost(1024).await.unwrap();
    assert!(!paid.is_free);
    assert_eq!(paid.cost_ar, "0.000250");
    assert_eq!(h.bundler.price_calls(), 1);

    let info = h.agent.purchase_info().unwrap();
    assert_eq!(info.purchase_url, "https://turbo.ardrive.io");
    assert_eq!(info.minimum_purchase, "$5 USD");
}

#[tokio::test]
async fn test_direct_failure_surfaces() {
    let h = harness(config().with_bundler(false)).await;
    h.network.fail_submissions(true);

    let err = h
        .agent
        .publish_post(PostInput::new("Lost", "nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, SocialError::DirectUploadFailure(_)));
}
