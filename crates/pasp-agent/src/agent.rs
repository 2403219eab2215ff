//! The social agent: protocol actions over the publish and read paths.

use std::sync::Arc;

use pasp_core::{
    build_tags, estimate_upload_cost, winc_to_ar, Action, BundlerClient, Clock,
    CommentMeta, ContentFetcher, Document, FollowMeta, IndexClient, LedgerClient, Metadata,
    PostMeta, ProfileMeta, SortOrder, SystemClock, TagQuery, TransactionEdge, TAG_AGENT_ID,
    TAG_AGENT_NAME,
};
use tracing::{info, warn};

use crate::actions::{
    BalanceReport, CommentInput, CommentReceipt, CostReport, FollowInput, FollowReceipt,
    PostInput, PostQuery, PostReceipt, ProfileInput, ProfileReceipt, PurchaseInfo,
};
use crate::config::SocialConfig;
use crate::error::SocialError;
use crate::markdown::{post_markdown, profile_markdown};
use crate::profile_cache::{Profile, ProfileCache};
use crate::publisher::{PublishReceipt, Publisher};
use crate::thread::{Thread, ThreadAggregator};

/// External services an agent talks to.
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerClient>,
    pub index: Arc<dyn IndexClient>,
    pub content: Arc<dyn ContentFetcher>,
    pub bundler: Option<Arc<dyn BundlerClient>>,
    pub clock: Option<Arc<dyn Clock>>,
}

impl Collaborators {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        index: Arc<dyn IndexClient>,
        content: Arc<dyn ContentFetcher>,
    ) -> Self {
        Self {
            ledger,
            index,
            content,
            bundler: None,
            clock: None,
        }
    }

    pub fn with_bundler(mut self, bundler: Arc<dyn BundlerClient>) -> Self {
        self.bundler = Some(bundler);
        self
    }

    /// Clock for cache expiry (default: system time).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }
}

/// An agent identity publishing to and reading from the social protocol.
///
/// Owns its profile cache; nothing is shared between agents.
pub struct SocialAgent {
    config: SocialConfig,
    wallet_address: String,
    index: Arc<dyn IndexClient>,
    publisher: Publisher,
    profiles: Arc<ProfileCache>,
    threads: ThreadAggregator,
}

impl SocialAgent {
    /// Resolve the wallet address and wire up the publish and read paths.
    pub async fn connect(
        config: SocialConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SocialError> {
        let Collaborators {
            ledger,
            index,
            content,
            bundler,
            clock,
        } = collaborators;

        let wallet_address = ledger.address().await.map_err(SocialError::Identity)?;
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let profiles = Arc::new(ProfileCache::new(
            index.clone(),
            content.clone(),
            clock,
            config.gateway_url.clone(),
            config.profile_cache_ttl,
        ));
        let threads = ThreadAggregator::new(index.clone(), content, config.gateway_url.clone());

        let mut publisher = Publisher::new(ledger, config.free_tier_limit)
            .bundler_enabled(config.use_bundler)
            .with_purchase_url(config.turbo_url.clone())
            .with_profile_cache(profiles.clone());
        if let Some(bundler) = bundler {
            publisher = publisher.with_bundler(bundler);
        }

        info!(
            wallet = %wallet_address,
            gateway = %config.gateway_url,
            bundler = publisher.active_bundler().is_some(),
            "Social agent connected"
        );

        Ok(Self {
            config,
            wallet_address,
            index,
            publisher,
            profiles,
            threads,
        })
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }

    /// The profile cache backing [`get_profile`](Self::get_profile).
    pub fn profile_cache(&self) -> &Arc<ProfileCache> {
        &self.profiles
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn create_profile(
        &self,
        input: ProfileInput,
    ) -> Result<ProfileReceipt, SocialError> {
        let mut meta = ProfileMeta::new(input.agent_name.clone());
        meta.role = input.role;
        meta.description = input.description;
        meta.skills = input.skills;
        meta.website = input.website_url;
        meta.moltbook = input.moltbook_handle;

        let body = profile_markdown(&meta);
        let receipt = self.publish(Metadata::Profile(meta), body).await?;

        Ok(ProfileReceipt {
            url: self.config.content_url(&receipt.tx_id),
            tx_id: receipt.tx_id,
            upload_path: receipt.path,
            agent_name: input.agent_name,
            wallet_address: self.wallet_address.clone(),
        })
    }

    pub async fn publish_post(&self, input: PostInput) -> Result<PostReceipt, SocialError> {
        let mut meta = PostMeta::new(self.own_name().await.unwrap_or_default());
        meta.submolt = input.submolt.clone();
        meta.content_type = input.content_type;
        meta.tags = input.tags.clone();

        let body = post_markdown(&input.title, &input.content);
        let receipt = self.publish(Metadata::Post(meta), body).await?;

        Ok(PostReceipt {
            url: self.config.content_url(&receipt.tx_id),
            tx_id: receipt.tx_id,
            upload_path: receipt.path,
            title: input.title,
            submolt: input.submolt,
            tags: input.tags,
        })
    }

    pub async fn publish_comment(
        &self,
        input: CommentInput,
    ) -> Result<CommentReceipt, SocialError> {
        let mut meta = CommentMeta::new(input.parent_id.clone(), input.thread_id.clone());
        meta.agent_name = self.own_name().await;

        let receipt = self.publish(Metadata::Comment(meta), input.content).await?;

        Ok(CommentReceipt {
            url: self.config.content_url(&receipt.tx_id),
            tx_id: receipt.tx_id,
            upload_path: receipt.path,
            parent_id: input.parent_id,
            thread_id: input.thread_id,
        })
    }

    pub async fn follow_agent(&self, input: FollowInput) -> Result<FollowReceipt, SocialError> {
        let mut meta = FollowMeta::new(input.agent_name.clone(), input.agent_id);
        meta.reason = input.reason.clone();
        meta.agent_name = self.own_name().await;

        let body = if input.reason.is_empty() {
            format!("I'm following {}!", input.agent_name)
        } else {
            input.reason
        };
        let receipt = self.publish(Metadata::Follow(meta), body).await?;

        Ok(FollowReceipt {
            url: self.config.content_url(&receipt.tx_id),
            tx_id: receipt.tx_id,
            upload_path: receipt.path,
            following_agent: input.agent_name,
        })
    }

    async fn publish(
        &self,
        metadata: Metadata,
        body: String,
    ) -> Result<PublishReceipt, SocialError> {
        let tags = build_tags(&metadata, &self.wallet_address);
        let wire = Document::new(metadata, body).encode()?;
        self.publisher.publish(wire.as_bytes(), &tags).await
    }

    /// Own display name for attribution. Lookup failures publish as unnamed.
    async fn own_name(&self) -> Option<String> {
        match self.agent_name().await {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "Could not resolve agent name, publishing without one");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Name from the most recent profile this wallet published.
    pub async fn agent_name(&self) -> Result<Option<String>, SocialError> {
        let query = TagQuery::for_action(Action::Profile)
            .tag(TAG_AGENT_ID, self.wallet_address.as_str())
            .first(1)
            .sort(SortOrder::HeightDesc);

        let edges = self
            .index
            .query(&query)
            .await
            .map_err(SocialError::index_query)?;

        Ok(edges
            .first()
            .and_then(|edge| edge.tag(TAG_AGENT_NAME))
            .map(str::to_string))
    }

    pub async fn get_profile(
        &self,
        agent_name: &str,
        force_refresh: bool,
    ) -> Result<Option<Profile>, SocialError> {
        self.profiles.get(agent_name, force_refresh).await
    }

    pub async fn get_thread(
        &self,
        thread_id: &str,
        include_comments: bool,
    ) -> Result<Thread, SocialError> {
        self.threads.get_thread(thread_id, include_comments).await
    }

    pub async fn query_posts(
        &self,
        query: &PostQuery,
    ) -> Result<Vec<TransactionEdge>, SocialError> {
        self.index
            .query(&query.to_tag_query())
            .await
            .map_err(SocialError::index_query)
    }

    // ------------------------------------------------------------------
    // Bundler account
    // ------------------------------------------------------------------

    pub async fn check_balance(&self) -> Result<BalanceReport, SocialError> {
        let bundler = self.bundler()?;
        let balance = bundler
            .balance()
            .await
            .map_err(SocialError::BundlerServiceFailure)?;

        Ok(BalanceReport {
            balance_winc: balance,
            balance_ar: format!("{:.6}", winc_to_ar(balance)),
            bundler_address: bundler.address().to_string(),
            currency: "arweave".to_string(),
            turbo_url: self.config.turbo_url.clone(),
        })
    }

    pub async fn upload_cost(&self, size_bytes: u64) -> Result<CostReport, SocialError> {
        let bundler = self.bundler()?;
        let limit = self.publisher.free_tier_limit();
        let quote = estimate_upload_cost(size_bytes, limit, bundler.as_ref())
            .await
            .map_err(SocialError::BundlerServiceFailure)?;

        Ok(CostReport {
            size_bytes: quote.size_bytes,
            size_kb: quote.size_kb,
            cost_winc: quote.cost,
            cost_ar: format!("{:.6}", winc_to_ar(quote.cost)),
            is_free: quote.is_free,
            free_tier_limit_kb: limit / 1024,
        })
    }

    pub fn purchase_info(&self) -> Result<PurchaseInfo, SocialError> {
        let bundler = self.bundler()?;

        Ok(PurchaseInfo {
            purchase_url: self.config.turbo_url.clone(),
            address: bundler.address().to_string(),
            minimum_purchase: "$5 USD".to_string(),
            notes: "Visit the URL to purchase credits. Credits are automatically applied to your account."
                .to_string(),
        })
    }

    fn bundler(&self) -> Result<&Arc<dyn BundlerClient>, SocialError> {
        self.publisher
            .active_bundler()
            .ok_or(SocialError::BundlerDisabled)
    }
}
