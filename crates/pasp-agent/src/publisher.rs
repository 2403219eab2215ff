//! Publish orchestration: bundler first, direct ledger upload as fallback.
//!
//! ```text
//! bundler enabled? ──no──────────────────────────────┐
//!      │ yes                                         │
//!  cost check ── paid ── balance check ── short ──▶ InsufficientBalance
//!      │ free              │ ok                      │
//!      └──── bundler upload ──ok──▶ Bundler          │
//!                 │ service failure                  ▼
//!                 └────────────────────────────▶ direct upload ──▶ Fallback / Direct
//! ```
//!
//! At most one fallback per publish; nothing is retried.

use std::sync::Arc;

use pasp_core::{
    estimate_upload_cost, Action, BundlerClient, LedgerClient, TagSet, UploadCostQuote,
    TAG_AGENT_NAME,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{BalanceShortfall, SocialError};
use crate::profile_cache::ProfileCache;

/// Which path a document took to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPath {
    /// Uploaded through the bundler.
    Bundler,
    /// Bundler disabled; submitted to the ledger directly.
    Direct,
    /// Bundler failed; submitted to the ledger directly.
    Fallback,
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub tx_id: String,
    pub path: UploadPath,
    /// Cost quote, if the bundler got far enough to produce one.
    pub quote: Option<UploadCostQuote>,
}

impl PublishReceipt {
    /// Whether the bundler failed and the direct path stood in for it.
    pub fn via_fallback(&self) -> bool {
        self.path == UploadPath::Fallback
    }
}

/// Uploads encoded documents.
pub struct Publisher {
    ledger: Arc<dyn LedgerClient>,
    bundler: Option<Arc<dyn BundlerClient>>,
    use_bundler: bool,
    free_tier_limit: u64,
    purchase_url: String,
    profile_cache: Option<Arc<ProfileCache>>,
}

impl Publisher {
    /// Create a publisher that uploads directly to the ledger.
    pub fn new(ledger: Arc<dyn LedgerClient>, free_tier_limit: u64) -> Self {
        Self {
            ledger,
            bundler: None,
            use_bundler: true,
            free_tier_limit,
            purchase_url: String::new(),
            profile_cache: None,
        }
    }

    /// Try this bundler before the ledger.
    pub fn with_bundler(mut self, bundler: Arc<dyn BundlerClient>) -> Self {
        self.bundler = Some(bundler);
        self
    }

    /// Enable or disable the bundler path without removing the client.
    pub fn bundler_enabled(mut self, enabled: bool) -> Self {
        self.use_bundler = enabled;
        self
    }

    /// Where to send users whose balance is too low.
    pub fn with_purchase_url(mut self, url: impl Into<String>) -> Self {
        self.purchase_url = url.into();
        self
    }

    /// Invalidate profile entries in this cache when a profile is published.
    pub fn with_profile_cache(mut self, cache: Arc<ProfileCache>) -> Self {
        self.profile_cache = Some(cache);
        self
    }

    /// The bundler, if the bundler path is active.
    pub fn active_bundler(&self) -> Option<&Arc<dyn BundlerClient>> {
        self.bundler.as_ref().filter(|_| self.use_bundler)
    }

    pub fn free_tier_limit(&self) -> u64 {
        self.free_tier_limit
    }

    /// Upload `content` with `tags` and return where it landed.
    pub async fn publish(
        &self,
        content: &[u8],
        tags: &TagSet,
    ) -> Result<PublishReceipt, SocialError> {
        let receipt = match self.active_bundler() {
            None => self.upload_direct(content, tags, UploadPath::Direct).await?,
            Some(bundler) => match self.upload_via_bundler(bundler, content, tags).await {
                Ok(receipt) => receipt,
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "Bundler upload failed, falling back to direct upload");
                    self.upload_direct(content, tags, UploadPath::Fallback).await?
                }
                Err(e) => return Err(e),
            },
        };

        info!(
            tx_id = %receipt.tx_id,
            path = ?receipt.path,
            size = content.len(),
            "Published document"
        );

        if tags.action() == Some(Action::Profile) {
            if let (Some(cache), Some(agent_name)) = (&self.profile_cache, tags.get(TAG_AGENT_NAME)) {
                cache.invalidate(agent_name).await;
            }
        }

        Ok(receipt)
    }

    async fn upload_via_bundler(
        &self,
        bundler: &Arc<dyn BundlerClient>,
        content: &[u8],
        tags: &TagSet,
    ) -> Result<PublishReceipt, SocialError> {
        let size = content.len() as u64;
        let quote = estimate_upload_cost(size, self.free_tier_limit, bundler.as_ref())
            .await
            .map_err(SocialError::BundlerServiceFailure)?;
        debug!(size, is_free = quote.is_free, cost = quote.cost, "Upload cost");

        if !quote.is_free {
            let balance = bundler
                .balance()
                .await
                .map_err(SocialError::BundlerServiceFailure)?;

            if balance < quote.cost {
                return Err(SocialError::InsufficientBalance(BalanceShortfall {
                    required: quote.cost,
                    available: balance,
                    size_bytes: size,
                    free_tier_limit: self.free_tier_limit,
                    purchase_url: self.purchase_url.clone(),
                    address: bundler.address().to_string(),
                }));
            }
        }

        let uploaded = bundler
            .upload(content, &tags.to_tags())
            .await
            .map_err(SocialError::BundlerServiceFailure)?;

        Ok(PublishReceipt {
            tx_id: uploaded.id,
            path: UploadPath::Bundler,
            quote: Some(quote),
        })
    }

    async fn upload_direct(
        &self,
        content: &[u8],
        tags: &TagSet,
        path: UploadPath,
    ) -> Result<PublishReceipt, SocialError> {
        let tags = tags.clone().with_protocol_tags().to_tags();

        let transaction = self
            .ledger
            .create_transaction(content, &tags)
            .await
            .map_err(SocialError::DirectUploadFailure)?;
        let tx_id = self
            .ledger
            .submit(transaction)
            .await
            .map_err(SocialError::DirectUploadFailure)?;

        Ok(PublishReceipt {
            tx_id,
            path,
            quote: None,
        })
    }
}
