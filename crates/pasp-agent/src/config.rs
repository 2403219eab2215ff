//! Configuration for the social agent.

use std::env;
use std::time::Duration;

use pasp_core::DEFAULT_FREE_TIER_LIMIT;

/// Default gateway for content URLs and queries.
pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

/// Default bundler credit portal.
pub const DEFAULT_TURBO_URL: &str = "https://turbo.ardrive.io";

/// Default profile cache lifetime.
pub const DEFAULT_PROFILE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Configuration for a [`SocialAgent`](crate::SocialAgent).
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Gateway base URL; document URLs are `{gateway_url}/{tx_id}`.
    pub gateway_url: String,

    /// GraphQL endpoint of the tag index.
    pub graphql_endpoint: String,

    /// How long a fetched profile is served from cache.
    pub profile_cache_ttl: Duration,

    /// Try the bundler before uploading directly.
    pub use_bundler: bool,

    /// Where bundler credits are purchased.
    pub turbo_url: String,

    /// Payloads strictly smaller than this many bytes upload for free.
    pub free_tier_limit: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            graphql_endpoint: format!("{}/graphql", DEFAULT_GATEWAY_URL),
            profile_cache_ttl: DEFAULT_PROFILE_CACHE_TTL,
            use_bundler: true,
            turbo_url: DEFAULT_TURBO_URL.to_string(),
            free_tier_limit: DEFAULT_FREE_TIER_LIMIT,
        }
    }
}

impl SocialConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `PASP_GATEWAY_URL` - Gateway URL (default: https://arweave.net)
    /// - `PASP_GRAPHQL_ENDPOINT` - GraphQL endpoint (default: `{gateway}/graphql`)
    /// - `PASP_PROFILE_CACHE_TTL_SECS` - Profile cache TTL (default: 3600)
    /// - `PASP_USE_BUNDLER` - Use the bundler path (default: true)
    /// - `PASP_TURBO_URL` - Credit purchase URL (default: https://turbo.ardrive.io)
    /// - `PASP_FREE_TIER_LIMIT_BYTES` - Free upload threshold (default: 512000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let gateway_url = env::var("PASP_GATEWAY_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.gateway_url);

        let graphql_endpoint = env::var("PASP_GRAPHQL_ENDPOINT")
            .unwrap_or_else(|_| format!("{}/graphql", gateway_url));

        let profile_cache_ttl = env::var("PASP_PROFILE_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.profile_cache_ttl);

        let use_bundler = env::var("PASP_USE_BUNDLER")
            .ok()
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.use_bundler);

        let turbo_url = env::var("PASP_TURBO_URL").unwrap_or(defaults.turbo_url);

        let free_tier_limit = env::var("PASP_FREE_TIER_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.free_tier_limit);

        Self {
            gateway_url,
            graphql_endpoint,
            profile_cache_ttl,
            use_bundler,
            turbo_url,
            free_tier_limit,
        }
    }

    /// Set the gateway. The GraphQL endpoint follows it.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into().trim_end_matches('/').to_string();
        self.graphql_endpoint = format!("{}/graphql", self.gateway_url);
        self
    }

    pub fn with_graphql_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql_endpoint = endpoint.into();
        self
    }

    pub fn with_profile_cache_ttl(mut self, ttl: Duration) -> Self {
        self.profile_cache_ttl = ttl;
        self
    }

    pub fn with_bundler(mut self, enabled: bool) -> Self {
        self.use_bundler = enabled;
        self
    }

    pub fn with_turbo_url(mut self, url: impl Into<String>) -> Self {
        self.turbo_url = url.into();
        self
    }

    pub fn with_free_tier_limit(mut self, bytes: u64) -> Self {
        self.free_tier_limit = bytes;
        self
    }

    /// Public URL of a transaction.
    pub fn content_url(&self, tx_id: &str) -> String {
        format!("{}/{}", self.gateway_url, tx_id)
    }
}
