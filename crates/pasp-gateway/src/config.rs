//! Configuration for the gateway client.

use std::env;
use std::time::Duration;

/// Default gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the gateway lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL for content fetches (e.g., "https://arweave.net").
    pub base_url: String,
    /// GraphQL endpoint of the tag index.
    pub graphql_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Configuration for a gateway serving GraphQL at `{base_url}/graphql`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            graphql_url: format!("{}/graphql", base_url),
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a separate GraphQL endpoint.
    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// - `PASP_GATEWAY_URL` - gateway base URL (default: https://arweave.net)
    /// - `PASP_GRAPHQL_ENDPOINT` - GraphQL endpoint (default: `{gateway}/graphql`)
    /// - `PASP_GATEWAY_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Self {
        let base_url =
            env::var("PASP_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(url) = env::var("PASP_GRAPHQL_ENDPOINT") {
            config.graphql_url = url;
        }

        if let Some(secs) = env::var("PASP_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// URL of a transaction's payload.
    pub fn content_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}
