//! Time-bounded profile lookups.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use pasp_core::codec;
use pasp_core::{
    Action, Clock, CodecError, ContentFetcher, IndexClient, SortOrder, TagQuery, TAG_AGENT_NAME,
};
use serde_yaml::Mapping;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SocialError;

/// An agent profile as read back from the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub tx_id: String,
    pub url: String,
    /// Decoded front matter, empty if the document failed to decode.
    pub metadata: Mapping,
    /// Markdown body, or the raw document if it failed to decode.
    pub content: String,
    pub owner: String,
    pub decode_error: Option<CodecError>,
}

struct Entry {
    profile: Profile,
    stored_at: u64,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
    /// Bumped on every invalidation so a fetch that started earlier cannot
    /// store its result afterwards.
    generations: HashMap<String, u64>,
}

impl State {
    fn generation(&self, agent_name: &str) -> u64 {
        self.generations.get(agent_name).copied().unwrap_or_default()
    }
}

/// Profile lookups keyed by agent name, memoized for a fixed TTL.
///
/// Only hits are cached. An entry is stale once `now - stored_at >= ttl`;
/// stale entries stay in the map until overwritten or invalidated.
pub struct ProfileCache {
    index: Arc<dyn IndexClient>,
    content: Arc<dyn ContentFetcher>,
    clock: Arc<dyn Clock>,
    gateway_url: String,
    ttl: Duration,
    state: Mutex<State>,
}

impl ProfileCache {
    pub fn new(
        index: Arc<dyn IndexClient>,
        content: Arc<dyn ContentFetcher>,
        clock: Arc<dyn Clock>,
        gateway_url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            index,
            content,
            clock,
            gateway_url: gateway_url.into(),
            ttl,
            state: Mutex::new(State::default()),
        }
    }

    /// Look up the most recent profile published under `agent_name`.
    ///
    /// Returns `Ok(None)` when the index has no such profile.
    pub async fn get(
        &self,
        agent_name: &str,
        force_refresh: bool,
    ) -> Result<Option<Profile>, SocialError> {
        let generation = {
            let state = self.state.lock().await;
            if !force_refresh {
                if let Some(entry) = state.entries.get(agent_name) {
                    if self.is_fresh(entry) {
                        debug!(agent_name, "Profile cache hit");
                        return Ok(Some(entry.profile.clone()));
                    }
                }
            }
            state.generation(agent_name)
        };

        debug!(agent_name, force_refresh, "Profile cache miss, querying index");
        let Some(profile) = self.fetch(agent_name).await? else {
            return Ok(None);
        };

        let mut state = self.state.lock().await;
        if state.generation(agent_name) == generation {
            state.entries.insert(
                agent_name.to_string(),
                Entry {
                    profile: profile.clone(),
                    stored_at: self.clock.now_millis(),
                },
            );
        } else {
            debug!(agent_name, "Profile invalidated during fetch, not caching");
        }

        Ok(Some(profile))
    }

    /// Drop the entry for `agent_name` and discard any fetch in flight.
    pub async fn invalidate(&self, agent_name: &str) {
        let mut state = self.state.lock().await;
        state.entries.remove(agent_name);
        *state.generations.entry(agent_name.to_string()).or_default() += 1;
        debug!(agent_name, "Profile cache entry invalidated");
    }

    /// Whether a fresh entry exists for `agent_name`.
    pub async fn is_cached(&self, agent_name: &str) -> bool {
        let state = self.state.lock().await;
        state
            .entries
            .get(agent_name)
            .is_some_and(|entry| self.is_fresh(entry))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        let age = self.clock.now_millis().saturating_sub(entry.stored_at);
        u128::from(age) < self.ttl.as_millis()
    }

    async fn fetch(&self, agent_name: &str) -> Result<Option<Profile>, SocialError> {
        let query = TagQuery::for_action(Action::Profile)
            .tag(TAG_AGENT_NAME, agent_name)
            .first(1)
            .sort(SortOrder::HeightDesc);

        let edges = self
            .index
            .query(&query)
            .await
            .map_err(SocialError::index_query)?;
        let Some(edge) = edges.into_iter().next() else {
            return Ok(None);
        };

        let raw = self
            .content
            .fetch(&edge.id)
            .await
            .map_err(|e| SocialError::content_fetch(&edge.id, e))?;
        let decoded = codec::decode(&raw);

        Ok(Some(Profile {
            url: format!("{}/{}", self.gateway_url, edge.id),
            tx_id: edge.id,
            metadata: decoded.metadata,
            content: decoded.body,
            owner: edge.owner,
            decode_error: decoded.error,
        }))
    }
}
