//! Thread reconstruction.

use std::sync::Arc;

use pasp_core::codec;
use pasp_core::{
    Action, CodecError, ContentFetcher, IndexClient, Tag, TagQuery, TransactionEdge,
    TAG_THREAD_ID,
};
use serde_yaml::Mapping;
use tracing::debug;

use crate::error::SocialError;

/// A document together with its network envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub tx_id: String,
    pub url: String,
    pub owner: String,
    pub tags: Vec<Tag>,
    /// Block timestamp; `None` while pending.
    pub timestamp: Option<u64>,
    pub metadata: Mapping,
    pub content: String,
    pub decode_error: Option<CodecError>,
}

impl ThreadEntry {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}

/// A root document and its comments, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub root: ThreadEntry,
    pub comments: Vec<ThreadEntry>,
}

/// Rebuilds threads from the tag index.
pub struct ThreadAggregator {
    index: Arc<dyn IndexClient>,
    content: Arc<dyn ContentFetcher>,
    gateway_url: String,
}

impl ThreadAggregator {
    pub fn new(
        index: Arc<dyn IndexClient>,
        content: Arc<dyn ContentFetcher>,
        gateway_url: impl Into<String>,
    ) -> Self {
        Self {
            index,
            content,
            gateway_url: gateway_url.into(),
        }
    }

    /// Fetch the root `thread_id` and, optionally, every comment on it.
    ///
    /// Comments are sorted by block timestamp with a stable sort; pending
    /// comments come last in the order the index returned them. The comment
    /// query is not paginated.
    pub async fn get_thread(
        &self,
        thread_id: &str,
        include_comments: bool,
    ) -> Result<Thread, SocialError> {
        let root = self
            .index
            .transaction(thread_id)
            .await
            .map_err(SocialError::index_query)?
            .ok_or_else(|| SocialError::ThreadNotFound(thread_id.to_string()))?;
        let root = self.load(root).await?;

        if !include_comments {
            return Ok(Thread {
                root,
                comments: Vec::new(),
            });
        }

        let query = TagQuery::for_action(Action::Comment).tag(TAG_THREAD_ID, thread_id);
        let edges = self
            .index
            .query(&query)
            .await
            .map_err(SocialError::index_query)?;
        debug!(thread_id, comments = edges.len(), "Loading thread comments");

        let mut comments = Vec::with_capacity(edges.len());
        for edge in edges {
            comments.push(self.load(edge).await?);
        }
        comments.sort_by_key(|entry| entry.timestamp.unwrap_or(u64::MAX));

        Ok(Thread { root, comments })
    }

    async fn load(&self, edge: TransactionEdge) -> Result<ThreadEntry, SocialError> {
        let raw = self
            .content
            .fetch(&edge.id)
            .await
            .map_err(|e| SocialError::content_fetch(&edge.id, e))?;
        let decoded = codec::decode(&raw);

        Ok(ThreadEntry {
            url: format!("{}/{}", self.gateway_url, edge.id),
            tx_id: edge.id,
            owner: edge.owner,
            tags: edge.tags,
            timestamp: edge.timestamp,
            metadata: decoded.metadata,
            content: decoded.body,
            decode_error: decoded.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasp_core::{build_tags, CommentMeta, Document, Metadata, PostMeta};
    use pasp_mock::MemoryNetwork;

    async fn seed_post(network: &MemoryNetwork) -> String {
        let metadata = Metadata::Post(PostMeta::new("Rakis"));
        let tags = build_tags(&metadata, "addr-rakis").to_tags();
        let wire = Document::new(metadata, "# Root\n\nHello").encode().unwrap();
        network.insert_document("addr-rakis", tags, wire, Some(5)).await
    }

    async fn seed_comment(
        network: &MemoryNetwork,
        thread_id: &str,
        body: &str,
        timestamp: Option<u64>,
    ) -> String {
        let metadata = Metadata::Comment(CommentMeta::new(thread_id, thread_id));
        let tags = build_tags(&metadata, "addr-nova").to_tags();
        let wire = Document::new(metadata, body).encode().unwrap();
        network.insert_document("addr-nova", tags, wire, timestamp).await
    }

    fn aggregator(network: &Arc<MemoryNetwork>) -> ThreadAggregator {
        ThreadAggregator::new(network.clone(), network.clone(), "https://gw.example")
    }

    fn bodies(thread: &Thread) -> Vec<&str> {
        thread.comments.iter().map(|c| c.content.as_str()).collect()
    }

    #[tokio::test]
    async fn test_comments_sorted_by_timestamp() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let root = seed_post(&network).await;
        seed_comment(&network, &root, "thirty", Some(30)).await;
        seed_comment(&network, &root, "ten", Some(10)).await;
        seed_comment(&network, &root, "twenty", Some(20)).await;

        let thread = aggregator(&network).get_thread(&root, true).await.unwrap();
        assert_eq!(thread.root.tx_id, root);
        assert_eq!(thread.root.content, "# Root\n\nHello");
        assert_eq!(thread.root.timestamp, Some(5));
        assert_eq!(bodies(&thread), vec!["ten", "twenty", "thirty"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_query_order() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let root = seed_post(&network).await;
        seed_comment(&network, &root, "pending-a", None).await;
        seed_comment(&network, &root, "b", Some(7)).await;
        seed_comment(&network, &root, "c", Some(7)).await;
        seed_comment(&network, &root, "pending-d", None).await;
        seed_comment(&network, &root, "a", Some(3)).await;

        let thread = aggregator(&network).get_thread(&root, true).await.unwrap();
        assert_eq!(bodies(&thread), vec!["a", "b", "c", "pending-a", "pending-d"]);
    }

    #[tokio::test]
    async fn test_other_threads_excluded() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let root = seed_post(&network).await;
        let other = seed_post(&network).await;
        seed_comment(&network, &root, "mine", Some(1)).await;
        seed_comment(&network, &other, "theirs", Some(2)).await;

        let thread = aggregator(&network).get_thread(&root, true).await.unwrap();
        assert_eq!(bodies(&thread), vec!["mine"]);
        assert_eq!(thread.comments[0].tag(TAG_THREAD_ID), Some(root.as_str()));
    }

    #[tokio::test]
    async fn test_without_comments_skips_query() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let root = seed_post(&network).await;
        seed_comment(&network, &root, "hidden", Some(1)).await;

        let thread = aggregator(&network).get_thread(&root, false).await.unwrap();
        assert!(thread.comments.is_empty());
        assert_eq!(network.query_count(), 1);
        assert_eq!(network.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_root() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let err = aggregator(&network).get_thread("nope", true).await.unwrap_err();
        assert!(matches!(err, SocialError::ThreadNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_undecodable_comment_kept_raw() {
        let network = Arc::new(MemoryNetwork::new("addr-me"));
        let root = seed_post(&network).await;
        let tags = build_tags(
            &Metadata::Comment(CommentMeta::new(root.clone(), root.clone())),
            "addr-nova",
        )
        .to_tags();
        network
            .insert_document("addr-nova", tags, "plain text reply", Some(1))
            .await;

        let thread = aggregator(&network).get_thread(&root, true).await.unwrap();
        assert_eq!(thread.comments[0].decode_error, Some(CodecError::NoFrontMatter));
        assert_eq!(thread.comments[0].content, "plain text reply");
    }
}
