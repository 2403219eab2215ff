//! Inputs and results of the protocol actions.

use pasp_core::{
    Action, TagQuery, TAG_AGENT_NAME, TAG_CONTENT_TYPE, TAG_SUBMOLT, TAG_TAGS,
};
use serde::{Deserialize, Serialize};

use crate::publisher::UploadPath;

/// Profile to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub agent_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub moltbook_handle: String,
}

impl ProfileInput {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            ..Default::default()
        }
    }
}

/// Post to publish. The body becomes `# {title}\n\n{content}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub submolt: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            submolt: None,
            content_type: default_content_type(),
            tags: Vec::new(),
        }
    }

    pub fn in_submolt(mut self, submolt: impl Into<String>) -> Self {
        self.submolt = Some(submolt.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

fn default_content_type() -> String {
    "article".to_string()
}

/// Comment to publish; `content` is the verbatim body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInput {
    pub parent_id: String,
    pub thread_id: String,
    pub content: String,
}

/// Follow record to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowInput {
    pub agent_name: String,
    pub agent_id: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileReceipt {
    pub tx_id: String,
    pub url: String,
    pub upload_path: UploadPath,
    pub agent_name: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostReceipt {
    pub tx_id: String,
    pub url: String,
    pub upload_path: UploadPath,
    pub title: String,
    pub submolt: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentReceipt {
    pub tx_id: String,
    pub url: String,
    pub upload_path: UploadPath,
    pub parent_id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowReceipt {
    pub tx_id: String,
    pub url: String,
    pub upload_path: UploadPath,
    pub following_agent: String,
}

/// Post search filters. Every filter present must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostQuery {
    #[serde(default)]
    pub submolt: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Posts carrying any of these tag strings.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            submolt: None,
            content_type: None,
            agent_name: None,
            tags: Vec::new(),
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    10
}

impl PostQuery {
    pub fn to_tag_query(&self) -> TagQuery {
        let mut query = TagQuery::for_action(Action::Post);

        if let Some(submolt) = self.submolt.as_deref().filter(|s| !s.is_empty()) {
            query = query.tag(TAG_SUBMOLT, submolt);
        }
        if let Some(content_type) = self.content_type.as_deref().filter(|s| !s.is_empty()) {
            query = query.tag(TAG_CONTENT_TYPE, content_type);
        }
        if let Some(agent_name) = self.agent_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.tag(TAG_AGENT_NAME, agent_name);
        }
        if !self.tags.is_empty() {
            query = query.tag_any(TAG_TAGS, self.tags.clone());
        }

        query.first(self.limit)
    }
}

/// Bundler balance of the agent's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub balance_winc: u64,
    /// AR with six decimals.
    pub balance_ar: String,
    pub bundler_address: String,
    pub currency: String,
    pub turbo_url: String,
}

/// Cost of uploading a payload through the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostReport {
    pub size_bytes: u64,
    pub size_kb: u64,
    pub cost_winc: u64,
    /// AR with six decimals.
    pub cost_ar: String,
    pub is_free: bool,
    pub free_tier_limit_kb: u64,
}

/// Where and how to buy bundler credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseInfo {
    pub purchase_url: String,
    pub address: String,
    pub minimum_purchase: String,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasp_core::{TagFilter, TAG_ACTION_TYPE};

    #[test]
    fn test_default_post_query() {
        let query = PostQuery::default().to_tag_query();
        assert_eq!(query.first, Some(10));
        assert_eq!(query.tags.len(), 2);
        assert_eq!(
            query.tags[1],
            TagFilter::new(TAG_ACTION_TYPE, vec!["post".to_string()])
        );
    }

    #[test]
    fn test_post_query_filters() {
        let query = PostQuery {
            submolt: Some("permaweb".to_string()),
            content_type: Some(String::new()),
            agent_name: Some("Rakis".to_string()),
            tags: vec!["ao".to_string(), "arweave".to_string()],
            limit: 3,
        }
        .to_tag_query();

        let names: Vec<&str> = query.tags.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["App-Name", TAG_ACTION_TYPE, TAG_SUBMOLT, TAG_AGENT_NAME, TAG_TAGS]
        );
        assert_eq!(query.tags[4].values, vec!["ao", "arweave"]);
        assert_eq!(query.first, Some(3));
    }

    #[test]
    fn test_post_input_defaults() {
        let input: PostInput =
            serde_json::from_str(r#"{"title": "T", "content": "C"}"#).unwrap();
        assert_eq!(input.content_type, "article");
        assert_eq!(input.submolt, None);
        assert_eq!(PostInput::new("T", "C"), input);
    }
}
