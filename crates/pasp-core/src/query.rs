//! Tag-conjunction queries and the envelopes they return.

use serde::{Deserialize, Serialize};

use crate::document::Action;
use crate::protocol::{APP_NAME, TAG_ACTION_TYPE, TAG_APP_NAME};
use crate::tags::Tag;

/// Matches transactions carrying tag `name` with any of `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl TagFilter {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn matches(&self, tags: &[Tag]) -> bool {
        tags.iter()
            .any(|tag| tag.name == self.name && self.values.iter().any(|v| *v == tag.value))
    }
}

/// Result ordering by block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    HeightDesc,
}

/// A conjunction of tag filters with an optional result limit and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub tags: Vec<TagFilter>,
    pub first: Option<usize>,
    pub sort: Option<SortOrder>,
}

impl TagQuery {
    /// Everything published under this protocol.
    pub fn protocol() -> Self {
        Self::default().tag(TAG_APP_NAME, APP_NAME)
    }

    /// Protocol documents of one action type.
    pub fn for_action(action: Action) -> Self {
        Self::protocol().tag(TAG_ACTION_TYPE, action.as_str())
    }

    pub fn tag(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tag_any(name, vec![value.into()])
    }

    pub fn tag_any(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.tags.push(TagFilter::new(name, values));
        self
    }

    pub fn first(mut self, first: usize) -> Self {
        self.first = Some(first);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Whether a transaction with `tags` satisfies every filter.
    pub fn matches(&self, tags: &[Tag]) -> bool {
        self.tags.iter().all(|filter| filter.matches(tags))
    }
}

/// Envelope of an indexed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEdge {
    pub id: String,
    pub owner: String,
    pub tags: Vec<Tag>,
    /// Block timestamp in seconds; `None` while pending.
    pub timestamp: Option<u64>,
}

impl TransactionEdge {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}
