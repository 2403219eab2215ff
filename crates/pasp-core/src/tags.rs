//! Transaction tags and the rules that derive them from metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{Action, Metadata};
use crate::protocol::{
    APP_NAME, PROTOCOL_VERSION, TAG_ACTION_TYPE, TAG_AGENT_ID, TAG_AGENT_NAME, TAG_APP_NAME,
    TAG_CONTENT_TYPE, TAG_PARENT_ID, TAG_SUBMOLT, TAG_TAGS, TAG_THREAD_ID, TAG_VERSION,
    UNKNOWN_AGENT,
};

/// A single name/value tag as sent to the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A tag value before it is flattened to a string.
///
/// Lists are comma-joined. Embedded commas are not escaped, so a list item
/// containing a comma reads back as two items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    List(Vec<String>),
}

impl TagValue {
    pub fn into_string(self) -> String {
        match self {
            TagValue::Text(text) => text,
            TagValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<&String> for TagValue {
    fn from(value: &String) -> Self {
        TagValue::Text(value.clone())
    }
}

impl From<Vec<String>> for TagValue {
    fn from(value: Vec<String>) -> Self {
        TagValue::List(value)
    }
}

impl From<&[String]> for TagValue {
    fn from(value: &[String]) -> Self {
        TagValue::List(value.to_vec())
    }
}

impl From<u64> for TagValue {
    fn from(value: u64) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Text(value.to_string())
    }
}

/// Ordered tag mapping. Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: IndexMap<String, String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the protocol-mandatory tags.
    pub fn protocol() -> Self {
        Self::new().with_protocol_tags()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TagValue>) {
        self.tags.insert(name.into(), value.into().into_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `Action-Type` of the tagged document, if recognised.
    pub fn action(&self) -> Option<Action> {
        self.get(TAG_ACTION_TYPE).and_then(Action::parse)
    }

    /// (Re)apply `App-Name` and `Version`, overriding whatever was there.
    pub fn with_protocol_tags(mut self) -> Self {
        self.insert(TAG_APP_NAME, APP_NAME);
        self.insert(TAG_VERSION, PROTOCOL_VERSION);
        self
    }

    pub fn to_tags(&self) -> Vec<Tag> {
        self.tags
            .iter()
            .map(|(name, value)| Tag::new(name.clone(), value.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<TagValue>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Derive the index tags for a document published by `agent_id`.
pub fn build_tags(metadata: &Metadata, agent_id: &str) -> TagSet {
    let mut tags = TagSet::protocol();
    tags.insert(TAG_ACTION_TYPE, metadata.action().as_str());
    tags.insert(TAG_AGENT_ID, agent_id);

    match metadata {
        Metadata::Profile(meta) => {
            tags.insert(TAG_AGENT_NAME, &meta.agent_name);
        }
        Metadata::Post(meta) => {
            tags.insert(TAG_AGENT_NAME, agent_or_unknown(Some(meta.agent_name.as_str())));
            if let Some(submolt) = meta.submolt.as_deref().filter(|s| !s.is_empty()) {
                tags.insert(TAG_SUBMOLT, submolt);
            }
            if !meta.content_type.is_empty() {
                tags.insert(TAG_CONTENT_TYPE, &meta.content_type);
            }
            if !meta.tags.is_empty() {
                tags.insert(TAG_TAGS, meta.tags.as_slice());
            }
        }
        Metadata::Comment(meta) => {
            tags.insert(TAG_AGENT_NAME, agent_or_unknown(meta.agent_name.as_deref()));
            tags.insert(TAG_PARENT_ID, &meta.parent_id);
            tags.insert(TAG_THREAD_ID, &meta.thread_id);
        }
        Metadata::Follow(meta) => {
            tags.insert(TAG_AGENT_NAME, agent_or_unknown(meta.agent_name.as_deref()));
        }
    }

    tags
}

fn agent_or_unknown(name: Option<&str>) -> &str {
    name.filter(|name| !name.is_empty()).unwrap_or(UNKNOWN_AGENT)
}
