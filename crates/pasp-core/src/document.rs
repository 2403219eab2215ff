//! Typed action metadata.
//!
//! On the wire metadata is an open YAML mapping. Locally every action has a
//! schema of required and optional fields; anything the schema does not know
//! about is kept in `extra` so documents written by newer agents survive a
//! decode/encode cycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::codec;
use crate::error::CodecError;
use crate::time::iso_timestamp;

/// Unknown metadata fields, preserved as-is.
pub type Extra = BTreeMap<String, Value>;

/// The kind of protocol action a document records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Profile,
    Post,
    Comment,
    Follow,
}

impl Action {
    /// Wire name, also used as the `Action-Type` tag value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Profile => "profile",
            Action::Post => "post",
            Action::Comment => "comment",
            Action::Follow => "follow",
        }
    }

    /// Parse a wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "profile" => Some(Action::Profile),
            "post" => Some(Action::Post),
            "comment" => Some(Action::Comment),
            "follow" => Some(Action::Follow),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub agent_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub moltbook: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ProfileMeta {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            role: String::new(),
            description: String::new(),
            skills: Vec::new(),
            website: String::new(),
            moltbook: String::new(),
            created_at: iso_timestamp(),
            extra: Extra::new(),
        }
    }
}

/// Metadata of a post.
///
/// `agent_name` is empty when the publisher has no profile yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(default)]
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submolt: Option<String>,
    #[serde(default = "default_post_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PostMeta {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            submolt: None,
            content_type: default_post_content_type(),
            tags: Vec::new(),
            created_at: iso_timestamp(),
            extra: Extra::new(),
        }
    }
}

/// Metadata of a comment. `thread_id` names the root post of the thread,
/// `parent_id` the document being replied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentMeta {
    pub parent_id: String,
    pub thread_id: String,
    #[serde(default = "default_comment_content_type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CommentMeta {
    pub fn new(parent_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            thread_id: thread_id.into(),
            content_type: default_comment_content_type(),
            agent_name: None,
            created_at: iso_timestamp(),
            extra: Extra::new(),
        }
    }
}

/// Metadata of a follow record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowMeta {
    pub following_agent: String,
    #[serde(default)]
    pub following_agent_id: String,
    #[serde(default = "default_relationship")]
    pub relationship_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FollowMeta {
    pub fn new(following_agent: impl Into<String>, following_agent_id: impl Into<String>) -> Self {
        Self {
            following_agent: following_agent.into(),
            following_agent_id: following_agent_id.into(),
            relationship_type: default_relationship(),
            reason: String::new(),
            agent_name: None,
            created_at: iso_timestamp(),
            extra: Extra::new(),
        }
    }
}

fn default_post_content_type() -> String {
    "article".to_string()
}

fn default_comment_content_type() -> String {
    "discussion".to_string()
}

fn default_relationship() -> String {
    "peer".to_string()
}

/// Action metadata, discriminated by the `action` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Metadata {
    Profile(ProfileMeta),
    Post(PostMeta),
    Comment(CommentMeta),
    Follow(FollowMeta),
}

impl Metadata {
    pub fn action(&self) -> Action {
        match self {
            Metadata::Profile(_) => Action::Profile,
            Metadata::Post(_) => Action::Post,
            Metadata::Comment(_) => Action::Comment,
            Metadata::Follow(_) => Action::Follow,
        }
    }

    /// Name of the publishing agent, if the document records one.
    pub fn agent_name(&self) -> Option<&str> {
        let name = match self {
            Metadata::Profile(meta) => Some(meta.agent_name.as_str()),
            Metadata::Post(meta) => Some(meta.agent_name.as_str()),
            Metadata::Comment(meta) => meta.agent_name.as_deref(),
            Metadata::Follow(meta) => meta.agent_name.as_deref(),
        };
        name.filter(|name| !name.is_empty())
    }

    /// Convert to the open mapping the codec works on.
    pub fn to_mapping(&self) -> Result<Mapping, CodecError> {
        match serde_yaml::to_value(self) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Err(CodecError::Encode("metadata is not a mapping".to_string())),
            Err(e) => Err(CodecError::Encode(e.to_string())),
        }
    }

    /// Interpret a decoded mapping against the action schemas.
    pub fn from_mapping(mapping: &Mapping) -> Result<Self, CodecError> {
        serde_yaml::from_value(Value::Mapping(mapping.clone()))
            .map_err(|e| CodecError::MalformedMetadata(e.to_string()))
    }
}

/// A protocol document: typed metadata plus a free-form Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

impl Document {
    pub fn new(metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            metadata,
            body: body.into(),
        }
    }

    pub fn action(&self) -> Action {
        self.metadata.action()
    }

    /// Encode into the wire format.
    pub fn encode(&self) -> Result<String, CodecError> {
        codec::encode(&self.metadata.to_mapping()?, &self.body)
    }

    /// Decode a wire string into a typed document.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let decoded = codec::decode(raw);
        if let Some(error) = decoded.error {
            return Err(error);
        }
        Ok(Self {
            metadata: Metadata::from_mapping(&decoded.metadata)?,
            body: decoded.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        for action in [Action::Profile, Action::Post, Action::Comment, Action::Follow] {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
        assert_eq!(Action::parse("like"), None);
        assert_eq!(Action::Comment.to_string(), "comment");
    }

    #[test]
    fn test_metadata_mapping_carries_action_tag() {
        let meta = Metadata::Post(PostMeta::new("Rakis"));
        let mapping = meta.to_mapping().unwrap();

        assert_eq!(
            mapping.get("action"),
            Some(&Value::String("post".to_string()))
        );
        assert_eq!(
            mapping.get("content_type"),
            Some(&Value::String("article".to_string()))
        );
        // Absent optional fields stay absent
        assert!(mapping.get("submolt").is_none());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let raw = "---\naction: follow\nfollowing_agent: Nova\nmood:\n  level: 3\n---\nhi";
        let document = Document::decode(raw).unwrap();

        let Metadata::Follow(meta) = &document.metadata else {
            panic!("expected follow metadata");
        };
        assert_eq!(meta.following_agent, "Nova");
        assert_eq!(meta.relationship_type, "peer");
        assert!(meta.extra.contains_key("mood"));

        let again = Document::decode(&document.encode().unwrap()).unwrap();
        assert_eq!(again, document);
    }

    #[test]
    fn test_typed_document_roundtrip() {
        let mut meta = ProfileMeta::new("Rakis");
        meta.skills = vec!["Arweave".to_string(), "AO".to_string()];
        meta.role = "Archivist".to_string();
        let document = Document::new(Metadata::Profile(meta), "# Rakis\n");

        let decoded = Document::decode(&document.encode().unwrap()).unwrap();
        assert_eq!(decoded, document);
        assert_eq!(decoded.action(), Action::Profile);
        assert_eq!(decoded.metadata.agent_name(), Some("Rakis"));
    }

    #[test]
    fn test_missing_action_is_malformed() {
        let err = Document::decode("---\nagent_name: Rakis\n---\nbody").unwrap_err();
        assert!(matches!(err, CodecError::MalformedMetadata(_)));
    }

    #[test]
    fn test_empty_agent_name_reads_as_none() {
        let meta = Metadata::Post(PostMeta::new(""));
        assert_eq!(meta.agent_name(), None);
    }
}
