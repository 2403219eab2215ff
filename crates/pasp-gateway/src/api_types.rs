//! GraphQL request and response types.

use pasp_core::{SortOrder, Tag, TagFilter, TransactionEdge};
use serde::{Deserialize, Serialize};

/// Tag-conjunction search.
pub const TRANSACTIONS_QUERY: &str = r#"query Transactions($tags: [TagFilter!], $first: Int, $sort: SortOrder) {
  transactions(tags: $tags, first: $first, sort: $sort) {
    edges {
      node {
        id
        owner { address }
        tags { name value }
        block { timestamp }
      }
    }
  }
}"#;

/// Single transaction envelope.
pub const TRANSACTION_QUERY: &str = r#"query Transaction($id: ID!) {
  transaction(id: $id) {
    id
    owner { address }
    tags { name value }
    block { timestamp }
  }
}"#;

/// A GraphQL request body.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub struct TransactionsVariables<'a> {
    pub tags: &'a [TagFilter],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Serialize)]
pub struct TransactionVariables<'a> {
    pub id: &'a str,
}

/// A GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsData {
    pub transactions: TransactionConnection,
}

#[derive(Debug, Deserialize)]
pub struct TransactionConnection {
    #[serde(default)]
    pub edges: Vec<TransactionEdgeNode>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionEdgeNode {
    pub node: TransactionNode,
}

#[derive(Debug, Deserialize)]
pub struct TransactionData {
    pub transaction: Option<TransactionNode>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionNode {
    pub id: String,
    pub owner: Owner,
    #[serde(default)]
    pub tags: Vec<NodeTag>,
    pub block: Option<Block>,
}

#[derive(Debug, Deserialize)]
pub struct Owner {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct NodeTag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct Block {
    pub timestamp: u64,
}

impl From<TransactionNode> for TransactionEdge {
    fn from(node: TransactionNode) -> Self {
        Self {
            id: node.id,
            owner: node.owner.address,
            tags: node
                .tags
                .into_iter()
                .map(|tag| Tag::new(tag.name, tag.value))
                .collect(),
            timestamp: node.block.map(|block| block.timestamp),
        }
    }
}
