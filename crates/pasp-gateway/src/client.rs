//! Gateway HTTP client.

use pasp_core::{async_trait, ClientError, ContentFetcher, IndexClient, TagQuery, TransactionEdge};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::api_types::{
    GraphQlRequest, GraphQlResponse, TransactionData, TransactionVariables, TransactionsData,
    TransactionsVariables, TRANSACTIONS_QUERY, TRANSACTION_QUERY,
};
use crate::config::GatewayConfig;

/// Client for a gateway's tag index and content endpoints.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Create a client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn graphql<V, T>(&self, query: &str, variables: V) -> Result<T, ClientError>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        let request = GraphQlRequest { query, variables };

        let response = self
            .http
            .post(&self.config.graphql_url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    body
                },
            });
        }

        parse_response(&body)
    }
}

#[async_trait]
impl IndexClient for GatewayClient {
    async fn query(&self, query: &TagQuery) -> Result<Vec<TransactionEdge>, ClientError> {
        debug!(filters = query.tags.len(), first = ?query.first, "GraphQL transactions query");

        let variables = TransactionsVariables {
            tags: &query.tags,
            first: query.first,
            sort: query.sort,
        };
        let data: TransactionsData = self.graphql(TRANSACTIONS_QUERY, variables).await?;

        Ok(data
            .transactions
            .edges
            .into_iter()
            .map(|edge| edge.node.into())
            .collect())
    }

    async fn transaction(&self, id: &str) -> Result<Option<TransactionEdge>, ClientError> {
        debug!(id, "GraphQL transaction query");

        let data: TransactionData = self
            .graphql(TRANSACTION_QUERY, TransactionVariables { id })
            .await?;
        Ok(data.transaction.map(Into::into))
    }
}

#[async_trait]
impl ContentFetcher for GatewayClient {
    async fn fetch(&self, id: &str) -> Result<String, ClientError> {
        let url = self.config.content_url(id);
        debug!("Fetching content: {}", url);

        let response = self.http.get(&url).send().await.map_err(network_error)?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: format!(
                    "Failed to fetch content: {}",
                    status.canonical_reason().unwrap_or("unknown")
                ),
            });
        }

        response.text().await.map_err(network_error)
    }
}

fn network_error(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

/// Unwrap a GraphQL response body, surfacing `errors` as failures.
fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let response: GraphQlResponse<T> = serde_json::from_str(body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(ClientError::InvalidResponse(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| ClientError::InvalidResponse("response has no data".to_string()))
}
