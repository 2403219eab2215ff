//! Contracts for the external services the protocol runs on.
//!
//! None of these are implemented here. `pasp-gateway` implements the read
//! side over HTTP and `pasp-mock` provides in-memory versions of all of them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cost::Winc;
use crate::error::ClientError;
use crate::query::{TagQuery, TransactionEdge};
use crate::tags::Tag;

/// A transaction created and signed by the ledger client, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub id: String,
    pub data: Vec<u8>,
    pub tags: Vec<Tag>,
    pub signature: Vec<u8>,
}

/// Direct ledger access: create, sign and submit transactions paid from the
/// agent's own wallet.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Create and sign a transaction carrying `data` and `tags`.
    async fn create_transaction(
        &self,
        data: &[u8],
        tags: &[Tag],
    ) -> Result<SignedTransaction, ClientError>;

    /// Submit a signed transaction, returning its identifier.
    async fn submit(&self, transaction: SignedTransaction) -> Result<String, ClientError>;

    /// Address of the wallet this client signs with.
    async fn address(&self) -> Result<String, ClientError>;
}

/// Prices uploads by size.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn price(&self, size_bytes: u64) -> Result<Winc, ClientError>;
}

/// What the bundler returns for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlerReceipt {
    pub id: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub winc: Option<Winc>,
}

/// Subsidised/paid upload service.
#[async_trait]
pub trait BundlerClient: PriceOracle {
    /// Current credit balance in winc.
    async fn balance(&self) -> Result<Winc, ClientError>;

    /// Upload `data` with `tags`.
    async fn upload(&self, data: &[u8], tags: &[Tag]) -> Result<BundlerReceipt, ClientError>;

    /// Address the bundler account is keyed by.
    fn address(&self) -> &str;
}

/// Tag-indexed query service.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Transactions matching every filter in `query`, in service order.
    async fn query(&self, query: &TagQuery) -> Result<Vec<TransactionEdge>, ClientError>;

    /// Envelope of a single transaction, `None` if unknown.
    async fn transaction(&self, id: &str) -> Result<Option<TransactionEdge>, ClientError>;
}

/// Fetches transaction payloads.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<String, ClientError>;
}
