//! In-memory ledger, tag index and content store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use pasp_core::{
    async_trait, ClientError, ContentFetcher, IndexClient, LedgerClient, SignedTransaction,
    SortOrder, Tag, TagQuery, TransactionEdge,
};
use tokio::sync::Mutex;

struct Stored {
    edge: TransactionEdge,
    body: String,
}

#[derive(Default)]
struct State {
    transactions: Vec<Stored>,
    next_id: u64,
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("mock-tx-{}", self.next_id)
    }
}

/// A storage network that lives in memory.
///
/// Acts as ledger (direct uploads), tag index and content gateway at once,
/// so anything published through it is immediately queryable. Insertion
/// order stands in for block height. Transactions submitted through the
/// ledger interface are pending and carry no timestamp.
pub struct MemoryNetwork {
    address: String,
    state: Mutex<State>,
    fail_submit: AtomicBool,
    fail_query: AtomicBool,
    fail_fetch: AtomicBool,
    submissions: AtomicUsize,
    queries: AtomicUsize,
    fetches: AtomicUsize,
}

impl MemoryNetwork {
    /// Create an empty network whose ledger signs as `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            state: Mutex::new(State::default()),
            fail_submit: AtomicBool::new(false),
            fail_query: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            submissions: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Address of the signing wallet.
    pub fn wallet_address(&self) -> &str {
        &self.address
    }

    /// Seed a document directly, bypassing the ledger. Returns its id.
    pub async fn insert_document(
        &self,
        owner: impl Into<String>,
        tags: Vec<Tag>,
        body: impl Into<String>,
        timestamp: Option<u64>,
    ) -> String {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        state.transactions.push(Stored {
            edge: TransactionEdge {
                id: id.clone(),
                owner: owner.into(),
                tags,
                timestamp,
            },
            body: body.into(),
        });
        id
    }

    /// Body of a stored transaction.
    pub async fn body(&self, id: &str) -> Option<String> {
        let state = self.state.lock().await;
        state
            .transactions
            .iter()
            .find(|stored| stored.edge.id == id)
            .map(|stored| stored.body.clone())
    }

    /// Number of stored transactions.
    pub async fn len(&self) -> usize {
        self.state.lock().await.transactions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Make ledger submissions fail.
    pub fn fail_submissions(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    /// Make index queries fail with HTTP 502.
    pub fn fail_queries(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    /// Make content fetches fail with HTTP 503.
    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Ledger submissions attempted.
    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Index queries served, including single-transaction lookups.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Content fetches attempted.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for MemoryNetwork {
    async fn create_transaction(
        &self,
        data: &[u8],
        tags: &[Tag],
    ) -> Result<SignedTransaction, ClientError> {
        let id = self.state.lock().await.allocate_id();
        Ok(SignedTransaction {
            signature: format!("signed:{}:{}", self.address, id).into_bytes(),
            id,
            data: data.to_vec(),
            tags: tags.to_vec(),
        })
    }

    async fn submit(&self, transaction: SignedTransaction) -> Result<String, ClientError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected(format!(
                "transaction {} rejected",
                transaction.id
            )));
        }

        let mut state = self.state.lock().await;
        state.transactions.push(Stored {
            edge: TransactionEdge {
                id: transaction.id.clone(),
                owner: self.address.clone(),
                tags: transaction.tags,
                timestamp: None,
            },
            body: String::from_utf8_lossy(&transaction.data).into_owned(),
        });
        Ok(transaction.id)
    }

    async fn address(&self) -> Result<String, ClientError> {
        Ok(self.address.clone())
    }
}

#[async_trait]
impl IndexClient for MemoryNetwork {
    async fn query(&self, query: &TagQuery) -> Result<Vec<TransactionEdge>, ClientError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.fail_query.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 502,
                message: "index unavailable".to_string(),
            });
        }

        let state = self.state.lock().await;
        let matching = state
            .transactions
            .iter()
            .filter(|stored| query.matches(&stored.edge.tags))
            .map(|stored| stored.edge.clone());

        let mut edges: Vec<TransactionEdge> = match query.sort {
            Some(SortOrder::HeightDesc) => matching.rev().collect(),
            _ => matching.collect(),
        };
        if let Some(first) = query.first {
            edges.truncate(first);
        }
        Ok(edges)
    }

    async fn transaction(&self, id: &str) -> Result<Option<TransactionEdge>, ClientError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.fail_query.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 502,
                message: "index unavailable".to_string(),
            });
        }

        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .find(|stored| stored.edge.id == id)
            .map(|stored| stored.edge.clone()))
    }
}

#[async_trait]
impl ContentFetcher for MemoryNetwork {
    async fn fetch(&self, id: &str) -> Result<String, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                message: "gateway busy".to_string(),
            });
        }

        self.body(id).await.ok_or_else(|| ClientError::Status {
            status: 404,
            message: format!("{} not found", id),
        })
    }
}
