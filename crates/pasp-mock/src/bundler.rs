//! Scripted bundler.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use pasp_core::{
    async_trait, BundlerClient, BundlerReceipt, ClientError, PriceOracle, Tag, Winc,
};

use crate::network::MemoryNetwork;

/// How the scripted bundler responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlerMode {
    /// Every call succeeds.
    Healthy,
    /// Price and balance work, uploads fail with HTTP 503.
    UploadsDown,
    /// Every call fails with a network error.
    Unreachable,
}

impl BundlerMode {
    fn to_u8(self) -> u8 {
        match self {
            BundlerMode::Healthy => 0,
            BundlerMode::UploadsDown => 1,
            BundlerMode::Unreachable => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => BundlerMode::UploadsDown,
            2 => BundlerMode::Unreachable,
            _ => BundlerMode::Healthy,
        }
    }
}

/// A bundler whose balance, price and availability are set by the test.
///
/// Successful uploads land in the backing [`MemoryNetwork`], owned by the
/// network's wallet, exactly as the signed data item would.
pub struct ScriptedBundler {
    network: Arc<MemoryNetwork>,
    address: String,
    balance: AtomicU64,
    price: AtomicU64,
    mode: AtomicU8,
    price_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    upload_calls: AtomicUsize,
}

impl ScriptedBundler {
    /// Create a healthy bundler with zero balance and zero price.
    pub fn new(network: Arc<MemoryNetwork>) -> Self {
        let address = network.wallet_address().to_string();
        Self {
            network,
            address,
            balance: AtomicU64::new(0),
            price: AtomicU64::new(0),
            mode: AtomicU8::new(BundlerMode::Healthy.to_u8()),
            price_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
        }
    }

    /// Set the starting balance.
    pub fn with_balance(self, balance: Winc) -> Self {
        self.set_balance(balance);
        self
    }

    /// Set the flat price quoted for any paid upload.
    pub fn with_price(self, price: Winc) -> Self {
        self.set_price(price);
        self
    }

    pub fn with_mode(self, mode: BundlerMode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn set_balance(&self, balance: Winc) {
        self.balance.store(balance, Ordering::SeqCst);
    }

    pub fn set_price(&self, price: Winc) {
        self.price.store(price, Ordering::SeqCst);
    }

    pub fn set_mode(&self, mode: BundlerMode) {
        self.mode.store(mode.to_u8(), Ordering::SeqCst);
    }

    pub fn mode(&self) -> BundlerMode {
        BundlerMode::from_u8(self.mode.load(Ordering::SeqCst))
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    fn reachable(&self) -> Result<(), ClientError> {
        match self.mode() {
            BundlerMode::Unreachable => {
                Err(ClientError::Network("connection refused".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PriceOracle for ScriptedBundler {
    async fn price(&self, _size_bytes: u64) -> Result<Winc, ClientError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(self.price.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl BundlerClient for ScriptedBundler {
    async fn balance(&self) -> Result<Winc, ClientError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(self.balance.load(Ordering::SeqCst))
    }

    async fn upload(&self, data: &[u8], tags: &[Tag]) -> Result<BundlerReceipt, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;

        if self.mode() == BundlerMode::UploadsDown {
            return Err(ClientError::Status {
                status: 503,
                message: "bundler unavailable".to_string(),
            });
        }

        let id = self
            .network
            .insert_document(
                self.address.clone(),
                tags.to_vec(),
                String::from_utf8_lossy(data).into_owned(),
                None,
            )
            .await;

        Ok(BundlerReceipt {
            id,
            owner: Some(self.address.clone()),
            winc: Some(0),
        })
    }

    fn address(&self) -> &str {
        &self.address
    }
}
