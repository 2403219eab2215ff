//! Error types for agent operations.

use std::fmt;

use pasp_core::{size_kb, winc_to_ar, winc_to_credits, ClientError, CodecError, Winc};
use thiserror::Error;

/// Errors that can occur while publishing or reading protocol documents.
#[derive(Debug, Error)]
pub enum SocialError {
    /// Paid upload costs more than the bundler balance.
    #[error("{0}")]
    InsufficientBalance(BalanceShortfall),

    /// Bundler transport or service error. Recovered by direct upload.
    #[error("bundler service failure: {0}")]
    BundlerServiceFailure(ClientError),

    /// Ledger submission failed.
    #[error("direct upload failed: {0}")]
    DirectUploadFailure(ClientError),

    /// No transaction exists for the thread root.
    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    /// The tag index answered with a failure.
    #[error("index query failed: {message}")]
    IndexQueryFailure {
        status: Option<u16>,
        message: String,
    },

    /// Content for a known transaction could not be fetched.
    #[error("failed to fetch content for {id}: {source}")]
    ContentFetch { id: String, source: ClientError },

    /// A bundler-only operation was requested without a bundler.
    #[error("bundler is not enabled; set PASP_USE_BUNDLER=true and provide a bundler client")]
    BundlerDisabled,

    /// Metadata could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] CodecError),

    /// The wallet address could not be resolved.
    #[error("identity error: {0}")]
    Identity(ClientError),
}

impl SocialError {
    /// Whether the publish path may recover from this error locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SocialError::BundlerServiceFailure(_))
    }

    pub(crate) fn index_query(error: ClientError) -> Self {
        SocialError::IndexQueryFailure {
            status: error.status(),
            message: error.to_string(),
        }
    }

    pub(crate) fn content_fetch(id: &str, error: ClientError) -> Self {
        SocialError::ContentFetch {
            id: id.to_string(),
            source: error,
        }
    }
}

/// Required and available amounts for a refused paid upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceShortfall {
    pub required: Winc,
    pub available: Winc,
    pub size_bytes: u64,
    pub free_tier_limit: u64,
    pub purchase_url: String,
    pub address: String,
}

impl fmt::Display for BalanceShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Insufficient balance for upload.")?;
        writeln!(
            f,
            "Required: {:.4} USD (~{:.6} AR, {} winc)",
            winc_to_credits(self.required),
            winc_to_ar(self.required),
            self.required
        )?;
        writeln!(
            f,
            "Current: {:.4} USD (~{:.6} AR, {} winc)",
            winc_to_credits(self.available),
            winc_to_ar(self.available),
            self.available
        )?;
        writeln!(f, "File size: {} KB", size_kb(self.size_bytes))?;
        writeln!(f)?;
        writeln!(f, "Free tier limit: {} KB", self.free_tier_limit / 1024)?;
        writeln!(f)?;
        writeln!(f, "To purchase credits:")?;
        writeln!(f, "1. Open: {}", self.purchase_url)?;
        writeln!(f, "2. Connect wallet: {}", self.address)?;
        writeln!(f, "3. Purchase credits (minimum $5 USD)")?;
        writeln!(f)?;
        write!(f, "Credits are automatically applied to your bundler balance.")
    }
}
