//! Upload cost quotes.

use serde::{Deserialize, Serialize};

use crate::client::PriceOracle;
use crate::error::ClientError;
use crate::protocol::WINC_PER_AR;

/// Smallest unit of the payment currency.
pub type Winc = u64;

/// Cost of uploading a payload through the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCostQuote {
    pub size_bytes: u64,
    /// Size in KiB, rounded to nearest.
    pub size_kb: u64,
    /// Price in winc; zero when free.
    pub cost: Winc,
    pub is_free: bool,
}

/// Quote an upload of `size_bytes`.
///
/// Payloads strictly smaller than `free_tier_limit` are free and the oracle
/// is not consulted. Anything else costs whatever the oracle says.
pub async fn estimate_upload_cost<O>(
    size_bytes: u64,
    free_tier_limit: u64,
    oracle: &O,
) -> Result<UploadCostQuote, ClientError>
where
    O: PriceOracle + ?Sized,
{
    let size_kb = size_kb(size_bytes);

    if size_bytes < free_tier_limit {
        return Ok(UploadCostQuote {
            size_bytes,
            size_kb,
            cost: 0,
            is_free: true,
        });
    }

    let cost = oracle.price(size_bytes).await?;
    Ok(UploadCostQuote {
        size_bytes,
        size_kb,
        cost,
        is_free: false,
    })
}

/// Bytes to KiB, rounding half up.
pub fn size_kb(size_bytes: u64) -> u64 {
    size_bytes / 1024 + u64::from(size_bytes % 1024 >= 512)
}

/// Winc to AR.
pub fn winc_to_ar(winc: Winc) -> f64 {
    winc as f64 / WINC_PER_AR as f64
}

/// Winc to bundler credits. Credits are valued 1:1 with USD.
pub fn winc_to_credits(winc: Winc) -> f64 {
    winc as f64 / WINC_PER_AR as f64
}
