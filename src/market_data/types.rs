//! Normalized market data types and provider error taxonomy

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One cryptocurrency's market snapshot, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub market_cap_rank: Option<u32>,
    pub price_change_percentage_24h: f64,
    pub ath: f64,
    pub atl: f64,
    pub image: Option<String>,
}

/// A successful fetch together with the provider that served it
#[derive(Debug, Clone)]
pub struct FetchedMarkets {
    pub source: &'static str,
    pub coins: Vec<CoinRecord>,
}

/// Error types for market data providers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("{provider} timed out after {timeout:?}")]
    ProviderTimeout {
        provider: &'static str,
        timeout: Duration,
    },
    #[error("{provider} returned a malformed response: {reason}")]
    ProviderMalformedResponse {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} request failed: {reason}")]
    ProviderUnavailable {
        provider: &'static str,
        reason: String,
    },
    #[error("all {attempted} market data providers failed")]
    AllProvidersExhausted { attempted: usize },
}

impl FetchError {
    /// Classify a reqwest error raised while talking to `provider`
    pub fn from_reqwest(provider: &'static str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::ProviderTimeout { provider, timeout }
        } else if err.is_decode() {
            FetchError::ProviderMalformedResponse {
                provider,
                reason: err.to_string(),
            }
        } else {
            FetchError::ProviderUnavailable {
                provider,
                reason: err.to_string(),
            }
        }
    }
}
