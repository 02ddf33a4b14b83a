//! Market-wide statistics shown as summary cards

use std::time::Duration;
use tracing::{info, warn};

use super::coingecko::PROVIDER_NAME;
use super::rest::RestClient;

/// Counts of CoinGecko catalog entries; `None` when a lookup failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketStatistics {
    pub categories: Option<usize>,
    pub exchanges: Option<usize>,
    pub asset_platforms: Option<usize>,
    pub market_indexes: Option<usize>,
}

/// Fetches the catalog counts once per dashboard session
pub struct StatisticsClient {
    rest: RestClient,
    base_url: String,
    timeout: Duration,
}

impl StatisticsClient {
    pub fn new(rest: RestClient, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            rest,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Query all four catalogs concurrently. Individual failures are logged
    /// and leave that count empty.
    pub async fn fetch(&self) -> MarketStatistics {
        let (categories, exchanges, asset_platforms, market_indexes) = tokio::join!(
            self.count("/api/v3/coins/categories/list"),
            self.count("/api/v3/exchanges/list"),
            self.count("/api/v3/asset_platforms"),
            self.count("/api/v3/indexes"),
        );

        let stats = MarketStatistics {
            categories,
            exchanges,
            asset_platforms,
            market_indexes,
        };
        info!("Market statistics loaded: {:?}", stats);
        stats
    }

    async fn count(&self, path: &str) -> Option<usize> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.rest.get(&url);

        match self
            .rest
            .send_json::<Vec<serde_json::Value>>(PROVIDER_NAME, request, self.timeout)
            .await
        {
            Ok(entries) => Some(entries.len()),
            Err(e) => {
                warn!("Failed to load {}: {}", path, e);
                None
            }
        }
    }
}
