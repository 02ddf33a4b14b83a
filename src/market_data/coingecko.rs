//! CoinGecko markets provider (primary)

use chrono::Utc;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::MarketDataProvider;
use super::rest::RestClient;
use super::types::{CoinRecord, FetchError};

pub const PROVIDER_NAME: &str = "coingecko";

/// Raw market entry as returned by `/api/v3/coins/markets`
#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub ath: Option<f64>,
    pub atl: Option<f64>,
}

impl CoinGeckoMarket {
    /// Normalize into a [`CoinRecord`]; entries without a price are unusable
    pub fn into_record(self) -> Option<CoinRecord> {
        let current_price = self.current_price?;
        Some(CoinRecord {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            current_price,
            market_cap: self.market_cap.unwrap_or(0.0),
            total_volume: self.total_volume.unwrap_or(0.0),
            market_cap_rank: self.market_cap_rank,
            price_change_percentage_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            ath: self.ath.unwrap_or(current_price),
            atl: self.atl.unwrap_or(current_price),
            image: self.image,
        })
    }
}

/// Ranked top-N market listing with cache-defeating request headers
pub struct CoinGeckoProvider {
    rest: RestClient,
    base_url: String,
    page_size: u32,
    timeout: Duration,
}

impl CoinGeckoProvider {
    pub fn new(rest: RestClient, base_url: impl Into<String>, page_size: u32, timeout: Duration) -> Self {
        Self {
            rest,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size,
            timeout,
        }
    }

    async fn fetch_markets(&self) -> Result<Vec<CoinRecord>, FetchError> {
        let url = format!("{}/api/v3/coins/markets", self.base_url);
        let cache_buster = Utc::now().timestamp_millis().to_string();
        let page_size = self.page_size.to_string();

        debug!("Fetching market listing from: {}", url);

        let request = self
            .rest
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", page_size.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
                ("_", cache_buster.as_str()),
            ])
            .header(
                reqwest::header::CACHE_CONTROL,
                "no-cache, no-store, must-revalidate",
            )
            .header(reqwest::header::PRAGMA, "no-cache")
            .header(reqwest::header::EXPIRES, "0");

        let markets: Vec<CoinGeckoMarket> = self
            .rest
            .send_json(PROVIDER_NAME, request, self.timeout)
            .await?;

        let received = markets.len();
        let records: Vec<CoinRecord> = markets
            .into_iter()
            .filter_map(CoinGeckoMarket::into_record)
            .collect();

        info!(
            "Fetched {} markets from {} ({} without price skipped)",
            records.len(),
            PROVIDER_NAME,
            received - records.len()
        );

        Ok(records)
    }
}

impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<CoinRecord>, FetchError>> {
        Box::pin(self.fetch_markets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_with_nulls_is_normalized() {
        let market: CoinGeckoMarket = serde_json::from_value(serde_json::json!({
            "id": "newcoin",
            "symbol": "new",
            "name": "New Coin",
            "image": null,
            "current_price": 2.5,
            "market_cap": null,
            "market_cap_rank": null,
            "total_volume": 10.0,
            "price_change_percentage_24h": null,
            "ath": null,
            "atl": 0.5
        }))
        .unwrap();

        let record = market.into_record().unwrap();
        assert_eq!(record.current_price, 2.5);
        assert_eq!(record.market_cap, 0.0);
        assert_eq!(record.market_cap_rank, None);
        assert_eq!(record.ath, 2.5);
        assert_eq!(record.atl, 0.5);
    }

    #[test]
    fn test_market_without_price_is_dropped() {
        let market: CoinGeckoMarket = serde_json::from_value(serde_json::json!({
            "id": "ghost",
            "symbol": "gho",
            "name": "Ghost",
            "current_price": null
        }))
        .unwrap();

        assert!(market.into_record().is_none());
    }
}
