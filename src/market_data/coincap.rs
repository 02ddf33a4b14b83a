//! CoinCap assets provider (secondary)
//!
//! CoinCap has no all-time-high/low data. Those fields are synthesized as a
//! fixed multiple of the current price and must not be read as history.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::MarketDataProvider;
use super::rest::RestClient;
use super::types::{CoinRecord, FetchError};

pub const PROVIDER_NAME: &str = "coincap";

/// Synthesized all-time-high as a multiple of current price
pub const ATH_PRICE_MULTIPLIER: f64 = 1.5;
/// Synthesized all-time-low as a fraction of current price
pub const ATL_PRICE_MULTIPLIER: f64 = 0.2;

/// Envelope returned by `/v2/assets`
#[derive(Debug, Deserialize)]
pub struct CoinCapResponse {
    pub data: Vec<CoinCapAsset>,
}

/// Asset entry with numbers encoded as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinCapAsset {
    pub id: String,
    pub rank: Option<String>,
    pub symbol: String,
    pub name: String,
    pub price_usd: Option<String>,
    pub market_cap_usd: Option<String>,
    #[serde(rename = "volumeUsd24Hr")]
    pub volume_usd_24hr: Option<String>,
    #[serde(rename = "changePercent24Hr")]
    pub change_percent_24hr: Option<String>,
}

impl CoinCapAsset {
    /// Coerce string fields into a [`CoinRecord`]; unparsable prices drop the asset
    pub fn into_record(self) -> Option<CoinRecord> {
        let current_price = parse_number(self.price_usd.as_deref())?;
        Some(CoinRecord {
            id: self.id,
            symbol: self.symbol.to_lowercase(),
            name: self.name,
            current_price,
            market_cap: parse_number(self.market_cap_usd.as_deref()).unwrap_or(0.0),
            total_volume: parse_number(self.volume_usd_24hr.as_deref()).unwrap_or(0.0),
            market_cap_rank: self.rank.as_deref().and_then(|r| r.trim().parse().ok()),
            price_change_percentage_24h: parse_number(self.change_percent_24hr.as_deref())
                .unwrap_or(0.0),
            ath: current_price * ATH_PRICE_MULTIPLIER,
            atl: current_price * ATL_PRICE_MULTIPLIER,
            image: None,
        })
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Fixed-size asset listing with a differently-shaped schema
pub struct CoinCapProvider {
    rest: RestClient,
    base_url: String,
    limit: u32,
    timeout: Duration,
}

impl CoinCapProvider {
    pub fn new(rest: RestClient, base_url: impl Into<String>, limit: u32, timeout: Duration) -> Self {
        Self {
            rest,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
            timeout,
        }
    }

    async fn fetch_assets(&self) -> Result<Vec<CoinRecord>, FetchError> {
        let url = format!("{}/v2/assets", self.base_url);
        debug!("Fetching asset listing from: {}", url);

        let request = self.rest.get(&url).query(&[("limit", self.limit)]);
        let response: CoinCapResponse = self
            .rest
            .send_json(PROVIDER_NAME, request, self.timeout)
            .await?;

        let records: Vec<CoinRecord> = response
            .data
            .into_iter()
            .filter_map(CoinCapAsset::into_record)
            .collect();

        info!("Fetched {} assets from {}", records.len(), PROVIDER_NAME);
        Ok(records)
    }
}

impl MarketDataProvider for CoinCapProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<CoinRecord>, FetchError>> {
        Box::pin(self.fetch_assets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(json: serde_json::Value) -> CoinCapAsset {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_asset_string_fields_are_coerced() {
        let record = asset(serde_json::json!({
            "id": "bitcoin",
            "rank": "1",
            "symbol": "BTC",
            "name": "Bitcoin",
            "priceUsd": "60000.50",
            "marketCapUsd": "1200000000000",
            "volumeUsd24Hr": "35000000000.1",
            "changePercent24Hr": "-1.25"
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.symbol, "btc");
        assert_eq!(record.market_cap_rank, Some(1));
        assert_eq!(record.current_price, 60000.5);
        assert_eq!(record.price_change_percentage_24h, -1.25);
        assert!((record.ath - 90000.75).abs() < 1e-6);
        assert!((record.atl - 12000.1).abs() < 1e-6);
        assert!(record.image.is_none());
    }

    #[test]
    fn test_asset_missing_optional_numbers_default_to_zero() {
        let record = asset(serde_json::json!({
            "id": "tiny",
            "rank": null,
            "symbol": "TNY",
            "name": "Tiny",
            "priceUsd": "0.001",
            "marketCapUsd": null,
            "volumeUsd24Hr": "not-a-number",
            "changePercent24Hr": null
        }))
        .into_record()
        .unwrap();

        assert_eq!(record.market_cap, 0.0);
        assert_eq!(record.total_volume, 0.0);
        assert_eq!(record.market_cap_rank, None);
    }

    #[test]
    fn test_asset_without_price_is_dropped() {
        let dropped = asset(serde_json::json!({
            "id": "void",
            "symbol": "VOID",
            "name": "Void",
            "priceUsd": null
        }))
        .into_record();
        assert!(dropped.is_none());
    }
}
