//! Market data providers and the ordered fallback source

pub mod coincap;
pub mod coingecko;
pub mod rest;
pub mod sample;
pub mod statistics;
pub mod types;

use futures_util::future::BoxFuture;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ProvidersConfig;

pub use coincap::CoinCapProvider;
pub use coingecko::CoinGeckoProvider;
pub use rest::RestClient;
pub use sample::SampleDataGenerator;
pub use statistics::{MarketStatistics, StatisticsClient};
pub use types::{CoinRecord, FetchError, FetchedMarkets};

/// A single source of coin listings
///
/// Each call is one attempt; the caller owns retry cadence.
pub trait MarketDataProvider: Send + Sync {
    /// Short stable name used in logs and metrics
    fn name(&self) -> &'static str;

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<CoinRecord>, FetchError>>;
}

/// Ranked provider chain, tried in order until one yields data
pub struct MarketDataSource {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl MarketDataSource {
    pub fn new(providers: Vec<Box<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    /// Build the CoinGecko → CoinCap → sample chain from configuration
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let rest = RestClient::new();
        let mut providers: Vec<Box<dyn MarketDataProvider>> = vec![
            Box::new(CoinGeckoProvider::new(
                rest.clone(),
                config.coingecko_url.clone(),
                config.primary_page_size,
                Duration::from_secs(config.primary_timeout_secs),
            )),
            Box::new(CoinCapProvider::new(
                rest,
                config.coincap_url.clone(),
                config.secondary_limit,
                Duration::from_secs(config.secondary_timeout_secs),
            )),
        ];

        if config.enable_sample_fallback {
            providers.push(Box::new(SampleDataGenerator::new()));
        }

        Self::new(providers)
    }

    /// Names of the configured providers, in fallback order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run one fetch cycle across the chain
    pub async fn fetch(&self) -> Result<FetchedMarkets, FetchError> {
        for provider in &self.providers {
            let name = provider.name();
            debug!("Requesting market data from {}", name);

            match provider.fetch().await {
                Ok(coins) if coins.is_empty() => {
                    let e = FetchError::ProviderMalformedResponse {
                        provider: name,
                        reason: "no usable records".to_string(),
                    };
                    warn!("Provider {} failed: {}", name, e);
                }
                Ok(coins) => {
                    let coins = dedup_by_id(coins);
                    info!("Market data served by {}: {} coins", name, coins.len());
                    return Ok(FetchedMarkets {
                        source: name,
                        coins,
                    });
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", name, e);
                }
            }
        }

        Err(FetchError::AllProvidersExhausted {
            attempted: self.providers.len(),
        })
    }
}

/// Keep the first record for every id
fn dedup_by_id(coins: Vec<CoinRecord>) -> Vec<CoinRecord> {
    let before = coins.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<CoinRecord> = coins
        .into_iter()
        .filter(|coin| seen.insert(coin.id.clone()))
        .collect();

    if unique.len() != before {
        warn!("Dropped {} duplicate coin ids", before - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        name: &'static str,
        result: Result<Vec<CoinRecord>, FetchError>,
        calls: Arc<AtomicUsize>,
    }

    impl MarketDataProvider for FixedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn fetch(&self) -> BoxFuture<'_, Result<Vec<CoinRecord>, FetchError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            Box::pin(async move { result })
        }
    }

    fn coin(id: &str) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_uppercase(),
            current_price: 1.0,
            market_cap: 1.0,
            total_volume: 1.0,
            market_cap_rank: None,
            price_change_percentage_24h: 0.0,
            ath: 2.0,
            atl: 0.5,
            image: None,
        }
    }

    fn provider(
        name: &'static str,
        result: Result<Vec<CoinRecord>, FetchError>,
    ) -> (Box<dyn MarketDataProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(FixedProvider {
                name,
                result,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let (primary, primary_calls) = provider("primary", Ok(vec![coin("a"), coin("b")]));
        let (secondary, secondary_calls) = provider("secondary", Ok(vec![coin("c")]));
        let source = MarketDataSource::new(vec![primary, secondary]);

        let fetched = source.fetch().await.unwrap();
        assert_eq!(fetched.source, "primary");
        assert_eq!(fetched.coins.len(), 2);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_and_failed_providers_are_skipped() {
        let (empty, _) = provider("empty", Ok(vec![]));
        let (timeout, _) = provider(
            "slow",
            Err(FetchError::ProviderTimeout {
                provider: "slow",
                timeout: Duration::from_secs(1),
            }),
        );
        let (last, _) = provider("last", Ok(vec![coin("z")]));
        let source = MarketDataSource::new(vec![empty, timeout, last]);

        let fetched = source.fetch().await.unwrap();
        assert_eq!(fetched.source, "last");
        assert_eq!(fetched.coins[0].id, "z");
    }

    #[tokio::test]
    async fn test_all_providers_exhausted() {
        let (a, _) = provider(
            "a",
            Err(FetchError::ProviderMalformedResponse {
                provider: "a",
                reason: "not an array".to_string(),
            }),
        );
        let (b, _) = provider(
            "b",
            Err(FetchError::ProviderUnavailable {
                provider: "b",
                reason: "HTTP error 503".to_string(),
            }),
        );
        let source = MarketDataSource::new(vec![a, b]);

        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, FetchError::AllProvidersExhausted { attempted: 2 });
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let mut dup = coin("a");
        dup.current_price = 99.0;
        let (primary, _) = provider("primary", Ok(vec![coin("a"), coin("b"), dup]));
        let source = MarketDataSource::new(vec![primary]);

        let fetched = source.fetch().await.unwrap();
        assert_eq!(fetched.coins.len(), 2);
        assert_eq!(fetched.coins[0].current_price, 1.0);
    }

    #[test]
    fn test_from_config_orders_providers() {
        let mut config = ProvidersConfig::default();
        assert_eq!(
            MarketDataSource::from_config(&config).provider_names(),
            vec!["coingecko", "coincap", "sample"]
        );

        config.enable_sample_fallback = false;
        assert_eq!(
            MarketDataSource::from_config(&config).provider_names(),
            vec!["coingecko", "coincap"]
        );
    }
}
