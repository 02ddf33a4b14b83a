//! Provider chain behaviour against mocked HTTP endpoints

use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinpulse::config::ProvidersConfig;
use coinpulse::market_data::{FetchError, MarketDataSource, RestClient, StatisticsClient};

fn providers_config(server: &MockServer) -> ProvidersConfig {
    ProvidersConfig {
        coingecko_url: server.uri(),
        coincap_url: server.uri(),
        primary_timeout_secs: 1,
        secondary_timeout_secs: 1,
        ..ProvidersConfig::default()
    }
}

fn gecko_markets(n: usize) -> Value {
    let markets: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "id": format!("coin-{}", i),
                "symbol": format!("c{}", i),
                "name": format!("Coin {}", i),
                "image": "https://example.com/coin.png",
                "current_price": 100.0 + i as f64,
                "market_cap": 1_000_000.0,
                "market_cap_rank": i + 1,
                "total_volume": 5_000.0,
                "price_change_percentage_24h": -1.5,
                "ath": 500.0,
                "atl": 1.0
            })
        })
        .collect();
    Value::Array(markets)
}

fn coincap_assets() -> Value {
    json!({
        "data": [
            {
                "id": "bitcoin",
                "rank": "1",
                "symbol": "BTC",
                "name": "Bitcoin",
                "priceUsd": "40000.0",
                "marketCapUsd": "780000000000",
                "volumeUsd24Hr": "12000000000",
                "changePercent24Hr": "2.5"
            },
            {
                "id": "ethereum",
                "rank": "2",
                "symbol": "ETH",
                "name": "Ethereum",
                "priceUsd": "2500.0",
                "marketCapUsd": "300000000000",
                "volumeUsd24Hr": "8000000000",
                "changePercent24Hr": "-1.0"
            }
        ]
    })
}

async fn mount_primary(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_secondary(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v2/assets"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_primary_serves_full_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("order", "market_cap_desc"))
        .and(query_param("per_page", "250"))
        .and(query_param("page", "1"))
        .and(query_param("sparkline", "false"))
        .and(header("Cache-Control", "no-cache, no-store, must-revalidate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gecko_markets(250)))
        .expect(1)
        .mount(&server)
        .await;

    let source = MarketDataSource::from_config(&providers_config(&server));
    let fetched = source.fetch().await.expect("primary should serve");

    assert_eq!(fetched.source, "coingecko");
    assert_eq!(fetched.coins.len(), 250);
    assert_eq!(fetched.coins[0].market_cap_rank, Some(1));
}

#[tokio::test]
async fn test_empty_primary_falls_back_to_secondary() {
    let server = MockServer::start().await;
    mount_primary(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
    Mock::given(method("GET"))
        .and(path("/v2/assets"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(coincap_assets()))
        .expect(1)
        .mount(&server)
        .await;

    let source = MarketDataSource::from_config(&providers_config(&server));
    let fetched = source.fetch().await.expect("secondary should serve");

    assert_eq!(fetched.source, "coincap");
    assert_eq!(fetched.coins.len(), 2);

    let btc = &fetched.coins[0];
    assert_eq!(btc.symbol, "btc");
    assert_eq!(btc.current_price, 40000.0);
    assert_eq!(btc.ath, 60000.0);
    assert_eq!(btc.atl, 8000.0);
    assert_eq!(btc.market_cap_rank, Some(1));
    assert!(btc.image.is_none());
}

#[tokio::test]
async fn test_primary_timeout_falls_back() {
    let server = MockServer::start().await;
    mount_primary(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(gecko_markets(5))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_secondary(&server, ResponseTemplate::new(200).set_body_json(coincap_assets())).await;

    let source = MarketDataSource::from_config(&providers_config(&server));
    let fetched = source.fetch().await.expect("secondary should serve");

    assert_eq!(fetched.source, "coincap");
}

#[tokio::test]
async fn test_malformed_responses_fall_back_to_sample() {
    let server = MockServer::start().await;
    mount_primary(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
    mount_secondary(&server, ResponseTemplate::new(503)).await;

    let source = MarketDataSource::from_config(&providers_config(&server));
    let fetched = source.fetch().await.expect("sample data never fails");

    assert_eq!(fetched.source, "sample");
    assert_eq!(fetched.coins.len(), 10);
}

#[tokio::test]
async fn test_exhausted_without_sample_fallback() {
    let server = MockServer::start().await;
    mount_primary(&server, ResponseTemplate::new(500)).await;
    mount_secondary(&server, ResponseTemplate::new(200).set_body_json(json!({ "data": [] }))).await;

    let config = ProvidersConfig {
        enable_sample_fallback: false,
        ..providers_config(&server)
    };
    let source = MarketDataSource::from_config(&config);

    assert_eq!(
        source.fetch().await.unwrap_err(),
        FetchError::AllProvidersExhausted { attempted: 2 }
    );
}

#[tokio::test]
async fn test_duplicate_ids_are_dropped() {
    let server = MockServer::start().await;
    let mut markets = gecko_markets(3);
    if let Value::Array(items) = &mut markets {
        let duplicate = items[0].clone();
        items.push(duplicate);
        items.push(json!({ "id": "priceless", "symbol": "x", "name": "X", "current_price": null }));
    }
    mount_primary(&server, ResponseTemplate::new(200).set_body_json(markets)).await;

    let source = MarketDataSource::from_config(&providers_config(&server));
    let fetched = source.fetch().await.unwrap();

    assert_eq!(fetched.coins.len(), 3);
}

#[tokio::test]
async fn test_statistics_counts_and_partial_failure() {
    let server = MockServer::start().await;
    let list = |n: usize| Value::Array((0..n).map(|i| json!({ "id": i })).collect());

    for (route, body) in [
        ("/api/v3/coins/categories/list", list(4)),
        ("/api/v3/exchanges/list", list(7)),
        ("/api/v3/asset_platforms", list(2)),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v3/indexes"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = StatisticsClient::new(RestClient::new(), server.uri(), Duration::from_secs(1));
    let stats = client.fetch().await;

    assert_eq!(stats.categories, Some(4));
    assert_eq!(stats.exchanges, Some(7));
    assert_eq!(stats.asset_platforms, Some(2));
    assert_eq!(stats.market_indexes, None);
}
