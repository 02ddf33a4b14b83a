//! Chart series derived from the committed coin list

use ordered_float::OrderedFloat;

use crate::market_data::CoinRecord;

/// Available chart views, cycled with Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    PriceBar,
    VolumePie,
    MarketCapPolar,
    PriceDoughnut,
    AthLine,
    AthArea,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::PriceBar,
        ChartKind::VolumePie,
        ChartKind::MarketCapPolar,
        ChartKind::PriceDoughnut,
        ChartKind::AthLine,
        ChartKind::AthArea,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::PriceBar => "Top 10 by Price",
            ChartKind::VolumePie => "Volume Share (Top 3)",
            ChartKind::MarketCapPolar => "Market Cap (Top 3)",
            ChartKind::PriceDoughnut => "Coins Priced Above $100",
            ChartKind::AthLine => "All-Time High (Top 5 by ATL)",
            ChartKind::AthArea => "All-Time High (Top 10)",
        }
    }

    /// Values span several orders of magnitude and are drawn on a log scale
    pub fn log_scale(&self) -> bool {
        matches!(self, ChartKind::PriceBar | ChartKind::AthArea)
    }

    /// Share-of-total charts label each entry with its percentage
    pub fn shows_share(&self) -> bool {
        matches!(
            self,
            ChartKind::VolumePie | ChartKind::MarketCapPolar | ChartKind::PriceDoughnut
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn next(&self) -> ChartKind {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> ChartKind {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn build(kind: ChartKind, coins: &[CoinRecord]) -> Self {
        let points = match kind {
            ChartKind::PriceBar => top_by(coins, 10, |c| c.current_price, |c| c.current_price),
            ChartKind::VolumePie => top_by(coins, 3, |c| c.total_volume, |c| c.total_volume),
            ChartKind::MarketCapPolar => top_by(coins, 3, |c| c.market_cap, |c| c.market_cap),
            ChartKind::PriceDoughnut => {
                let mut rows: Vec<&CoinRecord> =
                    coins.iter().filter(|c| c.current_price > 100.0).collect();
                rows.sort_by_key(|c| OrderedFloat(c.current_price));
                rows.into_iter()
                    .take(5)
                    .map(|c| point(c, c.current_price))
                    .collect()
            }
            ChartKind::AthLine => top_by(coins, 5, |c| c.atl, |c| c.ath),
            ChartKind::AthArea => top_by(coins, 10, |c| c.ath, |c| c.ath),
        };

        Self { kind, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Percentage of the series total for one value
    pub fn share(&self, value: f64) -> f64 {
        let total = self.total();
        if total > 0.0 { value / total * 100.0 } else { 0.0 }
    }

    /// Integer bar height for a value, log10 scaled where the chart asks for it
    pub fn bar_height(&self, value: f64) -> u64 {
        let value = value.max(0.0);
        if self.kind.log_scale() {
            ((value + 1.0).log10() * 100.0).round() as u64
        } else {
            value.round() as u64
        }
    }
}

fn point(coin: &CoinRecord, value: f64) -> ChartPoint {
    ChartPoint {
        label: coin.symbol.to_uppercase(),
        value,
    }
}

/// First `n` coins ordered by `key` descending, plotting `value`
fn top_by(
    coins: &[CoinRecord],
    n: usize,
    key: impl Fn(&CoinRecord) -> f64,
    value: impl Fn(&CoinRecord) -> f64,
) -> Vec<ChartPoint> {
    let mut rows: Vec<&CoinRecord> = coins.iter().collect();
    rows.sort_by_key(|c| std::cmp::Reverse(OrderedFloat(key(c))));
    rows.into_iter().take(n).map(|c| point(c, value(c))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(symbol: &str, price: f64, volume: f64, market_cap: f64, ath: f64, atl: f64) -> CoinRecord {
        CoinRecord {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            current_price: price,
            market_cap,
            total_volume: volume,
            market_cap_rank: None,
            price_change_percentage_24h: 0.0,
            ath,
            atl,
            image: None,
        }
    }

    fn coins() -> Vec<CoinRecord> {
        vec![
            coin("btc", 43250.0, 15.0e9, 850.0e9, 69000.0, 67.8),
            coin("eth", 2650.0, 8.0e9, 320.0e9, 4878.0, 0.43),
            coin("bnb", 315.0, 1.2e9, 48.0e9, 686.0, 0.04),
            coin("sol", 98.5, 2.1e9, 42.0e9, 259.0, 0.5),
            coin("doge", 0.085, 0.8e9, 12.0e9, 0.73, 0.00008),
            coin("avax", 36.0, 0.5e9, 13.0e9, 146.0, 2.8),
            coin("ltc", 150.0, 0.4e9, 5.0e9, 410.0, 1.15),
        ]
    }

    fn labels(series: &ChartSeries) -> Vec<&str> {
        series.points.iter().map(|p| p.label.as_str()).collect()
    }

    #[test]
    fn test_price_bar_is_descending_top_ten() {
        let series = ChartSeries::build(ChartKind::PriceBar, &coins());
        assert_eq!(series.points.len(), 7);
        assert_eq!(labels(&series)[..3], ["BTC", "ETH", "BNB"]);
        assert!(series.kind.log_scale());
    }

    #[test]
    fn test_share_charts_take_top_three() {
        let volume = ChartSeries::build(ChartKind::VolumePie, &coins());
        assert_eq!(labels(&volume), vec!["BTC", "ETH", "SOL"]);

        let cap = ChartSeries::build(ChartKind::MarketCapPolar, &coins());
        assert_eq!(labels(&cap), vec!["BTC", "ETH", "BNB"]);

        let total: f64 = volume.points.iter().map(|p| volume.share(p.value)).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_doughnut_filters_and_ascends() {
        let series = ChartSeries::build(ChartKind::PriceDoughnut, &coins());
        assert_eq!(labels(&series), vec!["LTC", "BNB", "ETH", "BTC"]);
    }

    #[test]
    fn test_ath_line_orders_by_atl_and_plots_ath() {
        let series = ChartSeries::build(ChartKind::AthLine, &coins());
        assert_eq!(labels(&series), vec!["BTC", "AVAX", "LTC", "SOL", "ETH"]);
        assert_eq!(series.points[0].value, 69000.0);
    }

    #[test]
    fn test_empty_input() {
        for kind in ChartKind::ALL {
            assert!(ChartSeries::build(kind, &[]).is_empty());
        }
    }

    #[test]
    fn test_kind_cycles() {
        let mut kind = ChartKind::default();
        for _ in 0..ChartKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, ChartKind::PriceBar);
        assert_eq!(ChartKind::PriceBar.previous(), ChartKind::AthArea);
    }

    #[test]
    fn test_log_bar_height() {
        let series = ChartSeries::build(ChartKind::PriceBar, &coins());
        assert_eq!(series.bar_height(99.0), 200);
        assert_eq!(series.bar_height(-5.0), 0);

        let linear = ChartSeries::build(ChartKind::VolumePie, &coins());
        assert_eq!(linear.bar_height(42.4), 42);
    }
}
