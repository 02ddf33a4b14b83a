//! Simple CLI output implementation
//!
//! Provides simple command-line output for a one-shot market snapshot.

use anyhow::Result;
use colored::Colorize;

use super::table::compare_by_rank;
use super::{format_compact, format_price};
use crate::market_data::CoinRecord;

/// Print coins in rank order as an aligned table
pub fn display_market_table(
    coins: &[CoinRecord],
    source: &str,
    limit: usize,
    enable_colors: bool,
) -> Result<()> {
    colored::control::set_override(enable_colors);

    let mut rows: Vec<&CoinRecord> = coins.iter().collect();
    rows.sort_by(|a, b| compare_by_rank(a, b));

    println!(
        "{} {} coins from {}",
        "📊".bold(),
        coins.len(),
        source.cyan().bold()
    );
    println!(
        "{:>4}  {:<20} {:<8} {:>16} {:>9} {:>12} {:>12}",
        "#", "Name", "Symbol", "Price", "24h %", "Market Cap", "Volume"
    );

    for coin in rows.into_iter().take(limit) {
        let rank = coin
            .market_cap_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let change = format!("{:+.2}%", coin.price_change_percentage_24h);
        let change = if coin.price_change_percentage_24h >= 0.0 {
            change.green()
        } else {
            change.red()
        };

        println!(
            "{:>4}  {:<20} {:<8} {:>16} {:>9} {:>12} {:>12}",
            rank,
            truncate(&coin.name, 20),
            coin.symbol.to_uppercase(),
            format_price(coin.current_price),
            change,
            format_compact(coin.market_cap),
            format_compact(coin.total_volume),
        );
    }

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
