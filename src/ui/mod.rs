//! User Interface module
//!
//! Provides both TUI (Terminal User Interface) and simple CLI output capabilities.

/// Chart series derived from market data
pub mod charts;

/// Simple CLI output functions
pub mod cli;

/// Coin table filtering and pagination
pub mod table;

/// TUI application state and rendering
pub mod tui;

/// Terminal event loop bridging the refresh controller and the TUI
pub mod ui_manager;

use crate::market_data::MarketStatistics;
use crate::session::DashboardSnapshot;

use self::charts::{ChartKind, ChartSeries};
use self::table::CoinTable;

/// Input modes for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Application state for UI components
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub table: CoinTable,
    pub chart: ChartKind,
    pub snapshot: DashboardSnapshot,
    pub statistics: MarketStatistics,
    /// Pointer is held down over the terminal
    pub interacting: bool,
}

impl AppState {
    /// Create new application state
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            table: CoinTable::new(rows_per_page),
            chart: ChartKind::default(),
            snapshot: DashboardSnapshot::default(),
            statistics: MarketStatistics::default(),
            interacting: false,
        }
    }

    /// Replace the displayed snapshot, keeping the table page in range
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.snapshot = snapshot;
        self.clamp_table_page();
    }

    pub fn matched_rows(&self) -> usize {
        self.table.filtered(&self.snapshot.data).len()
    }

    pub fn clamp_table_page(&mut self) {
        let matched = self.matched_rows();
        self.table.clamp_page(matched);
    }

    pub fn next_page(&mut self) {
        let matched = self.matched_rows();
        self.table.next_page(matched);
    }

    pub fn previous_page(&mut self) {
        self.table.previous_page();
    }

    pub fn next_chart(&mut self) {
        self.chart = self.chart.next();
    }

    pub fn previous_chart(&mut self) {
        self.chart = self.chart.previous();
    }

    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries::build(self.chart, &self.snapshot.data)
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn leave_search_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(table::ROWS_PER_PAGE_OPTIONS[0])
    }
}

/// Format a USD price, keeping precision for sub-dollar coins
pub fn format_price(value: f64) -> String {
    if value >= 1.0 {
        format!("${:.2}", value)
    } else {
        format!("${:.6}", value)
    }
}

/// Format large USD amounts with a T/B/M/K suffix
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${:.2}", value)
    }
}
