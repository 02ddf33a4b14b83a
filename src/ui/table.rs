//! Coin table view model: search filter, rank ordering and pagination

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

use crate::market_data::CoinRecord;

/// Page sizes offered by the rows-per-page toggle
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Table ordering: market cap rank ascending, unranked last, ties and
/// unranked coins by market cap descending
pub fn compare_by_rank(a: &CoinRecord, b: &CoinRecord) -> Ordering {
    let rank = match (a.market_cap_rank, b.market_cap_rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    rank.then_with(|| OrderedFloat(b.market_cap).cmp(&OrderedFloat(a.market_cap)))
}

/// One rendered page of the table
#[derive(Debug, Clone)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a CoinRecord>,
    pub page: usize,
    pub page_count: usize,
    pub matched: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoinTable {
    search: String,
    page: usize,
    rows_per_page: usize,
}

impl CoinTable {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            search: String::new(),
            page: 0,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.page = 0;
    }

    pub fn pop_search_char(&mut self) {
        if self.search.pop().is_some() {
            self.page = 0;
        }
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Advance to the next page size option, wrapping around
    pub fn cycle_rows_per_page(&mut self) {
        let next = ROWS_PER_PAGE_OPTIONS
            .iter()
            .position(|&n| n == self.rows_per_page)
            .map(|i| ROWS_PER_PAGE_OPTIONS[(i + 1) % ROWS_PER_PAGE_OPTIONS.len()])
            .unwrap_or(ROWS_PER_PAGE_OPTIONS[0]);
        self.rows_per_page = next;
        self.page = 0;
    }

    /// Coins matching the search, in table order
    pub fn filtered<'a>(&self, coins: &'a [CoinRecord]) -> Vec<&'a CoinRecord> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&CoinRecord> = coins
            .iter()
            .filter(|coin| needle.is_empty() || coin.name.to_lowercase().contains(&needle))
            .collect();
        rows.sort_by(|a, b| compare_by_rank(a, b));
        rows
    }

    pub fn page_count(&self, matched: usize) -> usize {
        matched.div_ceil(self.rows_per_page).max(1)
    }

    /// Keep the page index inside the current result set
    pub fn clamp_page(&mut self, matched: usize) {
        let last = self.page_count(matched) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    pub fn next_page(&mut self, matched: usize) {
        if self.page + 1 < self.page_count(matched) {
            self.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn view<'a>(&self, coins: &'a [CoinRecord]) -> TablePage<'a> {
        let rows = self.filtered(coins);
        let matched = rows.len();
        let page_count = self.page_count(matched);
        let page = self.page.min(page_count - 1);

        let rows = rows
            .into_iter()
            .skip(page * self.rows_per_page)
            .take(self.rows_per_page)
            .collect();

        TablePage {
            rows,
            page,
            page_count,
            matched,
        }
    }
}

impl Default for CoinTable {
    fn default() -> Self {
        Self::new(ROWS_PER_PAGE_OPTIONS[0])
    }
}
