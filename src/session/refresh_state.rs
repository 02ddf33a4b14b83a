//! Refresh state machine
//!
//! Pure, synchronous transitions driven by the refresh controller task.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::market_data::{CoinRecord, FetchError, FetchedMarkets};
use crate::metrics::FetchMetrics;

/// Observable phase of the refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Fetching,
    Committed,
    Deferred,
}

/// What happened to a successfully fetched result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Committed,
    Deferred,
}

/// Everything the presentation layer needs, published on every transition
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub data: Arc<Vec<CoinRecord>>,
    pub loading: bool,
    /// User-visible error, only set while no data was ever committed
    pub error: Option<String>,
    /// Most recent fully failed cycle, for diagnostics
    pub last_error: Option<String>,
    pub pending_update_available: bool,
    pub pending_count: usize,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub source: Option<&'static str>,
    pub phase: RefreshPhase,
    pub metrics: FetchMetrics,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        RefreshState::new().snapshot(FetchMetrics::default())
    }
}

/// Owned by a single refresh controller
#[derive(Debug)]
pub struct RefreshState {
    committed: Arc<Vec<CoinRecord>>,
    pending: Option<FetchedMarkets>,
    is_loading: bool,
    last_error: Option<String>,
    last_updated_at: Option<DateTime<Utc>>,
    source: Option<&'static str>,
    in_flight: usize,
}

impl RefreshState {
    pub fn new() -> Self {
        Self {
            committed: Arc::new(Vec::new()),
            pending: None,
            is_loading: true,
            last_error: None,
            last_updated_at: None,
            source: None,
            in_flight: 0,
        }
    }

    pub fn committed(&self) -> &[CoinRecord] {
        &self.committed
    }

    pub fn pending(&self) -> Option<&[CoinRecord]> {
        self.pending.as_ref().map(|p| p.coins.as_slice())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    pub fn phase(&self) -> RefreshPhase {
        if self.in_flight > 0 {
            RefreshPhase::Fetching
        } else if self.pending.is_some() {
            RefreshPhase::Deferred
        } else if !self.committed.is_empty() {
            RefreshPhase::Committed
        } else {
            RefreshPhase::Idle
        }
    }

    /// A fetch cycle has been started
    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    /// A cycle returned data. Commits unless the user is interacting, in
    /// which case the result replaces any previously staged one.
    pub fn resolve_success(
        &mut self,
        fetched: FetchedMarkets,
        interacting: bool,
        now: DateTime<Utc>,
    ) -> Resolution {
        self.finish_cycle();
        self.last_error = None;

        if interacting {
            if let Some(previous) = self.pending.replace(fetched) {
                debug!(
                    "Replacing staged update of {} coins from {}",
                    previous.coins.len(),
                    previous.source
                );
            }
            Resolution::Deferred
        } else {
            self.commit(fetched, now);
            self.pending = None;
            Resolution::Committed
        }
    }

    /// A cycle resolved after a newer one was already applied
    pub fn discard_fetch(&mut self) {
        self.finish_cycle();
    }

    /// A cycle failed on every provider. Committed data is kept.
    pub fn resolve_failure(&mut self, error: &FetchError) {
        self.finish_cycle();
        self.last_error = Some(error.to_string());
    }

    /// Move the staged result into the committed data. Returns `false` when
    /// nothing was staged.
    pub fn apply_pending(&mut self, now: DateTime<Utc>) -> bool {
        match self.pending.take() {
            Some(fetched) => {
                self.commit(fetched, now);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, metrics: FetchMetrics) -> DashboardSnapshot {
        let user_error = if self.committed.is_empty() {
            self.last_error.clone()
        } else {
            None
        };

        DashboardSnapshot {
            data: self.committed.clone(),
            loading: self.is_loading,
            error: user_error,
            last_error: self.last_error.clone(),
            pending_update_available: self.pending.is_some(),
            pending_count: self.pending.as_ref().map_or(0, |p| p.coins.len()),
            last_updated_at: self.last_updated_at,
            source: self.source,
            phase: self.phase(),
            metrics,
        }
    }

    fn commit(&mut self, fetched: FetchedMarkets, now: DateTime<Utc>) {
        self.committed = Arc::new(fetched.coins);
        self.source = Some(fetched.source);
        self.last_updated_at = Some(now);
    }

    fn finish_cycle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = false;
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}
