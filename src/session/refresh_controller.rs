//! Refresh controller: owns the poll timer and every mutation of the
//! refresh state.
//!
//! All inputs (timer ticks, fetch outcomes, interaction changes and
//! commands) are serialized through one `select!` loop. Fetches run on
//! their own tasks and report back by message, so the interaction signal
//! is read when a result is processed rather than when its fetch began.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::interaction::InteractionTracker;
use super::refresh_state::{DashboardSnapshot, RefreshState, Resolution};
use crate::market_data::{FetchError, FetchedMarkets, MarketDataSource};
use crate::metrics::MetricsCollector;

const METRICS_SAMPLES: usize = 100;

/// Commands accepted by a running controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCommand {
    ApplyPendingUpdate,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh controller is not running")]
    ControllerStopped,
}

#[derive(Debug)]
struct FetchOutcome {
    cycle: u64,
    elapsed: Duration,
    result: Result<FetchedMarkets, FetchError>,
}

/// Periodic fetch loop with update deferral while the user interacts
pub struct RefreshController {
    interval: Duration,
    source: Arc<MarketDataSource>,
    interaction_rx: watch::Receiver<bool>,
    interaction_closed: bool,
    state: RefreshState,
    metrics: MetricsCollector,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    next_cycle: u64,
    newest_applied_cycle: u64,
}

impl RefreshController {
    pub fn new(
        interval: Duration,
        source: Arc<MarketDataSource>,
        tracker: &InteractionTracker,
    ) -> Self {
        let state = RefreshState::new();
        let metrics = MetricsCollector::new(METRICS_SAMPLES);
        let (snapshot_tx, _) = watch::channel(state.snapshot(metrics.snapshot()));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            interval,
            source,
            interaction_rx: tracker.subscribe(),
            interaction_closed: false,
            state,
            metrics,
            snapshot_tx,
            outcome_tx,
            outcome_rx,
            next_cycle: 0,
            newest_applied_cycle: 0,
        }
    }

    /// Spawn the controller task. The first cycle starts immediately.
    pub fn start(self) -> RefreshHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let snapshot_rx = self.snapshot_tx.subscribe();
        let task = tokio::spawn(self.run(command_rx));

        RefreshHandle {
            commander: RefreshCommander { tx: command_tx },
            snapshot_rx,
            task,
        }
    }

    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<RefreshCommand>) {
        info!(
            "Refresh controller started: every {:?} via {:?}",
            self.interval,
            self.source.provider_names()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                command = command_rx.recv() => match command {
                    Some(RefreshCommand::ApplyPendingUpdate) => {
                        self.apply_pending("apply-now");
                    }
                    Some(RefreshCommand::Shutdown) | None => {
                        info!("Refresh controller shutting down");
                        break;
                    }
                },

                Some(outcome) = self.outcome_rx.recv() => {
                    self.resolve_cycle(outcome);
                }

                changed = self.interaction_rx.changed(), if !self.interaction_closed => {
                    match changed {
                        Ok(()) => {
                            let interacting = *self.interaction_rx.borrow_and_update();
                            if !interacting {
                                self.on_interaction_end();
                            }
                        }
                        Err(_) => {
                            debug!("Interaction tracker dropped, treating as released");
                            self.interaction_closed = true;
                            self.on_interaction_end();
                        }
                    }
                }

                _ = ticker.tick() => {
                    self.begin_cycle();
                }
            }
        }
    }

    fn is_interacting(&self) -> bool {
        !self.interaction_closed
            && self.interaction_rx.has_changed().is_ok()
            && *self.interaction_rx.borrow()
    }

    fn begin_cycle(&mut self) {
        self.next_cycle += 1;
        let cycle = self.next_cycle;

        self.state.begin_fetch();
        self.metrics.record_cycle_started();
        self.publish();

        debug!("Starting refresh cycle {}", cycle);

        let source = self.source.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = source.fetch().await;
            let outcome = FetchOutcome {
                cycle,
                elapsed: started.elapsed(),
                result,
            };

            if outcome_tx.send(outcome).is_err() {
                debug!("Refresh cycle {} resolved after shutdown, dropping result", cycle);
            }
        });
    }

    fn resolve_cycle(&mut self, outcome: FetchOutcome) {
        let FetchOutcome {
            cycle,
            elapsed,
            result,
        } = outcome;

        self.metrics
            .record_fetch(elapsed, result.as_ref().ok().map(|f| f.source));

        match result {
            Ok(_) if cycle < self.newest_applied_cycle => {
                self.state.discard_fetch();
                self.metrics.record_stale_discard();
                debug!(
                    "Discarding cycle {} result, cycle {} already applied",
                    cycle, self.newest_applied_cycle
                );
            }
            Ok(fetched) => {
                self.newest_applied_cycle = cycle;
                let count = fetched.coins.len();
                let source = fetched.source;
                let interacting = self.is_interacting();

                match self.state.resolve_success(fetched, interacting, Utc::now()) {
                    Resolution::Committed => {
                        self.metrics.record_commit();
                        info!(
                            "Cycle {} committed {} coins from {} in {:?}",
                            cycle, count, source, elapsed
                        );
                    }
                    Resolution::Deferred => {
                        self.metrics.record_deferral();
                        info!(
                            "Cycle {} staged {} coins from {} while user is interacting",
                            cycle, count, source
                        );
                    }
                }
            }
            Err(e) => {
                self.state.resolve_failure(&e);
                if self.state.committed().is_empty() {
                    error!("Cycle {} failed with no data to show: {}", cycle, e);
                } else {
                    warn!(
                        "Cycle {} failed, keeping {} committed coins: {}",
                        cycle,
                        self.state.committed().len(),
                        e
                    );
                }
            }
        }

        self.publish();
    }

    fn on_interaction_end(&mut self) {
        if self.state.has_pending() {
            self.apply_pending("interaction ended");
        }
    }

    fn apply_pending(&mut self, reason: &str) {
        if self.state.apply_pending(Utc::now()) {
            self.metrics.record_commit();
            info!(
                "Applied pending update ({}): {} coins",
                reason,
                self.state.committed().len()
            );
            self.publish();
        } else {
            debug!("No pending update to apply ({})", reason);
        }
    }

    fn publish(&self) {
        self.snapshot_tx
            .send_replace(self.state.snapshot(self.metrics.snapshot()));
    }
}

/// Cloneable command sender for a running controller
#[derive(Debug, Clone)]
pub struct RefreshCommander {
    tx: mpsc::UnboundedSender<RefreshCommand>,
}

impl RefreshCommander {
    /// Commit the staged update now, regardless of interaction
    pub fn apply_pending_update(&self) -> Result<(), RefreshError> {
        self.send(RefreshCommand::ApplyPendingUpdate)
    }

    fn send(&self, command: RefreshCommand) -> Result<(), RefreshError> {
        self.tx
            .send(command)
            .map_err(|_| RefreshError::ControllerStopped)
    }
}

/// Owner handle of a running controller
pub struct RefreshHandle {
    commander: RefreshCommander,
    snapshot_rx: watch::Receiver<DashboardSnapshot>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn pending_update_available(&self) -> bool {
        self.snapshot_rx.borrow().pending_update_available
    }

    pub fn commander(&self) -> RefreshCommander {
        self.commander.clone()
    }

    pub fn apply_pending_update(&self) -> Result<(), RefreshError> {
        self.commander.apply_pending_update()
    }

    /// Stop the timer and wait for the controller task to exit. Fetches
    /// still in flight resolve into a closed channel and are ignored.
    pub async fn stop(self) {
        if self.commander.send(RefreshCommand::Shutdown).is_err() {
            debug!("Refresh controller already stopped");
        }

        if let Err(e) = self.task.await {
            error!("Refresh controller task failed: {}", e);
        }

        info!("Refresh controller stopped");
    }
}
