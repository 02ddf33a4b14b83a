//! Pointer interaction tracking
//!
//! Press sets the signal, release clears it. Release always notifies
//! subscribers so a deferred update can be applied.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

/// Cloneable "user is interacting" signal
#[derive(Debug, Clone)]
pub struct InteractionTracker {
    tx: Arc<watch::Sender<bool>>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Pointer pressed anywhere
    pub fn on_pointer_down(&self) {
        trace!("pointer down");
        self.tx.send_replace(true);
    }

    /// Pointer released anywhere
    pub fn on_pointer_up(&self) {
        trace!("pointer up");
        self.tx.send_replace(false);
    }

    pub fn is_interacting(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for InteractionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_press_release_state() {
        let tracker = InteractionTracker::new();
        assert!(!tracker.is_interacting());

        tracker.on_pointer_down();
        assert!(tracker.is_interacting());

        tracker.on_pointer_up();
        assert!(!tracker.is_interacting());
    }

    #[test]
    fn test_release_always_notifies() {
        let tracker = InteractionTracker::new();
        let mut rx = tracker.subscribe();

        // Release without a prior press still wakes subscribers
        tracker.on_pointer_up();
        assert!(rx.has_changed().unwrap());

        block_on(async {
            rx.changed().await.unwrap();
            assert!(!*rx.borrow_and_update());
        });
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = InteractionTracker::new();
        let clone = tracker.clone();
        clone.on_pointer_down();
        assert!(tracker.is_interacting());
    }
}
