//! Dashboard session management module
//!
//! This module provides the live refresh controller, the interaction
//! tracker that gates it, and the session lifecycle around them.

pub mod interaction;
pub mod refresh_controller;
pub mod refresh_state;
pub mod session_manager;

pub use interaction::InteractionTracker;
pub use refresh_controller::{
    RefreshCommand, RefreshCommander, RefreshController, RefreshError, RefreshHandle,
};
pub use refresh_state::{DashboardSnapshot, RefreshPhase, RefreshState, Resolution};
pub use session_manager::{SessionManager, SessionState};
