//! The state the polling controller publishes.

use std::time::Instant;

use rigwatch_types::ViewModel;

use crate::fetch::MonitorTarget;

/// Where a polling cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Target set, first fetch not started yet.
    Idle,
    /// A request is in flight.
    Fetching,
    /// The last fetch succeeded.
    Updated,
    /// The last fetch failed; any previous view model is kept.
    Errored,
    /// Polling has stopped for good.
    TornDown,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Fetching => "fetching",
            Phase::Updated => "updated",
            Phase::Errored => "error",
            Phase::TornDown => "stopped",
        }
    }
}

/// Snapshot of the controller's output for one target.
///
/// `view` is the whole-model "not yet available" sentinel: it is `None`
/// until the first successful fetch for the current target, then always the
/// last good view model.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub target: MonitorTarget,
    pub phase: Phase,
    pub view: Option<ViewModel>,
    /// Human-readable reason of the last failure, cleared on success.
    pub error: Option<String>,
    /// When `view` was last replaced.
    pub last_updated: Option<Instant>,
    pub successes: u64,
    pub failures: u64,
}

impl Dashboard {
    /// A fresh dashboard for `target` with no data.
    pub fn idle(target: MonitorTarget) -> Self {
        Self {
            target,
            phase: Phase::Idle,
            view: None,
            error: None,
            last_updated: None,
            successes: 0,
            failures: 0,
        }
    }

    /// Replace the view model and clear the error.
    pub fn apply_success(&mut self, view: ViewModel, at: Instant) {
        self.view = Some(view);
        self.error = None;
        self.last_updated = Some(at);
        self.phase = Phase::Updated;
        self.successes += 1;
    }

    /// Record a failure without touching the current view model.
    pub fn apply_failure(&mut self, reason: impl Into<String>) {
        self.error = Some(reason.into());
        self.phase = Phase::Errored;
        self.failures += 1;
    }

    /// No data to show and the last attempt failed.
    pub fn is_unreachable(&self) -> bool {
        self.view.is_none() && self.error.is_some()
    }

    /// Data is shown but may be out of date.
    pub fn is_stale(&self) -> bool {
        self.view.is_some() && self.error.is_some()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::idle(MonitorTarget::new("", None))
    }
}
