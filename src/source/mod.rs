//! Consumer-side access to the polling controller's output.
//!
//! The TUI never talks to the controller directly; it polls a [`DataSource`]
//! once per frame and redraws from whatever [`Dashboard`] it gets back.

mod channel;

pub use channel::ChannelSource;

use std::fmt::Debug;

use crate::poll::Dashboard;

/// Non-blocking supplier of dashboard updates.
///
/// # Example
///
/// ```
/// use rigwatch::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("test");
/// let dashboard = source.poll().expect("initial value");
/// assert!(dashboard.view.is_none());
/// assert!(source.poll().is_none());
/// ```
pub trait DataSource: Send + Debug {
    /// Returns `Some(dashboard)` if it changed since the last poll.
    fn poll(&mut self) -> Option<Dashboard>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;
}
