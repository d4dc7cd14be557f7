//! Watch channel data source.

use tokio::sync::watch;

use super::DataSource;
use crate::poll::{Dashboard, PollController};

/// Reads dashboards published on a watch channel, normally by a
/// [`PollController`].
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Dashboard>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    pub fn new(receiver: watch::Receiver<Dashboard>, description: impl Into<String>) -> Self {
        Self {
            receiver,
            description: description.into(),
            initial_returned: false,
        }
    }

    /// Source fed by `controller`.
    pub fn from_controller(controller: &PollController) -> Self {
        Self::new(controller.subscribe(), controller.description())
    }

    /// Create a sender and a source reading from it.
    pub fn create(description: impl Into<String>) -> (watch::Sender<Dashboard>, Self) {
        let (tx, rx) = watch::channel(Dashboard::default());
        (tx, Self::new(rx, description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Dashboard> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // A closed channel still holds the last value, which has been seen.
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
