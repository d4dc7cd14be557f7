//! Polling: owns the fetch → normalize → publish cycle.
//!
//! ```text
//! Idle ──▶ Fetching ──▶ Updated ─────────┐
//!              ▲     └─▶ Errored (stale) ─┤
//!              └──── period elapses ◀─────┘
//!
//! reconfigure(target): * ──▶ Idle ──▶ Fetching   (old cycle discarded)
//! teardown():          * ──▶ TornDown            (terminal)
//! ```

mod controller;
mod state;

pub use controller::{PollController, POLL_PERIOD};
pub use state::{Dashboard, Phase};
