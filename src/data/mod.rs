//! Payload normalization and derived display data.
//!
//! ## Submodules
//!
//! - [`payload`]: [`RawPayload`] and lenient value coercion helpers
//! - [`units`]: VRAM unit inference (bytes vs MiB)
//! - [`sensors`]: ambient temperature, fan and power extraction
//! - [`normalize`]: the totalizing payload → [`ViewModel`](rigwatch_types::ViewModel) transform
//! - [`history`]: in-memory samples for sparklines
//! - [`format`]: display formatting
//!
//! ## Data Flow
//!
//! ```text
//! RawPayload (JSON object)
//!        │
//!        ▼
//! normalize(&payload, &heuristics)
//!        │
//!        ├──▶ ViewModel (replaces the previous one)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod format;
pub mod history;
pub mod normalize;
pub mod payload;
pub mod sensors;
pub mod units;

pub use history::History;
pub use normalize::{normalize, Heuristics};
pub use payload::RawPayload;
pub use sensors::AMBIENT_SENSOR_NAME;
pub use units::{VramUnit, VRAM_BYTE_THRESHOLD};
