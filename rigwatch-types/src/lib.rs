//! # rigwatch-types
//!
//! The normalized view model for AI workstation telemetry. Every value in
//! these types is already resolved: strings fall back to [`UNKNOWN`], numbers
//! to `0.0` and lists to empty, so rendering code never checks for absence.
//!
//! The few intentional `Option` fields carry a meaning of their own:
//!
//! - [`ThermalPower::ambient_celsius`]: `None` means no ambient sensor was
//!   reported, which is different from a measured `0.0`.
//! - [`GpuDevice::fan_percent`]: passive cards have no fan.
//! - [`GpuDevice::compute_only`]: passed through from the backend when present.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for every type (used for JSON export)
//!
//! ## Example
//!
//! ```rust
//! use rigwatch_types::{GpuDevice, ViewModel};
//!
//! let mut view = ViewModel::default();
//! view.gpus.push(GpuDevice {
//!     name: "RTX 4090".to_string(),
//!     memory_total_gib: 24.0,
//!     memory_used_gib: 6.0,
//!     ..GpuDevice::default()
//! });
//!
//! assert_eq!(view.gpus[0].memory_percent(), 25.0);
//! assert_eq!(view.host.hostname, rigwatch_types::UNKNOWN);
//! ```

mod gpu;
mod host;
mod inventory;
mod service;
mod view;

pub use gpu::*;
pub use host::*;
pub use inventory::*;
pub use service::*;
pub use view::*;

/// Placeholder for any string field the backend did not report.
pub const UNKNOWN: &str = "unknown";

pub(crate) fn unknown() -> String {
    UNKNOWN.to_string()
}

/// `part / whole` as a percentage, 0 when `whole` is zero.
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
