//! GPU devices.

use crate::{percent_of, unknown};

/// One GPU as reported by the backend.
///
/// Memory is always expressed in GiB, whatever unit the backend used.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpuDevice {
    pub index: u32,
    pub name: String,
    pub memory_total_gib: f64,
    pub memory_used_gib: f64,
    pub utilization_percent: f64,
    pub temperature_celsius: f64,
    /// `None` for passively cooled cards or when the backend omits it.
    pub fan_percent: Option<f64>,
    /// Compute-only accelerator (no display output), when the backend says so.
    pub compute_only: Option<bool>,
}

impl Default for GpuDevice {
    fn default() -> Self {
        Self {
            index: 0,
            name: unknown(),
            memory_total_gib: 0.0,
            memory_used_gib: 0.0,
            utilization_percent: 0.0,
            temperature_celsius: 0.0,
            fan_percent: None,
            compute_only: None,
        }
    }
}

impl GpuDevice {
    /// VRAM in use as a percentage of the total.
    pub fn memory_percent(&self) -> f64 {
        percent_of(self.memory_used_gib, self.memory_total_gib)
    }

    /// Short classification label for display.
    pub fn kind_label(&self) -> &'static str {
        match self.compute_only {
            Some(true) => "compute",
            Some(false) => "display",
            None => "-",
        }
    }
}
