//! Host identity, resource usage and chassis sensors.

use crate::{percent_of, unknown};

/// Static identity of the monitored machine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel: String,
    pub architecture: String,
    pub cpu_model: String,
    /// Runtime versions reported by the AI stack on the host.
    pub python_version: String,
    pub pytorch_version: String,
    pub cuda_version: String,
    pub driver_version: String,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            hostname: unknown(),
            os_name: unknown(),
            os_version: unknown(),
            kernel: unknown(),
            architecture: unknown(),
            cpu_model: unknown(),
            python_version: unknown(),
            pytorch_version: unknown(),
            cuda_version: unknown(),
            driver_version: unknown(),
        }
    }
}

impl HostInfo {
    /// OS name and version joined for display, e.g. "Ubuntu 22.04".
    pub fn os_label(&self) -> String {
        match (self.os_name.as_str(), self.os_version.as_str()) {
            (crate::UNKNOWN, _) => unknown(),
            (name, crate::UNKNOWN) => name.to_string(),
            (name, version) => format!("{} {}", name, version),
        }
    }
}

/// CPU, memory and uptime.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub ram_used_gb: f64,
    pub ram_total_gb: f64,
    pub uptime_seconds: f64,
}

impl ResourceUsage {
    pub fn ram_percent(&self) -> f64 {
        percent_of(self.ram_used_gb, self.ram_total_gb)
    }
}

/// Readings extracted from the chassis sensor arrays.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalPower {
    /// Inlet ambient temperature. `None` when no sensor carries the
    /// ambient label, so consumers can show "no sensor" instead of 0°C.
    pub ambient_celsius: Option<f64>,
    pub power_watts: f64,
    /// Mean of all fans that reported a numeric reading.
    pub fan_percent: f64,
}
