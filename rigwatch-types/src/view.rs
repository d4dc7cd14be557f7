//! The top-level view model.

use std::collections::BTreeMap;

use crate::{AssetInventory, GpuDevice, HostInfo, ResourceUsage, Services, StorageVolume, ThermalPower};

/// Everything the dashboard renders, fully resolved.
///
/// Produced in one pass from a raw payload and replaced wholesale on every
/// successful poll.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewModel {
    pub host: HostInfo,
    pub usage: ResourceUsage,
    pub thermal: ThermalPower,
    pub gpus: Vec<GpuDevice>,
    pub services: Services,
    pub assets: AssetInventory,
    pub workflows: Vec<String>,
    pub storage: Vec<StorageVolume>,
    /// Named filesystem locations reported by the backend (models dir, output dir, ...).
    pub paths: BTreeMap<String, String>,
}

impl ViewModel {
    /// Total VRAM across all GPUs, in GiB.
    pub fn total_vram_gib(&self) -> f64 {
        self.gpus.iter().map(|g| g.memory_total_gib).sum()
    }

    /// Used VRAM across all GPUs, in GiB.
    pub fn used_vram_gib(&self) -> f64 {
        self.gpus.iter().map(|g| g.memory_used_gib).sum()
    }
}
