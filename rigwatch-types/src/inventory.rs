//! Discovered files and storage volumes.

use crate::{percent_of, unknown};

/// Files discovered by the image generation backend.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetInventory {
    pub checkpoints: Vec<String>,
    pub loras: Vec<String>,
    pub vae: Vec<String>,
    pub embeddings: Vec<String>,
    /// Installed extensions (custom nodes).
    pub custom_nodes: Vec<String>,
}

impl AssetInventory {
    /// `(label, count)` pairs in display order.
    pub fn counts(&self) -> [(&'static str, usize); 5] {
        [
            ("Checkpoints", self.checkpoints.len()),
            ("LoRAs", self.loras.len()),
            ("VAE", self.vae.len()),
            ("Embeddings", self.embeddings.len()),
            ("Custom nodes", self.custom_nodes.len()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.counts().iter().all(|(_, n)| *n == 0)
    }
}

/// A mounted volume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageVolume {
    pub path: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub filesystem: String,
    pub description: String,
}

impl Default for StorageVolume {
    fn default() -> Self {
        Self {
            path: unknown(),
            total_gb: 0.0,
            used_gb: 0.0,
            free_gb: 0.0,
            filesystem: unknown(),
            description: String::new(),
        }
    }
}

impl StorageVolume {
    pub fn used_percent(&self) -> f64 {
        percent_of(self.used_gb, self.total_gb)
    }
}
