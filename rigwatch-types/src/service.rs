//! Status of the AI services running next to the monitor.

use crate::unknown;

/// Run state of a dependent service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ServiceState {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl ServiceState {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Unknown => "unknown",
        }
    }
}

/// A single service: state, version and what it has installed
/// (for example the models pulled into an LLM runtime).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub version: String,
    pub artifacts: Vec<String>,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self {
            state: ServiceState::Unknown,
            version: unknown(),
            artifacts: Vec::new(),
        }
    }
}

/// The services the dashboard knows about.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Services {
    /// Image generation backend (ComfyUI).
    pub image_generation: ServiceStatus,
    /// Local LLM runtime (Ollama).
    pub llm: ServiceStatus,
}
