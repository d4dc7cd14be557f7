//! In-memory sample history for sparklines.
//!
//! Nothing here survives a restart; the buffers only feed the charts.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use rigwatch_types::ViewModel;

/// Maximum number of samples kept per series.
const MAX_HISTORY_SIZE: usize = 60;

/// Recent samples of the values the Overview and GPU views chart.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub cpu_percent: VecDeque<f64>,
    pub ram_used_gb: VecDeque<f64>,
    pub power_watts: VecDeque<f64>,
    /// GPU utilization keyed by device index.
    pub gpu_utilization: BTreeMap<u32, VecDeque<f64>>,
    /// Time of each recorded sample.
    pub timestamps: VecDeque<Instant>,
}

fn push_bounded(series: &mut VecDeque<f64>, value: f64) {
    series.push_back(value);
    if series.len() > MAX_HISTORY_SIZE {
        series.pop_front();
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample from a freshly normalized view model.
    pub fn record(&mut self, view: &ViewModel, at: Instant) {
        push_bounded(&mut self.cpu_percent, view.usage.cpu_percent);
        push_bounded(&mut self.ram_used_gb, view.usage.ram_used_gb);
        push_bounded(&mut self.power_watts, view.thermal.power_watts);

        for gpu in &view.gpus {
            let series = self.gpu_utilization.entry(gpu.index).or_default();
            push_bounded(series, gpu.utilization_percent);
        }

        self.timestamps.push_back(at);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Drop everything, e.g. when the monitor target changes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// CPU sparkline on a fixed 0-100% scale.
    pub fn cpu_sparkline(&self) -> Vec<u8> {
        normalize_sparkline(&self.cpu_percent, Some(100.0))
    }

    /// RAM sparkline scaled to the machine's total memory.
    pub fn ram_sparkline(&self, total_gb: f64) -> Vec<u8> {
        normalize_sparkline(&self.ram_used_gb, (total_gb > 0.0).then_some(total_gb))
    }

    /// Power sparkline scaled to the highest recorded draw.
    pub fn power_sparkline(&self) -> Vec<u8> {
        normalize_sparkline(&self.power_watts, None)
    }

    /// Utilization sparkline for one GPU on a fixed 0-100% scale.
    pub fn gpu_sparkline(&self, index: u32) -> Vec<u8> {
        self.gpu_utilization
            .get(&index)
            .map(|series| normalize_sparkline(series, Some(100.0)))
            .unwrap_or_default()
    }
}

/// Map values to 0-7 for the eight sparkline bar levels.
///
/// With a `ceiling` the scale is `0..=ceiling`; otherwise it is the range of
/// the samples themselves. Fewer than two samples produce no sparkline.
fn normalize_sparkline(values: &VecDeque<f64>, ceiling: Option<f64>) -> Vec<u8> {
    if values.len() < 2 {
        return Vec::new();
    }

    let (min, max) = match ceiling {
        Some(ceiling) => (0.0, ceiling),
        None => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max)
        }
    };
    let range = (max - min).max(f64::EPSILON);

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) / range * 7.0).round();
            normalized.clamp(0.0, 7.0) as u8
        })
        .collect()
}
