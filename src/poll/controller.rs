//! The polling controller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::ConnectionConfig;
use crate::data::{normalize, Heuristics};
use crate::fetch::{FetchOutcome, MonitorTarget, TelemetryFetcher};

use super::state::{Dashboard, Phase};

/// Time between the start of consecutive fetches.
pub const POLL_PERIOD: Duration = Duration::from_secs(2);

const NOT_CONFIGURED: &str = "Monitor host or port not configured";

#[derive(Debug, Default)]
struct Liveness {
    generation: u64,
    torn_down: bool,
}

#[derive(Debug)]
struct Shared {
    liveness: Mutex<Liveness>,
    state: watch::Sender<Dashboard>,
}

impl Shared {
    /// Apply `change` to the published dashboard if `generation` is still the
    /// current one. Returns `false` once the caller's cycle is obsolete.
    fn write_if_live<F>(&self, generation: u64, change: F) -> bool
    where
        F: FnOnce(&mut Dashboard),
    {
        let liveness = self.liveness.lock();
        if liveness.torn_down || liveness.generation != generation {
            return false;
        }
        self.state.send_modify(change);
        true
    }
}

/// Owns the fetch → normalize → publish cycle for one target at a time.
///
/// Every write to the published [`Dashboard`] is checked against a liveness
/// generation under the same lock taken by [`reconfigure`](Self::reconfigure)
/// and [`teardown`](Self::teardown), so a response that arrives after either
/// call is discarded.
#[derive(Debug)]
pub struct PollController {
    shared: Arc<Shared>,
    fetcher: Arc<dyn TelemetryFetcher>,
    heuristics: Arc<Heuristics>,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollController {
    pub fn new(fetcher: Arc<dyn TelemetryFetcher>, heuristics: Heuristics) -> Self {
        let (state, _) = watch::channel(Dashboard::default());
        Self {
            shared: Arc::new(Shared {
                liveness: Mutex::new(Liveness::default()),
                state,
            }),
            fetcher,
            heuristics: Arc::new(heuristics),
            period: POLL_PERIOD,
            task: Mutex::new(None),
        }
    }

    /// Use a different poll period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Subscribe to dashboard updates.
    pub fn subscribe(&self) -> watch::Receiver<Dashboard> {
        self.shared.state.subscribe()
    }

    /// A copy of the current dashboard.
    pub fn snapshot(&self) -> Dashboard {
        self.shared.state.borrow().clone()
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.liveness.lock().torn_down
    }

    /// Short description of what is being polled.
    pub fn description(&self) -> String {
        self.fetcher.description()
    }

    /// Stop the current cycle and start a fresh one against `target`.
    ///
    /// The dashboard is reset to [`Phase::Idle`] with no data. Ignored after
    /// [`teardown`](Self::teardown). Must be called within a tokio runtime.
    pub fn reconfigure(&self, target: MonitorTarget) {
        let mut task = self.task.lock();
        let generation = {
            let mut liveness = self.shared.liveness.lock();
            if liveness.torn_down {
                debug!(%target, "reconfigure after teardown ignored");
                return;
            }
            liveness.generation += 1;
            self.shared.state.send_replace(Dashboard::idle(target.clone()));
            liveness.generation
        };

        if let Some(previous) = task.take() {
            previous.abort();
        }

        info!(%target, generation, "polling reconfigured");
        *task = Some(tokio::spawn(run_cycle(
            Arc::clone(&self.shared),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.heuristics),
            target,
            generation,
            self.period,
        )));
    }

    /// Stop polling for good. The last dashboard stays readable.
    pub fn teardown(&self) {
        let mut task = self.task.lock();
        {
            let mut liveness = self.shared.liveness.lock();
            if liveness.torn_down {
                return;
            }
            liveness.torn_down = true;
            self.shared.state.send_modify(|d| d.phase = Phase::TornDown);
        }
        if let Some(handle) = task.take() {
            handle.abort();
        }
        info!("polling torn down");
    }

    /// Keep polling the monitor target described by `config`.
    ///
    /// Reconfigures immediately with the current settings and again whenever
    /// the derived [`MonitorTarget`] changes. Changes that leave the target as
    /// it was (such as a dependent service port) do not restart polling. The
    /// watcher ends when the settings sender is dropped or the controller is
    /// torn down.
    pub fn follow(
        self: &Arc<Self>,
        mut config: watch::Receiver<ConnectionConfig>,
        path: impl Into<String>,
    ) -> JoinHandle<()> {
        let path = path.into();
        let controller = Arc::clone(self);

        let mut current = config.borrow_and_update().monitor_target(&path);
        controller.reconfigure(current.clone());

        tokio::spawn(async move {
            while config.changed().await.is_ok() {
                if controller.is_torn_down() {
                    break;
                }
                let next = config.borrow_and_update().monitor_target(&path);
                if next != current {
                    current = next;
                    controller.reconfigure(current.clone());
                }
            }
        })
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_cycle(
    shared: Arc<Shared>,
    fetcher: Arc<dyn TelemetryFetcher>,
    heuristics: Arc<Heuristics>,
    target: MonitorTarget,
    generation: u64,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if !shared.write_if_live(generation, |d| d.phase = Phase::Fetching) {
            break;
        }

        let (live, keep_polling) = match fetcher.fetch(&target).await {
            FetchOutcome::Success(payload) => {
                let view = normalize(&payload, &heuristics);
                debug!(%target, gpus = view.gpus.len(), "telemetry updated");
                let now = Instant::now();
                (shared.write_if_live(generation, |d| d.apply_success(view, now)), true)
            }
            FetchOutcome::EmptyConfig => {
                debug!("no monitor target configured");
                (shared.write_if_live(generation, |d| d.apply_failure(NOT_CONFIGURED)), false)
            }
            FetchOutcome::Failure(error) => {
                warn!(%target, %error, "telemetry fetch failed");
                let reason = error.to_string();
                (shared.write_if_live(generation, |d| d.apply_failure(reason)), true)
            }
        };

        if !live {
            debug!(generation, "discarding result of obsolete polling cycle");
            break;
        }
        if !keep_polling {
            break;
        }
    }
}
