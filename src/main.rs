use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use rigwatch::app::{self, App};
use rigwatch::config::ConfigStore;
use rigwatch::data::{normalize, Heuristics, AMBIENT_SENSOR_NAME, VRAM_BYTE_THRESHOLD};
use rigwatch::fetch::{
    FetchOutcome, FileFetcher, HttpFetcher, MonitorTarget, TelemetryFetcher, DEFAULT_PATH,
};
use rigwatch::poll::PollController;
use rigwatch::source::ChannelSource;
use rigwatch::{events, logging, ui};

#[derive(Parser, Debug)]
#[command(name = "rigwatch")]
#[command(about = "Terminal dashboard for AI workstation telemetry")]
struct Args {
    /// Host running the monitoring endpoint (saved to settings)
    #[arg(long)]
    host: Option<String>,

    /// Port of the monitoring endpoint (saved to settings)
    #[arg(short, long)]
    port: Option<u16>,

    /// ComfyUI port (saved to settings)
    #[arg(long)]
    image_port: Option<u16>,

    /// Ollama port (saved to settings)
    #[arg(long)]
    llm_port: Option<u16>,

    /// Settings file [default: <config dir>/rigwatch/settings.json]
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Read payloads from a JSON file instead of the network
    #[arg(short, long, conflicts_with_all = ["host", "port"])]
    file: Option<PathBuf>,

    /// Request path of the monitoring endpoint
    #[arg(long, default_value = DEFAULT_PATH)]
    path: String,

    /// GPU memory values above this are treated as bytes, otherwise MiB
    #[arg(long, default_value_t = VRAM_BYTE_THRESHOLD)]
    vram_threshold: f64,

    /// Name of the temperature sensor reported as ambient
    #[arg(long, default_value = AMBIENT_SENSOR_NAME)]
    ambient_sensor: String,

    /// Fetch once, write the normalized view model to this file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Log file [default: <data dir>/rigwatch/rigwatch.log]
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = args.log_file.clone().or_else(logging::default_log_path);
    logging::init(log_file.as_deref())?;

    let heuristics = Heuristics {
        vram_byte_threshold: args.vram_threshold,
        ambient_sensor_name: args.ambient_sensor.clone(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    // File mode: no connection settings involved
    if let Some(ref file) = args.file {
        let fetcher: Arc<dyn TelemetryFetcher> = Arc::new(FileFetcher::new(file));
        let target = MonitorTarget::new("", None);

        if let Some(ref export_path) = args.export {
            return rt.block_on(export_once(fetcher.as_ref(), &target, &heuristics, export_path));
        }

        let controller = Arc::new(PollController::new(fetcher, heuristics));
        controller.reconfigure(target);
        let result = run_tui(&controller, None);
        controller.teardown();
        return result;
    }

    let store = Arc::new(open_store(&args)?);
    let fetcher: Arc<dyn TelemetryFetcher> = Arc::new(HttpFetcher::new()?);

    if let Some(ref export_path) = args.export {
        let target = store.current().monitor_target(&args.path);
        return rt.block_on(export_once(fetcher.as_ref(), &target, &heuristics, export_path));
    }

    let controller = Arc::new(PollController::new(fetcher, heuristics));
    let watcher = controller.follow(store.subscribe(), args.path.clone());

    let result = run_tui(&controller, Some(store));

    controller.teardown();
    watcher.abort();
    result
}

/// Open the settings store and apply command-line overrides to it.
fn open_store(args: &Args) -> Result<ConfigStore> {
    let path = match args.settings {
        Some(ref path) => path.clone(),
        None => ConfigStore::default_path()
            .ok_or_else(|| anyhow!("No config directory; pass --settings <path>"))?,
    };
    let store = ConfigStore::open(&path)?;
    info!(path = %path.display(), "settings opened");

    if let Some(ref host) = args.host {
        store.set_host(host.as_str())?;
    }
    if let Some(port) = args.port {
        store.set_monitor_port(Some(port))?;
    }
    if let Some(port) = args.image_port {
        store.set_image_port(Some(port))?;
    }
    if let Some(port) = args.llm_port {
        store.set_llm_port(Some(port))?;
    }
    if args.host.is_some() && args.port.is_some() {
        store.mark_setup_completed()?;
    }
    Ok(store)
}

/// Fetch once, normalize and write the view model as JSON.
async fn export_once(
    fetcher: &dyn TelemetryFetcher,
    target: &MonitorTarget,
    heuristics: &Heuristics,
    export_path: &Path,
) -> Result<()> {
    let payload = match fetcher.fetch(target).await {
        FetchOutcome::Success(payload) => payload,
        FetchOutcome::EmptyConfig => {
            anyhow::bail!("Monitor host or port not configured; pass --host and --port")
        }
        FetchOutcome::Failure(e) => return Err(e).context("Failed to fetch telemetry"),
    };

    let view = normalize(&payload, heuristics);
    app::write_view(&view, export_path)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported telemetry to: {}", export_path.display());
    Ok(())
}

/// Run the TUI until the user quits.
fn run_tui(controller: &PollController, store: Option<Arc<ConfigStore>>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let source = Box::new(ChannelSource::from_controller(controller));
    let mut app = App::new(source, store);
    app.reload_data();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        app.reload_data();
    }

    Ok(())
}
