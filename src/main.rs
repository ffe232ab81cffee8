use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vitalwatch::app::{export_dashboard, App};
use vitalwatch::{events, ui};
use vitalwatch::{LogSink, MonitorState, PollLoop, RenderSink, Settings, WatchSink};

#[derive(Parser, Debug)]
#[command(name = "vitalwatch")]
#[command(about = "Live vitals dashboard and emergency alerting for wearable telemetry")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the telemetry store
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Node path under the store URL
    #[arg(long)]
    path: Option<String>,

    /// Read snapshots from a JSON file instead of the store
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Webhook URL for emergency alerts
    #[arg(short, long)]
    webhook: Option<String>,

    /// Poll interval in seconds
    #[arg(short, long)]
    interval: Option<f64>,

    /// Number of samples kept per chart
    #[arg(long)]
    window: Option<usize>,

    /// Ignore the fall_detected flag when deciding emergencies
    #[arg(long)]
    no_fall_detect: bool,

    /// Log one line per cycle instead of drawing the terminal UI
    #[arg(long)]
    headless: bool,

    /// Log filter (e.g. "info", "vitalwatch=debug")
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Write logs to this file while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run one cycle, write the dashboard to this JSON file and exit
    #[arg(short, long, conflicts_with = "headless")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_overrides(&args, &mut settings);
    settings.validate()?;

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return rt.block_on(export_to_file(&settings, export_path));
    }

    if args.headless {
        return rt.block_on(run_headless(&settings));
    }

    run_tui(&rt, &settings)
}

/// Logs go to stderr unless the terminal UI owns the screen, in which case
/// they go to `--log-file` or nowhere.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_new(&args.log_level)?;
    let to_stderr = args.headless || args.export.is_some();

    if to_stderr {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .init();
    } else if let Some(ref path) = args.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
    }
    Ok(())
}

/// Command-line flags win over file and environment settings.
fn apply_overrides(args: &Args, settings: &mut Settings) {
    if let Some(ref url) = args.url {
        settings.store.url = Some(url.clone());
        settings.store.file = None;
    }
    if let Some(ref path) = args.path {
        settings.store.path = path.clone();
    }
    if let Some(ref file) = args.file {
        settings.store.file = Some(file.clone());
    }
    if let Some(ref webhook) = args.webhook {
        settings.webhook.url = Some(webhook.clone());
    }
    if let Some(interval) = args.interval {
        settings.poll_interval_seconds = interval;
    }
    if let Some(window) = args.window {
        settings.window_size = window;
    }
    if args.no_fall_detect {
        settings.use_fall_detect = false;
    }
}

fn build_loop(settings: &Settings, sink: Box<dyn RenderSink>) -> Result<PollLoop> {
    let source = settings.build_source()?;
    let notifier = settings.build_notifier()?;
    let state = MonitorState::new(settings.window_size, settings.use_fall_detect)?;
    Ok(PollLoop::new(state, source, notifier, sink, settings.poll_interval()))
}

/// Poll until Ctrl-C, logging each cycle.
async fn run_headless(settings: &Settings) -> Result<()> {
    let poll = build_loop(settings, Box::new(LogSink))?;

    tokio::select! {
        _ = poll.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("interrupted, shutting down");
        }
    }
    Ok(())
}

/// Fetch once and write the resulting dashboard. No alert is sent.
async fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let mut source = settings.build_source()?;
    let mut state = MonitorState::new(settings.window_size, settings.use_fall_detect)?;

    let snapshot = source.fetch().await?;
    let output = state.step(Ok(snapshot));
    export_dashboard(&output.dashboard, export_path)?;

    println!("Exported dashboard to: {}", export_path.display());
    Ok(())
}

/// Run the poll loop in the background and the TUI on this thread.
fn run_tui(rt: &tokio::runtime::Runtime, settings: &Settings) -> Result<()> {
    let (sink, receiver) = WatchSink::create();
    let poll = build_loop(settings, Box::new(sink))?;
    let source_description = poll.source_description().to_string();
    let handle = rt.spawn(poll.run());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(receiver, &source_description);
    let result = run_app(&mut terminal, &mut app);

    handle.abort();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        app.refresh();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(12),   // Charts
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::charts::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
