mod api;
mod app;
mod config;
mod dashboard;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{HttpPropertySource, PropertySource, UnavailableSource};
use app::{App, Popup};
use config::AppConfig;
use dashboard::Dashboard;

#[derive(Parser, Debug)]
#[command(name = "propdash")]
#[command(version)]
#[command(about = "A terminal dashboard for browsing property revenue")]
struct Args {
    /// Load the property list once, print it as JSON and exit
    #[arg(short, long)]
    list: bool,

    /// Backend base URL (overrides config.toml)
    #[arg(long, env = "PROPDASH_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the backend (overrides config.toml)
    #[arg(long, env = "PROPDASH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.list);

    let config = AppConfig::load()
        .unwrap_or_default()
        .with_overrides(args.api_url, args.token, args.timeout);

    let source: Arc<dyn PropertySource> =
        match HttpPropertySource::new(&config.api_url, config.api_token.clone(), config.timeout()) {
            Ok(source) => {
                tracing::info!(url = %source.url(), "Using property API");
                Arc::new(source)
            }
            Err(e) => {
                // Still mount: the dashboard reports the failure like any other load error
                tracing::error!(error = %e, "Invalid backend configuration");
                Arc::new(UnavailableSource::new(&e))
            }
        };

    if args.list {
        return print_properties(source).await;
    }

    run_tui(source).await
}

/// Log to stderr for one-shot commands, to a file while the TUI owns the
/// terminal. Filter comes from RUST_LOG.
fn init_logging(to_stderr: bool) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::from_default_env());

    if to_stderr {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return;
    }

    match open_log_file() {
        Some(file) => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init(),
        // No writable cache dir: stay silent rather than draw over the UI
        None => registry.init(),
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("propdash");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("propdash.log"))
        .ok()
}

/// One load with the same reconciliation as the TUI, printed as JSON
async fn print_properties(source: Arc<dyn PropertySource>) -> Result<()> {
    let mut dashboard = Dashboard::new();
    if let Some(pending) = dashboard.mount(source) {
        if let Some(outcome) = pending.wait().await {
            dashboard.apply(outcome);
        }
    }

    let output = serde_json::json!({
        "properties": dashboard.properties(),
        "selected": dashboard.selected(),
        "error": dashboard.error(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(source: Arc<dyn PropertySource>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source);

    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            if let Err(e) = app.handle_key(key) {
                                tracing::warn!("Key handling failed: {}", e);
                            }
                        }
                    }
                }
            }
        }

        // Pick up a finished load, expire status messages
        app.tick();
    }
}
