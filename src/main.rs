use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, time::Duration};
use tokio::sync::mpsc;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod app_event;
mod config;
mod error;
mod explorer;
mod models;
mod runtime;
mod storage;
mod ui;

use app::App;
use app_event::StorageEvent;
use config::{AppConfig, ConfigManager};
use explorer::{Explorer, ExplorerOptions, NoticeKind};
use storage::{HttpStorage, RemotePath};

/// Terminal file manager for a remote storage server.
#[derive(Parser, Debug)]
#[command(name = "cloudnav", version, about)]
struct Args {
    /// Storage server root, overrides `base_url` from the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<String>,

    /// Remote folder to open first, e.g. `docs/2024`
    #[arg(long, default_value = "/")]
    path: String,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(file) => ConfigManager::with_file(file.clone()),
        None => ConfigManager::new()?,
    };
    let mut config = manager
        .load_config()
        .with_context(|| format!("Config file {}", manager.get_config_path().display()))?;

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(log_dir) = &args.log_dir {
        config.log_dir = log_dir.clone();
    }
    Ok(config)
}

fn init_logging(log_dir: &str) -> Result<()> {
    if !std::path::Path::new(log_dir).exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let log_file = format!(
        "{}/cloudnav_{}.log",
        log_dir,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let file = File::create(&log_file)?;

    fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::from_default_env().add_directive("cloudnav=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.log_dir)?;

    info!("Starting cloudnav against {}", config.base_url);

    let storage = Arc::new(HttpStorage::new(
        &config.base_url,
        config.request_timeout(),
    )?);
    let explorer = Explorer::new(
        RemotePath::parse(&args.path)?,
        ExplorerOptions {
            base_url: storage.base_url().clone(),
            confirmation_phrase: config.confirmation_phrase.clone(),
            always_confirm_bulk_delete: config.always_confirm_bulk_delete,
            notice_ttl: config.notice_ttl(),
        },
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(explorer), storage).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    storage: Arc<HttpStorage>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<StorageEvent>(64);

    let effects = app.explorer.start();
    dispatch(&mut app, &storage, &tx, effects);

    loop {
        app.explorer.tick();
        terminal.draw(|f| ui::draw(f, &mut app))?;

        while let Ok(event) = rx.try_recv() {
            debug!("Storage event: {:?}", event);
            let effects = app.on_storage_event(event);
            dispatch(&mut app, &storage, &tx, effects);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let effects = app.handle_key(key);
                dispatch(&mut app, &storage, &tx, effects);
            }
        }

        if app.should_quit {
            info!("Quitting");
            return Ok(());
        }
    }
}

fn dispatch(
    app: &mut App,
    storage: &Arc<HttpStorage>,
    tx: &mpsc::Sender<StorageEvent>,
    effects: Vec<explorer::Effect>,
) {
    if let Some(message) = runtime::dispatch(storage, tx, effects) {
        app.explorer.notify(NoticeKind::Failure, message);
    }
}
