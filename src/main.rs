//! adminui - browse and edit a member list from the terminal.
//!
//! # Usage
//!
//! ```bash
//! adminui
//! adminui --endpoint https://example.com/members.json
//! adminui --file members.json --page-size 20
//! adminui --init-config
//! ```

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{error, info};

use adminui::api::{MemberSource, MembersClient};
use adminui::app::App;
use adminui::config::{Config, Settings};
use adminui::error::{AppError, Result};
use adminui::events::EventHandler;
use adminui::logging;
use adminui::tasks::TaskSpawner;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Search, page, select and edit a member list in the terminal
#[derive(Parser, Debug)]
#[command(name = "adminui", version, about, long_about = None)]
struct Cli {
    /// Member endpoint URL (overrides the config file and ADMINUI_ENDPOINT)
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    endpoint: Option<String>,

    /// Load members from a local JSON file instead of the network
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Rows per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            eprintln!("Error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut settings = Config::load_from(&config_path)?.settings;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(page_size) = cli.page_size {
        settings.page_size = page_size;
    }
    settings.validate()?;

    if cli.init_config {
        if config_path.exists() {
            return Err(AppError::other(format!(
                "Config file already exists at {}",
                config_path.display()
            )));
        }
        Config { settings }.save_to(&config_path)?;
        println!("Wrote configuration to {}", config_path.display());
        return Ok(());
    }

    let source = match cli.file {
        Some(path) => MemberSource::File(path),
        None => MemberSource::Remote(settings.endpoint.clone()),
    };
    let client = MembersClient::new(source, Duration::from_secs(settings.request_timeout_secs))?;

    info!(source = %client.source().describe(), page_size = settings.page_size, "Starting UI");

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &settings, &client).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| AppError::terminal(e.to_string()))?;

    // Leave the terminal usable if anything panics while the UI is up.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|e| AppError::terminal(e.to_string()))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Drive the event loop until the user quits.
async fn run_app(terminal: &mut Tui, settings: &Settings, client: &MembersClient) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let spawner = TaskSpawner::new(tx);
    let events = EventHandler::with_tick_rate(settings.tick_rate_ms);

    let mut app = App::new(settings, client.source().describe());
    let mut load = spawner.spawn_load(client, app.start_load());

    loop {
        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);

        while let Ok(message) = rx.try_recv() {
            app.handle_api_message(message);
        }

        if app.take_reload_request() {
            load.abort();
            load = spawner.spawn_load(client, app.start_load());
        }

        if app.should_quit() {
            break;
        }
    }

    load.abort();
    Ok(())
}
