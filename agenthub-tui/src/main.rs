use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use agenthub_core::{ensure_data_dir, logging, HubConfig};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenthub_tui::app::App;

fn main() -> Result<()> {
    let config = HubConfig::load().context("Failed to load configuration")?;
    setup_logging(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut app = rt.block_on(App::new(&config))?;

    let mut terminal = setup_terminal()?;
    let result = rt.block_on(app.run(&mut terminal));
    restore_terminal(&mut terminal)?;

    if let Err(e) = result {
        eprintln!("Application error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Logs go to a file; writing to stdout would corrupt the terminal.
fn setup_logging(config: &HubConfig) -> Result<()> {
    let path = if config.logging.file_path.is_empty() {
        ensure_data_dir()?.join("agenthub-tui.log")
    } else {
        PathBuf::from(&config.logging.file_path)
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = logging::env_filter(&config.logging, &["agenthub_tui", "agenthub_core"]);
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(Mutex::new(file)))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
