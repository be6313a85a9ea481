use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use prompt_gallery::clipboard::ClipboardBridge;
use prompt_gallery::keymap::action_for_key;
use prompt_gallery::terminal::TerminalGuard;
use prompt_gallery::ui::draw;
use prompt_gallery::{App, Config, GenerationClient, PromptCatalog};

fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config)?;

    tracing::info!("Starting prompt gallery...");

    let catalog = PromptCatalog::embedded().context("failed to load prompt catalog")?;
    tracing::info!(prompts = catalog.list().len(), "prompt catalog loaded");

    let client = GenerationClient::new(&config).context("failed to build HTTP client")?;
    if !client.has_credential() {
        tracing::warn!("API_KEY is not set; generation requests will fail");
    }

    // Requests and timers run here; the UI loop stays on the main thread
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let mut app = App::new(
        catalog,
        config,
        client,
        ClipboardBridge::new(),
        runtime.handle().clone(),
    );

    // Setup terminal; the guard restores it on every early return
    let mut guard = TerminalGuard::enter(io::stdout())?;
    install_panic_hook();
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    guard.restore()?;

    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    tracing::info!("Exiting prompt gallery");
    result.context("terminal error")
}

fn init_tracing(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Leave raw mode before the default hook prints, or the message is garbled.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let tick = Duration::from_millis(app.config.tick_rate_ms);

    loop {
        // Results from background requests and timers
        app.drain_background();

        app.tick();

        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action_for_key(key, app.ui.screen) {
                    app.dispatch(action);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
