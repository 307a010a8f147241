// Clippy configuration: enable pedantic but allow overly strict lints
#![allow(clippy::missing_errors_doc)] // Internal functions don't need # Errors docs
#![allow(clippy::missing_panics_doc)] // Internal functions don't need # Panics docs
#![allow(clippy::must_use_candidate)] // Not all getters need #[must_use]
#![allow(clippy::module_name_repetitions)] // e.g., ActionsMenu in menu module is fine
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)] // We're careful with our casts
#![allow(clippy::redundant_closure_for_method_calls)] // Sometimes closures are clearer
#![allow(clippy::needless_pass_by_value)] // PathBuf by value is fine for config loading

//! Curtain - transactions dashboard built on the curtain modal host
//!
//! Usage:
//!   curtain                     # Start TUI (default)
//!   curtain example-config      # Print an example config file
//!   curtain completions zsh     # Shell completions

mod app;
mod cli;
mod event;
mod tui;
mod ui;

use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::Result;
use curtain::config::CurtainConfig;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("/tmp/curtain/logs"),
        |dirs| dirs.cache_dir().join("curtain").join("logs"),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            cli::print_completions(shell);
            return Ok(());
        }
        Some(Commands::ExampleConfig) => {
            print!("{}", CurtainConfig::example());
            return Ok(());
        }
        None => {
            // TUI mode: continue with full setup
        }
    }

    // Initialize error handling, then restore the terminal ahead of its report
    color_eyre::install()?;
    tui::install_panic_hook();

    // Setup file logging with rotation; the terminal belongs to the TUI
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "curtain.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let log_filter = format!("curtain={}", cli.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    tracing::info!("Starting curtain v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {:?}", log_dir);

    let config = match &cli.config {
        Some(path) => CurtainConfig::load_from_path(path),
        None => CurtainConfig::load(),
    };
    tracing::debug!(?config, "Configuration resolved");

    let (event_tx, event_rx) = mpsc::channel(100);

    let result = run_tui(
        event_tx,
        event_rx,
        cli.tick_rate,
        cli.frame_rate,
        &config,
        cli.desktop_notify,
    )
    .await;

    if let Err(ref e) = result {
        tracing::error!("TUI error: {e:?}");
    }
    result
}

async fn run_tui(
    event_tx: mpsc::Sender<event::Event>,
    mut event_rx: mpsc::Receiver<event::Event>,
    tick_rate: f64,
    frame_rate: f64,
    config: &CurtainConfig,
    desktop_notify: bool,
) -> Result<()> {
    use std::time::{Duration, Instant};
    use tokio_util::sync::CancellationToken;

    let tick_duration = Duration::from_secs_f64(1.0 / tick_rate);
    let frame_duration = Duration::from_secs_f64(1.0 / frame_rate);

    tracing::info!(
        "TUI starting: {:.1} FPS, {:.1} ticks/sec",
        frame_rate,
        tick_rate
    );

    let mut terminal = tui::init()?;

    // RAII guard ensures terminal is restored on early return
    let _guard = tui::TerminalGuard;

    let mut app = App::new(config, event_tx.clone(), desktop_notify);

    // Cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    let input_tx = event_tx.clone();
    let input_cancel = cancel.clone();
    let input_handle = tokio::spawn(async move {
        event::input::listen(input_tx, input_cancel).await;
    });

    let mut last_frame = Instant::now();

    loop {
        // Modal requests are applied in one batch per frame
        app.sync_modals();

        // Frame rate limiting with dirty flag check
        let now = Instant::now();
        if app.needs_render && now.duration_since(last_frame) >= frame_duration {
            terminal.draw(|f| ui::render(f, &mut app))?;
            app.rendered();
            last_frame = now;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                app.handle_event(event);
            }
            Some(settlement) = app.modals.next_settlement() => {
                app.settle(settlement);
            }
            () = tokio::time::sleep(tick_duration) => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::debug!("Shutting down input listener");
    cancel.cancel();
    input_handle.abort();

    // Guard would restore on drop too, but report failures here
    tui::restore()?;
    terminal.show_cursor()?;

    Ok(())
}
