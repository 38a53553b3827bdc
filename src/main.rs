//! feed-explorer: page through a remote JSON collection in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲ FetchRequest          ▲
//!      └───────────────────────┤ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`**: the `PageSource` trait and the HTTP JSON implementation.
//! * **`feed`**: the paging state machine (reset vs. continue, supersession).
//! * **`debounce`** / **`sentinel`**: search quiet-interval and
//!   infinite-scroll edge detection.
//! * **`fetch`**: runs one request at a time on tokio, aborting superseded
//!   ones.
//! * **`app`**: owns all application state and the outbound request slot.
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`**: CLI flags and optional TOML file.
//! * **`main`**: wires everything together and runs the event loop.

mod app;
mod config;
mod debounce;
mod error;
mod feed;
mod fetch;
mod input;
mod sentinel;
mod source;
mod ui;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Cli, Settings};
use fetch::Fetcher;
use source::{HttpSource, PageSource};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send tracing output to `path`.  The UI owns stdout, so without a log file
/// no subscriber is installed at all.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // -- parse arguments -----------------------------------------------------
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    init_logging(settings.log_file.as_deref())?;
    info!(url = %settings.url, page_size = settings.page_size, "starting feed-explorer");

    install_panic_hook();

    // -- start the fetch runtime ---------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    let source: Arc<dyn PageSource> = Arc::new(HttpSource::new(&settings.url, &settings.label));
    let (mut fetcher, mut rx) = Fetcher::new(source, runtime.handle().clone());

    // -- terminal setup (RAII; Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(&settings, fetcher.source_name());
    app.mount();

    // -- main event loop -----------------------------------------------------
    // Each ~50 ms iteration:
    //   1. Apply finished fetches and settle the debounced query.
    //   2. Render, then check the infinite-scroll sentinel.
    //   3. Poll for keyboard input.
    //   4. Hand the latest queued request to the fetcher.
    let tick_rate = Duration::from_millis(50);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.on_fetch(msg);
        }
        app.tick(Instant::now());

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;
        app.check_sentinel();

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if let Some(request) = app.take_request() {
            fetcher.issue(request);
        }

        if app.quit {
            break;
        }
    }

    // Abort whatever is still running before the runtime goes away.
    drop(fetcher);
    runtime.shutdown_timeout(Duration::from_millis(200));
    info!("feed-explorer exited");

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
