mod app;
mod cli;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::prelude::*;
use std::{fs::OpenOptions, io, path::Path, time::Instant};

use app::{handle_input, App, TICK_RATE};
use cli::Args;
use config::{ensure_data_dir, Config, LOG_FILE};
use controller::TimerController;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// ============================================================================
// Logging
// ============================================================================

// The terminal is in raw mode, so log lines go to a file in the data dir.
fn init_logging(data_dir: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = ensure_data_dir(&args.data_dir)?;
    init_logging(&data_dir)?;
    info!("tminus {} starting", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(&data_dir);

    // CLI overrides
    if let Some(t) = args.theme { config.theme = t; }
    if args.no_sound { config.sound_enabled = false; }
    if args.no_notify { config.notifications_enabled = false; }

    let timer = TimerController::new(args.duration.unwrap_or_default());
    let mut app = App::new(config, timer, data_dir);
    if args.start {
        app.start();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!("exiting with error: {}", e);
    }
    info!("tminus exiting");
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_input(key, app) {
                    return Ok(());
                }
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        if elapsed >= TICK_RATE {
            app.update(elapsed);
            last_tick = now;
        }
    }
}
