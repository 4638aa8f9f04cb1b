use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use notify_rust::{Notification, Urgency};
use std::{path::PathBuf, time::Duration};

use crate::config::{cycle_theme, get_theme, Config, Theme};
use crate::controller::{format_duration, Direction, Mode, TimeField, TimerController};

pub const TICK_RATE: Duration = Duration::from_millis(50);
const ONE_SECOND: Duration = Duration::from_secs(1);
pub const ANIMATION_FRAMES: u8 = 20;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum View {
    Timer,
    Help,
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub timer: TimerController,
    pub selected_field: TimeField,
    pub current_view: View,
    pub theme: Theme,
    pub animation_frame: u8,
    pub ends_at: Option<DateTime<Local>>,
    config: Config,
    data_dir: PathBuf,
    since_last_second: Duration,
    announced: bool,
}

impl App {
    pub fn new(config: Config, timer: TimerController, data_dir: PathBuf) -> Self {
        Self {
            timer,
            selected_field: TimeField::Hours,
            current_view: View::Timer,
            theme: get_theme(&config.theme),
            animation_frame: 0,
            ends_at: None,
            config,
            data_dir,
            since_last_second: Duration::ZERO,
            announced: false,
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.config.theme
    }

    /// Advances by `elapsed` of wall-clock time, ticking once per whole second.
    pub fn update(&mut self, elapsed: Duration) {
        if self.timer.is_counting() && !self.timer.is_finished() {
            self.since_last_second += elapsed;
            while self.since_last_second >= ONE_SECOND {
                self.since_last_second -= ONE_SECOND;
                self.timer.tick();
            }
        }

        if self.timer.is_finished() && !self.announced {
            self.announced = true;
            if let Mode::Counting(session) = self.timer.mode() {
                let body = format!("Your {} countdown has finished.", format_duration(session.total_seconds()));
                notify("Time is over! ⏰", &body, self.config.notifications_enabled, self.config.sound_enabled);
            }
        }

        self.animation_frame = self.animation_frame.wrapping_add(1) % ANIMATION_FRAMES;
    }

    pub fn start(&mut self) {
        // A failed start leaves the notice raised for the snackbar.
        if self.timer.start().is_ok() {
            self.since_last_second = Duration::ZERO;
            self.announced = false;
            self.ends_at = self.timer.remaining_seconds()
                .map(|secs| Local::now() + chrono::Duration::seconds(i64::from(secs)));
        }
    }

    pub fn restart(&mut self) {
        self.timer.stop();
        self.since_last_second = Duration::ZERO;
        self.announced = false;
        self.ends_at = None;
        self.selected_field = TimeField::Hours;
    }

    fn switch_theme(&mut self, forward: bool) {
        self.config.theme = cycle_theme(&self.config.theme, forward).into();
        self.theme = get_theme(&self.config.theme);
        info!("theme switched to {}", self.config.theme);
        self.config.save(&self.data_dir);
    }
}

// ============================================================================
// Event Handlers
// ============================================================================

/// Returns `true` when the app should quit.
pub fn handle_input(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return true;
    }

    if app.current_view == View::Help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('h')) {
            app.current_view = View::Timer;
        }
        return false;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.current_view = View::Help;
            return false;
        }
        KeyCode::Char('t') => {
            app.switch_theme(true);
            return false;
        }
        KeyCode::Char('T') => {
            app.switch_theme(false);
            return false;
        }
        _ => {}
    }

    if app.timer.is_counting() {
        handle_counting(key, app);
    } else {
        handle_configuring(key, app);
    }
    false
}

fn handle_configuring(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
            app.selected_field = app.selected_field.prev();
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            app.selected_field = app.selected_field.next();
        }
        KeyCode::Up | KeyCode::Char('k') => app.timer.adjust_field(app.selected_field, Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => app.timer.adjust_field(app.selected_field, Direction::Down),
        KeyCode::Enter | KeyCode::Char(' ') => app.start(),
        KeyCode::Esc | KeyCode::Char('x') => app.timer.dismiss_notice(),
        _ => {}
    }
}

fn handle_counting(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Char('r') | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc) {
        app.restart();
    }
}

// ============================================================================
// Utilities
// ============================================================================

fn notify(title: &str, body: &str, popup: bool, sound: bool) {
    if popup {
        if let Err(e) = Notification::new()
            .summary(title)
            .body(body)
            .appname("tminus")
            .icon("alarm-clock")
            .urgency(Urgency::Critical)
            .show()
        {
            log::warn!("desktop notification failed: {}", e);
        }
    }

    if sound {
        std::thread::spawn(|| {
            for (cmd, file) in [
                ("paplay", "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga"),
                ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
                ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
            ] {
                if std::path::Path::new(file).exists() {
                    let _ = std::process::Command::new(cmd)
                        .arg(file)
                        .stdout(std::process::Stdio::null())
                        .stderr(std::process::Stdio::null())
                        .spawn();
                    break;
                }
            }
        });
    }
}
