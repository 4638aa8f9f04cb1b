//! Countdown state machine: dial in a duration, count it down, reset.
//!
//! Nothing in here knows about wall-clock time. The caller invokes
//! [`TimerController::tick`] once per elapsed second.

use log::{debug, info};

// ============================================================================
// Constants
// ============================================================================

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;
pub const URGENT_THRESHOLD_SECS: u32 = 5;

const SECS_PER_MINUTE: u32 = 60;
const SECS_PER_HOUR: u32 = 3600;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Select a valid amount of time!")]
pub struct InvalidDurationError;

// ============================================================================
// Pure helpers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub fn wrap(value: u32, min: u32, max: u32, direction: Direction) -> u32 {
    match direction {
        Direction::Up => if value == max { min } else { value + 1 },
        Direction::Down => if value == min { max } else { value - 1 },
    }
}

/// Renders seconds as `HH:MM:SS`, `MM:SS` or `SS`, dropping leading
/// segments that are zero. Hours are not capped at 99.
pub fn format_duration(total_secs: u32) -> String {
    let h = total_secs / SECS_PER_HOUR;
    let m = (total_secs / SECS_PER_MINUTE) % 60;
    let s = total_secs % 60;

    if h > 0 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{:02}:{:02}", m, s)
    } else {
        format!("{:02}", s)
    }
}

// ============================================================================
// Data Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hours,
    Minutes,
    Seconds,
}

impl TimeField {
    pub const ALL: [TimeField; 3] = [Self::Hours, Self::Minutes, Self::Seconds];

    pub fn max(self) -> u32 {
        match self {
            Self::Hours => MAX_HOURS,
            Self::Minutes => MAX_MINUTES,
            Self::Seconds => MAX_SECONDS,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Hours => "h",
            Self::Minutes => "m",
            Self::Seconds => "s",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Hours => Self::Minutes,
            Self::Minutes => Self::Seconds,
            Self::Seconds => Self::Hours,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Hours => Self::Seconds,
            Self::Minutes => Self::Hours,
            Self::Seconds => Self::Minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerConfiguration {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimerConfiguration {
    /// Splits a preset into fields. `None` when it would need more than 23 hours.
    pub fn from_total_seconds(total: u32) -> Option<Self> {
        let hours = total / SECS_PER_HOUR;
        if hours > MAX_HOURS {
            return None;
        }
        Some(Self {
            hours,
            minutes: (total / SECS_PER_MINUTE) % 60,
            seconds: total % 60,
        })
    }

    pub fn get(&self, field: TimeField) -> u32 {
        match field {
            TimeField::Hours => self.hours,
            TimeField::Minutes => self.minutes,
            TimeField::Seconds => self.seconds,
        }
    }

    pub fn adjust(&mut self, field: TimeField, direction: Direction) {
        let slot = match field {
            TimeField::Hours => &mut self.hours,
            TimeField::Minutes => &mut self.minutes,
            TimeField::Seconds => &mut self.seconds,
        };
        *slot = wrap(*slot, 0, field.max(), direction);
    }

    pub fn total_seconds(&self) -> u32 {
        self.hours * SECS_PER_HOUR + self.minutes * SECS_PER_MINUTE + self.seconds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownSession {
    total_secs: u32,
    remaining_secs: u32,
}

impl CountdownSession {
    fn new(total_secs: u32) -> Self {
        debug_assert!(total_secs > 0);
        Self { total_secs, remaining_secs: total_secs }
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn progress_fraction(&self) -> f64 {
        self.remaining_secs as f64 / self.total_secs as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Configuring(TimerConfiguration),
    Counting(CountdownSession),
}

// ============================================================================
// Controller
// ============================================================================

/// Owns either the configuration being dialled in or the running session.
///
/// Calls made in the wrong mode (adjusting while counting, ticking while
/// configuring, starting twice) are ignored.
#[derive(Debug, Clone)]
pub struct TimerController {
    mode: Mode,
    notice: bool,
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new(TimerConfiguration::default())
    }
}

impl TimerController {
    pub fn new(config: TimerConfiguration) -> Self {
        Self { mode: Mode::Configuring(config), notice: false }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.mode, Mode::Counting(_))
    }

    pub fn adjust_field(&mut self, field: TimeField, direction: Direction) {
        match &mut self.mode {
            Mode::Configuring(config) => config.adjust(field, direction),
            Mode::Counting(_) => debug!("ignoring {:?} adjustment while counting", field),
        }
    }

    pub fn start(&mut self) -> Result<(), InvalidDurationError> {
        let config = match self.mode {
            Mode::Configuring(config) => config,
            Mode::Counting(_) => {
                debug!("start requested while already counting");
                return Ok(());
            }
        };

        let total = config.total_seconds();
        if total == 0 {
            info!("refusing to start a zero-length countdown");
            self.notice = true;
            return Err(InvalidDurationError);
        }

        info!("countdown started: {} ({}s)", format_duration(total), total);
        self.mode = Mode::Counting(CountdownSession::new(total));
        self.notice = false;
        Ok(())
    }

    pub fn tick(&mut self) {
        let Mode::Counting(session) = &mut self.mode else {
            debug!("tick ignored while configuring");
            return;
        };
        if session.is_finished() {
            return;
        }

        session.remaining_secs -= 1;
        if session.is_finished() {
            info!("countdown finished after {}s", session.total_seconds());
        }
    }

    pub fn stop(&mut self) {
        let Mode::Counting(session) = self.mode else {
            debug!("stop ignored while configuring");
            return;
        };
        info!("countdown reset with {}s remaining", session.remaining_seconds());
        self.mode = Mode::Configuring(TimerConfiguration::default());
        self.notice = false;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = false;
    }

    pub fn has_notice(&self) -> bool {
        self.notice
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        match &self.mode {
            Mode::Counting(session) => Some(session.remaining_seconds()),
            Mode::Configuring(_) => None,
        }
    }

    /// While configuring this previews the dialled-in total.
    pub fn formatted_remaining(&self) -> String {
        match &self.mode {
            Mode::Counting(session) => format_duration(session.remaining_seconds()),
            Mode::Configuring(config) => format_duration(config.total_seconds()),
        }
    }

    pub fn progress_fraction(&self) -> Option<f64> {
        match &self.mode {
            Mode::Counting(session) => Some(session.progress_fraction()),
            Mode::Configuring(_) => None,
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.remaining_seconds()
            .is_some_and(|secs| secs <= URGENT_THRESHOLD_SECS)
    }

    pub fn is_finished(&self) -> bool {
        matches!(&self.mode, Mode::Counting(session) if session.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(h: u32, m: u32, s: u32) -> TimerController {
        let mut c = TimerController::default();
        for (field, n) in [(TimeField::Hours, h), (TimeField::Minutes, m), (TimeField::Seconds, s)] {
            for _ in 0..n {
                c.adjust_field(field, Direction::Up);
            }
        }
        c
    }

    fn config_of(c: &TimerController) -> TimerConfiguration {
        match c.mode() {
            Mode::Configuring(config) => *config,
            Mode::Counting(_) => panic!("expected configuring mode"),
        }
    }

    #[test]
    fn wrap_cycles_at_bounds() {
        assert_eq!(wrap(59, 0, 59, Direction::Up), 0);
        assert_eq!(wrap(0, 0, 59, Direction::Down), 59);
        assert_eq!(wrap(23, 0, 23, Direction::Up), 0);
        assert_eq!(wrap(10, 0, 23, Direction::Up), 11);
        assert_eq!(wrap(10, 0, 23, Direction::Down), 9);
    }

    #[test]
    fn wrap_is_a_bijection_and_up_down_cancel() {
        for max in [23, 59] {
            let mut ups: Vec<u32> = (0..=max).map(|v| wrap(v, 0, max, Direction::Up)).collect();
            ups.sort_unstable();
            assert_eq!(ups, (0..=max).collect::<Vec<_>>());

            for v in 0..=max {
                assert_eq!(wrap(wrap(v, 0, max, Direction::Up), 0, max, Direction::Down), v);
                assert_eq!(wrap(wrap(v, 0, max, Direction::Down), 0, max, Direction::Up), v);
            }
        }
    }

    #[test]
    fn format_duration_elides_leading_zero_segments() {
        assert_eq!(format_duration(0), "00");
        assert_eq!(format_duration(9), "09");
        assert_eq!(format_duration(59), "59");
        assert_eq!(format_duration(60), "01:00");
        assert_eq!(format_duration(65), "01:05");
        assert_eq!(format_duration(3599), "59:59");
        assert_eq!(format_duration(3600), "01:00:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(86399), "23:59:59");
    }

    #[test]
    fn format_duration_keeps_minutes_when_hours_shown() {
        for secs in (0..90_000).step_by(37) {
            let parts = format_duration(secs).split(':').count();
            if secs >= 3600 {
                assert_eq!(parts, 3, "{secs}");
            } else if secs >= 60 {
                assert_eq!(parts, 2, "{secs}");
            } else {
                assert_eq!(parts, 1, "{secs}");
            }
        }
    }

    #[test]
    fn adjust_touches_only_the_named_field() {
        let mut c = TimerController::default();
        c.adjust_field(TimeField::Minutes, Direction::Down);
        let config = config_of(&c);
        assert_eq!(config.get(TimeField::Hours), 0);
        assert_eq!(config.get(TimeField::Minutes), 59);
        assert_eq!(config.get(TimeField::Seconds), 0);

        c.adjust_field(TimeField::Hours, Direction::Down);
        assert_eq!(config_of(&c).get(TimeField::Hours), 23);
        assert_eq!(config_of(&c).get(TimeField::Minutes), 59);
    }

    #[test]
    fn start_with_zero_duration_fails_and_raises_notice() {
        let mut c = TimerController::default();
        assert_eq!(c.start(), Err(InvalidDurationError));
        assert!(!c.is_counting());
        assert!(c.has_notice());
        assert_eq!(InvalidDurationError.to_string(), "Select a valid amount of time!");

        c.dismiss_notice();
        assert!(!c.has_notice());
        assert!(!c.is_counting());
    }

    #[test]
    fn successful_start_clears_notice() {
        let mut c = TimerController::default();
        let _ = c.start();
        c.adjust_field(TimeField::Seconds, Direction::Up);
        assert!(c.has_notice());
        assert_eq!(c.start(), Ok(()));
        assert!(!c.has_notice());
    }

    #[test]
    fn ninety_second_session_runs_to_completion() {
        let mut c = configured(0, 1, 30);
        c.start().unwrap();

        match c.mode() {
            Mode::Counting(session) => assert_eq!(session.total_seconds(), 90),
            Mode::Configuring(_) => panic!("expected counting mode"),
        }
        assert_eq!(c.remaining_seconds(), Some(90));
        assert_eq!(c.progress_fraction(), Some(1.0));
        assert!(!c.is_finished());

        for _ in 0..90 {
            c.tick();
        }
        assert_eq!(c.remaining_seconds(), Some(0));
        assert!(c.is_finished());
        assert_eq!(c.progress_fraction(), Some(0.0));
        assert_eq!(c.formatted_remaining(), "00");

        let before = *c.mode();
        c.tick();
        assert_eq!(c.mode(), &before);
    }

    #[test]
    fn urgent_from_five_seconds_through_zero() {
        let mut c = configured(0, 0, 10);
        c.start().unwrap();

        let mut seen = Vec::new();
        while !c.is_finished() {
            c.tick();
            seen.push((c.remaining_seconds().unwrap(), c.is_urgent()));
        }
        for (remaining, urgent) in seen {
            assert_eq!(urgent, remaining <= 5, "at {remaining}s");
        }
    }

    #[test]
    fn stop_discards_the_session() {
        let mut c = configured(1, 2, 3);
        c.start().unwrap();
        c.tick();
        c.stop();

        assert_eq!(config_of(&c), TimerConfiguration::default());
        assert_eq!(c.remaining_seconds(), None);
        assert_eq!(c.progress_fraction(), None);
        assert!(!c.is_urgent());
        assert!(!c.is_finished());
    }

    #[test]
    fn stop_while_configuring_keeps_fields_and_notice() {
        let mut c = configured(0, 0, 0);
        let _ = c.start();
        c.adjust_field(TimeField::Minutes, Direction::Up);
        let before = *c.mode();

        c.stop();
        assert_eq!(c.mode(), &before);
        assert_eq!(config_of(&c).get(TimeField::Minutes), 1);
        assert!(c.has_notice());
    }

    #[test]
    fn wrong_mode_calls_are_ignored() {
        let mut c = configured(0, 0, 3);
        c.tick();
        assert_eq!(config_of(&c).total_seconds(), 3);

        c.start().unwrap();
        c.adjust_field(TimeField::Seconds, Direction::Up);
        assert_eq!(c.start(), Ok(()));
        assert_eq!(c.remaining_seconds(), Some(3));
    }

    #[test]
    fn configuring_previews_the_dialled_total() {
        let c = configured(0, 1, 5);
        assert_eq!(c.formatted_remaining(), "01:05");
    }

    #[test]
    fn presets_split_into_fields() {
        let config = TimerConfiguration::from_total_seconds(3661).unwrap();
        assert_eq!(config.get(TimeField::Hours), 1);
        assert_eq!(config.get(TimeField::Minutes), 1);
        assert_eq!(config.get(TimeField::Seconds), 1);
        assert_eq!(TimerConfiguration::from_total_seconds(86399).map(|c| c.total_seconds()), Some(86399));
        assert_eq!(TimerConfiguration::from_total_seconds(86400), None);
    }
}
