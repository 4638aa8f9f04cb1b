use clap::Parser;
use std::path::PathBuf;

use crate::controller::TimerConfiguration;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "⏳ tminus - A Terminal Countdown Timer")]
pub struct Args {
    /// Preset duration, e.g. `1h30m`, `90s` or plain seconds
    #[arg(short, long, value_parser = parse_duration)]
    pub duration: Option<TimerConfiguration>,
    /// Start counting immediately
    #[arg(short, long)]
    pub start: bool,
    #[arg(short = 't', long)]
    pub theme: Option<String>,
    #[arg(long)]
    pub no_sound: bool,
    #[arg(long)]
    pub no_notify: bool,
    /// Where preferences and the log file live
    #[arg(long, default_value = "tminus")]
    pub data_dir: PathBuf,
}

pub fn parse_duration(s: &str) -> Result<TimerConfiguration, String> {
    let s = s.trim().to_lowercase();
    let mut total: u64 = 0;
    let mut num = String::new();

    let mut take = |num: &mut String, scale: u64, what: &str| -> Result<(), String> {
        let n = num.parse::<u64>().map_err(|_| format!("Invalid {}", what))?;
        total = total.saturating_add(n.saturating_mul(scale));
        num.clear();
        Ok(())
    };

    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'h' => take(&mut num, 3600, "hours")?,
            'm' => take(&mut num, 60, "minutes")?,
            's' => take(&mut num, 1, "seconds")?,
            _ => return Err("Invalid format".into()),
        }
    }
    if !num.is_empty() {
        take(&mut num, 1, "seconds")?;
    }

    if total == 0 {
        return Err("Duration must be > 0".into());
    }
    u32::try_from(total)
        .ok()
        .and_then(TimerConfiguration::from_total_seconds)
        .ok_or_else(|| "Duration must be at most 23h59m59s".into())
}
