use log::warn;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::{Path, PathBuf}};

pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "tminus.log";
pub const THEMES: &[&str] = &["default", "nord", "dracula", "gruvbox", "solarized"];

// ============================================================================
// Preferences
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl Config {
    pub fn load(data_dir: &Path) -> Self {
        load_json(&data_dir.join(CONFIG_FILE))
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join(CONFIG_FILE);
        if let Err(e) = save_json(&path, self) {
            warn!("could not save {}: {}", path.display(), e);
        }
    }
}

// ============================================================================
// Themes
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub digits_color: Color,
    pub progress_color: Color,
    pub urgent_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

pub fn get_theme(name: &str) -> Theme {
    match name {
        "nord" => Theme {
            digits_color: Color::Rgb(236, 239, 244),
            progress_color: Color::Rgb(163, 190, 140),
            urgent_color: Color::Rgb(191, 97, 106),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(136, 192, 208),
        },
        "dracula" => Theme {
            digits_color: Color::Rgb(248, 248, 242),
            progress_color: Color::Rgb(80, 250, 123),
            urgent_color: Color::Rgb(255, 85, 85),
            border_color: Color::Rgb(200, 100, 255),
            accent_color: Color::Rgb(255, 121, 198),
        },
        "gruvbox" => Theme {
            digits_color: Color::Rgb(235, 219, 178),
            progress_color: Color::Rgb(184, 187, 38),
            urgent_color: Color::Rgb(251, 73, 52),
            border_color: Color::Rgb(255, 200, 100),
            accent_color: Color::Rgb(254, 128, 25),
        },
        "solarized" => Theme {
            digits_color: Color::Rgb(253, 246, 227),
            progress_color: Color::Rgb(133, 153, 0),
            urgent_color: Color::Rgb(220, 50, 47),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(42, 161, 152),
        },
        _ => Theme {
            digits_color: Color::White,
            progress_color: Color::Green,
            urgent_color: Color::Red,
            border_color: Color::Rgb(0, 200, 255),
            accent_color: Color::Cyan,
        },
    }
}

pub fn cycle_theme(current: &str, forward: bool) -> &'static str {
    let idx = THEMES.iter().position(|&t| t == current).unwrap_or(0);
    let new_idx = if forward {
        (idx + 1) % THEMES.len()
    } else if idx == 0 {
        THEMES.len() - 1
    } else {
        idx - 1
    };
    THEMES[new_idx]
}

// ============================================================================
// Files
// ============================================================================

pub fn ensure_data_dir(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    fs::write(path, serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tminus-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        ensure_data_dir(&dir).unwrap()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = scratch_dir("missing");
        assert_eq!(Config::load(&dir), Config::default());
    }

    #[test]
    fn saved_preferences_load_back() {
        let dir = scratch_dir("roundtrip");
        let config = Config {
            theme: "nord".into(),
            sound_enabled: false,
            notifications_enabled: true,
        };
        config.save(&dir);
        assert_eq!(Config::load(&dir), config);
    }

    #[test]
    fn corrupt_or_partial_files_fall_back() {
        let dir = scratch_dir("partial");
        fs::write(dir.join(CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(Config::load(&dir), Config::default());

        fs::write(dir.join(CONFIG_FILE), r#"{"theme":"dracula"}"#).unwrap();
        let loaded = Config::load(&dir);
        assert_eq!(loaded.theme, "dracula");
        assert!(loaded.sound_enabled);
    }

    #[test]
    fn theme_cycling_wraps_both_ways() {
        assert_eq!(cycle_theme("default", true), "nord");
        assert_eq!(cycle_theme("solarized", true), "default");
        assert_eq!(cycle_theme("default", false), "solarized");
        assert_eq!(cycle_theme("bogus", true), "nord");
    }

    #[test]
    fn unknown_theme_is_default() {
        assert_eq!(get_theme("bogus"), get_theme("default"));
    }
}
