use std::{collections::BTreeMap, fmt::Display, fs, path::Path, path::PathBuf};
use strsim::jaro_winkler;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Gym,
    Cardio,
    Custom,
}

impl Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Gym => "gym",
            Self::Cardio => "cardio",
            Self::Custom => "custom",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Text,
    Json,
}

/// Print `payload` as pretty JSON, or run the `text` fallback renderer.
pub fn emit<T: Serialize>(fmt: OutputFmt, payload: &T, text: impl FnOnce()) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(payload) {
            Ok(s) => println!("{}", s),
            Err(e) => println!("{} could not serialize output: {e}", "error:".red().bold()),
        },
        OutputFmt::Text => text(),
    }
}

/// Flat key/value settings persisted as TOML under the user config dir.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                toml::from_str(&raw).with_context(|| format!("parsing config `{}`", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading config `{}`", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating `{}`", dir.display()))?;
        }

        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("writing config `{}`", path.display()))?;

        Ok(())
    }

    pub fn db_path(&self) -> Option<&str> {
        self.map.get("db_path").map(String::as_str)
    }
}

pub fn config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("ferrum").join("config.toml"))
        .context("could not determine the user config directory")
}

pub fn default_db_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("ferrum").join("ferrum.db"))
        .context("could not determine the user data directory")
}

/// Return the closest known exercise name for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_name_suggestion<'a>(input: &str, names: &'a [String]) -> Option<&'a str> {
    if names.is_empty() {
        return None;
    }

    let inp = input.to_ascii_lowercase();
    assert!(!inp.trim().is_empty(), "best_name_suggestion called with empty input"); // Sanity check.

    // Collect (name, score) pairs.
    let mut scores: Vec<(&'a str, f64)> = names
        .iter()
        .map(|n| (n.as_str(), jaro_winkler(&inp, &n.to_ascii_lowercase())))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let (best_name, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    // Tune these two constants to taste.
    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best_name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn suggestion_catches_close_typo() {
        let known = names(&["Bench Press", "Deadlift", "Squat"]);
        assert_eq!(best_name_suggestion("bench pres", &known), Some("Bench Press"));
        assert_eq!(best_name_suggestion("deadlfit", &known), Some("Deadlift"));
    }

    #[test]
    fn suggestion_rejects_garbage_and_empty_vocab() {
        let known = names(&["Bench Press", "Deadlift"]);
        assert_eq!(best_name_suggestion("zzzzzz", &known), None);
        assert_eq!(best_name_suggestion("anything", &[]), None);
    }

    #[test]
    fn suggestion_is_case_insensitive() {
        let known = names(&["Overhead Press"]);
        assert_eq!(best_name_suggestion("OVERHEAD PRES", &known), Some("Overhead Press"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let path = std::env::temp_dir().join(format!("ferrum-config-{}.toml", uuid::Uuid::new_v4()));

        let mut cfg = Config::default();
        cfg.map.insert("db_path".into(), "/tmp/ferrum-test.db".into());
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.db_path(), Some("/tmp/ferrum-test.db"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn config_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("ferrum-missing-{}.toml", uuid::Uuid::new_v4()));
        let cfg = Config::load(&path).unwrap();
        assert!(cfg.map.is_empty());
        assert_eq!(cfg.db_path(), None);
    }
}
