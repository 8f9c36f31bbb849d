// Configuration loading and parsing (league.toml).

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schedule::availability::{MAX_AVAILABLE_PLAYERS, MIN_AVAILABLE_PLAYERS};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level tables in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Date of the season's first week.
    pub start_date: NaiveDate,
    /// Number of weeks in the season.
    pub weeks: u32,
    /// Scheduling rounds played each week.
    pub rounds_per_week: u32,
    /// Courts available each week. Four players per court, so this
    /// fixes the weekly player capacity.
    pub courts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_roster_path")]
    pub roster: String,
    #[serde(default = "default_database_path")]
    pub database: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            roster: default_roster_path(),
            database: default_database_path(),
        }
    }
}

fn default_roster_path() -> String {
    "data/roster.csv".to_string()
}

fn default_database_path() -> String {
    "courtmix.db".to_string()
}

/// The assembled configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub paths: PathsConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative
/// to the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        paths: league_file.paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    if league.weeks == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.weeks".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !(1..=4).contains(&league.rounds_per_week) {
        return Err(ConfigError::ValidationError {
            field: "league.rounds_per_week".into(),
            message: format!("must be between 1 and 4, got {}", league.rounds_per_week),
        });
    }

    // Every court seats four players, so the court count fixes the
    // weekly player capacity checked by the availability policy.
    let capacity = league.courts as usize * 4;
    if !(MIN_AVAILABLE_PLAYERS..=MAX_AVAILABLE_PLAYERS).contains(&capacity) {
        return Err(ConfigError::ValidationError {
            field: "league.courts".into(),
            message: format!(
                "{} courts seat {capacity} players; capacity must be between \
                 {MIN_AVAILABLE_PLAYERS} and {MAX_AVAILABLE_PLAYERS}",
                league.courts
            ),
        });
    }

    if config.paths.roster.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "paths.roster".into(),
            message: "must not be empty".into(),
        });
    }

    if config.paths.database.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "paths.database".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
