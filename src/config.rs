// Configuration loading and parsing (league.toml).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cards::DistributionMechanic;
use crate::roster::SlotKind;
use crate::schedule::DEFAULT_CUTOFF_HOUR;

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

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub mechanic: DistributionMechanic,
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    season: i32,
    num_teams: usize,
    #[serde(default = "default_cutoff_hour")]
    cutoff_hour: u32,
    roster: HashMap<String, usize>,
    cards: CardsSection,
    database: DatabaseSection,
}

fn default_cutoff_hour() -> u32 {
    DEFAULT_CUTOFF_HOUR
}

#[derive(Debug, Clone, Deserialize)]
struct CardsSection {
    distribution_mechanic: String,
    #[serde(default = "default_true")]
    playoff_bonus: bool,
    #[serde(default)]
    legend_decay: bool,
    #[serde(default)]
    nerf_rule: bool,
    #[serde(default)]
    trade_tax: bool,
    #[serde(default)]
    playoff_reset: bool,
}

fn default_true() -> bool {
    true
}

/// Card scoring modifier toggles. Declared league settings that are
/// persisted and surfaced but have no gameplay effect yet.
///
/// Serializes with camelCase keys so the persisted league document keeps
/// the platform's field spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardModifiers {
    pub playoff_bonus: bool,
    pub legend_decay: bool,
    pub nerf_rule: bool,
    pub trade_tax: bool,
    pub playoff_reset: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

/// The public league config assembled from the league.toml sections.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub name: String,
    pub season: i32,
    pub num_teams: usize,
    pub cutoff_hour: u32,
    pub roster: HashMap<String, usize>,
    pub modifiers: CardModifiers,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative
/// to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let section = league_file.league;

    let mechanic = DistributionMechanic::from_str_mechanic(&section.cards.distribution_mechanic)
        .ok_or_else(|| ConfigError::ValidationError {
            field: "league.cards.distribution_mechanic".into(),
            message: format!(
                "unknown mechanic `{}`",
                section.cards.distribution_mechanic
            ),
        })?;

    let config = Config {
        league: LeagueConfig {
            name: section.name,
            season: section.season,
            num_teams: section.num_teams,
            cutoff_hour: section.cutoff_hour,
            roster: section.roster,
            modifiers: CardModifiers {
                playoff_bonus: section.cards.playoff_bonus,
                legend_decay: section.cards.legend_decay,
                nerf_rule: section.cards.nerf_rule,
                trade_tax: section.cards.trade_tax,
                playoff_reset: section.cards.playoff_reset,
            },
        },
        mechanic,
        db_path: section.database.path,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, the app will fail to load config.
        // Return an error with a clear message about the missing defaults directory.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        // Skip non-files and entries without a file name
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
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

    if league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    if league.num_teams % 2 != 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: format!("must be even for head-to-head scheduling, got {}", league.num_teams),
        });
    }

    if !(2000..=2100).contains(&league.season) {
        return Err(ConfigError::ValidationError {
            field: "league.season".into(),
            message: format!("must be a plausible season year, got {}", league.season),
        });
    }

    if league.cutoff_hour >= 24 {
        return Err(ConfigError::ValidationError {
            field: "league.cutoff_hour".into(),
            message: format!("must be an hour of day (0-23), got {}", league.cutoff_hour),
        });
    }

    // Every roster key must be a known slot label.
    for label in league.roster.keys() {
        if SlotKind::from_str_slot(label).is_none() {
            return Err(ConfigError::ValidationError {
                field: format!("league.roster.{label}"),
                message: "unknown roster slot label".into(),
            });
        }
    }

    // A lineup with no starters can never score.
    let starter_count: usize = league
        .roster
        .iter()
        .filter(|(label, _)| {
            !matches!(
                SlotKind::from_str_slot(label),
                Some(SlotKind::Bench) | Some(SlotKind::InjuredReserve) | None
            )
        })
        .map(|(_, count)| count)
        .sum();
    if starter_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.roster".into(),
            message: "must define at least one starter slot".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
