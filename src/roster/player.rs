// Player identity and per-week game logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{calculate_points, GameStatline, ScoringRules};

use super::position::Position;

/// A rosterable player with their season game log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Real-world team abbreviation (e.g. "KC"). None for free agents.
    #[serde(default)]
    pub nfl_team: Option<String>,
    /// Week number -> raw statline. Weeks without a game are simply absent.
    #[serde(default)]
    pub game_log: BTreeMap<u32, GameStatline>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position,
            nfl_team: None,
            game_log: BTreeMap::new(),
        }
    }

    /// Builder-style helper used heavily in tests and fixtures.
    pub fn with_week(mut self, week: u32, stats: GameStatline) -> Self {
        self.game_log.insert(week, stats);
        self
    }

    /// Fantasy points for one week. `None` when the player had no game
    /// (bye week, injury) — distinct from playing and scoring zero.
    pub fn week_points(&self, week: u32, rules: &ScoringRules) -> Option<f64> {
        self.game_log
            .get(&week)
            .map(|stats| calculate_points(self.position, stats, rules))
    }

    /// Season total across every logged week.
    pub fn season_points(&self, rules: &ScoringRules) -> f64 {
        self.game_log
            .values()
            .map(|stats| calculate_points(self.position, stats, rules))
            .sum()
    }

    /// Per-game average, or 0.0 when no games have been logged.
    pub fn average_points(&self, rules: &ScoringRules) -> f64 {
        if self.game_log.is_empty() {
            return 0.0;
        }
        self.season_points(rules) / self.game_log.len() as f64
    }
}
