// A single player's (or unit's) raw stats for one game.

use serde::{Deserialize, Serialize};

/// Raw stats for one game, as stored in a team's game log documents.
///
/// Every field is optional: a statline only carries the stats that actually
/// occurred, and the calculator skips absent fields entirely. Field names
/// keep the platform's camelCase spelling so stored documents deserialize
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatline {
    // Passing
    pub passing_yards: Option<f64>,
    pub passing_touchdowns: Option<f64>,
    pub interceptions_thrown: Option<f64>,
    pub passing_two_point_conversions: Option<f64>,
    pub times_sacked: Option<f64>,

    // Rushing
    pub rushing_yards: Option<f64>,
    pub rushing_touchdowns: Option<f64>,
    pub rushing_two_point_conversions: Option<f64>,

    // Receiving
    pub receptions: Option<f64>,
    pub receiving_yards: Option<f64>,
    pub receiving_touchdowns: Option<f64>,
    pub receiving_two_point_conversions: Option<f64>,

    // Kicking
    pub pat_made: Option<f64>,
    pub field_goals_0_to_39: Option<f64>,
    pub field_goals_40_to_49: Option<f64>,
    pub field_goals_50_to_59: Option<f64>,
    pub field_goals_60_plus: Option<f64>,
    pub field_goals_missed_0_to_39: Option<f64>,
    pub field_goals_missed_40_plus: Option<f64>,

    // Team defense / special teams (also used by IDP sacks etc.)
    pub sacks: Option<f64>,
    pub defensive_interceptions: Option<f64>,
    pub fumbles_recovered: Option<f64>,
    pub safeties: Option<f64>,
    pub blocked_kicks: Option<f64>,
    pub interception_touchdowns: Option<f64>,
    pub blocked_kick_touchdowns: Option<f64>,
    /// Kick and punt return scores are reported as a single combined count.
    pub return_touchdowns: Option<f64>,
    /// Generic defensive touchdown count: fumble returns land here.
    pub defensive_touchdowns: Option<f64>,
    pub points_allowed: Option<f64>,
    pub yards_allowed: Option<f64>,
    pub two_point_returns: Option<f64>,
    pub one_point_safeties: Option<f64>,

    // Miscellaneous (offensive players)
    pub kick_return_touchdowns: Option<f64>,
    pub punt_return_touchdowns: Option<f64>,
    pub fumble_return_touchdowns: Option<f64>,
    pub fumbles_lost: Option<f64>,

    // Individual defensive players
    pub solo_tackles: Option<f64>,
    pub assisted_tackles: Option<f64>,
    pub fumbles_forced: Option<f64>,
    pub tackles_for_loss: Option<f64>,
    pub passes_defensed: Option<f64>,

    // Head coach / game context
    /// "W", "L", or "T" from the team's perspective.
    pub game_result: Option<String>,
    pub team_score: Option<f64>,
    pub opponent_score: Option<f64>,
}

impl GameStatline {
    /// Score margin from the team's perspective, when both scores are known.
    pub fn margin(&self) -> Option<f64> {
        match (self.team_score, self.opponent_score) {
            (Some(us), Some(them)) => Some(us - them),
            _ => None,
        }
    }
}
