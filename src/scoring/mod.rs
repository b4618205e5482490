// Scoring domain: league rule tables, weekly statlines, the points
// calculator, and matchup aggregation.

pub mod calculator;
pub mod matchup;
pub mod rules;
pub mod statline;

pub use calculator::calculate_points;
pub use matchup::{matchup_winner, slot_points, team_week_score, SlotScore, TeamWeekScore};
pub use rules::{ScoringRules, ScoringSetting};
pub use statline::GameStatline;
