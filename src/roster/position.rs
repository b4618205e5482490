// Player position representation and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions used for roster slot assignment and card targeting.
///
/// Serialized with the platform abbreviations so stored documents keep
/// their original shape. "D/ST" and "DST" are accepted as aliases for the
/// team defense on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF", alias = "D/ST", alias = "DST")]
    Defense,
    #[serde(rename = "HC")]
    HeadCoach,
    #[serde(rename = "DL")]
    DefensiveLineman,
    #[serde(rename = "LB")]
    Linebacker,
    #[serde(rename = "DB")]
    DefensiveBack,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles platform-style abbreviations:
    /// - "QB" -> Quarterback, "RB" -> RunningBack, "WR" -> WideReceiver
    /// - "D/ST", "DST", and "DEF" all normalize to Defense
    /// - "HC" -> HeadCoach, "DL"/"LB"/"DB" -> individual defensive players
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "D/ST" | "DST" | "DEF" => Some(Position::Defense),
            "HC" => Some(Position::HeadCoach),
            "DL" => Some(Position::DefensiveLineman),
            "LB" => Some(Position::Linebacker),
            "DB" => Some(Position::DefensiveBack),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
            Position::HeadCoach => "HC",
            Position::DefensiveLineman => "DL",
            Position::Linebacker => "LB",
            Position::DefensiveBack => "DB",
        }
    }

    /// Whether this is an individual defensive player position (IDP).
    pub fn is_defensive_player(&self) -> bool {
        matches!(
            self,
            Position::DefensiveLineman | Position::Linebacker | Position::DefensiveBack
        )
    }

    /// The positions a card pack can produce. Coaches and individual
    /// defenders are never printed on cards.
    pub fn card_positions() -> [Position; 6] {
        [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
        ]
    }

    /// Deterministic ordering index for roster slot display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Kicker => 4,
            Position::Defense => 5,
            Position::HeadCoach => 6,
            Position::DefensiveLineman => 7,
            Position::Linebacker => 8,
            Position::DefensiveBack => 9,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("K"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("HC"), Some(Position::HeadCoach));
    }

    #[test]
    fn from_str_pos_defense_aliases() {
        // All three spellings of the team defense position normalize to
        // the same enum value.
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("DST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_defensive_players() {
        assert_eq!(Position::from_str_pos("DL"), Some(Position::DefensiveLineman));
        assert_eq!(Position::from_str_pos("LB"), Some(Position::Linebacker));
        assert_eq!(Position::from_str_pos("DB"), Some(Position::DefensiveBack));
    }

    #[test]
    fn from_str_pos_case_insensitive() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("d/st"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("Wr"), Some(Position::WideReceiver));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("XX"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("FLEX"), None);
    }

    #[test]
    fn display_str_roundtrip() {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
            Position::HeadCoach,
            Position::DefensiveLineman,
            Position::Linebacker,
            Position::DefensiveBack,
        ];
        for pos in positions {
            let s = pos.display_str();
            let parsed = Position::from_str_pos(s);
            assert_eq!(parsed, Some(pos), "Roundtrip failed for {}", s);
        }
    }

    #[test]
    fn is_defensive_player_correct() {
        assert!(Position::DefensiveLineman.is_defensive_player());
        assert!(Position::Linebacker.is_defensive_player());
        assert!(Position::DefensiveBack.is_defensive_player());
        assert!(!Position::Quarterback.is_defensive_player());
        assert!(!Position::Defense.is_defensive_player());
        assert!(!Position::HeadCoach.is_defensive_player());
    }

    #[test]
    fn card_positions_excludes_coach_and_idp() {
        let card_positions = Position::card_positions();
        assert_eq!(card_positions.len(), 6);
        assert!(!card_positions.contains(&Position::HeadCoach));
        assert!(!card_positions.contains(&Position::Linebacker));
        assert!(card_positions.contains(&Position::Defense));
    }

    #[test]
    fn display_trait_works() {
        assert_eq!(format!("{}", Position::Quarterback), "QB");
        assert_eq!(format!("{}", Position::Defense), "DEF");
        assert_eq!(format!("{}", Position::HeadCoach), "HC");
    }
}
