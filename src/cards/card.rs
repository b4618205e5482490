// Legendary card document representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roster::Position;

/// Placeholder identity for a card whose player hasn't been revealed yet.
pub const UNREVEALED: &str = "TBD";

/// Card rarity tier. Determines which slice of the historical performance
/// pool a reveal draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl CardTier {
    pub fn display_str(&self) -> &'static str {
        match self {
            CardTier::Common => "common",
            CardTier::Rare => "rare",
            CardTier::Epic => "epic",
            CardTier::Legendary => "legendary",
        }
    }
}

impl fmt::Display for CardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Card lifecycle state.
///
/// `Unplayed -> Pending -> Played` is the only forward path; `Pending`
/// can step back to `Unplayed` before the weekly cutoff, and `Played`
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Unplayed,
    Pending,
    Played,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardStatus::Unplayed => "unplayed",
            CardStatus::Pending => "pending",
            CardStatus::Played => "played",
        };
        write!(f, "{s}")
    }
}

/// A legendary card owned by a team.
///
/// Freshly opened cards carry placeholder identity (`"TBD"`); the player
/// and their frozen historical score are only filled in at reveal time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendaryCard {
    pub id: String,
    pub team_id: String,
    pub tier: CardTier,
    pub position: Position,
    pub status: CardStatus,
    pub player_id: String,
    pub player_name: String,
    /// The starter slot this card is committed to while pending/played,
    /// e.g. "WR-1".
    #[serde(default)]
    pub pending_slot_id: Option<String>,
    /// The matchup week the card is committed to.
    #[serde(default)]
    pub pending_week: Option<u32>,
    /// Frozen at reveal; never recomputed afterwards.
    #[serde(default)]
    pub historical_points: Option<f64>,
    /// Season the revealed performance was recorded in.
    #[serde(default)]
    pub historical_year: Option<u16>,
    /// Week the revealed performance was recorded in.
    #[serde(default)]
    pub historical_week: Option<u32>,
    pub acquired_at: DateTime<Utc>,
}

impl LegendaryCard {
    /// A freshly opened, unrevealed card.
    pub fn new_unplayed(
        id: impl Into<String>,
        team_id: impl Into<String>,
        tier: CardTier,
        position: Position,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        LegendaryCard {
            id: id.into(),
            team_id: team_id.into(),
            tier,
            position,
            status: CardStatus::Unplayed,
            player_id: UNREVEALED.to_string(),
            player_name: UNREVEALED.to_string(),
            pending_slot_id: None,
            pending_week: None,
            historical_points: None,
            historical_year: None,
            historical_week: None,
            acquired_at,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.status == CardStatus::Played
    }
}
