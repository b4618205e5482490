// Weekly matchup aggregation. Starter slots score from their player's
// statline, except where a played legendary card committed to that slot
// for the week; the card's frozen historical score overrides the player.

use crate::cards::{CardStatus, LegendaryCard};
use crate::roster::{Roster, StarterSlot};

use super::calculator::round2;
use super::rules::ScoringRules;

/// One starter slot's contribution to a weekly total.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotScore {
    pub slot_id: String,
    pub points: f64,
    /// Set when a played card's frozen score replaced the rostered player.
    pub card_id: Option<String>,
}

/// A team's full weekly score with the per-slot breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamWeekScore {
    pub slots: Vec<SlotScore>,
    pub total: f64,
}

/// Find the played card committed to `slot_id` for `week`, if any.
fn card_override<'a>(
    cards: &'a [LegendaryCard],
    slot_id: &str,
    week: u32,
) -> Option<&'a LegendaryCard> {
    cards.iter().find(|c| {
        c.status == CardStatus::Played
            && c.pending_week == Some(week)
            && c.pending_slot_id.as_deref() == Some(slot_id)
    })
}

/// Score a single starter slot for the week.
///
/// An empty slot or a rostered player on bye scores zero.
pub fn slot_points(
    slot: &StarterSlot,
    cards: &[LegendaryCard],
    week: u32,
    rules: &ScoringRules,
) -> SlotScore {
    let slot_id = slot.slot_id();

    if let Some(card) = card_override(cards, &slot_id, week) {
        return SlotScore {
            slot_id,
            points: card.historical_points.unwrap_or(0.0),
            card_id: Some(card.id.clone()),
        };
    }

    let points = slot
        .player
        .as_ref()
        .and_then(|p| p.week_points(week, rules))
        .unwrap_or(0.0);

    SlotScore {
        slot_id,
        points,
        card_id: None,
    }
}

/// Score a team's week. Only starter slots count; bench and IR players
/// contribute nothing.
pub fn team_week_score(
    roster: &Roster,
    cards: &[LegendaryCard],
    week: u32,
    rules: &ScoringRules,
) -> TeamWeekScore {
    let slots: Vec<SlotScore> = roster
        .starters
        .iter()
        .map(|slot| slot_points(slot, cards, week, rules))
        .collect();
    let total = round2(slots.iter().map(|s| s.points).sum());
    TeamWeekScore { slots, total }
}

/// Head-to-head result for a week. `None` means a tie.
pub fn matchup_winner<'a>(
    home_id: &'a str,
    home: &TeamWeekScore,
    away_id: &'a str,
    away: &TeamWeekScore,
) -> Option<&'a str> {
    if home.total > away.total {
        Some(home_id)
    } else if away.total > home.total {
        Some(away_id)
    } else {
        None
    }
}
