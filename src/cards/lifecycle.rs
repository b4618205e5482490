// Card lifecycle state machine: activate, deactivate, reveal, delete.

use chrono::{DateTime, Local};
use rand::Rng;
use thiserror::Error;

use crate::roster::{Position, Roster};

use super::card::{CardStatus, CardTier, LegendaryCard};
use super::pool::PerformancePool;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CardError {
    #[error("card {id} is {status}, expected {expected}")]
    WrongStatus {
        id: String,
        status: CardStatus,
        expected: CardStatus,
    },

    #[error("team {team_id} already has a pending card ({card_id})")]
    PendingCardExists { team_id: String, card_id: String },

    #[error("a pending card already targets position {position}")]
    PositionAlreadyPending { position: Position },

    #[error("slot {slot_id} cannot host a {position} card")]
    SlotNotEligible { slot_id: String, position: Position },

    #[error("lineup changes for week {week} locked at {cutoff}")]
    CutoffPassed { week: u32, cutoff: DateTime<Local> },

    #[error("card {id} cannot be revealed before the week {week} cutoff at {cutoff}")]
    RevealBeforeCutoff {
        id: String,
        week: u32,
        cutoff: DateTime<Local>,
    },

    #[error("no historical performance available for {tier} {position}")]
    PoolExhausted { tier: CardTier, position: Position },

    #[error("card {id} is {status} and cannot be deleted")]
    DeleteNotAllowed { id: String, status: CardStatus },
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Activate an unplayed card onto a starter slot for the given week.
///
/// `team_cards` is the team's full card collection (the card itself may be
/// included; it is skipped by id). All conditions are checked before any
/// state changes:
/// - the card is unplayed
/// - the weekly cutoff hasn't passed
/// - the team has no other pending card
/// - no pending card already targets the same position
/// - the slot exists and accepts the card's position
pub fn activate(
    card: &mut LegendaryCard,
    team_cards: &[LegendaryCard],
    roster: &Roster,
    slot_id: &str,
    week: u32,
    now: DateTime<Local>,
    cutoff: DateTime<Local>,
) -> Result<(), CardError> {
    if card.status != CardStatus::Unplayed {
        return Err(CardError::WrongStatus {
            id: card.id.clone(),
            status: card.status,
            expected: CardStatus::Unplayed,
        });
    }

    if now >= cutoff {
        return Err(CardError::CutoffPassed { week, cutoff });
    }

    if let Some(pending) = team_cards
        .iter()
        .find(|c| c.id != card.id && c.status == CardStatus::Pending)
    {
        if pending.position == card.position {
            return Err(CardError::PositionAlreadyPending {
                position: card.position,
            });
        }
        return Err(CardError::PendingCardExists {
            team_id: card.team_id.clone(),
            card_id: pending.id.clone(),
        });
    }

    if !roster.is_eligible(slot_id, card.position) {
        return Err(CardError::SlotNotEligible {
            slot_id: slot_id.to_string(),
            position: card.position,
        });
    }

    card.status = CardStatus::Pending;
    card.pending_slot_id = Some(slot_id.to_string());
    card.pending_week = Some(week);
    Ok(())
}

/// Return a pending card to unplayed, releasing its slot. Only allowed
/// strictly before the weekly cutoff.
pub fn deactivate(
    card: &mut LegendaryCard,
    now: DateTime<Local>,
    cutoff: DateTime<Local>,
) -> Result<(), CardError> {
    if card.status != CardStatus::Pending {
        return Err(CardError::WrongStatus {
            id: card.id.clone(),
            status: card.status,
            expected: CardStatus::Pending,
        });
    }

    let week = card.pending_week.unwrap_or(0);
    if now >= cutoff {
        return Err(CardError::CutoffPassed { week, cutoff });
    }

    card.status = CardStatus::Unplayed;
    card.pending_slot_id = None;
    card.pending_week = None;
    Ok(())
}

/// Reveal a pending card: draw a historical performance matching the
/// card's tier and position, freeze its score on the card, and mark the
/// card played. Played is terminal.
///
/// Reveals are only allowed at or after the weekly cutoff, once lineups
/// are locked.
pub fn reveal(
    card: &mut LegendaryCard,
    pool: &PerformancePool,
    now: DateTime<Local>,
    cutoff: DateTime<Local>,
    rng: &mut impl Rng,
) -> Result<(), CardError> {
    if card.status != CardStatus::Pending {
        return Err(CardError::WrongStatus {
            id: card.id.clone(),
            status: card.status,
            expected: CardStatus::Pending,
        });
    }

    if now < cutoff {
        return Err(CardError::RevealBeforeCutoff {
            id: card.id.clone(),
            week: card.pending_week.unwrap_or(0),
            cutoff,
        });
    }

    let performance =
        pool.draw(card.tier, card.position, rng)
            .ok_or(CardError::PoolExhausted {
                tier: card.tier,
                position: card.position,
            })?;

    card.player_id = performance.player_id.clone();
    card.player_name = performance.player_name.clone();
    card.historical_points = Some(performance.points);
    card.historical_year = Some(performance.season);
    card.historical_week = Some(performance.week);
    card.status = CardStatus::Played;
    Ok(())
}

/// Check that a card may be deleted. Only unplayed cards are deletable;
/// pending cards hold a slot and played cards are part of scoring history.
pub fn ensure_deletable(card: &LegendaryCard) -> Result<(), CardError> {
    if card.status != CardStatus::Unplayed {
        return Err(CardError::DeleteNotAllowed {
            id: card.id.clone(),
            status: card.status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::slots::default_roster_config;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str, position: Position) -> LegendaryCard {
        LegendaryCard::new_unplayed(id, "team_1", CardTier::Epic, position, Utc::now())
    }

    fn roster() -> Roster {
        Roster::new(&default_roster_config())
    }

    fn before_cutoff() -> (DateTime<Local>, DateTime<Local>) {
        let cutoff = Local.with_ymd_and_hms(2025, 9, 14, 10, 0, 0).unwrap();
        let now = Local.with_ymd_and_hms(2025, 9, 13, 18, 30, 0).unwrap();
        (now, cutoff)
    }

    fn after_cutoff() -> (DateTime<Local>, DateTime<Local>) {
        let cutoff = Local.with_ymd_and_hms(2025, 9, 14, 10, 0, 0).unwrap();
        let now = Local.with_ymd_and_hms(2025, 9, 14, 13, 0, 0).unwrap();
        (now, cutoff)
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    #[test]
    fn activate_happy_path() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::WideReceiver);
        activate(&mut card, &[], &roster(), "WR-1", 2, now, cutoff).unwrap();
        assert_eq!(card.status, CardStatus::Pending);
        assert_eq!(card.pending_slot_id.as_deref(), Some("WR-1"));
        assert_eq!(card.pending_week, Some(2));
    }

    #[test]
    fn activate_rejects_non_unplayed_card() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::WideReceiver);
        card.status = CardStatus::Played;
        let err = activate(&mut card, &[], &roster(), "WR-1", 2, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::WrongStatus { .. }));
    }

    #[test]
    fn activate_rejects_after_cutoff() {
        let (now, cutoff) = after_cutoff();
        let mut card = card("c1", Position::WideReceiver);
        let err = activate(&mut card, &[], &roster(), "WR-1", 2, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::CutoffPassed { .. }));
        assert_eq!(card.status, CardStatus::Unplayed);
    }

    #[test]
    fn activate_exactly_at_cutoff_is_rejected() {
        let cutoff = Local.with_ymd_and_hms(2025, 9, 14, 10, 0, 0).unwrap();
        let mut card = card("c1", Position::WideReceiver);
        let err = activate(&mut card, &[], &roster(), "WR-1", 2, cutoff, cutoff).unwrap_err();
        assert!(matches!(err, CardError::CutoffPassed { .. }));
    }

    #[test]
    fn activate_rejects_second_pending_card() {
        let (now, cutoff) = before_cutoff();
        let mut other = card("c1", Position::RunningBack);
        other.status = CardStatus::Pending;
        let team_cards = vec![other];

        let mut card = card("c2", Position::WideReceiver);
        let err = activate(&mut card, &team_cards, &roster(), "WR-1", 2, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::PendingCardExists { .. }));
    }

    #[test]
    fn activate_reports_position_conflict_specifically() {
        let (now, cutoff) = before_cutoff();
        let mut other = card("c1", Position::WideReceiver);
        other.status = CardStatus::Pending;
        let team_cards = vec![other];

        let mut card = card("c2", Position::WideReceiver);
        let err = activate(&mut card, &team_cards, &roster(), "WR-2", 2, now, cutoff).unwrap_err();
        assert!(matches!(
            err,
            CardError::PositionAlreadyPending {
                position: Position::WideReceiver
            }
        ));
    }

    #[test]
    fn activate_ignores_played_and_unplayed_teammates() {
        let (now, cutoff) = before_cutoff();
        let mut played = card("c1", Position::WideReceiver);
        played.status = CardStatus::Played;
        let unplayed = card("c2", Position::WideReceiver);
        let team_cards = vec![played, unplayed];

        let mut card = card("c3", Position::WideReceiver);
        activate(&mut card, &team_cards, &roster(), "WR-1", 2, now, cutoff).unwrap();
    }

    #[test]
    fn activate_rejects_ineligible_slot() {
        let (now, cutoff) = before_cutoff();
        let mut card1 = card("c1", Position::Kicker);
        let err = activate(&mut card1, &[], &roster(), "FLEX-1", 2, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::SlotNotEligible { .. }));

        let mut card2 = card("c2", Position::Kicker);
        let err = activate(&mut card2, &[], &roster(), "K-9", 2, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::SlotNotEligible { .. }));
    }

    #[test]
    fn flex_slot_accepts_running_back_card() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::RunningBack);
        activate(&mut card, &[], &roster(), "FLEX-1", 1, now, cutoff).unwrap();
    }

    // ------------------------------------------------------------------
    // Deactivation
    // ------------------------------------------------------------------

    #[test]
    fn deactivate_before_cutoff_restores_unplayed() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::TightEnd);
        activate(&mut card, &[], &roster(), "TE-1", 3, now, cutoff).unwrap();

        deactivate(&mut card, now, cutoff).unwrap();
        assert_eq!(card.status, CardStatus::Unplayed);
        assert!(card.pending_slot_id.is_none());
        assert!(card.pending_week.is_none());
    }

    #[test]
    fn deactivate_after_cutoff_is_rejected() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::TightEnd);
        activate(&mut card, &[], &roster(), "TE-1", 3, now, cutoff).unwrap();

        let (late, cutoff) = after_cutoff();
        let err = deactivate(&mut card, late, cutoff).unwrap_err();
        assert!(matches!(err, CardError::CutoffPassed { .. }));
        assert_eq!(card.status, CardStatus::Pending);
    }

    #[test]
    fn deactivate_requires_pending() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::TightEnd);
        let err = deactivate(&mut card, now, cutoff).unwrap_err();
        assert!(matches!(err, CardError::WrongStatus { .. }));
    }

    // ------------------------------------------------------------------
    // Reveal
    // ------------------------------------------------------------------

    #[test]
    fn reveal_freezes_pool_performance() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::RunningBack);
        activate(&mut card, &[], &roster(), "RB-1", 4, now, cutoff).unwrap();

        let (late, cutoff) = after_cutoff();
        let pool = PerformancePool::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        reveal(&mut card, &pool, late, cutoff, &mut rng).unwrap();

        assert_eq!(card.status, CardStatus::Played);
        assert_ne!(card.player_name, "TBD");
        let frozen = card.historical_points.unwrap();
        assert!(frozen > 0.0);
        assert!(card.historical_year.is_some());
        assert!(card.historical_week.is_some());
        // The slot commitment survives the reveal so matchup scoring can
        // find the override.
        assert_eq!(card.pending_slot_id.as_deref(), Some("RB-1"));
    }

    #[test]
    fn reveal_before_cutoff_is_rejected() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::RunningBack);
        activate(&mut card, &[], &roster(), "RB-1", 4, now, cutoff).unwrap();

        let pool = PerformancePool::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let err = reveal(&mut card, &pool, now, cutoff, &mut rng).unwrap_err();
        assert!(matches!(err, CardError::RevealBeforeCutoff { .. }));
        assert_eq!(card.status, CardStatus::Pending);
    }

    #[test]
    fn reveal_exactly_at_cutoff_is_allowed() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::RunningBack);
        activate(&mut card, &[], &roster(), "RB-1", 4, now, cutoff).unwrap();

        let pool = PerformancePool::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        reveal(&mut card, &pool, cutoff, cutoff, &mut rng).unwrap();
        assert_eq!(card.status, CardStatus::Played);
    }

    #[test]
    fn reveal_requires_pending() {
        let (now, cutoff) = after_cutoff();
        let mut card = card("c1", Position::RunningBack);
        let pool = PerformancePool::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let err = reveal(&mut card, &pool, now, cutoff, &mut rng).unwrap_err();
        assert!(matches!(err, CardError::WrongStatus { .. }));
    }

    #[test]
    fn reveal_with_exhausted_pool_fails_cleanly() {
        let (now, cutoff) = before_cutoff();
        let mut card = card("c1", Position::RunningBack);
        activate(&mut card, &[], &roster(), "RB-1", 4, now, cutoff).unwrap();

        let (late, cutoff) = after_cutoff();
        let pool = PerformancePool::new(vec![]);
        let mut rng = StdRng::seed_from_u64(3);
        let err = reveal(&mut card, &pool, late, cutoff, &mut rng).unwrap_err();
        assert!(matches!(err, CardError::PoolExhausted { .. }));
        // Card untouched: still pending, still unrevealed.
        assert_eq!(card.status, CardStatus::Pending);
        assert_eq!(card.player_name, "TBD");
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    #[test]
    fn only_unplayed_cards_are_deletable() {
        let unplayed = card("c1", Position::Kicker);
        ensure_deletable(&unplayed).unwrap();

        let mut pending = card("c2", Position::Kicker);
        pending.status = CardStatus::Pending;
        assert!(matches!(
            ensure_deletable(&pending).unwrap_err(),
            CardError::DeleteNotAllowed { .. }
        ));

        let mut played = card("c3", Position::Kicker);
        played.status = CardStatus::Played;
        assert!(matches!(
            ensure_deletable(&played).unwrap_err(),
            CardError::DeleteNotAllowed { .. }
        ));
    }
}
