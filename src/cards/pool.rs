// Historical performance pool: the frozen single-game scores a card
// reveal draws from.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::roster::Position;

use super::card::CardTier;

/// One historical single-game performance. The points value is already
/// final; reveals copy it verbatim onto the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPerformance {
    pub player_id: String,
    pub player_name: String,
    pub position: Position,
    pub tier: CardTier,
    pub season: u16,
    pub week: u32,
    pub points: f64,
}

/// The pool of historical performances available to card reveals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformancePool {
    pub entries: Vec<HistoricalPerformance>,
}

impl PerformancePool {
    pub fn new(entries: Vec<HistoricalPerformance>) -> Self {
        PerformancePool { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw uniformly from the entries matching both tier and position.
    /// Returns `None` when no entry matches.
    pub fn draw(
        &self,
        tier: CardTier,
        position: Position,
        rng: &mut impl Rng,
    ) -> Option<&HistoricalPerformance> {
        let candidates: Vec<&HistoricalPerformance> = self
            .entries
            .iter()
            .filter(|e| e.tier == tier && e.position == position)
            .collect();
        candidates.choose(rng).copied()
    }

    /// The built-in pool shipped with the engine: one performance per
    /// tier and card position. Leagues can replace it with their own data.
    pub fn builtin() -> Self {
        fn entry(
            player_id: &str,
            player_name: &str,
            position: Position,
            tier: CardTier,
            season: u16,
            week: u32,
            points: f64,
        ) -> HistoricalPerformance {
            HistoricalPerformance {
                player_id: player_id.to_string(),
                player_name: player_name.to_string(),
                position,
                tier,
                season,
                week,
                points,
            }
        }

        use CardTier::*;
        use Position::*;

        PerformancePool::new(vec![
            // Quarterbacks
            entry("manning-2013-w1", "Peyton Manning", Quarterback, Legendary, 2013, 1, 44.06),
            entry("mahomes-2018-w4", "Patrick Mahomes", Quarterback, Epic, 2018, 4, 36.92),
            entry("herbert-2021-w5", "Justin Herbert", Quarterback, Rare, 2021, 5, 29.48),
            entry("cousins-2019-w6", "Kirk Cousins", Quarterback, Common, 2019, 6, 21.24),
            // Running backs
            entry("kamara-2020-w16", "Alvin Kamara", RunningBack, Legendary, 2020, 16, 48.2),
            entry("mccaffrey-2019-w9", "Christian McCaffrey", RunningBack, Epic, 2019, 9, 37.7),
            entry("henry-2020-w6", "Derrick Henry", RunningBack, Rare, 2020, 6, 28.4),
            entry("jacobs-2019-w7", "Josh Jacobs", RunningBack, Common, 2019, 7, 17.4),
            // Wide receivers
            entry("anderson-2018-w14", "Robby Anderson", WideReceiver, Legendary, 2018, 14, 44.0),
            entry("hill-2020-w12", "Tyreek Hill", WideReceiver, Epic, 2020, 12, 35.9),
            entry("adams-2020-w8", "Davante Adams", WideReceiver, Rare, 2020, 8, 26.6),
            entry("lockett-2019-w5", "Tyler Lockett", WideReceiver, Common, 2019, 5, 15.2),
            // Tight ends
            entry("kelce-2022-w11", "Travis Kelce", TightEnd, Legendary, 2022, 11, 38.5),
            entry("kittle-2019-w14", "George Kittle", TightEnd, Epic, 2019, 14, 29.8),
            entry("andrews-2021-w13", "Mark Andrews", TightEnd, Rare, 2021, 13, 21.5),
            entry("hooper-2019-w3", "Austin Hooper", TightEnd, Common, 2019, 3, 13.0),
            // Kickers
            entry("tucker-2021-w3", "Justin Tucker", Kicker, Legendary, 2021, 3, 23.0),
            entry("prater-2014-w13", "Matt Prater", Kicker, Epic, 2014, 13, 19.0),
            entry("butker-2019-w10", "Harrison Butker", Kicker, Rare, 2019, 10, 15.0),
            entry("gould-2018-w6", "Robbie Gould", Kicker, Common, 2018, 6, 10.0),
            // Team defenses
            entry("bears-2018-w6", "Chicago Bears D/ST", Defense, Legendary, 2018, 6, 34.0),
            entry("steelers-2019-w10", "Pittsburgh Steelers D/ST", Defense, Epic, 2019, 10, 27.0),
            entry("rams-2020-w5", "Los Angeles Rams D/ST", Defense, Rare, 2020, 5, 19.0),
            entry("colts-2019-w2", "Indianapolis Colts D/ST", Defense, Common, 2019, 2, 11.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn builtin_covers_every_tier_and_card_position() {
        let pool = PerformancePool::builtin();
        let tiers = [
            CardTier::Common,
            CardTier::Rare,
            CardTier::Epic,
            CardTier::Legendary,
        ];
        for position in Position::card_positions() {
            for tier in tiers {
                assert!(
                    pool.entries
                        .iter()
                        .any(|e| e.tier == tier && e.position == position),
                    "missing {tier} {position} entry"
                );
            }
        }
    }

    #[test]
    fn draw_matches_tier_and_position() {
        let pool = PerformancePool::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let drawn = pool
                .draw(CardTier::Epic, Position::RunningBack, &mut rng)
                .unwrap();
            assert_eq!(drawn.tier, CardTier::Epic);
            assert_eq!(drawn.position, Position::RunningBack);
        }
    }

    #[test]
    fn draw_returns_none_when_nothing_matches() {
        let pool = PerformancePool::new(vec![]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pool
            .draw(CardTier::Common, Position::Quarterback, &mut rng)
            .is_none());

        // A populated pool can still miss a slice entirely.
        let pool = PerformancePool::builtin();
        assert!(pool
            .draw(CardTier::Legendary, Position::HeadCoach, &mut rng)
            .is_none());
    }

    #[test]
    fn draw_is_uniform_over_matching_entries() {
        let entries = vec![
            HistoricalPerformance {
                player_id: "a".into(),
                player_name: "A".into(),
                position: Position::Kicker,
                tier: CardTier::Common,
                season: 2020,
                week: 1,
                points: 10.0,
            },
            HistoricalPerformance {
                player_id: "b".into(),
                player_name: "B".into(),
                position: Position::Kicker,
                tier: CardTier::Common,
                season: 2021,
                week: 2,
                points: 12.0,
            },
        ];
        let pool = PerformancePool::new(entries);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..100 {
            match pool
                .draw(CardTier::Common, Position::Kicker, &mut rng)
                .unwrap()
                .player_id
                .as_str()
            {
                "a" => seen_a = true,
                "b" => seen_b = true,
                other => panic!("unexpected draw {other}"),
            }
        }
        assert!(seen_a && seen_b);
    }
}
