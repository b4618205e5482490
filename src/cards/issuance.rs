// Card pack distribution mechanics and pack opening.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::roster::Position;

use super::card::{CardTier, LegendaryCard};

/// How a league hands out card packs at a distribution event.
///
/// Only the first four mechanics have defined pack rules today; the rest
/// are recognized (so configs referencing them load and persist) but
/// issue nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionMechanic {
    #[serde(rename = "pure-skill")]
    PureSkill,
    #[serde(rename = "reverse-standings")]
    ReverseStandings,
    #[serde(rename = "hybrid-5050")]
    Hybrid5050,
    #[serde(rename = "all-teams-equal")]
    AllTeamsEqual,
    #[serde(rename = "win-streak")]
    WinStreak,
    #[serde(rename = "faab-rebate")]
    FaabRebate,
    #[serde(rename = "achievement-unlocks")]
    AchievementUnlocks,
    #[serde(rename = "playoff-seeding")]
    PlayoffSeeding,
    #[serde(rename = "winner-takes-all")]
    WinnerTakesAll,
    #[serde(rename = "random-chaos")]
    RandomChaos,
}

impl DistributionMechanic {
    pub fn from_str_mechanic(s: &str) -> Option<Self> {
        match s {
            "pure-skill" => Some(DistributionMechanic::PureSkill),
            "reverse-standings" => Some(DistributionMechanic::ReverseStandings),
            "hybrid-5050" => Some(DistributionMechanic::Hybrid5050),
            "all-teams-equal" => Some(DistributionMechanic::AllTeamsEqual),
            "win-streak" => Some(DistributionMechanic::WinStreak),
            "faab-rebate" => Some(DistributionMechanic::FaabRebate),
            "achievement-unlocks" => Some(DistributionMechanic::AchievementUnlocks),
            "playoff-seeding" => Some(DistributionMechanic::PlayoffSeeding),
            "winner-takes-all" => Some(DistributionMechanic::WinnerTakesAll),
            "random-chaos" => Some(DistributionMechanic::RandomChaos),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            DistributionMechanic::PureSkill => "pure-skill",
            DistributionMechanic::ReverseStandings => "reverse-standings",
            DistributionMechanic::Hybrid5050 => "hybrid-5050",
            DistributionMechanic::AllTeamsEqual => "all-teams-equal",
            DistributionMechanic::WinStreak => "win-streak",
            DistributionMechanic::FaabRebate => "faab-rebate",
            DistributionMechanic::AchievementUnlocks => "achievement-unlocks",
            DistributionMechanic::PlayoffSeeding => "playoff-seeding",
            DistributionMechanic::WinnerTakesAll => "winner-takes-all",
            DistributionMechanic::RandomChaos => "random-chaos",
        }
    }

    /// Whether this mechanic has pack rules defined.
    pub fn has_pack_rules(&self) -> bool {
        matches!(
            self,
            DistributionMechanic::PureSkill
                | DistributionMechanic::ReverseStandings
                | DistributionMechanic::Hybrid5050
                | DistributionMechanic::AllTeamsEqual
        )
    }
}

impl fmt::Display for DistributionMechanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A team's weekly scoreboard entry at distribution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: String,
    pub team_name: String,
    /// The team's starter total for the distribution week.
    pub score: f64,
}

/// Packs awarded to one team by a distribution event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackGrant {
    pub team_id: String,
    pub packs: u32,
}

/// Compute pack grants for a distribution event.
///
/// Standings are ranked by weekly score, descending; ties keep their
/// input order (a stable sort), so the caller's ordering is the tie-break.
pub fn distribute_packs(
    mechanic: DistributionMechanic,
    standings: &[TeamStanding],
) -> Vec<PackGrant> {
    let mut ranked: Vec<&TeamStanding> = standings.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    let n = ranked.len();

    match mechanic {
        DistributionMechanic::PureSkill => {
            // Top half, rounding up, one pack each.
            let winners = n.div_ceil(2);
            ranked[..winners]
                .iter()
                .map(|t| PackGrant {
                    team_id: t.team_id.clone(),
                    packs: 1,
                })
                .collect()
        }
        DistributionMechanic::ReverseStandings => {
            // Bottom of the table, one pack each.
            ranked[n / 2..]
                .iter()
                .map(|t| PackGrant {
                    team_id: t.team_id.clone(),
                    packs: 1,
                })
                .collect()
        }
        DistributionMechanic::Hybrid5050 => {
            // Top four get two packs, everyone else one.
            ranked
                .iter()
                .enumerate()
                .map(|(rank, t)| PackGrant {
                    team_id: t.team_id.clone(),
                    packs: if rank < 4 { 2 } else { 1 },
                })
                .collect()
        }
        DistributionMechanic::AllTeamsEqual => ranked
            .iter()
            .map(|t| PackGrant {
                team_id: t.team_id.clone(),
                packs: 1,
            })
            .collect(),
        other => {
            warn!(
                "distribution mechanic '{}' has no pack rules defined; issuing no packs",
                other
            );
            Vec::new()
        }
    }
}

/// Weighted tier draw from a single uniform roll in [0, 100):
/// 5% legendary, 15% epic, 30% rare, 50% common.
pub fn draw_tier(rng: &mut impl Rng) -> CardTier {
    let roll: f64 = rng.gen_range(0.0..100.0);
    if roll < 5.0 {
        CardTier::Legendary
    } else if roll < 20.0 {
        CardTier::Epic
    } else if roll < 50.0 {
        CardTier::Rare
    } else {
        CardTier::Common
    }
}

/// Uniform draw over the card-eligible positions.
pub fn draw_position(rng: &mut impl Rng) -> Position {
    let positions = Position::card_positions();
    positions[rng.gen_range(0..positions.len())]
}

/// Generate a unique card ID.
///
/// Format: `card_YYYYMMDD_HHMMSS_SSS_xxxx` with a random hex suffix so
/// cards opened in the same millisecond stay distinct.
pub fn generate_card_id(now: DateTime<Utc>, rng: &mut impl Rng) -> String {
    format!(
        "card_{}_{:04x}",
        now.format("%Y%m%d_%H%M%S_%3f"),
        rng.gen::<u16>()
    )
}

/// Open a single pack for a team: one unrevealed card with a drawn tier
/// and position.
pub fn open_pack(team_id: &str, now: DateTime<Utc>, rng: &mut impl Rng) -> LegendaryCard {
    let tier = draw_tier(rng);
    let position = draw_position(rng);
    let id = generate_card_id(now, rng);
    LegendaryCard::new_unplayed(id, team_id, tier, position, now)
}

/// Commissioner grant: hand a team one unrevealed card with a chosen
/// tier and position, outside any distribution event.
pub fn manual_grant(
    team_id: &str,
    tier: CardTier,
    position: Position,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> LegendaryCard {
    let id = generate_card_id(now, rng);
    LegendaryCard::new_unplayed(id, team_id, tier, position, now)
}

/// Run a full distribution event: compute grants, then open every
/// granted pack.
pub fn run_distribution(
    mechanic: DistributionMechanic,
    standings: &[TeamStanding],
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Vec<LegendaryCard> {
    let grants = distribute_packs(mechanic, standings);
    let mut cards = Vec::new();
    for grant in &grants {
        for _ in 0..grant.packs {
            cards.push(open_pack(&grant.team_id, now, rng));
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::CardStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scoreboard(scores: &[f64]) -> Vec<TeamStanding> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| TeamStanding {
                team_id: format!("team_{}", i + 1),
                team_name: format!("Team {}", i + 1),
                score,
            })
            .collect()
    }

    fn ten_team_standings() -> Vec<TeamStanding> {
        // Weekly totals descending so team_1 tops the scoreboard.
        scoreboard(&[142.6, 131.0, 120.4, 118.9, 104.2, 99.8, 93.5, 87.1, 72.0, 61.3])
    }

    #[test]
    fn pure_skill_awards_top_half_rounded_up() {
        let grants = distribute_packs(DistributionMechanic::PureSkill, &ten_team_standings());
        assert_eq!(grants.len(), 5);
        let ids: Vec<&str> = grants.iter().map(|g| g.team_id.as_str()).collect();
        assert_eq!(ids, vec!["team_1", "team_2", "team_3", "team_4", "team_5"]);
        assert!(grants.iter().all(|g| g.packs == 1));

        // Nine teams: ceil(9/2) = 5 winners.
        let nine = scoreboard(&[140.0, 120.0, 110.0, 100.0, 90.0, 80.0, 70.0, 60.0, 50.0]);
        let grants = distribute_packs(DistributionMechanic::PureSkill, &nine);
        assert_eq!(grants.len(), 5);
    }

    #[test]
    fn ranking_follows_weekly_score_not_input_position() {
        // Input deliberately unsorted; the last entry posts the top score.
        let standings = scoreboard(&[88.0, 95.0, 70.2, 133.4]);
        let grants = distribute_packs(DistributionMechanic::PureSkill, &standings);
        let ids: Vec<&str> = grants.iter().map(|g| g.team_id.as_str()).collect();
        assert_eq!(ids, vec!["team_4", "team_2"]);
    }

    #[test]
    fn reverse_standings_awards_bottom_of_table() {
        let grants =
            distribute_packs(DistributionMechanic::ReverseStandings, &ten_team_standings());
        assert_eq!(grants.len(), 5);
        let ids: Vec<&str> = grants.iter().map(|g| g.team_id.as_str()).collect();
        assert_eq!(ids, vec!["team_6", "team_7", "team_8", "team_9", "team_10"]);

        // The first-place team never receives a rebuild pack.
        assert!(!ids.contains(&"team_1"));
    }

    #[test]
    fn hybrid_5050_ten_teams_is_fourteen_packs() {
        let grants = distribute_packs(DistributionMechanic::Hybrid5050, &ten_team_standings());
        assert_eq!(grants.len(), 10);
        let total: u32 = grants.iter().map(|g| g.packs).sum();
        // 4 * 2 + 6 * 1 = 14
        assert_eq!(total, 14);
        assert_eq!(grants[0].packs, 2);
        assert_eq!(grants[3].packs, 2);
        assert_eq!(grants[4].packs, 1);
    }

    #[test]
    fn all_teams_equal_is_one_each() {
        let grants = distribute_packs(DistributionMechanic::AllTeamsEqual, &ten_team_standings());
        assert_eq!(grants.len(), 10);
        assert!(grants.iter().all(|g| g.packs == 1));
    }

    #[test]
    fn undefined_mechanics_issue_nothing() {
        for mechanic in [
            DistributionMechanic::WinStreak,
            DistributionMechanic::FaabRebate,
            DistributionMechanic::AchievementUnlocks,
            DistributionMechanic::PlayoffSeeding,
            DistributionMechanic::WinnerTakesAll,
            DistributionMechanic::RandomChaos,
        ] {
            assert!(!mechanic.has_pack_rules());
            let grants = distribute_packs(mechanic, &ten_team_standings());
            assert!(grants.is_empty(), "{mechanic} should issue nothing");
        }
    }

    #[test]
    fn ranking_tie_break_is_input_order() {
        // Four teams all on the same total: with pure-skill the first two
        // listed win.
        let tied = scoreboard(&[101.5, 101.5, 101.5, 101.5]);
        let grants = distribute_packs(DistributionMechanic::PureSkill, &tied);
        let ids: Vec<&str> = grants.iter().map(|g| g.team_id.as_str()).collect();
        assert_eq!(ids, vec!["team_1", "team_2"]);
    }

    #[test]
    fn mechanic_string_round_trip() {
        let all = [
            DistributionMechanic::PureSkill,
            DistributionMechanic::ReverseStandings,
            DistributionMechanic::Hybrid5050,
            DistributionMechanic::AllTeamsEqual,
            DistributionMechanic::WinStreak,
            DistributionMechanic::FaabRebate,
            DistributionMechanic::AchievementUnlocks,
            DistributionMechanic::PlayoffSeeding,
            DistributionMechanic::WinnerTakesAll,
            DistributionMechanic::RandomChaos,
        ];
        for mechanic in all {
            let parsed = DistributionMechanic::from_str_mechanic(mechanic.display_str());
            assert_eq!(parsed, Some(mechanic));
        }
        assert!(DistributionMechanic::from_str_mechanic("coin-flip").is_none());
    }

    #[test]
    fn tier_draw_respects_weights() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0u32; 4];
        let draws = 10_000;
        for _ in 0..draws {
            match draw_tier(&mut rng) {
                CardTier::Legendary => counts[0] += 1,
                CardTier::Epic => counts[1] += 1,
                CardTier::Rare => counts[2] += 1,
                CardTier::Common => counts[3] += 1,
            }
        }
        // Expected 5% / 15% / 30% / 50% with generous tolerance.
        assert!((300..=700).contains(&counts[0]), "legendary: {}", counts[0]);
        assert!((1200..=1800).contains(&counts[1]), "epic: {}", counts[1]);
        assert!((2600..=3400).contains(&counts[2]), "rare: {}", counts[2]);
        assert!((4600..=5400).contains(&counts[3]), "common: {}", counts[3]);
    }

    #[test]
    fn position_draw_covers_card_positions_only() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let pos = draw_position(&mut rng);
            assert!(Position::card_positions().contains(&pos));
        }
    }

    #[test]
    fn open_pack_produces_unrevealed_card() {
        let mut rng = StdRng::seed_from_u64(1);
        let card = open_pack("team_3", Utc::now(), &mut rng);
        assert_eq!(card.team_id, "team_3");
        assert_eq!(card.status, CardStatus::Unplayed);
        assert_eq!(card.player_name, "TBD");
        assert!(card.id.starts_with("card_"));
    }

    #[test]
    fn manual_grant_uses_chosen_tier_and_position() {
        let mut rng = StdRng::seed_from_u64(2);
        let card = manual_grant(
            "team_7",
            CardTier::Legendary,
            Position::Defense,
            Utc::now(),
            &mut rng,
        );
        assert_eq!(card.team_id, "team_7");
        assert_eq!(card.tier, CardTier::Legendary);
        assert_eq!(card.position, Position::Defense);
        assert_eq!(card.status, CardStatus::Unplayed);
    }

    #[test]
    fn run_distribution_opens_every_granted_pack() {
        let mut rng = StdRng::seed_from_u64(12);
        let cards = run_distribution(
            DistributionMechanic::Hybrid5050,
            &ten_team_standings(),
            Utc::now(),
            &mut rng,
        );
        assert_eq!(cards.len(), 14);
        // The top team opened two packs.
        assert_eq!(cards.iter().filter(|c| c.team_id == "team_1").count(), 2);
        // Card IDs are unique.
        let mut ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 14);
    }
}
