// Roster slot kinds, eligibility, and lineup management.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::position::Position;

/// The kinds of lineup slots a league can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "FLEX")]
    Flex,
    #[serde(rename = "RB/WR")]
    RunningBackWideReceiver,
    #[serde(rename = "WR/TE")]
    WideReceiverTightEnd,
    #[serde(rename = "OP")]
    OffensivePlayer,
    #[serde(rename = "D/ST", alias = "DST", alias = "DEF")]
    Defense,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "HC")]
    HeadCoach,
    #[serde(rename = "DL")]
    DefensiveLineman,
    #[serde(rename = "LB")]
    Linebacker,
    #[serde(rename = "DB")]
    DefensiveBack,
    #[serde(rename = "IDP")]
    DefensivePlayer,
    #[serde(rename = "BE", alias = "BN")]
    Bench,
    #[serde(rename = "IR")]
    InjuredReserve,
}

impl SlotKind {
    /// Parse a slot label from league configuration.
    pub fn from_str_slot(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(SlotKind::Quarterback),
            "RB" => Some(SlotKind::RunningBack),
            "WR" => Some(SlotKind::WideReceiver),
            "TE" => Some(SlotKind::TightEnd),
            "FLEX" => Some(SlotKind::Flex),
            "RB/WR" => Some(SlotKind::RunningBackWideReceiver),
            "WR/TE" => Some(SlotKind::WideReceiverTightEnd),
            "OP" => Some(SlotKind::OffensivePlayer),
            "D/ST" | "DST" | "DEF" => Some(SlotKind::Defense),
            "K" => Some(SlotKind::Kicker),
            "HC" => Some(SlotKind::HeadCoach),
            "DL" => Some(SlotKind::DefensiveLineman),
            "LB" => Some(SlotKind::Linebacker),
            "DB" => Some(SlotKind::DefensiveBack),
            "IDP" => Some(SlotKind::DefensivePlayer),
            "BE" | "BN" => Some(SlotKind::Bench),
            "IR" => Some(SlotKind::InjuredReserve),
            _ => None,
        }
    }

    /// Display label, matching the configured slot names.
    pub fn display_str(&self) -> &'static str {
        match self {
            SlotKind::Quarterback => "QB",
            SlotKind::RunningBack => "RB",
            SlotKind::WideReceiver => "WR",
            SlotKind::TightEnd => "TE",
            SlotKind::Flex => "FLEX",
            SlotKind::RunningBackWideReceiver => "RB/WR",
            SlotKind::WideReceiverTightEnd => "WR/TE",
            SlotKind::OffensivePlayer => "OP",
            SlotKind::Defense => "D/ST",
            SlotKind::Kicker => "K",
            SlotKind::HeadCoach => "HC",
            SlotKind::DefensiveLineman => "DL",
            SlotKind::Linebacker => "LB",
            SlotKind::DefensiveBack => "DB",
            SlotKind::DefensivePlayer => "IDP",
            SlotKind::Bench => "BE",
            SlotKind::InjuredReserve => "IR",
        }
    }

    /// Whether a player of the given position may occupy this slot.
    ///
    /// Dedicated slots require an exact match; combo slots accept their
    /// listed positions; bench and IR accept anyone.
    pub fn accepts(&self, pos: Position) -> bool {
        match self {
            SlotKind::Quarterback => pos == Position::Quarterback,
            SlotKind::RunningBack => pos == Position::RunningBack,
            SlotKind::WideReceiver => pos == Position::WideReceiver,
            SlotKind::TightEnd => pos == Position::TightEnd,
            SlotKind::Flex => matches!(
                pos,
                Position::RunningBack | Position::WideReceiver | Position::TightEnd
            ),
            SlotKind::RunningBackWideReceiver => {
                matches!(pos, Position::RunningBack | Position::WideReceiver)
            }
            SlotKind::WideReceiverTightEnd => {
                matches!(pos, Position::WideReceiver | Position::TightEnd)
            }
            SlotKind::OffensivePlayer => matches!(
                pos,
                Position::Quarterback
                    | Position::RunningBack
                    | Position::WideReceiver
                    | Position::TightEnd
            ),
            SlotKind::Defense => pos == Position::Defense,
            SlotKind::Kicker => pos == Position::Kicker,
            SlotKind::HeadCoach => pos == Position::HeadCoach,
            SlotKind::DefensiveLineman => pos == Position::DefensiveLineman,
            SlotKind::Linebacker => pos == Position::Linebacker,
            SlotKind::DefensiveBack => pos == Position::DefensiveBack,
            SlotKind::DefensivePlayer => pos.is_defensive_player(),
            SlotKind::Bench | SlotKind::InjuredReserve => true,
        }
    }

    /// Deterministic ordering index for lineup display.
    pub fn sort_order(&self) -> u8 {
        match self {
            SlotKind::Quarterback => 0,
            SlotKind::RunningBack => 1,
            SlotKind::WideReceiver => 2,
            SlotKind::TightEnd => 3,
            SlotKind::Flex => 4,
            SlotKind::RunningBackWideReceiver => 5,
            SlotKind::WideReceiverTightEnd => 6,
            SlotKind::OffensivePlayer => 7,
            SlotKind::Defense => 8,
            SlotKind::Kicker => 9,
            SlotKind::HeadCoach => 10,
            SlotKind::DefensiveLineman => 11,
            SlotKind::Linebacker => 12,
            SlotKind::DefensiveBack => 13,
            SlotKind::DefensivePlayer => 14,
            SlotKind::Bench => 15,
            SlotKind::InjuredReserve => 16,
        }
    }
}

/// A single starting lineup slot, identified by kind and 1-based index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarterSlot {
    pub kind: SlotKind,
    pub index: u32,
    pub player: Option<Player>,
}

impl StarterSlot {
    /// Stable slot identifier, e.g. "WR-1". Card activations reference
    /// slots by this id.
    pub fn slot_id(&self) -> String {
        format!("{}-{}", self.kind.display_str(), self.index)
    }
}

/// A team's lineup: starting slots plus bench and injured reserve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub starters: Vec<StarterSlot>,
    pub bench: Vec<Player>,
    pub ir: Vec<Player>,
    bench_capacity: usize,
    ir_capacity: usize,
}

impl Roster {
    /// Create an empty roster from a config mapping slot labels to counts.
    ///
    /// The roster config comes from league.toml `[league.roster]`, e.g.:
    /// `{"QB": 1, "RB": 2, "WR": 2, "FLEX": 1, "BE": 6, "IR": 1, ...}`
    ///
    /// Starting slots are created in deterministic order based on
    /// `SlotKind::sort_order()`, indexed 1..=count within each kind.
    pub fn new(roster_config: &HashMap<String, usize>) -> Self {
        let mut starters: Vec<StarterSlot> = Vec::new();
        let mut bench_capacity = 0;
        let mut ir_capacity = 0;

        for (label, &count) in roster_config {
            let Some(kind) = SlotKind::from_str_slot(label) else {
                continue;
            };
            match kind {
                SlotKind::Bench => bench_capacity = count,
                SlotKind::InjuredReserve => ir_capacity = count,
                _ => {
                    for index in 1..=count as u32 {
                        starters.push(StarterSlot {
                            kind,
                            index,
                            player: None,
                        });
                    }
                }
            }
        }

        starters.sort_by_key(|s| (s.kind.sort_order(), s.index));

        Roster {
            starters,
            bench: Vec::new(),
            ir: Vec::new(),
            bench_capacity,
            ir_capacity,
        }
    }

    pub fn slot(&self, slot_id: &str) -> Option<&StarterSlot> {
        self.starters.iter().find(|s| s.slot_id() == slot_id)
    }

    fn slot_mut(&mut self, slot_id: &str) -> Option<&mut StarterSlot> {
        self.starters.iter_mut().find(|s| s.slot_id() == slot_id)
    }

    /// Whether a player at the given position may legally occupy the slot.
    pub fn is_eligible(&self, slot_id: &str, position: Position) -> bool {
        self.slot(slot_id)
            .map(|s| s.kind.accepts(position))
            .unwrap_or(false)
    }

    /// Place a player directly into an empty, eligible starting slot.
    /// Returns `false` if the slot is missing, occupied, or ineligible.
    pub fn assign_starter(&mut self, player: Player, slot_id: &str) -> bool {
        let Some(slot) = self.slot_mut(slot_id) else {
            return false;
        };
        if slot.player.is_some() || !slot.kind.accepts(player.position) {
            return false;
        }
        slot.player = Some(player);
        true
    }

    /// Add a player to the bench. Returns `false` when the bench is full.
    pub fn add_to_bench(&mut self, player: Player) -> bool {
        if self.bench.len() >= self.bench_capacity {
            return false;
        }
        self.bench.push(player);
        true
    }

    /// Move a starter to the bench, leaving the slot empty.
    pub fn bench_starter(&mut self, slot_id: &str) -> bool {
        if self.bench.len() >= self.bench_capacity {
            return false;
        }
        let Some(slot) = self.slot_mut(slot_id) else {
            return false;
        };
        let Some(player) = slot.player.take() else {
            return false;
        };
        self.bench.push(player);
        true
    }

    /// Promote a bench player into an empty, eligible starting slot.
    pub fn start_from_bench(&mut self, bench_index: usize, slot_id: &str) -> bool {
        if bench_index >= self.bench.len() {
            return false;
        }
        let position = self.bench[bench_index].position;
        let Some(slot) = self.slot_mut(slot_id) else {
            return false;
        };
        if slot.player.is_some() || !slot.kind.accepts(position) {
            return false;
        }
        // Removed only after the eligibility check, so a rejected move
        // leaves the bench untouched.
        let player = self.bench.remove(bench_index);
        self.starters
            .iter_mut()
            .find(|s| s.slot_id() == slot_id)
            .map(|s| s.player = Some(player))
            .is_some()
    }

    /// Swap the occupants of two starting slots, re-checking eligibility
    /// for both directions.
    pub fn swap_starters(&mut self, slot_a: &str, slot_b: &str) -> bool {
        let (Some(a), Some(b)) = (self.slot(slot_a), self.slot(slot_b)) else {
            return false;
        };
        let a_ok = match &b.player {
            Some(p) => a.kind.accepts(p.position),
            None => true,
        };
        let b_ok = match &a.player {
            Some(p) => b.kind.accepts(p.position),
            None => true,
        };
        if !a_ok || !b_ok {
            return false;
        }

        let taken_a = self.slot_mut(slot_a).and_then(|s| s.player.take());
        let taken_b = self.slot_mut(slot_b).and_then(|s| s.player.take());
        if let Some(slot) = self.slot_mut(slot_a) {
            slot.player = taken_b;
        }
        if let Some(slot) = self.slot_mut(slot_b) {
            slot.player = taken_a;
        }
        true
    }

    /// Move a bench player onto injured reserve.
    pub fn place_on_ir(&mut self, bench_index: usize) -> bool {
        if bench_index >= self.bench.len() || self.ir.len() >= self.ir_capacity {
            return false;
        }
        let player = self.bench.remove(bench_index);
        self.ir.push(player);
        true
    }

    /// Return a player from injured reserve to the bench.
    pub fn activate_from_ir(&mut self, ir_index: usize) -> bool {
        if ir_index >= self.ir.len() || self.bench.len() >= self.bench_capacity {
            return false;
        }
        let player = self.ir.remove(ir_index);
        self.bench.push(player);
        true
    }

    /// Number of filled starting slots.
    pub fn starters_filled(&self) -> usize {
        self.starters.iter().filter(|s| s.player.is_some()).count()
    }

    pub fn starter_count(&self) -> usize {
        self.starters.len()
    }
}

/// The standard league roster shape.
pub fn default_roster_config() -> HashMap<String, usize> {
    let mut config = HashMap::new();
    config.insert("QB".to_string(), 1);
    config.insert("RB".to_string(), 2);
    config.insert("WR".to_string(), 2);
    config.insert("TE".to_string(), 1);
    config.insert("FLEX".to_string(), 1);
    config.insert("D/ST".to_string(), 1);
    config.insert("K".to_string(), 1);
    config.insert("HC".to_string(), 1);
    config.insert("BE".to_string(), 6);
    config.insert("IR".to_string(), 1);
    config
}
