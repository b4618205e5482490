// League scoring rule tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One scoring line item: a point value and whether it is active.
///
/// Disabled settings are kept in the table (so commissioners can re-enable
/// them without losing the value) but contribute nothing to a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringSetting {
    pub value: f64,
    pub enabled: bool,
}

impl ScoringSetting {
    pub fn on(value: f64) -> Self {
        ScoringSetting { value, enabled: true }
    }

    pub fn off(value: f64) -> Self {
        ScoringSetting { value, enabled: false }
    }
}

/// Per-category stat code -> setting tables.
pub type CategorySettings = HashMap<String, ScoringSetting>;

/// The complete scoring configuration for a league.
///
/// Categories mirror the stored league document, so the struct serializes
/// to the same JSON shape (camelCase keys, stat codes unchanged).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub passing: CategorySettings,
    pub rushing: CategorySettings,
    pub receiving: CategorySettings,
    pub kicking: CategorySettings,
    pub team_defense: CategorySettings,
    pub miscellaneous: CategorySettings,
    pub defensive_players: CategorySettings,
    pub head_coach: CategorySettings,
    pub punting: CategorySettings,
}

impl ScoringRules {
    /// The standard league defaults.
    pub fn league_defaults() -> Self {
        ScoringRules {
            passing: table(&[
                ("PY", ScoringSetting::on(0.04)),
                ("PTD", ScoringSetting::on(4.0)),
                ("INT", ScoringSetting::on(-2.0)),
                ("2PC", ScoringSetting::on(2.0)),
                ("P300", ScoringSetting::off(1.0)),
                ("P400", ScoringSetting::off(2.0)),
                ("SKD", ScoringSetting::on(-1.0)),
            ]),
            rushing: table(&[
                ("RY", ScoringSetting::on(0.1)),
                ("RTD", ScoringSetting::on(6.0)),
                ("2PR", ScoringSetting::on(2.0)),
                ("R100", ScoringSetting::off(1.0)),
                ("R200", ScoringSetting::off(2.0)),
            ]),
            receiving: table(&[
                ("REY", ScoringSetting::on(0.1)),
                ("REC", ScoringSetting::on(1.0)),
                ("RETD", ScoringSetting::on(6.0)),
                ("2PRE", ScoringSetting::on(2.0)),
                ("REY100", ScoringSetting::off(1.0)),
                ("REY200", ScoringSetting::off(2.0)),
            ]),
            kicking: table(&[
                ("PAT", ScoringSetting::on(1.0)),
                ("FG0", ScoringSetting::on(3.0)),
                ("FG40", ScoringSetting::on(4.0)),
                ("FG50", ScoringSetting::on(5.0)),
                ("FG60", ScoringSetting::on(6.0)),
                ("FGM0", ScoringSetting::off(-2.0)),
                ("FGM40", ScoringSetting::off(-1.0)),
            ]),
            team_defense: table(&[
                ("SK", ScoringSetting::on(1.0)),
                ("INTTD", ScoringSetting::on(6.0)),
                ("FRTD", ScoringSetting::on(6.0)),
                ("KRTD", ScoringSetting::on(6.0)),
                ("PRTD", ScoringSetting::on(6.0)),
                ("BLKKRTD", ScoringSetting::on(6.0)),
                ("BLKK", ScoringSetting::on(2.0)),
                ("INT", ScoringSetting::on(2.0)),
                ("FR", ScoringSetting::on(2.0)),
                ("SF", ScoringSetting::on(2.0)),
                ("PA0", ScoringSetting::on(10.0)),
                ("PA1", ScoringSetting::on(7.0)),
                ("PA7", ScoringSetting::on(4.0)),
                ("PA14", ScoringSetting::on(1.0)),
                ("PA18", ScoringSetting::on(0.0)),
                ("PA22", ScoringSetting::on(-1.0)),
                ("PA28", ScoringSetting::on(-4.0)),
                ("PA35", ScoringSetting::on(-7.0)),
                ("PA46", ScoringSetting::on(-10.0)),
                ("YA100", ScoringSetting::off(10.0)),
                ("YA199", ScoringSetting::off(7.0)),
                ("YA299", ScoringSetting::off(4.0)),
                ("YA349", ScoringSetting::off(2.0)),
                ("YA399", ScoringSetting::off(0.0)),
                ("YA449", ScoringSetting::off(-2.0)),
                ("YA499", ScoringSetting::off(-4.0)),
                ("YA549", ScoringSetting::off(-6.0)),
                ("YA550", ScoringSetting::off(-8.0)),
                ("2PTRET", ScoringSetting::on(2.0)),
                ("1PSF", ScoringSetting::on(1.0)),
            ]),
            miscellaneous: table(&[
                ("KRTD", ScoringSetting::on(6.0)),
                ("PRTD", ScoringSetting::on(6.0)),
                ("FRTD", ScoringSetting::on(6.0)),
                ("INTD", ScoringSetting::on(6.0)),
                ("BLKKRTD", ScoringSetting::on(6.0)),
                ("FUML", ScoringSetting::on(-2.0)),
                ("2PTRET", ScoringSetting::on(2.0)),
                ("1PSF", ScoringSetting::on(1.0)),
            ]),
            defensive_players: table(&[
                ("SK", ScoringSetting::on(1.0)),
                ("TK", ScoringSetting::on(0.5)),
                ("BLKK", ScoringSetting::on(2.0)),
                ("INT", ScoringSetting::on(3.0)),
                ("FR", ScoringSetting::on(2.0)),
                ("SF", ScoringSetting::on(2.0)),
                ("FF", ScoringSetting::off(1.0)),
                ("TKA", ScoringSetting::off(0.5)),
                ("TKS", ScoringSetting::off(1.0)),
                ("STF", ScoringSetting::off(1.0)),
                ("PD", ScoringSetting::off(1.0)),
            ]),
            head_coach: table(&[
                ("TW", ScoringSetting::on(3.0)),
                ("TL", ScoringSetting::on(-3.0)),
                ("TIE", ScoringSetting::on(1.0)),
                ("PTS", ScoringSetting::on(0.05)),
                ("WM25", ScoringSetting::off(5.0)),
                ("WM20", ScoringSetting::off(4.0)),
                ("WM15", ScoringSetting::off(3.0)),
                ("WM10", ScoringSetting::off(2.0)),
                ("WM5", ScoringSetting::off(1.0)),
                ("WM1", ScoringSetting::off(0.5)),
                ("LM1", ScoringSetting::off(-0.5)),
                ("LM5", ScoringSetting::off(-1.0)),
                ("LM10", ScoringSetting::off(-2.0)),
                ("LM15", ScoringSetting::off(-3.0)),
                ("LM20", ScoringSetting::off(-4.0)),
                ("LM25", ScoringSetting::off(-5.0)),
            ]),
            // Punting carries no default line items; leagues can add their own.
            punting: HashMap::new(),
        }
    }

    /// All categories paired with their display names, in presentation order.
    pub fn categories(&self) -> [(&'static str, &CategorySettings); 9] {
        [
            ("Passing", &self.passing),
            ("Rushing", &self.rushing),
            ("Receiving", &self.receiving),
            ("Kicking", &self.kicking),
            ("Team Defense / Special Teams", &self.team_defense),
            ("Miscellaneous", &self.miscellaneous),
            ("Defensive Players", &self.defensive_players),
            ("Head Coach", &self.head_coach),
            ("Punting", &self.punting),
        ]
    }
}

fn table(entries: &[(&str, ScoringSetting)]) -> CategorySettings {
    entries
        .iter()
        .map(|(code, setting)| (code.to_string(), *setting))
        .collect()
}
