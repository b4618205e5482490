// Fantasy points calculation from a raw statline and the league's rules.

use crate::roster::Position;

use super::rules::{CategorySettings, ScoringRules};
use super::statline::GameStatline;

/// Compute the fantasy points a player (or unit) earned in one game.
///
/// Absent stats contribute nothing, as do disabled or missing settings.
/// Which category tables apply depends on the position:
/// - Head coaches score exclusively from the Head Coach table.
/// - Team defenses score exclusively from the Team Defense table.
/// - Individual defenders score exclusively from the Defensive Players table.
/// - Everyone else scores from the offensive tables plus Miscellaneous.
///
/// The result is rounded to two decimal places, matching the precision of
/// stored historical scores.
pub fn calculate_points(position: Position, stats: &GameStatline, rules: &ScoringRules) -> f64 {
    if position == Position::HeadCoach {
        return round2(head_coach_points(stats, &rules.head_coach));
    }

    let mut points = 0.0;

    if position == Position::Defense {
        team_defense_points(&mut points, stats, &rules.team_defense);
        return round2(points);
    }

    if position.is_defensive_player() {
        defensive_player_points(&mut points, stats, &rules.defensive_players);
        return round2(points);
    }

    // Passing
    add(&mut points, &rules.passing, "PY", stats.passing_yards);
    add(&mut points, &rules.passing, "PTD", stats.passing_touchdowns);
    add(&mut points, &rules.passing, "INT", stats.interceptions_thrown);
    add(&mut points, &rules.passing, "2PC", stats.passing_two_point_conversions);
    add(&mut points, &rules.passing, "SKD", stats.times_sacked);
    if let Some(py) = stats.passing_yards {
        // Yardage bonus tiers are mutually exclusive indicators stacked on
        // top of the per-yard value.
        if py >= 400.0 {
            add(&mut points, &rules.passing, "P400", Some(1.0));
        } else if py >= 300.0 {
            add(&mut points, &rules.passing, "P300", Some(1.0));
        }
    }

    // Rushing
    add(&mut points, &rules.rushing, "RY", stats.rushing_yards);
    add(&mut points, &rules.rushing, "RTD", stats.rushing_touchdowns);
    add(&mut points, &rules.rushing, "2PR", stats.rushing_two_point_conversions);
    if let Some(ry) = stats.rushing_yards {
        if ry >= 200.0 {
            add(&mut points, &rules.rushing, "R200", Some(1.0));
        } else if ry >= 100.0 {
            add(&mut points, &rules.rushing, "R100", Some(1.0));
        }
    }

    // Receiving
    add(&mut points, &rules.receiving, "REY", stats.receiving_yards);
    add(&mut points, &rules.receiving, "REC", stats.receptions);
    add(&mut points, &rules.receiving, "RETD", stats.receiving_touchdowns);
    add(&mut points, &rules.receiving, "2PRE", stats.receiving_two_point_conversions);
    if let Some(rey) = stats.receiving_yards {
        if rey >= 200.0 {
            add(&mut points, &rules.receiving, "REY200", Some(1.0));
        } else if rey >= 100.0 {
            add(&mut points, &rules.receiving, "REY100", Some(1.0));
        }
    }

    // Kicking
    add(&mut points, &rules.kicking, "PAT", stats.pat_made);
    add(&mut points, &rules.kicking, "FG0", stats.field_goals_0_to_39);
    add(&mut points, &rules.kicking, "FG40", stats.field_goals_40_to_49);
    add(&mut points, &rules.kicking, "FG50", stats.field_goals_50_to_59);
    add(&mut points, &rules.kicking, "FG60", stats.field_goals_60_plus);
    add(&mut points, &rules.kicking, "FGM0", stats.field_goals_missed_0_to_39);
    add(&mut points, &rules.kicking, "FGM40", stats.field_goals_missed_40_plus);

    // Miscellaneous (offensive players)
    add(&mut points, &rules.miscellaneous, "KRTD", stats.kick_return_touchdowns);
    add(&mut points, &rules.miscellaneous, "PRTD", stats.punt_return_touchdowns);
    add(&mut points, &rules.miscellaneous, "FRTD", stats.fumble_return_touchdowns);
    add(&mut points, &rules.miscellaneous, "INTD", stats.interception_touchdowns);
    add(&mut points, &rules.miscellaneous, "BLKKRTD", stats.blocked_kick_touchdowns);
    add(&mut points, &rules.miscellaneous, "FUML", stats.fumbles_lost);
    add(&mut points, &rules.miscellaneous, "2PTRET", stats.two_point_returns);
    add(&mut points, &rules.miscellaneous, "1PSF", stats.one_point_safeties);

    round2(points)
}

/// Add `stat * value` when the stat is present and the setting is enabled.
fn add(points: &mut f64, table: &CategorySettings, code: &str, stat: Option<f64>) {
    if let (Some(stat), Some(setting)) = (stat, table.get(code)) {
        if setting.enabled {
            *points += stat * setting.value;
        }
    }
}

fn head_coach_points(stats: &GameStatline, table: &CategorySettings) -> f64 {
    let mut points = 0.0;

    match stats.game_result.as_deref() {
        Some("W") => add(&mut points, table, "TW", Some(1.0)),
        Some("L") => add(&mut points, table, "TL", Some(1.0)),
        Some("T") => add(&mut points, table, "TIE", Some(1.0)),
        _ => {}
    }

    add(&mut points, table, "PTS", stats.team_score);

    if let Some(margin) = stats.margin() {
        // First matching margin bucket only.
        let code = if margin >= 25.0 {
            Some("WM25")
        } else if margin >= 20.0 {
            Some("WM20")
        } else if margin >= 15.0 {
            Some("WM15")
        } else if margin >= 10.0 {
            Some("WM10")
        } else if margin >= 5.0 {
            Some("WM5")
        } else if margin >= 1.0 {
            Some("WM1")
        } else if margin <= -25.0 {
            Some("LM25")
        } else if margin <= -20.0 {
            Some("LM20")
        } else if margin <= -15.0 {
            Some("LM15")
        } else if margin <= -10.0 {
            Some("LM10")
        } else if margin <= -5.0 {
            Some("LM5")
        } else if margin <= -1.0 {
            Some("LM1")
        } else {
            None
        };
        if let Some(code) = code {
            add(&mut points, table, code, Some(1.0));
        }
    }

    points
}

fn team_defense_points(points: &mut f64, stats: &GameStatline, table: &CategorySettings) {
    add(points, table, "SK", stats.sacks);
    add(points, table, "INTTD", stats.interception_touchdowns);
    // Fumble return scores aren't itemized in the feed; the generic
    // defensive touchdown count stands in for them.
    add(points, table, "FRTD", stats.defensive_touchdowns);
    // Kick and punt returns arrive as one combined count, so both line
    // items read the same stat.
    add(points, table, "KRTD", stats.return_touchdowns);
    add(points, table, "PRTD", stats.return_touchdowns);
    add(points, table, "BLKKRTD", stats.blocked_kick_touchdowns);
    add(points, table, "BLKK", stats.blocked_kicks);
    add(points, table, "INT", stats.defensive_interceptions);
    add(points, table, "FR", stats.fumbles_recovered);
    add(points, table, "SF", stats.safeties);
    add(points, table, "2PTRET", stats.two_point_returns);
    add(points, table, "1PSF", stats.one_point_safeties);

    if let Some(pa) = stats.points_allowed {
        let code = if pa <= 0.0 {
            "PA0"
        } else if pa <= 6.0 {
            "PA1"
        } else if pa <= 13.0 {
            "PA7"
        } else if pa <= 17.0 {
            "PA14"
        } else if pa <= 21.0 {
            "PA18"
        } else if pa <= 27.0 {
            "PA22"
        } else if pa <= 34.0 {
            "PA28"
        } else if pa <= 45.0 {
            "PA35"
        } else {
            "PA46"
        };
        add(points, table, code, Some(1.0));
    }

    if let Some(ya) = stats.yards_allowed {
        let code = if ya < 100.0 {
            "YA100"
        } else if ya < 200.0 {
            "YA199"
        } else if ya < 300.0 {
            "YA299"
        } else if ya < 350.0 {
            "YA349"
        } else if ya < 400.0 {
            "YA399"
        } else if ya < 450.0 {
            "YA449"
        } else if ya < 500.0 {
            "YA499"
        } else if ya < 550.0 {
            "YA549"
        } else {
            "YA550"
        };
        add(points, table, code, Some(1.0));
    }
}

fn defensive_player_points(points: &mut f64, stats: &GameStatline, table: &CategorySettings) {
    add(points, table, "SK", stats.sacks);
    add(points, table, "TKS", stats.solo_tackles);
    add(points, table, "TKA", stats.assisted_tackles);
    add(points, table, "BLKK", stats.blocked_kicks);
    add(points, table, "INT", stats.defensive_interceptions);
    add(points, table, "FR", stats.fumbles_recovered);
    add(points, table, "FF", stats.fumbles_forced);
    add(points, table, "SF", stats.safeties);
    add(points, table, "STF", stats.tackles_for_loss);
    add(points, table, "PD", stats.passes_defensed);

    // Combined tackles require both counts; a statline with only one of the
    // two reported scores no tackle points.
    if let (Some(solo), Some(assisted)) = (stats.solo_tackles, stats.assisted_tackles) {
        add(points, table, "TK", Some(solo + assisted));
    }
}

pub(crate) fn round2(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}
