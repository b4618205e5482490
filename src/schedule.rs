// Season calendar: week derivation and the weekly reveal cutoff.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone, Weekday};

/// Length of the regular season in weeks.
pub const REGULAR_SEASON_WEEKS: u32 = 18;

/// Default local hour (24h clock) for the Sunday reveal cutoff.
pub const DEFAULT_CUTOFF_HOUR: u32 = 10;

fn first_thursday_of_september(year: i32) -> Option<NaiveDate> {
    let mut date = NaiveDate::from_ymd_opt(year, 9, 1)?;
    while date.weekday() != Weekday::Thu {
        date = date.succ_opt()?;
    }
    Some(date)
}

/// Week 1 kickoff: one week after the first Thursday of September.
pub fn season_kickoff(year: i32) -> Option<NaiveDate> {
    first_thursday_of_september(year)?.checked_add_days(Days::new(7))
}

/// The NFL week a calendar date falls in, clamped to 1..=18.
///
/// Dates before kickoff report week 1; dates past the regular season
/// report week 18.
pub fn week_for_date(date: NaiveDate, season_year: i32) -> u32 {
    let Some(kickoff) = season_kickoff(season_year) else {
        return 1;
    };
    let days = (date - kickoff).num_days();
    let week = days.div_euclid(7) + 1;
    week.clamp(1, REGULAR_SEASON_WEEKS as i64) as u32
}

/// The reveal cutoff for a given week: Sunday at `hour`:00 league-local
/// time. Card activations and deactivations are only allowed strictly
/// before this instant; reveals only at or after it.
pub fn reveal_cutoff(season_year: i32, week: u32, hour: u32) -> Option<DateTime<Local>> {
    let kickoff = season_kickoff(season_year)?;
    // Kickoff is a Thursday; the matchup Sunday is three days later.
    let sunday = kickoff
        .checked_add_days(Days::new((week.saturating_sub(1) as u64) * 7))?
        .checked_add_days(Days::new(3))?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    Local.from_local_datetime(&sunday.and_time(time)).earliest()
}
