use chrono::{DateTime, Datelike, Utc};

/// Season label in the stats API's `"2015-16"` form for the given moment.
///
/// The regular season tips off in October, so October onward belongs to the
/// season starting that calendar year.
pub fn current_season(now: DateTime<Utc>) -> String {
    let start = if now.month() >= 10 { now.year() } else { now.year() - 1 };
    season_label(start)
}

pub fn season_label(start_year: i32) -> String {
    format!("{start_year}-{:02}", (start_year + 1).rem_euclid(100))
}

/// Start year of a `"2015-16"` style label.
pub fn start_year(season: &str) -> Option<i32> {
    let (start, end) = season.split_once('-')?;
    if start.len() != 4 || end.len() != 2 {
        return None;
    }
    start.parse().ok()
}

/// `SeasonID` encoding used by a few endpoints: `"2"` + start year.
pub fn season_id(season: &str) -> Option<String> {
    start_year(season).map(|y| format!("2{y}"))
}
