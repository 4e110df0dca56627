use super::{CLOCK, EventError, PERIOD};
use nba_stats::Record;

/// `"MM:SS"` period clock → seconds remaining.
pub fn clock_seconds(clock: &str) -> Option<u32> {
    let (minutes, seconds) = clock.trim().split_once(':')?;
    Some(minutes.parse::<u32>().ok()? * 60 + seconds.parse::<u32>().ok()?)
}

/// Plays in `event_period` whose clock is within `budget_secs` after the event.
///
/// The game clock counts down, so "after" means `[event - budget, event]`.
/// Table order is kept; plays with an unreadable clock are left out.
pub fn window<'a>(
    plays: &'a [Record],
    event_clock: &str,
    event_period: i64,
    budget_secs: u32,
) -> Result<Vec<&'a Record>, EventError> {
    let end = clock_seconds(event_clock).ok_or_else(|| EventError::BadClock(event_clock.into()))?;
    let start = end.saturating_sub(budget_secs);

    Ok(plays
        .iter()
        .filter(|play| play.int(PERIOD) == Some(event_period))
        .filter(|play| {
            play.text(CLOCK)
                .and_then(|c| clock_seconds(&c))
                .is_some_and(|secs| (start..=end).contains(&secs))
        })
        .collect())
}
