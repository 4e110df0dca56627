use super::{CLOCK, EventError, MarginDelta, SCORE, SCORE_MARGIN, TEAM};
use nba_stats::Record;

const TIE: &str = "TIE";

/// Margin swing across a window, signed so a positive value favors the team
/// that did not commit the technical.
///
/// `SCOREMARGIN` is home minus visitor, hence the sign flip when the home side
/// committed the foul.
pub fn delta(window: &[&Record], home_team: Option<&str>) -> Result<MarginDelta, EventError> {
    let first = window.first().ok_or(EventError::EmptyWindow)?;
    let team = first.text(TEAM);
    let change_margin = if team.is_some() && team.as_deref() == home_team { -1 } else { 1 };

    let original = window.iter().find_map(|p| p.text(SCORE_MARGIN));
    let last = window.iter().rev().find_map(|p| p.text(SCORE_MARGIN));
    let (Some(original), Some(last)) = (original, last) else {
        return Err(EventError::EmptyWindow);
    };

    let original_margin = parse_margin(&original)?;
    let final_margin = parse_margin(&last)?;

    Ok(MarginDelta {
        team,
        margin_change: final_margin * change_margin - original_margin * change_margin,
        original_score: window.iter().find_map(|p| p.text(SCORE)),
        final_score: window.iter().rev().find_map(|p| p.text(SCORE)),
        time_committed: first.text(CLOCK).unwrap_or_default(),
    })
}

fn parse_margin(margin: &str) -> Result<i64, EventError> {
    if margin.trim().eq_ignore_ascii_case(TIE) {
        return Ok(0);
    }
    margin
        .trim()
        .parse()
        .map_err(|_| EventError::BadMargin(margin.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn play(team: &str, clock: &str, score: Value, margin: Value) -> Record {
        [
            (TEAM, json!(team)),
            (CLOCK, json!(clock)),
            (SCORE, score),
            (SCORE_MARGIN, margin),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn away_technical_from_tie() {
        let plays = [
            play("CLE", "3:12", Value::Null, Value::Null),
            play("GSW", "3:12", json!("88 - 88"), json!("TIE")),
            play("GSW", "1:40", json!("88 - 93"), json!("5")),
        ];
        let window: Vec<&Record> = plays.iter().collect();
        let d = delta(&window, Some("GSW")).unwrap();
        assert_eq!(
            d,
            MarginDelta {
                team: Some("CLE".into()),
                margin_change: 5,
                original_score: Some("88 - 88".into()),
                final_score: Some("88 - 93".into()),
                time_committed: "3:12".into(),
            }
        );
    }

    #[test]
    fn home_technical_flips_sign() {
        let plays = [
            play("GSW", "9:00", json!("40 - 42"), json!("2")),
            play("CLE", "7:30", json!("45 - 42"), json!("-3")),
        ];
        let window: Vec<&Record> = plays.iter().collect();
        // Margin fell by 5 for the home side, which helps the away team.
        assert_eq!(delta(&window, Some("GSW")).unwrap().margin_change, 5);
    }

    #[test]
    fn unknown_home_team_counts_as_away() {
        let plays = [
            play("GSW", "9:00", json!("40 - 42"), json!("2")),
            play("CLE", "7:30", json!("45 - 42"), json!("-3")),
        ];
        let window: Vec<&Record> = plays.iter().collect();
        assert_eq!(delta(&window, None).unwrap().margin_change, -5);
    }

    #[test]
    fn tie_on_both_ends_is_zero() {
        let plays = [
            play("CLE", "2:00", json!("90 - 90"), json!("TIE")),
            play("GSW", "1:00", json!("92 - 92"), json!("TIE")),
        ];
        let window: Vec<&Record> = plays.iter().collect();
        assert_eq!(delta(&window, Some("GSW")).unwrap().margin_change, 0);
    }

    #[test]
    fn numeric_margins_are_accepted() {
        let plays = [play("CLE", "2:00", json!("90 - 93"), json!(3))];
        let window: Vec<&Record> = plays.iter().collect();
        assert_eq!(delta(&window, Some("GSW")).unwrap().margin_change, 0);
    }

    #[test]
    fn window_without_margin_is_empty() {
        let plays = [
            play("CLE", "5:00", Value::Null, Value::Null),
            play("CLE", "4:50", Value::Null, json!("")),
        ];
        let window: Vec<&Record> = plays.iter().collect();
        assert_eq!(delta(&window, Some("GSW")), Err(EventError::EmptyWindow));
        assert_eq!(delta(&[], Some("GSW")), Err(EventError::EmptyWindow));
    }

    #[test]
    fn garbage_margin_is_reported() {
        let plays = [play("CLE", "5:00", json!("1 - 0"), json!("lots"))];
        let window: Vec<&Record> = plays.iter().collect();
        assert_eq!(
            delta(&window, Some("GSW")),
            Err(EventError::BadMargin("lots".into()))
        );
    }
}
