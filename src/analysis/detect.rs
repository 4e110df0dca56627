use super::{HOME_DESCRIPTION, TEAM, VISITOR_DESCRIPTION};
use nba_stats::Record;

pub const TECH_MARKER: &str = "T.Foul";

/// Plays whose visitor or home description mentions a technical foul.
pub fn detect(plays: &[Record]) -> Vec<&Record> {
    plays.iter().filter(|play| is_technical(play)).collect()
}

fn is_technical(play: &Record) -> bool {
    [VISITOR_DESCRIPTION, HOME_DESCRIPTION]
        .iter()
        .any(|field| play.text(field).is_some_and(|d| d.contains(TECH_MARKER)))
}

/// Visitor description when present, otherwise the home one.
pub fn neutral_description(play: &Record) -> Option<String> {
    play.text(VISITOR_DESCRIPTION)
        .or_else(|| play.text(HOME_DESCRIPTION))
}

/// Home team abbreviation, read off the first play credited only to the home side.
pub fn home_team(plays: &[Record]) -> Option<String> {
    plays
        .iter()
        .filter(|p| p.text(HOME_DESCRIPTION).is_some() && p.text(VISITOR_DESCRIPTION).is_none())
        .find_map(|p| p.text(TEAM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn play(home: Value, visitor: Value, team: Value) -> Record {
        [
            (HOME_DESCRIPTION, home),
            (VISITOR_DESCRIPTION, visitor),
            (TEAM, team),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn finds_technicals_on_either_side() {
        let plays = vec![
            play(json!("Curry 26' 3PT Jump Shot"), Value::Null, json!("GSW")),
            play(Value::Null, json!("James T.Foul (P1.T1)"), json!("CLE")),
            play(json!("Green T.Foul (P2.T2)"), Value::Null, json!("GSW")),
            play(json!("Timeout: Regular"), json!("Love Foul"), json!("CLE")),
        ];
        let events = detect(&plays);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].text(TEAM).as_deref(), Some("CLE"));
        assert_eq!(events[1].text(TEAM).as_deref(), Some("GSW"));
    }

    #[test]
    fn marker_on_both_sides_counts_once() {
        let plays = vec![play(
            json!("Green T.Foul (P1.T1)"),
            json!("Thompson T.Foul (P1.T2)"),
            json!("GSW"),
        )];
        assert_eq!(detect(&plays).len(), 1);
    }

    #[test]
    fn null_descriptions_never_match() {
        let plays = vec![play(Value::Null, Value::Null, Value::Null)];
        assert!(detect(&plays).is_empty());
    }

    #[test]
    fn neutral_description_prefers_visitor() {
        let both = play(json!("home text"), json!("visitor text"), Value::Null);
        assert_eq!(neutral_description(&both).as_deref(), Some("visitor text"));
        let home_only = play(json!("home text"), Value::Null, Value::Null);
        assert_eq!(neutral_description(&home_only).as_deref(), Some("home text"));
        assert_eq!(neutral_description(&play(Value::Null, Value::Null, Value::Null)), None);
    }

    #[test]
    fn home_team_skips_shared_and_teamless_plays() {
        let plays = vec![
            play(json!("Jump Ball"), json!("Jump Ball"), json!("CLE")),
            play(json!("Team Rebound"), Value::Null, Value::Null),
            play(Value::Null, json!("Irving Layup"), json!("CLE")),
            play(json!("Curry Layup"), Value::Null, json!("GSW")),
        ];
        assert_eq!(home_team(&plays).as_deref(), Some("GSW"));
        assert_eq!(home_team(&plays[..3]), None);
    }
}
