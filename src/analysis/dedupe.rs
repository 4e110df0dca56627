use super::GAME_ID;
use nba_stats::Table;
use std::collections::HashSet;

/// Unique game IDs of a team-perspective game log, in first-seen order.
pub fn dedupe(game_log: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    game_log
        .iter()
        .filter_map(|row| row.text(GAME_ID))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nba_stats::Record;
    use serde_json::json;

    fn log(ids: &[serde_json::Value]) -> Table {
        ids.iter()
            .map(|id| [(GAME_ID, id.clone()), ("TEAM_ABBREVIATION", json!("GSW"))].into_iter().collect::<Record>())
            .collect()
    }

    #[test]
    fn keeps_first_occurrence_order() {
        let table = log(&[json!("A"), json!("A"), json!("B"), json!("C"), json!("B")]);
        assert_eq!(dedupe(&table), vec!["A", "B", "C"]);
    }

    #[test]
    fn every_permutation_yields_the_distinct_set() {
        let ids = ["A", "A", "B", "C", "B"];
        let mut order: Vec<usize> = (0..ids.len()).collect();
        // Walk all rotations and reversals; enough to shake out ordering bugs.
        for _ in 0..ids.len() {
            order.rotate_left(1);
            for seq in [order.clone(), order.iter().rev().copied().collect()] {
                let table = log(&seq.iter().map(|&i| json!(ids[i])).collect::<Vec<_>>());
                let mut out = dedupe(&table);
                assert_eq!(out.len(), 3);
                out.sort();
                assert_eq!(out, vec!["A", "B", "C"]);
            }
        }
    }

    #[test]
    fn rows_without_an_id_are_skipped() {
        let table = log(&[json!(null), json!("0021400001"), json!(""), json!(21400002)]);
        assert_eq!(dedupe(&table), vec!["0021400001", "21400002"]);
    }

    #[test]
    fn empty_log() {
        assert!(dedupe(&Table::new()).is_empty());
    }
}
