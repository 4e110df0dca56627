pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod lookup;
pub mod news;
pub mod season;

use serde::Serialize;
use serde_json::{Map, Value};

pub use client::{ApiError, ApiResult, Fetch, Params, StatsApi};
pub use endpoints::{Endpoint, Request, StatsSession};
pub use envelope::{NormalizeError, normalize};
pub use lookup::LookupTables;

// ---------------------------------------------------------------------------
// Canonical tabular model — independent of the stats.nba.com envelope shapes
// ---------------------------------------------------------------------------

/// One stats row, keyed by column header.
///
/// Field sets vary per endpoint, so values stay as raw JSON scalars. Keys
/// iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Rows of a single result set, in response order.
pub type Table = Vec<Record>;

/// Every result set of one response, in response order.
pub type CanonicalResult = Vec<Table>;

impl Record {
    /// Zip a header row against a data row. Extra cells on either side are dropped.
    pub fn from_row(headers: &[String], row: Vec<Value>) -> Self {
        Self(headers.iter().cloned().zip(row).collect())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text value of a field. Null, missing and empty strings count as absent;
    /// numbers are rendered as their decimal text.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Integer value of a field, accepting numeric strings ("3") as well.
    pub fn int(&self, field: &str) -> Option<i64> {
        match self.0.get(field)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// First table of a result, if the response carried any.
pub fn first_table(result: &CanonicalResult) -> Option<&Table> {
    result.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_row_zips_positionally() {
        let record = Record::from_row(&headers(&["A", "B"]), vec![json!(1), json!("x")]);
        assert_eq!(record.get("A"), Some(&json!(1)));
        assert_eq!(record.get("B"), Some(&json!("x")));
    }

    #[test]
    fn from_row_drops_unmatched_cells() {
        let short = Record::from_row(&headers(&["A", "B", "C"]), vec![json!(1)]);
        assert_eq!(short.len(), 1);
        let long = Record::from_row(&headers(&["A"]), vec![json!(1), json!(2)]);
        assert_eq!(long.len(), 1);
    }

    #[test]
    fn text_treats_null_and_empty_as_absent() {
        let record: Record = [
            ("SCORE", json!("98 - 97")),
            ("SCOREMARGIN", Value::Null),
            ("HOMEDESCRIPTION", json!("")),
            ("PERIOD", json!(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(record.text("SCORE").as_deref(), Some("98 - 97"));
        assert_eq!(record.text("SCOREMARGIN"), None);
        assert_eq!(record.text("HOMEDESCRIPTION"), None);
        assert_eq!(record.text("PERIOD").as_deref(), Some("2"));
        assert_eq!(record.text("MISSING"), None);
    }

    #[test]
    fn int_accepts_numbers_and_numeric_strings() {
        let record: Record = [("PERIOD", json!(3)), ("GAME_ID", json!("0021400001"))]
            .into_iter()
            .collect();
        assert_eq!(record.int("PERIOD"), Some(3));
        assert_eq!(record.int("GAME_ID"), Some(21400001));
        assert_eq!(record.int("MISSING"), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let record = Record::from_row(&headers(&["B", "A"]), vec![json!(2), json!(1)]);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"A":1,"B":2}"#);
    }
}
