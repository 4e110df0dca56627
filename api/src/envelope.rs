/// stats.nba.com envelope shapes — serde views of the raw tabular payloads.
/// Everything is folded into the canonical `Record` tables by `normalize`.
use crate::{CanonicalResult, Record, Table};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// The three envelope layouts the stats host returns, tried in declaration order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// `{"resultSet": {"headers": [...], "rowSet": [...]}}`
    Single {
        #[serde(rename = "resultSet")]
        result_set: RawTable,
    },
    /// `{"resultSets": [{"headers": [...], "rowSet": [...]}, ...]}`
    Multi {
        #[serde(rename = "resultSets")]
        result_sets: Vec<RawTable>,
    },
    /// `{"resultSets": {"headers": [{"name": .., "columnNames": [...]}, ...], "rowSet": [...]}}`
    /// Shot-location style responses with grouped column headers.
    Grouped {
        #[serde(rename = "resultSets")]
        result_sets: GroupedTable,
    },
}

#[derive(Debug, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct GroupedTable {
    pub headers: Vec<HeaderSet>,
    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct HeaderSet {
    pub name: Option<String>,
    #[serde(rename = "columnNames")]
    pub column_names: Vec<String>,
}

impl RawTable {
    fn into_table(self) -> Table {
        let headers = self.headers;
        self.row_set
            .into_iter()
            .map(|row| Record::from_row(&headers, row))
            .collect()
    }
}

impl GroupedTable {
    /// The header set that names the data columns. Falls back to the second set,
    /// then the last one, when none is called "columns".
    fn column_headers(&self) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|h| h.name.as_deref() == Some("columns"))
            .or_else(|| self.headers.get(1))
            .or_else(|| self.headers.last())
            .map(|h| h.column_names.as_slice())
    }

    fn into_table(self) -> Option<Table> {
        let headers = self.column_headers()?.to_vec();
        Some(
            self.row_set
                .into_iter()
                .map(|row| Record::from_row(&headers, row))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The fetch produced nothing (transport failure or JSON null).
    NoPayload,
    /// A payload arrived but matched none of the known envelopes.
    ShapeMismatch(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::NoPayload => write!(f, "no payload"),
            NormalizeError::ShapeMismatch(shape) => write!(f, "unrecognized envelope: {shape}"),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Turn one raw payload into canonical tables.
pub fn normalize(payload: Option<&Value>) -> Result<CanonicalResult, NormalizeError> {
    let payload = match payload {
        None | Some(Value::Null) => return Err(NormalizeError::NoPayload),
        Some(v) => v,
    };

    let envelope = Envelope::deserialize(payload)
        .map_err(|_| NormalizeError::ShapeMismatch(describe_shape(payload)))?;

    match envelope {
        Envelope::Single { result_set } => Ok(vec![result_set.into_table()]),
        Envelope::Multi { result_sets } => {
            Ok(result_sets.into_iter().map(RawTable::into_table).collect())
        }
        Envelope::Grouped { result_sets } => result_sets
            .into_table()
            .map(|table| vec![table])
            .ok_or_else(|| NormalizeError::ShapeMismatch("grouped envelope without header sets".into())),
    }
}

/// Short structural summary for diagnostics, e.g. `object{foo, bar}`.
fn describe_shape(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object{{{}}}", keys.join(", "))
        }
        Value::Array(items) => format!("array[{}]", items.len()),
        Value::String(_) => "string".into(),
        Value::Number(_) => "number".into(),
        Value::Bool(_) => "bool".into(),
        Value::Null => "null".into(),
    }
}
