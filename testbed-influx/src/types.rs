//! InfluxDB 1.x response types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// One result row: column name to value
pub type Row = BTreeMap<String, JsonValue>;

/// Body of a `/query` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<StatementResult>,

    /// Set when the request as a whole was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one statement in a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub statement_id: u32,

    #[serde(default)]
    pub series: Vec<Series>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A named block of rows sharing a column list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: String,

    /// Group-by tags, shared by every row of the series
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, JsonValue>,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub values: Vec<Vec<JsonValue>>,
}

impl Series {
    pub fn new(name: impl Into<String>, columns: &[&str], values: Vec<Vec<JsonValue>>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            values,
        }
    }

    /// Rows of this series with the series tags merged in
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.values.iter().map(move |values| {
            let mut row = self.tags.clone();
            for (column, value) in self.columns.iter().zip(values) {
                row.insert(column.clone(), value.clone());
            }
            row
        })
    }

    /// String values of the first column, as returned by `SHOW ... KEYS`
    pub fn first_column(&self) -> impl Iterator<Item = &str> + '_ {
        self.values
            .iter()
            .filter_map(|values| values.first().and_then(JsonValue::as_str))
    }
}

impl QueryResponse {
    /// Wrap a list of series as the result of a single statement
    pub fn from_series(series: Vec<Series>) -> Self {
        Self {
            results: vec![StatementResult {
                statement_id: 0,
                series,
                error: None,
            }],
            error: None,
        }
    }

    /// First error reported anywhere in the response
    pub fn first_error(&self) -> Option<&str> {
        self.error.as_deref().or_else(|| {
            self.results
                .iter()
                .find_map(|result| result.error.as_deref())
        })
    }

    /// All series across all statements
    pub fn series(&self) -> impl Iterator<Item = &Series> + '_ {
        self.results.iter().flat_map(|result| result.series.iter())
    }

    /// All rows across all series, in response order
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.series().flat_map(Series::rows)
    }
}
