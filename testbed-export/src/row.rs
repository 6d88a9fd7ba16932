//! Per-row normalisation applied while scrolling

use crate::errors::{ExportError, ExportResult};
use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use testbed_influx::Row;

/// Columns never renamed by [`prefix_columns`]
pub const RESERVED_COLUMNS: [&str; 3] = ["container_id", "host", "time"];

/// Container ids are cut to the length of the short ids used in host names
pub const CONTAINER_ID_LEN: usize = 11;

pub const TIME_COLUMN: &str = "time";
pub const CONTAINER_ID_COLUMN: &str = "container_id";

/// A normalised row and its timestamp in microseconds since the epoch
#[derive(Debug, Clone, PartialEq)]
pub struct ScrolledRow {
    pub timestamp: i64,
    pub row: Row,
}

pub fn is_reserved(column: &str) -> bool {
    RESERVED_COLUMNS.contains(&column)
}

/// `prefix-column`
pub fn prefixed_name(prefix: &str, column: &str) -> String {
    format!("{}-{}", prefix, column)
}

pub fn truncate_container_id(row: &mut Row) {
    if let Some(JsonValue::String(id)) = row.get_mut(CONTAINER_ID_COLUMN) {
        if let Some((cut, _)) = id.char_indices().nth(CONTAINER_ID_LEN) {
            id.truncate(cut);
        }
    }
}

/// Parse an RFC 3339 UTC timestamp, with or without fractional seconds,
/// into microseconds since the epoch
pub fn parse_timestamp(value: &str) -> ExportResult<i64> {
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map_err(
        |source| ExportError::Timestamp {
            value: value.to_string(),
            source,
        },
    )?;
    Ok(parsed.and_utc().timestamp_micros())
}

/// Rename every non-reserved column to `prefix-column`
pub fn prefix_columns(row: Row, prefix: &str) -> Row {
    row.into_iter()
        .map(|(column, value)| {
            if is_reserved(&column) {
                (column, value)
            } else {
                (prefixed_name(prefix, &column), value)
            }
        })
        .collect()
}

/// Inverse of [`prefix_columns`]
pub fn strip_prefix(row: Row, prefix: &str) -> Row {
    let marker = format!("{}-", prefix);
    row.into_iter()
        .map(|(column, value)| match column.strip_prefix(&marker) {
            Some(bare) => (bare.to_string(), value),
            None => (column, value),
        })
        .collect()
}

/// Truncate the container id, parse the time column and apply the prefix
pub fn normalize_row(mut row: Row, prefix: Option<&str>) -> ExportResult<ScrolledRow> {
    truncate_container_id(&mut row);

    let timestamp = match row.get(TIME_COLUMN) {
        Some(JsonValue::String(time)) => parse_timestamp(time)?,
        _ => return Err(ExportError::MissingTime),
    };

    let row = match prefix {
        Some(prefix) => prefix_columns(row, prefix),
        None => row,
    };

    Ok(ScrolledRow { timestamp, row })
}
