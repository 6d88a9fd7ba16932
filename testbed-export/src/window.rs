//! Time ranges and their subdivision into query windows

use crate::errors::{ExportError, ExportResult};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::time::Duration;

/// Default size of one paginated query window
pub const DEFAULT_SCROLL_WINDOW: Duration = Duration::from_secs(4 * 60);

/// Half-open interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ExportResult<Self> {
        if start > end {
            return Err(ExportError::InvalidRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// The `lookback` long range ending at `now`
    pub fn ending_at(now: DateTime<Utc>, lookback: Duration) -> ExportResult<Self> {
        let start = to_time_delta(lookback)
            .ok()
            .and_then(|delta| now.checked_sub_signed(delta))
            .ok_or_else(|| ExportError::InvalidRange {
                start: format!("{} minus {:?}", now.to_rfc3339(), lookback),
                end: now.to_rfc3339(),
            })?;
        Self::new(start, now)
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Split the range into contiguous windows of at most `size`
    pub fn windows(&self, size: Duration) -> ExportResult<QueryWindows> {
        QueryWindows::new(*self, size)
    }
}

/// Iterator over the query windows covering a [`TimeRange`]
///
/// Windows are contiguous and non-overlapping; every window but the last is
/// exactly `size` long.
#[derive(Debug, Clone)]
pub struct QueryWindows {
    cursor: DateTime<Utc>,
    until: DateTime<Utc>,
    size: TimeDelta,
}

impl QueryWindows {
    pub fn new(range: TimeRange, size: Duration) -> ExportResult<Self> {
        let size = to_time_delta(size)?;
        if size <= TimeDelta::zero() {
            return Err(ExportError::InvalidWindow(
                "window size must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            cursor: range.start,
            until: range.end,
            size,
        })
    }
}

impl Iterator for QueryWindows {
    type Item = TimeRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.until {
            return None;
        }
        let end = self
            .cursor
            .checked_add_signed(self.size)
            .map_or(self.until, |end| std::cmp::min(end, self.until));
        let window = TimeRange {
            start: self.cursor,
            end,
        };
        self.cursor = end;
        Some(window)
    }
}

/// Timestamp literal used inside InfluxQL time conditions
pub fn format_query_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn to_time_delta(duration: Duration) -> ExportResult<TimeDelta> {
    TimeDelta::from_std(duration)
        .map_err(|e| ExportError::InvalidWindow(format!("{:?} is out of range: {}", duration, e)))
}
