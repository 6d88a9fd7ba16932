//! Paginated time-window queries
//!
//! A [`Scroll`] renders its [`QueryTemplate`] once per window of a
//! [`TimeRange`], issues the queries one at a time as rows are consumed and
//! yields normalised rows in ascending timestamp order.

use crate::errors::{ExportError, ExportResult};
use crate::row::{normalize_row, ScrolledRow};
use crate::window::{format_query_time, QueryWindows, TimeRange};
use std::collections::VecDeque;
use std::time::Duration;
use testbed_influx::QueryClient;
use tracing::debug;

const BEGIN: &str = "{begin}";
const END: &str = "{end}";

/// InfluxQL statement with `{begin}` and `{end}` time placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate(String);

impl QueryTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// `select * from "<measurement>" where <conditions> and <time range>`
    pub fn select_all(measurement: &str, conditions: &[String]) -> Self {
        let mut clauses: Vec<String> = conditions.to_vec();
        clauses.push(format!("time >= '{}' and time < '{}'", BEGIN, END));
        Self(format!(
            "select * from \"{}\" where {}",
            measurement,
            clauses.join(" and ")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, window: &TimeRange) -> String {
        self.0
            .replace(BEGIN, &format_query_time(&window.start))
            .replace(END, &format_query_time(&window.end))
    }
}

/// Lazy, one-pass sequence of rows covering a time range
pub struct Scroll<'c> {
    client: &'c dyn QueryClient,
    template: QueryTemplate,
    windows: QueryWindows,
    prefix: Option<String>,
    buffered: VecDeque<ScrolledRow>,
    queries_issued: usize,
}

impl<'c> Scroll<'c> {
    pub fn new(
        client: &'c dyn QueryClient,
        template: QueryTemplate,
        range: TimeRange,
        window: Duration,
    ) -> ExportResult<Self> {
        Ok(Self {
            client,
            template,
            windows: range.windows(window)?,
            prefix: None,
            buffered: VecDeque::new(),
            queries_issued: 0,
        })
    }

    /// Rename non-reserved columns to `prefix-column`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn queries_issued(&self) -> usize {
        self.queries_issued
    }

    /// Next row, querying further windows as needed
    pub async fn next_row(&mut self) -> ExportResult<Option<ScrolledRow>> {
        loop {
            if let Some(row) = self.buffered.pop_front() {
                return Ok(Some(row));
            }
            match self.windows.next() {
                Some(window) => self.fetch(window).await?,
                None => return Ok(None),
            }
        }
    }

    /// Drain the scroll into memory
    pub async fn collect_all(mut self) -> ExportResult<Vec<ScrolledRow>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn fetch(&mut self, window: TimeRange) -> ExportResult<()> {
        let query = self.template.render(&window);
        self.queries_issued += 1;

        let response = self
            .client
            .query(&query)
            .await
            .map_err(|source| ExportError::Query {
                query: query.clone(),
                source,
            })?;

        let mut rows = response
            .rows()
            .map(|row| normalize_row(row, self.prefix.as_deref()))
            .collect::<ExportResult<Vec<_>>>()?;
        rows.sort_by_key(|row| row.timestamp);

        debug!(rows = rows.len(), query = %query, "Fetched window");
        self.buffered.extend(rows);
        Ok(())
    }
}
