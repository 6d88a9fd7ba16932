//! The `metadata.json` run manifest

use crate::descriptor::{AutoscalingDescriptor, ServiceDescriptor};
use crate::errors::{ExportError, ExportResult};
use crate::window::TimeRange;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{json, Value as JsonValue};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILENAME: &str = "metadata.json";

/// Description of everything one export run produced
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    services: Vec<ServiceDescriptor>,
    autoscaling: AutoscalingDescriptor,
}

impl Manifest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, range: TimeRange) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start: range.start,
            end: range.end,
            services: Vec::new(),
            autoscaling: AutoscalingDescriptor,
        }
    }

    pub fn push_service(&mut self, descriptor: ServiceDescriptor) {
        self.services.push(descriptor);
    }

    /// Services in export order
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn to_record(&self) -> JsonValue {
        json!({
            "autoscaling": self.autoscaling.to_record(),
            "description": self.description,
            "end": format_manifest_time(&self.end),
            "name": self.name,
            "services": self.services.iter().map(ServiceDescriptor::to_record).collect::<Vec<_>>(),
            "start": format_manifest_time(&self.start),
        })
    }

    /// Sorted keys, four-space indentation
    pub fn to_json(&self) -> ExportResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        self.to_record().serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Write `<dir>/metadata.json`
    pub async fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        let path = dir.join(MANIFEST_FILENAME);
        let contents = self.to_json()?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| ExportError::io(&path, "write manifest", e))?;
        Ok(path)
    }
}

/// ISO-8601 in UTC with a trailing `Z`
///
/// Precision stops at the microsecond. The fraction is omitted entirely when
/// the microsecond part is zero, so `%f`-style parsers accept every value.
pub fn format_manifest_time(time: &DateTime<Utc>) -> String {
    let format = if time.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    time.to_rfc3339_opts(format, true)
}
