//! Descriptors of the files produced by an export run

use crate::row::TIME_COLUMN;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;

/// One service's export file and its columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    filename: String,
    tags: BTreeSet<String>,
    fields: BTreeSet<String>,
}

impl ServiceDescriptor {
    pub const EXTENSION: &'static str = ".tsv.gz";

    pub fn new<T, F>(name: impl Into<String>, tags: T, fields: F) -> Self
    where
        T: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
    {
        let name = name.into();
        Self {
            filename: format!("{}{}", name, Self::EXTENSION),
            name,
            tags: tags.into_iter().collect(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Tag columns, sorted
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.iter().map(String::as_str)
    }

    /// Field columns, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(String::as_str)
    }

    /// TSV header: fields, then tags, then `time`, each column once
    pub fn columns(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.fields()
            .chain(self.tags())
            .chain(std::iter::once(TIME_COLUMN))
            .filter(|column| seen.insert(*column))
            .map(str::to_string)
            .collect()
    }

    pub fn to_record(&self) -> JsonValue {
        json!({
            "fields": self.fields().collect::<Vec<_>>(),
            "filename": self.filename,
            "name": self.name,
            "tags": self.tags().collect::<Vec<_>>(),
        })
    }
}

/// The fixed autoscaling stream export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoscalingDescriptor;

impl AutoscalingDescriptor {
    pub const NAME: &'static str = "autoscaling";
    pub const FILENAME: &'static str = "autoscaling.gz";
    pub const MEASUREMENT: &'static str = "autoscaling";
    pub const FIELDS: [&'static str; 1] = ["scale"];
    pub const TAGS: [&'static str; 2] = ["service_name", "service_id"];
    pub const COLUMNS: [&'static str; 4] = ["time", "service_name", "service_id", "scale"];

    pub fn to_record(&self) -> JsonValue {
        json!({
            "fields": Self::FIELDS,
            "filename": Self::FILENAME,
            "name": Self::NAME,
            "tags": Self::TAGS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_descriptor_sorts_columns() {
        let descriptor = ServiceDescriptor::new(
            "web",
            strings(&["host", "container_id", "container_image"]),
            strings(&["web-latency", "usage_percent", "rx_bytes"]),
        );

        assert_eq!(descriptor.filename(), "web.tsv.gz");
        assert_eq!(
            descriptor.tags().collect::<Vec<_>>(),
            vec!["container_id", "container_image", "host"]
        );
        assert_eq!(
            descriptor.fields().collect::<Vec<_>>(),
            vec!["rx_bytes", "usage_percent", "web-latency"]
        );
    }

    #[test]
    fn test_columns_are_deduplicated() {
        let descriptor = ServiceDescriptor::new(
            "redis",
            strings(&["host", "shared"]),
            strings(&["shared", "used_memory"]),
        );
        assert_eq!(
            descriptor.columns(),
            strings(&["shared", "used_memory", "host", "time"])
        );
    }

    #[test]
    fn test_to_record() {
        let descriptor = ServiceDescriptor::new("chat", strings(&["host"]), strings(&["rx"]));
        assert_eq!(
            descriptor.to_record(),
            json!({"name": "chat", "filename": "chat.tsv.gz", "tags": ["host"], "fields": ["rx"]})
        );
        assert_eq!(
            AutoscalingDescriptor.to_record(),
            json!({
                "name": "autoscaling",
                "filename": "autoscaling.gz",
                "fields": ["scale"],
                "tags": ["service_name", "service_id"]
            })
        );
    }
}
