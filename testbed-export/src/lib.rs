//! Metrics export pipeline
//!
//! Pulls container and service metrics for a fixed list of services out of
//! InfluxDB and writes them to a timestamped directory:
//!
//! ```text
//! <output_root>/<YYYYMMDDHHMMSS>-<measurement_name>/
//!     <service>.tsv.gz    one per service
//!     autoscaling.gz
//!     metadata.json
//! ```
//!
//! Each range is queried in fixed-size windows ([`Scroll`]); the per-service
//! resource streams and the service's own measurement are merged in time
//! order ([`MergedScroll`]) and written under the column set found by
//! [`discover_schema`].

pub mod autoscaling;
pub mod descriptor;
pub mod dumper;
pub mod errors;
pub mod exporter;
pub mod manifest;
pub mod merge;
pub mod row;
pub mod schema;
pub mod scroll;
pub mod tsv;
pub mod window;

pub use autoscaling::dump_autoscaling;
pub use descriptor::{AutoscalingDescriptor, ServiceDescriptor};
pub use dumper::{ImagePatterns, ServiceDump, ServiceDumper, SYSTEM_METRICS};
pub use errors::{ExportError, ExportResult};
pub use exporter::{ExportReport, ExportSettings, Exporter};
pub use manifest::Manifest;
pub use merge::MergedScroll;
pub use row::ScrolledRow;
pub use schema::discover_schema;
pub use scroll::{QueryTemplate, Scroll};
pub use tsv::TsvWriter;
pub use window::{QueryWindows, TimeRange, DEFAULT_SCROLL_WINDOW};
