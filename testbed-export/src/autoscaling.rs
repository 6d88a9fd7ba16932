//! Export of the `autoscaling` measurement

use crate::descriptor::AutoscalingDescriptor;
use crate::errors::ExportResult;
use crate::scroll::{QueryTemplate, Scroll};
use crate::tsv::TsvWriter;
use crate::window::TimeRange;
use std::path::Path;
use std::time::Duration;
use testbed_influx::QueryClient;
use tracing::info;

pub fn autoscaling_query() -> QueryTemplate {
    QueryTemplate::select_all(AutoscalingDescriptor::MEASUREMENT, &[])
}

/// Scroll the autoscaling stream into `path` under its fixed header,
/// returning the number of rows written
pub async fn dump_autoscaling(
    client: &dyn QueryClient,
    range: TimeRange,
    window: Duration,
    path: &Path,
) -> ExportResult<usize> {
    let mut scroll = Scroll::new(client, autoscaling_query(), range, window)?;
    let mut writer = TsvWriter::create(path, &AutoscalingDescriptor::COLUMNS)?;
    while let Some(scrolled) = scroll.next_row().await? {
        writer.write_row(&scrolled.row)?;
    }
    let rows = writer.finish()?;

    info!(rows, file = %path.display(), "Exported autoscaling events");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::DEFAULT_SCROLL_WINDOW;
    use chrono::{TimeZone, Utc};
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;
    use testbed_influx::testing::{rows_response, MockQueryClient};

    #[tokio::test]
    async fn test_dump_autoscaling() {
        let mut client = MockQueryClient::new();
        client
            .expect_query()
            .withf(|q| q.starts_with("select * from \"autoscaling\" where time >= "))
            .times(2)
            .returning(|_| {
                Ok(rows_response(
                    "autoscaling",
                    &["time", "scale", "service_id", "service_name", "reason"],
                    vec![vec![
                        json!("2024-01-01T00:01:00Z"),
                        json!(3),
                        json!("1s42"),
                        json!("web"),
                        json!("cpu"),
                    ]],
                ))
            });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AutoscalingDescriptor::FILENAME);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = TimeRange::new(start, start + chrono::TimeDelta::minutes(5)).unwrap();

        let rows = dump_autoscaling(&client, range, DEFAULT_SCROLL_WINDOW, &path)
            .await
            .unwrap();
        assert_eq!(rows, 2);

        let mut text = String::new();
        GzDecoder::new(std::fs::File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "time\tservice_name\tservice_id\tscale");
        assert_eq!(lines[1], "2024-01-01T00:01:00Z\tweb\t1s42\t3");
        assert_eq!(lines.len(), 4);
    }
}
