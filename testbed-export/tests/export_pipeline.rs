use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use flate2::read::GzDecoder;
use serde_json::{json, Value as JsonValue};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use testbed_export::{ExportError, ExportSettings, Exporter, TimeRange};
use testbed_influx::testing::{keys_response, rows_response, MockQueryClient};
use testbed_influx::{InfluxError, QueryResponse};

const FIRST_WINDOW: &str = "time >= '2024-01-01T00:00:00.000000000Z'";

fn started() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 1, 2, 3).unwrap()
}

fn range(minutes: i64) -> TimeRange {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    TimeRange::new(start, start + TimeDelta::minutes(minutes)).unwrap()
}

fn settings(root: &Path, services: &[&str]) -> ExportSettings {
    ExportSettings {
        output_root: root.to_path_buf(),
        measurement_name: "baseline".to_string(),
        description: "two services".to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
        ..ExportSettings::default()
    }
}

fn respond(query: &str) -> Result<QueryResponse, InfluxError> {
    let first = query.contains(FIRST_WINDOW);
    let response = if query == "show tag keys from /web|docker_container.*/" {
        keys_response(
            "tagKey",
            &[
                ("docker_container_cpu", &["host", "container_image"]),
                ("web", &["method"]),
            ],
        )
    } else if query == "show field keys from /web|docker_container.*/" {
        keys_response(
            "fieldKey",
            &[
                ("docker_container_cpu", &["container_id", "usage_percent"]),
                ("web", &["latency"]),
            ],
        )
    } else if query.starts_with("show tag keys from /haproxy|") {
        keys_response("tagKey", &[("docker_container_net", &["host"])])
    } else if query.starts_with("show field keys from /haproxy|") {
        keys_response("fieldKey", &[("docker_container_net", &["rx_bytes"])])
    } else if first
        && query.starts_with("select * from \"docker_container_cpu\"")
        && query.contains("container_image =~ /.*web:latest$/")
    {
        rows_response(
            "docker_container_cpu",
            &["time", "container_id", "container_image", "host", "usage_percent"],
            vec![
                vec![
                    json!("2024-01-01T00:02:00Z"),
                    json!("0123456789abcdef0123"),
                    json!("sharelatex/web:latest"),
                    json!("node-1"),
                    json!(13.5),
                ],
                vec![
                    json!("2024-01-01T00:00:30Z"),
                    json!("0123456789abcdef0123"),
                    json!("sharelatex/web:latest"),
                    json!("node-1"),
                    json!(12.5),
                ],
            ],
        )
    } else if first && query.starts_with("select * from \"web\"") {
        rows_response(
            "web",
            &["time", "host", "latency", "method"],
            vec![vec![
                json!("2024-01-01T00:01:00.5Z"),
                json!("node-1"),
                json!(8),
                json!("GET"),
            ]],
        )
    } else if first && query.starts_with("select * from \"autoscaling\"") {
        rows_response(
            "autoscaling",
            &["time", "scale", "service_id", "service_name"],
            vec![vec![
                json!("2024-01-01T00:03:00Z"),
                json!(2),
                json!("1s7"),
                json!("web"),
            ]],
        )
    } else {
        QueryResponse::default()
    };
    Ok(response)
}

fn recording_client() -> (MockQueryClient, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let mut client = MockQueryClient::new();
    client.expect_query().returning(move |q| {
        recorder.lock().unwrap().push(q.to_string());
        respond(q)
    });
    (client, seen)
}

fn read_lines(path: &Path) -> Vec<String> {
    let mut text = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text.split_terminator("\r\n").map(str::to_string).collect()
}

#[tokio::test]
async fn test_full_export_run() {
    let root = tempfile::tempdir().unwrap();
    let (client, seen) = recording_client();
    let exporter = Exporter::new(client, settings(root.path(), &["web", "haproxy"]));

    let report = exporter.export_at(started(), range(61)).await.unwrap();

    let dir = root.path().join("20240101010203-baseline");
    assert_eq!(report.output_dir, dir);
    assert!(dir.join("web.tsv.gz").is_file());
    assert!(dir.join("haproxy.tsv.gz").is_file());
    assert!(dir.join("autoscaling.gz").is_file());
    assert_eq!(report.manifest_path, dir.join("metadata.json"));

    // 2 catalog queries + 5 scrolls of 16 windows per service, 16 for autoscaling
    assert_eq!(seen.lock().unwrap().len(), 2 * (2 + 5 * 16) + 16);
    assert_eq!(report.services[0].queries_issued, 82);
    assert_eq!(report.services[0].rows_written, 3);
    assert_eq!(report.services[1].rows_written, 0);
    assert_eq!(report.autoscaling_rows, 1);
    assert_eq!(report.total_rows(), 4);

    let web = read_lines(&dir.join("web.tsv.gz"));
    assert_eq!(
        web,
        vec![
            "usage_percent\tweb-latency\tcontainer_id\tcontainer_image\thost\tweb-method\ttime",
            "12.5\t\t0123456789a\tsharelatex/web:latest\tnode-1\t\t2024-01-01T00:00:30Z",
            "\t8\t\t\tnode-1\tGET\t2024-01-01T00:01:00.5Z",
            "13.5\t\t0123456789a\tsharelatex/web:latest\tnode-1\t\t2024-01-01T00:02:00Z",
        ]
    );

    let haproxy = read_lines(&dir.join("haproxy.tsv.gz"));
    assert_eq!(haproxy, vec!["rx_bytes\thost\ttime"]);

    let autoscaling = read_lines(&dir.join("autoscaling.gz"));
    assert_eq!(
        autoscaling,
        vec![
            "time\tservice_name\tservice_id\tscale",
            "2024-01-01T00:03:00Z\tweb\t1s7\t2",
        ]
    );
}

#[tokio::test]
async fn test_manifest_contents() {
    let root = tempfile::tempdir().unwrap();
    let (client, _) = recording_client();
    let exporter = Exporter::new(client, settings(root.path(), &["web", "haproxy"]));

    let report = exporter.export_at(started(), range(4)).await.unwrap();
    let manifest: JsonValue =
        serde_json::from_slice(&std::fs::read(&report.manifest_path).unwrap()).unwrap();

    assert_eq!(manifest["name"], "baseline");
    assert_eq!(manifest["description"], "two services");
    assert_eq!(manifest["start"], "2024-01-01T00:00:00Z");
    assert_eq!(manifest["end"], "2024-01-01T00:04:00Z");

    let services = manifest["services"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0]["name"], "web");
    assert_eq!(services[1]["name"], "haproxy");
    assert_eq!(services[0]["filename"], "web.tsv.gz");
    assert_eq!(
        services[0]["tags"],
        json!(["container_id", "container_image", "host", "web-method"])
    );
    assert_eq!(services[0]["fields"], json!(["usage_percent", "web-latency"]));

    assert_eq!(
        manifest["autoscaling"],
        json!({
            "name": "autoscaling",
            "filename": "autoscaling.gz",
            "fields": ["scale"],
            "tags": ["service_name", "service_id"]
        })
    );

    let raw = std::fs::read_to_string(&report.manifest_path).unwrap();
    assert!(raw.starts_with("{\n    \"autoscaling\": {\n        \"fields\": ["));
}

#[tokio::test]
async fn test_failed_service_aborts_run() {
    let root = tempfile::tempdir().unwrap();
    let mut client = MockQueryClient::new();
    client.expect_query().returning(|q| {
        if q.contains("haproxy") {
            Err(InfluxError::QueryFailed {
                message: "shard unavailable".to_string(),
            })
        } else {
            respond(q)
        }
    });
    let exporter = Exporter::new(client, settings(root.path(), &["web", "haproxy", "redis"]));

    let err = exporter.export_at(started(), range(4)).await.unwrap_err();
    match err {
        ExportError::Service { service, source } => {
            assert_eq!(service, "haproxy");
            assert!(matches!(*source, ExportError::Query { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    let dir = root.path().join("20240101010203-baseline");
    assert!(dir.join("web.tsv.gz").is_file());
    assert!(!dir.join("redis.tsv.gz").exists());
    assert!(!dir.join("metadata.json").exists());
}
