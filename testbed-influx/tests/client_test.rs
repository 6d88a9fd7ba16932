use serde_json::json;
use std::time::Duration;
use testbed_influx::{InfluxClient, InfluxConfig, InfluxError, QueryClient};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> InfluxConfig {
    InfluxConfig {
        base_url: server.uri(),
        database: "metrics".to_string(),
        username: None,
        password: None,
        timeout: Duration::from_secs(5),
        user_agent: "testbed-test".to_string(),
        verify_ssl: true,
    }
}

#[tokio::test]
async fn test_query_returns_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("db", "metrics"))
        .and(query_param("q", "select * from \"autoscaling\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "statement_id": 0,
                "series": [{
                    "name": "autoscaling",
                    "columns": ["time", "scale", "service_name"],
                    "values": [["2024-01-01T00:00:00Z", 3, "web"]]
                }]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = InfluxClient::new(config_for(&mock_server)).unwrap();
    let response = client.query("select * from \"autoscaling\"").await.unwrap();

    let rows: Vec<_> = response.rows().collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["scale"], json!(3));
    assert_eq!(rows[0]["service_name"], json!("web"));
}

#[tokio::test]
async fn test_credentials_are_sent_as_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.username = Some("reader".to_string());
    config.password = Some("secret".to_string());

    let client = InfluxClient::new(config).unwrap();
    let response = client.query("show measurements").await.unwrap();
    assert_eq!(response.series().count(), 0);
}

#[tokio::test]
async fn test_statement_error_becomes_query_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"statement_id": 0, "error": "error parsing query"}]
        })))
        .mount(&mock_server)
        .await;

    let client = InfluxClient::new(config_for(&mock_server)).unwrap();
    let err = client.query("selec nothing").await.unwrap_err();

    match err {
        InfluxError::QueryFailed { message } => assert_eq!(message, "error parsing query"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(401).set_body_string("authorization failed"))
        .mount(&mock_server)
        .await;

    let client = InfluxClient::new(config_for(&mock_server)).unwrap();
    let err = client.query("show databases").await.unwrap_err();

    assert!(matches!(err, InfluxError::Status { status: 401, .. }));
    assert!(err.to_string().contains("authorization failed"));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let client = InfluxClient::new(config_for(&mock_server)).unwrap();
    let err = client.query("show databases").await.unwrap_err();
    assert!(matches!(err, InfluxError::InvalidJson(_)));
}

#[tokio::test]
async fn test_ping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204).insert_header("X-Influxdb-Version", "1.8.10"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = InfluxClient::new(config_for(&mock_server)).unwrap();
    assert!(client.ping().await.is_ok());
}

#[test]
fn test_empty_base_url_is_rejected() {
    let config = InfluxConfig {
        base_url: String::new(),
        ..InfluxConfig::default()
    };
    assert!(matches!(
        InfluxClient::new(config),
        Err(InfluxError::ConfigError(_))
    ));
}

#[test]
fn test_config_from_domain_config() {
    let config = InfluxConfig::default();
    assert_eq!(config.base_url, "http://localhost:8086");
    assert_eq!(config.database, "metrics");
    assert!(config.user_agent.starts_with("testbed/"));
}
