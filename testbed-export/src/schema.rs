//! Column discovery from the tag and field key catalogs

use crate::descriptor::ServiceDescriptor;
use crate::errors::{ExportError, ExportResult};
use crate::row::{is_reserved, prefixed_name, CONTAINER_ID_COLUMN, TIME_COLUMN};
use std::collections::BTreeSet;
use testbed_influx::{QueryClient, Series};
use tracing::debug;

/// Measurements searched for a service: its own plus every per-container stream
pub fn measurement_pattern(service: &str) -> String {
    format!("/{}|docker_container.*/", service)
}

/// Build the descriptor for `service` from `SHOW TAG KEYS` and `SHOW FIELD KEYS`
///
/// Keys of the service's own measurement are reported under the prefixed
/// names the scroll gives them. A `container_id` field is reported as a tag.
pub async fn discover_schema(
    client: &dyn QueryClient,
    service: &str,
) -> ExportResult<ServiceDescriptor> {
    let pattern = measurement_pattern(service);
    let mut tags = catalog_keys(client, service, &format!("show tag keys from {}", pattern)).await?;
    let mut fields =
        catalog_keys(client, service, &format!("show field keys from {}", pattern)).await?;

    if fields.remove(CONTAINER_ID_COLUMN) {
        tags.insert(CONTAINER_ID_COLUMN.to_string());
    }

    debug!(
        service,
        tags = tags.len(),
        fields = fields.len(),
        "Discovered schema"
    );
    Ok(ServiceDescriptor::new(service, tags, fields))
}

async fn catalog_keys(
    client: &dyn QueryClient,
    service: &str,
    query: &str,
) -> ExportResult<BTreeSet<String>> {
    let response = client
        .query(query)
        .await
        .map_err(|source| ExportError::Query {
            query: query.to_string(),
            source,
        })?;

    Ok(response
        .series()
        .flat_map(|series| series_keys(series, service))
        .collect())
}

fn series_keys<'s>(series: &'s Series, service: &'s str) -> impl Iterator<Item = String> + 's {
    let own = series.name == service;
    series
        .first_column()
        .filter(|key| *key != TIME_COLUMN)
        .map(move |key| {
            if own && !is_reserved(key) {
                prefixed_name(service, key)
            } else {
                key.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use testbed_influx::testing::{keys_response, MockQueryClient};
    use testbed_influx::InfluxError;

    fn catalog_client() -> MockQueryClient {
        let mut client = MockQueryClient::new();
        client
            .expect_query()
            .withf(|q| q == "show tag keys from /web|docker_container.*/")
            .times(1)
            .returning(|_| {
                Ok(keys_response(
                    "tagKey",
                    &[
                        ("docker_container_cpu", &["host", "container_image", "cpu"]),
                        ("web", &["host", "method"]),
                    ],
                ))
            });
        client
            .expect_query()
            .withf(|q| q == "show field keys from /web|docker_container.*/")
            .times(1)
            .returning(|_| {
                Ok(keys_response(
                    "fieldKey",
                    &[
                        ("docker_container_cpu", &["container_id", "usage_percent"]),
                        ("docker_container_mem", &["usage", "time"]),
                        ("web", &["latency"]),
                    ],
                ))
            });
        client
    }

    #[tokio::test]
    async fn test_discover_schema() {
        let client = catalog_client();
        let descriptor = discover_schema(&client, "web").await.unwrap();

        assert_eq!(
            descriptor.tags().collect::<Vec<_>>(),
            vec!["container_id", "container_image", "cpu", "host", "web-method"]
        );
        assert_eq!(
            descriptor.fields().collect::<Vec<_>>(),
            vec!["usage", "usage_percent", "web-latency"]
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_is_reported() {
        let mut client = MockQueryClient::new();
        client.expect_query().returning(|_| {
            Err(InfluxError::Status {
                status: 500,
                body: "boom".to_string(),
            })
        });

        let err = discover_schema(&client, "web").await.unwrap_err();
        assert!(matches!(err, ExportError::Query { ref query, .. } if query.starts_with("show tag keys")));
    }
}
