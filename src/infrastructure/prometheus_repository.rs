// Prometheus repository implementation
use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::application::plant_repository::PlantRepository;
use crate::domain::plant::PlantSnapshot;

#[derive(Debug, Clone)]
pub struct PrometheusRepository {
    base_url: String,
    client: reqwest::Client,
    offline_after: i64,
}

#[derive(Debug, Deserialize)]
struct PromResponse {
    status: String,
    #[serde(default)]
    data: PromData,
}

#[derive(Debug, Default, Deserialize)]
struct PromData {
    #[serde(default)]
    result: Vec<PromSample>,
}

#[derive(Debug, Deserialize)]
struct PromSample {
    #[serde(default)]
    metric: HashMap<String, String>,
    /// Instant vector value: [unix seconds, value string].
    value: (f64, String),
}

impl PromSample {
    fn label(&self, name: &str) -> Option<&str> {
        self.metric.get(name).map(String::as_str)
    }

    fn parse_value(&self) -> Option<f64> {
        self.value.1.parse().ok()
    }
}

impl PrometheusRepository {
    pub fn new(base_url: &str, client: reqwest::Client, offline_after: i64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            offline_after,
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        format!(
            "{}/api/v1/query?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    async fn execute_query(&self, query: &str) -> Result<Vec<PromSample>> {
        let url = self.build_query_url(query);
        tracing::debug!("Querying Prometheus: {}", query);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to Prometheus")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Prometheus query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<PromResponse>()
            .await
            .context("Failed to parse Prometheus response")?;

        if data.status != "success" {
            anyhow::bail!("Prometheus returned status {:?}", data.status);
        }

        Ok(data.data.result)
    }

    /// Auxiliary per-device lookup. Failures degrade to an empty map so a
    /// missing side channel never blocks snapshot construction.
    async fn query_device_values(&self, query: &str) -> HashMap<String, f64> {
        match self.execute_query(query).await {
            Ok(samples) => samples
                .into_iter()
                .filter_map(|sample| {
                    let device_id = sample.label("device_id")?.to_string();
                    let value = sample.parse_value()?;
                    Some((device_id, value))
                })
                .collect(),
            Err(e) => {
                tracing::warn!("Auxiliary query {:?} failed: {:#}", query, e);
                HashMap::new()
            }
        }
    }
}

#[async_trait]
impl PlantRepository for PrometheusRepository {
    async fn fetch_plants(&self, metric: &str) -> Result<Vec<PlantSnapshot>> {
        let samples = self.execute_query(metric).await?;

        // Thresholds and staleness are independent instant queries keyed by
        // device id; each device may have any subset of them.
        let min_by_device = self
            .query_device_values(&format!("{}_threshold_min", metric))
            .await;
        let max_by_device = self
            .query_device_values(&format!("{}_threshold_max", metric))
            .await;
        let staleness = self
            .query_device_values(&format!("time() - timestamp({})", metric))
            .await;

        let plants: Vec<PlantSnapshot> = samples
            .iter()
            .map(|sample| {
                let device_id = sample.label("device_id").unwrap_or("unknown").to_string();
                let device_name = sample.label("device_name").unwrap_or("Unknown").to_string();
                let threshold_min = min_by_device.get(&device_id).map(|v| *v as i32);
                let threshold_max = max_by_device.get(&device_id).map(|v| *v as i32);
                let seconds = staleness.get(&device_id).map(|v| v.round() as i64);

                PlantSnapshot::from_sample(
                    device_id,
                    device_name,
                    sample.parse_value().map(|v| v as i32),
                    threshold_min,
                    threshold_max,
                    seconds,
                    self.offline_after,
                )
            })
            .collect();

        tracing::debug!("Parsed {} plant samples from Prometheus", plants.len());
        Ok(plants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "status": "success",
        "data": {
            "resultType": "vector",
            "result": [
                {
                    "metric": {
                        "__name__": "plant_soil_humidity",
                        "device_id": "bf309cd05e5f50b8e1ef1e",
                        "device_name": "Alla",
                        "instance": "exporter:9100",
                        "job": "plants"
                    },
                    "value": [1714000000.123, "54"]
                },
                {
                    "metric": {
                        "device_id": "bf42",
                        "device_name": "Fern"
                    },
                    "value": [1714000000.123, "not-a-number"]
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_instant_vector() {
        let parsed: PromResponse = serde_json::from_str(RESPONSE).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.data.result.len(), 2);

        let first = &parsed.data.result[0];
        assert_eq!(first.label("device_id"), Some("bf309cd05e5f50b8e1ef1e"));
        assert_eq!(first.label("device_name"), Some("Alla"));
        assert_eq!(first.parse_value(), Some(54.0));
    }

    #[test]
    fn test_unparseable_value_is_none() {
        let parsed: PromResponse = serde_json::from_str(RESPONSE).unwrap();
        assert_eq!(parsed.data.result[1].parse_value(), None);
    }

    #[test]
    fn test_error_body_parses_without_result() {
        let parsed: PromResponse =
            serde_json::from_str(r#"{"status": "error", "errorType": "bad_data"}"#).unwrap();
        assert_eq!(parsed.status, "error");
        assert!(parsed.data.result.is_empty());
    }

    #[test]
    fn test_query_url_is_encoded() {
        let repository = PrometheusRepository::new(
            "http://localhost:9090/",
            reqwest::Client::new(),
            300,
        );
        let url = repository.build_query_url("time() - timestamp(plant_soil_humidity)");
        assert_eq!(
            url,
            "http://localhost:9090/api/v1/query?query=time%28%29%20-%20timestamp%28plant_soil_humidity%29"
        );
    }
}
