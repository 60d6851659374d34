// Repository trait for plant telemetry access
use crate::domain::plant::PlantSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait PlantRepository: Send + Sync {
    /// Fetch the current plant samples for a metric with thresholds and
    /// staleness merged in. Backend response order is preserved.
    async fn fetch_plants(&self, metric: &str) -> anyhow::Result<Vec<PlantSnapshot>>;
}
