// Holds the last successfully fetched plant dataset
use std::sync::Arc;

use chrono::Utc;

use crate::application::plant_repository::PlantRepository;
use crate::domain::plant::PlantDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Dataset replaced wholesale and the refresh timestamp advanced.
    Replaced,
    /// Fetch failed or returned no plants; the held dataset is untouched.
    Failed,
}

pub struct PlantDatasetCache {
    repository: Arc<dyn PlantRepository>,
    dataset: PlantDataset,
}

impl PlantDatasetCache {
    pub fn new(repository: Arc<dyn PlantRepository>) -> Self {
        Self {
            repository,
            dataset: PlantDataset::empty(),
        }
    }

    /// One fetch attempt. Only a non-empty result replaces the held
    /// dataset; callers must not reset rotation state on `Failed`.
    pub async fn refresh(&mut self, metric: &str) -> RefreshOutcome {
        match self.repository.fetch_plants(metric).await {
            Ok(plants) if plants.is_empty() => {
                tracing::warn!("Backend returned no plants for metric {}", metric);
                RefreshOutcome::Failed
            }
            Ok(plants) => {
                tracing::info!("Fetched data for {} plants", plants.len());
                self.dataset = PlantDataset::new(plants, Utc::now());
                RefreshOutcome::Replaced
            }
            Err(e) => {
                tracing::warn!("Plant fetch failed: {:#}", e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Last successfully fetched dataset; empty only before the very first
    /// successful fetch.
    pub fn current(&self) -> &PlantDataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plant::PlantSnapshot;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    struct ScriptedRepository {
        responses: Mutex<VecDeque<anyhow::Result<Vec<PlantSnapshot>>>>,
    }

    impl ScriptedRepository {
        fn new(responses: Vec<anyhow::Result<Vec<PlantSnapshot>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl PlantRepository for ScriptedRepository {
        async fn fetch_plants(&self, _metric: &str) -> anyhow::Result<Vec<PlantSnapshot>> {
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")))
        }
    }

    fn plant(name: &str) -> PlantSnapshot {
        PlantSnapshot::from_sample(
            format!("id-{}", name),
            name.to_string(),
            Some(50),
            None,
            None,
            Some(0),
            300,
        )
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_dataset() {
        let repository = ScriptedRepository::new(vec![Ok(vec![plant("a"), plant("b")])]);
        let mut cache = PlantDatasetCache::new(repository);

        assert!(cache.current().is_empty());
        assert_eq!(cache.refresh("m").await, RefreshOutcome::Replaced);
        assert_eq!(cache.current().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_previous_dataset() {
        let repository =
            ScriptedRepository::new(vec![Ok(vec![plant("a")]), Ok(Vec::new())]);
        let mut cache = PlantDatasetCache::new(repository);

        assert_eq!(cache.refresh("m").await, RefreshOutcome::Replaced);
        let fetched_at = cache.current().fetched_at;

        assert_eq!(cache.refresh("m").await, RefreshOutcome::Failed);
        assert_eq!(cache.current().len(), 1);
        assert_eq!(cache.current().plants[0].device_name, "a");
        assert_eq!(cache.current().fetched_at, fetched_at);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_dataset() {
        let repository = ScriptedRepository::new(vec![
            Ok(vec![plant("a")]),
            Err(anyhow::anyhow!("connection refused")),
        ]);
        let mut cache = PlantDatasetCache::new(repository);

        assert_eq!(cache.refresh("m").await, RefreshOutcome::Replaced);
        assert_eq!(cache.refresh("m").await, RefreshOutcome::Failed);
        assert_eq!(cache.current().len(), 1);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_stays_empty() {
        let repository = ScriptedRepository::new(vec![Err(anyhow::anyhow!("down"))]);
        let mut cache = PlantDatasetCache::new(repository);

        assert_eq!(cache.refresh("m").await, RefreshOutcome::Failed);
        assert!(cache.current().is_empty());
    }
}
