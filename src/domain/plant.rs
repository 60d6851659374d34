// Plant telemetry domain models
use chrono::{DateTime, Utc};

pub const DEFAULT_THRESHOLD_MIN: i32 = 30;
pub const DEFAULT_THRESHOLD_MAX: i32 = 80;

/// One device's metric reading plus resolved thresholds and online status
/// at fetch time.
#[derive(Debug, Clone)]
pub struct PlantSnapshot {
    pub device_id: String,
    pub device_name: String,
    pub humidity: u8,
    pub threshold_min: i32,
    pub threshold_max: i32,
    pub is_online: bool,
    pub seconds_since_update: i64,
}

impl PlantSnapshot {
    /// Merge one humidity sample with the independently looked-up threshold
    /// and staleness values. Each threshold defaults on its own; a missing
    /// field never blocks construction.
    pub fn from_sample(
        device_id: String,
        device_name: String,
        humidity: Option<i32>,
        threshold_min: Option<i32>,
        threshold_max: Option<i32>,
        seconds_since_update: Option<i64>,
        offline_after: i64,
    ) -> Self {
        let seconds = seconds_since_update.unwrap_or(0);
        Self {
            device_id,
            device_name,
            humidity: humidity.unwrap_or(0).clamp(0, 100) as u8,
            threshold_min: threshold_min.unwrap_or(DEFAULT_THRESHOLD_MIN),
            threshold_max: threshold_max.unwrap_or(DEFAULT_THRESHOLD_MAX),
            is_online: seconds <= offline_after,
            seconds_since_update: seconds,
        }
    }
}

/// Ordered plant snapshots from one refresh, replaced wholesale on the next
/// successful fetch.
#[derive(Debug, Clone)]
pub struct PlantDataset {
    pub plants: Vec<PlantSnapshot>,
    pub fetched_at: DateTime<Utc>,
}

impl PlantDataset {
    pub fn new(plants: Vec<PlantSnapshot>, fetched_at: DateTime<Utc>) -> Self {
        Self { plants, fetched_at }
    }

    pub fn empty() -> Self {
        Self {
            plants: Vec::new(),
            fetched_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}
