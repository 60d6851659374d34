// Rotation controller - schedules refreshes, frame selection and pushes
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::watch;

use crate::application::compositor::FrameCompositor;
use crate::application::dataset_cache::{PlantDatasetCache, RefreshOutcome};
use crate::application::display_sink::DisplaySink;

/// Retry cadence while no usable dataset has ever been fetched.
const FIRST_DATA_BACKOFF: Duration = Duration::from_secs(10);

/// Controller phases. Fields are only meaningful in the phase carrying them.
#[derive(Debug, Clone, Copy)]
enum RotationPhase {
    AwaitingFirstData,
    Rotating {
        current_index: usize,
        last_refresh: Instant,
    },
    RefreshBackoff,
}

pub struct RotationService {
    cache: PlantDatasetCache,
    compositor: FrameCompositor,
    sink: DisplaySink,
    metric: String,
    rotation_interval: Duration,
    refresh_interval: Duration,
}

impl RotationService {
    pub fn new(
        cache: PlantDatasetCache,
        compositor: FrameCompositor,
        sink: DisplaySink,
        metric: String,
        rotation_interval: Duration,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            cache,
            compositor,
            sink,
            metric,
            rotation_interval,
            refresh_interval,
        }
    }

    /// Run until the shutdown channel flips, then best-effort clear the
    /// panel. Loop errors also clear before propagating.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let result = self.run_loop(&mut shutdown).await;
        if let Err(e) = self.sink.clear().await {
            tracing::error!("Failed to clear display on shutdown: {:#}", e);
        }
        result
    }

    async fn run_loop(&mut self, shutdown: &mut watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut phase = RotationPhase::AwaitingFirstData;
        loop {
            if *shutdown.borrow() {
                tracing::info!("Shutdown requested, stopping rotation");
                return Ok(());
            }

            let (next, sleep) = self.tick(phase).await;
            phase = next;

            if sleep > Duration::ZERO {
                tokio::select! {
                    _ = tokio::time::sleep(sleep) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }
    }

    /// One controller step: possibly refresh, possibly render one frame,
    /// and report how long to sleep before the next step.
    async fn tick(&mut self, phase: RotationPhase) -> (RotationPhase, Duration) {
        match phase {
            RotationPhase::AwaitingFirstData | RotationPhase::RefreshBackoff => {
                match self.cache.refresh(&self.metric).await {
                    RefreshOutcome::Replaced => (
                        RotationPhase::Rotating {
                            current_index: 0,
                            last_refresh: Instant::now(),
                        },
                        Duration::ZERO,
                    ),
                    RefreshOutcome::Failed => {
                        tracing::warn!(
                            "No plant data available, retrying in {}s",
                            FIRST_DATA_BACKOFF.as_secs()
                        );
                        (RotationPhase::RefreshBackoff, FIRST_DATA_BACKOFF)
                    }
                }
            }
            RotationPhase::Rotating {
                mut current_index,
                mut last_refresh,
            } => {
                if last_refresh.elapsed() >= self.refresh_interval {
                    match self.cache.refresh(&self.metric).await {
                        RefreshOutcome::Replaced => {
                            current_index = 0;
                            last_refresh = Instant::now();
                        }
                        RefreshOutcome::Failed => {
                            // Keep rotating the stale dataset; the refresh
                            // stays due and is retried on the next tick.
                            tracing::warn!(
                                "Refresh failed, keeping dataset fetched at {}",
                                self.cache.current().fetched_at
                            );
                        }
                    }
                }

                let dataset = self.cache.current();
                let Some(snapshot) = dataset.plants.get(current_index) else {
                    // Only reachable if the dataset vanished under us.
                    return (RotationPhase::AwaitingFirstData, Duration::ZERO);
                };

                let status = if snapshot.is_online {
                    "online".to_string()
                } else {
                    format!("offline {}s", snapshot.seconds_since_update)
                };
                tracing::info!(
                    "Displaying [{}/{}]: {} - {}% [min: {}, max: {}] [{}]",
                    current_index + 1,
                    dataset.len(),
                    snapshot.device_name,
                    snapshot.humidity,
                    snapshot.threshold_min,
                    snapshot.threshold_max,
                    status
                );

                let frame = self.compositor.compose(snapshot, Local::now());
                if let Err(e) = self.sink.push(&frame).await {
                    tracing::error!(
                        "Failed to display {}: {:#}",
                        frame.snapshot.device_name,
                        e
                    );
                }

                (
                    RotationPhase::Rotating {
                        current_index: (current_index + 1) % dataset.len(),
                        last_refresh,
                    },
                    self.rotation_interval,
                )
            }
        }
    }
}
