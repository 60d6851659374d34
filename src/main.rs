// Main entry point - Dependency injection and controller startup
mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::application::compositor::FrameCompositor;
use crate::application::dataset_cache::PlantDatasetCache;
use crate::application::display_sink::DisplaySink;
use crate::application::rotation_service::RotationService;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::image_assets::DirBackgroundStore;
use crate::infrastructure::pixoo_device::PixooDevice;
use crate::infrastructure::prometheus_repository::PrometheusRepository;

/// Upper bound for any single backend or device call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration first: the log level is part of it.
    let settings = load_settings()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Plant matrix display starting");
    tracing::info!("Rotation interval: {}s", settings.rotation.interval);
    tracing::info!("Data refresh interval: {}s", settings.prometheus.query_interval);
    if settings.display.datetime.as_ref().is_some_and(|d| d.enabled) {
        tracing::info!("Time and date overlay: enabled");
    }

    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    // Infrastructure adapters
    let repository = Arc::new(PrometheusRepository::new(
        &settings.prometheus.url,
        client.clone(),
        settings.prometheus.offline_after,
    ));
    let device = Arc::new(PixooDevice::new(
        &settings.device.address,
        settings.device.display_size,
        client,
    ));
    let backgrounds = Arc::new(DirBackgroundStore::new(&settings.paths.images_dir));

    // Application services
    let cache = PlantDatasetCache::new(repository);
    let compositor = FrameCompositor::new(
        backgrounds,
        settings.display.clone(),
        settings.device.display_size,
    );
    let sink = DisplaySink::new(device);

    let mut service = RotationService::new(
        cache,
        compositor,
        sink,
        settings.prometheus.metric.clone(),
        Duration::from_secs(settings.rotation.interval),
        Duration::from_secs(settings.prometheus.query_interval),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    service.run(shutdown_rx).await?;

    tracing::info!("Plant matrix display stopped");
    Ok(())
}
