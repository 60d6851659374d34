// Infrastructure layer - External dependencies and adapters
pub mod canvas;
pub mod config;
pub mod image_assets;
pub mod pixoo_device;
pub mod prometheus_repository;

