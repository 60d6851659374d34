// Application layer - Use cases and ports
pub mod compositor;
pub mod dataset_cache;
pub mod display_sink;
pub mod plant_repository;
pub mod rotation_service;
