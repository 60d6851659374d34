// Domain layer - Plant telemetry and display models
pub mod frame;
pub mod palette;
pub mod plant;
