// Composed display frame
use image::RgbImage;

use super::plant::PlantSnapshot;

/// One fully rendered frame plus the snapshot it was derived from.
/// Rebuilt on every rotation tick, never cached across ticks.
pub struct Frame {
    pub image: RgbImage,
    pub snapshot: PlantSnapshot,
}
