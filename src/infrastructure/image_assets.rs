// Background image lookup for plant frames
use std::path::PathBuf;

use image::{RgbImage, imageops::FilterType};

use crate::application::compositor::BackgroundStore;

/// Extensions tried in order when resolving a plant background.
const EXTENSION_CANDIDATES: [&str; 6] = ["png", "jpg", "jpeg", "PNG", "JPG", "JPEG"];

pub struct DirBackgroundStore {
    images_dir: PathBuf,
}

impl DirBackgroundStore {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }
}

impl BackgroundStore for DirBackgroundStore {
    fn load(&self, plant_name: &str, size: u32) -> Option<RgbImage> {
        for ext in EXTENSION_CANDIDATES {
            let path = self.images_dir.join(format!("{}.{}", plant_name, ext));
            if !path.exists() {
                continue;
            }
            match image::open(&path) {
                Ok(img) => {
                    let img = if img.width() != size || img.height() != size {
                        tracing::warn!(
                            "Background {} is {}x{}, resizing to {}x{}",
                            path.display(),
                            img.width(),
                            img.height(),
                            size,
                            size
                        );
                        img.resize_exact(size, size, FilterType::Lanczos3)
                    } else {
                        img
                    };
                    return Some(img.to_rgb8());
                }
                Err(e) => {
                    tracing::error!("Failed to load background {}: {}", path.display(), e);
                }
            }
        }

        tracing::debug!(
            "No background image for '{}' in {}",
            plant_name,
            self.images_dir.display()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("plant-matrix-{}-{}", tag, nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_image_is_none() {
        let store = DirBackgroundStore::new(scratch_dir("missing"));
        assert!(store.load("Alla", 64).is_none());
    }

    #[test]
    fn test_loads_matching_size_unchanged() {
        let dir = scratch_dir("exact");
        let source = RgbImage::from_pixel(64, 64, image::Rgb([9, 8, 7]));
        source.save(dir.join("Alla.png")).unwrap();

        let store = DirBackgroundStore::new(&dir);
        let loaded = store.load("Alla", 64).unwrap();
        assert_eq!(loaded.dimensions(), (64, 64));
        assert_eq!(loaded.get_pixel(0, 0).0, [9, 8, 7]);
    }

    #[test]
    fn test_wrong_size_is_resized() {
        let dir = scratch_dir("resize");
        let source = RgbImage::from_pixel(16, 16, image::Rgb([50, 60, 70]));
        source.save(dir.join("Fern.png")).unwrap();

        let store = DirBackgroundStore::new(&dir);
        let loaded = store.load("Fern", 64).unwrap();
        assert_eq!(loaded.dimensions(), (64, 64));
    }

    #[test]
    fn test_extension_chain_finds_jpeg() {
        let dir = scratch_dir("jpeg");
        let source = RgbImage::from_pixel(64, 64, image::Rgb([1, 2, 3]));
        source.save(dir.join("Ivy.jpg")).unwrap();

        let store = DirBackgroundStore::new(&dir);
        assert!(store.load("Ivy", 64).is_some());
    }
}
