// Display sink - pushes composed frames to the matrix device
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use image::RgbImage;

use crate::domain::frame::Frame;

/// Pixel matrix device interface. `upload` transfers a frame into the
/// device buffer, `commit` flips it onto the panel.
#[async_trait]
pub trait MatrixDevice: Send + Sync {
    async fn upload(&self, image: &RgbImage) -> anyhow::Result<()>;
    async fn commit(&self) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

pub struct DisplaySink {
    device: Arc<dyn MatrixDevice>,
}

impl DisplaySink {
    pub fn new(device: Arc<dyn MatrixDevice>) -> Self {
        Self { device }
    }

    /// Upload-then-commit as one logical push. No retry here; the next
    /// rotation tick owns recovery.
    pub async fn push(&self, frame: &Frame) -> anyhow::Result<()> {
        self.device
            .upload(&frame.image)
            .await
            .context("Failed to upload frame")?;
        self.device.commit().await.context("Failed to commit frame")
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.device.clear().await.context("Failed to clear display")
    }
}
