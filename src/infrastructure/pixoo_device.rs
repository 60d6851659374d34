// Divoom Pixoo HTTP device adapter
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbImage;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::display_sink::MatrixDevice;

/// The device's picture counter is reset once it passes this bound.
const PIC_ID_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device transport error")]
    Transport(#[from] reqwest::Error),
    #[error("device returned HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("device rejected command with error code {0}")]
    Rejected(i64),
    #[error("no frame uploaded before commit")]
    NothingUploaded,
}

#[derive(Debug, Deserialize)]
struct DeviceReply {
    #[serde(default)]
    error_code: i64,
}

struct PushState {
    pending: Option<String>,
    pic_id: u32,
}

pub struct PixooDevice {
    endpoint: String,
    size: u32,
    client: reqwest::Client,
    state: Mutex<PushState>,
}

impl PixooDevice {
    pub fn new(address: &str, size: u32, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("http://{}/post", address),
            size,
            client,
            state: Mutex::new(PushState {
                pending: None,
                pic_id: 0,
            }),
        }
    }

    async fn send_command(&self, body: serde_json::Value) -> Result<(), DeviceError> {
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(DeviceError::Status(response.status()));
        }
        let reply = response.json::<DeviceReply>().await?;
        if reply.error_code != 0 {
            return Err(DeviceError::Rejected(reply.error_code));
        }
        Ok(())
    }

    async fn send_frame(&self, payload: String) -> Result<(), DeviceError> {
        let mut state = self.state.lock().await;
        if state.pic_id >= PIC_ID_LIMIT {
            self.send_command(serde_json::json!({ "Command": "Draw/ResetHttpGifId" }))
                .await?;
            state.pic_id = 0;
        }
        state.pic_id += 1;

        self.send_command(serde_json::json!({
            "Command": "Draw/SendHttpGif",
            "PicNum": 1,
            "PicWidth": self.size,
            "PicOffset": 0,
            "PicID": state.pic_id,
            "PicSpeed": 1000,
            "PicData": payload,
        }))
        .await
    }

    fn encode_frame(image: &RgbImage) -> String {
        BASE64.encode(image.as_raw())
    }
}

#[async_trait]
impl MatrixDevice for PixooDevice {
    async fn upload(&self, image: &RgbImage) -> anyhow::Result<()> {
        let payload = Self::encode_frame(image);
        self.state.lock().await.pending = Some(payload);
        Ok(())
    }

    async fn commit(&self) -> anyhow::Result<()> {
        let payload = {
            let mut state = self.state.lock().await;
            state.pending.take().ok_or(DeviceError::NothingUploaded)?
        };
        self.send_frame(payload).await?;
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let black = RgbImage::new(self.size, self.size);
        self.upload(&black).await?;
        self.commit().await
    }
}
