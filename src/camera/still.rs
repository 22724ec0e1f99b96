// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Still-image camera backend
//!
//! Each configured device is an image file standing in for a camera. Opening
//! a device loads the file once; every drawn frame is that image. Used for
//! headless and scripted runs where no capture hardware exists.

use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::types::{
    CameraBackend, CameraError, CameraRequest, DeviceInfo, FacingMode, MediaStream, MediaTrack,
};

/// One still-image "camera"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StillDevice {
    /// Image served as the camera's frames
    pub path: PathBuf,
    /// Facing reported to exact-facing requests
    #[serde(default)]
    pub facing: Option<FacingMode>,
}

impl StillDevice {
    pub fn new(path: impl Into<PathBuf>, facing: Option<FacingMode>) -> Self {
        Self {
            path: path.into(),
            facing,
        }
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// Backend serving frames from still images
pub struct StillFrameBackend {
    devices: Vec<StillDevice>,
}

impl StillFrameBackend {
    pub fn new(devices: Vec<StillDevice>) -> Self {
        Self { devices }
    }

    fn choose(&self, request: &CameraRequest) -> Result<&StillDevice, CameraError> {
        if self.devices.is_empty() {
            return Err(CameraError::NotFound);
        }

        match request {
            CameraRequest::Any => Ok(&self.devices[0]),
            CameraRequest::Facing { mode, exact } => {
                let matching = self.devices.iter().find(|d| d.facing == Some(*mode));
                match (matching, exact) {
                    (Some(device), _) => Ok(device),
                    (None, false) => Ok(&self.devices[0]),
                    (None, true) => Err(CameraError::Overconstrained(format!(
                        "facingMode exact {}",
                        mode
                    ))),
                }
            }
        }
    }
}

#[async_trait]
impl CameraBackend for StillFrameBackend {
    async fn open(&self, request: &CameraRequest) -> Result<Arc<dyn MediaStream>, CameraError> {
        let device = self.choose(request)?.clone();
        debug!("Opening still camera {:?} for {:?}", device.path, request);

        let path = device.path.clone();
        let frame = tokio::task::spawn_blocking(move || image::open(&path))
            .await
            .map_err(|e| CameraError::Device(e.to_string()))?
            .map_err(|e| CameraError::Device(format!("{}: {}", device.label(), e)))?
            .to_rgb8();

        Ok(Arc::new(StillStream {
            id: Uuid::new_v4().to_string(),
            track: Arc::new(StillTrack {
                label: device.label(),
                live: AtomicBool::new(true),
            }),
            frame,
        }))
    }

    fn list_devices(&self) -> Vec<DeviceInfo> {
        self.devices
            .iter()
            .map(|d| DeviceInfo {
                label: d.label(),
                facing: d.facing,
            })
            .collect()
    }
}

struct StillTrack {
    label: String,
    live: AtomicBool,
}

impl MediaTrack for StillTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

struct StillStream {
    id: String,
    track: Arc<StillTrack>,
    frame: RgbImage,
}

impl MediaStream for StillStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        vec![self.track.clone() as Arc<dyn MediaTrack>]
    }

    fn video_size(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn draw_frame(&self, canvas: &mut RgbImage) -> Result<(), CameraError> {
        if !self.track.is_live() {
            return Err(CameraError::StreamEnded);
        }
        if canvas.dimensions() != self.frame.dimensions() {
            return Err(CameraError::Device(format!(
                "canvas {:?} does not match video {:?}",
                canvas.dimensions(),
                self.frame.dimensions()
            )));
        }
        canvas.copy_from_slice(self.frame.as_raw());
        Ok(())
    }
}
