// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Camera controller: the only owner of the live media stream

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::types::{CameraBackend, CameraRequest, FacingMode, MediaStream};
use crate::error::{AssistantError, Result};

/// Rear camera, nothing else
const REAR_CAMERA: CameraRequest = CameraRequest::Facing {
    mode: FacingMode::Environment,
    exact: true,
};

/// Acquires, holds and releases the camera stream
pub struct CameraController {
    backend: Arc<dyn CameraBackend>,
    stream: Option<Arc<dyn MediaStream>>,
}

impl CameraController {
    pub fn new(backend: Arc<dyn CameraBackend>) -> Self {
        Self {
            backend,
            stream: None,
        }
    }

    /// Open the rear camera, falling back to any camera
    ///
    /// A stream that is already attached is released first, so at most one
    /// stream is ever open.
    pub async fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            debug!("Camera already started, releasing previous stream");
            self.stop();
        }

        let stream = match self.backend.open(&REAR_CAMERA).await {
            Ok(stream) => stream,
            Err(rear_err) => {
                warn!(
                    "Cannot access back camera. Falling back to user camera: {}",
                    rear_err
                );
                self.backend
                    .open(&CameraRequest::Any)
                    .await
                    .map_err(|fallback_err| {
                        error!("Camera access error (fallback): {}", fallback_err);
                        debug!("Known devices: {:?}", self.backend.list_devices());
                        AssistantError::CameraUnavailable(fallback_err.to_string())
                    })?
            }
        };

        let (width, height) = stream.video_size();
        info!(
            "Camera stream {} started ({}x{})",
            stream.id(),
            width,
            height
        );
        self.stream = Some(stream);
        Ok(())
    }

    /// Stop every track and drop the stream. Safe to call when stopped.
    pub fn stop(&mut self) {
        let Some(stream) = self.stream.take() else {
            debug!("Camera stop requested with no active stream");
            return;
        };

        for track in stream.tracks() {
            track.stop();
        }
        info!("Camera stream {} stopped", stream.id());
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// The attached video surface, if any
    pub fn stream(&self) -> Option<&dyn MediaStream> {
        self.stream.as_deref()
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.stop();
    }
}
