// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for camera acquisition

use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Which way a camera faces, named as the media-capture API names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front (selfie) camera
    User,
    /// Rear camera
    Environment,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::User => write!(f, "user"),
            FacingMode::Environment => write!(f, "environment"),
        }
    }
}

/// Constraint set passed to a [`CameraBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraRequest {
    /// A camera facing `mode`; with `exact` set, nothing else is acceptable
    Facing { mode: FacingMode, exact: bool },
    /// Any available video input
    Any,
}

/// Errors raised while opening or reading a camera
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no camera device available")]
    NotFound,

    #[error("no camera satisfies the constraint: {0}")]
    Overconstrained(String),

    #[error("camera permission denied")]
    PermissionDenied,

    #[error("stream has ended")]
    StreamEnded,

    #[error("camera device error: {0}")]
    Device(String),
}

/// Diagnostic description of a device a backend can open
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub label: String,
    pub facing: Option<FacingMode>,
}

/// A single media track inside a stream
pub trait MediaTrack: Send + Sync {
    fn label(&self) -> &str;

    fn is_live(&self) -> bool;

    /// Stop the track. Stopping an ended track does nothing.
    fn stop(&self);
}

/// Live camera frames
pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>>;

    /// Native (width, height) of the video
    fn video_size(&self) -> (u32, u32);

    /// Render the current frame into `canvas`, which the caller has already
    /// sized to [`MediaStream::video_size`]
    fn draw_frame(&self, canvas: &mut RgbImage) -> Result<(), CameraError>;

    /// True while at least one track is live
    fn is_active(&self) -> bool {
        self.tracks().iter().any(|t| t.is_live())
    }
}

/// Source of camera streams
#[async_trait]
pub trait CameraBackend: Send + Sync {
    async fn open(&self, request: &CameraRequest) -> Result<Arc<dyn MediaStream>, CameraError>;

    fn list_devices(&self) -> Vec<DeviceInfo>;
}
