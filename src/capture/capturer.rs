// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame capture: video surface → RGB canvas → JPEG

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};
use tracing::debug;

use super::image_utils::to_data_uri;
use crate::camera::MediaStream;
use crate::error::{AssistantError, Result};

/// JPEG quality used for every capture (the browser `toDataURL` default)
pub const JPEG_QUALITY: u8 = 92;

pub const JPEG_MIME: &str = "image/jpeg";

/// One encoded snapshot, consumed by a single solve request
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl CapturedFrame {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `data:image/jpeg;base64,...`
    pub fn to_data_uri(&self) -> String {
        to_data_uri(JPEG_MIME, &self.bytes)
    }

    /// The bare base64 body, as sent to the solver
    pub fn base64_payload(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Snapshots the current video frame
///
/// The canvas is created on first capture and reused afterwards.
#[derive(Default)]
pub struct FrameCapturer {
    canvas: Option<RgbImage>,
}

impl FrameCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, surface: Option<&dyn MediaStream>) -> Result<CapturedFrame> {
        let stream = surface
            .ok_or_else(|| AssistantError::CaptureFailed("no active video surface".to_string()))?;

        let (width, height) = stream.video_size();
        if width == 0 || height == 0 {
            return Err(AssistantError::CaptureFailed(
                "video has no frame yet".to_string(),
            ));
        }

        let canvas = self.canvas.get_or_insert_with(|| RgbImage::new(width, height));
        if canvas.dimensions() != (width, height) {
            *canvas = RgbImage::new(width, height);
        }

        stream
            .draw_frame(canvas)
            .map_err(|e| AssistantError::CaptureFailed(e.to_string()))?;

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
            .encode(canvas.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| AssistantError::CaptureFailed(e.to_string()))?;

        debug!(
            "Captured {}x{} frame ({} JPEG bytes)",
            width,
            height,
            bytes.len()
        );

        Ok(CapturedFrame {
            bytes,
            width,
            height,
        })
    }

    /// Whether the reusable canvas has been created
    pub fn has_canvas(&self) -> bool {
        self.canvas.is_some()
    }
}
