// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame capture and image payload helpers

pub mod capturer;
pub mod image_utils;

pub use capturer::{CapturedFrame, FrameCapturer, JPEG_MIME, JPEG_QUALITY};
pub use image_utils::{
    check_payload, detect_format, strip_data_uri_prefix, to_data_uri, ImageError,
};
