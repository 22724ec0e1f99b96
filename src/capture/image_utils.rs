// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Capture payload helpers: data URIs, base64 and format sniffing

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// Largest decoded payload accepted (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
const RIFF_MAGIC: &[u8] = b"RIFF";
const WEBP_TAG: &[u8] = b"WEBP";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("payload of {0} bytes exceeds the {1} byte limit")]
    TooLarge(usize, usize),

    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("payload is not a JPEG, PNG or WebP image")]
    UnsupportedFormat,

    #[error("payload is empty")]
    EmptyData,

    #[error("data URI has no ',' separator")]
    MalformedDataUri,
}

/// Build a `data:<mime>;base64,` URI for `bytes`
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Return the payload after the first comma of a data URI
///
/// `data:image/jpeg;base64,/9j/4AAQ...` → `/9j/4AAQ...`
pub fn strip_data_uri_prefix(data_uri: &str) -> Result<&str, ImageError> {
    match data_uri.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => Ok(payload),
        Some(_) => Err(ImageError::EmptyData),
        None => Err(ImageError::MalformedDataUri),
    }
}

/// Check that `payload` is base64 of a supported image within the size cap
pub fn check_payload(payload: &str) -> Result<ImageFormat, ImageError> {
    let bytes = STANDARD.decode(payload.trim())?;
    match bytes.len() {
        0 => Err(ImageError::EmptyData),
        n if n > MAX_IMAGE_SIZE => Err(ImageError::TooLarge(n, MAX_IMAGE_SIZE)),
        _ => detect_format(&bytes),
    }
}

/// Identify the encoding from the leading bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.starts_with(JPEG_MAGIC) {
        Ok(ImageFormat::Jpeg)
    } else if bytes.starts_with(PNG_MAGIC) {
        Ok(ImageFormat::Png)
    } else if bytes.starts_with(RIFF_MAGIC) && bytes.get(8..12) == Some(WEBP_TAG) {
        Ok(ImageFormat::WebP)
    } else {
        Err(ImageError::UnsupportedFormat)
    }
}
