// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the learning assistant

/// Full version string
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-camera-solve-speech");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "rear-camera-fallback",
    "jpeg-capture",
    "remote-solve",
    "markup-sanitizer",
    "speech",
];

/// Get version information as a formatted string
pub fn get_version_string() -> String {
    format!("learning-assistant {} ({})", VERSION, FEATURES.join(", "))
}
