// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Camera acquisition
//!
//! ```text
//! CameraController::start() ──► backend.open(rear, exact)
//!                                   │ rejected
//!                                   ▼
//!                               backend.open(any) ──► MediaStream (video surface)
//! ```
//!
//! The controller is the only place a stream is opened or stopped.

pub mod controller;
pub mod still;
pub mod types;

pub use controller::CameraController;
pub use still::{StillDevice, StillFrameBackend};
pub use types::{
    CameraBackend, CameraError, CameraRequest, DeviceInfo, FacingMode, MediaStream, MediaTrack,
};
