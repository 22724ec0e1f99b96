// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Small diagnostic commands

use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::Path;

use crate::camera::{CameraBackend, DeviceInfo, StillFrameBackend};
use crate::config::AssistantConfig;
use crate::sanitize::{sanitize, RenderMode};
use crate::solver::SolutionClient;
use crate::speech::{select_voice, CommandSynthesizer, SpeechSynthesizer, Voice};

pub async fn list_voices(program: &str) -> Result<()> {
    let synth = CommandSynthesizer::new(program);
    let voices = tokio::task::spawn_blocking(move || synth.voices()).await?;
    if voices.is_empty() {
        return Err(anyhow!("no voices reported by '{}'", program));
    }
    print!("{}", format_voices(&voices));
    Ok(())
}

/// One line per voice, `*` marking the voice used for solutions
pub fn format_voices(voices: &[Voice]) -> String {
    let chosen = select_voice(voices).map(|v| v.voice_uri.as_str());
    voices
        .iter()
        .map(|voice| {
            let marker = if Some(voice.voice_uri.as_str()) == chosen {
                '*'
            } else {
                ' '
            };
            format!("{} {:<32} {:<8} {}\n", marker, voice.name, voice.lang, voice.voice_uri)
        })
        .collect()
}

pub fn list_devices(config: &AssistantConfig) -> Result<()> {
    let devices = StillFrameBackend::new(config.camera.devices.clone()).list_devices();
    if devices.is_empty() {
        return Err(anyhow!("no camera devices configured"));
    }
    print!("{}", format_devices(&devices));
    Ok(())
}

/// One line per device with its facing mode, `-` when unknown
pub fn format_devices(devices: &[DeviceInfo]) -> String {
    devices
        .iter()
        .map(|device| {
            let facing = device
                .facing
                .map(|mode| mode.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!("{:<12} {}\n", facing, device.label)
        })
        .collect()
}

pub fn sanitize_input(file: Option<&Path>, mode: RenderMode) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            buf
        }
    };
    println!("{}", sanitize(&raw).render(mode));
    Ok(())
}

pub async fn check_health(config: &AssistantConfig) -> Result<()> {
    config.validate()?;
    let client = SolutionClient::new(&config.endpoint)?;
    if client.health_check().await {
        println!("{} is ready", client.endpoint());
        Ok(())
    } else {
        Err(anyhow!("{} is not ready", client.endpoint()))
    }
}
