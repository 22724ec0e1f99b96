// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reads solutions aloud, best effort

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::{SpeechSynthesizer, Utterance, Voice};

/// Voice-name fragments preferred when picking a voice
const PREFERRED_NAME_HINTS: &[&str] = &["female", "zira", "samantha", "eva", "woman"];

/// Locales accepted when no name hint matches first
const PREFERRED_LANGS: &[&str] = &["en-GB", "en-US"];

/// First voice whose name carries a preferred hint or whose locale is English
/// (GB or US), in the order the platform lists them
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    voices.iter().find(|voice| {
        let name = voice.name.to_lowercase();
        PREFERRED_NAME_HINTS.iter().any(|hint| name.contains(hint))
            || PREFERRED_LANGS.contains(&voice.lang.as_str())
    })
}

/// Speaks text through an optional synthesizer
///
/// Without a synthesizer every call is a no-op. Synthesis failures are
/// logged and never returned.
#[derive(Clone, Default)]
pub struct SpeechAnnouncer {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl SpeechAnnouncer {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer: Some(synthesizer),
        }
    }

    /// An announcer that never speaks
    pub fn disabled() -> Self {
        Self { synthesizer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Stop any speech in progress
    pub fn cancel(&self) {
        if let Some(synth) = &self.synthesizer {
            synth.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.synthesizer
            .as_ref()
            .map(|synth| synth.is_speaking())
            .unwrap_or(false)
    }

    pub fn announce(&self, text: &str) {
        let Some(synth) = &self.synthesizer else {
            debug!("Speech disabled, not announcing solution");
            return;
        };

        synth.cancel();

        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let mut utterance = Utterance::new(text);
        let voices = synth.voices();
        match select_voice(&voices) {
            Some(voice) => {
                info!("Speaking solution with voice '{}' ({})", voice.name, voice.lang);
                utterance.voice = Some(voice.clone());
            }
            None => info!("Speaking solution with the default voice"),
        }

        if let Err(e) = synth.speak(utterance) {
            warn!("Speech synthesis failed: {}", e);
        }
    }
}
