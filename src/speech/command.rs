// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Speech through an external `espeak-ng`-compatible program

use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::types::{SpeechError, SpeechSynthesizer, Utterance, Voice};

pub const DEFAULT_SPEECH_PROGRAM: &str = "espeak-ng";

/// espeak's neutral pitch (0-99 scale)
const BASE_PITCH: f32 = 50.0;
/// espeak's default rate in words per minute
const BASE_RATE_WPM: f32 = 175.0;
/// espeak's default amplitude (0-200 scale)
const BASE_AMPLITUDE: f32 = 100.0;

/// Synthesizer that shells out to an espeak-style command
///
/// One utterance plays at a time; `cancel` kills the running child.
pub struct CommandSynthesizer {
    program: String,
    current: Mutex<Option<Child>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args_for(utterance: &Utterance) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(voice) = &utterance.voice {
            args.push("-v".to_string());
            args.push(voice.voice_uri.clone());
        }
        args.push("-p".to_string());
        args.push(format!("{}", (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0)));
        args.push("-s".to_string());
        args.push(format!("{}", (BASE_RATE_WPM * utterance.rate).round().max(80.0)));
        args.push("-a".to_string());
        args.push(format!(
            "{}",
            (BASE_AMPLITUDE * utterance.volume).round().clamp(0.0, 200.0)
        ));
        args.push("--".to_string());
        args.push(utterance.text.clone());
        args
    }
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_SPEECH_PROGRAM)
    }
}

impl CommandSynthesizer {
    fn lock_current(&self) -> MutexGuard<'_, Option<Child>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Kill `child` if it is still running, then reap it
fn stop_child(mut child: Child) {
    if let Ok(None) = child.try_wait() {
        debug!("Cancelling speech (pid {})", child.id());
        let _ = child.kill();
    }
    let _ = child.wait();
}

/// These calls block on process management; async callers run them through
/// `spawn_blocking`.
impl SpeechSynthesizer for CommandSynthesizer {
    fn voices(&self) -> Vec<Voice> {
        match Command::new(&self.program).arg("--voices").output() {
            Ok(output) if output.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                debug!("{} --voices exited with {}", self.program, output.status);
                Vec::new()
            }
            Err(e) => {
                debug!("Cannot list voices with {}: {}", self.program, e);
                Vec::new()
            }
        }
    }

    fn cancel(&self) {
        if let Some(child) = self.lock_current().take() {
            stop_child(child);
        }
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        // One guard for stop-and-replace so concurrent calls cannot orphan a child
        let mut current = self.lock_current();
        if let Some(previous) = current.take() {
            stop_child(previous);
        }

        let child = Command::new(&self.program)
            .args(Self::args_for(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {}", self.program, e)))?;

        *current = Some(child);
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let mut current = self.lock_current();
        let finished = match current.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => return false,
        };
        if finished {
            // try_wait already reaped it
            *current = None;
        }
        !finished
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Parse the table printed by `espeak-ng --voices`
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-gb           --/M      English_(Great_Britain) gmw/en
///  2  en-us           --/M      English_(America)  gmw/en-US
/// ```
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 {
                return None;
            }
            let language = columns[1];
            Some(Voice {
                name: columns[3].replace('_', " "),
                lang: normalize_language_tag(language),
                voice_uri: language.to_string(),
                is_default: language == "en",
            })
        })
        .collect()
}

/// `en-gb` → `en-GB`
fn normalize_language_tag(tag: &str) -> String {
    tag.split('-')
        .enumerate()
        .map(|(i, part)| {
            if i > 0 && part.len() == 2 {
                part.to_uppercase()
            } else {
                part.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
