// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use log::{debug, warn};
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechErrorKind {
    NoSpeech,
    Aborted,
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Transcript(String),
    Error(SpeechErrorKind),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("Speech recognition is not available; voice input is disabled.")]
    Unavailable,
    #[error("A recording session is already in progress.")]
    Busy,
    #[error("Speech recognition error: {0:?}")]
    Session(SpeechErrorKind),
}

pub trait SpeechProvider {
    fn listen(&mut self) -> SpeechEvent;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Listening,
}

pub struct Recorder<P> {
    provider: Option<P>,
    state: RecorderState,
}

impl<P: SpeechProvider> Recorder<P> {
    pub fn new(provider: Option<P>) -> Self {
        if provider.is_none() {
            warn!("{}", SpeechError::Unavailable);
        }
        Self {
            provider,
            state: RecorderState::Idle,
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn start(&mut self) -> Result<(), SpeechError> {
        if self.provider.is_none() {
            return Err(SpeechError::Unavailable);
        }
        if self.state == RecorderState::Listening {
            return Err(SpeechError::Busy);
        }
        self.state = RecorderState::Listening;
        debug!("recorder listening");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == RecorderState::Listening {
            debug!("recorder stopped");
        }
        self.state = RecorderState::Idle;
    }

    /// Waits for the session's outcome and returns to idle whatever happens.
    /// `Ok(None)` means the session ended without a transcript.
    pub fn finish(&mut self) -> Result<Option<String>, SpeechError> {
        if self.state != RecorderState::Listening {
            return Ok(None);
        }
        let event = match self.provider.as_mut() {
            Some(p) => p.listen(),
            None => return Err(SpeechError::Unavailable),
        };
        self.stop();
        match event {
            SpeechEvent::Transcript(text) => Ok(Some(text)),
            SpeechEvent::Cancelled => Ok(None),
            SpeechEvent::Error(kind) => {
                warn!("speech session failed: {:?}", kind);
                Err(SpeechError::Session(kind))
            }
        }
    }

    pub fn capture(&mut self) -> Result<Option<String>, SpeechError> {
        self.start()?;
        self.finish()
    }
}

/// Reads typed utterances, one line per session.
pub struct LineSpeech<R> {
    reader: R,
}

impl<R: BufRead> LineSpeech<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> SpeechProvider for LineSpeech<R> {
    fn listen(&mut self) -> SpeechEvent {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => SpeechEvent::Cancelled,
            Ok(_) if line.trim().is_empty() => SpeechEvent::Error(SpeechErrorKind::NoSpeech),
            Ok(_) => SpeechEvent::Transcript(line.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                SpeechEvent::Error(SpeechErrorKind::Aborted)
            }
            Err(e) => SpeechEvent::Error(SpeechErrorKind::Io(e.to_string())),
        }
    }
}
