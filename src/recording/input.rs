// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recording input sources.
//!
//! Microphone pitch detection and button tapping both reduce to "which
//! pitch, if any, is sounding at this playback position".

use crate::notes::{LayerId, Pitch};

/// Raw observation from an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pitch detection found a pitch
    PitchObserved(Pitch),
    /// Pitch detection found silence or noise
    NoPitch,
    /// The record button is down
    ButtonHeld,
    /// The record button is up
    ButtonReleased,
}

/// Kind of input feeding a recording
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Sung input, detected after `delay_ms` of capture latency
    Microphone { delay_ms: f64 },
    /// Tapped input, recorded at a fixed pitch
    Button { pitch: Pitch },
}

impl InputKind {
    /// Map an observation to the sounding pitch
    pub fn value_of(&self, event: InputEvent) -> Option<Pitch> {
        match (self, event) {
            (_, InputEvent::PitchObserved(pitch)) => Some(pitch),
            (InputKind::Button { pitch }, InputEvent::ButtonHeld) => Some(*pitch),
            _ => None,
        }
    }

    /// Playback position the observation actually belongs to
    pub fn compensate(&self, position_ms: f64) -> f64 {
        match self {
            InputKind::Microphone { delay_ms } => position_ms - delay_ms,
            InputKind::Button { .. } => position_ms,
        }
    }

    /// Layer this input records into
    pub fn layer(&self) -> LayerId {
        match self {
            InputKind::Microphone { .. } => LayerId::MicRecording,
            InputKind::Button { .. } => LayerId::ButtonRecording,
        }
    }
}
