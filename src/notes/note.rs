// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beat-quantized notes.

/// Pitch as a MIDI-style note number (60 = middle C)
pub type Pitch = i32;

/// Which recording layer a note belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    /// Notes sung into the microphone
    MicRecording,
    /// Notes tapped with a button
    ButtonRecording,
}

/// A pitch held over the half-open beat range `[start_beat, end_beat)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Note number
    pub pitch: Pitch,
    /// First beat covered by the note
    pub start_beat: i64,
    /// First beat after the note (exclusive)
    pub end_beat: i64,
    /// Lyric text sung on this note
    pub text: String,
    /// Owning layer
    pub layer: LayerId,
}

impl Note {
    /// Create a new note
    pub fn new(
        pitch: Pitch,
        start_beat: i64,
        end_beat: i64,
        text: impl Into<String>,
        layer: LayerId,
    ) -> Self {
        assert!(end_beat > start_beat, "Note length must be > 0");
        Self {
            pitch,
            start_beat,
            end_beat,
            text: text.into(),
            layer,
        }
    }

    /// Length in beats
    pub fn length(&self) -> i64 {
        self.end_beat - self.start_beat
    }

    /// Check if two notes share at least one beat
    pub fn overlaps(&self, other: &Note) -> bool {
        self.start_beat < other.end_beat && other.start_beat < self.end_beat
    }
}
