// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for recording sessions.
//!
//! A recorder file describes the song tempo, the input used for
//! recording (microphone or button) and the lyrics handed out to
//! button-recorded notes. Files are YAML, or TOML when the extension
//! says so.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::RecorderError;
use crate::notes::Pitch;
use crate::recording::{InputKind, LyricsDispenser, DEFAULT_SYLLABLE_SEPARATOR};
use crate::timing::BpmTempoMap;

/// Root configuration for a recording session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecorderFile {
    /// Song tempo
    #[serde(default)]
    pub tempo: TempoConfig,
    /// Input and recording settings
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Lyrics for button recording
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl RecorderFile {
    /// Load a configuration file (TOML for `.toml`, YAML otherwise)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let is_toml = path.extension().map_or(false, |ext| ext == "toml");
        let parsed = if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        };
        parsed.with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<(), RecorderError> {
        self.tempo_map()?;

        let delay = self.recording.mic_delay_ms;
        if !delay.is_finite() || delay < 0.0 {
            return Err(RecorderError::InvalidMicDelay(delay));
        }

        let separator = self.recording.syllable_separator;
        if separator.is_whitespace() {
            return Err(RecorderError::InvalidSeparator(separator));
        }

        Ok(())
    }

    /// Build the tempo map
    pub fn tempo_map(&self) -> Result<BpmTempoMap, RecorderError> {
        BpmTempoMap::new(self.tempo.bpm, self.tempo.gap_ms)
    }

    /// Build the input kind
    pub fn input_kind(&self) -> InputKind {
        match self.recording.input {
            InputMode::Microphone => InputKind::Microphone {
                delay_ms: self.recording.mic_delay_ms,
            },
            InputMode::Button => InputKind::Button {
                pitch: self.recording.button_pitch,
            },
        }
    }

    /// Build a lyrics dispenser over the configured lyrics
    pub fn lyrics_dispenser(&self) -> LyricsDispenser {
        LyricsDispenser::with_separator(
            self.lyrics.clone().unwrap_or_default(),
            self.recording.syllable_separator,
        )
    }
}

/// Song tempo settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TempoConfig {
    /// Beats per minute
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    /// Position of beat zero in milliseconds
    #[serde(default)]
    pub gap_ms: f64,
}

fn default_bpm() -> f64 {
    120.0
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            gap_ms: 0.0,
        }
    }
}

/// Which input drives the recording
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Microphone,
    Button,
}

/// Recording settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingConfig {
    /// Input used for recording
    #[serde(default)]
    pub input: InputMode,
    /// Microphone latency subtracted from playback positions
    #[serde(default)]
    pub mic_delay_ms: f64,
    /// Pitch given to button-recorded notes
    #[serde(default = "default_button_pitch")]
    pub button_pitch: Pitch,
    /// Syllable separator stripped from lyric words
    #[serde(default = "default_separator")]
    pub syllable_separator: char,
}

fn default_button_pitch() -> Pitch {
    60
}
fn default_separator() -> char {
    DEFAULT_SYLLABLE_SEPARATOR
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            input: InputMode::default(),
            mic_delay_ms: 0.0,
            button_pitch: default_button_pitch(),
            syllable_separator: default_separator(),
        }
    }
}
