// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback clock.
//!
//! Tracks the song position in milliseconds and reports the transport
//! transitions (start, stop, seek) that recording sessions reset on.

use std::time::{Duration, Instant};

/// Playback clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

/// Transport transition reported by the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Playback started at a position
    Started(f64),
    /// Playback stopped at a position
    Stopped(f64),
    /// Position jumped while playing
    Jumped { old_ms: f64, new_ms: f64 },
}

/// Song playback clock
#[derive(Debug)]
pub struct PlaybackClock {
    /// Current clock state
    state: ClockState,
    /// Current song position in milliseconds
    position_ms: f64,
    /// Wall-clock time of the last position update
    last_tick: Option<Instant>,
}

impl PlaybackClock {
    /// Create a stopped clock at the start of the song
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            position_ms: 0.0,
            last_tick: None,
        }
    }

    /// Get the current clock state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Check if playback is running
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Get the current position in milliseconds
    pub fn position_ms(&self) -> f64 {
        self.position_ms
    }

    /// Start playback at a position
    pub fn start(&mut self, position_ms: f64) -> PlaybackEvent {
        self.state = ClockState::Running;
        self.position_ms = position_ms;
        self.last_tick = Some(Instant::now());
        PlaybackEvent::Started(position_ms)
    }

    /// Stop playback, keeping the position
    pub fn stop(&mut self) -> PlaybackEvent {
        self.state = ClockState::Stopped;
        self.last_tick = None;
        PlaybackEvent::Stopped(self.position_ms)
    }

    /// Move the position
    ///
    /// Returns a jump event only while running; a stopped clock just
    /// moves its cursor.
    pub fn seek(&mut self, position_ms: f64) -> Option<PlaybackEvent> {
        let old_ms = self.position_ms;
        self.position_ms = position_ms;
        if self.state == ClockState::Running {
            self.last_tick = Some(Instant::now());
            Some(PlaybackEvent::Jumped {
                old_ms,
                new_ms: position_ms,
            })
        } else {
            None
        }
    }

    /// Advance the position by a fixed amount while running
    pub fn advance(&mut self, elapsed: Duration) {
        if self.state == ClockState::Running {
            self.position_ms += elapsed.as_secs_f64() * 1000.0;
        }
    }

    /// Advance by the wall-clock time since the last update
    ///
    /// Returns the new position.
    pub fn tick(&mut self) -> f64 {
        if self.state != ClockState::Running {
            return self.position_ms;
        }

        let now = Instant::now();
        if let Some(last) = self.last_tick {
            self.advance(now.duration_since(last));
        }
        self.last_tick = Some(now);
        self.position_ms
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
