// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Real-time note transcription.
//!
//! Turns a stream of "pitch observed at playback time T" ticks into
//! beat-quantized notes in a [`NoteLayer`], while keeping the layer free
//! of overlapping notes. The engine runs once per input tick and only
//! looks at the notes just ahead of the playback cursor, so each call
//! costs O(overlap window) rather than O(song length).
//!
//! Playback transitions reset the session: whenever the cursor moves
//! discontinuously the engine recomputes which notes lie ahead of it.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use super::input::{InputEvent, InputKind};
use super::lyrics::{NoText, TextSupplier};
use crate::notes::{NoteId, NoteLayer, Pitch};
use crate::timing::{PlaybackEvent, TempoMap};

/// Receives the "recording produced an undoable change" signal
pub trait UndoCheckpoint {
    /// Mark the history as needing a checkpoint
    fn mark_dirty(&mut self);
}

impl<F: FnMut()> UndoCheckpoint for F {
    fn mark_dirty(&mut self) {
        self()
    }
}

/// Per-session recording state
#[derive(Debug, Default)]
struct Session {
    /// Beat of the last processed tick; ticks at or before it are ignored
    last_event_beat: i64,
    /// Note being extended by a sustained pitch
    current_note: Option<NoteId>,
    /// Notes ahead of the cursor, ascending by start beat
    upcoming_notes: VecDeque<NoteId>,
    /// Whether anything was written since playback started
    has_written_any_note: bool,
}

/// Transcribes input ticks into a note layer
pub struct TranscriptionEngine<T: TempoMap, S: TextSupplier = NoText> {
    tempo: T,
    input: InputKind,
    text: S,
    recording_enabled: bool,
    playback_running: bool,
    session: Session,
}

impl<T: TempoMap> TranscriptionEngine<T, NoText> {
    /// Create an engine whose notes carry no text
    pub fn new(tempo: T, input: InputKind) -> Self {
        Self::with_text(tempo, input, NoText)
    }
}

impl<T: TempoMap, S: TextSupplier> TranscriptionEngine<T, S> {
    /// Create an engine that labels each new note from a text supplier
    pub fn with_text(tempo: T, input: InputKind, text: S) -> Self {
        Self {
            tempo,
            input,
            text,
            recording_enabled: false,
            playback_running: false,
            session: Session::default(),
        }
    }

    /// Get the tempo map
    pub fn tempo(&self) -> &T {
        &self.tempo
    }

    /// Get the input kind
    pub fn input(&self) -> InputKind {
        self.input
    }

    /// Get the text supplier
    pub fn text_supplier(&self) -> &S {
        &self.text
    }

    /// Get the text supplier for repositioning
    pub fn text_supplier_mut(&mut self) -> &mut S {
        &mut self.text
    }

    /// Check if ticks are being recorded
    pub fn is_recording_enabled(&self) -> bool {
        self.recording_enabled
    }

    /// Check if playback is running
    pub fn is_playback_running(&self) -> bool {
        self.playback_running
    }

    /// Enable or disable recording
    ///
    /// Disabling ends the current note so that re-enabling later never
    /// stretches it across the gap.
    pub fn set_recording_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.session.current_note = None;
        }
        if enabled != self.recording_enabled {
            debug!("recording {}", if enabled { "enabled" } else { "disabled" });
        }
        self.recording_enabled = enabled;
    }

    /// Whether the host should be capturing input right now
    pub fn should_capture(&self, device_available: bool) -> bool {
        self.recording_enabled && self.playback_running && device_available
    }

    /// Beat of the last processed tick
    pub fn last_event_beat(&self) -> i64 {
        self.session.last_event_beat
    }

    /// Note currently being extended
    pub fn current_note(&self) -> Option<NoteId> {
        self.session.current_note
    }

    /// Notes still ahead of the cursor, ascending by start beat
    pub fn upcoming_notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.session.upcoming_notes.iter().copied()
    }

    /// Whether a note was written since playback started
    pub fn has_written_any_note(&self) -> bool {
        self.session.has_written_any_note
    }

    /// Playback started at a position
    pub fn on_playback_started(&mut self, layer: &NoteLayer, position_ms: f64) {
        self.playback_running = true;
        self.session.has_written_any_note = false;
        self.reset_session(layer, position_ms);
    }

    /// Playback position jumped while playing
    pub fn on_playback_jumped(&mut self, layer: &NoteLayer, old_ms: f64, new_ms: f64) {
        trace!("playback jumped from {:.0}ms", old_ms);
        self.reset_session(layer, new_ms);
    }

    /// Playback stopped
    ///
    /// Raises the undo checkpoint if the session wrote any note.
    pub fn on_playback_stopped<C>(&mut self, checkpoint: &mut C, position_ms: f64)
    where
        C: UndoCheckpoint + ?Sized,
    {
        self.playback_running = false;
        if self.session.has_written_any_note {
            info!("recording stopped at {:.0}ms, marking undo checkpoint", position_ms);
            checkpoint.mark_dirty();
        }
    }

    /// Dispatch a clock transition to the matching hook
    pub fn on_playback_event<C>(
        &mut self,
        layer: &NoteLayer,
        checkpoint: &mut C,
        event: PlaybackEvent,
    ) where
        C: UndoCheckpoint + ?Sized,
    {
        match event {
            PlaybackEvent::Started(position_ms) => self.on_playback_started(layer, position_ms),
            PlaybackEvent::Stopped(position_ms) => {
                self.on_playback_stopped(checkpoint, position_ms)
            }
            PlaybackEvent::Jumped { old_ms, new_ms } => {
                self.on_playback_jumped(layer, old_ms, new_ms)
            }
        }
    }

    /// Process a raw input observation
    pub fn on_input_event(&mut self, layer: &mut NoteLayer, event: InputEvent, position_ms: f64) {
        let value = self.input.value_of(event);
        self.on_input_tick(layer, value, position_ms);
    }

    /// Process one input tick
    ///
    /// `value` is the sounding pitch, or `None` for silence. A repeated
    /// pitch extends the current note beat by beat; anything else starts
    /// a new one-beat note. Existing notes in the way are truncated or
    /// deleted.
    pub fn on_input_tick(
        &mut self,
        layer: &mut NoteLayer,
        value: Option<Pitch>,
        position_ms: f64,
    ) {
        if !self.recording_enabled || !self.playback_running {
            return;
        }

        // Leave room above for a one-beat note
        let beat = self
            .tempo
            .beat_at(self.input.compensate(position_ms))
            .min(i64::MAX - 1);
        if beat <= self.session.last_event_beat {
            return;
        }

        let pitch = match value {
            Some(pitch) => pitch,
            None => {
                self.session.current_note = None;
                self.session.last_event_beat = beat;
                return;
            }
        };

        match self.live_current_note(layer) {
            Some(id) if layer.get(id).map(|n| n.pitch) == Some(pitch) => {
                self.extend_note(layer, id, beat);
            }
            _ => self.start_note(layer, pitch, beat),
        }

        self.session.last_event_beat = beat;
        self.session.has_written_any_note = true;
        self.assert_clear_ahead(layer);
        layer.mark_changed();
    }

    /// Realign the session with a new cursor position
    fn reset_session(&mut self, layer: &NoteLayer, position_ms: f64) {
        let beat = self.tempo.beat_at(position_ms);
        // One before the cursor, so a tick at exactly `beat` counts as new
        self.session.last_event_beat = beat.saturating_sub(1);
        self.session.current_note = None;
        // Includes notes straddling the cursor so they get cut too
        self.session.upcoming_notes = layer.notes_with(|n| n.end_beat > beat).into();
        debug!(
            "recording session reset at beat {} with {} upcoming notes",
            beat,
            self.session.upcoming_notes.len()
        );
    }

    /// Current note, dropping the handle if the layer no longer has it
    fn live_current_note(&mut self, layer: &NoteLayer) -> Option<NoteId> {
        let id = self.session.current_note?;
        if layer.contains(id) {
            Some(id)
        } else {
            warn!("current note was removed from the layer, starting a new note");
            self.session.current_note = None;
            None
        }
    }

    /// Grow a note up to and including `beat`
    ///
    /// Beats skipped since the last tick are replayed in order so every
    /// intermediate beat gets its own overlap pass.
    fn extend_note(&mut self, layer: &mut NoteLayer, id: NoteId, beat: i64) {
        for covered in self.session.last_event_beat.saturating_add(1)..=beat {
            let end = covered + 1;
            let grew = match layer.get_mut(id) {
                Some(note) if end > note.end_beat => {
                    note.end_beat = end;
                    true
                }
                Some(_) => false,
                None => return,
            };
            if grew {
                self.resolve_overlaps(layer, end, id);
            }
        }
        if let Some(note) = layer.get(id) {
            trace!("extended note to {} beats", note.length());
        }
    }

    /// Insert a new one-beat note at `beat`
    fn start_note(&mut self, layer: &mut NoteLayer, pitch: Pitch, beat: i64) {
        let text = self.text.take_next_word();
        trace!("new note {} at beat {} {:?}", pitch, beat, text);
        let id = layer.add(pitch, beat, beat + 1, text);
        self.session.current_note = Some(id);
        self.resolve_overlaps(layer, beat + 1, id);
    }

    /// Cut every upcoming note that reaches into `[.., threshold)`
    ///
    /// Overlapping notes keep their tail from `threshold` on; notes left
    /// with no beats are deleted. Notes entirely behind `threshold` are
    /// dropped from the upcoming queue.
    fn resolve_overlaps(&mut self, layer: &mut NoteLayer, threshold: i64, excluding: NoteId) {
        let mut to_truncate = Vec::new();
        let mut to_delete = Vec::new();
        // Leading queue entries no longer ahead of the cursor
        let mut behind = 0;
        let mut in_prefix = true;

        for (index, &id) in self.session.upcoming_notes.iter().enumerate() {
            let note = match layer.get(id) {
                Some(note) if id != excluding => note,
                _ => {
                    if in_prefix {
                        behind = index + 1;
                    }
                    continue;
                }
            };

            if note.start_beat < threshold && threshold <= note.end_beat {
                in_prefix = false;
                if note.end_beat > threshold {
                    to_truncate.push(id);
                } else {
                    to_delete.push(id);
                }
            } else if note.end_beat < threshold {
                if in_prefix {
                    behind = index + 1;
                }
            } else {
                // Sorted by start: nothing further can reach the threshold
                break;
            }
        }

        self.session.upcoming_notes.drain(..behind);

        for id in to_truncate {
            if let Some(note) = layer.get_mut(id) {
                trace!(
                    "truncating note [{}, {}) to start at {}",
                    note.start_beat,
                    note.end_beat,
                    threshold
                );
                note.start_beat = threshold;
            }
        }

        for id in to_delete {
            if let Some(note) = layer.remove(id) {
                trace!("deleting overwritten note [{}, {})", note.start_beat, note.end_beat);
            }
            if let Some(index) = self.session.upcoming_notes.iter().position(|&u| u == id) {
                self.session.upcoming_notes.remove(index);
            }
        }
    }

    /// The current note must end at or before the next note ahead
    fn assert_clear_ahead(&self, layer: &NoteLayer) {
        let current_id = match self.session.current_note {
            Some(id) => id,
            None => return,
        };
        let current = match layer.get(current_id) {
            Some(note) => note,
            None => panic!("current note handle dangles after a write"),
        };
        let next = self
            .session
            .upcoming_notes
            .iter()
            .filter(|&&id| id != current_id)
            .find_map(|&id| layer.get(id));
        if let Some(next) = next {
            assert!(
                !current.overlaps(next),
                "recorded note [{}, {}) overlaps [{}, {})",
                current.start_beat,
                current.end_beat,
                next.start_beat,
                next.end_beat
            );
        }
    }
}
