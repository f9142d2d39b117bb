// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for PITCHREC
//!
//! These tests drive the transcription engine through its public API the
//! way an editor host would: clock events, input ticks and a note layer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pitchrec::{
    BpmTempoMap, InputEvent, InputKind, LayerId, LyricsDispenser, NoteId, NoteLayer,
    PlaybackClock, PlaybackEvent, RecorderFile, TranscriptionEngine,
};

/// 60 BPM: beat N starts at N seconds
fn tempo() -> BpmTempoMap {
    BpmTempoMap::new(60.0, 0.0).unwrap()
}

fn ms(beat: i64) -> f64 {
    beat as f64 * 1000.0
}

fn mic_engine() -> TranscriptionEngine<BpmTempoMap> {
    let mut engine = TranscriptionEngine::new(tempo(), InputKind::Microphone { delay_ms: 0.0 });
    engine.set_recording_enabled(true);
    engine
}

fn spans(layer: &NoteLayer) -> Vec<(i64, i64, i32)> {
    layer
        .sorted()
        .into_iter()
        .map(|(_, n)| (n.start_beat, n.end_beat, n.pitch))
        .collect()
}

/// Test that a repeated pitch extends the current note
#[test]
fn test_same_pitch_extends_current_note() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, ms(5));

    engine.on_input_tick(&mut layer, Some(60), ms(5));
    assert_eq!(spans(&layer), vec![(5, 6, 60)]);

    engine.on_input_tick(&mut layer, Some(60), ms(6));
    assert_eq!(layer.len(), 1);
    assert_eq!(spans(&layer), vec![(5, 7, 60)]);
}

/// Test that a different pitch starts a new note and leaves the old one alone
#[test]
fn test_different_pitch_starts_new_note() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, ms(5));

    engine.on_input_tick(&mut layer, Some(60), ms(5));
    let first = engine.current_note().unwrap();
    engine.on_input_tick(&mut layer, Some(62), ms(6));

    assert_ne!(engine.current_note(), Some(first));
    assert_eq!(spans(&layer), vec![(5, 6, 60), (6, 7, 62)]);
}

/// Test that duplicate or earlier ticks do not touch the layer
#[test]
fn test_duplicate_ticks_are_ignored() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, 0.0);

    engine.on_input_tick(&mut layer, Some(60), ms(4) + 100.0);
    let before = spans(&layer);
    let revision = layer.revision();

    // Same beat, later within it
    engine.on_input_tick(&mut layer, Some(67), ms(4) + 900.0);
    // Earlier beat
    engine.on_input_tick(&mut layer, Some(67), ms(2));
    engine.on_input_tick(&mut layer, None, ms(3));

    assert_eq!(spans(&layer), before);
    assert_eq!(layer.revision(), revision);
    assert_eq!(engine.last_event_beat(), 4);
}

/// Test that an overlapped note keeps its tail
#[test]
fn test_truncation_keeps_tail() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let existing = layer.add(50, 3, 10, "old");
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, 0.0);

    // A note at beat 5 reaches threshold 6
    engine.on_input_tick(&mut layer, Some(60), ms(5));

    let note = layer.get(existing).unwrap();
    assert_eq!((note.start_beat, note.end_beat), (6, 10));
    assert_eq!(note.text, "old");
    assert!(layer.find_overlap().is_none());
}

/// Test that a note reduced to nothing is removed
#[test]
fn test_fully_overwritten_note_is_deleted() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let existing = layer.add(50, 3, 6, "");
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, 0.0);

    engine.on_input_tick(&mut layer, Some(60), ms(5));

    assert!(!layer.contains(existing));
    assert_eq!(spans(&layer), vec![(5, 6, 60)]);
    assert!(engine.upcoming_notes().all(|id| id != existing));
}

/// Test that notes entirely ahead of the recording are untouched
#[test]
fn test_notes_ahead_untouched() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let ahead = layer.add(50, 8, 12, "");
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, 0.0);

    for beat in 2..=7 {
        engine.on_input_tick(&mut layer, Some(60), ms(beat));
    }

    assert_eq!(spans(&layer), vec![(2, 8, 60), (8, 12, 50)]);
    assert_eq!(engine.upcoming_notes().next(), Some(ahead));
}

/// Test that beats skipped by a slow tick each get an overlap pass
#[test]
fn test_skipped_beats_are_replayed() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let short = layer.add(50, 3, 4, "");
    let middle = layer.add(51, 4, 6, "");
    let later = layer.add(52, 6, 9, "");
    let mut engine = mic_engine();
    engine.on_playback_started(&layer, 0.0);

    engine.on_input_tick(&mut layer, Some(60), ms(2));
    assert_eq!(engine.last_event_beat(), 2);
    assert_eq!(layer.len(), 4);

    // One tick covering beats 3, 4 and 5
    engine.on_input_tick(&mut layer, Some(60), ms(5));

    // Beat 3 deletes [3,4), beat 4 cuts [4,6) to [5,6), beat 5 deletes it
    assert!(!layer.contains(short));
    assert!(!layer.contains(middle));
    assert!(layer.contains(later));
    assert_eq!(spans(&layer), vec![(2, 6, 60), (6, 9, 52)]);
    assert!(layer.find_overlap().is_none());
}

/// Test that a jump backwards realigns the session
#[test]
fn test_jump_resets_session() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let early = layer.add(50, 3, 5, "");
    let mut engine = mic_engine();

    engine.on_playback_started(&layer, ms(10));
    assert_eq!(engine.upcoming_notes().count(), 0);
    engine.on_input_tick(&mut layer, Some(60), ms(10));
    assert_eq!(engine.last_event_beat(), 10);
    let recorded = engine.current_note().unwrap();

    engine.on_playback_jumped(&layer, ms(10), ms(2));
    assert!(engine.current_note().is_none());
    let upcoming: Vec<NoteId> = engine.upcoming_notes().collect();
    assert_eq!(upcoming, vec![early, recorded]);

    // Beat 2 is not stale after the jump
    engine.on_input_tick(&mut layer, Some(64), ms(2));
    assert_eq!(engine.last_event_beat(), 2);
    assert_eq!(spans(&layer), vec![(2, 3, 64), (3, 5, 50), (10, 11, 60)]);

    engine.on_input_tick(&mut layer, Some(64), ms(3));
    assert_eq!(spans(&layer), vec![(2, 4, 64), (4, 5, 50), (10, 11, 60)]);
}

/// Test that a session with no writes raises no undo checkpoint
#[test]
fn test_no_checkpoint_without_writes() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    let mut checkpoints = 0;

    engine.on_playback_started(&layer, 0.0);
    engine.on_input_tick(&mut layer, None, ms(1));
    engine.on_input_tick(&mut layer, None, ms(2));
    engine.on_playback_stopped(&mut || checkpoints += 1, ms(3));

    assert_eq!(checkpoints, 0);
    assert!(layer.is_empty());
}

/// Test that a session with writes raises exactly one checkpoint
#[test]
fn test_one_checkpoint_per_recording() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    let mut checkpoints = 0;

    engine.on_playback_started(&layer, 0.0);
    engine.on_input_tick(&mut layer, Some(60), ms(1));
    engine.on_input_tick(&mut layer, Some(60), ms(2));
    engine.on_input_tick(&mut layer, Some(62), ms(3));
    engine.on_playback_stopped(&mut || checkpoints += 1, ms(4));
    assert_eq!(checkpoints, 1);

    // A new session without writes stays clean
    engine.on_playback_started(&layer, 0.0);
    engine.on_playback_stopped(&mut || checkpoints += 1, ms(1));
    assert_eq!(checkpoints, 1);
}

/// Test the clock driving a button recording with lyrics
#[test]
fn test_clock_driven_button_recording() {
    let mut layer = NoteLayer::new(LayerId::ButtonRecording);
    let mut engine = TranscriptionEngine::with_text(
        tempo(),
        InputKind::Button { pitch: 57 },
        LyricsDispenser::new("hap;py birth;day to you"),
    );
    engine.set_recording_enabled(true);
    let mut clock = PlaybackClock::new();
    let mut checkpoints = 0;

    let started = clock.start(0.0);
    engine.on_playback_event(&layer, &mut || checkpoints += 1, started);

    // Held for beats 0-1, released for 2, held for 3
    let pattern = [true, true, false, true];
    for held in pattern {
        let event = if held {
            InputEvent::ButtonHeld
        } else {
            InputEvent::ButtonReleased
        };
        engine.on_input_event(&mut layer, event, clock.position_ms());
        clock.advance(std::time::Duration::from_millis(1000));
    }

    let stopped = clock.stop();
    engine.on_playback_event(&layer, &mut || checkpoints += 1, stopped);

    let notes: Vec<_> = layer
        .sorted()
        .into_iter()
        .map(|(_, n)| (n.start_beat, n.end_beat, n.text.clone()))
        .collect();
    assert_eq!(
        notes,
        vec![(0, 2, "happy".to_string()), (3, 4, "birthday".to_string())]
    );
    assert_eq!(engine.text_supplier().remaining(), "to you");
    assert_eq!(checkpoints, 1);
}

/// Test that the clock's seek produces a jump the engine honours
#[test]
fn test_clock_seek_event() {
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    let mut engine = mic_engine();
    let mut clock = PlaybackClock::new();

    let started = clock.start(ms(6));
    engine.on_playback_event(&layer, &mut || {}, started);
    engine.on_input_tick(&mut layer, Some(60), ms(6));

    let jump = clock.seek(ms(1)).unwrap();
    assert_eq!(
        jump,
        PlaybackEvent::Jumped {
            old_ms: ms(6),
            new_ms: ms(1)
        }
    );
    engine.on_playback_event(&layer, &mut || {}, jump);
    engine.on_input_tick(&mut layer, Some(60), ms(1));

    assert_eq!(spans(&layer), vec![(1, 2, 60), (6, 7, 60)]);
}

/// Test the non-overlap invariant over random sessions
#[test]
fn test_random_sessions_never_overlap() {
    for seed in 0..40u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut layer = NoteLayer::new(LayerId::MicRecording);

        // Random non-overlapping starting material
        let mut beat = 0i64;
        while beat < 200 {
            let length = rng.gen_range(1..8);
            if rng.gen_bool(0.6) {
                layer.add(rng.gen_range(40..80), beat, beat + length, "");
            }
            beat += length + rng.gen_range(0..4);
        }
        assert!(layer.find_overlap().is_none());

        let delay_ms = rng.gen_range(0.0..400.0);
        let mut engine = TranscriptionEngine::new(tempo(), InputKind::Microphone { delay_ms });
        engine.set_recording_enabled(true);

        let mut position = rng.gen_range(0.0..ms(50));
        engine.on_playback_started(&layer, position);

        for _ in 0..400 {
            match rng.gen_range(0..100) {
                0..=2 => {
                    let target = rng.gen_range(0.0..ms(200));
                    engine.on_playback_jumped(&layer, position, target);
                    position = target;
                }
                3 => {
                    engine.on_playback_stopped(&mut || {}, position);
                    position = rng.gen_range(0.0..ms(200));
                    engine.on_playback_started(&layer, position);
                }
                4 => {
                    let enabled = !engine.is_recording_enabled();
                    engine.set_recording_enabled(enabled);
                }
                _ => {
                    // Anything from a duplicate tick to a long stall
                    position += rng.gen_range(0.0..ms(4));
                    let value = if rng.gen_bool(0.2) {
                        None
                    } else {
                        Some(rng.gen_range(58..62))
                    };
                    engine.on_input_tick(&mut layer, value, position);
                }
            }

            assert!(
                layer.find_overlap().is_none(),
                "seed {} produced overlapping notes",
                seed
            );
            if let Some(current) = engine.current_note() {
                assert!(layer.contains(current), "seed {} left a dangling note", seed);
            }
        }
    }
}

/// Test building an engine from a config file on disk
#[test]
fn test_engine_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recorder.yaml");
    std::fs::write(
        &path,
        r#"
tempo:
  bpm: 120
  gap_ms: 500
recording:
  input: microphone
  mic_delay_ms: 250
"#,
    )
    .unwrap();

    let config = RecorderFile::load(&path).unwrap();
    config.validate().unwrap();

    let mut engine = TranscriptionEngine::new(config.tempo_map().unwrap(), config.input_kind());
    engine.set_recording_enabled(true);
    let mut layer = NoteLayer::new(LayerId::MicRecording);
    engine.on_playback_started(&layer, 0.0);

    // 2250ms - 250ms delay - 500ms gap = 1500ms = beat 3 at 500ms per beat
    engine.on_input_tick(&mut layer, Some(60), 2250.0);
    assert_eq!(spans(&layer), vec![(3, 4, 60)]);
}

/// Test saving and reloading a config, in both formats
#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = RecorderFile::default();
    config.lyrics = Some("row row row".to_string());
    config.recording.button_pitch = 65;

    let yaml_path = dir.path().join("session.yaml");
    config.save(&yaml_path).unwrap();
    assert_eq!(RecorderFile::load(&yaml_path).unwrap(), config);

    let toml_path = dir.path().join("session.toml");
    std::fs::write(&toml_path, "[tempo]\nbpm = 75.0\n").unwrap();
    let loaded = RecorderFile::load(&toml_path).unwrap();
    assert_eq!(loaded.tempo.bpm, 75.0);

    assert!(RecorderFile::load(dir.path().join("missing.yaml")).is_err());
}
