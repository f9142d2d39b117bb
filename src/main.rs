// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use rand::Rng;
use tracing::Level;

use pitchrec::{
    InputEvent, InputKind, LyricsDispenser, NoteLayer, PlaybackClock, RecorderFile,
    TempoMap, TranscriptionEngine,
};

/// A space press counts as held this long without a release event
const HOLD_WINDOW: Duration = Duration::from_millis(600);

fn print_usage() {
    println!("PITCHREC - Real-time note recording");
    println!();
    println!("Usage: pitchrec [--verbose] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --check-config <FILE>          Load and validate a recorder config");
    println!("  --simulate <FILE> [SECONDS]    Record a simulated singer (default 20s)");
    println!("  --tap <FILE> [SECONDS]         Record by holding space (default 20s)");
    println!("  --help                         Show this help message");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &str) -> Result<RecorderFile> {
    let config = RecorderFile::load(path)?;
    config.validate()?;
    Ok(config)
}

fn print_notes(layer: &NoteLayer) {
    for (_, note) in layer.sorted() {
        println!(
            "  [{:>5}, {:>5})  pitch {:>3}  {}",
            note.start_beat, note.end_beat, note.pitch, note.text
        );
    }
}

fn check_config(path: &str) -> Result<()> {
    let config = load_config(path)?;
    let tempo = config.tempo_map()?;

    println!("Config OK: {}", path);
    println!("  Tempo: {} BPM, gap {}ms", tempo.bpm(), tempo.gap_ms());
    match config.input_kind() {
        InputKind::Microphone { delay_ms } => println!("  Input: microphone, delay {}ms", delay_ms),
        InputKind::Button { pitch } => println!("  Input: button, pitch {}", pitch),
    }
    let words = config
        .lyrics
        .as_deref()
        .map_or(0, |text| text.split_whitespace().count());
    println!("  Lyrics: {} words", words);
    Ok(())
}

/// Next polling gap for the simulated singer, up to two and a half beats
fn poll_interval_ms(rng: &mut impl Rng, beat_ms: f64) -> f64 {
    rng.gen_range(20.0..(beat_ms * 2.5).max(21.0))
}

fn simulate(path: &str, seconds: f64) -> Result<()> {
    let config = load_config(path)?;
    let tempo = config.tempo_map()?;
    let beat_ms = tempo.beat_duration_ms();
    let delay_ms = config.recording.mic_delay_ms;
    let duration_ms = seconds * 1000.0;

    let mut engine = TranscriptionEngine::new(tempo, InputKind::Microphone { delay_ms });
    let mut layer = NoteLayer::new(engine.input().layer());

    // Existing notes for the recording to run over
    for start in (0..tempo.beat_at(duration_ms)).step_by(4) {
        layer.add(48, start, start + 2, "old");
    }
    println!("Layer before recording: {} notes", layer.len());

    let melody = [60, 62, 64, 65, 67, 65, 64, 62];
    let mut rng = rand::thread_rng();
    let mut clock = PlaybackClock::new();
    let mut checkpoints = 0u32;
    let mut jumped = false;

    engine.set_recording_enabled(true);
    let started = clock.start(0.0);
    engine.on_playback_event(&layer, &mut || checkpoints += 1, started);

    while clock.position_ms() < duration_ms {
        // Coarse, uneven polling so some ticks skip several beats
        let poll_ms = poll_interval_ms(&mut rng, beat_ms);
        clock.advance(Duration::from_secs_f64(poll_ms / 1000.0));
        let position = clock.position_ms();

        if !jumped && position > duration_ms / 2.0 {
            jumped = true;
            if let Some(event) = clock.seek(position - beat_ms * 4.0) {
                println!("Jumping back 4 beats at {:.0}ms", position);
                engine.on_playback_event(&layer, &mut || checkpoints += 1, event);
            }
            continue;
        }

        let observation = if rng.gen_bool(0.1) {
            InputEvent::NoPitch
        } else {
            let beat = tempo.beat_at(position - delay_ms).max(0);
            let jitter = if rng.gen_bool(0.05) { rng.gen_range(-1..=1) } else { 0 };
            InputEvent::PitchObserved(melody[(beat / 2) as usize % melody.len()] + jitter)
        };
        engine.on_input_event(&mut layer, observation, position);
    }

    let stopped = clock.stop();
    engine.on_playback_event(&layer, &mut || checkpoints += 1, stopped);

    println!("Layer after recording:");
    print_notes(&layer);
    if let Some((first, second)) = layer.find_overlap() {
        bail!("Overlapping notes left in layer: {:?} and {:?}", first, second);
    }
    println!("{} notes, {} undo checkpoint(s)", layer.len(), checkpoints);
    Ok(())
}

fn tap(path: &str, seconds: f64) -> Result<()> {
    let config = load_config(path)?;
    let tempo = config.tempo_map()?;
    let pitch = config.recording.button_pitch;

    let input = InputKind::Button { pitch };
    let mut engine = TranscriptionEngine::with_text(tempo, input, config.lyrics_dispenser());
    let mut layer = NoteLayer::new(engine.input().layer());
    let mut clock = PlaybackClock::new();
    let mut checkpoints = 0u32;

    println!(
        "Hold SPACE to record, q to stop ({}s at {} BPM)",
        seconds,
        engine.tempo().bpm()
    );

    engine.set_recording_enabled(true);
    let started = clock.start(0.0);
    engine.on_playback_event(&layer, &mut || checkpoints += 1, started);

    terminal::enable_raw_mode()?;
    let result = tap_loop(&mut engine, &mut layer, &mut clock, seconds * 1000.0);
    terminal::disable_raw_mode()?;
    result?;

    let stopped = clock.stop();
    engine.on_playback_event(&layer, &mut || checkpoints += 1, stopped);

    println!("Recorded notes:");
    print_notes(&layer);
    println!(
        "{} notes, {} undo checkpoint(s), {} lyrics left",
        layer.len(),
        checkpoints,
        engine.text_supplier().remaining().split_whitespace().count()
    );
    Ok(())
}

fn tap_loop<T: TempoMap>(
    engine: &mut TranscriptionEngine<T, LyricsDispenser>,
    layer: &mut NoteLayer,
    clock: &mut PlaybackClock,
    duration_ms: f64,
) -> Result<()> {
    let mut last_press: Option<Instant> = None;

    while clock.position_ms() < duration_ms {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char(' ') => {
                        last_press = match key.kind {
                            KeyEventKind::Release => None,
                            _ => Some(Instant::now()),
                        };
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                }
            }
        }

        let position = clock.tick();
        let held = last_press.map_or(false, |pressed| pressed.elapsed() < HOLD_WINDOW);
        let observation = if held {
            InputEvent::ButtonHeld
        } else {
            InputEvent::ButtonReleased
        };
        engine.on_input_event(layer, observation, position);
    }

    Ok(())
}

fn parse_seconds(arg: Option<&String>) -> Result<f64> {
    match arg {
        Some(text) => {
            let seconds: f64 = text
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid duration in seconds: {}", text))?;
            if !(seconds > 0.0) {
                bail!("Duration must be positive: {}", text);
            }
            Ok(seconds)
        }
        None => Ok(20.0),
    }
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    args.retain(|a| a != "--verbose" && a != "-v");
    init_logging(verbose);

    if args.len() < 2 {
        println!("PITCHREC - Real-time note recording");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--check-config" | "--simulate" | "--tap" if args.len() < 3 => {
            eprintln!("Error: {} requires a config file", args[1]);
            print_usage();
            std::process::exit(1);
        }
        "--check-config" => check_config(&args[2])?,
        "--simulate" => simulate(&args[2], parse_seconds(args.get(3))?)?,
        "--tap" => tap(&args[2], parse_seconds(args.get(3))?)?,
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
