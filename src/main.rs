//! Portal Dodge headless runner
//!
//! Plays one autopiloted session at a fixed step and logs the result.
//!
//! Usage: `portal-dodge [seed] [easy|medium|hard] [max_frames] [classic|portal|crossfire]`
//!
//! `PORTAL_DODGE_SETTINGS` and `PORTAL_DODGE_TUNING` may hold JSON documents
//! overriding the default settings and balance. The tuning document is laid
//! over the level and difficulty presets.

use portal_dodge::audio::{AudioRouter, SoundEffect, SoundSink};
use portal_dodge::highscores::{HighScores, ScoreRecorder};
use portal_dodge::render::{DrawCommand, DrawSurface};
use portal_dodge::settings::{MemorySettingsStore, SettingsStore};
use portal_dodge::{Difficulty, FrameInput, FrameOutcome, Level, SimulationSession, Tuning, autopilot};

const DEFAULT_SEED: u64 = 12345;
/// Five minutes at the target rate
const DEFAULT_MAX_FRAMES: u64 = 5 * 60 * 60;

/// Logs effects instead of playing them
struct LogSound;

impl SoundSink for LogSound {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music @ {:.2}", volume);
    }
}

/// Counts draw commands per frame
#[derive(Default)]
struct CountingSurface {
    frame_commands: usize,
    peak_commands: usize,
}

impl DrawSurface for CountingSurface {
    fn begin_frame(&mut self) {
        self.frame_commands = 0;
    }

    fn draw(&mut self, _command: &DrawCommand) {
        self.frame_commands += 1;
    }

    fn end_frame(&mut self) {
        self.peak_commands = self.peak_commands.max(self.frame_commands);
    }
}

/// Level and difficulty preset, with `PORTAL_DODGE_TUNING` laid over it
fn load_tuning(level: Level, difficulty: Difficulty) -> Tuning {
    let preset = Tuning::for_level(level, difficulty);
    let Ok(json) = std::env::var("PORTAL_DODGE_TUNING") else {
        return preset;
    };
    match preset.overlay(&json) {
        Ok(tuning) => {
            log::info!("Using custom tuning over the {} / {} preset", level.as_str(), difficulty.as_str());
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring PORTAL_DODGE_TUNING: {}", e);
            preset
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_SEED);
    let store = match std::env::var("PORTAL_DODGE_SETTINGS") {
        Ok(json) => MemorySettingsStore::with_json(json),
        Err(_) => MemorySettingsStore::new(),
    };
    let mut settings = store.load();
    if let Some(difficulty) = args.next().and_then(|s| Difficulty::from_str(&s)) {
        settings.difficulty = difficulty;
    }
    let difficulty = settings.difficulty;
    let max_frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_FRAMES);
    if let Some(level) = args.next().and_then(|s| Level::from_str(&s)) {
        settings.level = level;
    }
    let level = settings.level;

    log::info!("Portal Dodge (headless) starting...");
    log::info!(
        "Seed {}, level {}, difficulty {}, frame limit {}",
        seed,
        level.as_str(),
        difficulty.as_str(),
        max_frames
    );

    let sink = (
        AudioRouter::with_settings(LogSound, &settings),
        ScoreRecorder::new(HighScores::new(), level, difficulty),
    );
    let tuning = load_tuning(level, difficulty);
    let mut session = SimulationSession::new(tuning, seed, sink);
    session.set_shake_enabled(settings.effective_screen_shake());
    let mut surface = CountingSurface::default();

    let mut frames = 0;
    let mut outcome = FrameOutcome::Running;
    while frames < max_frames && outcome == FrameOutcome::Running {
        let input = FrameInput {
            intent: autopilot::steer(session.state()),
            ..Default::default()
        };
        outcome = session.advance_with_dt(&input, 1.0, &mut surface);
        frames += 1;
    }

    log::info!(
        "Finished after {} frames: {:?}, score {}, lives {}, orientation {}",
        frames,
        outcome,
        session.score(),
        session.lives(),
        session.orientation().as_str()
    );
    log::info!("Peak draw commands per frame: {}", surface.peak_commands);

    let (_, recorder) = session.into_sink();
    if let Some(rank) = recorder.last_rank() {
        log::info!("Leaderboard rank {}", rank);
    }
    match recorder.scores().to_json() {
        Ok(json) => log::debug!("Leaderboard: {}", json),
        Err(e) => log::warn!("Could not serialize leaderboard: {}", e),
    }
}
