//! Simulation session
//!
//! [`SimulationSession`] is what the host drives: one [`advance`] call per
//! frame runs the update pass, hands the frame to the [`DrawSurface`], and
//! only then delivers the frame's events to the [`EventSink`].
//!
//! [`advance`]: SimulationSession::advance

use crate::render::{self, DrawSurface};
use crate::settings::Settings;
use crate::sim::clock::FrameClock;
use crate::sim::pickups::PickupKind;
use crate::sim::player::MovementIntent;
use crate::sim::portal::Orientation;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Fire-and-forget notifications for audio, persistence and the like
pub trait EventSink {
    /// Obstacle hit; `absorbed` when a shield took it
    fn on_hit(&mut self, _absorbed: bool) {}
    fn on_split(&mut self) {}
    fn on_pickup(&mut self, _kind: PickupKind) {}
    fn on_portal_enter(&mut self, _orientation: Orientation) {}
    /// Called exactly once per run
    fn on_game_over(&mut self, _final_score: u64) {}
}

impl GameEvent {
    /// Deliver to the matching sink method
    pub fn dispatch<S: EventSink + ?Sized>(self, sink: &mut S) {
        match self {
            GameEvent::Hit { absorbed } => sink.on_hit(absorbed),
            GameEvent::Split => sink.on_split(),
            GameEvent::Pickup(kind) => sink.on_pickup(kind),
            GameEvent::PortalEntered(orientation) => sink.on_portal_enter(orientation),
            GameEvent::GameOver { final_score } => sink.on_game_over(final_score),
        }
    }
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Records events in order
impl EventSink for Vec<GameEvent> {
    fn on_hit(&mut self, absorbed: bool) {
        self.push(GameEvent::Hit { absorbed });
    }

    fn on_split(&mut self) {
        self.push(GameEvent::Split);
    }

    fn on_pickup(&mut self, kind: PickupKind) {
        self.push(GameEvent::Pickup(kind));
    }

    fn on_portal_enter(&mut self, orientation: Orientation) {
        self.push(GameEvent::PortalEntered(orientation));
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.push(GameEvent::GameOver { final_score });
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_hit(&mut self, absorbed: bool) {
        (**self).on_hit(absorbed);
    }

    fn on_split(&mut self) {
        (**self).on_split();
    }

    fn on_pickup(&mut self, kind: PickupKind) {
        (**self).on_pickup(kind);
    }

    fn on_portal_enter(&mut self, orientation: Orientation) {
        (**self).on_portal_enter(orientation);
    }

    fn on_game_over(&mut self, final_score: u64) {
        (**self).on_game_over(final_score);
    }
}

/// Fan out to two sinks (e.g. audio and the leaderboard)
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn on_hit(&mut self, absorbed: bool) {
        self.0.on_hit(absorbed);
        self.1.on_hit(absorbed);
    }

    fn on_split(&mut self) {
        self.0.on_split();
        self.1.on_split();
    }

    fn on_pickup(&mut self, kind: PickupKind) {
        self.0.on_pickup(kind);
        self.1.on_pickup(kind);
    }

    fn on_portal_enter(&mut self, orientation: Orientation) {
        self.0.on_portal_enter(orientation);
        self.1.on_portal_enter(orientation);
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.0.on_game_over(final_score);
        self.1.on_game_over(final_score);
    }
}

/// Host input snapshot for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub intent: MovementIntent,
    /// Pause toggle
    pub pause: bool,
    pub quit: bool,
}

/// Result of one [`SimulationSession::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Running,
    Paused,
    /// Quit requested; nothing was simulated, drawn or reported
    Quit,
    GameOver,
}

/// Owns one run of the game and everything it talks to
pub struct SimulationSession<S: EventSink = NullSink> {
    state: GameState,
    clock: FrameClock,
    sink: S,
    shake_enabled: bool,
}

impl<S: EventSink> SimulationSession<S> {
    pub fn new(tuning: Tuning, seed: u64, sink: S) -> Self {
        log::info!("Starting session (seed {})", seed);
        Self {
            state: GameState::new(seed, tuning),
            clock: FrameClock::default(),
            sink,
            shake_enabled: true,
        }
    }

    /// Session using the level, difficulty and motion preferences from `settings`
    pub fn with_settings(settings: &Settings, seed: u64, sink: S) -> Self {
        let tuning = Tuning::for_level(settings.level, settings.difficulty);
        let mut session = Self::new(tuning, seed, sink);
        session.shake_enabled = settings.effective_screen_shake();
        log::debug!(
            "Level {}, difficulty {} (shake {})",
            settings.level.as_str(),
            settings.difficulty.as_str(),
            session.shake_enabled
        );
        session
    }

    /// Restart with a fresh state; the sink and tuning are kept
    pub fn start(&mut self, seed: u64) {
        log::info!("Restarting session (seed {})", seed);
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.clock.reset();
    }

    /// Run one frame, timed by the session's clock
    pub fn advance(&mut self, input: &FrameInput, surface: &mut dyn DrawSurface) -> FrameOutcome {
        if input.quit {
            return FrameOutcome::Quit;
        }
        if self.state.phase == GamePhase::Paused {
            // Time spent paused is not simulated
            self.clock.reset();
        }
        let dt = self.clock.tick();
        self.advance_with_dt(input, dt, surface)
    }

    /// Run one frame with an explicit step (1.0 = one frame at the target rate)
    pub fn advance_with_dt(&mut self, input: &FrameInput, dt: f32, surface: &mut dyn DrawSurface) -> FrameOutcome {
        if input.quit {
            return FrameOutcome::Quit;
        }

        let tick_input = TickInput {
            intent: input.intent,
            pause: input.pause,
        };
        tick(&mut self.state, &tick_input, dt);

        surface.begin_frame();
        for command in render::frame_commands(&self.state, self.shake_enabled) {
            surface.draw(&command);
        }
        surface.end_frame();

        for event in self.state.drain_events() {
            event.dispatch(&mut self.sink);
        }

        match self.state.phase {
            GamePhase::Playing => FrameOutcome::Running,
            GamePhase::Paused => FrameOutcome::Paused,
            GamePhase::GameOver => FrameOutcome::GameOver,
        }
    }

    /// Displayed score
    pub fn score(&self) -> u64 {
        self.state.stats.displayed_score()
    }

    pub fn tick_score(&self) -> u64 {
        self.state.stats.tick_score
    }

    pub fn lives(&self) -> u32 {
        self.state.player.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation()
    }

    pub fn shake_enabled(&self) -> bool {
        self.shake_enabled
    }

    pub fn set_shake_enabled(&mut self, enabled: bool) {
        self.shake_enabled = enabled;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that stage situations
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
