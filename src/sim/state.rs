//! Game state and core simulation types
//!
//! Everything one session mutates per frame lives here, owned by
//! [`GameState`]. Collaborators are told about what happened through the
//! [`GameEvent`] queue, which the session drains after each frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleField;
use super::pickups::{PickupKind, PowerUpField};
use super::player::Player;
use super::portal::{Orientation, PortalStateMachine};
use crate::consts::BACKDROP_SPEED;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Something external collaborators care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Obstacle hit; `absorbed` when a shield took it
    Hit { absorbed: bool },
    Split,
    Pickup(PickupKind),
    /// Field flipped into the given orientation
    PortalEntered(Orientation),
    GameOver { final_score: u64 },
}

/// Score, difficulty and presentation counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// One point per simulated frame at the target rate
    pub tick_score: u64,
    /// Fractional frames not yet converted to tick score
    pub score_carry: f32,
    /// Signed speed along the primary axis
    pub fall_speed: f32,
    /// Tick score the difficulty ramp is measured from
    pub fall_baseline: u64,
    pub game_over: bool,
    /// Screen shake magnitude (decays to zero)
    pub shake: f32,
    /// Backdrop offset, wraps at the field height
    pub backdrop_scroll: f32,
}

impl SessionStats {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tick_score: 0,
            score_carry: 0.0,
            fall_speed: tuning.start_fall_speed * tuning.start_orientation.fall_sign(),
            fall_baseline: 0,
            game_over: false,
            shake: 0.0,
            backdrop_scroll: 0.0,
        }
    }

    /// Score shown to the player and reported at game over
    pub fn displayed_score(&self) -> u64 {
        self.tick_score / 10
    }

    /// Add `dt` frames worth of score
    pub fn accrue(&mut self, dt: f32) {
        self.score_carry += dt.max(0.0);
        let whole = self.score_carry.floor();
        self.tick_score += whole as u64;
        self.score_carry -= whole;
    }

    /// Unsigned fall speed for the current tick score
    pub fn fall_magnitude(&self, tuning: &Tuning) -> f32 {
        let ramp = self.tick_score.saturating_sub(self.fall_baseline) as f32 * tuning.fall_speed_increase;
        (tuning.start_fall_speed + ramp).min(tuning.max_fall_speed)
    }

    pub fn update_fall_speed(&mut self, orientation: Orientation, tuning: &Tuning) {
        self.fall_speed = orientation.fall_sign() * self.fall_magnitude(tuning);
    }

    /// Re-derive the fall speed after a flip, restarting the ramp unless the
    /// magnitude is preserved
    pub fn on_flip(&mut self, orientation: Orientation, tuning: &Tuning) {
        if !tuning.preserve_magnitude {
            self.fall_baseline = self.tick_score;
        }
        self.update_fall_speed(orientation, tuning);
    }

    pub fn decay_shake(&mut self, dt: f32) {
        self.shake = (self.shake - dt).max(0.0);
    }

    pub fn scroll_backdrop(&mut self, orientation: Orientation, dt: f32, field_height: f32) {
        let dir = match orientation {
            Orientation::Down => 1.0,
            Orientation::Up | Orientation::Side => -1.0,
        };
        self.backdrop_scroll = (self.backdrop_scroll + dir * BACKDROP_SPEED * dt).rem_euclid(field_height);
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub pickups: PowerUpField,
    pub portal: PortalStateMachine,
    pub stats: SessionStats,
    /// Simulated milliseconds (drives zigzag weave)
    pub sim_time_ms: f32,
    /// Fully simulated frames (freeze frames excluded)
    pub frames: u64,
    pub rng: Pcg32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = ObstacleField::new(tuning.start_orientation, 0, &mut rng, &tuning);
        Self {
            seed,
            phase: GamePhase::Playing,
            player: Player::new(&tuning),
            obstacles,
            pickups: PowerUpField::new(),
            portal: PortalStateMachine::new(&tuning),
            stats: SessionStats::new(&tuning),
            sim_time_ms: 0.0,
            frames: 0,
            rng,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.portal.orientation()
    }

    pub fn is_game_over(&self) -> bool {
        self.stats.game_over
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
