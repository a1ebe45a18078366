//! Portal Dodge - a top-down survival dodge simulation
//!
//! Core modules:
//! - `sim`: Simulation core (player, obstacles, pickups, portals, collisions)
//! - `session`: Per-frame orchestration and the host-facing contract
//! - `render`: Draw command list handed to the host renderer
//! - `audio`: Event-to-sound routing for the host mixer
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences and difficulty presets

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use highscores::HighScores;
pub use session::{EventSink, FrameInput, FrameOutcome, NullSink, SimulationSession};
pub use settings::{Difficulty, Level, Settings};
pub use tuning::Tuning;

/// Game configuration constants
///
/// These are the defaults behind [`Tuning::default`]; runtime code reads the
/// tuning values, not these directly.
pub mod consts {
    /// Frame rate the physics constants are expressed against
    pub const TARGET_FPS: f32 = 60.0;
    /// Longest frame the clock will report (seconds)
    pub const MAX_FRAME_SECS: f32 = 0.1;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_ACCEL: f32 = 1.8;
    pub const PLAYER_FRICTION: f32 = 0.82;
    pub const PLAYER_MAX_SPEED: f32 = 11.0;
    /// Velocity components below this snap to zero
    pub const VELOCITY_EPSILON: f32 = 0.1;
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 4;
    /// Distance of the initial spawn point above the bottom edge
    pub const PLAYER_START_INSET: f32 = 100.0;

    /// Fall speed ramp (per tick score point)
    pub const START_FALL_SPEED: f32 = 3.5;
    pub const FALL_SPEED_INCREASE: f32 = 0.0007;
    pub const MAX_FALL_SPEED: f32 = 14.0;

    /// Obstacle population
    pub const BASE_OBSTACLES: usize = 4;
    /// One extra obstacle per this many tick score points
    pub const EXTRA_OBSTACLE_SCORE: u64 = 800;
    pub const EXTRA_OBSTACLE_ALLOWANCE: usize = 11;
    pub const SPLIT_OVERFLOW_ALLOWANCE: usize = 8;
    pub const OBSTACLE_MIN_SIZE: u32 = 20;
    pub const OBSTACLE_MAX_SIZE: u32 = 65;
    /// How far outside the field obstacles may spawn
    pub const SPAWN_DEPTH: f32 = 500.0;
    pub const DRIFT_X: f32 = 1.2;
    pub const DRIFT_Y: f32 = 0.5;
    /// Hitbox inset relative to the sprite bounds
    pub const OBSTACLE_HITBOX_INSET: f32 = 6.0;

    /// Behavior variants
    pub const SPLITTER_CHANCE: f64 = 0.10;
    pub const TRACKER_CHANCE: f64 = 0.30;
    /// Displayed score at which trackers may appear
    pub const TRACKER_MIN_SCORE: u64 = 500;
    pub const ZIGZAG_CHANCE: f64 = 0.30;
    /// Tick score after which zigzags may appear
    pub const ZIGZAG_MIN_TICK_SCORE: u64 = 2500;
    pub const TRACKING_SPEED: f32 = 1.5;
    pub const ZIGZAG_AMPLITUDE: f32 = 4.0;
    pub const ZIGZAG_FREQUENCY: f32 = 0.005;
    pub const ZIGZAG_PHASE_RANGE_MS: f32 = 10_000.0;

    /// Splitting
    pub const SPLIT_TRIGGER_MARGIN: f32 = 40.0;
    pub const SPLIT_CHILD_MIN_SIZE: u32 = 18;
    pub const SPLIT_CHILD_SPREAD: f32 = 3.8;

    /// Pickups
    pub const PICKUP_SIZE: f32 = 40.0;
    pub const PICKUP_SPAWN_CHANCE: f64 = 0.003;
    pub const PICKUP_SHIELD_WEIGHT: f64 = 0.6;
    pub const PICKUP_FALL_FRACTION: f32 = 0.6;
    pub const PICKUP_SPAWN_OFFSET: f32 = 50.0;
    pub const PICKUP_EXIT_MARGIN: f32 = 200.0;

    /// Timers, in frames at the target rate
    pub const SHIELD_FRAMES: f32 = 300.0;
    pub const SHIELD_IMMUNITY_FRAMES: f32 = 60.0;
    pub const HIT_IMMUNITY_FRAMES: f32 = 90.0;
    pub const HIT_FREEZE_FRAMES: f32 = 18.0;
    pub const HIT_SHAKE: f32 = 15.0;
    pub const BLINK_PERIOD_FRAMES: u32 = 5;

    /// Portal
    pub const PORTAL_WIDTH: f32 = 200.0;
    pub const PORTAL_HEIGHT: f32 = 40.0;
    pub const PORTAL_EDGE_INSET: f32 = 20.0;
    /// Displayed score of the first portal, and the gap to each later one
    pub const PORTAL_FIRST_THRESHOLD: u64 = 250;
    pub const PORTAL_THRESHOLD_STEP: u64 = 250;
    pub const PORTAL_HOMING: f32 = 0.05;
    pub const PORTAL_GRACE_FRAMES: f32 = 30.0;
    pub const SIDE_ENTRY_INSET: f32 = 120.0;

    pub const BACKDROP_SPEED: f32 = 1.0;
}
