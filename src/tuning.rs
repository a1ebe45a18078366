//! Data-driven game balance
//!
//! [`Tuning`] mirrors every constant in [`crate::consts`]. Hosts can ship a
//! JSON document that overrides any subset of the fields; missing keys keep
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{Difficulty, Level};
use crate::sim::portal::Orientation;

/// Runtime-tunable balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Level ===
    /// Orientation a run starts in
    pub start_orientation: Orientation,
    /// Whether score thresholds open portals
    pub portals_enabled: bool,
    /// Obstacles come from both ends of the fall axis
    pub crossfire: bool,

    // === Player ===
    pub player_radius: f32,
    pub player_accel: f32,
    pub player_friction: f32,
    pub player_max_speed: f32,
    pub velocity_epsilon: f32,
    pub start_lives: u32,
    pub max_lives: u32,
    /// Distance of the down/up entry points from the edge behind the player
    pub player_start_inset: f32,
    /// Distance of the side entry point from the left edge
    pub side_entry_inset: f32,

    // === Fall speed ===
    pub start_fall_speed: f32,
    pub fall_speed_increase: f32,
    pub max_fall_speed: f32,
    /// Keep the accumulated fall speed across an orientation flip instead of
    /// restarting the ramp from `start_fall_speed`
    pub preserve_magnitude: bool,

    // === Obstacles ===
    pub base_obstacles: usize,
    pub extra_obstacle_score: u64,
    pub extra_obstacle_allowance: usize,
    pub split_overflow_allowance: usize,
    pub obstacle_min_size: u32,
    pub obstacle_max_size: u32,
    pub spawn_depth: f32,
    pub drift_x: f32,
    pub drift_y: f32,
    pub hitbox_inset: f32,
    pub splitter_chance: f64,
    pub tracker_chance: f64,
    pub tracker_min_score: u64,
    pub zigzag_chance: f64,
    pub zigzag_min_tick_score: u64,
    pub tracking_speed: f32,
    pub zigzag_amplitude: f32,
    pub zigzag_frequency: f32,

    // === Splitting ===
    pub split_trigger_margin: f32,
    pub split_child_min_size: u32,
    pub split_child_spread: f32,

    // === Pickups ===
    pub pickup_size: f32,
    pub pickup_spawn_chance: f64,
    pub pickup_shield_weight: f64,
    pub pickup_fall_fraction: f32,
    /// Distance outside the leading edge (and from the side edges) pickups spawn at
    pub pickup_spawn_offset: f32,
    /// How far past either edge a pickup may travel before it is dropped
    pub pickup_exit_margin: f32,

    // === Timers (frames) ===
    pub shield_frames: f32,
    pub shield_immunity_frames: f32,
    pub hit_immunity_frames: f32,
    pub hit_freeze_frames: f32,
    pub hit_shake: f32,

    // === Portal ===
    pub portal_first_threshold: u64,
    pub portal_threshold_step: u64,
    pub portal_homing: f32,
    pub portal_grace_frames: f32,
    pub portal_width: f32,
    pub portal_height: f32,
    pub portal_edge_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            start_orientation: Orientation::Down,
            portals_enabled: true,
            crossfire: false,

            player_radius: PLAYER_RADIUS,
            player_accel: PLAYER_ACCEL,
            player_friction: PLAYER_FRICTION,
            player_max_speed: PLAYER_MAX_SPEED,
            velocity_epsilon: VELOCITY_EPSILON,
            start_lives: START_LIVES,
            max_lives: MAX_LIVES,
            player_start_inset: PLAYER_START_INSET,
            side_entry_inset: SIDE_ENTRY_INSET,

            start_fall_speed: START_FALL_SPEED,
            fall_speed_increase: FALL_SPEED_INCREASE,
            max_fall_speed: MAX_FALL_SPEED,
            preserve_magnitude: true,

            base_obstacles: BASE_OBSTACLES,
            extra_obstacle_score: EXTRA_OBSTACLE_SCORE,
            extra_obstacle_allowance: EXTRA_OBSTACLE_ALLOWANCE,
            split_overflow_allowance: SPLIT_OVERFLOW_ALLOWANCE,
            obstacle_min_size: OBSTACLE_MIN_SIZE,
            obstacle_max_size: OBSTACLE_MAX_SIZE,
            spawn_depth: SPAWN_DEPTH,
            drift_x: DRIFT_X,
            drift_y: DRIFT_Y,
            hitbox_inset: OBSTACLE_HITBOX_INSET,
            splitter_chance: SPLITTER_CHANCE,
            tracker_chance: TRACKER_CHANCE,
            tracker_min_score: TRACKER_MIN_SCORE,
            zigzag_chance: ZIGZAG_CHANCE,
            zigzag_min_tick_score: ZIGZAG_MIN_TICK_SCORE,
            tracking_speed: TRACKING_SPEED,
            zigzag_amplitude: ZIGZAG_AMPLITUDE,
            zigzag_frequency: ZIGZAG_FREQUENCY,

            split_trigger_margin: SPLIT_TRIGGER_MARGIN,
            split_child_min_size: SPLIT_CHILD_MIN_SIZE,
            split_child_spread: SPLIT_CHILD_SPREAD,

            pickup_size: PICKUP_SIZE,
            pickup_spawn_chance: PICKUP_SPAWN_CHANCE,
            pickup_shield_weight: PICKUP_SHIELD_WEIGHT,
            pickup_fall_fraction: PICKUP_FALL_FRACTION,
            pickup_spawn_offset: PICKUP_SPAWN_OFFSET,
            pickup_exit_margin: PICKUP_EXIT_MARGIN,

            shield_frames: SHIELD_FRAMES,
            shield_immunity_frames: SHIELD_IMMUNITY_FRAMES,
            hit_immunity_frames: HIT_IMMUNITY_FRAMES,
            hit_freeze_frames: HIT_FREEZE_FRAMES,
            hit_shake: HIT_SHAKE,

            portal_first_threshold: PORTAL_FIRST_THRESHOLD,
            portal_threshold_step: PORTAL_THRESHOLD_STEP,
            portal_homing: PORTAL_HOMING,
            portal_grace_frames: PORTAL_GRACE_FRAMES,
            portal_width: PORTAL_WIDTH,
            portal_height: PORTAL_HEIGHT,
            portal_edge_inset: PORTAL_EDGE_INSET,
        }
    }
}

impl Tuning {
    /// Default balance with a difficulty preset applied
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.apply_difficulty(difficulty);
        tuning
    }

    /// Default balance for a level played at a difficulty
    pub fn for_level(level: Level, difficulty: Difficulty) -> Self {
        let mut tuning = Self::for_difficulty(difficulty);
        tuning.apply_level(level);
        tuning
    }

    /// Overwrite the preset-dependent fields
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.base_obstacles = difficulty.base_obstacles();
        self.start_fall_speed = difficulty.start_fall_speed();
    }

    pub fn apply_level(&mut self, level: Level) {
        self.start_orientation = level.start_orientation();
        self.portals_enabled = level.portals_enabled();
        self.crossfire = level.crossfire();
    }

    /// Hard upper bound on the obstacle population
    pub fn obstacle_cap(&self) -> usize {
        self.base_obstacles + self.extra_obstacle_allowance + self.split_overflow_allowance
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Apply a (possibly partial) JSON document on top of `self`
    ///
    /// Keys missing from the document keep their current values rather than
    /// the crate defaults, so presets survive partial overrides.
    pub fn overlay(&self, json: &str) -> Result<Self, ConfigError> {
        let patch: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(patch) = patch else {
            return Err(ConfigError::invalid("tuning", "expected a JSON object"));
        };
        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(patch);
        }
        let tuning: Tuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width <= 2.0 * self.player_radius
            || self.field_height <= 2.0 * self.player_radius
        {
            return Err(ConfigError::invalid(
                "field_width/field_height",
                "field must be larger than the player",
            ));
        }
        if self.pickup_size <= 0.0 || self.pickup_spawn_offset < 0.0 {
            return Err(ConfigError::invalid(
                "pickup_size/pickup_spawn_offset",
                "size must be positive and offset non-negative",
            ));
        }
        // Pickups spawn `pickup_spawn_offset` away from both side edges
        let pickup_span = 2.0 * self.pickup_spawn_offset + self.pickup_size;
        if self.field_width < pickup_span || self.field_height < pickup_span {
            return Err(ConfigError::invalid(
                "field_width/field_height",
                format!("field must be at least {pickup_span} on each axis to place pickups"),
            ));
        }
        if self.drift_x < 0.0 || self.drift_y < 0.0 || self.spawn_depth < 0.0 {
            return Err(ConfigError::invalid(
                "drift_x/drift_y/spawn_depth",
                "must not be negative",
            ));
        }
        if self.player_radius <= 0.0 {
            return Err(ConfigError::invalid("player_radius", "must be positive"));
        }
        if !(self.player_friction > 0.0 && self.player_friction <= 1.0) {
            return Err(ConfigError::invalid("player_friction", "must be in (0, 1]"));
        }
        if self.player_max_speed <= 0.0 {
            return Err(ConfigError::invalid("player_max_speed", "must be positive"));
        }
        if self.max_lives == 0 || self.start_lives == 0 || self.start_lives > self.max_lives {
            return Err(ConfigError::invalid(
                "start_lives",
                format!("must be in 1..={}", self.max_lives),
            ));
        }
        if self.obstacle_min_size == 0 || self.obstacle_min_size > self.obstacle_max_size {
            return Err(ConfigError::invalid(
                "obstacle_min_size",
                "must be positive and not above obstacle_max_size",
            ));
        }
        if self.obstacle_max_size as f32 >= self.field_width.min(self.field_height) {
            return Err(ConfigError::invalid(
                "obstacle_max_size",
                "must fit inside the field",
            ));
        }
        if self.split_child_min_size == 0 {
            return Err(ConfigError::invalid("split_child_min_size", "must be positive"));
        }
        if self.base_obstacles == 0 {
            return Err(ConfigError::invalid("base_obstacles", "must be positive"));
        }
        if self.extra_obstacle_score == 0 {
            return Err(ConfigError::invalid("extra_obstacle_score", "must be positive"));
        }
        if self.portal_threshold_step == 0 {
            return Err(ConfigError::invalid("portal_threshold_step", "must be positive"));
        }
        for (field, p) in [
            ("splitter_chance", self.splitter_chance),
            ("tracker_chance", self.tracker_chance),
            ("zigzag_chance", self.zigzag_chance),
            ("pickup_spawn_chance", self.pickup_spawn_chance),
            ("pickup_shield_weight", self.pickup_shield_weight),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(field, "probability must be in [0, 1]"));
            }
        }
        if self.start_fall_speed < 0.0 || self.max_fall_speed < self.start_fall_speed {
            return Err(ConfigError::invalid(
                "max_fall_speed",
                "must be at least start_fall_speed",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, TickInput, tick};

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(Tuning::for_difficulty(d).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_obstacles": 7, "preserve_magnitude": false }"#)
            .unwrap();
        assert_eq!(tuning.base_obstacles, 7);
        assert!(!tuning.preserve_magnitude);
        assert_eq!(tuning.player_max_speed, PLAYER_MAX_SPEED);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "player_friction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "player_friction", .. }));

        let err = Tuning::from_json(r#"{ "obstacle_min_size": 80 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_field_must_fit_pickups() {
        let err = Tuning::from_json(
            r#"{ "field_width": 90, "field_height": 90, "obstacle_max_size": 60, "pickup_spawn_chance": 1.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field_width/field_height", .. }));

        // 2 * 50 + 40 is just enough
        let tuning = Tuning::from_json(
            r#"{ "field_width": 140, "field_height": 140, "obstacle_max_size": 60, "pickup_spawn_chance": 1.0 }"#,
        )
        .unwrap();
        assert!(Tuning::from_json(r#"{ "field_width": 139, "obstacle_max_size": 60 }"#).is_err());

        let mut state = GameState::new(3, tuning);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert!(state.frames > 0);
    }

    #[test]
    fn test_rejects_negative_drift() {
        let err = Tuning::from_json(r#"{ "drift_x": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_overlay_keeps_preset() {
        let hard = Tuning::for_difficulty(Difficulty::Hard);
        let tuning = hard.overlay(r#"{ "player_max_speed": 9.0 }"#).unwrap();
        assert_eq!(tuning.player_max_speed, 9.0);
        assert_eq!(tuning.base_obstacles, Difficulty::Hard.base_obstacles());
        assert_eq!(tuning.start_fall_speed, Difficulty::Hard.start_fall_speed());

        assert!(matches!(hard.overlay("[1, 2]"), Err(ConfigError::Invalid { .. })));
        assert!(matches!(hard.overlay("{ nope"), Err(ConfigError::Parse(_))));
        assert!(hard.overlay(r#"{ "player_friction": 2.0 }"#).is_err());
    }

    #[test]
    fn test_level_presets() {
        let classic = Tuning::for_level(Level::Classic, Difficulty::Easy);
        assert!(!classic.portals_enabled);
        assert_eq!(classic.start_orientation, Orientation::Down);
        assert_eq!(classic.base_obstacles, Difficulty::Easy.base_obstacles());

        let crossfire = Tuning::for_level(Level::Crossfire, Difficulty::Medium);
        assert!(crossfire.crossfire && !crossfire.portals_enabled);
        assert_eq!(crossfire.start_orientation, Orientation::Side);

        assert_eq!(Tuning::for_level(Level::Portal, Difficulty::Medium), Tuning::for_difficulty(Difficulty::Medium));
    }

    #[test]
    fn test_obstacle_cap() {
        let tuning = Tuning::default();
        assert_eq!(
            tuning.obstacle_cap(),
            BASE_OBSTACLES + EXTRA_OBSTACLE_ALLOWANCE + SPLIT_OVERFLOW_ALLOWANCE
        );
    }
}
