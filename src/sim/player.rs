//! Player entity and movement
//!
//! Acceleration/friction movement with a speed cap, integrated with the
//! normalized frame step so it behaves the same at any frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::BLINK_PERIOD_FRAMES;
use crate::tuning::Tuning;

/// Directional input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    /// -1, 0 or +1 per axis (opposite keys cancel)
    pub fn direction(&self) -> (f32, f32) {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        (x, y)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lives: u32,
    pub shield_active: bool,
    /// Frames of shield left
    pub shield_timer: f32,
    /// Frames during which obstacle hits are ignored
    pub immunity_timer: f32,
    /// Frames the simulation stays frozen after taking damage
    pub hit_freeze_timer: f32,
}

impl Player {
    /// Fresh player at the entry point of the starting orientation
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.start_orientation.entry_point(tuning),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            lives: tuning.start_lives,
            shield_active: false,
            shield_timer: 0.0,
            immunity_timer: 0.0,
            hit_freeze_timer: 0.0,
        }
    }

    /// Square bounding box (used for portal and pickup overlap)
    pub fn bounds(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// Whether the sprite is drawn this frame (blinks while immune)
    pub fn blink_visible(&self) -> bool {
        let frames = self.immunity_timer.max(0.0) as u32;
        frames == 0 || (frames / BLINK_PERIOD_FRAMES) % 2 == 0
    }

    pub fn is_immune(&self) -> bool {
        self.immunity_timer > 0.0
    }

    /// Count down immunity and shield; the shield drops when it runs out
    pub fn tick_timers(&mut self, dt: f32) {
        self.immunity_timer = (self.immunity_timer - dt).max(0.0);
        if self.shield_active {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.shield_active = false;
                self.shield_timer = 0.0;
            }
        }
    }

    /// Integrate one frame of movement and clamp to the field
    ///
    /// With `suppressed` set (portal homing) input is ignored and both axes
    /// coast down under friction.
    pub fn update(&mut self, intent: MovementIntent, dt: f32, suppressed: bool, tuning: &Tuning) {
        let (ix, iy) = if suppressed {
            (0.0, 0.0)
        } else {
            intent.direction()
        };
        let decay = tuning.player_friction.powf(dt);

        if ix != 0.0 {
            self.vel.x += ix * tuning.player_accel * dt;
        } else {
            self.vel.x *= decay;
        }
        if iy != 0.0 {
            self.vel.y += iy * tuning.player_accel * dt;
        } else {
            self.vel.y *= decay;
        }

        let speed = self.vel.length();
        if speed > tuning.player_max_speed && speed > 0.0 {
            self.vel *= tuning.player_max_speed / speed;
        }

        if self.vel.x.abs() < tuning.velocity_epsilon {
            self.vel.x = 0.0;
        }
        if self.vel.y.abs() < tuning.velocity_epsilon {
            self.vel.y = 0.0;
        }

        self.pos += self.vel * dt;
        self.clamp_to_field(tuning);
    }

    /// Keep the whole circle inside the field
    pub fn clamp_to_field(&mut self, tuning: &Tuning) {
        let r = self.radius;
        self.pos.x = self.pos.x.clamp(r, tuning.field_width - r);
        self.pos.y = self.pos.y.clamp(r, tuning.field_height - r);
    }

    /// Move to a fixed point and stop dead
    pub fn place(&mut self, pos: Vec2, tuning: &Tuning) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.clamp_to_field(tuning);
    }
}
