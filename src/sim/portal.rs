//! Portal state machine and field orientation
//!
//! Once the displayed score reaches the next threshold a portal opens at the
//! edge obstacles come from. The player is pulled in (input suppressed), and
//! touching the portal flips the field: down -> up -> side. Side is final.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Rect};
use super::player::Player;
use crate::tuning::Tuning;

/// Effective "down" direction of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Obstacles fall from the top
    #[default]
    Down,
    /// Obstacles rise from the bottom
    Up,
    /// Obstacles sweep in from the right
    Side,
}

impl Orientation {
    /// Orientation after the next portal (None once sideways)
    pub fn next(self) -> Option<Orientation> {
        match self {
            Orientation::Down => Some(Orientation::Up),
            Orientation::Up => Some(Orientation::Side),
            Orientation::Side => None,
        }
    }

    /// Axis obstacles travel along
    pub fn primary_axis(self) -> Axis {
        match self {
            Orientation::Down | Orientation::Up => Axis::Y,
            Orientation::Side => Axis::X,
        }
    }

    pub fn secondary_axis(self) -> Axis {
        self.primary_axis().other()
    }

    /// Sign of the fall speed along the primary axis
    pub fn fall_sign(self) -> f32 {
        match self {
            Orientation::Down => 1.0,
            Orientation::Up | Orientation::Side => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Down => "down",
            Orientation::Up => "up",
            Orientation::Side => "side",
        }
    }

    /// Where the player is placed when this orientation begins
    pub fn entry_point(self, tuning: &Tuning) -> Vec2 {
        let (w, h) = (tuning.field_width, tuning.field_height);
        match self {
            Orientation::Down => Vec2::new(w / 2.0, h - tuning.player_start_inset),
            Orientation::Up => Vec2::new(w / 2.0, tuning.player_start_inset),
            Orientation::Side => Vec2::new(tuning.side_entry_inset, h / 2.0),
        }
    }
}

/// Portal progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortalPhase {
    /// No portal open
    #[default]
    Idle,
    /// Portal open, player being pulled in
    Approaching,
    /// Field just flipped; short grace period before normal play
    Transitioning,
}

/// Result of one portal update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalStep {
    None,
    /// The player reached the portal this frame
    Entered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalStateMachine {
    orientation: Orientation,
    phase: PortalPhase,
    /// Displayed score that opens the next portal
    next_threshold: u64,
    /// Frames left in the post-flip grace period
    grace_timer: f32,
}

impl PortalStateMachine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            orientation: tuning.start_orientation,
            phase: PortalPhase::Idle,
            next_threshold: tuning.portal_first_threshold,
            grace_timer: 0.0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn phase(&self) -> PortalPhase {
        self.phase
    }

    pub fn next_threshold(&self) -> u64 {
        self.next_threshold
    }

    /// Player input is suppressed while being pulled in
    pub fn is_homing(&self) -> bool {
        self.phase == PortalPhase::Approaching
    }

    /// Collisions and pickup spawns pause while a portal is in progress
    pub fn is_busy(&self) -> bool {
        self.phase != PortalPhase::Idle
    }

    /// Portal rectangle for the current orientation (None once sideways)
    pub fn portal_rect(&self, tuning: &Tuning) -> Option<Rect> {
        self.orientation.next()?;
        let size = Vec2::new(tuning.portal_width, tuning.portal_height);
        let x = tuning.field_width / 2.0 - size.x / 2.0;
        let y = match self.orientation {
            Orientation::Down => tuning.portal_edge_inset,
            _ => tuning.field_height - tuning.portal_edge_inset - size.y,
        };
        Some(Rect::new(Vec2::new(x, y), size))
    }

    /// Open the portal on a threshold crossing, pull the player in, and report
    /// when the player reaches it
    pub fn update(&mut self, displayed_score: u64, player: &mut Player, dt: f32, tuning: &Tuning) -> PortalStep {
        match self.phase {
            PortalPhase::Idle => {
                if tuning.portals_enabled
                    && self.orientation.next().is_some()
                    && displayed_score >= self.next_threshold
                {
                    log::debug!(
                        "Portal opening at score {} ({} -> next)",
                        displayed_score,
                        self.orientation.as_str()
                    );
                    self.phase = PortalPhase::Approaching;
                }
            }
            PortalPhase::Transitioning => {
                self.grace_timer -= dt;
                if self.grace_timer <= 0.0 {
                    self.grace_timer = 0.0;
                    self.phase = PortalPhase::Idle;
                }
            }
            PortalPhase::Approaching => {}
        }

        if self.phase != PortalPhase::Approaching {
            return PortalStep::None;
        }
        let Some(rect) = self.portal_rect(tuning) else {
            // Nothing to approach; drop back to idle
            self.phase = PortalPhase::Idle;
            return PortalStep::None;
        };

        let pull = (tuning.portal_homing * dt).min(1.0);
        player.pos += (rect.center() - player.pos) * pull;
        player.clamp_to_field(tuning);

        if player.bounds().overlaps(&rect) {
            PortalStep::Entered
        } else {
            PortalStep::None
        }
    }

    /// Advance orientation after the player entered the portal
    ///
    /// Returns the new orientation, or None if already sideways.
    pub fn complete(&mut self, tuning: &Tuning) -> Option<Orientation> {
        let next = self.orientation.next()?;
        self.orientation = next;
        self.next_threshold += tuning.portal_threshold_step;
        self.phase = PortalPhase::Transitioning;
        self.grace_timer = tuning.portal_grace_frames;
        Some(next)
    }
}
