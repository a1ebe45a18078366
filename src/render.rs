//! Draw command list
//!
//! The core never touches pixels. Each frame it describes the scene as a
//! sequence of [`DrawCommand`]s in paint order, and the host's
//! [`DrawSurface`] turns them into actual draw calls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geometry::Rect;
use crate::sim::pickups::PickupKind;
use crate::sim::portal::Orientation;
use crate::sim::state::GameState;

/// Visual size class of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub fn for_size(size: u32) -> Self {
        match size {
            0..40 => SizeTier::Small,
            40..50 => SizeTier::Medium,
            _ => SizeTier::Large,
        }
    }
}

/// One thing to draw, in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Scrolling background
    Backdrop { scroll: f32, orientation: Orientation },
    Portal { rect: Rect },
    Pickup { rect: Rect, kind: PickupKind },
    Obstacle {
        rect: Rect,
        tier: SizeTier,
        armed_splitter: bool,
        tracker: bool,
        zigzag: bool,
    },
    /// `facing` points away from the fall direction
    Player {
        center: Vec2,
        radius: f32,
        shielded: bool,
        facing: Vec2,
    },
    /// Screen-space overlay (never shaken)
    Hud { score: u64, lives: u32, shield_frames: u32 },
}

/// Host-side renderer
pub trait DrawSurface {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, command: &DrawCommand);
    fn end_frame(&mut self) {}
}

/// Records commands (tests, replays)
impl DrawSurface for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(*command);
    }
}

/// Deterministic shake jitter for the current frame
fn shake_offset(state: &GameState) -> Vec2 {
    let shake = state.stats.shake;
    if shake <= 0.0 {
        return Vec2::ZERO;
    }
    let t = state.frames as f32;
    Vec2::new((t * 1.7).sin(), (t * 2.3).cos()) * shake
}

/// Build the frame's draw commands in paint order
pub fn frame_commands(state: &GameState, shake_enabled: bool) -> Vec<DrawCommand> {
    let tuning = &state.tuning;
    let orientation = state.orientation();
    let offset = if shake_enabled { shake_offset(state) } else { Vec2::ZERO };

    let mut commands = Vec::with_capacity(state.obstacles.len() + state.pickups.len() + 4);
    commands.push(DrawCommand::Backdrop {
        scroll: state.stats.backdrop_scroll,
        orientation,
    });

    if state.portal.is_homing() {
        if let Some(rect) = state.portal.portal_rect(tuning) {
            commands.push(DrawCommand::Portal { rect: rect.offset(offset) });
        }
    }

    commands.extend(state.pickups.pickups().iter().map(|p| DrawCommand::Pickup {
        rect: p.bounds().offset(offset),
        kind: p.kind,
    }));

    commands.extend(state.obstacles.obstacles().iter().map(|ob| DrawCommand::Obstacle {
        rect: ob.bounds().offset(offset),
        tier: SizeTier::for_size(ob.size),
        armed_splitter: ob.behavior.armed_splitter(),
        tracker: ob.behavior.tracker,
        zigzag: ob.behavior.zigzag,
    }));

    let player = &state.player;
    if player.blink_visible() {
        commands.push(DrawCommand::Player {
            center: player.pos + offset,
            radius: player.radius,
            shielded: player.shield_active,
            facing: orientation.primary_axis().unit() * -orientation.fall_sign(),
        });
    }

    commands.push(DrawCommand::Hud {
        score: state.stats.displayed_score(),
        lives: player.lives,
        shield_frames: if player.shield_active {
            player.shield_timer.max(0.0).ceil() as u32
        } else {
            0
        },
    });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_size_tiers() {
        assert_eq!(SizeTier::for_size(20), SizeTier::Small);
        assert_eq!(SizeTier::for_size(39), SizeTier::Small);
        assert_eq!(SizeTier::for_size(40), SizeTier::Medium);
        assert_eq!(SizeTier::for_size(49), SizeTier::Medium);
        assert_eq!(SizeTier::for_size(50), SizeTier::Large);
    }

    #[test]
    fn test_paint_order() {
        let state = GameState::new(3, Tuning::default());
        let commands = frame_commands(&state, true);
        assert!(matches!(commands.first(), Some(DrawCommand::Backdrop { .. })));
        assert!(matches!(commands.last(), Some(DrawCommand::Hud { lives: 3, score: 0, .. })));
        let obstacles = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Obstacle { .. }))
            .count();
        assert_eq!(obstacles, state.obstacles.len());
        assert!(
            commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Player { facing, .. } if *facing == Vec2::new(0.0, -1.0)))
        );
        // No portal until one opens
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Portal { .. })));
    }

    #[test]
    fn test_player_blinks_while_immune() {
        let mut state = GameState::new(3, Tuning::default());
        state.player.immunity_timer = 7.0;
        let commands = frame_commands(&state, true);
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Player { .. })));
    }

    #[test]
    fn test_shake_only_when_enabled() {
        let mut state = GameState::new(3, Tuning::default());
        state.stats.shake = 10.0;
        state.frames = 4;
        let center = state.player.pos;

        let still = frame_commands(&state, false);
        assert!(still.contains(&DrawCommand::Player {
            center,
            radius: state.player.radius,
            shielded: false,
            facing: Vec2::new(0.0, -1.0),
        }));

        let shaken = frame_commands(&state, true);
        let moved = shaken.iter().any(|c| matches!(c, DrawCommand::Player { center: c2, .. } if *c2 != center));
        assert!(moved);
        // The HUD is identical either way
        assert_eq!(still.last(), shaken.last());
    }

    #[test]
    fn test_surface_records() {
        let state = GameState::new(3, Tuning::default());
        let mut surface: Vec<DrawCommand> = Vec::new();
        surface.begin_frame();
        for command in frame_commands(&state, false) {
            surface.draw(&command);
        }
        surface.end_frame();
        assert_eq!(surface.len(), state.obstacles.len() + 3);
    }
}
