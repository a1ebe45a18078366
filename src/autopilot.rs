//! Demo autopilot
//!
//! A simple "idle mode" AI: sidestep the closest obstacle bearing down on the
//! player, otherwise go grab the nearest pickup, otherwise drift back to the
//! entry point. Good enough to survive a while, not to play well.

use glam::Vec2;

use crate::sim::geometry::Axis;
use crate::sim::player::MovementIntent;
use crate::sim::state::GameState;

/// How far upstream an obstacle counts as a threat
const LOOKAHEAD: f32 = 260.0;
/// Extra clearance on the dodge axis
const CLEARANCE: f32 = 12.0;
/// Dead zone when chasing a target
const SETTLE: f32 = 8.0;

fn press(intent: &mut MovementIntent, axis: Axis, dir: f32) {
    match (axis, dir > 0.0) {
        (Axis::X, true) => intent.right = true,
        (Axis::X, false) => intent.left = true,
        (Axis::Y, true) => intent.down = true,
        (Axis::Y, false) => intent.up = true,
    }
}

/// Press toward `target` on `axis` unless already close enough
fn chase(intent: &mut MovementIntent, axis: Axis, from: Vec2, target: Vec2) {
    let delta = axis.of(target) - axis.of(from);
    if delta.abs() > SETTLE {
        press(intent, axis, delta);
    }
}

/// Pick the input for this frame
pub fn steer(state: &GameState) -> MovementIntent {
    let mut intent = MovementIntent::default();
    if state.portal.is_homing() {
        return intent;
    }

    let tuning = &state.tuning;
    let orientation = state.orientation();
    let primary = orientation.primary_axis();
    let secondary = orientation.secondary_axis();
    let player = &state.player;

    // Closest obstacle upstream that shares our lane
    let threat = state
        .obstacles
        .obstacles()
        .iter()
        .filter_map(|ob| {
            let half = ob.extent() * 0.5;
            let upstream = (primary.of(player.pos) - primary.of(ob.center())) * ob.heading(orientation);
            let lane_gap = (secondary.of(player.pos) - secondary.of(ob.center())).abs();
            let in_lane = lane_gap < player.radius + half + CLEARANCE;
            (in_lane && upstream > -half && upstream < LOOKAHEAD).then_some((upstream, ob))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, ob)| ob);

    if let Some(ob) = threat {
        let lateral = secondary.of(player.pos) - secondary.of(ob.center());
        let extent = secondary.of(Vec2::new(tuning.field_width, tuning.field_height));
        let mut dir = if lateral == 0.0 { 1.0 } else { lateral.signum() };
        // Don't dodge into a wall
        let edge = if dir > 0.0 { extent - secondary.of(player.pos) } else { secondary.of(player.pos) };
        if edge < player.radius * 3.0 {
            dir = -dir;
        }
        press(&mut intent, secondary, dir);
        return intent;
    }

    let nearest_pickup = state
        .pickups
        .pickups()
        .iter()
        .map(|p| p.bounds().center())
        .min_by(|a, b| a.distance_squared(player.pos).total_cmp(&b.distance_squared(player.pos)));
    if let Some(target) = nearest_pickup {
        chase(&mut intent, secondary, player.pos, target);
        chase(&mut intent, primary, player.pos, target);
        return intent;
    }

    chase(&mut intent, primary, player.pos, orientation.entry_point(tuning));
    intent
}
