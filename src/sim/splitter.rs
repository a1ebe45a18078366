//! Splitting obstacles
//!
//! An armed splitter that crosses the field midline breaks into two smaller
//! children that fan out across the fall axis. Children never split.
//!
//! The crossing is tested on the path travelled during the frame, not the
//! end position, so a long frame cannot jump over the trigger band.

use glam::Vec2;

use super::obstacles::{Behavior, Obstacle};
use super::portal::Orientation;
use crate::tuning::Tuning;

/// Whether a center moving from `from` to `to` along the primary axis touched
/// the trigger band around the midline
pub fn crosses_trigger_band(from: f32, to: f32, orientation: Orientation, tuning: &Tuning) -> bool {
    let mid = orientation
        .primary_axis()
        .of(Vec2::new(tuning.field_width, tuning.field_height))
        * 0.5;
    let margin = tuning.split_trigger_margin;
    from.min(to) <= mid + margin && from.max(to) >= mid - margin
}

/// The two children a split produces
pub fn children(parent: &Obstacle, orientation: Orientation, tuning: &Tuning) -> [Obstacle; 2] {
    let size = tuning.split_child_min_size.max(parent.size / 2);
    let pos = parent.pos + Vec2::splat(parent.extent() / 4.0);
    let spread = tuning.split_child_spread;
    let behavior = Behavior {
        splitter: false,
        split_done: true,
        tracker: false,
        zigzag: false,
    };
    let child = |spread_sign: f32| {
        let mut vel = parent.vel;
        *orientation.secondary_axis().of_mut(&mut vel) = spread_sign * spread;
        Obstacle {
            pos,
            size,
            vel,
            behavior,
            zigzag_phase_ms: 0.0,
            reversed: parent.reversed,
        }
    };
    [child(-1.0), child(1.0)]
}

/// Split `obstacles[index]` if it qualifies
///
/// `from` is the obstacle's center on the primary axis before this frame's
/// move. Returns `true` when two children were appended. A crossing at the
/// population limit uses up the split: the obstacle carries on whole and is
/// never retried.
pub fn maybe_split(
    obstacles: &mut Vec<Obstacle>,
    index: usize,
    from: f32,
    orientation: Orientation,
    max_allowed: usize,
    tuning: &Tuning,
) -> bool {
    let Some(parent) = obstacles.get(index).copied() else {
        return false;
    };
    let to = orientation.primary_axis().of(parent.center());
    if !parent.behavior.armed_splitter() || !crosses_trigger_band(from, to, orientation, tuning) {
        return false;
    }

    obstacles[index].behavior.split_done = true;
    if obstacles.len() + 2 > max_allowed {
        return false;
    }
    obstacles.extend(children(&parent, orientation, tuning));
    true
}
