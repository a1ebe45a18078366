//! Obstacle population
//!
//! Obstacles live in a flat vector. They are never removed: an obstacle that
//! leaves the field on the trailing side is re-rolled in place, and the
//! population only grows (one per frame) toward a score-driven target.
//!
//! Per-obstacle behaviors are plain functions `(Obstacle, &StepContext) ->
//! Obstacle` chained in [`BEHAVIOR_PIPELINE`]; adding a behavior means adding
//! a function, not touching the others.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::portal::Orientation;
use super::splitter;
use crate::consts::ZIGZAG_PHASE_RANGE_MS;
use crate::tuning::Tuning;

/// Behavior flags (closed set, combined on one obstacle)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior {
    /// Splits in two when crossing the midline
    pub splitter: bool,
    /// Set once the split happened (or for split children)
    pub split_done: bool,
    /// Homes toward the player across the fall axis
    pub tracker: bool,
    /// Weaves sideways on a sine wave
    pub zigzag: bool,
}

impl Behavior {
    /// Splitter that has not split yet
    pub fn armed_splitter(&self) -> bool {
        self.splitter && !self.split_done
    }
}

/// A falling obstacle (square, positioned by its top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: u32,
    /// Intrinsic drift added on top of the fall speed
    pub vel: Vec2,
    pub behavior: Behavior,
    /// Zigzag phase offset so weaving obstacles desynchronize
    pub zigzag_phase_ms: f32,
    /// Travels against the fall direction (crossfire levels)
    #[serde(default)]
    pub reversed: bool,
}

impl Obstacle {
    /// Plain obstacle with no drift or behaviors
    pub fn new(pos: Vec2, size: u32) -> Self {
        Self {
            pos,
            size: size.max(1),
            vel: Vec2::ZERO,
            behavior: Behavior::default(),
            zigzag_phase_ms: 0.0,
            reversed: false,
        }
    }

    /// +1 or -1 along the primary axis
    pub fn heading(&self, orientation: Orientation) -> f32 {
        if self.reversed {
            -orientation.fall_sign()
        } else {
            orientation.fall_sign()
        }
    }

    #[inline]
    pub fn extent(&self) -> f32 {
        self.size as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.extent()))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.extent() * 0.5)
    }

    /// Collision box, slightly smaller than the sprite
    pub fn hitbox(&self, inset: f32) -> Rect {
        self.bounds().deflate(inset)
    }

    /// Whether the obstacle has left the field on the side it travels toward
    pub fn has_exited(&self, orientation: Orientation, tuning: &Tuning) -> bool {
        let axis = orientation.primary_axis();
        let along = axis.of(self.pos);
        if self.heading(orientation) > 0.0 {
            along > axis.of(Vec2::new(tuning.field_width, tuning.field_height))
        } else {
            along + self.extent() < 0.0
        }
    }
}

/// Read-only inputs shared by all behavior steps in a frame
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub orientation: Orientation,
    /// Signed speed along the primary axis
    pub fall_speed: f32,
    pub player_pos: Vec2,
    pub sim_time_ms: f32,
    pub dt: f32,
    pub tuning: &'a Tuning,
}

pub type BehaviorStep = fn(Obstacle, &StepContext) -> Obstacle;

/// Behavior steps in application order
pub const BEHAVIOR_PIPELINE: [BehaviorStep; 3] = [zigzag, track, drift];

/// Sideways sine weave
pub fn zigzag(mut obstacle: Obstacle, ctx: &StepContext) -> Obstacle {
    if !obstacle.behavior.zigzag {
        return obstacle;
    }
    let t = ctx.sim_time_ms + obstacle.zigzag_phase_ms;
    let wave = (t * ctx.tuning.zigzag_frequency).sin() * ctx.tuning.zigzag_amplitude * ctx.dt;
    *ctx.orientation.secondary_axis().of_mut(&mut obstacle.pos) += wave;
    obstacle
}

/// Nudge toward the player across the fall axis without overshooting
pub fn track(mut obstacle: Obstacle, ctx: &StepContext) -> Obstacle {
    if !obstacle.behavior.tracker {
        return obstacle;
    }
    let axis = ctx.orientation.secondary_axis();
    let delta = axis.of(ctx.player_pos) - axis.of(obstacle.center());
    let step = (ctx.tuning.tracking_speed * ctx.dt).min(delta.abs());
    if step > 0.0 {
        *axis.of_mut(&mut obstacle.pos) += step.copysign(delta);
    }
    obstacle
}

/// Fall along the primary axis plus intrinsic drift
pub fn drift(mut obstacle: Obstacle, ctx: &StepContext) -> Obstacle {
    let speed = if obstacle.reversed { -ctx.fall_speed } else { ctx.fall_speed };
    *ctx.orientation.primary_axis().of_mut(&mut obstacle.pos) += speed * ctx.dt;
    obstacle.pos += obstacle.vel * ctx.dt;
    obstacle
}

/// Roll a new obstacle just outside the edge it enters from
///
/// With crossfire on, half the obstacles enter from the opposite edge and
/// travel against the fall direction.
pub fn spawn<R: Rng + ?Sized>(
    orientation: Orientation,
    tick_score: u64,
    rng: &mut R,
    tuning: &Tuning,
) -> Obstacle {
    let size = rng.random_range(tuning.obstacle_min_size..=tuning.obstacle_max_size);
    let extent = size as f32;
    let depth = tuning.spawn_depth.max(extent);
    let field = Vec2::new(tuning.field_width, tuning.field_height);
    let reversed = tuning.crossfire && rng.random_bool(0.5);
    let (primary, secondary) = (orientation.primary_axis(), orientation.secondary_axis());

    let heading = if reversed { -orientation.fall_sign() } else { orientation.fall_sign() };
    let far = primary.of(field);
    let along = if heading > 0.0 {
        rng.random_range(-depth..=-extent)
    } else {
        rng.random_range(far..=far + depth)
    };
    let across = rng.random_range(0.0..=(secondary.of(field) - extent));
    let mut pos = Vec2::ZERO;
    *primary.of_mut(&mut pos) = along;
    *secondary.of_mut(&mut pos) = across;

    let mut behavior = Behavior::default();
    if rng.random_bool(tuning.splitter_chance) {
        behavior.splitter = true;
    } else if tick_score / 10 >= tuning.tracker_min_score && rng.random_bool(tuning.tracker_chance) {
        behavior.tracker = true;
    } else if tick_score > tuning.zigzag_min_tick_score && rng.random_bool(tuning.zigzag_chance) {
        behavior.zigzag = true;
    }

    Obstacle {
        pos,
        size,
        vel: Vec2::new(
            rng.random_range(-tuning.drift_x..=tuning.drift_x),
            rng.random_range(-tuning.drift_y..=tuning.drift_y),
        ),
        behavior,
        zigzag_phase_ms: rng.random_range(0.0..ZIGZAG_PHASE_RANGE_MS),
        reversed,
    }
}

/// What happened to the field during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldReport {
    /// Splitters that broke apart this frame
    pub splits: u32,
}

/// Owns the obstacle population
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new<R: Rng + ?Sized>(orientation: Orientation, tick_score: u64, rng: &mut R, tuning: &Tuning) -> Self {
        let mut field = Self::default();
        field.reseed(orientation, tick_score, rng, tuning);
        field
    }

    /// Replace the whole population with `base_obstacles` fresh spawns
    pub fn reseed<R: Rng + ?Sized>(
        &mut self,
        orientation: Orientation,
        tick_score: u64,
        rng: &mut R,
        tuning: &Tuning,
    ) {
        self.obstacles.clear();
        self.obstacles
            .extend((0..tuning.base_obstacles).map(|_| spawn(orientation, tick_score, rng, tuning)));
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Mutable view; the population size cannot change through it
    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Add an obstacle unless the hard cap is reached
    pub fn insert(&mut self, obstacle: Obstacle, tuning: &Tuning) -> bool {
        if self.obstacles.len() >= tuning.obstacle_cap() {
            return false;
        }
        self.obstacles.push(obstacle);
        true
    }

    /// Population the field grows toward at this score
    pub fn target_count(tick_score: u64, tuning: &Tuning) -> usize {
        let extra = (tick_score / tuning.extra_obstacle_score)
            .min(tuning.extra_obstacle_allowance as u64) as usize;
        tuning.base_obstacles + extra
    }

    /// Population splits may grow into at this score
    pub fn max_allowed(tick_score: u64, tuning: &Tuning) -> usize {
        (Self::target_count(tick_score, tuning) + tuning.split_overflow_allowance)
            .min(tuning.obstacle_cap())
    }

    /// Advance every obstacle one frame, then top the population up by one
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &StepContext, tick_score: u64, rng: &mut R) -> FieldReport {
        let tuning = ctx.tuning;
        let max_allowed = Self::max_allowed(tick_score, tuning);
        let mut report = FieldReport::default();

        let primary = ctx.orientation.primary_axis();

        // Children appended by splits start moving next frame
        let count = self.obstacles.len();
        for i in 0..count {
            let from = primary.of(self.obstacles[i].center());
            let obstacle = BEHAVIOR_PIPELINE
                .iter()
                .fold(self.obstacles[i], |ob, step| step(ob, ctx));
            self.obstacles[i] = obstacle;

            if splitter::maybe_split(&mut self.obstacles, i, from, ctx.orientation, max_allowed, tuning) {
                report.splits += 1;
            }

            if self.obstacles[i].has_exited(ctx.orientation, tuning) {
                log::trace!("Obstacle {} left the field, respawning", i);
                self.obstacles[i] = spawn(ctx.orientation, tick_score, rng, tuning);
            }
        }

        if self.obstacles.len() < Self::target_count(tick_score, tuning) {
            self.obstacles.push(spawn(ctx.orientation, tick_score, rng, tuning));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(tuning: &Tuning, orientation: Orientation) -> StepContext<'_> {
        StepContext {
            orientation,
            fall_speed: orientation.fall_sign() * 4.0,
            player_pos: Vec2::new(512.0, 384.0),
            sim_time_ms: 0.0,
            dt: 1.0,
            tuning,
        }
    }

    #[test]
    fn test_spawn_outside_field() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let ob = spawn(Orientation::Down, 0, &mut rng, &tuning);
            assert!(ob.pos.y + ob.extent() <= 0.0);
            assert!(ob.pos.x >= 0.0 && ob.pos.x + ob.extent() <= tuning.field_width);
            assert!((tuning.obstacle_min_size..=tuning.obstacle_max_size).contains(&ob.size));

            let ob = spawn(Orientation::Up, 0, &mut rng, &tuning);
            assert!(ob.pos.y >= tuning.field_height);

            let ob = spawn(Orientation::Side, 0, &mut rng, &tuning);
            assert!(ob.pos.x >= tuning.field_width);
            assert!(ob.pos.y >= 0.0 && ob.pos.y + ob.extent() <= tuning.field_height);
        }
    }

    #[test]
    fn test_behaviors_gated_by_score() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let early: Vec<_> = (0..400)
            .map(|_| spawn(Orientation::Down, 0, &mut rng, &tuning))
            .collect();
        assert!(early.iter().all(|o| !o.behavior.tracker && !o.behavior.zigzag));
        assert!(early.iter().any(|o| o.behavior.splitter));

        let late: Vec<_> = (0..400)
            .map(|_| spawn(Orientation::Down, 6000, &mut rng, &tuning))
            .collect();
        assert!(late.iter().any(|o| o.behavior.tracker));
        assert!(late.iter().any(|o| o.behavior.zigzag));
        // Flags stay exclusive
        assert!(late.iter().all(|o| {
            [o.behavior.splitter, o.behavior.tracker, o.behavior.zigzag]
                .iter()
                .filter(|f| **f)
                .count()
                <= 1
        }));
    }

    #[test]
    fn test_drift_follows_orientation() {
        let tuning = Tuning::default();
        let ob = Obstacle::new(Vec2::new(100.0, 100.0), 30);

        let down = drift(ob, &ctx(&tuning, Orientation::Down));
        assert_eq!(down.pos, Vec2::new(100.0, 104.0));
        let up = drift(ob, &ctx(&tuning, Orientation::Up));
        assert_eq!(up.pos, Vec2::new(100.0, 96.0));
        let side = drift(ob, &ctx(&tuning, Orientation::Side));
        assert_eq!(side.pos, Vec2::new(96.0, 100.0));
    }

    #[test]
    fn test_tracker_never_overshoots() {
        let tuning = Tuning::default();
        let c = ctx(&tuning, Orientation::Down);
        let mut ob = Obstacle::new(Vec2::new(512.0 - 15.0 - 1.0, 0.0), 30);
        ob.behavior.tracker = true;
        // Center is 1.0 left of the player; the step is capped to the gap
        let moved = track(ob, &c);
        assert!((moved.center().x - 512.0).abs() < 1e-4);
        // Already aligned: no movement
        let again = track(moved, &c);
        assert_eq!(again.pos, moved.pos);

        let mut far = Obstacle::new(Vec2::new(900.0, 0.0), 30);
        far.behavior.tracker = true;
        let moved = track(far, &c);
        assert_eq!(moved.pos.x, 900.0 - tuning.tracking_speed);
        assert_eq!(moved.pos.y, 0.0);
    }

    #[test]
    fn test_zigzag_only_moves_sideways() {
        let tuning = Tuning::default();
        let mut c = ctx(&tuning, Orientation::Side);
        c.sim_time_ms = 300.0;
        let mut ob = Obstacle::new(Vec2::new(400.0, 300.0), 30);
        ob.behavior.zigzag = true;
        let moved = zigzag(ob, &c);
        assert_eq!(moved.pos.x, 400.0);
        assert!(moved.pos.y != 300.0);

        // Non-zigzag obstacles are untouched
        let plain = Obstacle::new(Vec2::new(400.0, 300.0), 30);
        assert_eq!(zigzag(plain, &c), plain);
    }

    #[test]
    fn test_respawn_in_place() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::new(Orientation::Down, 0, &mut rng, &tuning);
        let before = field.len();
        field.obstacles_mut()[0] = Obstacle::new(Vec2::new(100.0, tuning.field_height + 1.0), 30);
        field.update(&ctx(&tuning, Orientation::Down), 0, &mut rng);
        assert_eq!(field.len(), before);
        assert!(field.obstacles()[0].pos.y < 0.0);
    }

    #[test]
    fn test_crossfire_comes_from_both_edges() {
        let tuning = Tuning {
            crossfire: true,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(21);
        let spawned: Vec<_> = (0..200)
            .map(|_| spawn(Orientation::Side, 0, &mut rng, &tuning))
            .collect();
        for ob in &spawned {
            if ob.reversed {
                assert!(ob.pos.x + ob.extent() <= 0.0);
            } else {
                assert!(ob.pos.x >= tuning.field_width);
            }
        }
        assert!(spawned.iter().any(|o| o.reversed));
        assert!(spawned.iter().any(|o| !o.reversed));

        // Reversed obstacles move right and leave past the right edge
        let c = ctx(&tuning, Orientation::Side);
        let mut ob = Obstacle::new(Vec2::new(100.0, 100.0), 30);
        ob.reversed = true;
        assert_eq!(drift(ob, &c).pos.x, 104.0);
        ob.pos.x = tuning.field_width + 1.0;
        assert!(ob.has_exited(Orientation::Side, &tuning));
        ob.pos.x = -40.0;
        assert!(!ob.has_exited(Orientation::Side, &tuning));
    }

    #[test]
    fn test_fast_frame_cannot_skip_split() {
        let tuning = Tuning::default();
        let mid = tuning.field_height / 2.0;
        let mut field = ObstacleField::default();
        let mut ob = Obstacle::new(Vec2::new(300.0, mid - 42.0 - 20.0), 40);
        ob.behavior.splitter = true;
        field.insert(ob, &tuning);

        // One clamped frame at top speed moves 84 units, past the whole band
        let mut c = ctx(&tuning, Orientation::Down);
        c.fall_speed = tuning.max_fall_speed;
        c.dt = 6.0;
        let mut rng = Pcg32::seed_from_u64(2);
        let report = field.update(&c, 0, &mut rng);

        assert!(field.obstacles()[0].center().y > mid + tuning.split_trigger_margin);
        assert_eq!(report.splits, 1);
        assert!(field.obstacles()[0].behavior.split_done);
        assert!(field.len() >= 3);
    }

    #[test]
    fn test_population_grows_to_target() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ObstacleField::new(Orientation::Down, 0, &mut rng, &tuning);
        assert_eq!(field.len(), tuning.base_obstacles);

        let score = tuning.extra_obstacle_score * 3;
        for _ in 0..10 {
            field.update(&ctx(&tuning, Orientation::Down), score, &mut rng);
        }
        assert!(field.len() >= tuning.base_obstacles + 3);
        assert!(field.len() <= tuning.obstacle_cap());
    }

    #[test]
    fn test_targets_are_capped() {
        let tuning = Tuning::default();
        let huge = u64::MAX / 2;
        assert_eq!(
            ObstacleField::target_count(huge, &tuning),
            tuning.base_obstacles + tuning.extra_obstacle_allowance
        );
        assert_eq!(ObstacleField::max_allowed(huge, &tuning), tuning.obstacle_cap());
        assert_eq!(
            ObstacleField::max_allowed(0, &tuning),
            tuning.base_obstacles + tuning.split_overflow_allowance
        );
    }

    #[test]
    fn test_insert_respects_cap() {
        let tuning = Tuning::default();
        let mut field = ObstacleField::default();
        for _ in 0..tuning.obstacle_cap() {
            assert!(field.insert(Obstacle::new(Vec2::ZERO, 20), &tuning));
        }
        assert!(!field.insert(Obstacle::new(Vec2::ZERO, 20), &tuning));
    }
}
