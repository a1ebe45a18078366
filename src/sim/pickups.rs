//! Collectible power-ups
//!
//! Pickups drift in from the same edge as obstacles, slower so they stay
//! reachable, and vanish once they are well past the opposite edge.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, circle_overlaps_rect};
use super::portal::Orientation;
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Absorbs one hit
    Shield,
    /// Extra life (up to the cap)
    Life,
}

/// A pickup entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub size: f32,
    pub kind: PickupKind,
}

impl Pickup {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// Positions across an edge of length `extent`, keeping `offset` clear of both
/// ends; collapses to the middle when the edge is too short
fn spawn_span(extent: f32, offset: f32) -> RangeInclusive<f32> {
    let lo = offset.clamp(0.0, extent.max(0.0) / 2.0);
    lo..=(extent - lo).max(lo)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpField {
    pickups: Vec<Pickup>,
}

impl PowerUpField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn push(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
    }

    /// Roll the per-frame spawn chance; never spawns while `suppressed`
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        orientation: Orientation,
        suppressed: bool,
        tuning: &Tuning,
    ) -> Option<PickupKind> {
        if suppressed || !rng.random_bool(tuning.pickup_spawn_chance) {
            return None;
        }
        let kind = if rng.random_bool(tuning.pickup_shield_weight) {
            PickupKind::Shield
        } else {
            PickupKind::Life
        };
        let pickup = Self::spawn(kind, orientation, rng, tuning);
        self.pickups.push(pickup);
        Some(kind)
    }

    /// Place a pickup of `kind` just outside the leading edge
    pub fn spawn<R: Rng + ?Sized>(kind: PickupKind, orientation: Orientation, rng: &mut R, tuning: &Tuning) -> Pickup {
        let (w, h) = (tuning.field_width, tuning.field_height);
        let off = tuning.pickup_spawn_offset;
        let pos = match orientation {
            Orientation::Down => Vec2::new(rng.random_range(spawn_span(w, off)), -off),
            Orientation::Up => Vec2::new(rng.random_range(spawn_span(w, off)), h + off),
            Orientation::Side => Vec2::new(w + off, rng.random_range(spawn_span(h, off))),
        };
        Pickup {
            pos,
            size: tuning.pickup_size,
            kind,
        }
    }

    /// Move pickups along the fall axis and drop those far outside the field
    pub fn update(&mut self, fall_speed: f32, orientation: Orientation, dt: f32, tuning: &Tuning) {
        let axis = orientation.primary_axis();
        let step = fall_speed * tuning.pickup_fall_fraction * dt;
        let extent = axis.of(Vec2::new(tuning.field_width, tuning.field_height));
        let margin = tuning.pickup_exit_margin;

        self.pickups.retain_mut(|p| {
            *axis.of_mut(&mut p.pos) += step;
            let along = axis.of(p.pos);
            along <= extent + margin && along + p.size >= -margin
        });
    }

    /// Remove and return every pickup touching the circle
    pub fn take_overlapping(&mut self, center: Vec2, radius: f32) -> Vec<PickupKind> {
        let mut taken = Vec::new();
        self.pickups.retain(|p| {
            if circle_overlaps_rect(center, radius, &p.bounds()) {
                taken.push(p.kind);
                false
            } else {
                true
            }
        });
        taken
    }
}
