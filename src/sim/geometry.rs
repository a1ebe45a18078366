//! Axis-aligned overlap tests
//!
//! Everything in the field is either a circle (the player) or an axis-aligned
//! box (obstacles, pickups, portals), so two tests cover all collisions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen axis, used to express "along the fall" vs "across the fall"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The perpendicular axis
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }

    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Y => Vec2::Y,
        }
    }
}

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Square of side `2 * half` centered on `center`
    pub fn around(center: Vec2, half: f32) -> Self {
        Self {
            min: center - Vec2::splat(half),
            size: Vec2::splat(2.0 * half),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink by `margin` on every side; extents bottom out at zero around the center
    pub fn deflate(&self, margin: f32) -> Self {
        let inset = Vec2::splat(margin).min(self.size * 0.5);
        Self {
            min: self.min + inset,
            size: self.size - inset * 2.0,
        }
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self {
            min: self.min + by,
            size: self.size,
        }
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

/// Circle vs rectangle: distance from the circle center to the closest point
/// of the rectangle is below the radius
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max());
    center.distance_squared(closest) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_helpers() {
        let mut v = Vec2::new(3.0, 4.0);
        assert_eq!(Axis::X.of(v), 3.0);
        assert_eq!(Axis::Y.other(), Axis::X);
        *Axis::Y.of_mut(&mut v) += 1.0;
        assert_eq!(v, Vec2::new(3.0, 5.0));
        assert_eq!(Axis::X.unit(), Vec2::X);
    }

    #[test]
    fn test_deflate_never_inverts() {
        let r = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 8.0));
        let d = r.deflate(6.0);
        assert_eq!(d.min, Vec2::new(16.0, 14.0));
        assert_eq!(d.size, Vec2::new(8.0, 0.0));
        assert_eq!(d.center(), r.center());
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.overlaps(&Rect::new(Vec2::splat(5.0), Vec2::splat(10.0))));
        // Touching edges only
        assert!(!a.overlaps(&Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0))));
    }

    #[test]
    fn test_circle_rect() {
        let r = Rect::new(Vec2::new(100.0, 100.0), Vec2::splat(40.0));
        // Inside
        assert!(circle_overlaps_rect(Vec2::new(120.0, 120.0), 5.0, &r));
        // Near the corner but outside the radius
        assert!(!circle_overlaps_rect(Vec2::new(90.0, 90.0), 14.0, &r));
        assert!(circle_overlaps_rect(Vec2::new(90.0, 90.0), 15.0, &r));
        // Left edge
        assert!(circle_overlaps_rect(Vec2::new(85.0, 120.0), 16.0, &r));
        assert!(!circle_overlaps_rect(Vec2::new(80.0, 120.0), 20.0, &r));
    }
}
