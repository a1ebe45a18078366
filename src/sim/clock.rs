//! Frame clock
//!
//! Converts wall time between frames into a normalized step multiplier:
//! 1.0 at the target frame rate, clamped so a stalled frame cannot produce a
//! huge physics jump.

use std::time::{Duration, Instant};

use crate::consts::{MAX_FRAME_SECS, TARGET_FPS};

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    target_fps: f32,
    max_frame_secs: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TARGET_FPS, MAX_FRAME_SECS)
    }
}

impl FrameClock {
    pub fn new(target_fps: f32, max_frame_secs: f32) -> Self {
        Self {
            last: Instant::now(),
            target_fps: target_fps.max(0.0),
            max_frame_secs: max_frame_secs.max(0.0),
        }
    }

    /// Step multiplier for the time elapsed since the previous call
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.factor_for(elapsed)
    }

    /// Restart measurement from now (after a pause or restart)
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Clamped step multiplier for an elapsed duration
    pub fn factor_for(&self, elapsed: Duration) -> f32 {
        let secs = elapsed.as_secs_f32().min(self.max_frame_secs);
        secs * self.target_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_at_target_rate() {
        let clock = FrameClock::default();
        let f = clock.factor_for(Duration::from_secs_f64(1.0 / 60.0));
        assert!((f - 1.0).abs() < 1e-4);
        let f = clock.factor_for(Duration::from_secs_f64(1.0 / 30.0));
        assert!((f - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let clock = FrameClock::default();
        let f = clock.factor_for(Duration::from_secs(3));
        assert!((f - 6.0).abs() < 1e-4);
        assert_eq!(clock.factor_for(Duration::ZERO), 0.0);
    }

    #[test]
    fn test_tick_is_bounded() {
        let mut clock = FrameClock::default();
        for _ in 0..3 {
            let f = clock.tick();
            assert!((0.0..=6.0 + 1e-4).contains(&f));
        }
    }
}
