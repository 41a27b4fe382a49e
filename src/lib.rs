//! Cancel Meetings - Breakout on a weekly calendar
//!
//! Core modules:
//! - `sim`: Simulation (layout, physics, collisions, game state)
//! - `session`: Session lifecycle, frame loop handle, observable snapshot
//! - `notify`: Replace-and-cancel notification timers
//! - `settings`: Session tunables loaded from JSON
//! - `web`: wasm32 binding for a browser canvas host

pub mod notify;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::{FrameLoop, FrameSnapshot, Nudge, Session};
pub use settings::{Settings, SettingsError};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Play field (canvas) dimensions
    pub const FIELD_WIDTH: f32 = 840.0;
    pub const FIELD_HEIGHT: f32 = 560.0;

    /// Ball defaults (velocities are in units per frame)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const INITIAL_SPEED: f32 = 2.4;
    pub const MAX_SPEED: f32 = 9.0;
    /// Speed boost when a meeting is canceled (multiplicative)
    pub const HIT_SPEED_MULTIPLIER: f32 = 1.06;
    /// Floor for vy² after a paddle bounce, keeps the ball off near-horizontal paths
    pub const MIN_VERTICAL_SPEED_SQ: f32 = 0.5;
    /// Serve spawn height (distance above the field bottom)
    pub const SERVE_OFFSET_Y: f32 = 80.0;
    /// Serve angle range in degrees (negative = upward)
    pub const SERVE_ANGLE_MIN_DEG: f32 = -75.0;
    pub const SERVE_ANGLE_MAX_DEG: f32 = -45.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 140.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Paddle top edge sits this far above the field bottom
    pub const PADDLE_OFFSET_Y: f32 = 40.0;

    /// Calendar grid chrome
    pub const HEADER_HEIGHT: f32 = 56.0;
    pub const FOOTER_HEIGHT: f32 = 32.0;
    pub const LEFT_GUTTER: f32 = 56.0;
    pub const GRID_TOP: f32 = HEADER_HEIGHT;
    pub const GRID_BOTTOM: f32 = FIELD_HEIGHT - FOOTER_HEIGHT - 40.0;

    /// One column per weekday
    pub const DAYS: usize = 7;
    /// 08:00 to 20:00 in half-hour slots
    pub const SLOTS_PER_DAY: usize = 24;
    /// Slots kept free at the bottom of every column (last 3 hours)
    pub const FREE_SLOTS: usize = 6;
    pub const MAX_DURATION_SLOTS: usize = 6;
    pub const MIN_MEETINGS_PER_DAY: i32 = 2;
    pub const MAX_MEETINGS_PER_DAY: i32 = 4;
    pub const PLACEMENT_ATTEMPTS: u32 = 25;
    /// Inset of a meeting inside its grid cell
    pub const MEETING_PADDING_X: f32 = 6.0;
    pub const MEETING_PADDING_Y: f32 = 4.0;
}

/// Bound `value` to `[min, max]`
///
/// Unlike `f32::clamp` this never panics: with `min > max` it yields `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Uniform integer in `[min, max]` inclusive (`min` when the range is empty)
#[inline]
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(12.0, 0.0, 10.0), 10.0);
        // Inverted bounds don't panic
        assert_eq!(clamp(5.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn test_random_int_inclusive_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let n = random_int(&mut rng, 2, 4);
            assert!((2..=4).contains(&n));
            seen[(n - 2) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every value in range should appear");
    }

    #[test]
    fn test_random_int_empty_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(random_int(&mut rng, 3, 3), 3);
        assert_eq!(random_int(&mut rng, 5, 1), 5);
    }
}
