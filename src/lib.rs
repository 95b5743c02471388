//! Space Monkey - simulation core of a top-down arcade space game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (ship, dash, spawning, collisions, session state)
//! - `tuning`: Data-driven game balance and its validation
//!
//! Rendering, audio and input polling live outside this crate. The core consumes
//! a [`sim::TickInput`] per frame and exposes a [`sim::Snapshot`] for drawing.

pub mod sim;
pub mod tuning;

pub use tuning::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World bounds (logical units)
    pub const WORLD_WIDTH: f32 = 1280.0;
    pub const WORLD_HEIGHT: f32 = 720.0;

    /// Ship defaults
    pub const SHIP_WIDTH: f32 = 100.0;
    pub const SHIP_HEIGHT: f32 = 100.0;
    pub const SHIP_START_X: f32 = 100.0;
    pub const SHIP_START_Y: f32 = 100.0;
    pub const SHIP_MAX_SPEED: f32 = 600.0;
    pub const SHIP_ACCELERATION: f32 = 800.0;
    pub const SHIP_DECELERATION: f32 = 400.0;
    pub const MAX_HEALTH: u8 = 6;
    /// Hitbox is width / 2.5, a little smaller than the sprite
    pub const SHIP_HITBOX_DIVISOR: f32 = 2.5;
    /// Grace period after taking a hit (seconds)
    pub const DAMAGE_INVULNERABILITY: f32 = 2.0;

    /// Dash defaults
    pub const DASH_DURATION: f32 = 0.3;
    pub const DASH_COOLDOWN: f32 = 1.5;
    pub const DASH_DISTANCE: f32 = 300.0;
    /// Invulnerability outlasts the dash by this much
    pub const DASH_GRACE: f32 = 0.2;
    /// Fraction of max speed carried out of a dash
    pub const DASH_EXIT_SPEED_FACTOR: f32 = 0.7;
    /// Dash progress after which the exit velocity is applied
    pub const DASH_EXIT_PROGRESS: f32 = 0.9;
    /// Below this length a dash direction counts as "no direction"
    pub const DASH_DIRECTION_THRESHOLD: f32 = 0.1;
    /// Per-tick smoothing of the cooldown indicator (cosmetic)
    pub const COOLDOWN_DISPLAY_SMOOTHING: f32 = 0.1;

    /// Spawning
    pub const ASTEROID_SPAWN_INTERVAL: f32 = 1.0;
    pub const MAX_ASTEROIDS: usize = 60;
    pub const FRUIT_SPAWN_INTERVAL: f32 = 1.0;
    pub const MAX_FRUIT: usize = 6;
    pub const FRUIT_POOL_SLACK: usize = 5;
    pub const FRUIT_SIZE: f32 = 50.0;
    pub const FRUIT_PADDING: f32 = 100.0;
    pub const FRUIT_MIN_PLAYER_DISTANCE: f32 = 200.0;
    pub const FRUIT_FALLBACK_DISTANCE: f32 = 250.0;
    pub const FRUIT_PLACEMENT_ATTEMPTS: u32 = 20;
    pub const ASTEROID_ROTATION_SPEED: f32 = 2.0;

    /// Fruit needed to win
    pub const WIN_FRUIT: u32 = 30;
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Quintic ease: 6t^5 - 15t^4 + 10t^3
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Interpolate with smootherstep easing
#[inline]
pub fn smoother_lerp(start: f32, end: f32, t: f32) -> f32 {
    lerp(start, end, smootherstep(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_smootherstep_fixed_points() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert!((smootherstep(1.0) - 1.0).abs() < 1e-6);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoother_lerp_endpoints() {
        assert!((smoother_lerp(10.0, 310.0, 0.0) - 10.0).abs() < 1e-4);
        assert!((smoother_lerp(10.0, 310.0, 1.0) - 310.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn smootherstep_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(smootherstep(lo) <= smootherstep(hi) + 1e-6);
        }

        #[test]
        fn smootherstep_stays_in_unit_range(t in 0.0f32..=1.0) {
            let s = smootherstep(t);
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&s));
        }
    }
}
