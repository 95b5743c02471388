//! Collision detection and world-boundary handling
//!
//! Everything here is a circle: the ship uses a shrunken hitbox, asteroids and
//! fruit use half their size.

use glam::Vec2;

/// Check whether two circles overlap.
///
/// Strict: circles that exactly touch (distance == r1 + r2) do not collide.
#[inline]
pub fn circles_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    p1.distance_squared(p2) < reach * reach
}

/// Check whether a position lies outside the world expanded by `margin`
#[inline]
pub fn out_of_bounds(pos: Vec2, margin: f32, world: Vec2) -> bool {
    pos.x < -margin || pos.x > world.x + margin || pos.y < -margin || pos.y > world.y + margin
}

/// Toroidal wrap for an object with the given extent.
///
/// Leaving past `-extent` re-enters at the far edge; leaving past
/// `world + extent` re-enters at `-extent`.
pub fn wrap_position(mut pos: Vec2, extent: Vec2, world: Vec2) -> Vec2 {
    if pos.x < -extent.x {
        pos.x = world.x;
    }
    if pos.y < -extent.y {
        pos.y = world.y;
    }
    if pos.x > world.x + extent.x {
        pos.x = -extent.x;
    }
    if pos.y > world.y + extent.y {
        pos.y = -extent.y;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_overlap_is_strict_at_boundary() {
        // distance 50, radii 20 + 30
        assert!(!circles_overlap(Vec2::ZERO, 20.0, Vec2::new(50.0, 0.0), 30.0));
        assert!(circles_overlap(Vec2::ZERO, 20.0, Vec2::new(49.9, 0.0), 30.0));
        assert!(!circles_overlap(Vec2::ZERO, 20.0, Vec2::new(30.0, 40.0), 30.0));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(40.0, 50.0);
        assert_eq!(
            circles_overlap(a, 15.0, b, 30.0),
            circles_overlap(b, 30.0, a, 15.0)
        );
    }

    #[test]
    fn test_out_of_bounds_margin() {
        assert!(!out_of_bounds(Vec2::new(-30.0, 100.0), 30.0, WORLD));
        assert!(out_of_bounds(Vec2::new(-30.1, 100.0), 30.0, WORLD));
        assert!(out_of_bounds(Vec2::new(100.0, 720.0 + 121.0), 120.0, WORLD));
        assert!(!out_of_bounds(Vec2::new(640.0, 360.0), 0.0, WORLD));
    }

    #[test]
    fn test_wrap_left_to_right() {
        let extent = Vec2::new(100.0, 100.0);
        let pos = wrap_position(Vec2::new(-105.0, 300.0), extent, WORLD);
        assert_eq!(pos, Vec2::new(1280.0, 300.0));
    }

    #[test]
    fn test_wrap_right_and_bottom() {
        let extent = Vec2::new(100.0, 100.0);
        assert_eq!(
            wrap_position(Vec2::new(1381.0, 300.0), extent, WORLD),
            Vec2::new(-100.0, 300.0)
        );
        assert_eq!(
            wrap_position(Vec2::new(50.0, -101.0), extent, WORLD),
            Vec2::new(50.0, 720.0)
        );
        assert_eq!(
            wrap_position(Vec2::new(50.0, 821.0), extent, WORLD),
            Vec2::new(50.0, -100.0)
        );
    }

    #[test]
    fn test_no_wrap_inside_margin() {
        let extent = Vec2::new(100.0, 100.0);
        let pos = Vec2::new(-99.0, 810.0);
        assert_eq!(wrap_position(pos, extent, WORLD), pos);
    }
}
