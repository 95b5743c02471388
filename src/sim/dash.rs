//! Dash ability and invulnerability
//!
//! The dash is a short scripted move: while it runs, the controller owns the
//! ship's position and ignores movement input. Cooldown and invulnerability
//! count down independently of the dash phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ship;
use crate::tuning::DashTuning;
use crate::{lerp, smoother_lerp};

/// Number of ghost images drawn behind a dashing ship
pub const TRAIL_LENGTH: usize = 5;

/// Dash phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashPhase {
    /// Normal movement (dash may still be cooling down)
    #[default]
    Idle,
    /// Scripted movement from start to target
    Dashing,
}

/// A ghost image of the ship along the dash path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailGhost {
    pub pos: Vec2,
    pub alpha: f32,
    pub size: f32,
}

/// Dash state machine bound to one ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashController {
    tuning: DashTuning,
    phase: DashPhase,
    /// Seconds into the current dash
    timer: f32,
    cooldown_timer: f32,
    ready: bool,
    direction: Vec2,
    start: Vec2,
    target: Vec2,
    invulnerable: bool,
    invulnerability_timer: f32,
    /// Smoothed cooldown percentage, presentation only
    cooldown_display: f32,
}

impl DashController {
    pub fn new(tuning: &DashTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            phase: DashPhase::Idle,
            timer: 0.0,
            cooldown_timer: 0.0,
            ready: true,
            direction: Vec2::ZERO,
            start: Vec2::ZERO,
            target: Vec2::ZERO,
            invulnerable: false,
            invulnerability_timer: 0.0,
            cooldown_display: 1.0,
        }
    }

    /// Back to a ready, vulnerable, idle controller
    pub fn reset(&mut self) {
        *self = Self::new(&self.tuning);
    }

    pub fn phase(&self) -> DashPhase {
        self.phase
    }

    pub fn is_dashing(&self) -> bool {
        self.phase == DashPhase::Dashing
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn cooldown_timer(&self) -> f32 {
        self.cooldown_timer
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn invulnerability_timer(&self) -> f32 {
        self.invulnerability_timer
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    pub fn target_position(&self) -> Vec2 {
        self.target
    }

    /// Dash progress 0..1 (0 when idle)
    pub fn progress(&self) -> f32 {
        if self.is_dashing() {
            (self.timer / self.tuning.duration).min(1.0)
        } else {
            0.0
        }
    }

    /// 1.0 when ready, otherwise how far the cooldown has run
    pub fn cooldown_percentage(&self) -> f32 {
        if self.ready {
            1.0
        } else {
            1.0 - self.cooldown_timer / self.tuning.cooldown
        }
    }

    /// Eased cooldown percentage for the HUD bar
    pub fn cooldown_display(&self) -> f32 {
        self.cooldown_display
    }

    /// Arm invulnerability. Overwrites whatever timer was running.
    pub fn set_invulnerable(&mut self, duration: f32) {
        self.invulnerable = true;
        self.invulnerability_timer = duration;
    }

    /// Advance one frame.
    ///
    /// `input` is the raw sum of held directions. Returns true on the frame a
    /// dash starts.
    pub fn update(
        &mut self,
        ship: &mut Ship,
        input: Vec2,
        dash_pressed: bool,
        dt: f32,
        world: Vec2,
    ) -> bool {
        let mut started = false;

        match self.phase {
            DashPhase::Dashing => {
                self.timer += dt;

                if self.timer >= self.tuning.duration {
                    self.phase = DashPhase::Idle;
                    ship.pos = self.target;
                } else {
                    let t = self.timer / self.tuning.duration;
                    ship.pos = self.path_point(t);

                    // Hand a velocity back before the dash ends so movement carries on
                    if t > self.tuning.exit_progress {
                        ship.vel = self.direction * (ship.max_speed * self.tuning.exit_speed_factor);
                    }
                }
            }
            DashPhase::Idle => {
                if self.ready && dash_pressed {
                    started = self.try_start(ship, input);
                }

                if !self.is_dashing() {
                    ship.update_movement(input, dt, world);
                }
            }
        }

        if self.invulnerable {
            self.invulnerability_timer -= dt;
            if self.invulnerability_timer <= 0.0 {
                self.invulnerable = false;
            }
        }

        if !self.ready {
            self.cooldown_timer -= dt;
            if self.cooldown_timer <= 0.0 {
                self.ready = true;
            }
        }

        self.cooldown_display = lerp(
            self.cooldown_display,
            self.cooldown_percentage(),
            self.tuning.display_smoothing,
        );

        debug_assert!(
            !(self.is_dashing() && self.ready),
            "dash is running while ready"
        );

        started
    }

    fn try_start(&mut self, ship: &Ship, input: Vec2) -> bool {
        let threshold = self.tuning.direction_threshold;

        let mut dir = input;
        if dir.length() < threshold && ship.vel.length() > threshold {
            dir = ship.vel.normalize();
        }
        if dir.length() <= threshold {
            return false;
        }

        self.direction = dir.normalize();
        self.start = ship.pos;
        self.target = self.start + self.direction * self.tuning.distance;

        self.phase = DashPhase::Dashing;
        self.ready = false;
        self.timer = 0.0;
        self.cooldown_timer = self.tuning.cooldown;

        self.set_invulnerable(self.tuning.duration + self.tuning.grace);

        log::debug!(
            "Dash from ({:.0}, {:.0}) toward ({:.2}, {:.2})",
            self.start.x,
            self.start.y,
            self.direction.x,
            self.direction.y
        );
        true
    }

    fn path_point(&self, t: f32) -> Vec2 {
        Vec2::new(
            smoother_lerp(self.start.x, self.target.x, t),
            smoother_lerp(self.start.y, self.target.y, t),
        )
    }

    /// Ghost images trailing a dashing ship, nearest first
    pub fn trail(&self, ship_width: f32) -> Vec<TrailGhost> {
        if !self.is_dashing() {
            return Vec::new();
        }

        let progress = self.progress();
        (1..=TRAIL_LENGTH)
            .filter_map(|i| {
                let factor = progress - i as f32 * 0.1;
                (factor >= 0.0).then(|| TrailGhost {
                    pos: self.path_point(factor),
                    alpha: 0.9 * (1.0 - i as f32 / TRAIL_LENGTH as f32),
                    size: ship_width * (1.0 - 0.15 * i as f32),
                })
            })
            .collect()
    }

    /// Expanding burst at the dash origin during the first fifth of the dash
    pub fn burst(&self, ship_width: f32) -> Option<TrailGhost> {
        let progress = self.progress();
        (self.is_dashing() && progress < 0.2).then(|| TrailGhost {
            pos: self.start,
            alpha: 0.5 * (1.0 - progress * 5.0),
            size: ship_width * (1.0 + progress * 2.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::tuning::ShipTuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> Vec2 {
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT)
    }

    fn setup() -> (DashController, Ship) {
        let mut ship = Ship::new(&ShipTuning::default());
        ship.pos = Vec2::new(400.0, 300.0);
        (DashController::new(&DashTuning::default()), ship)
    }

    #[test]
    fn test_dash_uses_velocity_when_no_input() {
        let (mut dash, mut ship) = setup();
        ship.vel = Vec2::new(200.0, 0.0);
        let start = ship.pos;

        assert!(dash.update(&mut ship, Vec2::ZERO, true, DT, world()));
        assert_eq!(dash.direction(), Vec2::new(1.0, 0.0));
        assert_eq!(dash.start_position(), start);
        assert_eq!(dash.target_position(), start + Vec2::new(300.0, 0.0));
        assert!(dash.is_dashing());
        assert!(!dash.is_ready());
        // The trigger frame does not move the ship
        assert_eq!(ship.pos, start);
    }

    #[test]
    fn test_dash_input_overrides_velocity() {
        let (mut dash, mut ship) = setup();
        ship.vel = Vec2::new(200.0, 0.0);
        dash.update(&mut ship, Vec2::new(0.0, 1.0), true, DT, world());
        assert_eq!(dash.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_diagonal_dash_is_normalized() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(1.0, 1.0), true, DT, world());
        assert!((dash.direction().length() - 1.0).abs() < 1e-5);
        assert!(((dash.target_position() - dash.start_position()).length() - DASH_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_no_dash_when_still() {
        let (mut dash, mut ship) = setup();
        ship.vel = Vec2::new(0.05, 0.0);
        assert!(!dash.update(&mut ship, Vec2::ZERO, true, DT, world()));
        assert!(!dash.is_dashing());
        assert!(dash.is_ready());
        assert!(!dash.is_invulnerable());
    }

    #[test]
    fn test_dash_reaches_target_exactly() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, DT, world());
        let target = dash.target_position();

        let mut last_x = ship.pos.x;
        while dash.is_dashing() {
            // Movement input is ignored while dashing
            dash.update(&mut ship, Vec2::new(-1.0, 0.0), false, DT, world());
            assert!(ship.pos.x >= last_x);
            last_x = ship.pos.x;
        }
        assert_eq!(ship.pos, target);
        assert!(!dash.is_ready());
    }

    #[test]
    fn test_exit_velocity_applied_late_in_dash() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(0.0, -1.0), true, DT, world());
        assert_eq!(ship.vel, Vec2::ZERO);

        // 0.28s into a 0.3s dash: t ≈ 0.93
        dash.update(&mut ship, Vec2::ZERO, false, 0.28, world());
        assert!(dash.is_dashing());
        assert!((ship.vel.y - (-SHIP_MAX_SPEED * 0.7)).abs() < 1e-3);
    }

    #[test]
    fn test_invulnerability_outlasts_dash() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.0, world());
        assert!(dash.is_invulnerable());
        assert!((dash.invulnerability_timer() - 0.5).abs() < 1e-6);

        dash.update(&mut ship, Vec2::ZERO, false, 0.35, world());
        assert!(!dash.is_dashing());
        assert!(dash.is_invulnerable());

        dash.update(&mut ship, Vec2::ZERO, false, 0.2, world());
        assert!(!dash.is_invulnerable());
    }

    #[test]
    fn test_cooldown_runs_from_trigger() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.0, world());
        assert_eq!(dash.cooldown_percentage(), 0.0);

        dash.update(&mut ship, Vec2::ZERO, false, 0.75, world());
        assert!((dash.cooldown_percentage() - 0.5).abs() < 1e-5);

        // Pressing dash while cooling down does nothing
        assert!(!dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.5, world()));
        assert!(!dash.is_ready());

        dash.update(&mut ship, Vec2::ZERO, false, 0.25, world());
        assert!(dash.is_ready());
        assert_eq!(dash.cooldown_percentage(), 1.0);
    }

    #[test]
    fn test_damage_overwrites_dash_invulnerability() {
        let (mut dash, mut ship) = setup();
        dash.set_invulnerable(DAMAGE_INVULNERABILITY);
        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.0, world());
        // Dash re-arms to its shorter window
        assert!((dash.invulnerability_timer() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cooldown_display_eases() {
        let (mut dash, mut ship) = setup();
        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.0, world());
        let first = dash.cooldown_display();
        assert!(first < 1.0 && first > 0.85);
        assert!(dash.cooldown_percentage() < first);
    }

    #[test]
    fn test_trail_and_burst() {
        let (mut dash, mut ship) = setup();
        assert!(dash.trail(SHIP_WIDTH).is_empty());
        assert!(dash.burst(SHIP_WIDTH).is_none());

        dash.update(&mut ship, Vec2::new(1.0, 0.0), true, 0.0, world());
        dash.update(&mut ship, Vec2::ZERO, false, 0.045, world());
        // progress 0.15: one ghost behind the ship, burst visible
        let trail = dash.trail(SHIP_WIDTH);
        assert_eq!(trail.len(), 1);
        assert!((trail[0].size - 85.0).abs() < 1e-3);
        assert!(dash.burst(SHIP_WIDTH).is_some());

        dash.update(&mut ship, Vec2::ZERO, false, 0.24, world());
        assert_eq!(dash.trail(SHIP_WIDTH).len(), TRAIL_LENGTH);
        assert!(dash.burst(SHIP_WIDTH).is_none());
    }

    proptest! {
        #[test]
        fn dashing_never_ready(
            frames in prop::collection::vec((-1i8..=1, -1i8..=1, any::<bool>(), 0.001f32..0.1), 1..300)
        ) {
            let (mut dash, mut ship) = setup();
            for (x, y, pressed, dt) in frames {
                let input = Vec2::new(x as f32, y as f32);
                dash.update(&mut ship, input, pressed, dt, world());
                prop_assert!(!(dash.is_dashing() && dash.is_ready()));
                prop_assert!((0.0..=1.0 + 1e-6).contains(&dash.cooldown_percentage()));
            }
        }
    }
}
