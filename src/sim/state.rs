//! Game state and core simulation types
//!
//! Entities are plain values owned by [`GameState`]; nothing holds a reference
//! back to the orchestrator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::wrap_position;
use super::dash::DashController;
use super::spawn::{AsteroidFactory, FruitFactory};
use crate::tuning::{ConfigError, ShipTuning, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu, simulation idle
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Health ran out. Sticky until restart.
    GameOver,
    /// Enough fruit collected. Sticky until restart.
    Victory,
}

/// Things that happened during a tick, for audio and effects.
/// Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    DashStarted,
    AsteroidSpawned(AsteroidKind),
    FruitSpawned(FruitKind),
    ShipDamaged { health: u8 },
    FruitCollected { kind: FruitKind, total: u32 },
    GameOver,
    Victory,
    ReturnedToMenu,
}

/// Asteroid types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AsteroidKind {
    #[default]
    Normal,
    Frize,
    Fire,
}

/// Fixed per-type asteroid parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidProfile {
    /// Diameter, collision radius is half of it
    pub size: f32,
    /// Speed baked into the velocity at spawn
    pub speed: f32,
}

const ASTEROID_PROFILES: [AsteroidProfile; 3] = [
    AsteroidProfile {
        size: 30.0,
        speed: 300.0,
    },
    AsteroidProfile {
        size: 100.0,
        speed: 600.0,
    },
    AsteroidProfile {
        size: 120.0,
        speed: 800.0,
    },
];

impl AsteroidKind {
    pub const ALL: [AsteroidKind; 3] = [AsteroidKind::Normal, AsteroidKind::Frize, AsteroidKind::Fire];

    pub fn profile(self) -> &'static AsteroidProfile {
        match self {
            AsteroidKind::Normal => &ASTEROID_PROFILES[0],
            AsteroidKind::Frize => &ASTEROID_PROFILES[1],
            AsteroidKind::Fire => &ASTEROID_PROFILES[2],
        }
    }
}

/// Fruit types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FruitKind {
    #[default]
    Grape,
    Banana,
}

impl FruitKind {
    pub const ALL: [FruitKind; 2] = [FruitKind::Grape, FruitKind::Banana];

    /// Points added to the collected counter
    pub fn value(self) -> u32 {
        match self {
            FruitKind::Grape => 1,
            FruitKind::Banana => 2,
        }
    }
}

/// A drifting, spinning hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub kind: AsteroidKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub size: f32,
}

impl Asteroid {
    /// Create an asteroid heading along `direction` (unit) at its type's speed
    pub fn new(kind: AsteroidKind, pos: Vec2, direction: Vec2, rotation_speed: f32) -> Self {
        let profile = kind.profile();
        Self {
            kind,
            pos,
            vel: direction * profile.speed,
            rotation: 0.0,
            rotation_speed,
            size: profile.size,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.rotation += self.rotation_speed * dt;
    }
}

/// A collectible pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub kind: FruitKind,
    pub pos: Vec2,
    pub size: f32,
}

impl Fruit {
    pub fn new(kind: FruitKind, pos: Vec2, size: f32) -> Self {
        Self { kind, pos, size }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn value(&self) -> u32 {
        self.kind.value()
    }
}

/// The player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: u8,
    pub max_health: u8,
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    hitbox_divisor: f32,
}

impl Ship {
    pub fn new(tuning: &ShipTuning) -> Self {
        Self {
            pos: tuning.start_position(),
            vel: Vec2::ZERO,
            width: tuning.width,
            height: tuning.height,
            health: tuning.max_health,
            max_health: tuning.max_health,
            max_speed: tuning.max_speed,
            acceleration: tuning.acceleration,
            deceleration: tuning.deceleration,
            hitbox_divisor: tuning.hitbox_divisor,
        }
    }

    /// Collision radius, deliberately smaller than the sprite
    pub fn radius(&self) -> f32 {
        self.width / self.hitbox_divisor
    }

    /// Back to the start position with full health
    pub fn reset(&mut self, tuning: &ShipTuning) {
        *self = Self::new(tuning);
    }

    /// Apply one frame of inertial movement, then wrap around the world.
    ///
    /// `input` is the raw sum of the held directions; it is normalized here.
    pub fn update_movement(&mut self, input: Vec2, dt: f32, world: Vec2) {
        if input.length() > 0.0 {
            let dir = input.normalize();
            self.vel += dir * self.acceleration * dt;

            if self.vel.length() > self.max_speed {
                self.vel = self.vel.normalize() * self.max_speed;
            }
        } else if self.vel.length() > 0.0 {
            let decel = self.vel.normalize() * self.deceleration * dt;
            // Never overshoot through zero
            if decel.length() > self.vel.length() {
                self.vel = Vec2::ZERO;
            } else {
                self.vel -= decel;
            }
        }

        self.pos += self.vel * dt;
        self.pos = wrap_position(self.pos, Vec2::new(self.width, self.height), world);
    }

    /// Remove one point of health. Returns the remaining health.
    ///
    /// Invulnerability is owned by the dash controller, so callers gate on it
    /// before calling this.
    pub fn take_damage(&mut self) -> u8 {
        debug_assert!(self.health > 0, "damage applied to a dead ship");
        self.health = self.health.saturating_sub(1);
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// One flag per health slot, for the health bar
    pub fn health_pips(&self) -> Vec<bool> {
        (0..self.max_health).map(|i| i < self.health).collect()
    }
}

/// Per-session counters and timers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    /// Fruit value collected this session (never decreases)
    pub collected_fruit: u32,
    /// Fruit currently on the field
    pub active_fruit: usize,
    /// Seconds of Playing time, drives spawn escalation
    pub elapsed: f64,
    pub asteroid_spawn_timer: f32,
    pub fruit_spawn_timer: f32,
    /// Cosmetic pulse for the "dash ready" glow, wraps at 2π
    pub pulse: f32,
    /// Set when the player asked to quit
    pub exit_requested: bool,
}

impl SessionState {
    /// Zero every counter and timer, keep the phase
    pub fn reset(&mut self) {
        *self = Self {
            phase: self.phase,
            exit_requested: self.exit_requested,
            ..Self::default()
        };
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_victory(&self) -> bool {
        self.phase == GamePhase::Victory
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub ship: Ship,
    pub dash: DashController,
    /// Live asteroids, spawn order
    pub asteroids: Vec<Asteroid>,
    /// Live fruit, bounded by the fruit pool size
    pub fruit: Vec<Fruit>,
    pub session: SessionState,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    pub(crate) asteroid_factory: AsteroidFactory,
    pub(crate) fruit_factory: FruitFactory,
}

impl GameState {
    /// Create a new game state with the default balance
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a game state with custom balance, rejecting invalid values
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            ship: Ship::new(&tuning.ship),
            dash: DashController::new(&tuning.dash),
            asteroids: Vec::with_capacity(tuning.spawn.max_asteroids),
            fruit: Vec::with_capacity(tuning.spawn.fruit_pool_size()),
            session: SessionState::default(),
            events: Vec::new(),
            asteroid_factory: AsteroidFactory::new(tuning.asteroid_weights.clone(), seed),
            fruit_factory: FruitFactory::new(tuning.fruit_weights.clone(), seed),
            tuning,
        };
        state.reset();
        state
    }

    /// Return everything to session start. The phase is left alone.
    pub fn reset(&mut self) {
        self.ship.reset(&self.tuning.ship);
        self.dash.reset();
        self.session.reset();
        self.asteroids.clear();
        self.fruit.clear();
    }

    /// Drop all entities without touching score or health
    pub fn clear(&mut self) {
        self.asteroids.clear();
        self.fruit.clear();
        self.session.active_fruit = 0;
    }

    /// Menu -> Playing
    pub fn start(&mut self) {
        if self.session.phase == GamePhase::Menu {
            log::info!("Session started (seed {})", self.seed);
            self.session.phase = GamePhase::Playing;
            self.events.push(GameEvent::SessionStarted);
        }
    }

    /// Fresh session straight into Playing
    pub fn restart(&mut self) {
        self.clear();
        self.reset();
        self.session.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        log::info!("Session restarted");
    }

    /// Abandon the session and go back to the title menu
    pub fn return_to_menu(&mut self) {
        self.clear();
        self.reset();
        self.session.phase = GamePhase::Menu;
        self.events.push(GameEvent::ReturnedToMenu);
        log::info!("Returned to menu");
    }

    pub fn world_size(&self) -> Vec2 {
        self.tuning.world.size()
    }

    /// Invulnerability blink: hidden on odd tenths of the remaining timer
    pub fn ship_visible(&self) -> bool {
        !self.dash.is_invulnerable() || (self.dash.invulnerability_timer() * 10.0) as i32 % 2 == 0
    }

    /// Fraction of the win target collected, 0..=1
    pub fn fruit_progress(&self) -> f32 {
        (self.session.collected_fruit as f32 / self.tuning.spawn.win_fruit as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_asteroid_profiles() {
        assert_eq!(AsteroidKind::Normal.profile().size, 30.0);
        assert_eq!(AsteroidKind::Frize.profile().speed, 600.0);
        assert_eq!(AsteroidKind::Fire.profile().size, 120.0);

        let a = Asteroid::new(AsteroidKind::Fire, Vec2::ZERO, Vec2::X, 1.0);
        assert_eq!(a.vel, Vec2::new(800.0, 0.0));
        assert_eq!(a.radius(), 60.0);
    }

    #[test]
    fn test_bigger_asteroids_are_faster() {
        let profiles: Vec<_> = AsteroidKind::ALL.iter().map(|k| k.profile()).collect();
        for pair in profiles.windows(2) {
            assert!(pair[1].size > pair[0].size);
            assert!(pair[1].speed > pair[0].speed);
        }
        let total: u32 = FruitKind::ALL.iter().map(|k| k.value()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_asteroid_update() {
        let mut a = Asteroid::new(AsteroidKind::Normal, Vec2::ZERO, Vec2::Y, 2.0);
        a.update(0.5);
        assert_eq!(a.pos, Vec2::new(0.0, 150.0));
        assert!((a.rotation - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fruit_values() {
        assert_eq!(FruitKind::Grape.value(), 1);
        assert_eq!(FruitKind::Banana.value(), 2);
        assert_eq!(Fruit::new(FruitKind::Banana, Vec2::ZERO, FRUIT_SIZE).radius(), 25.0);
    }

    #[test]
    fn test_ship_acceleration_clamped() {
        let mut ship = Ship::new(&ShipTuning::default());
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        ship.pos = Vec2::new(640.0, 360.0);
        for _ in 0..200 {
            ship.update_movement(Vec2::new(1.0, 1.0), 1.0 / 60.0, world);
        }
        assert!(ship.vel.length() <= SHIP_MAX_SPEED + 1e-3);
        assert!(ship.vel.x > 0.0 && ship.vel.y > 0.0);
    }

    #[test]
    fn test_ship_first_frame_acceleration() {
        let mut ship = Ship::new(&ShipTuning::default());
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        ship.update_movement(Vec2::new(1.0, 0.0), 0.1, world);
        assert!((ship.vel.x - 80.0).abs() < 1e-4);
        assert!((ship.pos.x - 108.0).abs() < 1e-4);
    }

    #[test]
    fn test_ship_deceleration_snaps_to_zero() {
        let mut ship = Ship::new(&ShipTuning::default());
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        ship.vel = Vec2::new(30.0, 0.0);
        // 400 * 0.1 = 40 > 30, must stop instead of reversing
        ship.update_movement(Vec2::ZERO, 0.1, world);
        assert_eq!(ship.vel, Vec2::ZERO);

        ship.vel = Vec2::new(100.0, 0.0);
        ship.update_movement(Vec2::ZERO, 0.1, world);
        assert!((ship.vel.x - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_ship_wraps() {
        let mut ship = Ship::new(&ShipTuning::default());
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        ship.pos = Vec2::new(-105.0, 300.0);
        ship.update_movement(Vec2::ZERO, 1.0 / 60.0, world);
        assert_eq!(ship.pos.x, WORLD_WIDTH);
    }

    #[test]
    fn test_take_damage_saturates() {
        let mut ship = Ship::new(&ShipTuning::default());
        for expected in (0..MAX_HEALTH).rev() {
            assert_eq!(ship.take_damage(), expected);
        }
        assert!(ship.is_dead());
        assert_eq!(ship.health_pips(), vec![false; MAX_HEALTH as usize]);
    }

    #[test]
    fn test_clear_keeps_score() {
        let mut state = GameState::new(1);
        state.session.collected_fruit = 7;
        state.ship.health = 3;
        state.fruit.push(Fruit::new(FruitKind::Grape, Vec2::ZERO, FRUIT_SIZE));
        state.session.active_fruit = 1;

        state.clear();
        state.clear();
        assert!(state.fruit.is_empty());
        assert_eq!(state.session.active_fruit, 0);
        assert_eq!(state.session.collected_fruit, 7);
        assert_eq!(state.ship.health, 3);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = GameState::new(1);
        state.session.phase = GamePhase::GameOver;
        state.session.collected_fruit = 12;
        state.session.elapsed = 40.0;
        state.ship.health = 0;
        state.ship.pos = Vec2::new(500.0, 500.0);

        state.restart();
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.session.collected_fruit, 0);
        assert_eq!(state.session.elapsed, 0.0);
        assert_eq!(state.ship.health, MAX_HEALTH);
        assert_eq!(state.ship.pos, Vec2::new(SHIP_START_X, SHIP_START_Y));
        assert!(state.dash.is_ready());
    }

    #[test]
    fn test_with_tuning_rejects_invalid() {
        let mut tuning = Tuning::default();
        tuning.fruit_weights[0].weights.clear();
        assert!(GameState::with_tuning(1, tuning).is_err());
    }
}
