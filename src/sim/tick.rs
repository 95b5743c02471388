//! Per-frame simulation tick
//!
//! Frame pipeline: input -> dash/ship kinematics -> spawning -> entity
//! updates -> collisions -> score/health -> win/lose.

use glam::Vec2;

use super::collision::{circles_overlap, out_of_bounds};
use super::dash::DashController;
use super::state::{GameEvent, GamePhase, GameState, SessionState, Ship};

/// Asteroids whose edge is closer than this make the autopilot dash
const AUTOPILOT_THREAT_DISTANCE: f32 = 150.0;
/// Autopilot ignores fruit offsets smaller than this on an axis
const AUTOPILOT_DEADZONE: f32 = 20.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held directions
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash (edge-triggered: true only on the frame it was pressed)
    pub dash: bool,
    /// Restart after game over / victory (edge-triggered)
    pub restart: bool,
    /// Back to the title menu (edge-triggered)
    pub menu: bool,
    /// Start from the title menu (edge-triggered)
    pub start: bool,
    /// Quit the game (edge-triggered)
    pub quit: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Raw sum of held directions (+y is up), not normalized
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y += 1.0;
        }
        if self.down {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }

    /// Hold the keys pointing along `v`, ignoring small components
    fn steer(&mut self, v: Vec2, deadzone: f32) {
        self.right = v.x > deadzone;
        self.left = v.x < -deadzone;
        self.up = v.y > deadzone;
        self.down = v.y < -deadzone;
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    if input.quit {
        log::info!("Quit requested");
        state.session.exit_requested = true;
        return;
    }

    match state.session.phase {
        GamePhase::Menu => {
            if input.start {
                state.start();
            }
            return;
        }
        // Frozen until the player restarts or leaves
        GamePhase::GameOver | GamePhase::Victory => {
            if input.menu {
                state.return_to_menu();
            } else if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::Playing => {
            if input.menu {
                state.return_to_menu();
                return;
            }
        }
    }

    state.session.elapsed += dt as f64;
    state.session.pulse += dt;
    if state.session.pulse > std::f32::consts::TAU {
        state.session.pulse = 0.0;
    }

    let world = state.world_size();

    if state
        .dash
        .update(&mut state.ship, input.direction(), input.dash, dt, world)
    {
        state.events.push(GameEvent::DashStarted);
    }

    update_asteroids(state, dt, world);
    update_fruit(state, dt, world);

    if state.session.phase == GamePhase::Playing
        && state.session.collected_fruit >= state.tuning.spawn.win_fruit
    {
        log::info!(
            "Victory with {} fruit after {:.1}s",
            state.session.collected_fruit,
            state.session.elapsed
        );
        state.session.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
    }
}

/// Spawn, move, collide and cull asteroids
fn update_asteroids(state: &mut GameState, dt: f32, world: Vec2) {
    let spawn = &state.tuning.spawn;

    state.session.asteroid_spawn_timer -= dt;
    if state.session.asteroid_spawn_timer <= 0.0 {
        if state.asteroids.len() < spawn.max_asteroids {
            let asteroid = state
                .asteroid_factory
                .create(state.session.elapsed, world, spawn);
            state.events.push(GameEvent::AsteroidSpawned(asteroid.kind));
            state.asteroids.push(asteroid);
        } else {
            log::warn!("Asteroid pool full ({}), skipping spawn", state.asteroids.len());
        }
        state.session.asteroid_spawn_timer = spawn.asteroid_interval;
    }

    for asteroid in &mut state.asteroids {
        asteroid.update(dt);
    }

    // One consistent view of the ship for the whole pass
    let ship_pos = state.ship.pos;
    let ship_radius = state.ship.radius();
    let invulnerability = state.tuning.ship.damage_invulnerability;

    for asteroid in &state.asteroids {
        if state.dash.is_invulnerable() || state.session.is_game_over() {
            break;
        }
        if circles_overlap(ship_pos, ship_radius, asteroid.pos, asteroid.radius()) {
            damage_ship(
                &mut state.ship,
                &mut state.dash,
                &mut state.session,
                &mut state.events,
                invulnerability,
            );
        }
    }

    state
        .asteroids
        .retain(|a| !out_of_bounds(a.pos, a.size, world));
}

/// Spawn and collect fruit
fn update_fruit(state: &mut GameState, dt: f32, world: Vec2) {
    let spawn = &state.tuning.spawn;

    state.session.fruit_spawn_timer -= dt;
    if state.session.active_fruit < spawn.max_fruit && state.session.fruit_spawn_timer <= 0.0 {
        if state.fruit.len() < spawn.fruit_pool_size() {
            let fruit = state.fruit_factory.create(
                state.session.elapsed,
                world,
                state.ship.pos,
                spawn,
            );
            state.events.push(GameEvent::FruitSpawned(fruit.kind));
            state.fruit.push(fruit);
            state.session.active_fruit += 1;
        }
        state.session.fruit_spawn_timer = spawn.fruit_interval;
    }

    if state.dash.is_invulnerable() || state.session.is_game_over() {
        return;
    }

    let ship_pos = state.ship.pos;
    let ship_radius = state.ship.radius();
    let session = &mut state.session;
    let events = &mut state.events;

    state.fruit.retain(|fruit| {
        if !circles_overlap(ship_pos, ship_radius, fruit.pos, fruit.radius()) {
            return true;
        }
        debug_assert!(session.active_fruit > 0, "collected fruit that was never counted");
        session.active_fruit = session.active_fruit.saturating_sub(1);
        session.collected_fruit += fruit.value();
        log::debug!(
            "Collected {:?}, total {}",
            fruit.kind,
            session.collected_fruit
        );
        events.push(GameEvent::FruitCollected {
            kind: fruit.kind,
            total: session.collected_fruit,
        });
        false
    });

    debug_assert_eq!(state.session.active_fruit, state.fruit.len());
}

/// Apply one hit unless the ship is protected. Returns true if it landed.
fn damage_ship(
    ship: &mut Ship,
    dash: &mut DashController,
    session: &mut SessionState,
    events: &mut Vec<GameEvent>,
    invulnerability: f32,
) -> bool {
    if dash.is_invulnerable() || session.is_game_over() {
        return false;
    }

    let health = ship.take_damage();
    events.push(GameEvent::ShipDamaged { health });

    if health == 0 {
        log::info!("Game over after {:.1}s", session.elapsed);
        session.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    } else {
        log::debug!("Ship hit, {} health left", health);
        dash.set_invulnerable(invulnerability);
    }
    true
}

impl GameState {
    /// Hit the ship once, honouring invulnerability. Returns true if it landed.
    pub fn damage_ship(&mut self) -> bool {
        damage_ship(
            &mut self.ship,
            &mut self.dash,
            &mut self.session,
            &mut self.events,
            self.tuning.ship.damage_invulnerability,
        )
    }
}

/// Demo bot: chase the nearest fruit, dash away from close asteroids
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.session.phase {
        GamePhase::Menu => {
            input.start = true;
            return;
        }
        GamePhase::GameOver | GamePhase::Victory => return,
        GamePhase::Playing => {}
    }

    let ship = &state.ship;

    let threat = state
        .asteroids
        .iter()
        .filter(|a| a.vel.dot(ship.pos - a.pos) > 0.0)
        .map(|a| (a, ship.pos.distance(a.pos) - a.radius() - ship.radius()))
        .filter(|(_, gap)| *gap < AUTOPILOT_THREAT_DISTANCE)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((asteroid, _)) = threat {
        if state.dash.is_ready() {
            // Sidestep across the asteroid's path, away from its centre line
            let across = asteroid.vel.perp().normalize_or_zero();
            let side = if across.dot(ship.pos - asteroid.pos) >= 0.0 {
                across
            } else {
                -across
            };
            input.steer(side, 0.3);
            input.dash = true;
            return;
        }
    }

    let target = state.fruit.iter().min_by(|a, b| {
        a.pos
            .distance_squared(ship.pos)
            .partial_cmp(&b.pos.distance_squared(ship.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    match target {
        Some(fruit) => input.steer(fruit.pos - ship.pos, AUTOPILOT_DEADZONE),
        None => input.steer(Vec2::ZERO, AUTOPILOT_DEADZONE),
    }
}
