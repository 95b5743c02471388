//! Read-only view of a frame for presentation layers

use glam::Vec2;
use serde::Serialize;

use super::dash::{DashPhase, TrailGhost};
use super::state::{Asteroid, Fruit, GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: u8,
    pub max_health: u8,
    /// Filled/empty health slots
    pub health_pips: Vec<bool>,
    /// False on the "off" half of the invulnerability blink
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashView {
    pub phase: DashPhase,
    pub ready: bool,
    pub progress: f32,
    pub invulnerable: bool,
    pub start: Vec2,
    pub target: Vec2,
    pub direction: Vec2,
    /// Raw 0..=1 cooldown progress, 1 when ready
    pub cooldown_percentage: f32,
    /// Smoothed 0..=1 fill of the cooldown indicator
    pub cooldown: f32,
    pub trail: Vec<TrailGhost>,
    pub burst: Option<TrailGhost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub phase: GamePhase,
    pub collected_fruit: u32,
    pub win_fruit: u32,
    /// collected / win target, capped at 1
    pub progress: f32,
    pub elapsed: f64,
    pub pulse: f32,
    pub game_over: bool,
    pub victory: bool,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub ship: ShipView,
    pub dash: DashView,
    pub asteroids: Vec<Asteroid>,
    pub fruit: Vec<Fruit>,
    pub session: SessionView,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let ship = &self.ship;
        let dash = &self.dash;
        let session = &self.session;

        Snapshot {
            ship: ShipView {
                pos: ship.pos,
                vel: ship.vel,
                width: ship.width,
                height: ship.height,
                health: ship.health,
                max_health: ship.max_health,
                health_pips: ship.health_pips(),
                visible: self.ship_visible(),
            },
            dash: DashView {
                phase: dash.phase(),
                ready: dash.is_ready(),
                progress: dash.progress(),
                invulnerable: dash.is_invulnerable(),
                start: dash.start_position(),
                target: dash.target_position(),
                direction: dash.direction(),
                cooldown_percentage: dash.cooldown_percentage(),
                cooldown: dash.cooldown_display(),
                trail: dash.trail(ship.width),
                burst: dash.burst(ship.width),
            },
            asteroids: self.asteroids.clone(),
            fruit: self.fruit.clone(),
            session: SessionView {
                phase: session.phase,
                collected_fruit: session.collected_fruit,
                win_fruit: self.tuning.spawn.win_fruit,
                progress: self.fruit_progress(),
                elapsed: session.elapsed,
                pulse: session.pulse,
                game_over: session.is_game_over(),
                victory: session.is_victory(),
            },
        }
    }
}
