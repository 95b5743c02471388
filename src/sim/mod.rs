//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod dash;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, out_of_bounds, wrap_position};
pub use dash::{DashController, DashPhase, TRAIL_LENGTH, TrailGhost};
pub use snapshot::{DashView, SessionView, ShipView, Snapshot};
pub use spawn::{AsteroidFactory, FruitFactory, FruitPlacement, pick_weighted};
pub use state::{
    Asteroid, AsteroidKind, AsteroidProfile, Fruit, FruitKind, GameEvent, GamePhase, GameState,
    SessionState, Ship,
};
pub use tick::{TickInput, tick};
