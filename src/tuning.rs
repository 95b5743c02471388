//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads comes from [`Tuning`]. The
//! defaults reproduce the shipped balance; a JSON file can override any subset.
//! Bad values are rejected up front so the simulation never has to deal with
//! them mid-frame.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{AsteroidKind, FruitKind};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A weight table has no entries at all
    #[error("{table}: band {band} has no entries")]
    EmptyWeightBand { table: &'static str, band: usize },

    /// A weight table sums to zero, nothing could ever be drawn from it
    #[error("{table}: band {band} weights sum to zero")]
    ZeroWeightSum { table: &'static str, band: usize },

    /// A weight table whose sum does not fit in a u32
    #[error("{table}: band {band} weights overflow")]
    WeightOverflow { table: &'static str, band: usize },

    /// Band thresholds must be strictly descending
    #[error("{table}: band thresholds must be strictly descending (band {band})")]
    BandOrder { table: &'static str, band: usize },

    /// A scalar outside its allowed range
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// One row of a spawn schedule: the weights to use once the session has run
/// longer than `after_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBand<K> {
    /// Applies when elapsed session time is strictly greater than this
    pub after_secs: f64,
    /// (kind, weight) in draw order
    pub weights: Vec<(K, u32)>,
}

impl<K> WeightBand<K> {
    pub fn new(after_secs: f64, weights: Vec<(K, u32)>) -> Self {
        Self { after_secs, weights }
    }

    /// Sum of all weights in the band, `None` if it overflows
    pub fn total(&self) -> Option<u32> {
        weight_total(&self.weights)
    }
}

/// Checked sum of a `(kind, weight)` table
pub fn weight_total<K>(weights: &[(K, u32)]) -> Option<u32> {
    weights.iter().try_fold(0u32, |sum, (_, w)| sum.checked_add(*w))
}

/// Pick the band for the given elapsed time.
///
/// Bands are ordered from the latest threshold to the earliest; the first one
/// whose threshold is exceeded wins, otherwise the last band is the base.
pub fn band_for<K>(bands: &[WeightBand<K>], elapsed: f64) -> Option<&WeightBand<K>> {
    bands
        .iter()
        .find(|band| elapsed > band.after_secs)
        .or_else(|| bands.last())
}

/// World bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

impl WorldTuning {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Player ship kinematics and health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuning {
    pub width: f32,
    pub height: f32,
    pub start: (f32, f32),
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_health: u8,
    pub hitbox_divisor: f32,
    pub damage_invulnerability: f32,
}

impl Default for ShipTuning {
    fn default() -> Self {
        Self {
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
            start: (SHIP_START_X, SHIP_START_Y),
            max_speed: SHIP_MAX_SPEED,
            acceleration: SHIP_ACCELERATION,
            deceleration: SHIP_DECELERATION,
            max_health: MAX_HEALTH,
            hitbox_divisor: SHIP_HITBOX_DIVISOR,
            damage_invulnerability: DAMAGE_INVULNERABILITY,
        }
    }
}

impl ShipTuning {
    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.start.0, self.start.1)
    }
}

/// Dash ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    pub duration: f32,
    pub cooldown: f32,
    pub distance: f32,
    pub grace: f32,
    pub exit_speed_factor: f32,
    pub exit_progress: f32,
    pub direction_threshold: f32,
    pub display_smoothing: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            duration: DASH_DURATION,
            cooldown: DASH_COOLDOWN,
            distance: DASH_DISTANCE,
            grace: DASH_GRACE,
            exit_speed_factor: DASH_EXIT_SPEED_FACTOR,
            exit_progress: DASH_EXIT_PROGRESS,
            direction_threshold: DASH_DIRECTION_THRESHOLD,
            display_smoothing: COOLDOWN_DISPLAY_SMOOTHING,
        }
    }
}

/// Spawn pacing and placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub asteroid_interval: f32,
    pub max_asteroids: usize,
    /// Asteroid rotation speed is drawn from [-x, x] rad/s
    pub asteroid_rotation_speed: f32,
    /// Asteroids aim at `dim * (band_start + u * band_width)` on each axis
    pub attraction_band_start: f32,
    pub attraction_band_width: f32,
    pub fruit_interval: f32,
    pub max_fruit: usize,
    pub fruit_pool_slack: usize,
    pub fruit_size: f32,
    pub fruit_padding: f32,
    pub fruit_min_player_distance: f32,
    pub fruit_fallback_distance: f32,
    pub fruit_placement_attempts: u32,
    pub win_fruit: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            asteroid_interval: ASTEROID_SPAWN_INTERVAL,
            max_asteroids: MAX_ASTEROIDS,
            asteroid_rotation_speed: ASTEROID_ROTATION_SPEED,
            attraction_band_start: 0.3,
            attraction_band_width: 0.4,
            fruit_interval: FRUIT_SPAWN_INTERVAL,
            max_fruit: MAX_FRUIT,
            fruit_pool_slack: FRUIT_POOL_SLACK,
            fruit_size: FRUIT_SIZE,
            fruit_padding: FRUIT_PADDING,
            fruit_min_player_distance: FRUIT_MIN_PLAYER_DISTANCE,
            fruit_fallback_distance: FRUIT_FALLBACK_DISTANCE,
            fruit_placement_attempts: FRUIT_PLACEMENT_ATTEMPTS,
            win_fruit: WIN_FRUIT,
        }
    }
}

impl SpawnTuning {
    /// Bounded fruit collection capacity
    pub fn fruit_pool_size(&self) -> usize {
        self.max_fruit + self.fruit_pool_slack
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub ship: ShipTuning,
    pub dash: DashTuning,
    pub spawn: SpawnTuning,
    pub asteroid_weights: Vec<WeightBand<AsteroidKind>>,
    pub fruit_weights: Vec<WeightBand<FruitKind>>,
}

impl Default for Tuning {
    fn default() -> Self {
        use AsteroidKind::*;
        use FruitKind::*;

        Self {
            world: WorldTuning::default(),
            ship: ShipTuning::default(),
            dash: DashTuning::default(),
            spawn: SpawnTuning::default(),
            // Later bands push toward the bigger, faster rocks
            asteroid_weights: vec![
                WeightBand::new(20.0, vec![(Fire, 50), (Frize, 30), (Normal, 20)]),
                WeightBand::new(10.0, vec![(Fire, 10), (Frize, 60), (Normal, 30)]),
                WeightBand::new(0.0, vec![(Fire, 5), (Frize, 10), (Normal, 85)]),
            ],
            fruit_weights: vec![
                WeightBand::new(20.0, vec![(Banana, 50), (Grape, 50)]),
                WeightBand::new(10.0, vec![(Banana, 30), (Grape, 70)]),
                WeightBand::new(0.0, vec![(Banana, 10), (Grape, 90)]),
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance file. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON balance file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the effective balance)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;

        positive("ship.width", self.ship.width)?;
        positive("ship.height", self.ship.height)?;
        positive("ship.max_speed", self.ship.max_speed)?;
        non_negative("ship.acceleration", self.ship.acceleration)?;
        non_negative("ship.deceleration", self.ship.deceleration)?;
        positive("ship.hitbox_divisor", self.ship.hitbox_divisor)?;
        non_negative("ship.damage_invulnerability", self.ship.damage_invulnerability)?;
        if self.ship.max_health == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ship.max_health",
                reason: "must be at least 1",
            });
        }

        positive("dash.duration", self.dash.duration)?;
        positive("dash.cooldown", self.dash.cooldown)?;
        non_negative("dash.distance", self.dash.distance)?;
        non_negative("dash.grace", self.dash.grace)?;
        positive("dash.direction_threshold", self.dash.direction_threshold)?;
        if self.dash.duration >= self.dash.cooldown {
            // A dash outliving its cooldown would leave it dashing while ready
            return Err(ConfigError::InvalidValue {
                field: "dash.duration",
                reason: "must be shorter than dash.cooldown",
            });
        }
        if !(0.0..=1.0).contains(&self.dash.exit_progress) {
            return Err(ConfigError::InvalidValue {
                field: "dash.exit_progress",
                reason: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.dash.display_smoothing) {
            return Err(ConfigError::InvalidValue {
                field: "dash.display_smoothing",
                reason: "must be within [0, 1]",
            });
        }

        positive("spawn.asteroid_interval", self.spawn.asteroid_interval)?;
        positive("spawn.fruit_interval", self.spawn.fruit_interval)?;
        positive("spawn.fruit_size", self.spawn.fruit_size)?;
        non_negative("spawn.asteroid_rotation_speed", self.spawn.asteroid_rotation_speed)?;
        non_negative("spawn.fruit_padding", self.spawn.fruit_padding)?;
        if self.spawn.fruit_padding * 2.0 >= self.world.width.min(self.world.height) {
            return Err(ConfigError::InvalidValue {
                field: "spawn.fruit_padding",
                reason: "leaves no room to place fruit",
            });
        }
        if self.spawn.win_fruit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn.win_fruit",
                reason: "must be at least 1",
            });
        }

        validate_bands("asteroid_weights", &self.asteroid_weights)?;
        validate_bands("fruit_weights", &self.fruit_weights)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be a positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be zero or positive",
        })
    }
}

fn validate_bands<K>(table: &'static str, bands: &[WeightBand<K>]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::EmptyWeightBand { table, band: 0 });
    }
    for (i, band) in bands.iter().enumerate() {
        if band.weights.is_empty() {
            return Err(ConfigError::EmptyWeightBand { table, band: i });
        }
        match band.total() {
            None => return Err(ConfigError::WeightOverflow { table, band: i }),
            Some(0) => return Err(ConfigError::ZeroWeightSum { table, band: i }),
            Some(_) => {}
        }
        if i > 0 && band.after_secs >= bands[i - 1].after_secs {
            return Err(ConfigError::BandOrder { table, band: i });
        }
    }
    Ok(())
}
