//! Asteroid and fruit factories
//!
//! Type selection is a cumulative-weight draw over a band chosen from the
//! elapsed session time. Each factory owns its own seeded RNG so asteroid and
//! fruit streams do not perturb each other.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Asteroid, AsteroidKind, Fruit, FruitKind};
use crate::tuning::{SpawnTuning, WeightBand, band_for, weight_total};

/// Stream offsets so the two factories never share a sequence
const ASTEROID_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const FRUIT_STREAM: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Draw one entry from `(kind, weight)` pairs.
///
/// Walks the entries in order, accumulating weights, and returns the first
/// whose cumulative range contains a uniform draw in `[0, total)`. Returns
/// `None` for an empty, zero-sum or overflowing table.
pub fn pick_weighted<K: Copy, R: Rng>(weights: &[(K, u32)], rng: &mut R) -> Option<K> {
    let total = weight_total(weights)?;
    if total == 0 {
        return None;
    }

    let roll = rng.random_range(0..total);
    let mut cumulative = 0;
    for &(kind, weight) in weights {
        cumulative += weight;
        if roll < cumulative {
            return Some(kind);
        }
    }
    None
}

/// Pick a kind from the band matching `elapsed`, falling back to the default kind
fn pick_from_bands<K: Copy + Default, R: Rng>(
    bands: &[WeightBand<K>],
    elapsed: f64,
    rng: &mut R,
) -> K {
    band_for(bands, elapsed)
        .and_then(|band| pick_weighted(&band.weights, rng))
        .unwrap_or_default()
}

/// Spawns asteroids just off-screen, aimed at the middle of the field
#[derive(Debug, Clone)]
pub struct AsteroidFactory {
    bands: Vec<WeightBand<AsteroidKind>>,
    rng: Pcg32,
}

impl AsteroidFactory {
    pub fn new(bands: Vec<WeightBand<AsteroidKind>>, seed: u64) -> Self {
        Self {
            bands,
            rng: Pcg32::seed_from_u64(seed ^ ASTEROID_STREAM),
        }
    }

    pub fn pick_kind(&mut self, elapsed: f64) -> AsteroidKind {
        pick_from_bands(&self.bands, elapsed, &mut self.rng)
    }

    pub fn create(&mut self, elapsed: f64, world: Vec2, tuning: &SpawnTuning) -> Asteroid {
        let kind = self.pick_kind(elapsed);
        let size = kind.profile().size;

        // 0 = bottom, 1 = right, 2 = top, 3 = left
        let pos = match self.rng.random_range(0..4) {
            0 => Vec2::new(self.rng.random_range(0.0..=world.x), -size),
            1 => Vec2::new(world.x + size, self.rng.random_range(0.0..=world.y)),
            2 => Vec2::new(self.rng.random_range(0.0..=world.x), world.y + size),
            _ => Vec2::new(-size, self.rng.random_range(0.0..=world.y)),
        };

        let attract = Vec2::new(
            world.x * (tuning.attraction_band_start + self.rng.random::<f32>() * tuning.attraction_band_width),
            world.y * (tuning.attraction_band_start + self.rng.random::<f32>() * tuning.attraction_band_width),
        );
        let direction = (attract - pos).normalize_or_zero();

        let spin = tuning.asteroid_rotation_speed;
        let rotation_speed = if spin > 0.0 {
            self.rng.random_range(-spin..=spin)
        } else {
            0.0
        };

        log::debug!("Spawned {:?} asteroid at ({:.0}, {:.0})", kind, pos.x, pos.y);
        Asteroid::new(kind, pos, direction, rotation_speed)
    }
}

/// Where a fruit ended up and how
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitPlacement {
    pub pos: Vec2,
    /// Set when every sampled point was too close to the ship: the unit
    /// direction the fallback point was pushed along before clamping
    pub fallback: Option<Vec2>,
}

impl FruitPlacement {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Spawns fruit inside the padded field, away from the ship
#[derive(Debug, Clone)]
pub struct FruitFactory {
    bands: Vec<WeightBand<FruitKind>>,
    rng: Pcg32,
}

impl FruitFactory {
    pub fn new(bands: Vec<WeightBand<FruitKind>>, seed: u64) -> Self {
        Self {
            bands,
            rng: Pcg32::seed_from_u64(seed ^ FRUIT_STREAM),
        }
    }

    pub fn pick_kind(&mut self, elapsed: f64) -> FruitKind {
        pick_from_bands(&self.bands, elapsed, &mut self.rng)
    }

    /// Rejection-sample a point at least `fruit_min_player_distance` from the
    /// ship, falling back to a fixed-distance point in a random direction.
    pub fn place(&mut self, world: Vec2, ship_pos: Vec2, tuning: &SpawnTuning) -> FruitPlacement {
        let pad = tuning.fruit_padding;
        let min = Vec2::splat(pad);
        let max = world - Vec2::splat(pad);

        for _ in 0..tuning.fruit_placement_attempts {
            let pos = Vec2::new(
                self.rng.random_range(min.x..=max.x),
                self.rng.random_range(min.y..=max.y),
            );
            if pos.distance(ship_pos) >= tuning.fruit_min_player_distance {
                return FruitPlacement {
                    pos,
                    fallback: None,
                };
            }
        }

        let angle = self.rng.random_range(0.0f32..360.0).to_radians();
        let dir = Vec2::from_angle(angle);
        let pos = ship_pos + dir * tuning.fruit_fallback_distance;
        FruitPlacement {
            pos: pos.clamp(min, max),
            fallback: Some(dir),
        }
    }

    pub fn create(
        &mut self,
        elapsed: f64,
        world: Vec2,
        ship_pos: Vec2,
        tuning: &SpawnTuning,
    ) -> Fruit {
        let kind = self.pick_kind(elapsed);
        let placement = self.place(world, ship_pos, tuning);
        if placement.is_fallback() {
            log::debug!("Fruit placement fell back near the ship");
        }
        log::debug!(
            "Spawned {:?} at ({:.0}, {:.0})",
            kind,
            placement.pos.x,
            placement.pos.y
        );
        Fruit::new(kind, placement.pos, tuning.fruit_size)
    }
}
