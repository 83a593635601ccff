//! # Climate Model
//!
//! Turns three noise channels into a biome id:
//! - Elevation (continents, oceans, mountains)
//! - Temperature (noise, cooled by elevation)
//! - Humidity (separate noise channel)
//!
//! Nether and End use flat single-biome climates.

use lodestone_shared::{BiomeId, Dimension, Seed};

use crate::noise::SimplexField;

/// Sea level of the procedural world, in blocks.
pub const SEA_LEVEL: i32 = 63;

/// Climate sampler for one seed.
#[derive(Clone)]
pub struct ClimateSampler {
    seed: Seed,
    elevation: SimplexField,
    temperature: SimplexField,
    humidity: SimplexField,
}

impl ClimateSampler {
    /// Continents are a few thousand blocks across.
    const ELEVATION_SCALE: f64 = 0.0008;
    /// Temperature bands change more slowly than terrain.
    const TEMPERATURE_SCALE: f64 = 0.0005;
    const HUMIDITY_SCALE: f64 = 0.0007;

    /// Creates the sampler for `seed`.
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            elevation: SimplexField::new(seed.derive(1)),
            temperature: SimplexField::new(seed.derive(2)),
            humidity: SimplexField::new(seed.derive(3)),
        }
    }

    /// Seed this sampler was built for.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> Seed {
        self.seed
    }

    /// Elevation in `[-1, 1]` at a block column.
    #[must_use]
    pub fn elevation(&self, x: f64, z: f64) -> f64 {
        self.elevation
            .fractal(x * Self::ELEVATION_SCALE, z * Self::ELEVATION_SCALE, 4)
    }

    /// Surface height in blocks at a column.
    #[must_use]
    pub fn surface_height(&self, x: f64, z: f64) -> i32 {
        let e = self.elevation(x, z);
        SEA_LEVEL + (e * 96.0) as i32
    }

    /// Biome at a block column.
    #[must_use]
    pub fn biome(&self, dimension: Dimension, x: f64, z: f64) -> BiomeId {
        match dimension {
            Dimension::Nether => BiomeId::NETHER_WASTES,
            Dimension::End => BiomeId::THE_END,
            Dimension::Overworld => {
                let elevation = self.elevation(x, z);
                let temperature = self
                    .temperature
                    .fractal(x * Self::TEMPERATURE_SCALE, z * Self::TEMPERATURE_SCALE, 3)
                    - elevation.max(0.0) * 0.5;
                let humidity = self
                    .humidity
                    .fractal(x * Self::HUMIDITY_SCALE, z * Self::HUMIDITY_SCALE, 3);
                classify(elevation, temperature.clamp(-1.0, 1.0), humidity)
            }
        }
    }
}

/// Maps climate values to a biome.
#[must_use]
pub fn classify(elevation: f64, temperature: f64, humidity: f64) -> BiomeId {
    // Oceans
    if elevation < -0.45 {
        return match temperature {
            t if t < -0.5 => BiomeId::DEEP_FROZEN_OCEAN,
            t if t < -0.1 => BiomeId::DEEP_COLD_OCEAN,
            t if t > 0.4 => BiomeId::DEEP_LUKEWARM_OCEAN,
            _ => BiomeId::DEEP_OCEAN,
        };
    }
    if elevation < -0.15 {
        return match temperature {
            t if t < -0.5 => BiomeId::FROZEN_OCEAN,
            t if t < -0.1 => BiomeId::COLD_OCEAN,
            t if t > 0.5 => BiomeId::WARM_OCEAN,
            t if t > 0.25 => BiomeId::LUKEWARM_OCEAN,
            _ => BiomeId::OCEAN,
        };
    }
    if elevation < -0.08 {
        return if temperature < -0.4 {
            BiomeId::SNOWY_BEACH
        } else {
            BiomeId::BEACH
        };
    }

    // Highlands
    if elevation > 0.6 {
        return if temperature < -0.2 {
            BiomeId::JAGGED_PEAKS
        } else {
            BiomeId::WINDSWEPT_HILLS
        };
    }
    if elevation > 0.45 {
        return if humidity > 0.0 {
            BiomeId::GROVE
        } else {
            BiomeId::MEADOW
        };
    }

    match (temperature, humidity) {
        // Cold
        (t, h) if t < -0.45 && h > 0.1 => BiomeId::SNOWY_TAIGA,
        (t, _) if t < -0.45 => BiomeId::SNOWY_PLAINS,
        (t, h) if t < -0.15 && h > -0.1 => BiomeId::TAIGA,

        // Hot
        (t, h) if t > 0.45 && h < -0.3 => BiomeId::DESERT,
        (t, h) if t > 0.45 && h > 0.4 => BiomeId::JUNGLE,
        (t, h) if t > 0.25 && h < 0.0 => BiomeId::SAVANNA,
        (t, _) if t > 0.6 => BiomeId::BADLANDS,

        // Temperate
        (_, h) if h > 0.55 && elevation < 0.05 => BiomeId::SWAMP,
        (_, h) if h > 0.35 => BiomeId::DARK_FOREST,
        (_, h) if h > 0.15 => BiomeId::FOREST,
        (_, h) if h > 0.05 => BiomeId::BIRCH_FOREST,
        (_, h) if h < -0.35 => BiomeId::SUNFLOWER_PLAINS,
        _ => BiomeId::PLAINS,
    }
}
