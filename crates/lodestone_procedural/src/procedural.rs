//! # Procedural Oracle
//!
//! A self-contained, deterministic [`WorldOracle`] built on simplex noise.
//!
//! It is *not* a reimplementation of any game's world generator. It exists
//! so the engine can be run, benchmarked and demonstrated without linking an
//! external generator, while still behaving like one:
//!
//! - one structure candidate per region, at a seeded offset inside it
//! - placement viability driven by the biome under the candidate
//! - terrain viability driven by surface height and slope
//!
//! ## Placement Grid
//!
//! ```text
//!  region (rx, rz) = spacing x spacing chunks
//!  ┌──────────────────────────┐
//!  │ candidate anywhere in    │
//!  │ [0, spacing - separation)│
//!  │ chunks from the corner   │
//!  └──────────────────────────┘
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lodestone_shared::{BiomeCell, BiomeId, Dimension, Position, Seed, StructureKind};

use crate::classifier::{is_deep_ocean, is_shipwreck_biome, is_village_biome};
use crate::climate::{ClimateSampler, SEA_LEVEL};
use crate::oracle::{OracleContext, OracleResult, WorldOracle};

/// Blocks per chunk.
const CHUNK_BLOCKS: i64 = 16;

/// Placement grid of one structure kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Region side length, in chunks.
    pub spacing: u32,
    /// Margin kept free at the far edge of each region, in chunks.
    pub separation: u32,
    /// Salt mixed into the region RNG.
    pub salt: u64,
    /// Chance a region places a candidate at all.
    pub frequency: f64,
}

impl PlacementConfig {
    const fn new(spacing: u32, separation: u32, salt: u64, frequency: f64) -> Self {
        Self {
            spacing,
            separation,
            salt,
            frequency,
        }
    }

    /// Default grid for `kind`.
    #[must_use]
    pub const fn for_structure(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Village => Self::new(34, 8, 10_387_312, 1.0),
            StructureKind::DesertPyramid => Self::new(32, 8, 14_357_617, 1.0),
            StructureKind::JunglePyramid => Self::new(32, 8, 14_357_619, 1.0),
            StructureKind::SwampHut => Self::new(32, 8, 14_357_620, 1.0),
            StructureKind::Igloo => Self::new(32, 8, 14_357_618, 1.0),
            StructureKind::Monument => Self::new(32, 5, 10_387_313, 1.0),
            StructureKind::Mansion => Self::new(80, 20, 10_387_319, 1.0),
            StructureKind::Outpost => Self::new(80, 24, 165_745_296, 0.2),
            StructureKind::AncientCity => Self::new(24, 8, 20_083_232, 1.0),
            StructureKind::RuinedPortal => Self::new(40, 15, 34_222_645, 1.0),
            StructureKind::Shipwreck => Self::new(24, 4, 165_745_295, 1.0),
            StructureKind::Bastion => Self::new(30, 4, 30_084_232, 0.4),
            StructureKind::Fortress => Self::new(30, 4, 30_084_233, 0.6),
            StructureKind::NetherRuinedPortal => Self::new(25, 10, 34_222_645, 1.0),
            StructureKind::EndCity => Self::new(20, 11, 10_387_313, 1.0),
        }
    }

    /// Region side length in blocks.
    #[inline]
    #[must_use]
    pub const fn region_blocks(self) -> u32 {
        self.spacing * CHUNK_BLOCKS as u32
    }
}

/// Deterministic noise-driven world oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProceduralOracle;

impl ProceduralOracle {
    /// Creates the oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl WorldOracle for ProceduralOracle {
    type Context = ProceduralContext;

    fn create_context(&self) -> OracleResult<Self::Context> {
        Ok(ProceduralContext { climate: None })
    }
}

/// Per-worker context. Keeps the climate of the last seed queried.
pub struct ProceduralContext {
    climate: Option<ClimateSampler>,
}

impl ProceduralContext {
    fn climate(&mut self, seed: Seed) -> &ClimateSampler {
        let stale = self.climate.as_ref().map_or(true, |c| c.seed() != seed);
        if stale {
            self.climate = Some(ClimateSampler::new(seed));
        }
        self.climate.get_or_insert_with(|| ClimateSampler::new(seed))
    }

    fn surface_biome(&mut self, seed: Seed, kind: StructureKind, pos: Position) -> BiomeId {
        self.climate(seed)
            .biome(kind.dimension(), f64::from(pos.x), f64::from(pos.z))
    }
}

/// Biomes a structure can generate in.
fn biome_allows(kind: StructureKind, biome: BiomeId) -> bool {
    match kind {
        StructureKind::Village => is_village_biome(biome),
        StructureKind::DesertPyramid => biome == BiomeId::DESERT,
        StructureKind::JunglePyramid => biome == BiomeId::JUNGLE,
        StructureKind::SwampHut => matches!(biome, BiomeId::SWAMP | BiomeId::MANGROVE_SWAMP),
        StructureKind::Igloo => matches!(biome, BiomeId::SNOWY_PLAINS | BiomeId::SNOWY_TAIGA),
        StructureKind::Monument => is_deep_ocean(biome),
        StructureKind::Mansion => biome == BiomeId::DARK_FOREST,
        StructureKind::Outpost => {
            is_village_biome(biome) || matches!(biome, BiomeId::GROVE | BiomeId::JAGGED_PEAKS)
        }
        StructureKind::Shipwreck => {
            is_shipwreck_biome(biome)
                || is_deep_ocean(biome)
                || matches!(
                    biome,
                    BiomeId::COLD_OCEAN
                        | BiomeId::FROZEN_OCEAN
                        | BiomeId::LUKEWARM_OCEAN
                        | BiomeId::WARM_OCEAN
                )
        }
        StructureKind::AncientCity
        | StructureKind::RuinedPortal
        | StructureKind::Bastion
        | StructureKind::Fortress
        | StructureKind::NetherRuinedPortal
        | StructureKind::EndCity => true,
    }
}

impl OracleContext for ProceduralContext {
    fn region_block_size(&self, kind: StructureKind) -> OracleResult<u32> {
        Ok(PlacementConfig::for_structure(kind).region_blocks())
    }

    fn candidate_position(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        region_x: i32,
        region_z: i32,
    ) -> OracleResult<Option<Position>> {
        let config = PlacementConfig::for_structure(kind);
        let region_key = (i64::from(region_x) as u64)
            .wrapping_mul(341_873_128_712)
            .wrapping_add((i64::from(region_z) as u64).wrapping_mul(132_897_987_541));
        let mut rng = ChaCha8Rng::seed_from_u64(seed.derive(config.salt ^ region_key));

        if config.frequency < 1.0 && !rng.gen_bool(config.frequency) {
            return Ok(None);
        }

        let span = i64::from(config.spacing - config.separation);
        let chunk_x = i64::from(region_x) * i64::from(config.spacing) + rng.gen_range(0..span);
        let chunk_z = i64::from(region_z) * i64::from(config.spacing) + rng.gen_range(0..span);

        let x = i32::try_from(chunk_x * CHUNK_BLOCKS + 8);
        let z = i32::try_from(chunk_z * CHUNK_BLOCKS + 8);
        Ok(match (x, z) {
            (Ok(x), Ok(z)) => Some(Position::new(x, z)),
            _ => None,
        })
    }

    fn is_viable_placement(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool> {
        let biome = self.surface_biome(seed, kind, pos);
        Ok(biome_allows(kind, biome))
    }

    /// Flat dry ground for overworld surface structures.
    ///
    /// Kinds that skip the terrain check pass unconditionally, as do other
    /// dimensions. Shipwrecks also pass: they rest below sea level, which the
    /// dry ground test would always refuse.
    fn is_viable_terrain(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool> {
        if kind.dimension() != Dimension::Overworld
            || kind.skips_terrain_check()
            || kind == StructureKind::Shipwreck
        {
            return Ok(true);
        }

        let climate = self.climate(seed);
        let (x, z) = (f64::from(pos.x), f64::from(pos.z));
        let heights = [
            climate.surface_height(x - 8.0, z - 8.0),
            climate.surface_height(x + 8.0, z - 8.0),
            climate.surface_height(x - 8.0, z + 8.0),
            climate.surface_height(x + 8.0, z + 8.0),
        ];
        let lowest = heights.iter().copied().min().unwrap_or(SEA_LEVEL);
        let highest = heights.iter().copied().max().unwrap_or(SEA_LEVEL);

        Ok(lowest >= SEA_LEVEL && highest - lowest <= 8)
    }

    fn biome_at(
        &mut self,
        seed: Seed,
        dimension: Dimension,
        cell: BiomeCell,
    ) -> OracleResult<BiomeId> {
        let corner = cell.block_origin();
        Ok(self
            .climate(seed)
            .biome(dimension, f64::from(corner.x), f64::from(corner.z)))
    }
}
