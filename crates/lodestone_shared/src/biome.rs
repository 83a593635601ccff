//! # Biome Identifiers
//!
//! Numeric biome ids follow the world generator's own numbering, so ids
//! returned by an external oracle can be compared directly against the
//! constants below.
//!
//! Biome lookups are done on a coarse grid: one biome cell covers 4x4
//! blocks, and structure checks always sample a fixed vertical layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Position;

/// Block-to-biome-cell shift (one cell = 4 blocks).
pub const BIOME_CELL_SHIFT: u32 = 2;

/// Block height of the layer structure biome checks sample.
pub const STRUCTURE_LAYER_Y: i32 = 319;

/// A biome identifier as reported by the world oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(pub i32);

#[allow(missing_docs)]
impl BiomeId {
    /// No biome / lookup outside the generated world.
    pub const NONE: Self = Self(-1);

    pub const OCEAN: Self = Self(0);
    pub const PLAINS: Self = Self(1);
    pub const DESERT: Self = Self(2);
    pub const WINDSWEPT_HILLS: Self = Self(3);
    pub const FOREST: Self = Self(4);
    pub const TAIGA: Self = Self(5);
    pub const SWAMP: Self = Self(6);
    pub const RIVER: Self = Self(7);
    pub const NETHER_WASTES: Self = Self(8);
    pub const THE_END: Self = Self(9);
    pub const FROZEN_OCEAN: Self = Self(10);
    pub const SNOWY_PLAINS: Self = Self(12);
    pub const BEACH: Self = Self(16);
    pub const JUNGLE: Self = Self(21);
    pub const DEEP_OCEAN: Self = Self(24);
    pub const SNOWY_BEACH: Self = Self(26);
    pub const BIRCH_FOREST: Self = Self(27);
    pub const DARK_FOREST: Self = Self(29);
    pub const SNOWY_TAIGA: Self = Self(30);
    pub const SAVANNA: Self = Self(35);
    pub const BADLANDS: Self = Self(37);
    pub const WARM_OCEAN: Self = Self(44);
    pub const LUKEWARM_OCEAN: Self = Self(45);
    pub const COLD_OCEAN: Self = Self(46);
    pub const DEEP_WARM_OCEAN: Self = Self(47);
    pub const DEEP_LUKEWARM_OCEAN: Self = Self(48);
    pub const DEEP_COLD_OCEAN: Self = Self(49);
    pub const DEEP_FROZEN_OCEAN: Self = Self(50);
    pub const SUNFLOWER_PLAINS: Self = Self(129);
    pub const MEADOW: Self = Self(177);
    pub const GROVE: Self = Self(178);
    pub const JAGGED_PEAKS: Self = Self(180);
    pub const DEEP_DARK: Self = Self(183);
    pub const MANGROVE_SWAMP: Self = Self(184);
}

impl BiomeId {
    /// Returns false for the "none" sentinel and any negative id.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "biome#{}", self.0)
    }
}

/// A biome-grid cell (block coordinates shifted right by [`BIOME_CELL_SHIFT`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BiomeCell {
    /// Cell X
    pub x: i32,
    /// Cell Y
    pub y: i32,
    /// Cell Z
    pub z: i32,
}

impl BiomeCell {
    /// Cell containing `pos` on the structure sampling layer.
    #[inline]
    #[must_use]
    pub const fn at_structure_layer(pos: Position) -> Self {
        Self {
            x: pos.x >> BIOME_CELL_SHIFT,
            y: STRUCTURE_LAYER_Y >> BIOME_CELL_SHIFT,
            z: pos.z >> BIOME_CELL_SHIFT,
        }
    }

    /// Block position of this cell's north-west corner.
    #[inline]
    #[must_use]
    pub const fn block_origin(self) -> Position {
        Position::new(self.x << BIOME_CELL_SHIFT, self.z << BIOME_CELL_SHIFT)
    }
}
