//! # Biome Classification
//!
//! Stateless predicates mapping a biome id to the categories structure
//! placement cares about, plus the per-structure biome rules.
//!
//! | Structure | Category      | Confirmation radius |
//! |-----------|---------------|---------------------|
//! | Monument  | deep ocean    | 32                  |
//! | Mansion   | dark forest   | 64                  |
//! | Shipwreck | coast / ocean | 32                  |
//! | Village   | village land  | 16                  |
//!
//! Every other structure has no biome gate.

use lodestone_shared::{BiomeId, StructureKind};

/// Semantic biome category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiomeCategory {
    /// Any deep ocean variant
    DeepOcean,
    /// Beaches and shallow ocean
    Shipwreck,
    /// Biomes villages generate in
    Village,
    /// Dark forest only
    DarkForest,
}

impl BiomeCategory {
    /// Returns true if `biome` belongs to this category.
    #[must_use]
    pub const fn contains(self, biome: BiomeId) -> bool {
        match self {
            Self::DeepOcean => is_deep_ocean(biome),
            Self::Shipwreck => is_shipwreck_biome(biome),
            Self::Village => is_village_biome(biome),
            Self::DarkForest => biome.0 == BiomeId::DARK_FOREST.0,
        }
    }
}

/// Deep ocean, deep frozen, deep cold and deep lukewarm ocean.
#[must_use]
pub const fn is_deep_ocean(biome: BiomeId) -> bool {
    matches!(
        biome,
        BiomeId::DEEP_OCEAN
            | BiomeId::DEEP_FROZEN_OCEAN
            | BiomeId::DEEP_COLD_OCEAN
            | BiomeId::DEEP_LUKEWARM_OCEAN
    )
}

/// Beach, snowy beach and ocean.
#[must_use]
pub const fn is_shipwreck_biome(biome: BiomeId) -> bool {
    matches!(biome, BiomeId::BEACH | BiomeId::SNOWY_BEACH | BiomeId::OCEAN)
}

/// Desert, plains, meadow, savanna, snowy plains, taiga, snowy taiga and
/// sunflower plains.
#[must_use]
pub const fn is_village_biome(biome: BiomeId) -> bool {
    matches!(
        biome,
        BiomeId::DESERT
            | BiomeId::PLAINS
            | BiomeId::MEADOW
            | BiomeId::SAVANNA
            | BiomeId::SNOWY_PLAINS
            | BiomeId::TAIGA
            | BiomeId::SNOWY_TAIGA
            | BiomeId::SUNFLOWER_PLAINS
    )
}

/// Biome gate of a structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomeRule {
    /// Category the biome under the candidate must belong to.
    pub category: BiomeCategory,
    /// Radius (blocks) the candidate's biome must dominate.
    pub confirm_radius: u32,
}

impl BiomeRule {
    /// Returns the biome rule for `kind`, if it has one.
    #[must_use]
    pub const fn for_structure(kind: StructureKind) -> Option<Self> {
        match kind {
            StructureKind::Monument => Some(Self {
                category: BiomeCategory::DeepOcean,
                confirm_radius: 32,
            }),
            StructureKind::Mansion => Some(Self {
                category: BiomeCategory::DarkForest,
                confirm_radius: 64,
            }),
            StructureKind::Shipwreck => Some(Self {
                category: BiomeCategory::Shipwreck,
                confirm_radius: 32,
            }),
            StructureKind::Village => Some(Self {
                category: BiomeCategory::Village,
                confirm_radius: 16,
            }),
            _ => None,
        }
    }
}
