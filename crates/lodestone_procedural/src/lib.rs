//! # LODESTONE Procedural
//!
//! Everything the search engine knows about the world comes through here.
//!
//! ## Core Components
//!
//! - `WorldOracle` / `OracleContext`: the seam to the world generator
//! - `BiomeCategory` / `BiomeRule`: which biomes a structure accepts
//! - `ProceduralOracle`: deterministic noise world for the CLI and benchmarks
//! - `ScriptedOracle`: closure-driven, instrumented oracle for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use lodestone_procedural::{OracleContext, ProceduralOracle, WorldOracle};
//! use lodestone_shared::{Seed, StructureKind};
//!
//! let mut ctx = ProceduralOracle::new().create_context()?;
//! let size = ctx.region_block_size(StructureKind::Village)?;
//! let candidate = ctx.candidate_position(Seed::new(42), StructureKind::Village, 0, 0)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod classifier;
pub mod climate;
pub mod noise;
pub mod oracle;
pub mod procedural;
pub mod scripted;

pub use classifier::{
    is_deep_ocean, is_shipwreck_biome, is_village_biome, BiomeCategory, BiomeRule,
};
pub use climate::{ClimateSampler, SEA_LEVEL};
pub use noise::SimplexField;
pub use oracle::{OracleContext, OracleError, OracleResult, WorldOracle};
pub use procedural::{PlacementConfig, ProceduralContext, ProceduralOracle};
pub use scripted::{QueryStats, ScriptedContext, ScriptedOracle, ScriptedOracleBuilder};
