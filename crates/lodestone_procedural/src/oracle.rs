//! # World Oracle
//!
//! The seam between the search engine and the world generator.
//!
//! The generator itself is external: it knows where each region places its
//! structure candidate, whether that candidate survives generation, and which
//! biome covers a column. The engine only decides *what to ask and in which
//! order*.
//!
//! ## Contexts
//!
//! Generators keep mutable per-seed state (layer caches, applied seed).
//! Instead of sharing one generator behind a lock, every search worker asks
//! the oracle for its own [`OracleContext`] once, and passes it down the call
//! chain by `&mut`:
//!
//! ```text
//!   WorldOracle (Arc, shared, immutable)
//!        │ create_context()
//!        ├──────────────┬──────────────┐
//!        ▼              ▼              ▼
//!   Context (T0)   Context (T1)   Context (T2)   ← owned by one worker each
//! ```

use lodestone_shared::{BiomeCell, BiomeId, Dimension, Position, Seed, StructureKind};
use thiserror::Error;

/// Errors reported by a world oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle has no placement configuration for this structure.
    #[error("no placement configuration for {0}")]
    Unsupported(StructureKind),

    /// A single query failed. The engine skips the candidate and moves on.
    #[error("{query} query failed at {position}: {reason}")]
    Query {
        /// Which query failed.
        query: &'static str,
        /// Block position the query was about.
        position: Position,
        /// Oracle-provided reason.
        reason: String,
    },

    /// The context itself is unusable. Fatal for the worker that owns it.
    #[error("oracle context failure: {0}")]
    Context(String),
}

impl OracleError {
    /// Returns true if only the current candidate is affected.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

/// Result type for oracle queries.
pub type OracleResult<T> = Result<T, OracleError>;

/// Per-worker handle on the world generator.
///
/// Every query takes the seed explicitly; implementations are free to cache
/// whatever they derive from the last seed they saw.
pub trait OracleContext: Send {
    /// Side length of one placement region for `kind`, in blocks.
    ///
    /// # Errors
    ///
    /// [`OracleError::Unsupported`] if the generator cannot place `kind`.
    fn region_block_size(&self, kind: StructureKind) -> OracleResult<u32>;

    /// The single candidate position region `(region_x, region_z)` places for
    /// `kind`, or `None` if the region places nothing.
    ///
    /// # Errors
    ///
    /// Any oracle failure.
    fn candidate_position(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        region_x: i32,
        region_z: i32,
    ) -> OracleResult<Option<Position>>;

    /// Whether the structure actually generates at `pos`.
    ///
    /// # Errors
    ///
    /// Any oracle failure.
    fn is_viable_placement(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool>;

    /// Whether the surrounding terrain allows the structure at `pos`.
    ///
    /// # Errors
    ///
    /// Any oracle failure.
    fn is_viable_terrain(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool>;

    /// Biome of one biome-grid cell.
    ///
    /// # Errors
    ///
    /// Any oracle failure.
    fn biome_at(&mut self, seed: Seed, dimension: Dimension, cell: BiomeCell)
        -> OracleResult<BiomeId>;
}

/// A world generator able to hand out per-worker contexts.
pub trait WorldOracle: Send + Sync + 'static {
    /// Context type owned by one worker.
    type Context: OracleContext;

    /// Creates a fresh context.
    ///
    /// Called once per worker thread, on that thread.
    ///
    /// # Errors
    ///
    /// [`OracleError::Context`] if the generator cannot be initialised.
    fn create_context(&self) -> OracleResult<Self::Context>;
}
