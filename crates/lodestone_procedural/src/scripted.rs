//! # Scripted Oracle
//!
//! A [`WorldOracle`] whose answers come from closures, with every query
//! counted. Used to pin down engine behaviour in tests:
//!
//! ```rust,ignore
//! let oracle = ScriptedOracle::builder()
//!     .region_size(512)
//!     .candidates(|_, _, rx, rz| Ok(Some(Position::new(512 * rx, 512 * rz))))
//!     .biomes(|_, _| Ok(BiomeId::DESERT))
//!     .build();
//!
//! // ... run a search ...
//! assert_eq!(oracle.stats().biome_queries, 12);
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lodestone_shared::{BiomeCell, BiomeId, Dimension, Position, Seed, StructureKind};

use crate::oracle::{OracleContext, OracleError, OracleResult, WorldOracle};

type CandidateFn = dyn Fn(Seed, StructureKind, i32, i32) -> OracleResult<Option<Position>> + Send + Sync;
type ViabilityFn = dyn Fn(Seed, StructureKind, Position) -> OracleResult<bool> + Send + Sync;
type BiomeFn = dyn Fn(Seed, BiomeCell) -> OracleResult<BiomeId> + Send + Sync;

/// Snapshot of how often each query was made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Contexts handed out.
    pub contexts_created: u64,
    /// `candidate_position` calls.
    pub candidate_queries: u64,
    /// `is_viable_placement` calls.
    pub placement_queries: u64,
    /// `is_viable_terrain` calls.
    pub terrain_queries: u64,
    /// `biome_at` calls.
    pub biome_queries: u64,
}

#[derive(Default)]
struct Counters {
    contexts_created: AtomicU64,
    candidate_queries: AtomicU64,
    placement_queries: AtomicU64,
    terrain_queries: AtomicU64,
    biome_queries: AtomicU64,
}

struct Script {
    region_size: u32,
    unsupported: Vec<StructureKind>,
    context_failure: Option<String>,
    candidates: Arc<CandidateFn>,
    placement: Arc<ViabilityFn>,
    terrain: Arc<ViabilityFn>,
    biomes: Arc<BiomeFn>,
    counters: Counters,
    biome_log: Mutex<Vec<BiomeCell>>,
    record_biomes: bool,
}

/// Closure-driven, instrumented oracle.
#[derive(Clone)]
pub struct ScriptedOracle {
    script: Arc<Script>,
}

impl ScriptedOracle {
    /// Starts a builder with permissive defaults.
    #[must_use]
    pub fn builder() -> ScriptedOracleBuilder {
        ScriptedOracleBuilder::default()
    }

    /// Oracle answering `biome` everywhere, one candidate at each region's
    /// north-west corner, every placement viable.
    #[must_use]
    pub fn uniform(biome: BiomeId) -> Self {
        Self::builder().biomes(move |_, _| Ok(biome)).build()
    }

    /// Current query counts.
    #[must_use]
    pub fn stats(&self) -> QueryStats {
        let c = &self.script.counters;
        QueryStats {
            contexts_created: c.contexts_created.load(Ordering::Relaxed),
            candidate_queries: c.candidate_queries.load(Ordering::Relaxed),
            placement_queries: c.placement_queries.load(Ordering::Relaxed),
            terrain_queries: c.terrain_queries.load(Ordering::Relaxed),
            biome_queries: c.biome_queries.load(Ordering::Relaxed),
        }
    }

    /// Zeroes every counter and clears the biome log.
    pub fn reset_stats(&self) {
        let c = &self.script.counters;
        for counter in [
            &c.contexts_created,
            &c.candidate_queries,
            &c.placement_queries,
            &c.terrain_queries,
            &c.biome_queries,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.script.biome_log.lock().clear();
    }

    /// Biome cells queried so far, in query order.
    ///
    /// Empty unless the builder enabled [`ScriptedOracleBuilder::record_biomes`].
    #[must_use]
    pub fn biome_log(&self) -> Vec<BiomeCell> {
        self.script.biome_log.lock().clone()
    }
}

impl WorldOracle for ScriptedOracle {
    type Context = ScriptedContext;

    fn create_context(&self) -> OracleResult<Self::Context> {
        if let Some(reason) = &self.script.context_failure {
            return Err(OracleError::Context(reason.clone()));
        }
        self.script
            .counters
            .contexts_created
            .fetch_add(1, Ordering::Relaxed);
        Ok(ScriptedContext {
            script: Arc::clone(&self.script),
        })
    }
}

/// Context handed to each worker by a [`ScriptedOracle`].
pub struct ScriptedContext {
    script: Arc<Script>,
}

impl OracleContext for ScriptedContext {
    fn region_block_size(&self, kind: StructureKind) -> OracleResult<u32> {
        if self.script.unsupported.contains(&kind) {
            return Err(OracleError::Unsupported(kind));
        }
        Ok(self.script.region_size)
    }

    fn candidate_position(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        region_x: i32,
        region_z: i32,
    ) -> OracleResult<Option<Position>> {
        self.script
            .counters
            .candidate_queries
            .fetch_add(1, Ordering::Relaxed);
        (self.script.candidates)(seed, kind, region_x, region_z)
    }

    fn is_viable_placement(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool> {
        self.script
            .counters
            .placement_queries
            .fetch_add(1, Ordering::Relaxed);
        (self.script.placement)(seed, kind, pos)
    }

    fn is_viable_terrain(
        &mut self,
        seed: Seed,
        kind: StructureKind,
        pos: Position,
    ) -> OracleResult<bool> {
        self.script
            .counters
            .terrain_queries
            .fetch_add(1, Ordering::Relaxed);
        (self.script.terrain)(seed, kind, pos)
    }

    fn biome_at(
        &mut self,
        seed: Seed,
        _dimension: Dimension,
        cell: BiomeCell,
    ) -> OracleResult<BiomeId> {
        self.script
            .counters
            .biome_queries
            .fetch_add(1, Ordering::Relaxed);
        if self.script.record_biomes {
            self.script.biome_log.lock().push(cell);
        }
        (self.script.biomes)(seed, cell)
    }
}

#[allow(clippy::unnecessary_wraps)]
fn always_viable(_: Seed, _: StructureKind, _: Position) -> OracleResult<bool> {
    Ok(true)
}

/// Builder for [`ScriptedOracle`].
pub struct ScriptedOracleBuilder {
    region_size: u32,
    unsupported: Vec<StructureKind>,
    context_failure: Option<String>,
    candidates: Option<Arc<CandidateFn>>,
    placement: Arc<ViabilityFn>,
    terrain: Arc<ViabilityFn>,
    biomes: Arc<BiomeFn>,
    record_biomes: bool,
}

impl Default for ScriptedOracleBuilder {
    fn default() -> Self {
        Self {
            region_size: 512,
            unsupported: Vec::new(),
            context_failure: None,
            candidates: None,
            placement: Arc::new(always_viable),
            terrain: Arc::new(always_viable),
            biomes: Arc::new(|_: Seed, _: BiomeCell| -> OracleResult<BiomeId> { Ok(BiomeId::PLAINS) }),
            record_biomes: false,
        }
    }
}

impl ScriptedOracleBuilder {
    /// Region side length reported for every supported kind.
    #[must_use]
    pub fn region_size(mut self, blocks: u32) -> Self {
        self.region_size = blocks;
        self
    }

    /// Marks `kind` as unsupported.
    #[must_use]
    pub fn unsupported(mut self, kind: StructureKind) -> Self {
        self.unsupported.push(kind);
        self
    }

    /// Makes every `create_context` call fail.
    #[must_use]
    pub fn fail_contexts(mut self, reason: impl Into<String>) -> Self {
        self.context_failure = Some(reason.into());
        self
    }

    /// Candidate position per region.
    #[must_use]
    pub fn candidates<F>(mut self, f: F) -> Self
    where
        F: Fn(Seed, StructureKind, i32, i32) -> OracleResult<Option<Position>> + Send + Sync + 'static,
    {
        self.candidates = Some(Arc::new(f));
        self
    }

    /// Placement viability.
    #[must_use]
    pub fn placement<F>(mut self, f: F) -> Self
    where
        F: Fn(Seed, StructureKind, Position) -> OracleResult<bool> + Send + Sync + 'static,
    {
        self.placement = Arc::new(f);
        self
    }

    /// Terrain viability.
    #[must_use]
    pub fn terrain<F>(mut self, f: F) -> Self
    where
        F: Fn(Seed, StructureKind, Position) -> OracleResult<bool> + Send + Sync + 'static,
    {
        self.terrain = Arc::new(f);
        self
    }

    /// Biome per biome cell.
    #[must_use]
    pub fn biomes<F>(mut self, f: F) -> Self
    where
        F: Fn(Seed, BiomeCell) -> OracleResult<BiomeId> + Send + Sync + 'static,
    {
        self.biomes = Arc::new(f);
        self
    }

    /// Keeps a log of every biome cell queried.
    #[must_use]
    pub fn record_biomes(mut self) -> Self {
        self.record_biomes = true;
        self
    }

    /// Finishes the oracle.
    #[must_use]
    pub fn build(self) -> ScriptedOracle {
        let size = i64::from(self.region_size);
        let candidates: Arc<CandidateFn> = match self.candidates {
            Some(f) => f,
            None => Arc::new(
                move |_: Seed, _: StructureKind, rx: i32, rz: i32| -> OracleResult<Option<Position>> {
                    let x = i32::try_from(i64::from(rx) * size).ok();
                    let z = i32::try_from(i64::from(rz) * size).ok();
                    Ok(x.zip(z).map(|(x, z)| Position::new(x, z)))
                },
            ),
        };

        ScriptedOracle {
            script: Arc::new(Script {
                region_size: self.region_size,
                unsupported: self.unsupported,
                context_failure: self.context_failure,
                candidates,
                placement: self.placement,
                terrain: self.terrain,
                biomes: self.biomes,
                counters: Counters::default(),
                biome_log: Mutex::new(Vec::new()),
                record_biomes: self.record_biomes,
            }),
        }
    }
}
