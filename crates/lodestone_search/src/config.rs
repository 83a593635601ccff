//! # Search Configuration
//!
//! Two immutable values drive a run:
//!
//! - [`EngineConfig`]: how the engine runs (threads, batching, sampler
//!   tunables). Fixed for the lifetime of a coordinator.
//! - [`SearchSpec`]: what one run looks for. Passed to every `start`.
//!
//! Both are validated before a single worker thread exists.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::thread;

use lodestone_shared::{
    DistanceWindow, Position, StructureKind, DEFAULT_SEARCH_RADIUS, MAX_SEARCH_RADIUS,
};

use crate::confirm::ConfirmationParams;
use crate::error::{SearchError, SearchResult};
use crate::sampler::{SamplingMode, SeedRange};

/// Default number of seeds pre-generated per worker.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Default capacity of the event feed.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

fn hardware_threads() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Engine-wide settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads per run.
    pub threads: usize,
    /// Seeds pre-generated per worker before evaluation; `0` samples live.
    pub batch_size: usize,
    /// Biome confirmation tunables.
    pub confirmation: ConfirmationParams,
    /// Capacity of the [`SearchEvent`](crate::SearchEvent) feed.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: hardware_threads(),
            batch_size: DEFAULT_BATCH_SIZE,
            confirmation: ConfirmationParams::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Overrides the thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Overrides the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SearchResult<()> {
        if self.threads == 0 {
            return Err(SearchError::InvalidConfig(
                "thread count must be at least 1".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "event capacity must be at least 1".into(),
            ));
        }
        if let Some(problem) = self.confirmation.problem() {
            return Err(SearchError::InvalidConfig(problem));
        }
        Ok(())
    }
}

const fn default_required() -> bool {
    true
}

/// A structure that must sit within a distance window of the base structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachedStructureSpec {
    /// Structure to look for.
    pub kind: StructureKind,
    /// Closest allowed distance from the base, in blocks.
    #[serde(default)]
    pub min_distance: u32,
    /// Farthest allowed distance from the base, in blocks.
    pub max_distance: u32,
    /// Non-required attachments are ignored by the solver.
    #[serde(default = "default_required")]
    pub required: bool,
}

impl AttachedStructureSpec {
    /// Required attachment within `window` of the base.
    #[must_use]
    pub const fn new(kind: StructureKind, window: DistanceWindow) -> Self {
        Self {
            kind,
            min_distance: window.min,
            max_distance: window.max,
            required: true,
        }
    }

    /// Marks the attachment optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Distance window around the base.
    #[inline]
    #[must_use]
    pub const fn window(&self) -> DistanceWindow {
        DistanceWindow::new(self.min_distance, self.max_distance)
    }
}

const fn default_max_radius() -> u32 {
    DEFAULT_SEARCH_RADIUS
}

/// What one run searches for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    /// Base structure.
    pub structure: StructureKind,
    /// Center of the search.
    #[serde(default)]
    pub origin: Position,
    /// Inner radius, blocks.
    #[serde(default)]
    pub min_radius: u32,
    /// Outer radius, blocks.
    #[serde(default = "default_max_radius")]
    pub max_radius: u32,
    /// Seed range.
    #[serde(default)]
    pub seed_range: SeedRange,
    /// Seed enumeration strategy.
    #[serde(default)]
    pub sampling: SamplingMode,
    /// Keep searching after the first find.
    #[serde(default)]
    pub continuous: bool,
    /// Attached structures; empty for a single-structure search.
    #[serde(default)]
    pub attached: Vec<AttachedStructureSpec>,
}

impl SearchSpec {
    /// Single-structure search around the world origin with default radius.
    #[must_use]
    pub fn new(structure: StructureKind) -> Self {
        Self {
            structure,
            origin: Position::ORIGIN,
            min_radius: 0,
            max_radius: DEFAULT_SEARCH_RADIUS,
            seed_range: SeedRange::default(),
            sampling: SamplingMode::default(),
            continuous: false,
            attached: Vec::new(),
        }
    }

    /// Sets the radius window.
    #[must_use]
    pub fn with_radius(mut self, min_radius: u32, max_radius: u32) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Position) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the seed range.
    #[must_use]
    pub fn with_seed_range(mut self, range: SeedRange) -> Self {
        self.seed_range = range;
        self
    }

    /// Sets the sampling mode.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets continuous mode.
    #[must_use]
    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Adds an attached structure.
    #[must_use]
    pub fn attach(mut self, spec: AttachedStructureSpec) -> Self {
        self.attached.push(spec);
        self
    }

    /// Base structure distance window.
    #[inline]
    #[must_use]
    pub const fn window(&self) -> DistanceWindow {
        DistanceWindow::new(self.min_radius, self.max_radius)
    }

    /// Attachments the solver has to satisfy.
    pub fn required_attachments(&self) -> impl Iterator<Item = &AttachedStructureSpec> {
        self.attached.iter().filter(|spec| spec.required)
    }

    /// Structure kinds the run will ask the oracle about.
    pub fn queried_kinds(&self) -> impl Iterator<Item = StructureKind> + '_ {
        std::iter::once(self.structure).chain(self.required_attachments().map(|spec| spec.kind))
    }

    /// Checks radii and attachment windows.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> SearchResult<()> {
        check_window("search radius", self.window())?;
        for spec in &self.attached {
            check_window(spec.kind.display_name(), spec.window())?;
        }
        Ok(())
    }
}

fn check_window(what: &str, window: DistanceWindow) -> SearchResult<()> {
    if !window.is_valid() {
        return Err(SearchError::InvalidConfig(format!(
            "{what}: minimum {} exceeds maximum {}",
            window.min, window.max
        )));
    }
    if window.max > MAX_SEARCH_RADIUS {
        return Err(SearchError::InvalidConfig(format!(
            "{what}: {} exceeds the world border ({MAX_SEARCH_RADIUS})",
            window.max
        )));
    }
    Ok(())
}
