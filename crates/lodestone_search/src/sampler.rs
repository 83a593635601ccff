//! # Seed Sampler
//!
//! Produces the seeds one worker evaluates.
//!
//! ## Strategies
//!
//! - **Random**: independent `ChaCha8Rng` per worker, seeded from OS entropy
//!   XOR the worker index, uniform over the closed range. Repeats across
//!   workers or runs are possible and harmless.
//! - **Sequential**: worker `i` of `W` visits `min + i, min + i + W, ...`
//!   until it passes `max`. The union over all workers is the whole range,
//!   each seed exactly once.
//!
//! Both are plain iterators with no state beyond their own cursor.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use lodestone_shared::{Seed, SEED_RANGE_32_MAX, SEED_RANGE_32_MIN};

use crate::error::{SearchError, SearchResult};

/// Closed signed range seeds are drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedRange {
    /// `[-2^31, 2^31 - 1]`
    #[default]
    #[serde(rename = "32")]
    Bits32,
    /// `[-2^63, 2^63 - 1]`
    #[serde(rename = "64")]
    Bits64,
}

impl SeedRange {
    /// Smallest seed in the range.
    #[inline]
    #[must_use]
    pub const fn min(self) -> i64 {
        match self {
            Self::Bits32 => SEED_RANGE_32_MIN,
            Self::Bits64 => i64::MIN,
        }
    }

    /// Largest seed in the range.
    #[inline]
    #[must_use]
    pub const fn max(self) -> i64 {
        match self {
            Self::Bits32 => SEED_RANGE_32_MAX,
            Self::Bits64 => i64::MAX,
        }
    }

    /// Short label shown in status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bits32 => "2^32",
            Self::Bits64 => "2^64",
        }
    }
}

/// How seeds are enumerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Uniform random draws, unbounded.
    #[default]
    Random,
    /// Partitioned ascending enumeration, finite.
    Sequential,
}

/// Uniform random seeds for one worker.
pub struct RandomSeeds {
    rng: ChaCha8Rng,
    min: i64,
    max: i64,
}

impl RandomSeeds {
    /// Generator for `worker`, seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// [`SearchError::Entropy`] if the OS has no entropy to give.
    pub fn new(range: SeedRange, worker: usize) -> SearchResult<Self> {
        let entropy = getrandom::u64().map_err(|e| SearchError::Entropy(e.to_string()))?;
        Ok(Self::with_seed(range, entropy ^ worker as u64))
    }

    /// Generator with a fixed seed. Reproducible.
    #[must_use]
    pub fn with_seed(range: SeedRange, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            min: range.min(),
            max: range.max(),
        }
    }
}

impl Iterator for RandomSeeds {
    type Item = Seed;

    #[inline]
    fn next(&mut self) -> Option<Seed> {
        Some(Seed::new(self.rng.gen_range(self.min..=self.max)))
    }
}

/// Residue class `min + worker (mod workers)` of the range, ascending.
#[derive(Clone, Debug)]
pub struct PartitionedSeeds {
    next: Option<i64>,
    step: i64,
    max: i64,
}

impl PartitionedSeeds {
    /// Partition of `worker` among `workers`.
    ///
    /// A worker index past the end of the range yields nothing.
    #[must_use]
    pub fn new(range: SeedRange, worker: usize, workers: usize) -> Self {
        let max = range.max();
        let step = i64::try_from(workers.max(1)).unwrap_or(i64::MAX);
        let next = i64::try_from(worker)
            .ok()
            .and_then(|offset| range.min().checked_add(offset))
            .filter(|&first| first <= max);
        Self { next, step, max }
    }
}

impl Iterator for PartitionedSeeds {
    type Item = Seed;

    #[inline]
    fn next(&mut self) -> Option<Seed> {
        let current = self.next?;
        self.next = current
            .checked_add(self.step)
            .filter(|&following| following <= self.max);
        Some(Seed::new(current))
    }
}

/// Either strategy, chosen at run start.
pub enum SeedStream {
    /// Random draws.
    Random(RandomSeeds),
    /// Partitioned enumeration.
    Partitioned(PartitionedSeeds),
}

impl SeedStream {
    /// Stream for worker `worker` of `workers`.
    ///
    /// # Errors
    ///
    /// [`SearchError::Entropy`] for random sampling without entropy.
    pub fn for_worker(
        mode: SamplingMode,
        range: SeedRange,
        worker: usize,
        workers: usize,
    ) -> SearchResult<Self> {
        Ok(match mode {
            SamplingMode::Random => Self::Random(RandomSeeds::new(range, worker)?),
            SamplingMode::Sequential => {
                Self::Partitioned(PartitionedSeeds::new(range, worker, workers))
            }
        })
    }
}

impl Iterator for SeedStream {
    type Item = Seed;

    #[inline]
    fn next(&mut self) -> Option<Seed> {
        match self {
            Self::Random(seeds) => seeds.next(),
            Self::Partitioned(seeds) => seeds.next(),
        }
    }
}

/// Pre-generates seeds in batches into a reused buffer.
///
/// A batch size of zero disables batching and samples live.
pub struct SeedBatches<I> {
    source: I,
    buffer: Vec<Seed>,
    cursor: usize,
    batch_size: usize,
}

impl<I: Iterator<Item = Seed>> SeedBatches<I> {
    /// Wraps `source`.
    #[must_use]
    pub fn new(source: I, batch_size: usize) -> Self {
        Self {
            source,
            buffer: Vec::with_capacity(batch_size),
            cursor: 0,
            batch_size,
        }
    }

    fn refill(&mut self) {
        self.buffer.clear();
        self.buffer
            .extend(self.source.by_ref().take(self.batch_size));
        self.cursor = 0;
    }
}

impl<I: Iterator<Item = Seed>> Iterator for SeedBatches<I> {
    type Item = Seed;

    fn next(&mut self) -> Option<Seed> {
        if self.batch_size == 0 {
            return self.source.next();
        }
        if self.cursor == self.buffer.len() {
            self.refill();
        }
        let seed = self.buffer.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(seed)
    }
}
