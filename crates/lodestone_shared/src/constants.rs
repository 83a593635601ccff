//! # Engine Constants
//!
//! Limits and defaults baked into the engine.

// =============================================================================
// SEED RANGES
// =============================================================================

/// Smallest seed of the 32-bit range.
pub const SEED_RANGE_32_MIN: i64 = i32::MIN as i64;

/// Largest seed of the 32-bit range.
pub const SEED_RANGE_32_MAX: i64 = i32::MAX as i64;

// =============================================================================
// SEARCH LIMITS
// =============================================================================

/// Largest search radius accepted (world border).
pub const MAX_SEARCH_RADIUS: u32 = 30_000_000;

/// Smallest radius the command line accepts.
pub const CLI_MIN_RADIUS: u32 = 16;

/// Largest radius the command line accepts.
pub const CLI_MAX_RADIUS: u32 = 10_000;

/// Default search radius in blocks.
pub const DEFAULT_SEARCH_RADIUS: u32 = 256;

// =============================================================================
// BIOME CONFIRMATION DEFAULTS
// =============================================================================

/// Sampling stride of the biome confirmation sampler (blocks).
pub const DEFAULT_CONFIRM_STRIDE: u32 = 8;

/// Match ratio required to accept a region.
pub const DEFAULT_CONFIRM_RATIO: f64 = 0.9;

/// Samples required before an early accept.
pub const DEFAULT_CONFIRM_MIN_SAMPLES: u32 = 10;
