//! # LODESTONE Shared
//!
//! Common types used by every LODESTONE crate.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a world generator
//! - threads or synchronization primitives
//!
//! It describes *what* is searched for, never *how*.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod biome;
pub mod constants;
pub mod geometry;
pub mod structure;

pub use biome::{BiomeCell, BiomeId, BIOME_CELL_SHIFT, STRUCTURE_LAYER_Y};
pub use constants::{
    CLI_MAX_RADIUS, CLI_MIN_RADIUS, DEFAULT_CONFIRM_MIN_SAMPLES, DEFAULT_CONFIRM_RATIO,
    DEFAULT_CONFIRM_STRIDE, DEFAULT_SEARCH_RADIUS, MAX_SEARCH_RADIUS, SEED_RANGE_32_MAX,
    SEED_RANGE_32_MIN,
};
pub use geometry::{DistanceWindow, Position, Seed};
pub use structure::{Dimension, ParseKindError, StructureKind};
