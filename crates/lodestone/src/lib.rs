//! # LODESTONE
//!
//! Headless front end of the seed search engine.
//!
//! The `seed_search` binary turns its command line into a
//! [`SearchPlan`](lodestone_search::SearchPlan), either from scratch or on
//! top of a TOML plan file, and runs it over the bundled
//! [`ProceduralOracle`](lodestone_procedural::ProceduralOracle).
//!
//! ```bash
//! # Closest village within 600 blocks, random 32-bit seeds
//! seed_search --structure village --radius 600
//!
//! # Plan file, overriding the thread count, stop after a minute
//! seed_search --config plan.toml --threads 4 --duration 60 --output seeds.txt
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cli;

pub use cli::{clamp_cli_radius, CliArgs, CliError, USAGE};
