//! # LODESTONE Search
//!
//! The concurrent seed search engine.
//!
//! ## Architecture
//!
//! ```text
//! SearchCoordinator ── spawns ──► worker 0..N (one OracleContext each)
//!                                    │
//!                                    │ SeedStream (random | partitioned)
//!                                    ▼
//!                              StructureFinder
//!                               ├─ CandidateLocator (region grid)
//!                               ├─ viability + biome rule
//!                               └─ confirm_biome (statistical sampler)
//!                                    │
//!                 results, status ◄──┘ (one mutex, touched on finds only)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use lodestone_procedural::ProceduralOracle;
//! use lodestone_search::{EngineConfig, SearchCoordinator, SearchSpec};
//! use lodestone_shared::StructureKind;
//!
//! let mut search = SearchCoordinator::new(ProceduralOracle::new(), EngineConfig::default())?;
//! search.start(SearchSpec::new(StructureKind::Village).with_radius(0, 600))?;
//! search.join();
//! println!("{}", search.status().text);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod confirm;
pub mod coordinator;
pub mod error;
pub mod locator;
pub mod metrics;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod sampler;

pub use config::{AttachedStructureSpec, EngineConfig, SearchSpec};
pub use confirm::{confirm_biome, ConfirmationParams, Verdict};
pub use coordinator::{RunState, SearchCoordinator, SearchEvent, StatusSnapshot};
pub use error::{SearchError, SearchResult};
pub use locator::{region_reach, CandidateLocator};
pub use metrics::{seeds_per_second, Attachment, FoundResult};
pub use pipeline::{MultiMatch, StructureFinder};
pub use plan::{PlanError, SearchPlan};
pub use report::{save_report, write_report, ReportHeader, DEFAULT_REPORT_TITLE};
pub use sampler::{
    PartitionedSeeds, RandomSeeds, SamplingMode, SeedBatches, SeedRange, SeedStream,
};
