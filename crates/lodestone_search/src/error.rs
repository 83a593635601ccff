//! # Search Error Types
//!
//! Everything that can stop a search run or keep one from starting.
//!
//! Expected filtering ("this candidate is not viable") is never an error;
//! it is a `bool` or an `Option` further down. What lands here is either a
//! rejected configuration, a failure that ends a worker, or an export
//! problem.

use lodestone_procedural::OracleError;
use lodestone_shared::StructureKind;
use thiserror::Error;

/// Errors raised by the search engine.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Configuration rejected before any worker was spawned.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The oracle cannot place the requested structure.
    #[error("structure not supported by the world oracle: {0}")]
    UnsupportedStructure(StructureKind),

    /// Non-recoverable oracle failure inside a worker.
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// A worker panicked; the panic was caught at the worker boundary.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked {
        /// Index of the worker.
        worker: usize,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),

    /// No entropy available to seed a random sampler.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    /// Export requested with an empty result list.
    #[error("no results to export")]
    NothingToExport,

    /// I/O failure while exporting.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Maps an oracle error raised while preparing a run.
    ///
    /// `Unsupported` becomes a configuration problem, anything else stays an
    /// oracle failure.
    #[must_use]
    pub fn from_oracle(err: OracleError) -> Self {
        match err {
            OracleError::Unsupported(kind) => Self::UnsupportedStructure(kind),
            other => Self::Oracle(other),
        }
    }
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
