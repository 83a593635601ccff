//! # Search Plans
//!
//! A search plan is a TOML file holding both the engine configuration and
//! one search spec:
//!
//! ```toml
//! [engine]
//! threads = 8
//! batch_size = 512
//!
//! [engine.confirmation]
//! stride = 8
//! success_ratio = 0.9
//!
//! [search]
//! structure = "village"
//! max_radius = 600
//! seed_range = "32"
//! sampling = "random"
//!
//! [[search.attached]]
//! kind = "outpost"
//! max_distance = 400
//! ```
//!
//! Only `search.structure` is mandatory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{EngineConfig, SearchSpec};
use crate::error::SearchError;

/// Errors loading a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The file could not be read.
    #[error("failed to read plan {path}: {source}")]
    Read {
        /// Plan path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML is malformed or has unknown values.
    #[error("failed to parse plan: {0}")]
    Parse(#[from] toml::de::Error),

    /// The plan parsed but describes an invalid search.
    #[error("invalid plan: {0}")]
    Invalid(#[from] SearchError),
}

/// Engine configuration plus one search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchPlan {
    /// Engine settings; defaults when the table is absent.
    #[serde(default)]
    pub engine: EngineConfig,
    /// The search to run.
    pub search: SearchSpec,
}

impl SearchPlan {
    /// Parses and validates a plan.
    ///
    /// # Errors
    ///
    /// [`PlanError::Parse`] or [`PlanError::Invalid`].
    pub fn from_toml_str(text: &str) -> Result<Self, PlanError> {
        let plan: Self = toml::from_str(text)?;
        plan.engine.validate()?;
        plan.search.validate()?;
        Ok(plan)
    }

    /// Reads, parses and validates a plan file.
    ///
    /// # Errors
    ///
    /// Any [`PlanError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
