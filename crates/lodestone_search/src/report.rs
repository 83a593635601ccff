//! # Report Exporter
//!
//! Flat text report of found seeds:
//!
//! ```text
//! LODESTONE - Found Seeds
//! Structure: Village
//! Search Radius: 600
//! ------------------------
//! Seed: 42 - Village (X: 0, Z: 0)
//! Seed: -7 - Village (X: 512, Z: 0) + Outpost (X: 300, Z: 40)
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lodestone_shared::StructureKind;

use crate::config::SearchSpec;
use crate::error::{SearchError, SearchResult};
use crate::metrics::FoundResult;

/// Title used when none is given.
pub const DEFAULT_REPORT_TITLE: &str = "LODESTONE";

const SEPARATOR: &str = "------------------------";

/// Header block of a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportHeader {
    /// Application title, first line.
    pub title: String,
    /// Base structure searched for.
    pub structure: StructureKind,
    /// Outer search radius.
    pub radius: u32,
}

impl ReportHeader {
    /// Header describing `spec`.
    #[must_use]
    pub fn for_spec(title: impl Into<String>, spec: &SearchSpec) -> Self {
        Self {
            title: title.into(),
            structure: spec.structure,
            radius: spec.max_radius,
        }
    }
}

/// Writes a report of `results` to `out`.
///
/// # Errors
///
/// - [`SearchError::NothingToExport`] if `results` is empty
/// - [`SearchError::Io`] on write failure
pub fn write_report<W: Write>(
    out: &mut W,
    header: &ReportHeader,
    results: &[FoundResult],
) -> SearchResult<()> {
    if results.is_empty() {
        return Err(SearchError::NothingToExport);
    }

    writeln!(out, "{} - Found Seeds", header.title)?;
    writeln!(out, "Structure: {}", header.structure)?;
    writeln!(out, "Search Radius: {}", header.radius)?;
    writeln!(out, "{SEPARATOR}")?;

    for result in results {
        write!(
            out,
            "Seed: {} - {} (X: {}, Z: {})",
            result.seed, result.kind, result.position.x, result.position.z
        )?;
        for attachment in &result.attachments {
            write!(
                out,
                " + {} (X: {}, Z: {})",
                attachment.spec.kind, attachment.position.x, attachment.position.z
            )?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes a report to a file, replacing it.
///
/// The file is not created when there is nothing to export.
///
/// # Errors
///
/// Same as [`write_report`], plus file creation failures.
pub fn save_report(
    path: impl AsRef<Path>,
    header: &ReportHeader,
    results: &[FoundResult],
) -> SearchResult<()> {
    if results.is_empty() {
        return Err(SearchError::NothingToExport);
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, header, results)
}
