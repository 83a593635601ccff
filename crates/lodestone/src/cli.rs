//! # Command Line
//!
//! Hand-rolled flag parser for `seed_search`. Flags either build a plan from
//! scratch (`--structure` is then mandatory) or override fields of the plan
//! loaded with `--config`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use lodestone_search::{
    EngineConfig, PlanError, SamplingMode, SearchError, SearchPlan, SearchSpec, SeedRange,
};
use lodestone_shared::{ParseKindError, Position, StructureKind, CLI_MAX_RADIUS, CLI_MIN_RADIUS};

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: seed_search [OPTIONS]

Options:
  --config <PATH>        Load a TOML search plan; other flags override it
  --structure <KIND>     Base structure (village, desert_pyramid, mansion, ...)
  --radius <BLOCKS>      Outer search radius, clamped to [16, 10000]
  --min-radius <BLOCKS>  Inner search radius (default 0)
  --origin <X,Z>         Search center (default 0,0)
  --threads <N>          Worker threads (default: all cores)
  --range <32|64>        Seed range (default 32)
  --sequential           Enumerate seeds in order instead of at random
  --continuous           Keep searching after the first find
  --duration <SECONDS>   Stop after this long
  --output <PATH>        Write found seeds to a report file
  -h, --help             Print this help";

/// Command-line failures.
#[derive(Error, Debug)]
pub enum CliError {
    /// A flag that takes a value was last on the line.
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    /// A flag value could not be parsed.
    #[error("invalid value {value:?} for {flag}")]
    InvalidValue {
        /// Flag name.
        flag: &'static str,
        /// Offending value.
        value: String,
    },

    /// Unrecognised argument.
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),

    /// Unknown structure name.
    #[error(transparent)]
    Structure(#[from] ParseKindError),

    /// Neither `--structure` nor `--config` was given.
    #[error("no structure given; pass --structure or --config")]
    MissingStructure,

    /// The plan file could not be used.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The engine refused the configuration or the run.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A worker failed during the run.
    #[error("search failed: {0}")]
    RunFailed(String),
}

/// Clamps a `--radius` value to the range the command line accepts.
#[must_use]
pub fn clamp_cli_radius(radius: u32) -> u32 {
    radius.clamp(CLI_MIN_RADIUS, CLI_MAX_RADIUS)
}

/// Parsed command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Plan file.
    pub config: Option<PathBuf>,
    /// Base structure override.
    pub structure: Option<StructureKind>,
    /// Outer radius override, already clamped.
    pub radius: Option<u32>,
    /// Inner radius override.
    pub min_radius: Option<u32>,
    /// Origin override.
    pub origin: Option<Position>,
    /// Thread count override.
    pub threads: Option<usize>,
    /// Seed range override.
    pub range: Option<SeedRange>,
    /// Sequential enumeration.
    pub sequential: bool,
    /// Keep going after the first find.
    pub continuous: bool,
    /// Wall-clock limit.
    pub duration: Option<Duration>,
    /// Report path.
    pub output: Option<PathBuf>,
    /// `--help` was given.
    pub help: bool,
}

fn take_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, CliError> {
    args.next().ok_or(CliError::MissingValue(flag))
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, value: String) -> Result<T, CliError> {
    let parsed = value.trim().parse().ok();
    parsed.ok_or(CliError::InvalidValue { flag, value })
}

fn parse_origin(value: String) -> Result<Position, CliError> {
    let parsed = value.split_once(',').and_then(|(x, z)| {
        let x = x.trim().parse().ok()?;
        let z = z.trim().parse().ok()?;
        Some(Position::new(x, z))
    });
    parsed.ok_or(CliError::InvalidValue {
        flag: "--origin",
        value,
    })
}

fn parse_range(value: String) -> Result<SeedRange, CliError> {
    let parsed = match value.trim() {
        "32" => Some(SeedRange::Bits32),
        "64" => Some(SeedRange::Bits64),
        _ => None,
    };
    parsed.ok_or(CliError::InvalidValue {
        flag: "--range",
        value,
    })
}

impl CliArgs {
    /// Parses arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Any [`CliError`] describing the first bad argument.
    pub fn parse_from<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(take_value(&mut args, "--config")?.into()),
                "--structure" => {
                    parsed.structure = Some(take_value(&mut args, "--structure")?.parse()?);
                }
                "--radius" => {
                    let radius = parse_number("--radius", take_value(&mut args, "--radius")?)?;
                    parsed.radius = Some(clamp_cli_radius(radius));
                }
                "--min-radius" => {
                    let value = take_value(&mut args, "--min-radius")?;
                    parsed.min_radius = Some(parse_number("--min-radius", value)?);
                }
                "--origin" => parsed.origin = Some(parse_origin(take_value(&mut args, "--origin")?)?),
                "--threads" => {
                    let value = take_value(&mut args, "--threads")?;
                    parsed.threads = Some(parse_number("--threads", value)?);
                }
                "--range" => parsed.range = Some(parse_range(take_value(&mut args, "--range")?)?),
                "--sequential" => parsed.sequential = true,
                "--continuous" => parsed.continuous = true,
                "--duration" => {
                    let value = take_value(&mut args, "--duration")?;
                    let seconds: u64 = parse_number("--duration", value)?;
                    parsed.duration = Some(Duration::from_secs(seconds));
                }
                "--output" => parsed.output = Some(take_value(&mut args, "--output")?.into()),
                "-h" | "--help" => parsed.help = true,
                _ => return Err(CliError::UnknownArgument(arg)),
            }
        }
        Ok(parsed)
    }

    /// Builds the plan to run: the `--config` plan (or a default one for
    /// `--structure`) with every given flag applied on top.
    ///
    /// # Errors
    ///
    /// [`CliError::MissingStructure`], plan loading errors, or validation
    /// errors of the final plan.
    pub fn to_plan(&self) -> Result<SearchPlan, CliError> {
        let mut plan = match (&self.config, self.structure) {
            (Some(path), _) => SearchPlan::load(path)?,
            (None, Some(structure)) => SearchPlan {
                engine: EngineConfig::default(),
                search: SearchSpec::new(structure),
            },
            (None, None) => return Err(CliError::MissingStructure),
        };

        let search = &mut plan.search;
        if let Some(structure) = self.structure {
            search.structure = structure;
        }
        if let Some(radius) = self.radius {
            search.max_radius = radius;
        }
        if let Some(min_radius) = self.min_radius {
            search.min_radius = min_radius;
        }
        if let Some(origin) = self.origin {
            search.origin = origin;
        }
        if let Some(range) = self.range {
            search.seed_range = range;
        }
        if self.sequential {
            search.sampling = SamplingMode::Sequential;
        }
        if self.continuous {
            search.continuous = true;
        }
        if let Some(threads) = self.threads {
            plan.engine.threads = threads;
        }

        plan.engine.validate()?;
        plan.search.validate()?;
        Ok(plan)
    }
}
