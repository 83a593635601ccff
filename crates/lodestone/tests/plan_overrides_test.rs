//! # Plan File + Flag Overrides
//!
//! Proves that flags given next to `--config` override the plan file field
//! by field, and that untouched fields keep the file's values.

use std::fs;
use std::path::{Path, PathBuf};

use lodestone::{CliArgs, CliError};
use lodestone_search::{PlanError, SamplingMode, SeedRange};
use lodestone_shared::{Position, StructureKind};

fn write_plan(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lodestone_{name}_{}.toml", std::process::id()));
    fs::write(&path, text).unwrap();
    path
}

fn args(line: &str, config: &Path) -> CliArgs {
    let mut argv = vec!["--config".to_string(), config.display().to_string()];
    argv.extend(line.split_whitespace().map(String::from));
    CliArgs::parse_from(argv).unwrap()
}

const PLAN: &str = r#"
[engine]
threads = 6
batch_size = 64

[search]
structure = "village"
origin = { x = 500, z = 500 }
max_radius = 1200
seed_range = "64"

[[search.attached]]
kind = "outpost"
max_distance = 300
"#;

#[test]
fn test_plan_file_alone() {
    let path = write_plan("alone", PLAN);
    let plan = args("", &path).to_plan().unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(plan.engine.threads, 6);
    assert_eq!(plan.engine.batch_size, 64);
    assert_eq!(plan.search.structure, StructureKind::Village);
    assert_eq!(plan.search.origin, Position::new(500, 500));
    assert_eq!(plan.search.max_radius, 1200);
    assert_eq!(plan.search.seed_range, SeedRange::Bits64);
    assert_eq!(plan.search.attached.len(), 1);
}

#[test]
fn test_flags_override_plan_fields() {
    let path = write_plan("override", PLAN);
    let plan = args(
        "--structure shipwreck --radius 400 --threads 2 --range 32 --sequential --continuous",
        &path,
    )
    .to_plan()
    .unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(plan.engine.threads, 2);
    assert_eq!(plan.engine.batch_size, 64, "untouched engine field kept");
    assert_eq!(plan.search.structure, StructureKind::Shipwreck);
    assert_eq!(plan.search.max_radius, 400);
    assert_eq!(plan.search.origin, Position::new(500, 500), "untouched search field kept");
    assert_eq!(plan.search.seed_range, SeedRange::Bits32);
    assert_eq!(plan.search.sampling, SamplingMode::Sequential);
    assert!(plan.search.continuous);
    assert_eq!(plan.search.attached.len(), 1);
}

#[test]
fn test_broken_plan_files() {
    let missing = std::env::temp_dir().join("lodestone_no_such_plan.toml");
    assert!(matches!(
        args("", &missing).to_plan(),
        Err(CliError::Plan(PlanError::Read { .. }))
    ));

    let path = write_plan("broken", "[search]\nstructure = 7\n");
    let result = args("", &path).to_plan();
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(CliError::Plan(PlanError::Parse(_)))));
}

#[test]
fn test_bundled_plan_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("plans/village_outpost.toml");
    let plan = args("--duration 5", &path).to_plan().unwrap();

    assert_eq!(plan.search.structure, StructureKind::Village);
    assert!(plan.search.continuous);
    assert_eq!(plan.search.attached[0].kind, StructureKind::Outpost);
    assert!(plan.search.attached[0].required);
}
