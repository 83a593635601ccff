//! # LODESTONE Seed Search
//!
//! Headless seed search over the procedural world.
//!
//! ```bash
//! # First village within 600 blocks of spawn
//! seed_search --structure village --radius 600
//!
//! # Run a plan for ten minutes, exporting every find
//! seed_search --config plan.toml --continuous --duration 600 --output seeds.txt
//! ```

use std::env;
use std::process;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use lodestone::{CliArgs, CliError, USAGE};
use lodestone_procedural::ProceduralOracle;
use lodestone_search::{
    save_report, ReportHeader, SearchCoordinator, SearchEvent, DEFAULT_REPORT_TITLE,
};
use lodestone_shared::Position;

/// How long to wait on the event feed before re-checking the run.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How often the progress line is printed.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

fn main() {
    let args = match CliArgs::parse_from(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    if args.help {
        println!("{USAGE}");
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("   ✗ FATAL: {err}");
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let plan = args.to_plan()?;
    let spec = plan.search;
    let origin = spec.origin;
    let header = ReportHeader::for_spec(DEFAULT_REPORT_TITLE, &spec);

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    LODESTONE SEED SEARCH v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("  Structure:  {}", spec.structure);
    println!("  Origin:     {origin}");
    println!("  Radius:     {}..{} blocks", spec.min_radius, spec.max_radius);
    println!("  Seeds:      {} ({:?})", spec.seed_range.label(), spec.sampling);
    println!("  Threads:    {}", plan.engine.threads);
    println!("  Continuous: {}", spec.continuous);
    for attached in &spec.attached {
        println!(
            "  Attached:   {} within {}..{} blocks{}",
            attached.kind,
            attached.min_distance,
            attached.max_distance,
            if attached.required { "" } else { " (optional, ignored)" }
        );
    }
    if let Some(limit) = args.duration {
        println!("  Time limit: {}s", limit.as_secs());
    }
    println!();

    let mut search = SearchCoordinator::new(ProceduralOracle::new(), plan.engine)?;
    let events = search.events();
    search.start(spec)?;

    let started = Instant::now();
    let mut last_progress = Instant::now();

    while search.is_running() {
        match events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => print_event(&event, origin),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if args.duration.is_some_and(|limit| started.elapsed() >= limit) {
            println!("⏱  Time limit reached, stopping workers...");
            break;
        }

        if last_progress.elapsed() >= PROGRESS_INTERVAL {
            let status = search.status();
            println!(
                "   {} | {} seeds | {:.0} seeds/s",
                status.text, status.seeds_checked, status.seeds_per_second
            );
            last_progress = Instant::now();
        }
    }

    search.stop();
    for event in events.try_iter() {
        print_event(&event, origin);
    }

    let status = search.status();
    println!();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  {}", status.text);
    println!("  Seeds checked:    {}", status.seeds_checked);
    println!("  Throughput:       {:.0} seeds/s", status.seeds_per_second);
    println!("  Elapsed:          {:.1}s", status.elapsed.as_secs_f64());
    println!("  Results:          {}", status.result_count());
    if status.candidate_errors > 0 {
        println!("  Skipped errors:   {}", status.candidate_errors);
    }
    println!("═══════════════════════════════════════════════════════════════════");

    if let Some(path) = &args.output {
        if status.results.is_empty() {
            println!("No seeds found, nothing written to {}", path.display());
        } else {
            save_report(path, &header, &status.results)?;
            println!("✓ {} seed(s) written to {}", status.result_count(), path.display());
        }
    }

    match status.error {
        Some(message) => Err(CliError::RunFailed(message)),
        None => Ok(()),
    }
}

fn print_event(event: &SearchEvent, origin: Position) {
    match event {
        SearchEvent::Started { threads, structure } => {
            println!("🔍 Searching for {structure} on {threads} worker(s)...");
        }
        SearchEvent::Found(found) => println!("{}", found.status_line(origin)),
        SearchEvent::WorkerFailed { worker, message } => {
            eprintln!("   ✗ Worker {worker} failed: {message}");
        }
        SearchEvent::Finished {
            seeds_checked,
            results,
        } => {
            println!("✓ Workers finished: {seeds_checked} seeds, {results} result(s)");
        }
    }
}
