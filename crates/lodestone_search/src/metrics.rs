//! # Metrics & Result Aggregation
//!
//! Seeds-checked counter, run timing and found results.
//!
//! The counter is an atomic bumped once per evaluated seed; everything else
//! lives behind the coordinator's single board mutex and is only touched on
//! start, on a find, and on stop.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lodestone_shared::{Position, Seed, StructureKind};

use crate::config::AttachedStructureSpec;

/// Seeds per second from a count and elapsed milliseconds.
///
/// Zero elapsed time yields `0.0` rather than infinity.
#[inline]
#[must_use]
pub fn seeds_per_second(seeds_checked: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    seeds_checked as f64 * 1000.0 / elapsed_ms as f64
}

/// One attached structure of a multi-structure find.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The relationship that was satisfied.
    pub spec: AttachedStructureSpec,
    /// Where the attached structure sits.
    pub position: Position,
}

/// A seed that satisfied the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundResult {
    /// The seed.
    pub seed: Seed,
    /// Base structure kind.
    pub kind: StructureKind,
    /// Base structure position.
    pub position: Position,
    /// Attached structures, empty for single-structure searches.
    pub attachments: Vec<Attachment>,
}

impl FoundResult {
    /// Human-readable status line for this find.
    ///
    /// `[FOUND] Seed: 42 | Coords: [8, -24] | Distance: 25m`, followed by
    /// ` + Kind [x, z]` per attachment.
    #[must_use]
    pub fn status_line(&self, origin: Position) -> String {
        let distance = self.position.distance(origin) as u64;
        let mut line = format!(
            "[FOUND] Seed: {} | {} | Coords: {} | Distance: {distance}m",
            self.seed, self.kind, self.position
        );
        for attachment in &self.attachments {
            let _ = write!(line, " + {} {}", attachment.spec.kind, attachment.position);
        }
        line
    }
}

/// Counter and clock of one run.
#[derive(Debug)]
pub struct RunClock {
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl RunClock {
    /// A clock that has never run.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            started: None,
            finished: None,
        }
    }

    /// Starts timing from now.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.finished = None;
    }

    /// Freezes the end time. Later calls keep the first end time.
    pub fn freeze(&mut self) {
        if self.started.is_some() && self.finished.is_none() {
            self.finished = Some(Instant::now());
        }
    }

    /// Elapsed run time, up to now while running or up to the frozen end.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match (self.started, self.finished) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }
}

/// Monotonic seeds-checked counter.
#[derive(Debug, Default)]
pub struct SeedCounter(AtomicU64);

impl SeedCounter {
    /// Counts one evaluated seed.
    #[inline]
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count.
    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Back to zero, for a new run.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_shared::DistanceWindow;

    #[test]
    fn test_seeds_per_second() {
        assert_eq!(seeds_per_second(1000, 2000), 500.0);
        assert_eq!(seeds_per_second(1000, 0), 0.0);
        assert_eq!(seeds_per_second(0, 5000), 0.0);
    }

    #[test]
    fn test_status_line() {
        let result = FoundResult {
            seed: Seed::new(-17),
            kind: StructureKind::Village,
            position: Position::new(30, 40),
            attachments: vec![Attachment {
                spec: AttachedStructureSpec::new(
                    StructureKind::Outpost,
                    DistanceWindow::new(0, 500),
                ),
                position: Position::new(100, -4),
            }],
        };
        assert_eq!(
            result.status_line(Position::ORIGIN),
            "[FOUND] Seed: -17 | Village | Coords: [30, 40] | Distance: 50m + Outpost [100, -4]"
        );
    }

    #[test]
    fn test_clock_freezes_once() {
        let mut clock = RunClock::idle();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        clock.start();
        clock.freeze();
        let frozen = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        clock.freeze();
        assert_eq!(clock.elapsed(), frozen);
    }

    #[test]
    fn test_counter() {
        let counter = SeedCounter::default();
        counter.bump();
        counter.bump();
        assert_eq!(counter.get(), 2);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }
}
