//! # Search Coordinator
//!
//! Owns the worker pool of one search run at a time.
//!
//! ## Shared State
//!
//! ```text
//!  ┌──────────── Shared (Arc) ─────────────┐
//!  │ stop flag          AtomicBool         │  polled before every seed
//!  │ seeds checked      AtomicU64          │  bumped once per seed
//!  │ candidate errors   AtomicU64          │
//!  │ last seed          AtomicI64          │
//!  │ board              Mutex<Board>       │  results, status, state, clock
//!  │ events             Sender<SearchEvent>│  try_send, never blocks
//!  └───────────────────────────────────────┘
//! ```
//!
//! The board mutex is only taken on start, on a find, on a worker failure,
//! on worker exit and by `status()`, never per seed. Oracle state is not
//! shared at all: each worker creates its own context on its own thread.
//!
//! ## Lifecycle
//!
//! `Idle → Running → (StopRequested) → Stopped`, and back to `Running` on
//! the next `start`. The last worker to exit freezes the clock and moves
//! the run to `Stopped`.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, warn};

use lodestone_procedural::{OracleContext, WorldOracle};
use lodestone_shared::{Seed, StructureKind};

use crate::config::{EngineConfig, SearchSpec};
use crate::error::{SearchError, SearchResult};
use crate::metrics::{seeds_per_second, FoundResult, RunClock, SeedCounter};
use crate::pipeline::StructureFinder;
use crate::sampler::{SeedBatches, SeedStream};

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run has started yet.
    Idle,
    /// Workers are searching.
    Running,
    /// Stop signalled, workers still winding down.
    StopRequested,
    /// Every worker has exited.
    Stopped,
}

/// Notifications pushed to observers.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchEvent {
    /// A run started.
    Started {
        /// Worker count.
        threads: usize,
        /// Base structure.
        structure: StructureKind,
    },
    /// A seed satisfied the search.
    Found(FoundResult),
    /// A worker hit a fatal error; the run is stopping.
    WorkerFailed {
        /// Worker index.
        worker: usize,
        /// Error text.
        message: String,
    },
    /// Every worker has exited.
    Finished {
        /// Seeds evaluated in the run.
        seeds_checked: u64,
        /// Results recorded in the run.
        results: usize,
    },
}

/// Point-in-time view of the coordinator.
#[derive(Clone, Debug)]
pub struct StatusSnapshot {
    /// Run state.
    pub state: RunState,
    /// Human-readable status line.
    pub text: String,
    /// Seeds evaluated so far.
    pub seeds_checked: u64,
    /// Throughput of the run.
    pub seeds_per_second: f64,
    /// Run time, frozen once stopped.
    pub elapsed: Duration,
    /// Most recently drawn seed.
    pub last_seed: Option<Seed>,
    /// Seed range label (`2^32` / `2^64`), empty before the first run.
    pub range_label: &'static str,
    /// Recoverable oracle errors skipped during the run.
    pub candidate_errors: u64,
    /// First fatal error of the run, if any.
    pub error: Option<String>,
    /// Results in the order they were found.
    pub results: Vec<FoundResult>,
}

impl StatusSnapshot {
    /// Number of results.
    #[inline]
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

struct Board {
    state: RunState,
    message: Option<String>,
    error: Option<String>,
    results: Vec<FoundResult>,
    clock: RunClock,
    spec: Option<Arc<SearchSpec>>,
    live_workers: usize,
}

struct Shared {
    stop: AtomicBool,
    seeds_checked: SeedCounter,
    candidate_errors: AtomicU64,
    last_seed: AtomicI64,
    last_worker: AtomicUsize,
    seed_seen: AtomicBool,
    board: Mutex<Board>,
    events: Sender<SearchEvent>,
}

impl Shared {
    fn new(events: Sender<SearchEvent>) -> Self {
        Self {
            stop: AtomicBool::new(false),
            seeds_checked: SeedCounter::default(),
            candidate_errors: AtomicU64::new(0),
            last_seed: AtomicI64::new(0),
            last_worker: AtomicUsize::new(0),
            seed_seen: AtomicBool::new(false),
            board: Mutex::new(Board {
                state: RunState::Idle,
                message: None,
                error: None,
                results: Vec::new(),
                clock: RunClock::idle(),
                spec: None,
                live_workers: 0,
            }),
            events,
        }
    }

    #[inline]
    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        let mut board = self.board.lock();
        if board.state == RunState::Running {
            board.state = RunState::StopRequested;
        }
    }

    fn emit(&self, event: SearchEvent) {
        if let Err(TrySendError::Full(event)) = self.events.try_send(event) {
            warn!(?event, "event feed full, dropping event");
        }
    }

    /// Prepares the shared state for a new run of `workers` threads.
    fn begin(&self, spec: &Arc<SearchSpec>, workers: usize) {
        self.stop.store(false, Ordering::Release);
        self.seeds_checked.reset();
        self.candidate_errors.store(0, Ordering::Relaxed);
        self.seed_seen.store(false, Ordering::Relaxed);

        let mut board = self.board.lock();
        board.state = RunState::Running;
        board.message = None;
        board.error = None;
        board.results.clear();
        board.clock.start();
        board.spec = Some(Arc::clone(spec));
        board.live_workers = workers;
    }

    #[inline]
    fn observe(&self, worker: usize, seed: Seed) {
        self.seeds_checked.bump();
        self.last_seed.store(seed.value(), Ordering::Relaxed);
        self.last_worker.store(worker, Ordering::Relaxed);
        self.seed_seen.store(true, Ordering::Relaxed);
    }

    /// Records a find. Returns false if stop-on-first already has its result.
    fn record(&self, result: FoundResult, spec: &SearchSpec) -> bool {
        let line = result.status_line(spec.origin);
        {
            let mut board = self.board.lock();
            if !spec.continuous && !board.results.is_empty() {
                return false;
            }
            board.results.push(result.clone());
            board.message = Some(line);
        }
        info!(
            seed = result.seed.value(),
            structure = %result.kind,
            x = result.position.x,
            z = result.position.z,
            attachments = result.attachments.len(),
            "seed found"
        );
        self.emit(SearchEvent::Found(result));
        true
    }

    fn fail(&self, worker: usize, err: &SearchError) {
        error!(worker, error = %err, "search worker failed");
        let message = err.to_string();
        {
            let mut board = self.board.lock();
            board.message = Some(format!("[T{worker}] Worker error: {message}"));
            board.error.get_or_insert_with(|| message.clone());
        }
        self.emit(SearchEvent::WorkerFailed { worker, message });
        self.request_stop();
    }

    /// Marks `count` workers as exited; the last one closes the run.
    fn retire(&self, count: usize) {
        let finished = {
            let mut board = self.board.lock();
            board.live_workers = board.live_workers.saturating_sub(count);
            if board.live_workers > 0 || !is_active(board.state) {
                None
            } else {
                Some(close_run(&mut board, self.seeds_checked.get()))
            }
        };
        if let Some(event) = finished {
            self.emit(event);
        }
    }

    /// Closes the run even if some worker never reached `retire`.
    fn settle(&self) {
        let finished = {
            let mut board = self.board.lock();
            board.live_workers = 0;
            is_active(board.state).then(|| close_run(&mut board, self.seeds_checked.get()))
        };
        if let Some(event) = finished {
            self.emit(event);
        }
    }
}

const fn is_active(state: RunState) -> bool {
    matches!(state, RunState::Running | RunState::StopRequested)
}

fn close_run(board: &mut Board, seeds_checked: u64) -> SearchEvent {
    board.clock.freeze();
    board.state = RunState::Stopped;
    if board.message.is_none() {
        board.message = Some(format!("Search finished: {seeds_checked} seeds checked"));
    }
    info!(
        seeds_checked,
        results = board.results.len(),
        elapsed_ms = board.clock.elapsed().as_millis() as u64,
        "search run stopped"
    );
    SearchEvent::Finished {
        seeds_checked,
        results: board.results.len(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Everything one worker needs, moved onto its thread.
struct WorkerJob<O> {
    index: usize,
    workers: usize,
    oracle: Arc<O>,
    spec: Arc<SearchSpec>,
    config: EngineConfig,
    shared: Arc<Shared>,
}

impl<O: WorldOracle> WorkerJob<O> {
    fn run(self) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.search()));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.shared.fail(self.index, &err),
            Err(payload) => {
                let err = SearchError::WorkerPanicked {
                    worker: self.index,
                    message: panic_message(payload.as_ref()),
                };
                self.shared.fail(self.index, &err);
            }
        }
        self.shared.retire(1);
    }

    fn search(&self) -> SearchResult<()> {
        let spec = &*self.spec;
        let mut ctx = self.oracle.create_context()?;
        let stream =
            SeedStream::for_worker(spec.sampling, spec.seed_range, self.index, self.workers)?;
        let seeds = SeedBatches::new(stream, self.config.batch_size);
        let mut finder = StructureFinder::new(&mut ctx, self.config.confirmation);
        let multi = spec.required_attachments().next().is_some();
        let window = spec.window();

        for seed in seeds {
            if self.shared.stop_requested() {
                break;
            }
            self.shared.observe(self.index, seed);

            let found = if multi {
                finder
                    .find_multiple(seed, spec.structure, spec.origin, window, &spec.attached)?
                    .map(|matched| FoundResult {
                        seed,
                        kind: spec.structure,
                        position: matched.base,
                        attachments: matched.attachments,
                    })
            } else {
                finder
                    .find(seed, spec.structure, spec.origin, window)?
                    .map(|position| FoundResult {
                        seed,
                        kind: spec.structure,
                        position,
                        attachments: Vec::new(),
                    })
            };

            let skipped = finder.take_skipped();
            if skipped > 0 {
                self.shared
                    .candidate_errors
                    .fetch_add(skipped, Ordering::Relaxed);
            }

            if let Some(result) = found {
                self.shared.record(result, spec);
                if !spec.continuous {
                    self.shared.request_stop();
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Runs seed searches over a [`WorldOracle`] on a pool of worker threads.
pub struct SearchCoordinator<O: WorldOracle> {
    oracle: Arc<O>,
    config: EngineConfig,
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    events: Receiver<SearchEvent>,
}

impl<O: WorldOracle> SearchCoordinator<O> {
    /// Creates an idle coordinator.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] if `config` is invalid.
    pub fn new(oracle: O, config: EngineConfig) -> SearchResult<Self> {
        Self::with_shared_oracle(Arc::new(oracle), config)
    }

    /// Creates an idle coordinator over an oracle shared with the caller.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidConfig`] if `config` is invalid.
    pub fn with_shared_oracle(oracle: Arc<O>, config: EngineConfig) -> SearchResult<Self> {
        config.validate()?;
        let (sender, receiver) = bounded(config.event_capacity);
        Ok(Self {
            oracle,
            config,
            shared: Arc::new(Shared::new(sender)),
            workers: Vec::new(),
            events: receiver,
        })
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Starts a run, stopping and joining the previous one first.
    ///
    /// Results, metrics and undelivered events of the previous run are
    /// cleared.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidConfig`] for a bad spec
    /// - [`SearchError::UnsupportedStructure`] if the oracle cannot place a
    ///   queried structure
    /// - [`SearchError::Oracle`] if the oracle cannot create a context
    /// - [`SearchError::Spawn`] if a worker thread cannot be spawned
    ///
    /// Nothing is spawned when validation fails.
    pub fn start(&mut self, spec: SearchSpec) -> SearchResult<()> {
        spec.validate()?;
        self.check_support(&spec)?;
        self.stop();
        while self.events.try_recv().is_ok() {}

        let threads = self.config.threads;
        let spec = Arc::new(spec);
        self.shared.begin(&spec, threads);

        info!(
            threads,
            structure = %spec.structure,
            min_radius = spec.min_radius,
            max_radius = spec.max_radius,
            range = spec.seed_range.label(),
            sampling = ?spec.sampling,
            continuous = spec.continuous,
            attached = spec.attached.len(),
            "search run starting"
        );
        self.shared.emit(SearchEvent::Started {
            threads,
            structure: spec.structure,
        });

        for index in 0..threads {
            let job = WorkerJob {
                index,
                workers: threads,
                oracle: Arc::clone(&self.oracle),
                spec: Arc::clone(&spec),
                config: self.config.clone(),
                shared: Arc::clone(&self.shared),
            };
            let spawned = thread::Builder::new()
                .name(format!("seed-worker-{index}"))
                .spawn(move || job.run());

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(err) => {
                    let err = SearchError::Spawn(err.to_string());
                    self.shared.fail(index, &err);
                    self.shared.retire(threads - index);
                    self.stop();
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Checks the oracle can serve every queried structure.
    fn check_support(&self, spec: &SearchSpec) -> SearchResult<()> {
        let ctx = self
            .oracle
            .create_context()
            .map_err(SearchError::from_oracle)?;
        for kind in spec.queried_kinds() {
            let size = ctx
                .region_block_size(kind)
                .map_err(SearchError::from_oracle)?;
            if size == 0 {
                return Err(SearchError::UnsupportedStructure(kind));
            }
        }
        Ok(())
    }

    /// Signals every worker and waits for all of them to exit.
    ///
    /// Calling it again, or with no run active, does nothing.
    pub fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        let cancelled = self.state() == RunState::Running;
        self.shared.request_stop();
        self.join_workers();

        if cancelled {
            let seeds = self.shared.seeds_checked.get();
            let mut board = self.shared.board.lock();
            if board.error.is_none() && board.results.is_empty() {
                board.message = Some(format!("Search stopped after {seeds} seeds"));
            }
        }
    }

    /// Waits for the run to end on its own.
    ///
    /// Blocks forever on a continuous random search; use [`stop`](Self::stop)
    /// for those.
    pub fn join(&mut self) {
        self.join_workers();
    }

    fn join_workers(&mut self) {
        for (index, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                error!(worker = index, "worker panicked outside the search loop");
            }
        }
        self.shared.settle();
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.shared.board.lock().state
    }

    /// Returns true while workers are searching or winding down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        is_active(self.state())
    }

    /// Snapshot of status, metrics and results.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        let seeds_checked = self.shared.seeds_checked.get();
        let candidate_errors = self.shared.candidate_errors.load(Ordering::Relaxed);
        let last_seed = self
            .shared
            .seed_seen
            .load(Ordering::Relaxed)
            .then(|| Seed::new(self.shared.last_seed.load(Ordering::Relaxed)));
        let last_worker = self.shared.last_worker.load(Ordering::Relaxed);

        let board = self.shared.board.lock();
        let elapsed = board.clock.elapsed();
        let range_label = board.spec.as_ref().map_or("", |spec| spec.seed_range.label());

        let text = match (&board.message, board.state, last_seed) {
            (Some(message), _, _) => message.clone(),
            (None, RunState::Idle, _) => "Idle".to_string(),
            (None, _, Some(seed)) => {
                format!("[T{last_worker}] Processing seed {seed} | Range: {range_label}")
            }
            (None, _, None) => "Starting workers".to_string(),
        };

        StatusSnapshot {
            state: board.state,
            text,
            seeds_checked,
            seeds_per_second: seeds_per_second(seeds_checked, elapsed.as_millis() as u64),
            elapsed,
            last_seed,
            range_label,
            candidate_errors,
            error: board.error.clone(),
            results: board.results.clone(),
        }
    }

    /// Results of the current or last run.
    #[must_use]
    pub fn results(&self) -> Vec<FoundResult> {
        self.shared.board.lock().results.clone()
    }

    /// Drops every recorded result without touching the run.
    pub fn clear_results(&self) {
        self.shared.board.lock().results.clear();
    }

    /// Spec of the current or last run.
    #[must_use]
    pub fn last_spec(&self) -> Option<SearchSpec> {
        self.shared
            .board
            .lock()
            .spec
            .as_ref()
            .map(|spec| SearchSpec::clone(spec))
    }

    /// A receiver on the event feed.
    ///
    /// Every clone competes for the same events. Events are dropped, not
    /// queued, once the feed is full.
    #[must_use]
    pub fn events(&self) -> Receiver<SearchEvent> {
        self.events.clone()
    }
}

impl<O: WorldOracle> Drop for SearchCoordinator<O> {
    fn drop(&mut self) {
        self.stop();
    }
}
