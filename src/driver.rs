// driver.rs - Time-step loop over a ring of workers

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use tokio::sync::Barrier;
use tokio::task::JoinSet;

use crate::display::{self, GlobalGrid};
use crate::error::{ConfigErrors, LifeError, Result};
use crate::grid::{CellBuffer, Grid};
use crate::halo::{self, HaloExchanger};
use crate::partition::{partition, Partition, WorkerTopology};
use crate::patterns::Seed;
use crate::scheduler::StepScheduler;

pub const MINIMUM_ROWS: usize = 1;
pub const MINIMUM_COLUMNS: usize = 1;
pub const MINIMUM_TIME_STEPS: usize = 1;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub rows: usize,
    pub columns: usize,
    pub time_steps: usize,
    /// Ranks in the ring, each owning one row band.
    pub workers: usize,
    /// Concurrent row tasks per worker.
    pub threads: usize,
    pub seed: Seed,
    /// Print every band (ghosts included) at each step.
    pub show: bool,
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 5,
            time_steps: 5,
            workers: 1,
            threads: default_threads(),
            seed: Seed::default(),
            show: false,
        }
    }
}

impl SimulationConfig {
    /// Checks every limit and reports all violations at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ConfigErrors::default();
        errors.require_at_least("row", self.rows, MINIMUM_ROWS);
        errors.require_at_least("column", self.columns, MINIMUM_COLUMNS);
        errors.require_at_least("time step", self.time_steps, MINIMUM_TIME_STEPS);
        errors.require_at_least("worker", self.workers, 1);
        errors.require_at_least("thread", self.threads, 1);
        if self.rows >= MINIMUM_ROWS && self.workers > self.rows {
            errors.other.push(format!(
                "{} workers for {} rows; every worker needs at least one row",
                self.workers, self.rows
            ));
        }
        if errors.is_empty() { Ok(()) } else { Err(LifeError::Config(errors)) }
    }
}

/// Where the driver is in a run; logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Reporting,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Slowest worker's wall-clock time; the run ends when it does.
    pub elapsed: Duration,
    /// Indexed by rank.
    pub worker_elapsed: Vec<Duration>,
    pub final_grid: GlobalGrid,
}

/// Everything one rank owns for the length of the run.
struct Worker {
    topology: WorkerTopology,
    grid: Grid,
    exchanger: HaloExchanger,
    scheduler: StepScheduler,
    time_steps: usize,
    show: bool,
    start: Arc<Barrier>,
}

struct WorkerOutcome {
    rank: usize,
    elapsed: Duration,
    band: CellBuffer,
}

impl Worker {
    async fn run(mut self) -> Result<WorkerOutcome> {
        let rank = self.topology.rank;
        self.start.wait().await;
        let started = Instant::now();

        for step in 0..self.time_steps {
            self.exchanger.exchange(self.grid.current_mut()).await?;
            if self.show {
                println!("{}", display::render_band(self.grid.current(), step, rank));
            }
            let snapshot = self.grid.snapshot();
            self.scheduler.compute_next_grid(snapshot, self.grid.next_mut(), rank).await?;
            self.grid.swap();
            debug!("rank {rank}: step {step} done, {} alive", self.grid.current().alive_count());
        }

        let elapsed = started.elapsed();
        let band = self.grid.into_current();
        Ok(WorkerOutcome { rank, elapsed, band })
    }
}

pub struct SimulationDriver {
    config: SimulationConfig,
    phase: Phase,
}

impl SimulationDriver {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, phase: Phase::Initializing }
    }

    fn enter(&mut self, phase: Phase) {
        debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Validates, allocates and seeds every band before any worker starts,
    /// so a failure here never leaves a partial run behind.
    fn initialize(&self) -> Result<Vec<Worker>> {
        let config = &self.config;
        config.validate()?;

        let start = Arc::new(Barrier::new(config.workers));
        let scheduler = StepScheduler::new(config.threads);
        let mut workers = Vec::with_capacity(config.workers);

        for (rank, exchanger) in halo::exchangers(config.workers).into_iter().enumerate() {
            let topology = WorkerTopology::new(rank, config.workers);
            let band: Partition = partition(config.rows, config.workers, rank);
            let mut grid = Grid::allocate(band.local_rows, config.columns, rank)?;
            config.seed.apply(grid.current_mut(), band, config.rows);
            debug!("rank {rank}: rows {:?}", band.global_rows());

            workers.push(Worker {
                topology,
                grid,
                exchanger,
                scheduler,
                time_steps: config.time_steps,
                show: config.show,
                start: Arc::clone(&start),
            });
        }
        Ok(workers)
    }

    /// Runs the whole simulation. Any worker failure aborts the others.
    pub async fn run(mut self) -> Result<SimulationReport> {
        let config = self.config.clone();
        info!(
            "{}x{} grid, {} time steps, {} worker(s) x {} task(s)",
            config.rows, config.columns, config.time_steps, config.workers, config.threads
        );
        let workers = match self.initialize() {
            Ok(workers) => workers,
            Err(e) => {
                self.enter(Phase::Terminated);
                return Err(e);
            }
        };

        self.enter(Phase::Running);
        let mut running = JoinSet::new();
        for worker in workers {
            running.spawn(worker.run());
        }

        let mut outcomes = Vec::with_capacity(config.workers);
        while let Some(joined) = running.join_next().await {
            let failure = match joined {
                Ok(Ok(outcome)) => {
                    outcomes.push(outcome);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => LifeError::Lost(e.to_string()),
            };
            error!("{failure}; stopping all workers");
            running.abort_all();
            self.enter(Phase::Terminated);
            return Err(failure);
        }

        self.enter(Phase::Reporting);
        outcomes.sort_by_key(|o| o.rank);
        let worker_elapsed: Vec<_> = outcomes.iter().map(|o| o.elapsed).collect();
        let elapsed = worker_elapsed.iter().copied().max().unwrap_or_default();
        let final_grid = GlobalGrid::from_bands(config.columns, outcomes.iter().map(|o| &o.band));
        info!("finished in {:.6}s, {} alive", elapsed.as_secs_f64(), final_grid.alive_count());

        self.enter(Phase::Terminated);
        Ok(SimulationReport { elapsed, worker_elapsed, final_grid })
    }
}
