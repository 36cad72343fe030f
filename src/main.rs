// main.rs - Command-line entry point for the row-band Game of Life

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use halo_life::driver::default_threads;
use halo_life::{patterns, Seed, SimulationConfig, SimulationDriver};

/// Simulate Conway's Game of Life on a torus split across a ring of workers.
#[derive(Parser, Debug)]
#[command(name = "halo_life", version)]
struct Args {
    /// Total grid rows
    #[arg(short = 'r', long = "rows", default_value_t = 5)]
    rows: usize,

    /// Total grid columns
    #[arg(short = 'c', long = "columns", default_value_t = 5)]
    columns: usize,

    /// Number of time steps to simulate
    #[arg(short = 't', long = "time-steps", default_value_t = 5)]
    time_steps: usize,

    /// Workers in the ring, one row band each
    #[arg(short = 'p', long = "workers", default_value_t = 1)]
    workers: usize,

    /// Row tasks per worker (and runtime threads)
    #[arg(short = 'j', long = "threads", default_value_t = default_threads())]
    threads: usize,

    /// Seed for the random first generation
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,

    /// Start from a named pattern instead of random cells
    #[arg(long = "pattern")]
    pattern: Option<String>,

    /// Print every band, ghosts included, at each step
    #[arg(long = "show")]
    show: bool,
}

impl Args {
    fn into_config(self) -> Result<SimulationConfig> {
        let seed = match &self.pattern {
            Some(name) => {
                let pattern = patterns::find(name).ok_or_else(|| {
                    let known: Vec<_> = patterns::PATTERNS.iter().map(|p| p.name).collect();
                    anyhow!("unknown pattern {name:?}; known patterns: {}", known.join(", "))
                })?;
                Seed::Pattern { pattern, row: 1, col: 1 }
            }
            None => Seed::Random(self.seed),
        };
        Ok(SimulationConfig {
            rows: self.rows,
            columns: self.columns,
            time_steps: self.time_steps,
            workers: self.workers,
            threads: self.threads,
            seed,
            show: self.show,
        })
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.threads.max(1))
        .enable_all()
        .build()
        .context("failed to start the worker runtime")?;

    let report = runtime.block_on(SimulationDriver::new(config).run())?;
    println!("Total time elapsed: {:.6} seconds.", report.elapsed.as_secs_f64());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(255)
        }
    }
}
