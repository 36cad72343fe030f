//! Conway's Game of Life on a toroidal grid split into row bands.
//!
//! Each band belongs to one worker of a ring. Every step the workers swap
//! their edge rows with their ring neighbours (the halo exchange), then
//! evolve their interior with a pool of row tasks and swap buffers.

pub mod display;   // Band and grid rendering
pub mod driver;    // Time-step loop and reporting
pub mod error;     // Error taxonomy
pub mod grid;      // Cell buffers with ghost border
pub mod halo;      // Ghost row/column refresh
pub mod partition; // Row bands and ring topology
pub mod patterns;  // Initial generations
pub mod rules;     // Transition rule
pub mod scheduler; // Parallel evaluation of one generation

pub use display::GlobalGrid;
pub use driver::{SimulationConfig, SimulationDriver, SimulationReport};
pub use error::{LifeError, Result};
pub use grid::{CellBuffer, CellState, Grid};
pub use patterns::Seed;
