//! Runs cell simulations from user parameter files and evolves parameter sets.

pub mod evolve;
pub mod params;
pub mod runner;

pub use evolve::{crossover, evolve, fitness, mutate, randomize, EvolveOptions, Gene};
pub use params::{setup, Setup};
pub use runner::{read_params, read_ranges, run, write_json, RunOptions, RunOutput};
