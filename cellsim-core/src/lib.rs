#![cfg_attr(not(feature = "std"), no_std)]

//! Tick engine for two-dimensional populations of self-propelled cells.
//!
//! Up to three species interact through a short-range attraction-repulsion
//! force, align with visible neighbours, drift along a per-species gradient
//! and turn under angular noise. Each [`Engine::tick`] advances every
//! heading from the previous generation, then every position, and
//! [`measure`] derives polarisation, angular momentum, segregation and
//! clustering from the result.

extern crate alloc;

mod math;

pub mod config;
pub mod engine;
pub mod error;
pub mod force;
#[cfg(feature = "std")]
pub mod layout;
pub mod model;
pub mod noise;
pub mod population;
pub mod species;
pub mod stats;
pub mod topology;
pub mod vector;

pub use config::{SimulationConfig, SpeciesConfig};
pub use engine::Engine;
pub use error::{ConfigError, Result, SimError, StateError};
pub use force::Interaction;
#[cfg(feature = "std")]
pub use layout::{seed_population, PinnedShape};
pub use model::{AlignmentPolicy, HeadingModel, InteractionModel, RepulsionPolicy};
pub use noise::{Lcg, NoiseSource, Silent};
pub use population::Population;
pub use species::{SpeciesPartition, SPECIES};
pub use stats::{measure, GlobalStats, StatsBuffer, N_GLOBAL_STATS};
pub use topology::{Domain, Topology};
pub use vector::Vector2D;
