//! Seeded simulation runs and their JSON outputs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cellsim_core::{seed_population, Engine, InteractionModel, Population, StatsBuffer, Topology};
use cellsim_shared::{CellParameters, ParameterRanges, StateSnapshot, StatsReport};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::params::{setup, Setup};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub steps: usize,
    pub seed: u64,
    pub scale_factor: f64,
    pub topology: Topology,
    pub model: InteractionModel,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps: 100,
            seed: 0,
            scale_factor: 1.0,
            topology: Topology::Free,
            model: InteractionModel::species_block(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub report: StatsReport,
    pub snapshot: StateSnapshot,
}

pub fn read_params(path: &Path) -> Result<CellParameters> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse parameters in {}", path.display()))
}

pub fn read_ranges(path: &Path) -> Result<ParameterRanges> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter ranges from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse parameter ranges in {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn snapshot(population: &Population, step: usize) -> StateSnapshot {
    StateSnapshot {
        step,
        pos_x: population.pos_x.clone(),
        pos_y: population.pos_y.clone(),
        dir_x: population.heading_x.clone(),
        dir_y: population.heading_y.clone(),
    }
}

/// Seeds a population and runs `options.steps` ticks from one RNG stream.
pub fn run(params: &CellParameters, options: &RunOptions) -> Result<RunOutput> {
    let Setup {
        config,
        partition,
        shapes,
    } = setup(params, options.scale_factor, options.topology, options.model)?;

    log::info!(
        "Arena {:.2} x {:.2}, {:?} topology, {} cells {:?}",
        config.domain.width,
        config.domain.height,
        config.topology,
        partition.len(),
        partition.counts()
    );

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut population = seed_population(&config, &partition, &shapes, &mut rng);
    let mut engine = Engine::new(config, partition).context("Failed to build engine")?;

    if partition.is_empty() {
        log::warn!("Cell density yields no cells; statistics stay at zero");
    } else if engine.moving_count() == 0 {
        log::warn!("Every species is pinned; nothing will move");
    }

    let mut stats = StatsBuffer::new(options.steps);
    for step in 0..options.steps {
        let measured = engine
            .tick_with_stats(&mut population, &mut rng)
            .with_context(|| format!("Tick {} failed", step))?;
        stats.record(step, &measured);
        log::debug!(
            "step {}: order {:.4}, angular momentum {:.4}, clustering {:.4}",
            step,
            measured.order,
            measured.angular_momentum,
            measured.clustering
        );
    }

    log::info!("Completed {} steps", options.steps);

    Ok(RunOutput {
        report: StatsReport::from_flat(stats.as_slice(), options.steps),
        snapshot: snapshot(&population, options.steps),
    })
}
