//! The tick engine.
//!
//! A tick reads one generation and writes the next: every heading is
//! computed from the pre-tick snapshot before any agent moves, and all
//! agents move before statistics are taken.

use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::force::{interact, Interaction};
use crate::model::HeadingModel;
use crate::noise::NoiseSource;
use crate::population::Population;
use crate::species::{SpeciesPartition, SPECIES};
use crate::stats::{measure, GlobalStats, StatsBuffer};
use crate::vector::Vector2D;

/// New heading for one agent.
///
/// `draw` is a uniform sample in `[-1, 1)`; the heading is rotated by
/// `draw · noise · π`. A heading that sums to zero is left at zero.
pub fn integrate_heading(
    config: &SimulationConfig,
    species: usize,
    heading: Vector2D,
    interaction: &Interaction,
    draw: f64,
) -> Vector2D {
    let params = &config.species[species];

    let mut next = heading * config.inertia
        + params.gradient
        + interaction.alignment * config.alignment
        + interaction.force;
    next = next.normalize();

    if config.model.heading == HeadingModel::Velocity {
        next = next * params.speed;
    }

    next.rotate(config.noise * PI * draw)
}

/// Displacement of an agent of `species` with the given heading over one tick.
pub fn displacement(config: &SimulationConfig, species: usize, heading: Vector2D) -> Vector2D {
    match config.model.heading {
        HeadingModel::UnitHeading => heading * config.species[species].speed,
        HeadingModel::Velocity => heading,
    }
}

/// Validated configuration plus the scratch generation buffer.
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimulationConfig,
    partition: SpeciesPartition,
    next_headings: Vec<Vector2D>,
}

impl Engine {
    pub fn new(config: SimulationConfig, partition: SpeciesPartition) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            partition,
            next_headings: Vec::with_capacity(partition.len()),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn partition(&self) -> &SpeciesPartition {
        &self.partition
    }

    /// Number of agents that belong to non-pinned species.
    pub fn moving_count(&self) -> usize {
        (0..SPECIES)
            .filter(|&k| !self.config.species[k].pinned)
            .map(|k| self.partition.count(k))
            .sum()
    }

    /// Advances the population by one tick.
    ///
    /// The population is checked first; on error nothing is mutated.
    pub fn tick<N>(&mut self, population: &mut Population, noise: &mut N) -> Result<()>
    where
        N: NoiseSource + ?Sized,
    {
        population.check_len(self.partition.len())?;
        self.update_headings(population, noise);
        self.update_positions(population);
        Ok(())
    }

    /// Advances one tick and measures the resulting population.
    pub fn tick_with_stats<N>(
        &mut self,
        population: &mut Population,
        noise: &mut N,
    ) -> Result<GlobalStats>
    where
        N: NoiseSource + ?Sized,
    {
        self.tick(population, noise)?;
        measure(&self.config, &self.partition, population)
    }

    /// Runs `stats.steps()` ticks, recording statistics after each.
    pub fn run<N>(
        &mut self,
        population: &mut Population,
        noise: &mut N,
        stats: &mut StatsBuffer,
    ) -> Result<()>
    where
        N: NoiseSource + ?Sized,
    {
        population.check_len(self.partition.len())?;
        for step in 0..stats.steps() {
            let measured = self.tick_with_stats(population, noise)?;
            stats.record(step, &measured);
        }
        Ok(())
    }

    fn update_headings<N>(&mut self, population: &mut Population, noise: &mut N)
    where
        N: NoiseSource + ?Sized,
    {
        self.next_headings.clear();
        self.next_headings
            .extend((0..population.len()).map(|i| population.heading(i)));

        for species in 0..SPECIES {
            if self.config.species[species].pinned {
                continue;
            }
            for i in self.partition.range(species) {
                let interaction = interact(&self.config, &self.partition, population, i);
                let draw = noise.next_symmetric();
                self.next_headings[i] = integrate_heading(
                    &self.config,
                    species,
                    population.heading(i),
                    &interaction,
                    draw,
                );
            }
        }

        for species in 0..SPECIES {
            if self.config.species[species].pinned {
                continue;
            }
            for i in self.partition.range(species) {
                population.set_heading(i, self.next_headings[i]);
            }
        }
    }

    fn update_positions(&self, population: &mut Population) {
        for species in 0..SPECIES {
            if self.config.species[species].pinned {
                continue;
            }
            for i in self.partition.range(species) {
                let moved = population.position(i)
                    + displacement(&self.config, species, population.heading(i));
                population.set_position(
                    i,
                    self.config.topology.confine(moved, &self.config.domain),
                );
            }
        }
    }
}
