//! Population-level order parameters.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::math;
use crate::model::HeadingModel;
use crate::population::Population;
use crate::species::{SpeciesPartition, SPECIES};
use crate::topology::Topology;
use crate::vector::Vector2D;

/// Number of statistics recorded per tick.
pub const N_GLOBAL_STATS: usize = 6;

/// Slot of each statistic in a [`StatsBuffer`].
pub const ANGULAR_MOMENTUM: usize = 0;
pub const ORDER: usize = 1;
pub const SEGREGATION: [usize; SPECIES] = [2, 3, 4];
pub const CLUSTERING: usize = 5;

/// Statistics of one post-tick snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalStats {
    pub angular_momentum: f64,
    /// Polarisation: norm of the mean heading, in `[0, 1]`.
    pub order: f64,
    pub segregation: [f64; SPECIES],
    pub clustering: f64,
}

impl GlobalStats {
    pub fn to_slots(&self) -> [f64; N_GLOBAL_STATS] {
        let mut slots = [0.0; N_GLOBAL_STATS];
        slots[ANGULAR_MOMENTUM] = self.angular_momentum;
        slots[ORDER] = self.order;
        for (k, slot) in SEGREGATION.iter().enumerate() {
            slots[*slot] = self.segregation[k];
        }
        slots[CLUSTERING] = self.clustering;
        slots
    }
}

/// Flat `6 × steps` buffer; statistic `s` of tick `t` lives at `s * steps + t`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsBuffer {
    steps: usize,
    values: Vec<f64>,
}

impl StatsBuffer {
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            values: vec![0.0; N_GLOBAL_STATS * steps],
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn record(&mut self, step: usize, stats: &GlobalStats) {
        for (slot, value) in stats.to_slots().into_iter().enumerate() {
            self.values[slot * self.steps + step] = value;
        }
    }

    pub fn get(&self, slot: usize, step: usize) -> f64 {
        self.values[slot * self.steps + step]
    }

    /// All ticks of one statistic.
    pub fn series(&self, slot: usize) -> &[f64] {
        &self.values[slot * self.steps..(slot + 1) * self.steps]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Measures a snapshot.
///
/// Polarisation and angular momentum run over moving (non-pinned) agents
/// only and stay at zero when there are none. Segregation and clustering
/// count every agent. A population that does not match the partition is
/// rejected.
pub fn measure(
    config: &SimulationConfig,
    partition: &SpeciesPartition,
    population: &Population,
) -> Result<GlobalStats> {
    population.check_len(partition.len())?;

    let mut stats = GlobalStats::default();
    let moving: Vec<usize> = (0..SPECIES)
        .filter(|&k| !config.species[k].pinned)
        .flat_map(|k| partition.range(k))
        .collect();

    if !moving.is_empty() {
        let eff = moving.len() as f64;
        let unit = |i: usize| match config.model.heading {
            HeadingModel::UnitHeading => population.heading(i),
            HeadingModel::Velocity => population.heading(i).normalize(),
        };

        let mut polar = Vector2D::zero();
        for &i in &moving {
            polar += unit(i);
        }
        stats.order = polar.magnitude() / eff;

        let center = center_of_mass(config, population, &moving);
        let mut angular = 0.0;
        for &i in &moving {
            let rel = config
                .topology
                .separation(center, population.position(i), &config.domain);
            angular += rel.cross(&unit(i));
        }
        stats.angular_momentum = math::abs(angular) / eff;
    }

    let n = partition.len();
    if n == 0 {
        return Ok(stats);
    }

    let mut neighbours_total = 0usize;
    for species in 0..SPECIES {
        let mut ratio_sum = 0.0;
        for i in partition.range(species) {
            let (same, total) = count_neighbours(config, partition, population, i);
            if total > 0 {
                ratio_sum += same as f64 / total as f64;
            }
            neighbours_total += total;
        }
        let count = partition.count(species) as f64;
        if count > 0.0 {
            ratio_sum /= count * count;
        }
        stats.segregation[species] = ratio_sum * n as f64;
    }

    let r1 = config.interaction_radius;
    let expected = n as f64 * PI * r1 * r1 / config.domain.area();
    stats.clustering = neighbours_total as f64 / expected / n as f64;

    Ok(stats)
}

/// Mean position of `agents`; a circular mean per axis on the torus.
fn center_of_mass(config: &SimulationConfig, population: &Population, agents: &[usize]) -> Vector2D {
    let eff = agents.len() as f64;
    match config.topology {
        Topology::Free => {
            let mut sum = Vector2D::zero();
            for &i in agents {
                sum += population.position(i);
            }
            sum / eff
        }
        Topology::Periodic => {
            let width = config.domain.width;
            let height = config.domain.height;
            let (mut sx, mut cx, mut sy, mut cy) = (0.0, 0.0, 0.0, 0.0);
            for &i in agents {
                let (s, c) = math::sin_cos(2.0 * PI * population.pos_x[i] / width);
                sx += s;
                cx += c;
                let (s, c) = math::sin_cos(2.0 * PI * population.pos_y[i] / height);
                sy += s;
                cy += c;
            }
            Vector2D::new(
                width * (math::atan2(-sx / eff, -cx / eff) + PI) / (2.0 * PI),
                height * (math::atan2(-sy / eff, -cy / eff) + PI) / (2.0 * PI),
            )
        }
    }
}

/// `(same-species, all)` neighbours of `i` within the interaction radius.
fn count_neighbours(
    config: &SimulationConfig,
    partition: &SpeciesPartition,
    population: &Population,
    i: usize,
) -> (usize, usize) {
    let species = partition.species_of(i);
    let here = population.position(i);
    let mut same = 0;
    let mut total = 0;
    for j in 0..partition.len() {
        if j == i {
            continue;
        }
        let r = config
            .topology
            .distance(here, population.position(j), &config.domain);
        if r <= config.interaction_radius {
            total += 1;
            if partition.species_of(j) == species {
                same += 1;
            }
        }
    }
    (same, total)
}
