#![cfg_attr(not(feature = "std"), no_std)]

//! File formats shared by the simulation runner: user-facing parameters,
//! parameter ranges, statistics and evolution reports, and state snapshots.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Radius of a single cell; radii in [`CellParameters`] are multiples of it.
pub const CORE_RADIUS: f64 = 0.1;

/// Arena side length at scale factor 1.
pub const FIELD_SIZE: f64 = 10.0;

/// Number of statistics recorded per tick.
pub const N_GLOBAL_STATS: usize = 6;

/// Display names of the statistics, in buffer slot order.
pub const GLOBAL_STATS_NAMES: [&str; N_GLOBAL_STATS] = [
    "Group Angular Momentum",
    "Alignment",
    "Segregation (Blue)",
    "Segregation (Red)",
    "Segregation (Green)",
    "Clustering",
];

/// How a species is arranged when it is pinned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PinnedLayout {
    /// Not pinned.
    #[default]
    None,
    Random,
    Square,
    Circle,
    Ring,
}

impl PinnedLayout {
    pub fn is_pinned(&self) -> bool {
        *self != PinnedLayout::None
    }
}

/// Simulation parameters as users write them.
///
/// Field names follow the labels of saved parameter libraries so existing
/// files load unchanged; snake_case aliases are accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CellParameters {
    /// Fraction of the hexagonal close-packing density.
    #[serde(rename = "Cell Density", alias = "cell_density")]
    pub cell_density: f64,
    #[serde(rename = "Angular Inertia", alias = "angular_inertia")]
    pub angular_inertia: f64,
    #[serde(rename = "Interaction Force", alias = "interaction_force")]
    pub interaction_force: f64,
    /// In units of [`CORE_RADIUS`].
    #[serde(rename = "Interaction Range", alias = "interaction_range")]
    pub interaction_range: f64,
    #[serde(rename = "Alignment Force", alias = "alignment_force")]
    pub alignment_force: f64,
    /// In units of [`CORE_RADIUS`].
    #[serde(rename = "Alignment Range", alias = "alignment_range")]
    pub alignment_range: f64,
    /// Fraction of π.
    #[serde(rename = "Noise Intensity", alias = "noise_intensity")]
    pub noise_intensity: f64,
    /// Relative share of each species; only the first two are read, the
    /// remainder goes to the third.
    #[serde(rename = "Cell Ratio", alias = "cell_ratio")]
    pub cell_ratio: [f64; 3],
    #[serde(rename = "Pinned Cells", alias = "pinned_cells")]
    pub pinned_cells: [PinnedLayout; 3],
    #[serde(rename = "Velocity", alias = "velocity")]
    pub velocity: [f64; 3],
    #[serde(rename = "Gradient Intensity", alias = "gradient_intensity")]
    pub gradient_intensity: [f64; 3],
    /// Fraction of π, counter-clockwise from +x.
    #[serde(rename = "Gradient Direction", alias = "gradient_direction")]
    pub gradient_direction: [f64; 3],
    /// Pair affinity, row = own species.
    #[serde(rename = "Adhesion", alias = "adhesion")]
    pub adhesion: [[f64; 3]; 3],
}

impl Default for CellParameters {
    fn default() -> Self {
        Self {
            cell_density: 0.42,
            angular_inertia: 0.01,
            interaction_force: 0.0,
            interaction_range: 10.0,
            alignment_force: 1.0,
            alignment_range: 10.0,
            noise_intensity: 0.016,
            cell_ratio: [1.0, 0.0, 0.0],
            pinned_cells: [PinnedLayout::None; 3],
            velocity: [0.03; 3],
            gradient_intensity: [0.0; 3],
            gradient_direction: [0.0; 3],
            adhesion: [[0.01; 3]; 3],
        }
    }
}

impl CellParameters {
    /// Cartesian gradient of one species.
    pub fn gradient(&self, species: usize) -> (f64, f64) {
        let angle = self.gradient_direction[species] * core::f64::consts::PI;
        let intensity = self.gradient_intensity[species];
        (libm::cos(angle) * intensity, libm::sin(angle) * intensity)
    }

    /// Checks the physical limits of every parameter.
    pub fn check_limits(&self) -> Result<(), ParameterError> {
        within("Cell Density", self.cell_density, 0.01, 1.0)?;
        within("Interaction Range", self.interaction_range, 2.0, 50.0)?;
        within("Alignment Range", self.alignment_range, 2.0, 50.0)?;
        within("Noise Intensity", self.noise_intensity, 0.0, 1.0)?;
        finite("Angular Inertia", self.angular_inertia)?;
        finite("Interaction Force", self.interaction_force)?;
        finite("Alignment Force", self.alignment_force)?;
        for k in 0..3 {
            within("Cell Ratio", self.cell_ratio[k], 0.0, f64::INFINITY)?;
            within("Velocity", self.velocity[k], 0.0, f64::INFINITY)?;
            within("Gradient Intensity", self.gradient_intensity[k], 0.0, f64::INFINITY)?;
            within("Gradient Direction", self.gradient_direction[k], 0.0, 2.0)?;
            for value in self.adhesion[k] {
                within("Adhesion", value, 0.0, f64::INFINITY)?;
            }
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ParameterError> {
    within(name, value, f64::NEG_INFINITY, f64::INFINITY)
}

fn within(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParameterError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ParameterError { name, value, min, max });
    }
    Ok(())
}

/// A parameter outside its physical limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterError {
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is outside [{}, {}]",
            self.name, self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParameterError {}

/// Bounds on the first-to-second species ratio and on the third species' share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatioRange {
    pub first_to_second_min: f64,
    /// Unbounded when absent.
    pub first_to_second_max: Option<f64>,
    pub third_min: f64,
    pub third_max: f64,
}

impl Default for RatioRange {
    fn default() -> Self {
        Self {
            first_to_second_min: 0.0,
            first_to_second_max: None,
            third_min: 0.0,
            third_max: 0.0,
        }
    }
}

impl RatioRange {
    /// No constraint at all: every split of the three species is allowed.
    pub fn is_unrestricted(&self) -> bool {
        self.first_to_second_min == 0.0
            && self.first_to_second_max.is_none()
            && self.third_min == 0.0
            && self.third_max == 1.0
    }
}

/// Ranges that random and mutated parameter sets are drawn from.
///
/// Narrower than the limits of [`CellParameters::check_limits`]: these are
/// the practically useful ranges to explore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParameterRanges {
    #[serde(rename = "Cell Density", alias = "cell_density")]
    pub cell_density: [f64; 2],
    #[serde(rename = "Angular Inertia", alias = "angular_inertia")]
    pub angular_inertia: [f64; 2],
    #[serde(rename = "Interaction Force", alias = "interaction_force")]
    pub interaction_force: [f64; 2],
    #[serde(rename = "Interaction Range", alias = "interaction_range")]
    pub interaction_range: [f64; 2],
    #[serde(rename = "Alignment Force", alias = "alignment_force")]
    pub alignment_force: [f64; 2],
    #[serde(rename = "Alignment Range", alias = "alignment_range")]
    pub alignment_range: [f64; 2],
    #[serde(rename = "Noise Intensity", alias = "noise_intensity")]
    pub noise_intensity: [f64; 2],
    #[serde(rename = "Cell Ratio", alias = "cell_ratio")]
    pub cell_ratio: RatioRange,
    /// Layouts each species may take.
    #[serde(rename = "Pinned Cells", alias = "pinned_cells")]
    pub pinned_cells: [Vec<PinnedLayout>; 3],
    #[serde(rename = "Velocity", alias = "velocity")]
    pub velocity: [[f64; 2]; 3],
    #[serde(rename = "Gradient Intensity", alias = "gradient_intensity")]
    pub gradient_intensity: [[f64; 2]; 3],
    #[serde(rename = "Gradient Direction", alias = "gradient_direction")]
    pub gradient_direction: [[f64; 2]; 3],
    /// Only the upper triangle is read; adhesion stays symmetric.
    #[serde(rename = "Adhesion", alias = "adhesion")]
    pub adhesion: [[[f64; 2]; 3]; 3],
}

impl Default for ParameterRanges {
    fn default() -> Self {
        Self {
            cell_density: [0.01, 1.0],
            angular_inertia: [0.0, 5.0],
            interaction_force: [0.0, 5.0],
            interaction_range: [2.01, 20.0],
            alignment_force: [0.0, 5.0],
            alignment_range: [2.01, 20.0],
            noise_intensity: [0.0, 0.5],
            cell_ratio: RatioRange::default(),
            pinned_cells: [
                vec![PinnedLayout::None],
                vec![PinnedLayout::None],
                vec![PinnedLayout::None],
            ],
            velocity: [[0.005, 0.2]; 3],
            gradient_intensity: [[0.0, 2.0]; 3],
            gradient_direction: [[0.0, 2.0]; 3],
            adhesion: [[[0.01, 5.0]; 3]; 3],
        }
    }
}

/// Statistics of a run, one series per statistic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsReport {
    pub names: Vec<String>,
    pub steps: usize,
    /// `series[s][t]` is statistic `s` after tick `t`.
    pub series: Vec<Vec<f64>>,
}

impl StatsReport {
    /// Splits a flat `6 × steps` buffer into named series.
    pub fn from_flat(values: &[f64], steps: usize) -> Self {
        let series = (0..N_GLOBAL_STATS)
            .map(|s| values[s * steps..(s + 1) * steps].to_vec())
            .collect();
        Self {
            names: GLOBAL_STATS_NAMES.iter().map(|n| String::from(*n)).collect(),
            steps,
            series,
        }
    }
}

/// Positions and headings of every agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    pub step: usize,
    pub pos_x: Vec<f64>,
    pub pos_y: Vec<f64>,
    pub dir_x: Vec<f64>,
    pub dir_y: Vec<f64>,
}

/// Best fitness of one generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Fitness of every candidate, in candidate order.
    pub fitness: Vec<f64>,
    pub best: f64,
}

/// Outcome of evolving parameters toward one statistic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionReport {
    /// Name of the statistic that was maximised.
    pub statistic: String,
    /// Ticks `[start, end)` the fitness is averaged over.
    pub window: [usize; 2],
    pub generations: Vec<GenerationSummary>,
    pub best: CellParameters,
    pub best_fitness: f64,
}
