//! Parameter evolution: random parameter sets, mutation, crossover and a
//! generational search that maximises one statistic.

use anyhow::{bail, Context, Result};
use cellsim_core::{InteractionModel, Topology};
use cellsim_shared::{
    CellParameters, EvolutionReport, GenerationSummary, ParameterRanges, PinnedLayout,
    GLOBAL_STATS_NAMES, N_GLOBAL_STATS,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::runner::{run, RunOptions};

/// One independently inherited parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gene {
    CellDensity,
    AngularInertia,
    InteractionForce,
    InteractionRange,
    AlignmentForce,
    AlignmentRange,
    NoiseIntensity,
    CellRatio,
    PinnedCells,
    Velocity,
    GradientIntensity,
    GradientDirection,
    Adhesion,
}

impl Gene {
    pub const ALL: [Gene; 13] = [
        Gene::CellDensity,
        Gene::AngularInertia,
        Gene::InteractionForce,
        Gene::InteractionRange,
        Gene::AlignmentForce,
        Gene::AlignmentRange,
        Gene::NoiseIntensity,
        Gene::CellRatio,
        Gene::PinnedCells,
        Gene::Velocity,
        Gene::GradientIntensity,
        Gene::GradientDirection,
        Gene::Adhesion,
    ];

    /// Redraws this gene of `params` from `ranges`.
    pub fn randomize<R: Rng + ?Sized>(
        self,
        params: &mut CellParameters,
        ranges: &ParameterRanges,
        rng: &mut R,
    ) {
        match self {
            Gene::CellDensity => params.cell_density = uniform(ranges.cell_density, 2, rng),
            Gene::AngularInertia => params.angular_inertia = uniform(ranges.angular_inertia, 4, rng),
            Gene::InteractionForce => {
                params.interaction_force = uniform(ranges.interaction_force, 4, rng)
            }
            Gene::InteractionRange => {
                params.interaction_range = uniform(ranges.interaction_range, 2, rng)
            }
            Gene::AlignmentForce => params.alignment_force = uniform(ranges.alignment_force, 4, rng),
            Gene::AlignmentRange => params.alignment_range = uniform(ranges.alignment_range, 2, rng),
            Gene::NoiseIntensity => params.noise_intensity = uniform(ranges.noise_intensity, 2, rng),
            Gene::CellRatio => params.cell_ratio = ratio(ranges, rng),
            Gene::PinnedCells => {
                for (k, choices) in ranges.pinned_cells.iter().enumerate() {
                    params.pinned_cells[k] = layout(choices, rng);
                }
            }
            Gene::Velocity => {
                for k in 0..3 {
                    params.velocity[k] = uniform(ranges.velocity[k], 3, rng);
                }
            }
            Gene::GradientIntensity => {
                for k in 0..3 {
                    params.gradient_intensity[k] = biased(ranges.gradient_intensity[k], rng);
                }
            }
            Gene::GradientDirection => {
                for k in 0..3 {
                    params.gradient_direction[k] = uniform(ranges.gradient_direction[k], 2, rng);
                }
            }
            Gene::Adhesion => {
                for i in 0..3 {
                    for j in i..3 {
                        let value = uniform(ranges.adhesion[i][j], 2, rng);
                        params.adhesion[i][j] = value;
                        params.adhesion[j][i] = value;
                    }
                }
            }
        }
    }

    /// Copies this gene from `source` into `params`.
    pub fn inherit(self, params: &mut CellParameters, source: &CellParameters) {
        match self {
            Gene::CellDensity => params.cell_density = source.cell_density,
            Gene::AngularInertia => params.angular_inertia = source.angular_inertia,
            Gene::InteractionForce => params.interaction_force = source.interaction_force,
            Gene::InteractionRange => params.interaction_range = source.interaction_range,
            Gene::AlignmentForce => params.alignment_force = source.alignment_force,
            Gene::AlignmentRange => params.alignment_range = source.alignment_range,
            Gene::NoiseIntensity => params.noise_intensity = source.noise_intensity,
            Gene::CellRatio => params.cell_ratio = source.cell_ratio,
            Gene::PinnedCells => params.pinned_cells = source.pinned_cells,
            Gene::Velocity => params.velocity = source.velocity,
            Gene::GradientIntensity => params.gradient_intensity = source.gradient_intensity,
            Gene::GradientDirection => params.gradient_direction = source.gradient_direction,
            Gene::Adhesion => params.adhesion = source.adhesion,
        }
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

fn uniform<R: Rng + ?Sized>(limits: [f64; 2], digits: i32, rng: &mut R) -> f64 {
    (limits[0] + round_to(rng.gen::<f64>() * (limits[1] - limits[0]), digits)).min(limits[1])
}

/// Two draws in three land on the lower bound.
fn biased<R: Rng + ?Sized>(limits: [f64; 2], rng: &mut R) -> f64 {
    let width = limits[1] - limits[0];
    (limits[0] + round_to(rng.gen::<f64>() * 3.0 * width - 2.0 * width, 2).max(0.0)).min(limits[1])
}

/// Mostly unpinned when unpinned is allowed.
fn layout<R: Rng + ?Sized>(choices: &[PinnedLayout], rng: &mut R) -> PinnedLayout {
    if !choices.contains(&PinnedLayout::None) {
        return choices.choose(rng).copied().unwrap_or_default();
    }
    let pinned: Vec<PinnedLayout> = choices
        .iter()
        .copied()
        .filter(|c| c.is_pinned())
        .collect();
    if pinned.is_empty() || rng.gen::<f64>() < 0.8 {
        return PinnedLayout::None;
    }
    pinned.choose(rng).copied().unwrap_or_default()
}

fn ratio<R: Rng + ?Sized>(ranges: &ParameterRanges, rng: &mut R) -> [f64; 3] {
    let range = &ranges.cell_ratio;
    if range.is_unrestricted() {
        // flat Dirichlet
        let draws: [f64; 3] = core::array::from_fn(|_| -(1.0 - rng.gen::<f64>()).ln());
        let total: f64 = draws.iter().sum();
        return draws.map(|d| d / total);
    }

    let third = round_to(
        range.third_min + rng.gen::<f64>() * (range.third_max - range.third_min),
        2,
    );
    let rest = 1.0 - third;
    let (first, second) = match range.first_to_second_max {
        None if range.first_to_second_min == 0.0 => {
            let first = round_to(rng.gen::<f64>() * rest, 2);
            (first, round_to(rest - first, 2))
        }
        None => {
            let inv = 1.0 / range.first_to_second_min;
            let second = round_to(rng.gen::<f64>() * (inv / (inv + 1.0)) * rest, 2);
            (round_to(rest - second, 2), second)
        }
        Some(max) => {
            let hi = max / (max + 1.0);
            let lo = range.first_to_second_min / (range.first_to_second_min + 1.0);
            let first = round_to((lo + rng.gen::<f64>() * (hi - lo)) * rest, 2);
            (first, round_to(rest - first, 2))
        }
    };
    [first.max(0.0), second.max(0.0), third]
}

/// A parameter set with every gene drawn from `ranges`.
pub fn randomize<R: Rng + ?Sized>(ranges: &ParameterRanges, rng: &mut R) -> CellParameters {
    let mut params = CellParameters::default();
    for gene in Gene::ALL {
        gene.randomize(&mut params, ranges, rng);
    }
    params
}

/// `count` children of `parent`, each gene redrawn with probability `rate`.
pub fn mutate<R: Rng + ?Sized>(
    parent: &CellParameters,
    ranges: &ParameterRanges,
    rate: f64,
    count: usize,
    rng: &mut R,
) -> Vec<CellParameters> {
    (0..count)
        .map(|_| {
            let mut child = parent.clone();
            for gene in Gene::ALL {
                if rng.gen::<f64>() < rate {
                    gene.randomize(&mut child, ranges, rng);
                }
            }
            child
        })
        .collect()
}

/// `count` children that take every gene from a randomly chosen parent.
pub fn crossover<R: Rng + ?Sized>(
    parents: &[CellParameters],
    count: usize,
    rng: &mut R,
) -> Vec<CellParameters> {
    let Some(first) = parents.first() else {
        return Vec::new();
    };
    (0..count)
        .map(|_| {
            let mut child = first.clone();
            for gene in Gene::ALL {
                if let Some(source) = parents.choose(rng) {
                    gene.inherit(&mut child, source);
                }
            }
            child
        })
        .collect()
}

/// Mean absolute value of statistic `stat` over ticks `[start, end)`.
pub fn fitness(series: &[Vec<f64>], stat: usize, window: [usize; 2]) -> f64 {
    let values = &series[stat][window[0]..window[1]];
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolveOptions {
    /// Slot of the statistic to maximise.
    pub stat: usize,
    pub generations: usize,
    /// Candidates per generation.
    pub population: usize,
    /// Best candidates kept each generation; one parent breeds by mutation,
    /// several by crossover.
    pub parents: usize,
    pub mutation_rate: f64,
    pub window: [usize; 2],
    pub seed: u64,
    pub scale_factor: f64,
    pub topology: Topology,
    pub model: InteractionModel,
}

impl Default for EvolveOptions {
    fn default() -> Self {
        Self {
            stat: 0,
            generations: 10,
            population: 9,
            parents: 1,
            mutation_rate: 0.2,
            window: [100, 200],
            seed: 0,
            scale_factor: 1.0,
            topology: Topology::Free,
            model: InteractionModel::species_block(),
        }
    }
}

impl EvolveOptions {
    fn validate(&self) -> Result<()> {
        if self.stat >= N_GLOBAL_STATS {
            bail!("Statistic index {} is out of range", self.stat);
        }
        if self.window[0] >= self.window[1] {
            bail!(
                "Fitness window [{}, {}) is empty",
                self.window[0],
                self.window[1]
            );
        }
        if self.parents == 0 || self.parents >= self.population {
            bail!(
                "Need at least one parent and fewer parents ({}) than candidates ({})",
                self.parents,
                self.population
            );
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            bail!("Mutation rate {} is outside [0, 1]", self.mutation_rate);
        }
        Ok(())
    }
}

fn evaluate(
    candidates: &[CellParameters],
    options: &EvolveOptions,
    rng: &mut StdRng,
) -> Result<Vec<f64>> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, params)| {
            let run_options = RunOptions {
                steps: options.window[1],
                seed: rng.gen(),
                scale_factor: options.scale_factor,
                topology: options.topology,
                model: options.model,
            };
            let output = run(params, &run_options)
                .with_context(|| format!("Candidate {} failed", i))?;
            Ok(fitness(&output.report.series, options.stat, options.window))
        })
        .collect()
}

/// Breeds parameter sets from a random start, keeping the fittest each
/// generation. Every candidate, parents included, is rerun from a fresh
/// population each generation.
pub fn evolve(ranges: &ParameterRanges, options: &EvolveOptions) -> Result<EvolutionReport> {
    options.validate()?;
    let statistic = GLOBAL_STATS_NAMES[options.stat];
    log::info!(
        "Evolving {} candidates for {} generations toward {}",
        options.population,
        options.generations,
        statistic
    );

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut candidates: Vec<CellParameters> = (0..options.population)
        .map(|_| randomize(ranges, &mut rng))
        .collect();
    let mut generations = Vec::with_capacity(options.generations + 1);

    for generation in 0..options.generations {
        let (scores, ranked) = score(&candidates, options, &mut rng)?;
        log::info!(
            "Generation {}/{}: max fitness {:.4}",
            generation,
            options.generations,
            scores[ranked[0]]
        );
        generations.push(summary(generation, scores, &ranked));

        let chosen: Vec<CellParameters> = ranked[..options.parents]
            .iter()
            .map(|&i| candidates[i].clone())
            .collect();
        let children = if options.parents == 1 {
            mutate(
                &chosen[0],
                ranges,
                options.mutation_rate,
                options.population - 1,
                &mut rng,
            )
        } else {
            crossover(&chosen, options.population - options.parents, &mut rng)
        };
        candidates = chosen.into_iter().chain(children).collect();
    }

    let (scores, ranked) = score(&candidates, options, &mut rng)?;
    let best_fitness = scores[ranked[0]];
    log::info!("Final max fitness {:.4}", best_fitness);
    generations.push(summary(options.generations, scores, &ranked));

    Ok(EvolutionReport {
        statistic: statistic.to_string(),
        window: options.window,
        generations,
        best: candidates[ranked[0]].clone(),
        best_fitness,
    })
}

/// Fitness of every candidate and candidate indices from fittest down.
fn score(
    candidates: &[CellParameters],
    options: &EvolveOptions,
    rng: &mut StdRng,
) -> Result<(Vec<f64>, Vec<usize>)> {
    let scores = evaluate(candidates, options, rng)?;
    let mut ranked: Vec<usize> = (0..candidates.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    Ok((scores, ranked))
}

fn summary(generation: usize, fitness: Vec<f64>, ranked: &[usize]) -> GenerationSummary {
    GenerationSummary {
        generation,
        best: fitness[ranked[0]],
        fitness,
    }
}
