//! Conversion of user parameters into engine configuration.

use anyhow::{bail, Context, Result};
use cellsim_core::{
    Domain, InteractionModel, PinnedShape, SimulationConfig, SpeciesConfig, SpeciesPartition,
    Topology, Vector2D, SPECIES,
};
use cellsim_shared::{CellParameters, PinnedLayout, CORE_RADIUS, FIELD_SIZE};

/// Everything needed to build an engine and its first population.
#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    pub config: SimulationConfig,
    pub partition: SpeciesPartition,
    pub shapes: [Option<PinnedShape>; SPECIES],
}

/// Number of cells at close packing in a `width × height` arena.
pub fn max_population(width: f64, height: f64) -> f64 {
    (3f64.sqrt() / 6.0) * width * height / (CORE_RADIUS * CORE_RADIUS)
}

/// Splits `n` cells by the first two ratios; the remainder goes to the third species.
pub fn species_counts(n: usize, ratio: &[f64; SPECIES]) -> [usize; SPECIES] {
    let first = ((n as f64 * ratio[0]) as usize).min(n);
    let second = ((n as f64 * (ratio[0] + ratio[1])) as usize).clamp(first, n);
    [first, second - first, n - second]
}

pub fn shape(layout: PinnedLayout) -> Option<PinnedShape> {
    match layout {
        PinnedLayout::None => None,
        PinnedLayout::Random => Some(PinnedShape::Random),
        PinnedLayout::Square => Some(PinnedShape::Square),
        PinnedLayout::Circle => Some(PinnedShape::Circle),
        PinnedLayout::Ring => Some(PinnedShape::Ring),
    }
}

/// Builds the engine configuration for an arena of side `FIELD_SIZE / scale_factor`.
pub fn setup(
    params: &CellParameters,
    scale_factor: f64,
    topology: Topology,
    model: InteractionModel,
) -> Result<Setup> {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        bail!("Scale factor must be positive, got {}", scale_factor);
    }
    params.check_limits().context("Invalid cell parameters")?;

    let size = FIELD_SIZE / scale_factor;
    let n = (params.cell_density * max_population(size, size)) as usize;
    let partition = SpeciesPartition::from_counts(species_counts(n, &params.cell_ratio))
        .context("Failed to partition species")?;

    let species = core::array::from_fn(|k| {
        let (gx, gy) = params.gradient(k);
        SpeciesConfig {
            speed: params.velocity[k],
            gradient: Vector2D::new(gx, gy),
            pinned: params.pinned_cells[k].is_pinned(),
        }
    });

    let config = SimulationConfig {
        domain: Domain::square(size),
        topology,
        model,
        core_radius: 2.0 * CORE_RADIUS,
        interaction_radius: params.interaction_range * CORE_RADIUS,
        alignment_radius: params.alignment_range * CORE_RADIUS,
        inertia: params.angular_inertia,
        force: params.interaction_force,
        alignment: params.alignment_force,
        noise: params.noise_intensity,
        species,
        beta: params.adhesion,
    };
    config.validate().context("Invalid simulation configuration")?;

    Ok(Setup {
        config,
        partition,
        shapes: params.pinned_cells.map(shape),
    })
}
