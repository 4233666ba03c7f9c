//! Pairwise interactions: alignment with visible neighbours and the
//! attraction-repulsion force.

use crate::config::SimulationConfig;
use crate::model::{AlignmentPolicy, RepulsionPolicy, HARD_CORE_REPULSION};
use crate::population::Population;
use crate::species::{SpeciesPartition, SPECIES};
use crate::vector::Vector2D;

/// What one agent feels from the rest of the population.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    /// Unweighted alignment sum; `fa` is applied by the heading integrator.
    pub alignment: Vector2D,
    /// Net attraction-repulsion force.
    pub force: Vector2D,
}

/// Equilibrium-zone force magnitude at distance `r`, for `r0 <= r <= r1`.
///
/// Equals `-f0` at `r0` (repulsive) and `beta · f0` at `r1`. Positive values
/// pull the agent toward its neighbour.
pub fn equilibrium_magnitude(r: f64, r0: f64, r1: f64, f0: f64, beta: f64) -> f64 {
    (1.0 + beta) * f0 * (r - r0) / (r1 - r0) - f0
}

/// Accumulates attraction-repulsion contributions under one policy.
#[derive(Debug, Clone, Copy)]
struct ForceAccumulator {
    policy: RepulsionPolicy,
    equilibrium: Vector2D,
    contact: Vector2D,
    contacts: usize,
    in_contact: bool,
}

impl ForceAccumulator {
    fn new(policy: RepulsionPolicy) -> Self {
        Self {
            policy,
            equilibrium: Vector2D::zero(),
            contact: Vector2D::zero(),
            contacts: 0,
            in_contact: false,
        }
    }

    /// `separation` points from the agent to the neighbour.
    fn add_equilibrium(&mut self, separation: Vector2D, r: f64, magnitude: f64) {
        if r > 0.0 {
            self.equilibrium += separation * (magnitude / r);
        }
    }

    fn add_contact(&mut self, separation: Vector2D, r: f64) {
        self.in_contact = true;
        match self.policy {
            RepulsionPolicy::Summed => {
                self.contact += separation * -HARD_CORE_REPULSION;
                self.contacts += 1;
            }
            RepulsionPolicy::Averaged => {
                // coincident agents have no direction to push along
                if r > 0.0 {
                    self.contact += -(separation / r);
                    self.contacts += 1;
                }
            }
        }
    }

    fn resolve(self) -> Vector2D {
        match self.policy {
            RepulsionPolicy::Summed => self.equilibrium + self.contact,
            RepulsionPolicy::Averaged if self.in_contact => {
                if self.contacts > 0 {
                    self.contact / self.contacts as f64 * HARD_CORE_REPULSION
                } else {
                    Vector2D::zero()
                }
            }
            RepulsionPolicy::Averaged => self.equilibrium,
        }
    }
}

/// Evaluates every neighbour of agent `i` against the pre-tick snapshot.
pub fn interact(
    config: &SimulationConfig,
    partition: &SpeciesPartition,
    population: &Population,
    i: usize,
) -> Interaction {
    let species = partition.species_of(i);
    let here = population.position(i);
    let r0 = config.core_radius;
    let r1 = config.interaction_radius;

    let mut alignment = Vector2D::zero();
    let mut forces = ForceAccumulator::new(config.model.repulsion);

    for other in 0..SPECIES {
        let beta = config.beta[species][other];
        let visible = !config.species[other].pinned;

        for j in partition.range(other) {
            if j == i {
                continue;
            }

            let separation = config
                .topology
                .separation(here, population.position(j), &config.domain);
            let r = separation.magnitude();

            if visible && r <= config.alignment_radius {
                let heading = population.heading(j);
                alignment += match config.model.alignment {
                    AlignmentPolicy::RawHeadings => heading,
                    AlignmentPolicy::UnitHeadings => heading.normalize(),
                };
            }

            if r > r1 {
                continue;
            }
            if r < r0 {
                forces.add_contact(separation, r);
            } else {
                let magnitude = equilibrium_magnitude(r, r0, r1, config.force, beta);
                forces.add_equilibrium(separation, r, magnitude);
            }
        }
    }

    Interaction {
        alignment,
        force: forces.resolve(),
    }
}
