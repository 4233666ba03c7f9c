//! Named model variants.
//!
//! The two repulsion policies and the two heading representations are
//! different physical models, so they are chosen explicitly when the
//! engine is configured and never mixed implicitly.

/// Magnitude of the hard-core repulsion applied inside `r0`.
pub const HARD_CORE_REPULSION: f64 = 10_000.0;

/// How hard-core overlaps are aggregated for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepulsionPolicy {
    /// Every overlapping neighbour adds `-K · (pos_j - pos_i)` on top of the
    /// equilibrium forces, so repulsion grows with the number of overlaps.
    #[default]
    Summed,
    /// Contact is its own regime: once any neighbour overlaps, equilibrium
    /// forces are dropped and the result is `K` times the mean unit vector
    /// pointing away from the overlapping neighbours.
    Averaged,
}

/// What a visible neighbour contributes to the alignment sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// The neighbour's heading vector as stored.
    #[default]
    RawHeadings,
    /// The neighbour's heading normalised to unit length, so faster
    /// species do not dominate the alignment direction.
    UnitHeadings,
}

/// How heading and speed are represented in the population arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingModel {
    /// Headings are unit vectors; species speed is applied when moving.
    #[default]
    UnitHeading,
    /// Headings are velocities whose magnitude is the species speed.
    Velocity,
}

/// A complete choice of interaction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionModel {
    pub repulsion: RepulsionPolicy,
    pub alignment: AlignmentPolicy,
    pub heading: HeadingModel,
}

impl InteractionModel {
    /// Summed repulsion, raw alignment, unit headings.
    pub fn species_block() -> Self {
        Self {
            repulsion: RepulsionPolicy::Summed,
            alignment: AlignmentPolicy::RawHeadings,
            heading: HeadingModel::UnitHeading,
        }
    }

    /// Averaged repulsion, unit alignment, velocity headings.
    pub fn velocity() -> Self {
        Self {
            repulsion: RepulsionPolicy::Averaged,
            alignment: AlignmentPolicy::UnitHeadings,
            heading: HeadingModel::Velocity,
        }
    }
}
