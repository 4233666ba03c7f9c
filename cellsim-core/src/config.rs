use crate::error::ConfigError;
use crate::model::InteractionModel;
use crate::species::SPECIES;
use crate::topology::{Domain, Topology};
use crate::vector::Vector2D;

/// Per-species constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesConfig {
    /// Distance travelled per tick (`v0`).
    pub speed: f64,
    /// Constant drift added to the heading every tick.
    pub gradient: Vector2D,
    /// Pinned species never turn or move but still act as neighbours.
    pub pinned: bool,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            speed: 0.03,
            gradient: Vector2D::zero(),
            pinned: false,
        }
    }
}

/// Read-only parameters of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub domain: Domain,
    pub topology: Topology,
    pub model: InteractionModel,
    /// Hard-core radius `r0`.
    pub core_radius: f64,
    /// Attraction-repulsion cutoff `r1`.
    pub interaction_radius: f64,
    /// Alignment visibility radius `rv`.
    pub alignment_radius: f64,
    /// Fraction of the previous heading kept each tick.
    pub inertia: f64,
    /// Attraction-repulsion scale `f0`.
    pub force: f64,
    /// Alignment weight `fa`.
    pub alignment: f64,
    /// Noise amplitude as a fraction of π.
    pub noise: f64,
    pub species: [SpeciesConfig; SPECIES],
    /// Pair asymmetry, row = own species, column = neighbour species.
    pub beta: [[f64; SPECIES]; SPECIES],
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            topology: Topology::Free,
            model: InteractionModel::species_block(),
            core_radius: 0.2,
            interaction_radius: 1.0,
            alignment_radius: 1.0,
            inertia: 0.01,
            force: 0.0,
            alignment: 1.0,
            noise: 0.016,
            species: [SpeciesConfig::default(); SPECIES],
            beta: [[0.01; SPECIES]; SPECIES],
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.domain.validate()?;

        finite("inertia", self.inertia)?;
        finite("force", self.force)?;
        finite("alignment", self.alignment)?;
        finite("noise", self.noise)?;
        non_negative("core_radius", self.core_radius)?;
        non_negative("interaction_radius", self.interaction_radius)?;
        non_negative("alignment_radius", self.alignment_radius)?;

        if self.core_radius >= self.interaction_radius {
            return Err(ConfigError::RadiiOrder {
                core: self.core_radius,
                cutoff: self.interaction_radius,
            });
        }

        for species in &self.species {
            non_negative("speed", species.speed)?;
            finite("gradient", species.gradient.x)?;
            finite("gradient", species.gradient.y)?;
        }
        for value in self.beta.iter().flatten() {
            finite("beta", *value)?;
        }

        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        Err(ConfigError::Negative { name, value })
    } else {
        Ok(())
    }
}
