//! Random initial populations.

use core::f64::consts::TAU;

use rand::Rng;

use crate::config::SimulationConfig;
use crate::model::HeadingModel;
use crate::population::Population;
use crate::species::{SpeciesPartition, SPECIES};
use crate::topology::{Domain, Topology};
use crate::vector::Vector2D;

/// Arrangement of a pinned species. Pinned agents start with zero heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedShape {
    /// Uniformly scattered over the arena.
    Random,
    /// Band along one of the four walls, 10% of the width deep.
    Square,
    /// Disc around the centre, radius up to 20% of the width.
    Circle,
    /// Annulus around the centre, radius 30-40% of the width.
    Ring,
}

/// Draws a population: moving species get uniform positions and uniformly
/// random headings, pinned species are arranged by their shape.
///
/// Headings are unit vectors, or `speed` long in the velocity model.
pub fn seed_population<R: Rng + ?Sized>(
    config: &SimulationConfig,
    partition: &SpeciesPartition,
    shapes: &[Option<PinnedShape>; SPECIES],
    rng: &mut R,
) -> Population {
    let domain = &config.domain;
    let mut population = Population::from_agents((0..partition.len()).map(|i| {
        let position = Vector2D::new(
            rng.gen_range(0.0..domain.width),
            rng.gen_range(0.0..domain.height),
        );
        let angle = rng.gen_range(0.0..TAU);
        let length = match config.model.heading {
            HeadingModel::UnitHeading => 1.0,
            HeadingModel::Velocity => config.species[partition.species_of(i)].speed,
        };
        (position, Vector2D::new(angle.cos(), angle.sin()) * length)
    }));

    for (species, shape) in shapes.iter().enumerate() {
        let Some(shape) = shape else {
            continue;
        };
        for i in partition.range(species) {
            let position = match shape {
                PinnedShape::Random => population.position(i),
                PinnedShape::Square => square_band(domain, rng),
                PinnedShape::Circle => {
                    let radius = domain.width * 0.2 * rng.gen::<f64>().sqrt();
                    around_center(domain, radius, rng)
                }
                PinnedShape::Ring => {
                    let radius = domain.width * (0.3 + rng.gen::<f64>() * 0.1);
                    around_center(domain, radius, rng)
                }
            };
            population.set_position(i, Topology::Free.confine(position, domain));
            population.set_heading(i, Vector2D::zero());
        }
    }

    population
}

fn around_center<R: Rng + ?Sized>(domain: &Domain, radius: f64, rng: &mut R) -> Vector2D {
    let angle = rng.gen_range(0.0..TAU);
    domain.center() + Vector2D::new(angle.cos(), angle.sin()) * radius
}

fn square_band<R: Rng + ?Sized>(domain: &Domain, rng: &mut R) -> Vector2D {
    let (w, h) = (domain.width, domain.height);
    let side = rng.gen_range(0..4);
    let along = rng.gen::<f64>() * 0.9;
    let depth = rng.gen::<f64>() * 0.1;
    match side {
        0 => Vector2D::new(depth * w, along * h),
        1 => Vector2D::new(w - depth * w, (along + 0.1) * h),
        2 => Vector2D::new((along + 0.1) * w, depth * h),
        _ => Vector2D::new(along * w, h - depth * h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InteractionModel;
    use rand::{rngs::StdRng, SeedableRng};

    fn arena(domain: Domain) -> SimulationConfig {
        SimulationConfig {
            domain,
            ..Default::default()
        }
    }

    #[test]
    fn test_moving_agents_are_unit_and_inside() {
        let config = arena(Domain::new(10.0, 6.0));
        let partition = SpeciesPartition::from_counts([20, 10, 0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let population = seed_population(&config, &partition, &[None; SPECIES], &mut rng);

        assert_eq!(population.len(), 30);
        for i in 0..population.len() {
            let p = population.position(i);
            assert!((0.0..10.0).contains(&p.x) && (0.0..6.0).contains(&p.y));
            assert!((population.heading(i).magnitude() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pinned_shapes_have_zero_heading() {
        let config = arena(Domain::square(10.0));
        let domain = config.domain;
        let partition = SpeciesPartition::from_counts([5, 40, 40]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let shapes = [None, Some(PinnedShape::Ring), Some(PinnedShape::Square)];
        let population = seed_population(&config, &partition, &shapes, &mut rng);

        for i in partition.range(1) {
            assert_eq!(population.heading(i), Vector2D::zero());
            let r = population.position(i).distance(&domain.center());
            assert!((3.0 - 1e-9..=4.0 + 1e-9).contains(&r));
        }
        for i in partition.range(2) {
            let p = population.position(i);
            let near_wall = p.x <= 1.0 || p.x >= 9.0 || p.y <= 1.0 || p.y >= 9.0;
            assert!(near_wall, "{:?} is not on the square band", p);
        }
    }

    #[test]
    fn test_seeding_is_reproducible() {
        let config = arena(Domain::square(10.0));
        let partition = SpeciesPartition::from_counts([5, 5, 5]).unwrap();
        let shapes = [None, Some(PinnedShape::Circle), None];
        let a = seed_population(&config, &partition, &shapes, &mut StdRng::seed_from_u64(9));
        let b = seed_population(&config, &partition, &shapes, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_velocity_headings_have_species_speed() {
        let mut config = arena(Domain::square(10.0));
        config.model = InteractionModel::velocity();
        config.species[0].speed = 0.03;
        config.species[1].speed = 0.5;
        config.species[2].speed = 0.0;
        let partition = SpeciesPartition::from_counts([10, 10, 10]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let population = seed_population(&config, &partition, &[None; SPECIES], &mut rng);

        for species in 0..SPECIES {
            let speed = config.species[species].speed;
            for i in partition.range(species) {
                let m = population.heading(i).magnitude();
                assert!((m - speed).abs() < 1e-12, "agent {} has |h| = {}", i, m);
            }
        }
    }
}
