use cellsim_core::{
    measure, seed_population, Domain, Engine, InteractionModel, PinnedShape, Population,
    Silent, SimulationConfig, SpeciesConfig, SpeciesPartition, StatsBuffer, Topology, Vector2D,
    N_GLOBAL_STATS, SPECIES,
};
use rand::{rngs::StdRng, SeedableRng};

fn pair_config(beta: f64) -> SimulationConfig {
    SimulationConfig {
        domain: Domain::square(20.0),
        core_radius: 1.0,
        interaction_radius: 5.0,
        alignment_radius: 5.0,
        inertia: 0.5,
        force: 1.0,
        alignment: 1.0,
        noise: 0.0,
        species: [SpeciesConfig {
            speed: 0.1,
            ..Default::default()
        }; SPECIES],
        beta: [[beta; SPECIES]; SPECIES],
        ..Default::default()
    }
}

fn pair(gap: f64) -> Population {
    Population::from_agents([
        (Vector2D::new(8.0, 10.0), Vector2D::new(0.0, 1.0)),
        (Vector2D::new(8.0 + gap, 10.0), Vector2D::new(0.0, 1.0)),
    ])
}

fn gap(population: &Population) -> f64 {
    population.position(0).distance(&population.position(1))
}

fn busy_config(topology: Topology, model: InteractionModel) -> SimulationConfig {
    SimulationConfig {
        domain: Domain::new(10.0, 8.0),
        topology,
        model,
        core_radius: 0.2,
        interaction_radius: 1.0,
        alignment_radius: 1.0,
        inertia: 0.5,
        force: 1.5,
        alignment: 1.0,
        noise: 0.3,
        species: [
            SpeciesConfig {
                speed: 0.05,
                gradient: Vector2D::new(0.2, 0.0),
                pinned: false,
            },
            SpeciesConfig {
                speed: 0.5,
                ..Default::default()
            },
            SpeciesConfig {
                speed: 0.02,
                ..Default::default()
            },
        ],
        beta: [[1.2, 1.4, 0.1], [1.4, 1.8, 0.1], [0.1, 0.1, 0.1]],
    }
}

fn busy_population(config: &SimulationConfig, partition: &SpeciesPartition, seed: u64) -> Population {
    let mut rng = StdRng::seed_from_u64(seed);
    seed_population(config, partition, &[None; SPECIES], &mut rng)
}

#[test]
fn test_pair_in_attractive_zone_moves_closer() {
    let partition = SpeciesPartition::from_counts([2, 0, 0]).unwrap();
    let mut engine = Engine::new(pair_config(3.0), partition).unwrap();
    let mut population = pair(3.0);

    engine.tick(&mut population, &mut Silent).unwrap();

    assert!(gap(&population) < 3.0);
    let (h0, h1) = (population.heading(0), population.heading(1));
    assert!(h0.x > 0.0 && h1.x < 0.0);
    assert!((h0.y - h1.y).abs() < 1e-12);
    assert!((h0.magnitude() - 1.0).abs() < 1e-12);
    assert!((h1.magnitude() - 1.0).abs() < 1e-12);
}

#[test]
fn test_pair_without_affinity_is_pushed_apart() {
    let partition = SpeciesPartition::from_counts([2, 0, 0]).unwrap();
    let mut engine = Engine::new(pair_config(0.0), partition).unwrap();
    let mut population = pair(3.0);

    engine.tick(&mut population, &mut Silent).unwrap();

    assert!(gap(&population) > 3.0);
}

#[test]
fn test_overlapping_pair_separates_regardless_of_force_scale() {
    for model in [InteractionModel::species_block(), InteractionModel::velocity()] {
        let mut config = pair_config(0.0);
        config.force = 0.0;
        config.model = model;
        let partition = SpeciesPartition::from_counts([2, 0, 0]).unwrap();
        let mut engine = Engine::new(config, partition).unwrap();
        let mut population = pair(0.5);

        engine.tick(&mut population, &mut Silent).unwrap();

        assert!(gap(&population) > 0.5);
        let h0 = population.heading(0).normalize();
        assert!((h0.x + 1.0).abs() < 1e-3, "{:?}", h0);
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    for topology in [Topology::Free, Topology::Periodic] {
        let config = busy_config(topology, InteractionModel::species_block());
        let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
        let start = busy_population(&config, &partition, 5);

        let mut runs = Vec::new();
        for _ in 0..2 {
            let mut engine = Engine::new(config, partition).unwrap();
            let mut population = start.clone();
            let mut stats = StatsBuffer::new(10);
            let mut rng = StdRng::seed_from_u64(77);
            engine.run(&mut population, &mut rng, &mut stats).unwrap();
            runs.push((population, stats));
        }
        assert_eq!(runs[0], runs[1]);
    }
}

#[test]
fn test_headings_are_normalised_after_tick() {
    for model in [InteractionModel::species_block(), InteractionModel::velocity()] {
        let config = busy_config(Topology::Periodic, model);
        let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
        let mut population = busy_population(&config, &partition, 11);
        let mut engine = Engine::new(config, partition).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..5 {
            engine.tick(&mut population, &mut rng).unwrap();
        }

        for species in 0..SPECIES {
            let expected = match model.heading {
                cellsim_core::HeadingModel::UnitHeading => 1.0,
                cellsim_core::HeadingModel::Velocity => config.species[species].speed,
            };
            for i in partition.range(species) {
                let m = population.heading(i).magnitude();
                assert!((m - expected).abs() < 1e-9, "agent {} has |h| = {}", i, m);
            }
        }
    }
}

#[test]
fn test_positions_stay_in_arena() {
    for topology in [Topology::Free, Topology::Periodic] {
        let mut config = busy_config(topology, InteractionModel::species_block());
        // up to most of an arena width per tick
        config.species[1].speed = 7.5;
        let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
        let mut population = busy_population(&config, &partition, 21);
        let mut engine = Engine::new(config, partition).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..30 {
            engine.tick(&mut population, &mut rng).unwrap();
            for i in 0..population.len() {
                let p = population.position(i);
                match topology {
                    Topology::Free => {
                        assert!((0.0..=10.0).contains(&p.x) && (0.0..=8.0).contains(&p.y));
                    }
                    Topology::Periodic => {
                        assert!((0.0..10.0).contains(&p.x) && (0.0..8.0).contains(&p.y));
                    }
                }
            }
        }
    }
}

#[test]
fn test_pinned_species_never_changes() {
    let mut config = busy_config(Topology::Free, InteractionModel::velocity());
    config.species[1].pinned = true;
    let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let shapes = [None, Some(PinnedShape::Ring), None];
    let mut population = seed_population(&config, &partition, &shapes, &mut rng);
    let before = population.clone();
    let mut engine = Engine::new(config, partition).unwrap();

    for _ in 0..25 {
        engine.tick(&mut population, &mut rng).unwrap();
    }

    for i in partition.range(1) {
        assert_eq!(population.pos_x[i].to_bits(), before.pos_x[i].to_bits());
        assert_eq!(population.pos_y[i].to_bits(), before.pos_y[i].to_bits());
        assert_eq!(population.heading_x[i].to_bits(), before.heading_x[i].to_bits());
        assert_eq!(population.heading_y[i].to_bits(), before.heading_y[i].to_bits());
    }
    // the moving species did react
    assert_ne!(population.pos_x[..30], before.pos_x[..30]);
}

#[test]
fn test_order_parameter_bounds_over_run() {
    let config = busy_config(Topology::Periodic, InteractionModel::velocity());
    let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
    let mut population = busy_population(&config, &partition, 13);
    let mut engine = Engine::new(config, partition).unwrap();
    let mut stats = StatsBuffer::new(20);
    let mut rng = StdRng::seed_from_u64(13);

    engine.run(&mut population, &mut rng, &mut stats).unwrap();

    assert_eq!(stats.as_slice().len(), N_GLOBAL_STATS * 20);
    for &order in stats.series(cellsim_core::stats::ORDER) {
        assert!((0.0..=1.0 + 1e-12).contains(&order));
    }
    assert!(stats.as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn test_single_pinned_species_is_inert() {
    let mut config = pair_config(0.0);
    config.species[0].pinned = true;
    let partition = SpeciesPartition::from_counts([3, 0, 0]).unwrap();
    let mut engine = Engine::new(config, partition).unwrap();
    let mut population = Population::from_agents([
        (Vector2D::new(1.0, 1.0), Vector2D::zero()),
        (Vector2D::new(1.5, 1.0), Vector2D::zero()),
        (Vector2D::new(9.0, 9.0), Vector2D::zero()),
    ]);
    let before = population.clone();

    let stats = engine.tick_with_stats(&mut population, &mut Silent).unwrap();

    assert_eq!(population, before);
    assert_eq!(stats.order, 0.0);
    assert_eq!(stats.angular_momentum, 0.0);
    assert!(stats.clustering.is_finite());
    assert_eq!(engine.moving_count(), 0);
}

#[test]
fn test_threshold_and_block_partitions_agree() {
    let config = busy_config(Topology::Free, InteractionModel::species_block());
    let blocks = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
    let thresholds = SpeciesPartition::from_thresholds(30, 49, 60).unwrap();
    let start = busy_population(&config, &blocks, 17);

    let mut a = start.clone();
    let mut b = start;
    Engine::new(config, blocks)
        .unwrap()
        .tick(&mut a, &mut StdRng::seed_from_u64(1))
        .unwrap();
    Engine::new(config, thresholds)
        .unwrap()
        .tick(&mut b, &mut StdRng::seed_from_u64(1))
        .unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_tick_with_stats_matches_measure() {
    let config = busy_config(Topology::Free, InteractionModel::species_block());
    let partition = SpeciesPartition::from_counts([30, 20, 10]).unwrap();
    let mut population = busy_population(&config, &partition, 23);
    let mut engine = Engine::new(config, partition).unwrap();

    let stats = engine
        .tick_with_stats(&mut population, &mut StdRng::seed_from_u64(2))
        .unwrap();

    assert_eq!(stats, measure(&config, &partition, &population).unwrap());
}
