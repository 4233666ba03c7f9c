use std::path::PathBuf;

use anyhow::{Context, Result};
use cellsim_cli::{evolve, read_params, read_ranges, run, write_json, EvolveOptions, RunOptions};
use cellsim_core::{InteractionModel, Topology};
use cellsim_shared::{CellParameters, ParameterRanges};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    /// Summed hard-core repulsion, raw-heading alignment, unit headings
    SpeciesBlock,
    /// Averaged hard-core repulsion, unit-heading alignment, speed-scaled headings
    Velocity,
}

impl From<Model> for InteractionModel {
    fn from(model: Model) -> Self {
        match model {
            Model::SpeciesBlock => InteractionModel::species_block(),
            Model::Velocity => InteractionModel::velocity(),
        }
    }
}

/// Statistic to maximise, in report slot order.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Stat {
    AngularMomentum,
    Alignment,
    SegregationBlue,
    SegregationRed,
    SegregationGreen,
    Clustering,
}

#[derive(Parser)]
#[command(name = "cellsim")]
#[command(author, version, about = "Multi-species self-propelled cell simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and write its statistics
    Run(RunArgs),

    /// Evolve parameter sets toward a high statistic
    Evolve(EvolveArgs),
}

/// Arena and engine choices shared by both commands.
#[derive(Args)]
struct ArenaArgs {
    /// Wrap the arena around instead of clamping at the walls
    #[arg(long)]
    periodic: bool,

    /// Arena side is 10 / scale factor
    #[arg(long, default_value_t = 1.0)]
    scale_factor: f64,

    #[arg(short, long, value_enum, default_value = "species-block")]
    model: Model,

    /// RNG seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
}

impl ArenaArgs {
    fn topology(&self) -> Topology {
        if self.periodic {
            Topology::Periodic
        } else {
            Topology::Free
        }
    }

    fn seed(&self) -> Result<u64> {
        let seed = match self.seed {
            Some(seed) => seed,
            None => os_seed()?,
        };
        log::info!("Seed: {}", seed);
        Ok(seed)
    }
}

#[derive(Args)]
struct RunArgs {
    /// JSON parameter file; defaults are used when omitted
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short = 'n', long, default_value_t = 1000)]
    steps: usize,

    #[command(flatten)]
    arena: ArenaArgs,

    /// Where to write the statistics report
    #[arg(long, default_value = "stats.json")]
    stats_out: PathBuf,

    /// Where to write the final positions and headings
    #[arg(long)]
    state_out: Option<PathBuf>,
}

#[derive(Args)]
struct EvolveArgs {
    /// JSON file of parameter ranges; defaults are used when omitted
    #[arg(short, long)]
    ranges: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "alignment")]
    stat: Stat,

    #[arg(short, long, default_value_t = 10)]
    generations: usize,

    /// Candidates per generation
    #[arg(long, default_value_t = 9)]
    population: usize,

    /// Candidates kept each generation; more than one breeds by crossover
    #[arg(long, default_value_t = 1)]
    parents: usize,

    /// Chance that a child redraws each parameter
    #[arg(long, default_value_t = 0.2)]
    mutation_rate: f64,

    /// First tick of the fitness window
    #[arg(long, default_value_t = 100)]
    window_start: usize,

    /// Tick the fitness window ends before; also the run length
    #[arg(long, default_value_t = 200)]
    window_end: usize,

    #[command(flatten)]
    arena: ArenaArgs,

    /// Where to write the evolution report
    #[arg(short, long, default_value = "evolve.json")]
    out: PathBuf,
}

fn os_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).context("Failed to draw a seed from the OS")?;
    Ok(u64::from_le_bytes(bytes))
}

fn run_command(args: RunArgs) -> Result<()> {
    let params = match &args.params {
        Some(path) => {
            log::info!("Parameters: {}", path.display());
            read_params(path)?
        }
        None => {
            log::info!("Parameters: defaults");
            CellParameters::default()
        }
    };

    let options = RunOptions {
        steps: args.steps,
        seed: args.arena.seed()?,
        scale_factor: args.arena.scale_factor,
        topology: args.arena.topology(),
        model: args.arena.model.into(),
    };

    let output = run(&params, &options).context("Simulation failed")?;

    write_json(&args.stats_out, &output.report)?;
    log::info!("Statistics written to {}", args.stats_out.display());

    if let Some(path) = &args.state_out {
        write_json(path, &output.snapshot)?;
        log::info!("State written to {}", path.display());
    }

    Ok(())
}

fn evolve_command(args: EvolveArgs) -> Result<()> {
    let ranges = match &args.ranges {
        Some(path) => {
            log::info!("Ranges: {}", path.display());
            read_ranges(path)?
        }
        None => {
            log::info!("Ranges: defaults");
            ParameterRanges::default()
        }
    };

    let options = EvolveOptions {
        stat: args.stat as usize,
        generations: args.generations,
        population: args.population,
        parents: args.parents,
        mutation_rate: args.mutation_rate,
        window: [args.window_start, args.window_end],
        seed: args.arena.seed()?,
        scale_factor: args.arena.scale_factor,
        topology: args.arena.topology(),
        model: args.arena.model.into(),
    };

    let report = evolve(&ranges, &options).context("Evolution failed")?;
    log::info!(
        "Best {} fitness {:.4}",
        report.statistic,
        report.best_fitness
    );

    write_json(&args.out, &report)?;
    log::info!("Evolution report written to {}", args.out.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Evolve(args) => evolve_command(args),
    }
}
