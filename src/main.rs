use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use evoalign::config::{AppConfig, ConfigManager};
use evoalign::data::FastaConnector;
use evoalign::engines::generation::{ConsoleProgressCallback, EngineBuilder, PopulationEntry};
use evoalign::scoring::{sum_pairs_score, ScoringMatrix};
use evoalign::AlignmentMatrix;
use std::path::PathBuf;

/// EvoAlign: evolutionary multiple sequence alignment
///
/// Searches for alignments of amino-acid sequences that are Pareto-optimal
/// under several substitution-matrix scores.
#[derive(Parser, Debug)]
#[command(name = "evoalign")]
#[command(author, version, about = "Multi-objective evolutionary sequence alignment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve an alignment of the sequences in one or more FASTA files.
    Align(AlignArgs),

    /// Score an existing alignment under one or more matrices.
    Score {
        /// Aligned FASTA file
        #[arg(short, long)]
        input: PathBuf,

        /// Matrix names (62, 45, hydropathy, volume)
        #[arg(short, long, default_value = "blosum62")]
        matrix: Vec<String>,
    },

    /// Write the default configuration as TOML.
    Config {
        #[arg(short, long, default_value = "evoalign.toml")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Input FASTA files, read in order
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured iteration count
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Shared checkpoint file
    #[arg(long, conflicts_with = "no_checkpoint")]
    checkpoint: Option<PathBuf>,

    /// Run without a checkpoint file
    #[arg(long)]
    no_checkpoint: bool,

    /// Objective names, most important first, used to pick the written alignment
    #[arg(long, value_delimiter = ',')]
    rank: Vec<String>,

    /// Where to write the best alignment (FASTA). Printed to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the final Pareto front (JSON)
    #[arg(long)]
    front: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Align(args) => align(args),
        Commands::Score { input, matrix } => score(input, &matrix),
        Commands::Config { output } => {
            ConfigManager::new()
                .save_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

fn load_config(args: &AlignArgs) -> Result<AppConfig> {
    let mut manager =
        ConfigManager::load(args.config.as_deref()).context("loading configuration")?;
    manager.update(|c| {
        if let Some(n) = args.iterations {
            c.evolution.iterations = n;
        }
        if args.seed.is_some() {
            c.evolution.seed = args.seed;
        }
        if let Some(path) = &args.checkpoint {
            c.checkpoint.enabled = true;
            c.checkpoint.path = path.clone();
        }
        if args.no_checkpoint {
            c.checkpoint.enabled = false;
        }
    })?;
    Ok(manager.into_inner())
}

fn align(args: AlignArgs) -> Result<()> {
    let config = load_config(&args)?;

    let records = FastaConnector::load_many(&args.input).context("reading input sequences")?;
    if records.len() < 2 {
        bail!("need at least two sequences to align, found {}", records.len());
    }
    let initial = AlignmentMatrix::from_records(records)?;
    log::info!(
        "Aligning {} sequences, initial width {}",
        initial.len(),
        initial.width()
    );

    let mut engine = EngineBuilder::from_config(&config).build()?;
    engine.add_solution(initial)?;

    let mut progress = ConsoleProgressCallback;
    engine.evolve(config.evolution.iterations, &mut progress)?;
    if let Some(outcome) = engine.sync_checkpoint() {
        if let Some(e) = outcome.error {
            log::warn!("Final checkpoint sync failed: {}", e);
        }
    }

    if let Some(path) = &args.front {
        let front: Vec<PopulationEntry> = engine.population().entries();
        let json = serde_json::to_string_pretty(&front)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    let Some((fitness, best)) = engine.best_by_ranking(&args.rank)? else {
        bail!("population is empty after evolution");
    };
    log::info!("Selected alignment with fitness {}", fitness);

    match &args.output {
        Some(path) => {
            FastaConnector::write(path, best).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{}", FastaConnector::to_string(best)),
    }
    Ok(())
}

fn score(input: PathBuf, matrices: &[String]) -> Result<()> {
    let records = FastaConnector::load(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let ragged = records
        .windows(2)
        .any(|w| w[0].sequence.len() != w[1].sequence.len());
    if ragged {
        log::warn!("Rows of {} differ in length; padding with gaps", input.display());
    }
    let alignment = AlignmentMatrix::from_records(records)?;
    for name in matrices {
        let matrix = ScoringMatrix::by_name(name)?;
        let value = sum_pairs_score(&alignment, &matrix)?;
        println!("{}\t{}", matrix.name(), value);
    }
    Ok(())
}
