//! Main entry point for the SPADE pattern miner
//!
//! This binary provides a CLI over the library:
//! - Full analysis with surrogate significance testing
//! - Plain concept mining
//! - Poisson test data generation
//! - Writing the default configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;
use tracing::info;

use spade_mining::{
    analysis::{OutputFormat, Spade},
    data::{BinnedSpikeTrains, PoissonGenerator, SpikeTrain},
    mining::{AnnotatedConcept, ReportMode},
    utils::{setup_logging, SpadeConfig},
};

#[derive(Parser)]
#[command(name = "spade-mining")]
#[command(version)]
#[command(about = "Spatio-temporal spike pattern detection", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file; SPADE_* environment variables are
    /// used when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine patterns and test their significance against surrogates
    Analyze {
        /// JSON file with a list of spike trains
        #[arg(short, long)]
        input: String,

        /// Output file, stdout when absent
        #[arg(short, long)]
        output: Option<String>,

        /// Number of surrogates (overrides the configuration)
        #[arg(long)]
        n_surr: Option<usize>,

        /// Significance level (overrides the configuration)
        #[arg(long)]
        alpha: Option<f64>,

        /// Output format: concepts or patterns
        #[arg(long)]
        format: Option<String>,
    },

    /// Mine concepts without significance testing
    Mine {
        /// JSON file with a list of spike trains
        #[arg(short, long)]
        input: String,

        /// Output file, stdout when absent
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate independent Poisson spike trains
    Generate {
        /// Number of spike trains
        #[arg(short = 'n', long, default_value = "20")]
        streams: usize,

        /// Firing rate in Hz
        #[arg(short, long, default_value = "10.0")]
        rate: f64,

        /// Duration in ms
        #[arg(short, long, default_value = "1000.0")]
        duration: f64,

        /// Refractory period in ms
        #[arg(long, default_value = "0.0")]
        refractory: f64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output file, stdout when absent
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write the default configuration
    DefaultConfig {
        /// Output file
        #[arg(short, long, default_value = "spade.json")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    setup_logging(log_level)?;

    let config = match &cli.config {
        Some(path) => {
            let config = SpadeConfig::from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path))?;
            info!("Loaded configuration from {}", path);
            config
        }
        None => SpadeConfig::from_env("SPADE"),
    };

    match cli.command {
        Commands::Analyze {
            input,
            output,
            n_surr,
            alpha,
            format,
        } => {
            run_analysis(config, &input, output, n_surr, alpha, format)?;
        }

        Commands::Mine { input, output } => {
            run_mining(&config, &input, output)?;
        }

        Commands::Generate {
            streams,
            rate,
            duration,
            refractory,
            seed,
            output,
        } => {
            generate_data(streams, rate, duration, refractory, seed, output)?;
        }

        Commands::DefaultConfig { output } => {
            SpadeConfig::default().to_file(&output)?;
            info!("Wrote default configuration to {}", output);
        }
    }

    Ok(())
}

fn load_trains(path: &str) -> Result<Vec<SpikeTrain>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let raw: Vec<SpikeTrain> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse spike trains from {}", path))?;

    // Re-validate: deserialization skips the constructor checks
    let trains = raw
        .into_iter()
        .map(|t| SpikeTrain::new(t.times, t.t_start, t.t_stop))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    info!("Loaded {} spike trains from {}", trains.len(), path);
    Ok(trains)
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<String>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(Path::new(&path), json)
                .with_context(|| format!("failed to write {}", path))?;
            info!("Saved results to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_analysis(
    mut config: SpadeConfig,
    input: &str,
    output: Option<String>,
    n_surr: Option<usize>,
    alpha: Option<f64>,
    format: Option<String>,
) -> Result<()> {
    if let Some(n) = n_surr {
        config.surrogates.n_surr = n;
    }
    if let Some(a) = alpha {
        config.significance.alpha = a;
    }
    if let Some(f) = format {
        config.output_format = f.parse::<OutputFormat>()?;
    }

    let trains = load_trains(input)?;
    info!(
        "Running SPADE: bin {} ms, window {} bins, {} surrogates, alpha {}",
        config.mining.bin_size, config.mining.win_len, config.surrogates.n_surr, config.significance.alpha
    );

    let result = Spade::new(config).run(&trains)?;
    info!(
        "Retained {} patterns in {:.2} s of mining",
        result.patterns.len(),
        result.stats.total().as_secs_f64()
    );

    write_json(&result, output)
}

fn run_mining(config: &SpadeConfig, input: &str, output: Option<String>) -> Result<()> {
    config.validate()?;
    let trains = load_trains(input)?;

    let binned = BinnedSpikeTrains::new(&trains, config.mining.bin_size)?;
    info!(
        "Binned {} streams into {} bins ({} events)",
        binned.num_streams(),
        binned.num_bins(),
        binned.num_events()
    );

    let run = Spade::new(config.clone())
        .miner()
        .mine(binned.matrix(), ReportMode::All)?;
    let concepts: Vec<AnnotatedConcept> = run
        .output
        .into_concepts()
        .into_iter()
        .map(AnnotatedConcept::from)
        .collect();
    info!("Found {} concepts", concepts.len());

    write_json(&concepts, output)
}

fn generate_data(
    streams: usize,
    rate: f64,
    duration: f64,
    refractory: f64,
    seed: u64,
    output: Option<String>,
) -> Result<()> {
    let generator = PoissonGenerator::new(rate, 0.0, duration)?.with_refractory(refractory)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let trains = generator.generate_many(streams, &mut rng);
    info!(
        "Generated {} spike trains with {} spikes",
        trains.len(),
        trains.iter().map(|t| t.len()).sum::<usize>()
    );

    write_json(&trains, output)
}
