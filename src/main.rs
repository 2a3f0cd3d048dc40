use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use riffle_markov::output::write_round;
use riffle_markov::{GroupingPreset, OutputFormat, Simulation, SimulationConfig};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Monte Carlo riffle shuffle mixing estimator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the transition matrix and write every round's distribution
    Run {
        #[command(flatten)]
        sampling: SamplingArgs,
        #[arg(long)]
        rounds: Option<u32>,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[arg(long, help = "Show a sampling progress bar on stderr")]
        progress: bool,
    },
    /// Estimate and print only the one-shuffle transition matrix
    Estimate {
        #[command(flatten)]
        sampling: SamplingArgs,
    },
    /// List the built-in grouping tables
    Presets,
}

#[derive(Args)]
struct SamplingArgs {
    #[arg(short, long, value_name = "FILE", help = "TOML config; flags override its values")]
    config: Option<PathBuf>,
    #[arg(long)]
    items: Option<usize>,
    #[arg(long)]
    iterations: Option<u64>,
    /// Comma-separated chunk sizes (e.g. 1,5); overrides --preset
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(usize))]
    grouping: Option<Vec<usize>>,
    #[arg(long, help = "Named grouping table (see `presets`)")]
    preset: Option<GroupingPreset>,
    #[arg(long, help = "Seed for reproducible sampling; omit to use OS entropy")]
    seed: Option<u64>,
    #[arg(long, help = "Output format: text or json")]
    format: Option<OutputFormat>,
}

impl SamplingArgs {
    fn into_config(self) -> CliResult<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(items) = self.items {
            config.item_count = items;
        }
        if let Some(iterations) = self.iterations {
            config.sample_iterations = iterations;
        }
        if let Some(preset) = self.preset {
            config.grouping_preset = preset.name().to_string();
            config.grouping_chance = None;
        }
        if let Some(grouping) = self.grouping {
            config.grouping_chance = Some(grouping);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            sampling,
            rounds,
            output,
            progress,
        } => run_simulation(sampling, rounds, output, progress)?,
        Commands::Estimate { sampling } => run_estimate(sampling)?,
        Commands::Presets => run_presets(),
    }
    Ok(())
}

fn run_simulation(
    sampling: SamplingArgs,
    rounds: Option<u32>,
    output: Option<PathBuf>,
    progress: bool,
) -> CliResult<()> {
    let mut config = sampling.into_config()?;
    if let Some(rounds) = rounds {
        config.rounds = rounds;
    }
    if output.is_some() {
        config.output = output;
    }

    let simulation = Simulation::new(config)?.with_progress(progress);
    let summary = simulation.run_to_output()?;

    if let Some(path) = &simulation.config().output {
        eprintln!(
            "Wrote {} rounds ({} bytes) to {}",
            summary.rounds_written,
            summary.bytes_written,
            path.display()
        );
    }
    eprintln!("  blake3 digest        = {}", summary.digest_hex());
    eprintln!("  final max |p - 1/n|  = {:.6}", summary.final_uniform_distance);
    Ok(())
}

fn run_estimate(sampling: SamplingArgs) -> CliResult<()> {
    let config = sampling.into_config()?;
    let simulation = Simulation::new(config)?;
    let transition = simulation.estimate()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_round(&mut out, simulation.config().format, 1, &transition)?;
    out.flush()?;
    eprintln!("  worst column sum error = {:.3e}", transition.column_sum_error());
    Ok(())
}

fn run_presets() {
    for preset in GroupingPreset::ALL {
        let marker = if preset == GroupingPreset::default() {
            " (default)"
        } else {
            ""
        };
        println!("{:<12} {:?}{}", preset.name(), preset.sizes(), marker);
    }
}
