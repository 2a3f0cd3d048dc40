use clap::Parser;
use std::time::{Duration, Instant};
use riffle_markov::markov::{Propagation, TransitionEstimator};
use riffle_markov::random::SeededSource;
use riffle_markov::shuffle::{GroupingPreset, RiffleShuffler};

const BENCH_SEED: u64 = 0xB10C_CAFE;

struct BenchmarkResult {
    items: usize,
    iterations: u64,
    preset: GroupingPreset,
    estimate_time: Duration,
    propagate_time: Duration,
    rounds: u32,
    column_sum_error: f64,
    final_uniform_distance: f64,
}

impl BenchmarkResult {
    fn samples_per_second(&self) -> f64 {
        let secs = self.estimate_time.as_secs_f64();
        if secs == 0.0 {
            return f64::INFINITY;
        }
        self.iterations as f64 / secs
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Throughput benchmark for transition estimation and propagation"
)]
struct BenchmarkCli {
    /// Comma-separated list of item counts to benchmark (e.g. 8,52,104)
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(usize))]
    items: Option<Vec<usize>>,
    /// Comma-separated list of sample iteration counts (e.g. 1000,10000)
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u64))]
    iterations: Option<Vec<u64>>,
    /// Comma-separated list of grouping presets
    #[arg(long, value_delimiter = ',')]
    presets: Option<Vec<GroupingPreset>>,
    /// Rounds to propagate after each estimate
    #[arg(long, default_value_t = 9)]
    rounds: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = BenchmarkCli::parse();
    println!("=== Riffle Shuffle Estimation Benchmark ===\n");

    let item_counts = cli.items.unwrap_or_else(|| vec![8, 26, 52]);
    let iteration_counts = cli.iterations.unwrap_or_else(|| vec![1_000, 10_000]);
    let presets = cli.presets.unwrap_or_else(|| vec![GroupingPreset::OneFive]);

    let mut all_results = Vec::new();
    for &items in &item_counts {
        for &iterations in &iteration_counts {
            for &preset in &presets {
                println!(
                    "Benchmarking n={} items, {} samples, grouping: {}",
                    items, iterations, preset
                );
                match run_benchmark(items, iterations, preset, cli.rounds) {
                    Ok(result) => {
                        print_result(&result);
                        all_results.push(result);
                    }
                    Err(e) => {
                        eprintln!("  ✗ Benchmark failed: {}", e);
                    }
                }
                println!();
            }
        }
    }

    println!("\n=== Summary Report ===\n");
    print_summary_table(&all_results);
}

fn run_benchmark(
    items: usize,
    iterations: u64,
    preset: GroupingPreset,
    rounds: u32,
) -> Result<BenchmarkResult, Box<dyn std::error::Error>> {
    let shuffler = RiffleShuffler::new(SeededSource::new(BENCH_SEED), preset.table());
    let mut estimator = TransitionEstimator::new(shuffler);

    let estimate_start = Instant::now();
    let transition = estimator.estimate(items, iterations)?;
    let estimate_time = estimate_start.elapsed();

    let propagate_start = Instant::now();
    let propagation = Propagation::new(&transition, items, rounds)?;
    let final_state = propagation
        .iter()
        .last()
        .ok_or("propagation produced no rounds")?;
    let propagate_time = propagate_start.elapsed();

    Ok(BenchmarkResult {
        items,
        iterations,
        preset,
        estimate_time,
        propagate_time,
        rounds,
        column_sum_error: transition.column_sum_error(),
        final_uniform_distance: final_state.state.uniform_distance(),
    })
}

fn print_result(result: &BenchmarkResult) {
    println!(
        "  Estimate    → {:>10.2} ms | {:>12.0} samples/s | column error {:.2e}",
        duration_ms(result.estimate_time),
        result.samples_per_second(),
        result.column_sum_error
    );
    println!(
        "  Propagate   → {:>10.2} ms | {} rounds | max |p - 1/n| {:.6}",
        duration_ms(result.propagate_time),
        result.rounds,
        result.final_uniform_distance
    );
}

fn print_summary_table(results: &[BenchmarkResult]) {
    println!(
        "{:>6} {:>10} {:>12} {:>12} {:>14} {:>12}",
        "items", "samples", "grouping", "estimate ms", "propagate ms", "|p - 1/n|"
    );
    println!("{}", "-".repeat(72));
    for result in results {
        println!(
            "{:>6} {:>10} {:>12} {:>12.2} {:>14.2} {:>12.6}",
            result.items,
            result.iterations,
            result.preset.name(),
            duration_ms(result.estimate_time),
            duration_ms(result.propagate_time),
            result.final_uniform_distance
        );
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
