use std::error::Error as _;
use std::io::{self, Write};
use riffle_markov::markov::{Propagation, SquareMatrix, TransitionEstimator};
use riffle_markov::output::{open_sink, render_text_block};
use riffle_markov::random::{EntropySource, RandomSource, SeededSource};
use riffle_markov::shuffle::{GroupingChance, GroupingPreset, OrderGenerator, RiffleShuffler};
use riffle_markov::{
    ConfigError, OutputFormat, ShuffleError, ShuffleResult, Simulation, SimulationConfig,
};

fn seeded_config(item_count: usize, iterations: u64, rounds: u32, seed: u64) -> SimulationConfig {
    SimulationConfig {
        item_count,
        sample_iterations: iterations,
        rounds,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

fn run_to_bytes(config: SimulationConfig) -> (Vec<u8>, riffle_markov::RunSummary) {
    let simulation = Simulation::new(config).unwrap();
    let mut buffer = Vec::new();
    let summary = simulation.run(&mut buffer).unwrap();
    (buffer, summary)
}

/// Replays a fixed list of values, then zeros.
struct ScriptedSource {
    values: Vec<u64>,
    next: usize,
}

impl RandomSource for ScriptedSource {
    fn next_u64(&mut self) -> ShuffleResult<u64> {
        let value = self.values.get(self.next).copied().unwrap_or(0);
        self.next += 1;
        Ok(value)
    }

    fn seed(&mut self, _seed: u64) {}
}

/// Entropy supply that is never available.
struct UnavailableSource;

impl RandomSource for UnavailableSource {
    fn next_u64(&mut self) -> ShuffleResult<u64> {
        Err(ShuffleError::EntropySource(getrandom::Error::UNSUPPORTED))
    }

    fn seed(&mut self, _seed: u64) {}
}

/// Sink whose device is always full.
struct FullDiskWriter;

impl Write for FullDiskWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn grouping_without_positive_chunk_is_rejected_before_sampling() {
    assert!(matches!(
        GroupingChance::new(vec![0]),
        Err(ConfigError::NoPositiveChunk(_))
    ));
    assert!(matches!(
        GroupingChance::new(Vec::new()),
        Err(ConfigError::EmptyGroupingChance)
    ));

    for item_count in [1, 2, 52] {
        let config = SimulationConfig {
            grouping_chance: Some(vec![0]),
            ..seeded_config(item_count, 10, 1, 1)
        };
        let err = Simulation::new(config).err().expect("zero-only table must be rejected");
        assert!(
            matches!(
                err,
                ShuffleError::Configuration(ConfigError::NoPositiveChunk(_))
            ),
            "unexpected error for {item_count} items: {err}"
        );
    }
}

#[test]
fn invalid_counts_are_configuration_errors() {
    let zero_items = Simulation::new(seeded_config(0, 10, 1, 1)).err();
    assert!(matches!(
        zero_items,
        Some(ShuffleError::Configuration(ConfigError::ZeroItemCount))
    ));

    let zero_iterations = Simulation::new(seeded_config(4, 0, 1, 1)).err();
    assert!(matches!(
        zero_iterations,
        Some(ShuffleError::Configuration(ConfigError::ZeroIterations))
    ));

    let shuffler = RiffleShuffler::new(SeededSource::new(1), GroupingChance::default());
    let estimate = TransitionEstimator::new(shuffler).estimate(4, 0);
    assert!(matches!(
        estimate,
        Err(ShuffleError::Configuration(ConfigError::ZeroIterations))
    ));
}

#[test]
fn two_items_with_single_chunks_converge_to_even_odds() {
    let grouping = GroupingChance::new(vec![1]).unwrap();
    let shuffler = RiffleShuffler::new(SeededSource::new(2024), grouping);
    let transition = TransitionEstimator::new(shuffler).estimate(2, 2000).unwrap();

    for destination in 0..2 {
        for source in 0..2 {
            let p = transition[(destination, source)];
            assert!((p - 0.5).abs() <= 0.05, "cell [{destination}][{source}] = {p}");
        }
    }
}

#[test]
fn chunk_of_two_deals_each_half_whole() {
    let grouping = GroupingChance::new(vec![2]).unwrap();
    let mut shuffler = RiffleShuffler::new(SeededSource::new(9), grouping);
    assert_eq!(shuffler.combine(&[0, 1], &[2, 3]).unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(shuffler.combine(&[2, 3], &[0, 1]).unwrap(), vec![2, 3, 0, 1]);
}

#[test]
fn oversized_chunk_takes_only_what_remains() {
    let grouping = GroupingChance::new(vec![5]).unwrap();
    let mut shuffler = RiffleShuffler::new(SeededSource::new(3), grouping);
    assert_eq!(
        shuffler.combine(&[0, 1, 2], &[3, 4, 5, 6]).unwrap(),
        vec![0, 1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn zero_items_give_empty_results_without_error() {
    let mut shuffler = RiffleShuffler::new(SeededSource::new(5), GroupingChance::default());
    assert!(shuffler.generate_order(0).unwrap().is_empty());

    let transition = TransitionEstimator::new(shuffler).estimate(0, 10).unwrap();
    assert_eq!(transition.size(), 0);

    let propagation = Propagation::new(&transition, 0, 3).unwrap();
    let states: Vec<_> = propagation.iter().collect();
    assert_eq!(states.len(), 4);
    assert!(states.iter().all(|snapshot| snapshot.state.size() == 0));
}

#[test]
fn round_zero_is_identity_and_iteration_restarts() {
    let transition = SquareMatrix::from_rows(vec![vec![0.25, 0.75], vec![0.75, 0.25]]).unwrap();
    let propagation = Propagation::new(&transition, 2, 0).unwrap();
    let states: Vec<_> = propagation.iter().collect();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].state, SquareMatrix::identity(2));

    let propagation = Propagation::new(&transition, 2, 3).unwrap();
    assert_eq!(propagation.iter().len(), 4);
    let first: Vec<_> = propagation.iter().collect();
    let second: Vec<_> = propagation.iter().collect();
    assert_eq!(first, second);
    assert_eq!(first[1].state, transition);
}

#[test]
fn mismatched_matrix_size_is_rejected() {
    let transition = SquareMatrix::identity(3);
    let err = Propagation::new(&transition, 4, 2).err();
    assert!(matches!(
        err,
        Some(ShuffleError::Configuration(ConfigError::SizeMismatch {
            expected: 4,
            actual: 3
        }))
    ));
}

#[test]
fn seeded_runs_are_byte_identical() {
    let (first, first_summary) = run_to_bytes(seeded_config(8, 500, 4, 77));
    let (second, second_summary) = run_to_bytes(seeded_config(8, 500, 4, 77));
    assert_eq!(first, second);
    assert_eq!(first_summary.digest, second_summary.digest);
    assert_eq!(first_summary.bytes_written, first.len() as u64);
    assert_eq!(first_summary.rounds_written, 5);

    let (other, _) = run_to_bytes(seeded_config(8, 500, 4, 78));
    assert_ne!(first, other);
}

#[test]
fn text_output_matches_round_block_layout() {
    let (bytes, _) = run_to_bytes(seeded_config(1, 3, 1, 11));
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text, "0\n1.000000000,\n\n\n1\n1.000000000,\n\n\n");

    let block = render_text_block(2, &SquareMatrix::identity(2));
    assert_eq!(block, "2\n1.000000000,0.000000000,\n0.000000000,1.000000000,\n\n\n");
}

#[test]
fn json_output_has_one_record_per_round() {
    let config = SimulationConfig {
        format: OutputFormat::Json,
        ..seeded_config(4, 200, 3, 5)
    };
    let (bytes, summary) = run_to_bytes(config);
    let text = String::from_utf8(bytes).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 4);
    assert_eq!(summary.rounds_written, 4);
    for (round, record) in records.iter().enumerate() {
        assert_eq!(record["round"], round as u64);
        assert_eq!(record["size"], 4);
        assert_eq!(record["rows"].as_array().unwrap().len(), 4);
    }
}

#[test]
fn file_sink_receives_the_same_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    let config = SimulationConfig {
        output: Some(path.clone()),
        ..seeded_config(6, 300, 2, 42)
    };

    let simulation = Simulation::new(config.clone()).unwrap();
    let summary = simulation.run_to_output().unwrap();

    let (expected, expected_summary) = run_to_bytes(config);
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, expected);
    assert_eq!(summary.digest, expected_summary.digest);
}

#[test]
fn config_file_values_and_presets_resolve() {
    let config = SimulationConfig::from_toml_str(
        r#"
        item_count = 10
        sample_iterations = 250
        rounds = 3
        grouping_preset = "distributed"
        seed = 99
        format = "json"
        "#,
    )
    .unwrap();
    assert_eq!(config.item_count, 10);
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(
        config.grouping().unwrap().sizes(),
        GroupingPreset::Distributed.sizes()
    );

    let explicit = SimulationConfig::from_toml_str("grouping_chance = [3]").unwrap();
    assert_eq!(explicit.grouping().unwrap().sizes(), &[3]);
    assert_eq!(explicit.item_count, 52);

    let unknown = SimulationConfig::from_toml_str("grouping_preset = \"perfect\"").unwrap();
    assert!(matches!(unknown.validate(), Err(ConfigError::UnknownPreset(_))));

    assert!(matches!(
        SimulationConfig::from_toml_str("grouping_chance = [0, 0]"),
        Ok(config) if matches!(config.validate(), Err(ConfigError::NoPositiveChunk(_)))
    ));
    assert!(matches!(
        SimulationConfig::from_toml_str("cards = 52"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn seeded_source_is_reproducible_and_reseedable() {
    let mut a = SeededSource::new(123);
    let mut b = SeededSource::new(123);
    let first: Vec<u64> = (0..8).map(|_| a.next_u64().unwrap()).collect();
    let second: Vec<u64> = (0..8).map(|_| b.next_u64().unwrap()).collect();
    assert_eq!(first, second);

    a.seed(123);
    let replay: Vec<u64> = (0..8).map(|_| a.next_u64().unwrap()).collect();
    assert_eq!(first, replay);
}

#[test]
fn entropy_source_ignores_seed() {
    let mut source = EntropySource::new();
    source.seed(1);
    let values: Vec<u64> = (0..4).map(|_| source.next_u64().unwrap()).collect();
    assert_eq!(values.len(), 4);
    for _ in 0..64 {
        assert!(source.below(7).unwrap() < 7);
    }
}

#[test]
fn bounded_draws_reject_the_biased_low_zone() {
    // 2^64 mod 3 == 1, so a raw 0 is redrawn.
    let mut source = ScriptedSource {
        values: vec![0, 5],
        next: 0,
    };
    assert_eq!(source.below(3).unwrap(), 2);
    assert_eq!(source.next, 2);
}

#[test]
fn unavailable_entropy_aborts_estimation() {
    let shuffler = RiffleShuffler::new(UnavailableSource, GroupingChance::default());
    let err = TransitionEstimator::new(shuffler)
        .estimate(4, 3)
        .err()
        .expect("estimation must fail without entropy");
    assert!(matches!(err, ShuffleError::EntropySource(_)), "unexpected error: {err}");
    assert!(err.source().is_some(), "entropy cause missing from the error chain");
}

#[test]
fn failed_sampling_never_creates_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    let config = SimulationConfig {
        output: Some(path.clone()),
        ..seeded_config(6, 50, 2, 1)
    };

    let simulation = Simulation::new(config).unwrap();
    let result = simulation.run_with(UnavailableSource, |config| {
        open_sink(config.output.as_deref())
    });
    assert!(matches!(result, Err(ShuffleError::EntropySource(_))));
    assert!(!path.exists(), "output file created before sampling finished");
}

#[test]
fn sink_write_failure_aborts_the_run() {
    let simulation = Simulation::new(seeded_config(4, 20, 2, 8)).unwrap();
    let result = simulation.run(FullDiskWriter);
    match result {
        Err(ShuffleError::SinkWrite(err)) => assert_eq!(err.to_string(), "disk full"),
        other => panic!("expected a sink write failure, got {other:?}"),
    }
}

#[test]
fn only_square_rows_build_a_matrix() {
    assert!(SquareMatrix::from_rows(vec![vec![1.0]; 3]).is_none());
    assert!(SquareMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5]]).is_none());

    let matrix = SquareMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
    assert_eq!(matrix.size(), 2);
    assert_eq!(matrix.column_sums(), vec![1.0, 1.0]);
}
