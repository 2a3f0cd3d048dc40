use crate::config::SimulationConfig;
use crate::error::ShuffleResult;
use crate::markov::{Propagation, SquareMatrix, TransitionEstimator};
use crate::output::{open_sink, write_round, DigestWriter};
use crate::random::{source_for, RandomSource};
use crate::shuffle::{GroupingChance, RiffleShuffler};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::{self, Write};
use std::time::Instant;

/// What a finished run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rounds_written: u32,
    pub bytes_written: u64,
    pub digest: blake3::Hash,
    pub final_uniform_distance: f64,
}

impl RunSummary {
    pub fn digest_hex(&self) -> String {
        self.digest.to_hex().to_string()
    }
}

/// A validated configuration ready to sample and propagate.
pub struct Simulation {
    config: SimulationConfig,
    grouping: GroupingChance,
    show_progress: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> ShuffleResult<Self> {
        config.validate()?;
        let grouping = config.grouping()?;
        if grouping.zero_entries() > 0 {
            warn!(
                "grouping table {:?} has {} zero entries; some interleave passes will take nothing",
                grouping.sizes(),
                grouping.zero_entries()
            );
        }
        Ok(Simulation {
            config,
            grouping,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Samples the one-shuffle transition matrix from the configured source.
    pub fn estimate(&self) -> ShuffleResult<SquareMatrix> {
        match self.config.seed {
            Some(seed) => info!("using seeded source (seed {seed})"),
            None => info!("using os entropy source"),
        }
        self.estimate_from(source_for(self.config.seed))
    }

    pub fn estimate_from<R: RandomSource>(&self, source: R) -> ShuffleResult<SquareMatrix> {
        let n = self.config.item_count;
        let iterations = self.config.sample_iterations;
        info!("sampling {iterations} shuffles of {n} items");

        let shuffler = RiffleShuffler::new(source, self.grouping.clone());
        let mut estimator = TransitionEstimator::new(shuffler);

        let progress = self.progress_bar(iterations);
        let started = Instant::now();
        let result = estimator.estimate_with(n, iterations, |done| {
            if done % 256 == 0 || done == iterations {
                progress.set_position(done);
            }
        });
        progress.finish_and_clear();
        let transition = result?;

        info!(
            "estimated transition matrix in {:.2} ms (column sum error {:.3e})",
            started.elapsed().as_secs_f64() * 1000.0,
            transition.column_sum_error()
        );
        Ok(transition)
    }

    /// Estimates once, then writes every round from 0 to `rounds` to `sink`.
    pub fn run<W: Write>(&self, sink: W) -> ShuffleResult<RunSummary> {
        let transition = self.estimate()?;
        self.write_rounds(&transition, sink)
    }

    /// Writes to the configured output (file or stdout). The file is only
    /// created once sampling has succeeded.
    pub fn run_to_output(&self) -> ShuffleResult<RunSummary> {
        self.run_with(source_for(self.config.seed), |config| {
            open_sink(config.output.as_deref())
        })
    }

    /// Samples from `source`, then opens the sink and writes every round.
    /// `open` is not called when sampling fails.
    pub fn run_with<R, W, F>(&self, source: R, open: F) -> ShuffleResult<RunSummary>
    where
        R: RandomSource,
        W: Write,
        F: FnOnce(&SimulationConfig) -> io::Result<W>,
    {
        let transition = self.estimate_from(source)?;
        let sink = open(&self.config)?;
        self.write_rounds(&transition, sink)
    }

    /// Propagates an already estimated matrix and writes each round.
    pub fn write_rounds<W: Write>(
        &self,
        transition: &SquareMatrix,
        sink: W,
    ) -> ShuffleResult<RunSummary> {
        let propagation = Propagation::new(transition, self.config.item_count, self.config.rounds)?;
        let mut writer = DigestWriter::new(sink);
        let mut rounds_written = 0;
        let mut final_uniform_distance = 0.0;

        for snapshot in &propagation {
            write_round(&mut writer, self.config.format, snapshot.round, &snapshot.state)?;
            final_uniform_distance = snapshot.state.uniform_distance();
            debug!(
                "round {}: max deviation from uniform {:.6}",
                snapshot.round, final_uniform_distance
            );
            rounds_written += 1;
        }

        let (_, digest, bytes_written) = writer.finish()?;
        info!("wrote {rounds_written} rounds ({bytes_written} bytes)");
        Ok(RunSummary {
            rounds_written,
            bytes_written,
            digest,
            final_uniform_distance,
        })
    }

    fn progress_bar(&self, iterations: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(iterations);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} sampling [{bar:40}] {pos}/{len} ({eta})")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}
