use crate::error::{ConfigError, ShuffleResult};
use crate::markov::matrix::SquareMatrix;
use crate::shuffle::OrderGenerator;

/// Monte Carlo estimate of the one-shuffle transition probabilities.
///
/// Cell `[destination][source]` counts how often the item starting at
/// `source` landed on `destination`. Each sample contributes exactly one hit
/// per source column, so every column sums to one after normalisation no
/// matter how many samples were taken.
pub struct TransitionEstimator<G: OrderGenerator> {
    generator: G,
}

impl<G: OrderGenerator> TransitionEstimator<G> {
    pub fn new(generator: G) -> Self {
        TransitionEstimator { generator }
    }

    pub fn estimate(&mut self, n: usize, iterations: u64) -> ShuffleResult<SquareMatrix> {
        self.estimate_with(n, iterations, |_| {})
    }

    /// Like [`estimate`](Self::estimate), reporting the number of completed
    /// samples after each one.
    pub fn estimate_with<F>(
        &mut self,
        n: usize,
        iterations: u64,
        mut on_sample: F,
    ) -> ShuffleResult<SquareMatrix>
    where
        F: FnMut(u64),
    {
        if iterations == 0 {
            return Err(ConfigError::ZeroIterations.into());
        }

        let mut counts = SquareMatrix::zeros(n);
        for sample in 0..iterations {
            let order = self.generator.generate_order(n)?;
            debug_assert_eq!(order.len(), n);
            for (source, &destination) in order.as_slice().iter().enumerate() {
                counts[(destination, source)] += 1.0;
            }
            on_sample(sample + 1);
        }

        counts.divide(iterations as f64);
        Ok(counts)
    }
}
