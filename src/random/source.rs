use crate::error::{ShuffleError, ShuffleResult};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// Stream of uniformly distributed 64-bit values consumed by the shuffler.
pub trait RandomSource {
    fn next_u64(&mut self) -> ShuffleResult<u64>;

    /// Reseeds the generator. Sources without a seed accept and ignore it.
    fn seed(&mut self, seed: u64);

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: usize) -> ShuffleResult<usize> {
        debug_assert!(bound > 0, "below() needs a non-empty range");
        let bound = bound as u64;
        // 2^64 mod bound; values under it would bias the low residues.
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let value = self.next_u64()?;
            if value >= threshold {
                return Ok((value % bound) as usize);
            }
        }
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next_u64(&mut self) -> ShuffleResult<u64> {
        (**self).next_u64()
    }

    fn seed(&mut self, seed: u64) {
        (**self).seed(seed)
    }

    fn below(&mut self, bound: usize) -> ShuffleResult<usize> {
        (**self).below(bound)
    }
}

/// Deterministic source: identical seeds yield identical streams.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        SeededSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_u64(&mut self) -> ShuffleResult<u64> {
        Ok(self.rng.next_u64())
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn below(&mut self, bound: usize) -> ShuffleResult<usize> {
        Ok(self.rng.random_range(0..bound))
    }
}

/// Reads every value from the operating system's entropy supply.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySource;

impl EntropySource {
    pub fn new() -> Self {
        EntropySource
    }
}

impl RandomSource for EntropySource {
    fn next_u64(&mut self) -> ShuffleResult<u64> {
        let mut bytes = [0u8; 8];
        getrandom::fill(&mut bytes).map_err(ShuffleError::EntropySource)?;
        Ok(u64::from_be_bytes(bytes))
    }

    fn seed(&mut self, _seed: u64) {}
}

/// Seeded source when a seed is configured, the OS supply otherwise.
pub fn source_for(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededSource::new(seed)),
        None => Box::new(EntropySource::new()),
    }
}
