pub mod config;
pub mod error;
pub mod markov;
pub mod output;
pub mod random;
pub mod shuffle;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{ConfigError, ShuffleError, ShuffleResult};
pub use markov::{Propagation, RoundState, SquareMatrix, TransitionEstimator};
pub use output::OutputFormat;
pub use random::{EntropySource, RandomSource, SeededSource};
pub use shuffle::{GroupingChance, GroupingPreset, OrderGenerator, Permutation, RiffleShuffler};
pub use simulation::{RunSummary, Simulation};
