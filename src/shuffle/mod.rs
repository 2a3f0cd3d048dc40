pub mod grouping;
pub mod permutation;
pub mod riffle;

pub use grouping::{GroupingChance, GroupingPreset};
pub use permutation::Permutation;
pub use riffle::{OrderGenerator, RiffleShuffler};
