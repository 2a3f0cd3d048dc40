pub mod source;

pub use source::{source_for, EntropySource, RandomSource, SeededSource};
