pub mod estimator;
pub mod matrix;
pub mod propagate;

pub use estimator::TransitionEstimator;
pub use matrix::SquareMatrix;
pub use propagate::{Propagation, RoundState, RoundStates};
