use crate::error::{ConfigError, ShuffleResult};
use crate::markov::matrix::SquareMatrix;
use std::iter::FusedIterator;

/// Round-by-round evolution of the position distribution under a fixed
/// transition matrix. Round 0 is the identity, round `k` is
/// `state[k - 1] x transition`, i.e. the `k`-th power of the transition.
#[derive(Debug, Clone, Copy)]
pub struct Propagation<'a> {
    transition: &'a SquareMatrix,
    rounds: u32,
}

impl<'a> Propagation<'a> {
    pub fn new(
        transition: &'a SquareMatrix,
        item_count: usize,
        rounds: u32,
    ) -> ShuffleResult<Self> {
        if transition.size() != item_count {
            return Err(ConfigError::SizeMismatch {
                expected: item_count,
                actual: transition.size(),
            }
            .into());
        }
        Ok(Propagation { transition, rounds })
    }

    /// Lazily yields rounds `0..=rounds`. Each call starts from round 0.
    pub fn iter(&self) -> RoundStates<'a> {
        RoundStates {
            transition: self.transition,
            previous: None,
            next_round: 0,
            last_round: u64::from(self.rounds),
        }
    }
}

impl<'a> IntoIterator for Propagation<'a> {
    type Item = RoundState;
    type IntoIter = RoundStates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Propagation<'a> {
    type Item = RoundState;
    type IntoIter = RoundStates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Snapshot of the distribution after `round` shuffles.
/// `state[(i, j)]` is the chance the item that started at `i` sits at `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub round: u32,
    pub state: SquareMatrix,
}

pub struct RoundStates<'a> {
    transition: &'a SquareMatrix,
    previous: Option<SquareMatrix>,
    next_round: u64,
    last_round: u64,
}

impl Iterator for RoundStates<'_> {
    type Item = RoundState;

    fn next(&mut self) -> Option<RoundState> {
        if self.next_round > self.last_round {
            return None;
        }

        let state = match self.previous.take() {
            Some(previous) => previous.matmul(self.transition),
            None => SquareMatrix::identity(self.transition.size()),
        };
        let round = self.next_round as u32;
        self.next_round += 1;
        if self.next_round <= self.last_round {
            self.previous = Some(state.clone());
        }

        Some(RoundState { round, state })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last_round + 1).saturating_sub(self.next_round) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RoundStates<'_> {}

impl FusedIterator for RoundStates<'_> {}
