use crate::error::ShuffleResult;
use crate::random::RandomSource;
use crate::shuffle::grouping::GroupingChance;
use crate::shuffle::permutation::Permutation;

/// Produces one sampled permutation per call.
pub trait OrderGenerator {
    fn generate_order(&mut self, n: usize) -> ShuffleResult<Permutation>;
}

/// Split-and-interleave shuffle: cut the deck at the midpoint, pick which
/// half leads with a fair coin, then alternate chunks drawn from the
/// grouping table until both halves are dealt.
pub struct RiffleShuffler<R: RandomSource> {
    source: R,
    grouping: GroupingChance,
}

impl<R: RandomSource> RiffleShuffler<R> {
    pub fn new(source: R, grouping: GroupingChance) -> Self {
        RiffleShuffler { source, grouping }
    }

    /// Interleaves `first` and `second`, returning the dealt sequence of
    /// original indices. Both halves keep their internal order.
    pub fn combine(&mut self, first: &[usize], second: &[usize]) -> ShuffleResult<Vec<usize>> {
        let mut dealt = Vec::with_capacity(first.len() + second.len());
        let mut first_taken = 0;
        let mut second_taken = 0;

        while first_taken < first.len() || second_taken < second.len() {
            if first_taken < first.len() {
                first_taken = self.take_chunk(first, first_taken, &mut dealt)?;
            }
            if second_taken < second.len() {
                second_taken = self.take_chunk(second, second_taken, &mut dealt)?;
            }
        }

        Ok(dealt)
    }

    fn take_chunk(
        &mut self,
        side: &[usize],
        taken: usize,
        dealt: &mut Vec<usize>,
    ) -> ShuffleResult<usize> {
        // Uniform over table slots, so repeated entries weigh more.
        let slot = self.source.below(self.grouping.len())?;
        let chunk = self.grouping.get(slot);
        let end = taken.saturating_add(chunk).min(side.len());
        dealt.extend_from_slice(&side[taken..end]);
        Ok(end)
    }
}

impl<R: RandomSource> OrderGenerator for RiffleShuffler<R> {
    fn generate_order(&mut self, n: usize) -> ShuffleResult<Permutation> {
        let deck: Vec<usize> = (0..n).collect();
        let (left, right) = deck.split_at(n / 2);

        let dealt = if self.source.below(2)? == 0 {
            self.combine(left, right)?
        } else {
            self.combine(right, left)?
        };

        Ok(Permutation::from_slot_order(&dealt))
    }
}
