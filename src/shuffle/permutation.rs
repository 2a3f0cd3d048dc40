/// `Permutation[i]` is the position the item that started at `i` ends up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Permutation((0..n).collect())
    }

    /// Builds the permutation from a dealt order, where `slots[i]` is the
    /// original index of the item now sitting in slot `i`. `slots` must
    /// itself be an ordering of `0..slots.len()`.
    pub(crate) fn from_slot_order(slots: &[usize]) -> Self {
        let mut destinations = vec![0; slots.len()];
        for (slot, &original) in slots.iter().enumerate() {
            destinations[original] = slot;
        }
        Permutation(destinations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// True when every position in `0..len` is hit exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &destination in &self.0 {
            match seen.get_mut(destination) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}
