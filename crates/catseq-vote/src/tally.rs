use std::hash::Hash;

use indexmap::IndexMap;

/// Insertion-ordered vote counter.
///
/// The winner is the most frequent label; among equally frequent labels the
/// one seen first wins.
#[derive(Debug, Clone)]
pub struct VoteTally<L> {
    counts: IndexMap<L, usize>,
    total: usize,
}

impl<L: Hash + Eq + Clone> VoteTally<L> {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self {
            counts: IndexMap::new(),
            total: 0,
        }
    }

    /// Records one vote.
    pub fn push(&mut self, label: L) {
        *self.counts.entry(label).or_insert(0) += 1;
        self.total += 1;
    }

    /// Total number of votes recorded.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Vote count for `label`.
    pub fn count(&self, label: &L) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Most frequent label, or `None` when no vote was cast.
    pub fn winner(&self) -> Option<&L> {
        let mut best: Option<(&L, usize)> = None;
        for (label, &count) in &self.counts {
            match best {
                Some((_, current)) if count <= current => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
    }
}

impl<L: Hash + Eq + Clone> Default for VoteTally<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Hash + Eq + Clone> FromIterator<L> for VoteTally<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut tally = Self::new();
        for label in iter {
            tally.push(label);
        }
        tally
    }
}

/// Majority label of `votes` with first-seen tie-breaking.
pub fn majority<L: Hash + Eq + Clone>(votes: &[L]) -> Option<L> {
    votes
        .iter()
        .cloned()
        .collect::<VoteTally<L>>()
        .winner()
        .cloned()
}
