//! Per-position legal-category windows supplied by the grammar.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::errors::{CatSeqError, ErrorInfo};

/// Raw `(min, max)` category window for one decode position.
///
/// Only two shapes are meaningful: `min < max` restricts the pick to
/// `[min, max)`, and `(0, -1)` leaves the position unconstrained. Anything
/// else is degenerate and resolves to the maximum-index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundPair {
    /// Inclusive lower index.
    pub min: i64,
    /// Exclusive upper index, or `-1` together with `min == 0` for "unconstrained".
    pub max: i64,
}

/// Classified form of a [`BoundPair`] against an alphabet of size `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundWindow {
    /// Arg-max restricted to the contained index range.
    Window(Range<usize>),
    /// Arg-max over all `K` categories.
    Unconstrained,
    /// No valid pick; emit the maximum-index category.
    Degenerate,
}

impl BoundPair {
    /// Creates a bound pair.
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The `(0, -1)` pair that places no restriction on a position.
    pub const fn unconstrained() -> Self {
        Self { min: 0, max: -1 }
    }

    /// Classifies this pair for an alphabet of `k` categories.
    ///
    /// Windows are clamped to `k`; a window that is empty after clamping (or
    /// starts below zero) is degenerate.
    pub fn classify(&self, k: usize) -> BoundWindow {
        if self.min < self.max {
            if self.min < 0 {
                return BoundWindow::Degenerate;
            }
            let start = self.min as usize;
            let end = (self.max as usize).min(k);
            if start < end {
                BoundWindow::Window(start..end)
            } else {
                BoundWindow::Degenerate
            }
        } else if self.min == 0 && self.max == -1 {
            BoundWindow::Unconstrained
        } else {
            BoundWindow::Degenerate
        }
    }
}

impl Default for BoundPair {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl From<(i64, i64)> for BoundPair {
    fn from((min, max): (i64, i64)) -> Self {
        Self::new(min, max)
    }
}

/// Ordered list of [`BoundPair`]s, one per decode position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundTable {
    pairs: Vec<BoundPair>,
}

impl BoundTable {
    /// Wraps explicit per-position pairs.
    pub fn new(pairs: Vec<BoundPair>) -> Self {
        Self { pairs }
    }

    /// Table of `len` unconstrained positions.
    pub fn unconstrained(len: usize) -> Self {
        Self {
            pairs: vec![BoundPair::unconstrained(); len],
        }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the table covers no positions.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair for `position`, if covered.
    pub fn get(&self, position: usize) -> Option<BoundPair> {
        self.pairs.get(position).copied()
    }

    /// Ordered view of the pairs.
    pub fn pairs(&self) -> &[BoundPair] {
        &self.pairs
    }

    /// Fails when the table is too short to drive a decode of `target_len` steps.
    pub fn ensure_covers(&self, target_len: usize) -> Result<(), CatSeqError> {
        if self.pairs.len() < target_len {
            return Err(CatSeqError::Shape(
                ErrorInfo::new("bounds-too-short", "bound table shorter than target length")
                    .with_context("bounds", self.pairs.len())
                    .with_context("target_len", target_len),
            ));
        }
        Ok(())
    }
}

impl FromIterator<BoundPair> for BoundTable {
    fn from_iter<I: IntoIterator<Item = BoundPair>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_shapes() {
        assert_eq!(BoundPair::new(1, 3).classify(5), BoundWindow::Window(1..3));
        assert_eq!(BoundPair::new(0, -1).classify(5), BoundWindow::Unconstrained);
        assert_eq!(BoundPair::new(2, 2).classify(5), BoundWindow::Degenerate);
        assert_eq!(BoundPair::new(3, 1).classify(5), BoundWindow::Degenerate);
        assert_eq!(BoundPair::new(-1, -1).classify(5), BoundWindow::Degenerate);
    }

    #[test]
    fn windows_clamp_to_alphabet() {
        assert_eq!(BoundPair::new(2, 10).classify(4), BoundWindow::Window(2..4));
        assert_eq!(BoundPair::new(4, 10).classify(4), BoundWindow::Degenerate);
        assert_eq!(BoundPair::new(-2, 3).classify(4), BoundWindow::Degenerate);
    }

    #[test]
    fn short_table_is_rejected() {
        let table = BoundTable::unconstrained(2);
        assert!(table.ensure_covers(2).is_ok());
        let err = table.ensure_covers(3).unwrap_err();
        assert_eq!(err.info().code, "bounds-too-short");
    }
}
