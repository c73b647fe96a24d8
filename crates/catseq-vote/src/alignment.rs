use std::collections::HashMap;

use catseq_core::{Edge, EdgeKey};

/// Direction-insensitive lookup from edge to its first position in an edge list.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    positions: HashMap<EdgeKey, usize>,
}

impl EdgeIndex {
    /// Indexes `edges`; when an edge repeats, the earliest position wins.
    pub fn new(edges: &[Edge]) -> Self {
        let mut positions = HashMap::with_capacity(edges.len());
        for (position, edge) in edges.iter().enumerate() {
            positions.entry(edge.key()).or_insert(position);
        }
        Self { positions }
    }

    /// Position of `edge` (in either direction), if present.
    pub fn position_of(&self, edge: &Edge) -> Option<usize> {
        self.positions.get(&edge.key()).copied()
    }

    /// Number of distinct edges indexed.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no edges were indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catseq_core::NodeSlot;

    #[test]
    fn reversed_edges_resolve() {
        let index = EdgeIndex::new(&[
            Edge::between(2, 1),
            Edge::between(1, 0),
            Edge::new(NodeSlot::node(0), NodeSlot::Dummy),
        ]);
        assert_eq!(index.position_of(&Edge::between(0, 1)), Some(1));
        assert_eq!(index.position_of(&Edge::between(1, 2)), Some(0));
        assert_eq!(
            index.position_of(&Edge::new(NodeSlot::Dummy, NodeSlot::node(0))),
            Some(2)
        );
        assert_eq!(index.position_of(&Edge::between(0, 2)), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let index = EdgeIndex::new(&[
            Edge::between(0, 1),
            Edge::between(1, 0),
            Edge::between(0, 1),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.position_of(&Edge::between(1, 0)), Some(0));
    }
}
