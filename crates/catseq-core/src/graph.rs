//! Node-id maps, structural edges, and string variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Graph node denoted by one character position.
///
/// Non-node characters share the single `Dummy` slot, which sorts after every
/// real node and never compares equal to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSlot {
    /// A real graph node.
    Node(NodeId),
    /// Placeholder for characters that do not denote a node.
    Dummy,
}

impl NodeSlot {
    /// Shorthand for `NodeSlot::Node(NodeId::from_raw(raw))`.
    pub fn node(raw: u64) -> Self {
        NodeSlot::Node(NodeId::from_raw(raw))
    }

    /// Whether this slot is the shared dummy.
    pub fn is_dummy(&self) -> bool {
        matches!(self, NodeSlot::Dummy)
    }
}

impl fmt::Display for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSlot::Node(id) => write!(f, "{}", id.as_raw()),
            NodeSlot::Dummy => write!(f, "dummy"),
        }
    }
}

/// Per-character node assignment for one string serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIdMap {
    slots: Vec<NodeSlot>,
}

impl NodeIdMap {
    /// Wraps an explicit slot list.
    pub fn new(slots: Vec<NodeSlot>) -> Self {
        Self { slots }
    }

    /// Ordered view of the slots.
    pub fn slots(&self) -> &[NodeSlot] {
        &self.slots
    }

    /// Slot at `position`.
    pub fn get(&self, position: usize) -> Option<NodeSlot> {
        self.slots.get(position).copied()
    }

    /// Number of entries (including any padding dummy).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of entries that denote a real node.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_dummy()).count()
    }

    /// Iterates slots in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeSlot> {
        self.slots.iter()
    }
}

impl FromIterator<NodeSlot> for NodeIdMap {
    fn from_iter<I: IntoIterator<Item = NodeSlot>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered pair of node slots describing one structural connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint in this serialization's traversal order.
    pub source: NodeSlot,
    /// Second endpoint in this serialization's traversal order.
    pub target: NodeSlot,
}

impl Edge {
    /// Creates an edge between two slots.
    pub fn new(source: NodeSlot, target: NodeSlot) -> Self {
        Self { source, target }
    }

    /// Edge between two real node ids.
    pub fn between(source: u64, target: u64) -> Self {
        Self::new(NodeSlot::node(source), NodeSlot::node(target))
    }

    /// The same connection with endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.target, self.source)
    }

    /// Dummy-to-dummy placeholder carrying no structural information.
    pub fn is_placeholder(&self) -> bool {
        self.source.is_dummy() && self.target.is_dummy()
    }

    /// Direction-insensitive lookup key.
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// Canonical, order-independent identity of an [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeSlot,
    high: NodeSlot,
}

impl EdgeKey {
    /// Builds the key for the unordered pair `{a, b}`.
    pub fn new(a: NodeSlot, b: NodeSlot) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller endpoint.
    pub fn low(&self) -> NodeSlot {
        self.low
    }

    /// Larger endpoint.
    pub fn high(&self) -> NodeSlot {
        self.high
    }
}

/// Structurally equivalent rewrite of an input string with its node map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Rewritten string.
    pub word: String,
    /// Node assignment for each character of `word`.
    pub nodes: NodeIdMap,
}

impl Variant {
    /// Pairs a string with its node map.
    pub fn new(word: impl Into<String>, nodes: NodeIdMap) -> Self {
        Self {
            word: word.into(),
            nodes,
        }
    }
}
