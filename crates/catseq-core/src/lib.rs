#![deny(missing_docs)]
#![doc = "Core types and collaborator contracts for decoding line-notation strings into per-edge category sequences."]

use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod errors;
pub mod graph;
pub mod rng;
mod types;

pub use bounds::{BoundPair, BoundTable, BoundWindow};
pub use errors::{CatSeqError, ErrorInfo};
pub use graph::{Edge, EdgeKey, NodeIdMap, NodeSlot, Variant};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{Category, Charset, Matrix};

/// Identifier for a graph node denoted by a string character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Contract for the grammar/graph collaborator.
///
/// Implementations own the string grammar: which characters denote nodes, how
/// a string maps to structural edges, which equivalent serializations exist,
/// and how strings are encoded for the model.
pub trait Grammar: Send + Sync {
    /// Ordered output category alphabet.
    fn categories(&self) -> &Charset<Category>;

    /// Whether `ch` denotes a graph node.
    fn is_node_char(&self, ch: char) -> bool;

    /// Legal-category window for every position of `word`.
    fn bounds(&self, word: &str) -> Result<BoundTable, CatSeqError>;

    /// Per-position category mask of shape `max_length x K`.
    fn mask(&self, word: &str, max_length: usize) -> Result<Matrix, CatSeqError>;

    /// One-hot encoding of an already padded string over `charset`.
    fn one_hot(&self, padded: &str, charset: &Charset<char>) -> Result<Matrix, CatSeqError>;

    /// Edge list of `word`, positionally aligned with its decode output.
    fn edges(&self, word: &str, nodes: &NodeIdMap) -> Result<Vec<Edge>, CatSeqError>;

    /// Up to `count` structurally equivalent rewrites of `word`.
    fn variants(
        &self,
        word: &str,
        nodes: &NodeIdMap,
        count: usize,
    ) -> Result<Vec<Variant>, CatSeqError>;
}

/// Batch inference endpoint returning the full output distribution in one call.
pub trait SequencePredictor: Send + Sync {
    /// Predicts a `positions x K` probability matrix for one encoded input.
    fn predict(&self, input: &Matrix, mask: Option<&Matrix>) -> Result<Matrix, CatSeqError>;
}

/// Output of one recurrent decoder step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput<S> {
    /// Distribution over the `K` categories for this step.
    pub distribution: Vec<f32>,
    /// Recurrent state to carry into the next step.
    pub state: S,
}

/// Stateful encoder/decoder endpoints driven one step at a time.
pub trait StepModel {
    /// Recurrent state threaded between steps.
    type State;

    /// Encodes the input sequence into the initial recurrent state.
    fn encode(&self, input: &Matrix, mask: &Matrix) -> Result<Self::State, CatSeqError>;

    /// Runs one decoder step from the previous one-hot label, the step mask row, and the state.
    fn step(
        &self,
        previous: &[f32],
        mask_row: &[f32],
        state: Self::State,
    ) -> Result<StepOutput<Self::State>, CatSeqError>;
}
