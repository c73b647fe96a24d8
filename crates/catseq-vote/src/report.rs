use catseq_core::errors::CatSeqError;
use catseq_core::{Category, Edge};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Votes collected for one edge of the base string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeVotes {
    /// Position of the edge in the base edge list.
    pub position: usize,
    /// Edge as ordered in the base string.
    pub edge: Edge,
    /// Base vote first, then one vote per variant containing the edge.
    pub votes: Vec<Category>,
    /// Majority label.
    pub consensus: Category,
}

/// Outcome of an ensemble decode, aligned with the base string's edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReport {
    /// Base input string.
    pub word: String,
    /// Strings requested, base included.
    pub variants_requested: usize,
    /// Alternative serializations actually decoded (base excluded).
    pub variant_words: Vec<String>,
    /// Per-edge vote sets in base edge order.
    pub edges: Vec<EdgeVotes>,
}

impl VoteReport {
    /// Consensus label per base edge.
    pub fn consensus(&self) -> Vec<Category> {
        self.edges.iter().map(|entry| entry.consensus).collect()
    }

    /// Number of strings decoded, base included.
    pub fn strings_decoded(&self) -> usize {
        self.variant_words.len() + 1
    }

    /// Deterministic JSON encoding (object keys sorted).
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, CatSeqError> {
        let value =
            serde_json::to_value(self).map_err(|err| CatSeqError::serde("json_serialize", err))?;
        serde_json::to_vec(&value).map_err(|err| CatSeqError::serde("json_write", err))
    }

    /// SHA-256 of the canonical JSON, hex encoded.
    pub fn digest(&self) -> Result<String, CatSeqError> {
        let bytes = self.to_canonical_json()?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }
}
