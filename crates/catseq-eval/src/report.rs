use std::collections::BTreeMap;

use catseq_core::errors::CatSeqError;
use catseq_core::Category;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dataset::Split;

/// Decode path that produced a label sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeKind {
    /// Autoregressive decode with grammar bounds.
    Bounded,
    /// Autoregressive decode without bounds.
    Unbounded,
    /// Single batch prediction resolved by arg-max.
    SinglePass,
    /// Variant ensemble with per-edge voting.
    Voted,
}

/// One decode of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    /// Decode path.
    pub kind: DecodeKind,
    /// Decoded labels.
    pub labels: Vec<Category>,
    /// Fraction of positions matching the reference.
    pub accuracy: f64,
}

/// Reference and decodes for one drawn sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Split the sample was drawn from.
    pub split: Split,
    /// Index within the split.
    pub index: usize,
    /// Decoded input string.
    pub word: String,
    /// Reference labels truncated to the string length.
    pub reference: Vec<Category>,
    /// Decodes in the order they were run.
    pub decodes: Vec<DecodeOutcome>,
}

/// Collected sample records with per-kind mean accuracy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvalReport {
    /// Seed label copied from the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_label: Option<String>,
    /// Per-sample records in draw order (train first).
    pub records: Vec<SampleRecord>,
}

impl EvalReport {
    /// Mean accuracy per decode kind over all records.
    pub fn mean_accuracy(&self) -> BTreeMap<DecodeKind, f64> {
        let mut sums: BTreeMap<DecodeKind, (f64, usize)> = BTreeMap::new();
        for outcome in self.records.iter().flat_map(|record| &record.decodes) {
            let entry = sums.entry(outcome.kind).or_insert((0.0, 0));
            entry.0 += outcome.accuracy;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(kind, (sum, count))| (kind, sum / count as f64))
            .collect()
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

/// Fraction of the first `len` positions where `decoded` matches `reference`.
///
/// An empty comparison counts as fully accurate.
pub fn accuracy(reference: &[Category], decoded: &[Category], len: usize) -> f64 {
    if len == 0 {
        return 1.0;
    }
    let hits = (0..len)
        .filter(|&position| {
            matches!(
                (reference.get(position), decoded.get(position)),
                (Some(a), Some(b)) if a == b
            )
        })
        .count();
    hits as f64 / len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[u32]) -> Vec<Category> {
        raw.iter().copied().map(Category::from_raw).collect()
    }

    #[test]
    fn accuracy_counts_matching_positions() {
        assert_eq!(accuracy(&labels(&[1, 2, 3, 4]), &labels(&[1, 0, 3, 4]), 4), 0.75);
        assert_eq!(accuracy(&labels(&[1]), &labels(&[1, 2]), 2), 0.5);
        assert_eq!(accuracy(&[], &[], 0), 1.0);
    }

    #[test]
    fn mean_accuracy_groups_by_kind() {
        let outcome = |kind, accuracy| DecodeOutcome {
            kind,
            labels: Vec::new(),
            accuracy,
        };
        let report = EvalReport {
            seed_label: None,
            records: vec![SampleRecord {
                split: Split::Test,
                index: 0,
                word: "C".into(),
                reference: labels(&[0]),
                decodes: vec![
                    outcome(DecodeKind::SinglePass, 1.0),
                    outcome(DecodeKind::SinglePass, 0.5),
                    outcome(DecodeKind::Voted, 0.25),
                ],
            }],
        };
        let means = report.mean_accuracy();
        assert_eq!(means[&DecodeKind::SinglePass], 0.75);
        assert_eq!(means[&DecodeKind::Voted], 0.25);
        assert!(!means.contains_key(&DecodeKind::Bounded));
    }
}
