#![deny(missing_docs)]
#![doc = "Reproducible spot-check evaluation of the decoders against reference category sequences."]

//! Samples are drawn with replacement from each split using a per-split RNG
//! substream, decoded through the configured paths, and compared position by
//! position against the dataset's reference categories.

/// YAML configuration schema and defaults.
pub mod config;
/// In-memory train/test splits.
pub mod dataset;
/// Sample drawing and decode orchestration.
pub mod harness;
/// Serializable evaluation reports.
pub mod report;

pub use config::{EvalConfig, EvalMode, SeedPolicy};
pub use dataset::{Dataset, DatasetSplit, Sample, Split};
pub use harness::{evaluate_autoencoder, evaluate_rnn};
pub use report::{accuracy, DecodeKind, DecodeOutcome, EvalReport, SampleRecord};
