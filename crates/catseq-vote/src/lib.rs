#![deny(missing_docs)]
#![doc = "Ensemble decoding over structurally equivalent string variants with per-edge majority voting."]

/// Direction-insensitive edge lookup across variants.
pub mod alignment;
/// YAML configuration schema and defaults.
pub mod config;
/// Variant fan-out, alignment, and voting.
pub mod ensemble;
/// Base string node-id assignment.
pub mod nodes;
/// Serializable per-edge vote reports.
pub mod report;
/// Insertion-ordered majority counting.
pub mod tally;

pub use alignment::EdgeIndex;
pub use config::VoteConfig;
pub use ensemble::EnsembleDecoder;
pub use nodes::base_node_map;
pub use report::{EdgeVotes, VoteReport};
pub use tally::{majority, VoteTally};
