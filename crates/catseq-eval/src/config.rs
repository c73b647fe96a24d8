use std::fs;
use std::path::Path;

use catseq_core::errors::CatSeqError;
use catseq_vote::VoteConfig;
use serde::{Deserialize, Serialize};

/// Which decoder an evaluation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalMode {
    /// Stateful step-by-step decoding, bounded and unbounded.
    Autoencoder,
    /// Single batch prediction, plus the variant ensemble on test samples.
    Rnn,
}

impl EvalMode {
    /// Train and test sample counts used when the config leaves them unset.
    pub fn default_samples(&self) -> (usize, usize) {
        match self {
            EvalMode::Autoencoder => (4, 8),
            EvalMode::Rnn => (2, 2),
        }
    }
}

/// YAML-configurable parameters for a sample evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Samples drawn (with replacement) from the training split; unset uses
    /// the mode default.
    #[serde(default)]
    pub train_samples: Option<usize>,
    /// Samples drawn (with replacement) from the test split; unset uses the
    /// mode default.
    #[serde(default)]
    pub test_samples: Option<usize>,
    /// Whether test samples are also decoded through the variant ensemble.
    #[serde(default = "default_vote_on_test")]
    pub vote_on_test: bool,
    /// Ensemble and padding settings.
    #[serde(default = "default_vote")]
    pub vote: VoteConfig,
    /// Master seed used for sample selection.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_vote_on_test() -> bool {
    true
}

fn default_vote() -> VoteConfig {
    VoteConfig {
        num_variants: 32,
        ..VoteConfig::default()
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            train_samples: None,
            test_samples: None,
            vote_on_test: default_vote_on_test(),
            vote: default_vote(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl EvalConfig {
    /// Resolved `(train, test)` sample counts for `mode`.
    pub fn sample_counts(&self, mode: EvalMode) -> (usize, usize) {
        let (train, test) = mode.default_samples();
        (
            self.train_samples.unwrap_or(train),
            self.test_samples.unwrap_or(test),
        )
    }

    /// Rejects values that cannot drive an evaluation.
    pub fn validate(&self) -> Result<(), CatSeqError> {
        self.vote.validate()
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatSeqError> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|err| CatSeqError::serde("yaml_deserialize", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads, parses, and validates a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, CatSeqError> {
        let text = fs::read_to_string(path).map_err(|err| {
            CatSeqError::serde("config_read", err).with_context("path", path.display())
        })?;
        Self::from_yaml_str(&text)
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed; each split draws from its own substream.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in reports.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x5EED_CA75_0000_0001_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}
