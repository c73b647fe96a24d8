use std::fs;
use std::path::Path;

use catseq_core::errors::{CatSeqError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing an ensemble decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteConfig {
    /// Padded input length expected by the model; longer strings are rejected.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Total number of strings decoded (base plus variants). Values <= 1 disable voting.
    #[serde(default = "default_num_variants")]
    pub num_variants: usize,
    /// Worker threads used for per-variant decodes (1 runs them inline).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Whether the grammar mask is passed to the batch predictor.
    #[serde(default = "default_use_mask")]
    pub use_mask: bool,
}

fn default_max_length() -> usize {
    120
}

fn default_num_variants() -> usize {
    10
}

fn default_concurrency() -> usize {
    1
}

fn default_use_mask() -> bool {
    true
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            num_variants: default_num_variants(),
            concurrency: default_concurrency(),
            use_mask: default_use_mask(),
        }
    }
}

impl VoteConfig {
    /// Number of strings actually decoded, base included.
    pub fn effective_variants(&self) -> usize {
        self.num_variants.max(1)
    }

    /// Rejects values that cannot drive a decode.
    pub fn validate(&self) -> Result<(), CatSeqError> {
        if self.max_length == 0 {
            return Err(CatSeqError::Config(
                ErrorInfo::new("max-length-zero", "max_length must be positive")
                    .with_hint("set max_length to the model's padded input length"),
            ));
        }
        if self.concurrency == 0 {
            return Err(CatSeqError::config(
                "concurrency-zero",
                "concurrency must be at least 1",
            ));
        }
        Ok(())
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

    /// Serializes the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String, CatSeqError> {
        serde_yaml::to_string(self).map_err(|err| CatSeqError::serde("yaml_serialize", err))
    }
}
