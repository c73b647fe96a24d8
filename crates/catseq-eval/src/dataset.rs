use catseq_core::errors::{CatSeqError, ErrorInfo};
use catseq_core::{Category, Charset, Matrix};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which half of a dataset a sample comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    /// Training samples.
    Train,
    /// Held-out samples.
    Test,
}

impl Split {
    /// RNG substream used when drawing samples from this split.
    pub fn substream(&self) -> u64 {
        match self {
            Split::Train => 0,
            Split::Test => 1,
        }
    }
}

/// One split of one-hot inputs, one-hot reference categories, and masks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit {
    /// Padded one-hot input strings (`max_length x |input charset|`).
    pub inputs: Vec<Matrix>,
    /// One-hot reference categories (`max_length x K`).
    pub categories: Vec<Matrix>,
    /// Grammar masks (`max_length x K`).
    pub masks: Vec<Matrix>,
}

/// Borrowed view of one sample.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    /// One-hot input string.
    pub input: &'a Matrix,
    /// One-hot reference categories.
    pub categories: &'a Matrix,
    /// Grammar mask.
    pub mask: &'a Matrix,
}

impl DatasetSplit {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the split holds no samples.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Sample at `index`.
    pub fn sample(&self, index: usize) -> Result<Sample<'_>, CatSeqError> {
        match (
            self.inputs.get(index),
            self.categories.get(index),
            self.masks.get(index),
        ) {
            (Some(input), Some(categories), Some(mask)) => Ok(Sample {
                input,
                categories,
                mask,
            }),
            _ => Err(CatSeqError::Dataset(
                ErrorInfo::new("sample-out-of-range", "sample index outside split")
                    .with_context("index", index)
                    .with_context("len", self.len()),
            )),
        }
    }

    fn check(&self, split: Split) -> Result<usize, CatSeqError> {
        if self.categories.len() != self.inputs.len() || self.masks.len() != self.inputs.len() {
            return Err(CatSeqError::Dataset(
                ErrorInfo::new("split-length-mismatch", "inputs, categories and masks differ in count")
                    .with_context("split", format!("{split:?}"))
                    .with_context("inputs", self.inputs.len())
                    .with_context("categories", self.categories.len())
                    .with_context("masks", self.masks.len()),
            ));
        }
        let mut issues = 0;
        for (index, ((input, categories), mask)) in self
            .inputs
            .iter()
            .zip(&self.categories)
            .zip(&self.masks)
            .enumerate()
        {
            let categories_vs_mask =
                categories.rows() != mask.rows() || categories.cols() != mask.cols();
            if categories_vs_mask || input.rows() != categories.rows() {
                warn!(
                    ?split,
                    index,
                    input_rows = input.rows(),
                    category_shape = ?(categories.rows(), categories.cols()),
                    mask_shape = ?(mask.rows(), mask.cols()),
                    "incompatible sample dimensions"
                );
                issues += 1;
            }
        }
        Ok(issues)
    }
}

/// Train/test splits with their alphabets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Training split.
    pub train: DatasetSplit,
    /// Test split.
    pub test: DatasetSplit,
    /// Input string alphabet.
    pub input_charset: Charset<char>,
    /// Output category alphabet.
    pub category_charset: Charset<Category>,
}

impl Dataset {
    /// Returns the requested split.
    pub fn split(&self, split: Split) -> &DatasetSplit {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }

    /// Validates per-split counts and reports the number of samples with
    /// inconsistent per-sample shapes.
    ///
    /// Count mismatches are fatal. Shape inconsistencies are only logged, the
    /// affected samples may still decode.
    pub fn check_shapes(&self) -> Result<usize, CatSeqError> {
        Ok(self.train.check(Split::Train)? + self.test.check(Split::Test)?)
    }
}
