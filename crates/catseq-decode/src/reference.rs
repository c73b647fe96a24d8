//! Ground-truth decoding of one-hot dataset rows.

use catseq_core::errors::CatSeqError;
use catseq_core::{Charset, Matrix};

use crate::single_pass::{argmax, decode_single_pass};

/// Recovers the string encoded by a one-hot input matrix.
///
/// Every row contributes its arg-max character; surrounding padding
/// whitespace is trimmed.
pub fn decode_reference_string(
    one_hot: &Matrix,
    charset: &Charset<char>,
) -> Result<String, CatSeqError> {
    let k = charset.len();
    let mut text = String::with_capacity(one_hot.rows());
    for (position, row) in one_hot.iter_rows().enumerate() {
        let index = argmax(&row[..k.min(row.len())]).ok_or_else(|| {
            CatSeqError::shape("empty-row", "one-hot row has no entries")
                .with_context("position", position)
        })?;
        let symbol = charset.get(index).copied().ok_or_else(|| {
            CatSeqError::shape("label-out-of-range", "arg-max outside charset")
                .with_context("index", index)
        })?;
        text.push(symbol);
    }
    Ok(text.trim().to_string())
}

/// Recovers the full label sequence of a one-hot category matrix.
pub fn decode_reference_labels<L: Clone>(
    categories: &Matrix,
    charset: &Charset<L>,
) -> Result<Vec<L>, CatSeqError> {
    decode_single_pass(categories, categories.rows(), charset)
}
