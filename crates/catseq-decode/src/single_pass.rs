use catseq_core::errors::{CatSeqError, ErrorInfo};
use catseq_core::{Charset, Matrix, SequencePredictor};

/// Index of the first maximal entry, or `None` for an empty slice.
///
/// Ties resolve to the lowest index. `NaN` entries are never picked unless
/// every entry is `NaN`, in which case index 0 is returned.
pub fn argmax(values: &[f32]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, current)) => value > current,
        };
        if better {
            best = Some((index, value));
        }
    }
    Some(best.map(|(index, _)| index).unwrap_or(0))
}

/// Resolves a full output distribution into `target_len` labels by per-position arg-max.
///
/// Only the first `K = charset.len()` entries of each row are scored. The
/// matrix must cover `target_len` rows; a shorter matrix is a shape error, never
/// a truncated result.
pub fn decode_single_pass<L: Clone>(
    probabilities: &Matrix,
    target_len: usize,
    charset: &Charset<L>,
) -> Result<Vec<L>, CatSeqError> {
    if probabilities.rows() < target_len {
        return Err(CatSeqError::Shape(
            ErrorInfo::new(
                "tensor-too-short",
                "probability tensor has fewer positions than the target length",
            )
            .with_context("rows", probabilities.rows())
            .with_context("target_len", target_len),
        ));
    }
    let k = charset.len();
    if target_len > 0 && probabilities.cols() < k {
        return Err(CatSeqError::Shape(
            ErrorInfo::new("row-too-narrow", "probability rows are narrower than the charset")
                .with_context("cols", probabilities.cols())
                .with_context("charset", k),
        ));
    }
    let mut decoded = Vec::with_capacity(target_len);
    for position in 0..target_len {
        let row = probabilities.row(position)?;
        // k >= 1 and the row holds at least k entries, so a pick always exists.
        let index = argmax(&row[..k]).unwrap_or(0);
        let label = charset.get(index).cloned().ok_or_else(|| {
            CatSeqError::shape("label-out-of-range", "arg-max outside charset")
                .with_context("index", index)
        })?;
        decoded.push(label);
    }
    Ok(decoded)
}

/// Runs one batch prediction and decodes it with [`decode_single_pass`].
pub fn predict_and_decode<P, L>(
    model: &P,
    input: &Matrix,
    mask: Option<&Matrix>,
    target_len: usize,
    charset: &Charset<L>,
) -> Result<Vec<L>, CatSeqError>
where
    P: SequencePredictor + ?Sized,
    L: Clone,
{
    let probabilities = model.predict(input, mask)?;
    decode_single_pass(&probabilities, target_len, charset)
}
