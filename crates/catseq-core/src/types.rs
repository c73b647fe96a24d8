use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CatSeqError, ErrorInfo};

/// Integer-coded structural edge category emitted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(u32);

impl Category {
    /// Creates a category from its raw integer code.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer code.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable ordered alphabet mapping positions to labels.
///
/// Ordering only matters for index lookups: position `i` of a model output row
/// scores the label stored at index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "CharsetRepr<L>",
    bound(deserialize = "L: Deserialize<'de>")
)]
pub struct Charset<L> {
    symbols: Vec<L>,
}

#[derive(Deserialize)]
struct CharsetRepr<L> {
    symbols: Vec<L>,
}

impl<L> TryFrom<CharsetRepr<L>> for Charset<L> {
    type Error = CatSeqError;

    fn try_from(repr: CharsetRepr<L>) -> Result<Self, Self::Error> {
        Self::new(repr.symbols)
    }
}

impl<L> Charset<L> {
    /// Builds a charset from an ordered list of labels. The list must not be empty.
    pub fn new(symbols: Vec<L>) -> Result<Self, CatSeqError> {
        if symbols.is_empty() {
            return Err(CatSeqError::config(
                "empty-charset",
                "a charset requires at least one label",
            ));
        }
        Ok(Self { symbols })
    }

    /// Number of labels `K` in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; construction and deserialization reject empty alphabets.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the label stored at `index`.
    pub fn get(&self, index: usize) -> Option<&L> {
        self.symbols.get(index)
    }

    /// Index of the maximum-index category, used as the degenerate-bound fallback.
    pub fn last_index(&self) -> usize {
        self.symbols.len() - 1
    }

    /// Label at [`Charset::last_index`].
    pub fn last(&self) -> &L {
        &self.symbols[self.last_index()]
    }

    /// Ordered view of the labels.
    pub fn symbols(&self) -> &[L] {
        &self.symbols
    }

    /// Iterates labels in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.symbols.iter()
    }
}

impl<L: PartialEq> Charset<L> {
    /// Returns the index of `label`, if present.
    pub fn position(&self, label: &L) -> Option<usize> {
        self.symbols.iter().position(|symbol| symbol == label)
    }
}

impl Charset<Category> {
    /// Builds the `0..k` category alphabet used by the grammar.
    pub fn sequential(k: u32) -> Result<Self, CatSeqError> {
        Self::new((0..k).map(Category::from_raw).collect())
    }
}

impl Charset<char> {
    /// Builds a character alphabet from the characters of `text`, in order.
    pub fn from_chars(text: &str) -> Result<Self, CatSeqError> {
        Self::new(text.chars().collect())
    }
}

/// Dense row-major `f32` matrix used for one-hot inputs, masks, and output distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a flat row-major buffer.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, CatSeqError> {
        if data.len() != rows * cols {
            return Err(CatSeqError::Shape(
                ErrorInfo::new("flat-length", "buffer length does not match rows * cols")
                    .with_context("rows", rows)
                    .with_context("cols", cols)
                    .with_context("len", data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from equally sized rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, CatSeqError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CatSeqError::Shape(
                    ErrorInfo::new("ragged-rows", "all rows must have the same width")
                        .with_context("row", index)
                        .with_context("expected", cols)
                        .with_context("actual", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of positions (rows).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of each row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `index`, failing loudly when it is out of range.
    pub fn row(&self, index: usize) -> Result<&[f32], CatSeqError> {
        if index >= self.rows {
            return Err(row_out_of_range(index, self.rows));
        }
        let start = index * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Mutable access to row `index`.
    pub fn row_mut(&mut self, index: usize) -> Result<&mut [f32], CatSeqError> {
        if index >= self.rows {
            return Err(row_out_of_range(index, self.rows));
        }
        let start = index * self.cols;
        Ok(&mut self.data[start..start + self.cols])
    }

    /// Iterates rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact panics on zero; a zero-width matrix still has `rows` empty rows.
        (0..self.rows).map(move |index| {
            let start = index * self.cols;
            &self.data[start..start + self.cols]
        })
    }

    /// Flat row-major view of the data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

fn row_out_of_range(index: usize, rows: usize) -> CatSeqError {
    CatSeqError::Shape(
        ErrorInfo::new("row-out-of-range", "requested position exceeds tensor rows")
            .with_context("index", index)
            .with_context("rows", rows),
    )
}
