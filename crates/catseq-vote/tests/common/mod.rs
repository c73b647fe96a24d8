#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use catseq_core::{
    BoundTable, CatSeqError, Category, Charset, Edge, Grammar, Matrix, NodeIdMap, NodeSlot,
    SequencePredictor, Variant,
};
use catseq_decode::decode_reference_string;

pub const NODE_CHARS: &str = "CNO";

/// Input alphabet: padding first, then node and bond characters.
pub fn input_charset() -> Charset<char> {
    Charset::from_chars(" CNO=()").unwrap()
}

/// Linear-chain grammar: each node links to the next node in the string,
/// the last node links to the dummy, and bond characters yield placeholders.
pub struct ChainGrammar {
    categories: Charset<Category>,
    variants: Vec<Variant>,
}

impl ChainGrammar {
    pub fn new(k: u32, variants: Vec<Variant>) -> Self {
        Self {
            categories: Charset::sequential(k).unwrap(),
            variants,
        }
    }
}

impl Grammar for ChainGrammar {
    fn categories(&self) -> &Charset<Category> {
        &self.categories
    }

    fn is_node_char(&self, ch: char) -> bool {
        NODE_CHARS.contains(ch)
    }

    fn bounds(&self, word: &str) -> Result<BoundTable, CatSeqError> {
        Ok(BoundTable::unconstrained(word.chars().count()))
    }

    fn mask(&self, word: &str, max_length: usize) -> Result<Matrix, CatSeqError> {
        let k = self.categories.len();
        let mut mask = Matrix::zeros(max_length, k);
        for position in 0..word.chars().count() {
            mask.row_mut(position)?.iter_mut().for_each(|value| *value = 1.0);
        }
        Ok(mask)
    }

    fn one_hot(&self, padded: &str, charset: &Charset<char>) -> Result<Matrix, CatSeqError> {
        let mut matrix = Matrix::zeros(padded.chars().count(), charset.len());
        for (position, ch) in padded.chars().enumerate() {
            let index = charset.position(&ch).ok_or_else(|| {
                CatSeqError::grammar("unknown-char", "character outside charset")
                    .with_context("char", ch)
            })?;
            matrix.row_mut(position)?[index] = 1.0;
        }
        Ok(matrix)
    }

    fn edges(&self, word: &str, nodes: &NodeIdMap) -> Result<Vec<Edge>, CatSeqError> {
        let len = word.chars().count();
        let slots = &nodes.slots()[..len];
        let mut edges = Vec::with_capacity(len);
        for (position, slot) in slots.iter().enumerate() {
            let edge = match slot {
                NodeSlot::Dummy => Edge::new(NodeSlot::Dummy, NodeSlot::Dummy),
                node => {
                    let next = slots[position + 1..]
                        .iter()
                        .copied()
                        .find(|candidate| !candidate.is_dummy())
                        .unwrap_or(NodeSlot::Dummy);
                    Edge::new(*node, next)
                }
            };
            edges.push(edge);
        }
        Ok(edges)
    }

    fn variants(
        &self,
        _word: &str,
        _nodes: &NodeIdMap,
        count: usize,
    ) -> Result<Vec<Variant>, CatSeqError> {
        Ok(self.variants.iter().take(count).cloned().collect())
    }
}

/// Returns scripted labels per decoded input string.
pub struct ScriptedPredictor {
    labels: HashMap<String, Vec<u32>>,
    k: usize,
    pub calls: AtomicUsize,
    pub masked_calls: AtomicUsize,
}

impl ScriptedPredictor {
    pub fn new(k: usize, labels: &[(&str, Vec<u32>)]) -> Self {
        Self {
            labels: labels
                .iter()
                .map(|(word, labels)| (word.to_string(), labels.clone()))
                .collect(),
            k,
            calls: AtomicUsize::new(0),
            masked_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SequencePredictor for ScriptedPredictor {
    fn predict(&self, input: &Matrix, mask: Option<&Matrix>) -> Result<Matrix, CatSeqError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if mask.is_some() {
            self.masked_calls.fetch_add(1, Ordering::SeqCst);
        }
        let word = decode_reference_string(input, &input_charset())?;
        let labels = self
            .labels
            .get(&word)
            .ok_or_else(|| CatSeqError::model("unscripted", "no labels for word"))?;
        let mut output = Matrix::zeros(input.rows(), self.k);
        for (position, &label) in labels.iter().enumerate() {
            output.row_mut(position)?[label as usize] = 0.9;
        }
        Ok(output)
    }
}

pub fn nodes(raw: &[Option<u64>]) -> NodeIdMap {
    raw.iter()
        .map(|slot| match slot {
            Some(id) => NodeSlot::node(*id),
            None => NodeSlot::Dummy,
        })
        .collect()
}

pub fn raw(labels: &[Category]) -> Vec<u32> {
    labels.iter().map(|label| label.as_raw()).collect()
}
