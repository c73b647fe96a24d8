use catseq_core::errors::{CatSeqError, ErrorInfo};
use catseq_core::{Category, Charset, Grammar, SequencePredictor, Variant};
use catseq_decode::predict_and_decode;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::alignment::EdgeIndex;
use crate::config::VoteConfig;
use crate::nodes::base_node_map;
use crate::report::{EdgeVotes, VoteReport};
use crate::tally::VoteTally;

/// Decodes several equivalent serializations of one input and votes per edge.
pub struct EnsembleDecoder<'a, G: ?Sized, P: ?Sized> {
    grammar: &'a G,
    model: &'a P,
    input_charset: &'a Charset<char>,
    config: VoteConfig,
}

impl<'a, G, P> EnsembleDecoder<'a, G, P>
where
    G: Grammar + ?Sized,
    P: SequencePredictor + ?Sized,
{
    /// Binds the collaborators and a validated configuration.
    pub fn new(
        grammar: &'a G,
        model: &'a P,
        input_charset: &'a Charset<char>,
        config: VoteConfig,
    ) -> Result<Self, CatSeqError> {
        config.validate()?;
        Ok(Self {
            grammar,
            model,
            input_charset,
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &VoteConfig {
        &self.config
    }

    /// Consensus label per base edge.
    pub fn decode(&self, word: &str) -> Result<Vec<Category>, CatSeqError> {
        Ok(self.decode_with_report(word)?.consensus())
    }

    /// Runs the full ensemble and returns the per-edge vote sets.
    pub fn decode_with_report(&self, word: &str) -> Result<VoteReport, CatSeqError> {
        let requested = self.config.effective_variants();
        let base_nodes = base_node_map(word, self.grammar);

        let mut variants = if requested > 1 {
            self.grammar.variants(word, &base_nodes, requested - 1)?
        } else {
            Vec::new()
        };
        if variants.len() < requested - 1 {
            debug!(
                requested = requested - 1,
                returned = variants.len(),
                "grammar returned fewer variants than requested"
            );
        }
        variants.truncate(requested - 1);

        let mut strings = Vec::with_capacity(variants.len() + 1);
        strings.push(Variant::new(word, base_nodes));
        strings.extend(variants);

        let decoded = self.decode_all(&strings)?;
        let mut edge_lists = Vec::with_capacity(strings.len());
        for variant in &strings {
            edge_lists.push(self.grammar.edges(&variant.word, &variant.nodes)?);
        }
        let indexes: Vec<EdgeIndex> = edge_lists.iter().map(|edges| EdgeIndex::new(edges)).collect();

        let base_labels = &decoded[0];
        let mut entries = Vec::with_capacity(edge_lists[0].len());
        for (position, edge) in edge_lists[0].iter().enumerate() {
            let mut votes = vec![label_at(base_labels, position, 0)?];
            if !edge.is_placeholder() {
                for variant in 1..strings.len() {
                    match indexes[variant].position_of(edge) {
                        Some(matched) => votes.push(label_at(&decoded[variant], matched, variant)?),
                        None => trace!(variant, %edge, "edge absent from variant"),
                    }
                }
            }
            let tally: VoteTally<Category> = votes.iter().copied().collect();
            let consensus = tally.winner().copied().ok_or_else(|| {
                CatSeqError::shape("empty-vote-set", "edge collected no votes")
                    .with_context("position", position)
            })?;
            entries.push(EdgeVotes {
                position,
                edge: *edge,
                votes,
                consensus,
            });
        }

        Ok(VoteReport {
            word: word.to_string(),
            variants_requested: requested,
            variant_words: strings[1..].iter().map(|variant| variant.word.clone()).collect(),
            edges: entries,
        })
    }

    fn decode_all(&self, strings: &[Variant]) -> Result<Vec<Vec<Category>>, CatSeqError> {
        if self.config.concurrency <= 1 || strings.len() <= 1 {
            return strings
                .iter()
                .enumerate()
                .map(|(index, variant)| self.decode_string(index, &variant.word))
                .collect();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .build()
            .map_err(|err| CatSeqError::config("thread_pool", err.to_string()))?;
        pool.install(|| {
            strings
                .par_iter()
                .enumerate()
                .map(|(index, variant)| self.decode_string(index, &variant.word))
                .collect()
        })
    }

    fn decode_string(&self, index: usize, word: &str) -> Result<Vec<Category>, CatSeqError> {
        let len = word.chars().count();
        let max_length = self.config.max_length;
        if len > max_length {
            return Err(CatSeqError::Grammar(
                ErrorInfo::new("input-too-long", "string exceeds the configured max length")
                    .with_context("variant", index)
                    .with_context("len", len)
                    .with_context("max_length", max_length),
            ));
        }
        let padded = format!("{word:<max_length$}");
        let input = self.grammar.one_hot(&padded, self.input_charset)?;
        let mask = if self.config.use_mask {
            Some(self.grammar.mask(word, max_length)?)
        } else {
            None
        };
        let labels = predict_and_decode(
            self.model,
            &input,
            mask.as_ref(),
            len,
            self.grammar.categories(),
        )?;
        trace!(variant = index, word, "variant decoded");
        Ok(labels)
    }
}

fn label_at(labels: &[Category], position: usize, variant: usize) -> Result<Category, CatSeqError> {
    labels.get(position).copied().ok_or_else(|| {
        CatSeqError::Shape(
            ErrorInfo::new("edge-beyond-decode", "edge position has no decoded label")
                .with_context("variant", variant)
                .with_context("position", position)
                .with_context("decoded", labels.len()),
        )
    })
}
