mod common;

use catseq_core::{
    BoundTable, CatSeqError, Category, Charset, Edge, Grammar, Matrix, NodeIdMap, NodeSlot,
    Variant,
};
use catseq_decode::predict_and_decode;
use catseq_vote::{EnsembleDecoder, VoteConfig};
use common::{input_charset, nodes, raw, ChainGrammar, ScriptedPredictor};

fn reversed_cco() -> Variant {
    Variant::new("OCC", nodes(&[Some(2), Some(1), Some(0)]))
}

fn config(num_variants: usize) -> VoteConfig {
    VoteConfig {
        max_length: 8,
        num_variants,
        ..VoteConfig::default()
    }
}

fn cco_predictor() -> ScriptedPredictor {
    ScriptedPredictor::new(4, &[("CCO", vec![1, 2, 3]), ("OCC", vec![2, 0, 3])])
}

#[test]
fn single_variant_matches_direct_decode() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();

    let direct = {
        let padded = format!("{:<8}", "CCO");
        let input = catseq_core::Grammar::one_hot(&grammar, &padded, &charset).unwrap();
        let mask = catseq_core::Grammar::mask(&grammar, "CCO", 8).unwrap();
        predict_and_decode(
            &predictor,
            &input,
            Some(&mask),
            3,
            catseq_core::Grammar::categories(&grammar),
        )
        .unwrap()
    };

    for requested in [0, 1] {
        let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(requested)).unwrap();
        let report = decoder.decode_with_report("CCO").unwrap();
        assert_eq!(report.consensus(), direct);
        assert!(report.variant_words.is_empty());
        assert!(report.edges.iter().all(|entry| entry.votes.len() == 1));
    }
}

#[test]
fn reversed_edges_contribute_votes() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(2)).unwrap();

    let report = decoder.decode_with_report("CCO").unwrap();
    assert_eq!(report.edges[0].edge, Edge::between(0, 1));
    assert_eq!(raw(&report.edges[0].votes), vec![1, 0]);
    assert_eq!(raw(&report.edges[1].votes), vec![2, 2]);
    // (2, dummy) has no counterpart in the reversed string.
    assert_eq!(raw(&report.edges[2].votes), vec![3]);
    // Tie between base and variant goes to the base vote.
    assert_eq!(raw(&report.consensus()), vec![1, 2, 3]);
    assert_eq!(predictor.calls(), 2);
}

#[test]
fn majority_overrides_base_vote() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco(), reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(3)).unwrap();

    let consensus = decoder.decode("CCO").unwrap();
    assert_eq!(raw(&consensus), vec![0, 2, 3]);
}

#[test]
fn placeholder_edges_keep_only_the_base_vote() {
    let variant = Variant::new("O=C", nodes(&[Some(1), None, Some(0)]));
    let grammar = ChainGrammar::new(4, vec![variant.clone(), variant]);
    let predictor =
        ScriptedPredictor::new(4, &[("C=O", vec![1, 1, 2]), ("O=C", vec![0, 3, 2])]);
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(3)).unwrap();

    let report = decoder.decode_with_report("C=O").unwrap();
    assert_eq!(
        report.edges[1].edge,
        Edge::new(NodeSlot::Dummy, NodeSlot::Dummy)
    );
    assert_eq!(raw(&report.edges[1].votes), vec![1]);
    assert_eq!(raw(&report.consensus()), vec![0, 1, 2]);
    assert_eq!(report.consensus().len(), 3);
}

#[test]
fn parallel_fan_out_matches_sequential() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco(), reversed_cco(), reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();

    let sequential = EnsembleDecoder::new(&grammar, &predictor, &charset, config(4))
        .unwrap()
        .decode_with_report("CCO")
        .unwrap();
    let parallel_config = VoteConfig {
        concurrency: 4,
        ..config(4)
    };
    let parallel = EnsembleDecoder::new(&grammar, &predictor, &charset, parallel_config)
        .unwrap()
        .decode_with_report("CCO")
        .unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(sequential.digest().unwrap(), parallel.digest().unwrap());
}

#[test]
fn fewer_variants_than_requested_still_vote() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(10)).unwrap();

    let report = decoder.decode_with_report("CCO").unwrap();
    assert_eq!(report.variants_requested, 10);
    assert_eq!(report.variant_words, vec!["OCC".to_string()]);
    assert_eq!(report.strings_decoded(), 2);
}

#[test]
fn overlong_input_is_rejected() {
    let grammar = ChainGrammar::new(4, Vec::new());
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(
        &grammar,
        &predictor,
        &charset,
        VoteConfig {
            max_length: 2,
            ..config(1)
        },
    )
    .unwrap();
    let err = decoder.decode("CCO").unwrap_err();
    assert_eq!(err.info().code, "input-too-long");
    assert_eq!(predictor.calls(), 0);
}

#[test]
fn unmasked_prediction_skips_the_mask() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(
        &grammar,
        &predictor,
        &charset,
        VoteConfig {
            use_mask: false,
            ..config(2)
        },
    )
    .unwrap();
    decoder.decode("CCO").unwrap();
    assert_eq!(predictor.calls(), 2);
    assert_eq!(
        predictor
            .masked_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[test]
fn report_serializes_canonically() {
    let grammar = ChainGrammar::new(4, vec![reversed_cco()]);
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(2)).unwrap();
    let report = decoder.decode_with_report("CCO").unwrap();

    let bytes = report.to_canonical_json().unwrap();
    let back: catseq_vote::VoteReport = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back, report);
    assert_eq!(report.digest().unwrap().len(), 64);
    assert_eq!(report.consensus()[0], Category::from_raw(1));
}

/// Prepends placeholder edges to the edge list of one string.
struct PaddedEdges {
    inner: ChainGrammar,
    word: &'static str,
    extra: usize,
}

impl Grammar for PaddedEdges {
    fn categories(&self) -> &Charset<Category> {
        self.inner.categories()
    }

    fn is_node_char(&self, ch: char) -> bool {
        self.inner.is_node_char(ch)
    }

    fn bounds(&self, word: &str) -> Result<BoundTable, CatSeqError> {
        self.inner.bounds(word)
    }

    fn mask(&self, word: &str, max_length: usize) -> Result<Matrix, CatSeqError> {
        self.inner.mask(word, max_length)
    }

    fn one_hot(&self, padded: &str, charset: &Charset<char>) -> Result<Matrix, CatSeqError> {
        self.inner.one_hot(padded, charset)
    }

    fn edges(&self, word: &str, nodes: &NodeIdMap) -> Result<Vec<Edge>, CatSeqError> {
        let mut edges = self.inner.edges(word, nodes)?;
        if word == self.word {
            let padding = vec![Edge::new(NodeSlot::Dummy, NodeSlot::Dummy); self.extra];
            edges.splice(0..0, padding);
        }
        Ok(edges)
    }

    fn variants(
        &self,
        word: &str,
        nodes: &NodeIdMap,
        count: usize,
    ) -> Result<Vec<Variant>, CatSeqError> {
        self.inner.variants(word, nodes, count)
    }
}

#[test]
fn base_edges_beyond_decode_are_rejected() {
    let grammar = PaddedEdges {
        inner: ChainGrammar::new(4, vec![reversed_cco()]),
        word: "CCO",
        extra: 1,
    };
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(2)).unwrap();

    let err = decoder.decode("CCO").unwrap_err();
    assert!(matches!(err, CatSeqError::Shape(_)));
    assert_eq!(err.info().code, "edge-beyond-decode");
    assert_eq!(err.info().context["variant"], "0");
    assert_eq!(err.info().context["position"], "3");
}

#[test]
fn variant_edges_beyond_decode_are_rejected() {
    let grammar = PaddedEdges {
        inner: ChainGrammar::new(4, vec![reversed_cco()]),
        word: "OCC",
        extra: 2,
    };
    let predictor = cco_predictor();
    let charset = input_charset();
    let decoder = EnsembleDecoder::new(&grammar, &predictor, &charset, config(2)).unwrap();

    let err = decoder.decode("CCO").unwrap_err();
    assert_eq!(err.info().code, "edge-beyond-decode");
    assert_eq!(err.info().context["variant"], "1");
    assert_eq!(err.info().context["decoded"], "3");
}
