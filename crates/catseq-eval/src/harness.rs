use catseq_core::errors::CatSeqError;
use catseq_core::{Category, Grammar, RngHandle, SequencePredictor, StepModel};
use catseq_decode::{
    decode_autoregressive, decode_reference_labels, decode_reference_string, predict_and_decode,
};
use catseq_vote::EnsembleDecoder;
use tracing::debug;

use crate::config::{EvalConfig, EvalMode};
use crate::dataset::{Dataset, Sample, Split};
use crate::report::{accuracy, DecodeKind, DecodeOutcome, EvalReport, SampleRecord};

/// Draws samples from both splits and decodes each with the autoregressive
/// decoder, once under the grammar's bounds and once unconstrained.
pub fn evaluate_autoencoder<M, G>(
    model: &M,
    grammar: &G,
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<EvalReport, CatSeqError>
where
    M: StepModel,
    G: Grammar + ?Sized,
{
    run(dataset, config, EvalMode::Autoencoder, |_, sample, word, len| {
        let charset = &dataset.category_charset;
        let bounds = grammar.bounds(word)?;
        let bounded = decode_autoregressive(
            model,
            sample.input,
            sample.mask,
            len,
            charset,
            Some(bounds),
        )?;
        let unbounded =
            decode_autoregressive(model, sample.input, sample.mask, len, charset, None)?;
        Ok(vec![
            (DecodeKind::Bounded, bounded),
            (DecodeKind::Unbounded, unbounded),
        ])
    })
}

/// Draws samples from both splits and decodes each with one batch
/// prediction; test samples are additionally decoded through the variant
/// ensemble when `vote_on_test` is set.
pub fn evaluate_rnn<P, G>(
    model: &P,
    grammar: &G,
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<EvalReport, CatSeqError>
where
    P: SequencePredictor + ?Sized,
    G: Grammar + ?Sized,
{
    let ensemble = EnsembleDecoder::new(
        grammar,
        model,
        &dataset.input_charset,
        config.vote.clone(),
    )?;
    run(dataset, config, EvalMode::Rnn, |split, sample, word, len| {
        let mask = config.vote.use_mask.then_some(sample.mask);
        let single = predict_and_decode(model, sample.input, mask, len, &dataset.category_charset)?;
        let mut decodes = vec![(DecodeKind::SinglePass, single)];
        if split == Split::Test && config.vote_on_test {
            decodes.push((DecodeKind::Voted, ensemble.decode(word)?));
        }
        Ok(decodes)
    })
}

fn run<F>(
    dataset: &Dataset,
    config: &EvalConfig,
    mode: EvalMode,
    mut decode: F,
) -> Result<EvalReport, CatSeqError>
where
    F: FnMut(Split, Sample<'_>, &str, usize) -> Result<Vec<(DecodeKind, Vec<Category>)>, CatSeqError>,
{
    config.validate()?;
    dataset.check_shapes()?;
    let master_seed = config.seed_policy.master_seed;
    let (train_samples, test_samples) = config.sample_counts(mode);
    let mut records = Vec::new();
    for (split, count) in [(Split::Train, train_samples), (Split::Test, test_samples)] {
        let data = dataset.split(split);
        let mut rng = RngHandle::for_substream(master_seed, split.substream());
        for index in rng.sample_indices(data.len(), count) {
            let sample = data.sample(index)?;
            let word = decode_reference_string(sample.input, &dataset.input_charset)?;
            let len = word.chars().count();
            let mut reference = decode_reference_labels(sample.categories, &dataset.category_charset)?;
            reference.truncate(len);

            let decodes = decode(split, sample, &word, len)?
                .into_iter()
                .map(|(kind, labels)| DecodeOutcome {
                    kind,
                    accuracy: accuracy(&reference, &labels, len),
                    labels,
                })
                .collect();
            debug!(?split, index, word = word.as_str(), "sample evaluated");
            records.push(SampleRecord {
                split,
                index,
                word,
                reference,
                decodes,
            });
        }
    }
    Ok(EvalReport {
        seed_label: config.seed_policy.label.clone(),
        records,
    })
}
