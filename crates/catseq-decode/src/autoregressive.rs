//! Step-by-step decoding against a stateful recurrent endpoint.

use catseq_core::errors::{CatSeqError, ErrorInfo};
use catseq_core::{BoundPair, BoundTable, BoundWindow, Charset, Matrix, StepModel};
use tracing::{debug, trace};

use crate::single_pass::argmax;

/// Lifecycle of an [`AutoregressiveDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input not yet encoded.
    Start,
    /// Ready to emit the next label.
    Step,
    /// Emitted length reached the target length.
    Stop,
}

/// Category index chosen for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Index into the category charset.
    pub index: usize,
    /// Whether the pick came from the degenerate-bound fallback.
    pub fallback: bool,
}

/// Resolves one step's distribution under `bound` for an alphabet of size `k`.
///
/// `[min, max)` windows restrict the arg-max, `(0, -1)` leaves it
/// unrestricted, and every other pair yields index `k - 1` without reading
/// the distribution.
pub fn constrained_pick(
    distribution: &[f32],
    bound: BoundPair,
    k: usize,
) -> Result<Pick, CatSeqError> {
    if k == 0 {
        return Err(CatSeqError::shape("empty-alphabet", "cannot pick from zero categories"));
    }
    let window = bound.classify(k);
    if window != BoundWindow::Degenerate && distribution.len() < k {
        return Err(CatSeqError::Shape(
            ErrorInfo::new("distribution-too-narrow", "step distribution narrower than charset")
                .with_context("len", distribution.len())
                .with_context("charset", k),
        ));
    }
    let pick = match window {
        BoundWindow::Window(range) => {
            let offset = argmax(&distribution[range.clone()]).unwrap_or(0);
            Pick {
                index: range.start + offset,
                fallback: false,
            }
        }
        BoundWindow::Unconstrained => Pick {
            index: argmax(&distribution[..k]).unwrap_or(0),
            fallback: false,
        },
        BoundWindow::Degenerate => Pick {
            index: k - 1,
            fallback: true,
        },
    };
    Ok(pick)
}

/// State machine feeding each emitted label back into a recurrent decoder.
///
/// Termination is purely length driven: exactly `target_len` labels are
/// emitted, no end-of-sequence symbol is consulted.
pub struct AutoregressiveDecoder<'a, M: StepModel, L> {
    model: &'a M,
    charset: &'a Charset<L>,
    mask: &'a Matrix,
    bounds: BoundTable,
    target_len: usize,
    state: Option<M::State>,
    previous: Vec<f32>,
    decoded: Vec<L>,
}

impl<'a, M: StepModel, L: Clone> AutoregressiveDecoder<'a, M, L> {
    /// Prepares a decode of `target_len` steps.
    ///
    /// Without a bound table every position is unconstrained. The mask and any
    /// supplied bounds must cover `target_len` positions.
    pub fn new(
        model: &'a M,
        charset: &'a Charset<L>,
        mask: &'a Matrix,
        target_len: usize,
        bounds: Option<BoundTable>,
    ) -> Result<Self, CatSeqError> {
        if mask.rows() < target_len {
            return Err(CatSeqError::Shape(
                ErrorInfo::new("mask-too-short", "mask has fewer positions than the target length")
                    .with_context("rows", mask.rows())
                    .with_context("target_len", target_len),
            ));
        }
        let bounds = bounds.unwrap_or_else(|| BoundTable::unconstrained(target_len));
        bounds.ensure_covers(target_len)?;
        Ok(Self {
            model,
            charset,
            mask,
            bounds,
            target_len,
            state: None,
            previous: vec![0.0; charset.len()],
            decoded: Vec::with_capacity(target_len),
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.decoded.len() >= self.target_len {
            Phase::Stop
        } else if self.state.is_none() {
            Phase::Start
        } else {
            Phase::Step
        }
    }

    /// Whether all `target_len` labels have been emitted.
    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Stop
    }

    /// Labels emitted so far.
    pub fn decoded(&self) -> &[L] {
        &self.decoded
    }

    /// Encodes `input` into the initial recurrent state.
    pub fn start(&mut self, input: &Matrix) -> Result<(), CatSeqError> {
        if self.phase() != Phase::Start {
            return Err(CatSeqError::model(
                "already-started",
                "decoder input was already encoded",
            ));
        }
        self.state = Some(self.model.encode(input, self.mask)?);
        Ok(())
    }

    /// Emits the next label.
    pub fn step(&mut self) -> Result<&L, CatSeqError> {
        let position = self.decoded.len();
        let state = match self.phase() {
            Phase::Step => self.state.take().ok_or_else(|| {
                CatSeqError::model("missing-state", "recurrent state unavailable")
            })?,
            Phase::Start => {
                return Err(CatSeqError::model(
                    "not-started",
                    "call start() before stepping the decoder",
                ))
            }
            Phase::Stop => {
                return Err(CatSeqError::model(
                    "decode-complete",
                    "target length already reached",
                )
                .with_context("target_len", self.target_len))
            }
        };

        let mask_row = self.mask.row(position)?;
        let output = self.model.step(&self.previous, mask_row, state)?;
        let bound = self.bounds.get(position).unwrap_or_default();
        let pick = constrained_pick(&output.distribution, bound, self.charset.len())?;
        if pick.fallback {
            debug!(
                position,
                min = bound.min,
                max = bound.max,
                "degenerate bound, emitting maximum-index category"
            );
        }
        let label = self.charset.get(pick.index).cloned().ok_or_else(|| {
            CatSeqError::shape("label-out-of-range", "pick outside charset")
                .with_context("index", pick.index)
        })?;
        trace!(position, index = pick.index, "autoregressive step");

        self.previous.iter_mut().for_each(|value| *value = 0.0);
        self.previous[pick.index] = 1.0;
        self.state = Some(output.state);
        self.decoded.push(label);
        self.decoded
            .last()
            .ok_or_else(|| CatSeqError::model("missing-label", "no label emitted"))
    }

    /// Consumes the decoder and returns the emitted labels.
    pub fn finish(self) -> Vec<L> {
        self.decoded
    }
}

/// Decodes `target_len` labels from `input`, feeding each pick back as the next input.
///
/// A zero target length returns an empty sequence without touching the model.
pub fn decode_autoregressive<M, L>(
    model: &M,
    input: &Matrix,
    mask: &Matrix,
    target_len: usize,
    charset: &Charset<L>,
    bounds: Option<BoundTable>,
) -> Result<Vec<L>, CatSeqError>
where
    M: StepModel,
    L: Clone,
{
    let mut decoder = AutoregressiveDecoder::new(model, charset, mask, target_len, bounds)?;
    if decoder.is_complete() {
        return Ok(decoder.finish());
    }
    decoder.start(input)?;
    while !decoder.is_complete() {
        decoder.step()?;
    }
    Ok(decoder.finish())
}
