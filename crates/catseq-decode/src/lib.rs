#![deny(missing_docs)]

//! Decoders that turn model output distributions into fixed-length category sequences.
//!
//! Two independent paths are provided. [`decode_single_pass`] resolves a full
//! probability tensor produced by one batch inference call. The
//! [`AutoregressiveDecoder`] drives a recurrent endpoint one step at a time,
//! applying the step mask row and a per-position [`BoundPair`] window before
//! feeding its own pick back as the next input.
//!
//! [`BoundPair`]: catseq_core::BoundPair

/// Stateful bound-constrained decoding.
pub mod autoregressive;
/// Ground-truth decoding of dataset rows.
pub mod reference;
/// Arg-max decoding of complete output tensors.
pub mod single_pass;

pub use autoregressive::{
    constrained_pick, decode_autoregressive, AutoregressiveDecoder, Phase, Pick,
};
pub use reference::{decode_reference_labels, decode_reference_string};
pub use single_pass::{argmax, decode_single_pass, predict_and_decode};
