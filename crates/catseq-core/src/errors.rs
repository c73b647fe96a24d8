//! Structured error types shared across the decoder crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`CatSeqError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (positions, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for decoding and voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CatSeqError {
    /// Tensor or table dimensions do not cover the requested decode.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Failures reported by (or about inputs to) the grammar collaborator.
    #[error("grammar error: {0}")]
    Grammar(ErrorInfo),
    /// Failures reported by the inference endpoints.
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Inconsistent evaluation datasets.
    #[error("dataset error: {0}")]
    Dataset(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl CatSeqError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CatSeqError::Shape(info)
            | CatSeqError::Grammar(info)
            | CatSeqError::Model(info)
            | CatSeqError::Config(info)
            | CatSeqError::Serde(info)
            | CatSeqError::Dataset(info) => info,
        }
    }

    /// Shorthand for a [`CatSeqError::Shape`] error.
    pub fn shape(code: impl Into<String>, message: impl Into<String>) -> Self {
        CatSeqError::Shape(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`CatSeqError::Grammar`] error.
    pub fn grammar(code: impl Into<String>, message: impl Into<String>) -> Self {
        CatSeqError::Grammar(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`CatSeqError::Model`] error.
    pub fn model(code: impl Into<String>, message: impl Into<String>) -> Self {
        CatSeqError::Model(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`CatSeqError::Config`] error.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        CatSeqError::Config(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`CatSeqError::Serde`] error built from any displayable cause.
    pub fn serde(code: impl Into<String>, err: impl ToString) -> Self {
        CatSeqError::Serde(ErrorInfo::new(code, err.to_string()))
    }

    /// Shorthand for a [`CatSeqError::Dataset`] error.
    pub fn dataset(code: impl Into<String>, message: impl Into<String>) -> Self {
        CatSeqError::Dataset(ErrorInfo::new(code, message))
    }

    /// Adds a context entry to the payload, preserving the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Attaches a remediation hint, preserving the error family.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            CatSeqError::Shape(info) => CatSeqError::Shape(f(info)),
            CatSeqError::Grammar(info) => CatSeqError::Grammar(f(info)),
            CatSeqError::Model(info) => CatSeqError::Model(f(info)),
            CatSeqError::Config(info) => CatSeqError::Config(f(info)),
            CatSeqError::Serde(info) => CatSeqError::Serde(f(info)),
            CatSeqError::Dataset(info) => CatSeqError::Dataset(f(info)),
        }
    }
}
