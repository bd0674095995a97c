//! Structured error types shared across the bayes crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`BayesError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (variable names, labels, sizes, etc.).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for network construction and estimation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BayesError {
    /// Malformed network: bad domains, parents, cycles or CPT rows. Also raised
    /// when a sampler looks up a parent combination that has no CPT row.
    #[error("network error: {0}")]
    Network(ErrorInfo),
    /// Query or evidence does not match the network, or the request is empty.
    #[error("query error: {0}")]
    Query(ErrorInfo),
    /// The estimate is undefined for the drawn samples.
    #[error("estimate error: {0}")]
    Estimate(ErrorInfo),
    /// Run configuration could not be read or is invalid.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and report I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    /// Renders `code: message`, then `[key=value, ...]` when context is
    /// present and `(hint: ...)` when a hint is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " (hint: {hint})"),
            None => Ok(()),
        }
    }
}

impl BayesError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BayesError::Network(info)
            | BayesError::Query(info)
            | BayesError::Estimate(info)
            | BayesError::Config(info)
            | BayesError::Serde(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Shorthand for a [`BayesError::Network`] error.
    pub fn network(code: impl Into<String>, message: impl Into<String>) -> Self {
        BayesError::Network(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`BayesError::Query`] error.
    pub fn query(code: impl Into<String>, message: impl Into<String>) -> Self {
        BayesError::Query(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`BayesError::Estimate`] error.
    pub fn estimate(code: impl Into<String>, message: impl Into<String>) -> Self {
        BayesError::Estimate(ErrorInfo::new(code, message))
    }

    /// Adds a context entry to the wrapped payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }

    /// Sets the hint of the wrapped payload.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.info_mut().hint = Some(hint.into());
        self
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            BayesError::Network(info)
            | BayesError::Query(info)
            | BayesError::Estimate(info)
            | BayesError::Config(info)
            | BayesError::Serde(info) => info,
        }
    }
}
