//! Structured error types shared across boolq crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`QueryError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, positions, etc.).
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

/// Canonical error type for the boolq engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum QueryError {
    /// A document does not conform to the wire schema.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// An operation referenced an identifier absent from the store.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// An operation would have produced a state violating the store invariants.
    #[error("invariant violation: {0}")]
    Invariant(ErrorInfo),
    /// JSON serialization or deserialization failed.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
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

impl QueryError {
    /// Constructs a validation error with the provided code and message.
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Validation(ErrorInfo::new(code, message))
    }

    /// Constructs a not-found error with the provided code and message.
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::NotFound(ErrorInfo::new(code, message))
    }

    /// Constructs an invariant-violation error with the provided code and message.
    pub fn invariant(code: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Invariant(ErrorInfo::new(code, message))
    }

    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            QueryError::Validation(info)
            | QueryError::NotFound(info)
            | QueryError::Invariant(info)
            | QueryError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the error payload, preserving the variant.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            QueryError::Validation(info) => QueryError::Validation(info.with_context(key, value)),
            QueryError::NotFound(info) => QueryError::NotFound(info.with_context(key, value)),
            QueryError::Invariant(info) => QueryError::Invariant(info.with_context(key, value)),
            QueryError::Serde(info) => QueryError::Serde(info.with_context(key, value)),
        }
    }
}
