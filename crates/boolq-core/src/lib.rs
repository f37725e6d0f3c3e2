#![deny(missing_docs)]
#![doc = "Core identifier, error and wire-document types for the boolq engine."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod ids;
pub mod wire;

pub use errors::{ErrorInfo, QueryError};
pub use ids::IdAllocator;
pub use wire::{
    query_from_json, query_to_json, BoolOp, Condition, QueryNode, QueryOperand, QueryRule,
};

/// Identifier for a leaf rule within a normalized store.
///
/// Identifiers are opaque strings; nothing beyond uniqueness may be read
/// into their contents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Creates an identifier from its raw string representation.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw string representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a group within a normalized store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates an identifier from its raw string representation.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw string representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tagged reference to either a rule or a group.
///
/// Operand lists and join slots hold these references; resolving one
/// against the wrong map is a structural error, never a fallback.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum OperandRef {
    /// Reference to a leaf rule.
    Rule(RuleId),
    /// Reference to a nested group.
    Group(GroupId),
}

impl OperandRef {
    /// Returns whether the reference points at a rule.
    pub fn is_rule(&self) -> bool {
        matches!(self, OperandRef::Rule(_))
    }

    /// Returns whether the reference points at a group.
    pub fn is_group(&self) -> bool {
        matches!(self, OperandRef::Group(_))
    }
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandRef::Rule(id) => write!(f, "rule::{id}"),
            OperandRef::Group(id) => write!(f, "group::{id}"),
        }
    }
}
