//! Wire-document schema for portable boolean queries.
//!
//! The wire form is the recursive expression tree exchanged as JSON:
//! every node carries a mandatory `rule` (the join operand), a boolean
//! `operator` and an ordered list of further `operands`. Shape rules the
//! type system cannot express are enforced by [`QueryNode::validate`].

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QueryError};

/// Comparison operator available to dropdown rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Exact match.
    Is,
    /// Negated exact match.
    IsNot,
    /// Substring match.
    Contains,
    /// Negated substring match.
    DoesNotContain,
}

/// Boolean operator joining a group's operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

impl BoolOp {
    /// Returns the operator keyword as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// Leaf rule payload, tagged by its editor kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "where", content = "data", rename_all = "lowercase")]
pub enum QueryRule {
    /// Rule edited through a comparison dropdown.
    Dropdown {
        /// Selected comparison operator.
        condition: Condition,
        /// Optional comparison value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// Free-text rule.
    Text {
        /// Optional text value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl Default for QueryRule {
    /// The payload given to freshly created rules.
    fn default() -> Self {
        QueryRule::Dropdown {
            condition: Condition::Is,
            value: None,
        }
    }
}

/// A node of the recursive expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryNode {
    /// The join operand, always present.
    pub rule: Box<QueryOperand>,
    /// Operator applied between the join and the secondary operands.
    pub operator: BoolOp,
    /// Ordered secondary operands. Order is semantically meaningful.
    pub operands: Vec<QueryOperand>,
}

/// Either a nested expression or a leaf rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOperand {
    /// Nested sub-expression.
    Node(QueryNode),
    /// Leaf rule.
    Rule(QueryRule),
}

impl QueryNode {
    /// Checks the shape rules the schema types cannot express.
    ///
    /// A nested expression appearing in operand position must itself have
    /// at least one operand, and a node whose join is a nested expression
    /// must have at least one operand. Violations report the JSON path of
    /// the offending node.
    pub fn validate(&self) -> Result<(), QueryError> {
        validate_node(self, "$")
    }
}

fn validate_node(node: &QueryNode, path: &str) -> Result<(), QueryError> {
    if let QueryOperand::Node(join) = node.rule.as_ref() {
        if node.operands.is_empty() {
            return Err(empty_operands(path));
        }
        validate_node(join, &format!("{path}.rule"))?;
    }
    for (idx, operand) in node.operands.iter().enumerate() {
        if let QueryOperand::Node(child) = operand {
            let child_path = format!("{path}.operands[{idx}]");
            if child.operands.is_empty() {
                return Err(empty_operands(&child_path));
            }
            validate_node(child, &child_path)?;
        }
    }
    Ok(())
}

fn empty_operands(path: &str) -> QueryError {
    QueryError::Validation(
        ErrorInfo::new("empty-operands", "operands must have at least one item")
            .with_context("path", path),
    )
}

/// Parses a JSON document into a query node.
///
/// Parse failures are reported as [`QueryError::Serde`]; shape rules are
/// checked separately through [`QueryNode::validate`].
pub fn query_from_json(json: &str) -> Result<QueryNode, QueryError> {
    serde_json::from_str(json)
        .map_err(|err| QueryError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
}

/// Serializes a query node to pretty-printed JSON.
pub fn query_to_json(node: &QueryNode) -> Result<String, QueryError> {
    serde_json::to_string_pretty(node)
        .map_err(|err| QueryError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}
