//! One-shot transform from a normalized store back to the wire tree.

use boolq_core::errors::QueryError;
use boolq_core::wire::query_to_json;
use boolq_core::{GroupId, OperandRef, QueryNode, QueryOperand};

use crate::store::QueryStore;

impl QueryStore {
    /// Rebuilds the portable expression tree from the store.
    ///
    /// Store-only bookkeeping (identifiers, owner pointers, primary
    /// flags) is stripped from the emitted payloads. The result is
    /// re-validated against the wire shape before being returned, so an
    /// inconsistent store surfaces as an error rather than an invalid
    /// document.
    pub fn to_query(&self) -> Result<QueryNode, QueryError> {
        let query = self.resolve_group(&self.root)?;
        query.validate()?;
        Ok(query)
    }

    /// Reconstructs and serializes the store to pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, QueryError> {
        query_to_json(&self.to_query()?)
    }

    fn resolve_group(&self, id: &GroupId) -> Result<QueryNode, QueryError> {
        let group = self.group(id)?;
        let rule = self.resolve_operand(&group.join)?;
        let operands = group
            .operands
            .iter()
            .map(|operand| self.resolve_operand(operand))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryNode {
            rule: Box::new(rule),
            operator: group.op,
            operands,
        })
    }

    fn resolve_operand(&self, reference: &OperandRef) -> Result<QueryOperand, QueryError> {
        match reference {
            OperandRef::Rule(id) => Ok(QueryOperand::Rule(self.rule(id)?.payload.clone())),
            OperandRef::Group(id) => Ok(QueryOperand::Node(self.resolve_group(id)?)),
        }
    }
}
