//! One-shot transform from the portable wire tree into a normalized store.

use std::collections::BTreeMap;

use boolq_core::errors::QueryError;
use boolq_core::wire::query_from_json;
use boolq_core::{GroupId, IdAllocator, OperandRef, QueryNode, QueryOperand, QueryRule, RuleId};

use crate::store::{GroupRecord, QueryStore, RuleRecord};

struct FlattenState {
    allocator: IdAllocator,
    rules: BTreeMap<RuleId, RuleRecord>,
    groups: BTreeMap<GroupId, GroupRecord>,
}

impl QueryStore {
    /// Builds a normalized store from an expression tree.
    ///
    /// The tree is shape-validated first; on failure no store is
    /// produced. Identifier assignment is depth-first and pre-order: a
    /// group receives its identifier before its join and operands are
    /// processed, and operand order is preserved exactly.
    pub fn from_query(query: &QueryNode) -> Result<Self, QueryError> {
        Self::flatten(query, IdAllocator::new())
    }

    /// Builds a store with a deterministic identifier stream.
    pub fn from_query_seeded(query: &QueryNode, seed: u64) -> Result<Self, QueryError> {
        Self::flatten(query, IdAllocator::from_seed(seed))
    }

    /// Parses, validates and flattens a JSON document in one step.
    ///
    /// The returned store replaces any prior store wholesale; on failure
    /// the caller's existing store is untouched.
    pub fn import_json(json: &str) -> Result<Self, QueryError> {
        let query = query_from_json(json)?;
        Self::from_query(&query)
    }

    fn flatten(query: &QueryNode, allocator: IdAllocator) -> Result<Self, QueryError> {
        query.validate()?;
        let mut state = FlattenState {
            allocator,
            rules: BTreeMap::new(),
            groups: BTreeMap::new(),
        };
        let root = flatten_group(query, None, false, &mut state);
        Ok(Self {
            rules: state.rules,
            groups: state.groups,
            root,
            allocator: state.allocator,
        })
    }
}

fn flatten_group(
    node: &QueryNode,
    parent: Option<&GroupId>,
    primary: bool,
    state: &mut FlattenState,
) -> GroupId {
    let id = state.allocator.allocate_group();

    // The join is processed before the secondary operands so that
    // identifier assignment stays pre-order.
    let join = match node.rule.as_ref() {
        QueryOperand::Rule(rule) => OperandRef::Rule(flatten_rule(rule, &id, true, state)),
        QueryOperand::Node(nested) => OperandRef::Group(flatten_group(nested, Some(&id), true, state)),
    };

    let operands = node
        .operands
        .iter()
        .map(|operand| match operand {
            QueryOperand::Rule(rule) => OperandRef::Rule(flatten_rule(rule, &id, false, state)),
            QueryOperand::Node(nested) => {
                OperandRef::Group(flatten_group(nested, Some(&id), false, state))
            }
        })
        .collect();

    state.groups.insert(
        id.clone(),
        GroupRecord {
            id: id.clone(),
            parent: parent.cloned(),
            primary,
            op: node.operator,
            join,
            operands,
        },
    );
    id
}

fn flatten_rule(
    rule: &QueryRule,
    group: &GroupId,
    primary: bool,
    state: &mut FlattenState,
) -> RuleId {
    let id = state.allocator.allocate_rule();
    state.rules.insert(
        id.clone(),
        RuleRecord {
            id: id.clone(),
            group: group.clone(),
            primary,
            payload: rule.clone(),
        },
    );
    id
}
