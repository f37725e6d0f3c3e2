use std::collections::{BTreeMap, BTreeSet};

use boolq_core::errors::QueryError;
use boolq_core::{BoolOp, GroupId, IdAllocator, OperandRef, QueryRule, RuleId};
use serde::{Deserialize, Serialize};

/// Stored leaf rule together with its ownership bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Identifier of this rule.
    pub id: RuleId,
    /// Identifier of the owning group.
    pub group: GroupId,
    /// Whether this rule is currently the join of its owning group.
    pub primary: bool,
    /// Kind-specific payload carried to and from the wire form.
    pub payload: QueryRule,
}

/// Stored group together with its ownership bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Identifier of this group.
    pub id: GroupId,
    /// Identifier of the parent group; absent only for the root.
    pub parent: Option<GroupId>,
    /// Whether this group is itself the join of its parent.
    pub primary: bool,
    /// Operator applied between the join and the secondary operands.
    pub op: BoolOp,
    /// The one mandatory operand, never absent.
    pub join: OperandRef,
    /// Ordered secondary operands, each distinct from the join.
    pub operands: Vec<OperandRef>,
}

/// Normalized, identifier-keyed representation of a boolean query.
///
/// Two flat maps plus a root group reference. The root is typed as a
/// [`GroupId`], so "the root is always a group" holds structurally rather
/// than by runtime check. All remaining invariants are verified by
/// [`QueryStore::check_invariants`].
#[derive(Debug, Clone)]
pub struct QueryStore {
    pub(crate) rules: BTreeMap<RuleId, RuleRecord>,
    pub(crate) groups: BTreeMap<GroupId, GroupRecord>,
    pub(crate) root: GroupId,
    pub(crate) allocator: IdAllocator,
}

impl QueryStore {
    /// Returns the identifier of the root group.
    pub fn root_id(&self) -> &GroupId {
        &self.root
    }

    /// Returns the number of stored rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the number of stored groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Iterates the stored rules in identifier order.
    pub fn rules(&self) -> impl Iterator<Item = &RuleRecord> {
        self.rules.values()
    }

    /// Iterates the stored groups in identifier order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values()
    }

    /// Looks up a rule record.
    pub fn rule(&self, id: &RuleId) -> Result<&RuleRecord, QueryError> {
        self.rules.get(id).ok_or_else(|| {
            QueryError::not_found("unknown-rule", "rule does not exist").with_context("rule", id)
        })
    }

    /// Looks up a group record.
    pub fn group(&self, id: &GroupId) -> Result<&GroupRecord, QueryError> {
        self.groups.get(id).ok_or_else(|| {
            QueryError::not_found("unknown-group", "group does not exist").with_context("group", id)
        })
    }

    pub(crate) fn rule_mut(&mut self, id: &RuleId) -> Result<&mut RuleRecord, QueryError> {
        self.rules.get_mut(id).ok_or_else(|| {
            QueryError::not_found("unknown-rule", "rule does not exist").with_context("rule", id)
        })
    }

    pub(crate) fn group_mut(&mut self, id: &GroupId) -> Result<&mut GroupRecord, QueryError> {
        self.groups.get_mut(id).ok_or_else(|| {
            QueryError::not_found("unknown-group", "group does not exist").with_context("group", id)
        })
    }

    /// Replaces a rule's kind-specific payload.
    pub fn set_rule_payload(&mut self, id: &RuleId, payload: QueryRule) -> Result<(), QueryError> {
        self.rule_mut(id)?.payload = payload;
        Ok(())
    }

    /// Replaces a group's boolean operator.
    pub fn set_operator(&mut self, id: &GroupId, op: BoolOp) -> Result<(), QueryError> {
        self.group_mut(id)?.op = op;
        Ok(())
    }

    /// Verifies every structural invariant of the store.
    ///
    /// Checks, in order: the root resolves and carries no parent or
    /// primary flag; identifiers are unambiguous across the two maps; no
    /// group lists its own join among its secondary operands; every
    /// reference resolves, agrees with the owner pointer of its target
    /// and carries the expected primary flag; no rule or group is
    /// referenced twice; and everything is reachable from the root (which
    /// also rules out cycles detached from the tree).
    pub fn check_invariants(&self) -> Result<(), QueryError> {
        let root = self.groups.get(&self.root).ok_or_else(|| {
            QueryError::invariant("dangling-root", "root reference does not resolve to a group")
                .with_context("group", &self.root)
        })?;
        if root.parent.is_some() {
            return Err(
                QueryError::invariant("root-has-parent", "root group carries a parent pointer")
                    .with_context("group", &self.root),
            );
        }
        if root.primary {
            return Err(
                QueryError::invariant("root-marked-primary", "root group carries a primary flag")
                    .with_context("group", &self.root),
            );
        }

        let group_ids: BTreeSet<&str> = self.groups.keys().map(GroupId::as_str).collect();
        for id in self.rules.keys() {
            if group_ids.contains(id.as_str()) {
                return Err(QueryError::invariant(
                    "ambiguous-identifier",
                    "identifier is used by both a rule and a group",
                )
                .with_context("id", id));
            }
        }

        let mut seen: BTreeSet<OperandRef> = BTreeSet::new();
        for group in self.groups.values() {
            if group.operands.contains(&group.join) {
                return Err(QueryError::invariant(
                    "join-in-operands",
                    "group lists its own join among its secondary operands",
                )
                .with_context("group", &group.id));
            }
            self.check_reference(&group.join, group, true)?;
            if !seen.insert(group.join.clone()) {
                return Err(shared_node(&group.join));
            }
            for operand in &group.operands {
                self.check_reference(operand, group, false)?;
                if !seen.insert(operand.clone()) {
                    return Err(shared_node(operand));
                }
            }
        }

        self.check_reachability()
    }

    fn check_reference(
        &self,
        reference: &OperandRef,
        owner: &GroupRecord,
        primary: bool,
    ) -> Result<(), QueryError> {
        match reference {
            OperandRef::Rule(id) => {
                let rule = self.rules.get(id).ok_or_else(|| dangling(reference, owner))?;
                if rule.group != owner.id {
                    return Err(owner_mismatch(reference, owner));
                }
                if rule.primary != primary {
                    return Err(primary_mismatch(reference, owner, primary));
                }
            }
            OperandRef::Group(id) => {
                let group = self.groups.get(id).ok_or_else(|| dangling(reference, owner))?;
                if group.parent.as_ref() != Some(&owner.id) {
                    return Err(owner_mismatch(reference, owner));
                }
                if group.primary != primary {
                    return Err(primary_mismatch(reference, owner, primary));
                }
            }
        }
        Ok(())
    }

    fn check_reachability(&self) -> Result<(), QueryError> {
        let mut visited: BTreeSet<&GroupId> = BTreeSet::new();
        let mut reachable_rules = 0usize;
        let mut stack = vec![&self.root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let group = self.group(id)?;
            for reference in std::iter::once(&group.join).chain(group.operands.iter()) {
                match reference {
                    OperandRef::Rule(_) => reachable_rules += 1,
                    OperandRef::Group(child) => stack.push(child),
                }
            }
        }
        if visited.len() != self.groups.len() {
            return Err(QueryError::invariant(
                "unreachable-group",
                "store contains groups not reachable from the root",
            )
            .with_context("reachable", visited.len())
            .with_context("stored", self.groups.len()));
        }
        if reachable_rules != self.rules.len() {
            return Err(QueryError::invariant(
                "unreachable-rule",
                "store contains rules not reachable from the root",
            )
            .with_context("reachable", reachable_rules)
            .with_context("stored", self.rules.len()));
        }
        Ok(())
    }
}

fn shared_node(reference: &OperandRef) -> QueryError {
    QueryError::invariant("shared-node", "rule or group is referenced by more than one slot")
        .with_context("reference", reference)
}

fn dangling(reference: &OperandRef, owner: &GroupRecord) -> QueryError {
    QueryError::invariant("dangling-reference", "reference does not resolve")
        .with_context("reference", reference)
        .with_context("group", &owner.id)
}

fn owner_mismatch(reference: &OperandRef, owner: &GroupRecord) -> QueryError {
    QueryError::invariant(
        "owner-mismatch",
        "owner pointer disagrees with the referencing group",
    )
    .with_context("reference", reference)
    .with_context("group", &owner.id)
}

fn primary_mismatch(reference: &OperandRef, owner: &GroupRecord, expected: bool) -> QueryError {
    QueryError::invariant(
        "primary-mismatch",
        "primary flag disagrees with the slot holding the reference",
    )
    .with_context("reference", reference)
    .with_context("group", &owner.id)
    .with_context("expected", expected)
}
