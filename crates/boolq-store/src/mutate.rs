//! Incremental mutation operations preserving the store invariants.
//!
//! Every operation is atomic with respect to observers: all fallible
//! checks run before the first write, so an error always leaves the
//! store exactly as it was.

use boolq_core::errors::{ErrorInfo, QueryError};
use boolq_core::{BoolOp, GroupId, OperandRef, QueryRule, RuleId};

use crate::store::{GroupRecord, QueryStore, RuleRecord};

impl QueryStore {
    /// Appends a fresh default rule to the target group's secondary operands.
    ///
    /// Returns the identifier of the new rule, or `NotFound` if the
    /// target group does not exist (store unchanged).
    pub fn add_rule(&mut self, target: &GroupId) -> Result<RuleId, QueryError> {
        self.group(target)?;
        let id = self.allocator.allocate_rule();
        self.rules.insert(
            id.clone(),
            RuleRecord {
                id: id.clone(),
                group: target.clone(),
                primary: false,
                payload: QueryRule::default(),
            },
        );
        self.group_mut(target)?
            .operands
            .push(OperandRef::Rule(id.clone()));
        Ok(id)
    }

    /// Appends a fresh group to the target group's secondary operands.
    ///
    /// The new group is never created joinless: it holds one default rule
    /// as its join and one further default rule as its only secondary
    /// operand, so the `and` operator it starts with has immediate
    /// meaning. Returns the identifier of the new group, or `NotFound`
    /// if the target does not exist (store unchanged).
    pub fn add_group(&mut self, target: &GroupId) -> Result<GroupId, QueryError> {
        self.group(target)?;
        let id = self.allocator.allocate_group();
        let join = self.create_default_rule(&id, true);
        let second = self.create_default_rule(&id, false);
        self.groups.insert(
            id.clone(),
            GroupRecord {
                id: id.clone(),
                parent: Some(target.clone()),
                primary: false,
                op: BoolOp::And,
                join: OperandRef::Rule(join),
                operands: vec![OperandRef::Rule(second)],
            },
        );
        self.group_mut(target)?
            .operands
            .push(OperandRef::Group(id.clone()));
        Ok(id)
    }

    /// Removes a rule, promoting a replacement join and collapsing the
    /// owning group when the removal empties its secondary operands.
    ///
    /// Removing the join of a group that has no secondary operands at
    /// all is undefined by the contract; callers are expected to prevent
    /// it (disable the control). The engine guards the case anyway and
    /// reports `Invariant` with code `join-not-promotable`, store
    /// unchanged.
    pub fn remove_rule(&mut self, id: &RuleId) -> Result<(), QueryError> {
        let (group_id, primary) = {
            let rule = self.rule(id)?;
            (rule.group.clone(), rule.primary)
        };
        let group = self.group(&group_id)?;

        let promoted = if primary {
            // Promotion prefers the first secondary rule, then the first
            // secondary group, in stored order.
            let candidate = group
                .operands
                .iter()
                .find(|reference| reference.is_rule())
                .or_else(|| group.operands.iter().find(|reference| reference.is_group()))
                .cloned();
            match candidate {
                Some(reference) => Some(reference),
                None => {
                    return Err(QueryError::Invariant(
                        ErrorInfo::new(
                            "join-not-promotable",
                            "cannot remove the sole join of a group with no secondary operands",
                        )
                        .with_context("rule", id)
                        .with_context("group", &group_id)
                        .with_hint("remove the enclosing group instead"),
                    ));
                }
            }
        } else {
            None
        };

        // No fallible checks below this point.
        if let Some(promoted) = promoted {
            let group = self.group_mut(&group_id)?;
            group.operands.retain(|reference| reference != &promoted);
            group.join = promoted.clone();
            match &promoted {
                OperandRef::Rule(rule_id) => self.rule_mut(rule_id)?.primary = true,
                OperandRef::Group(child_id) => self.group_mut(child_id)?.primary = true,
            }
        } else {
            let removed = OperandRef::Rule(id.clone());
            self.group_mut(&group_id)?
                .operands
                .retain(|reference| reference != &removed);
        }
        self.rules.remove(id);
        self.collapse_check(&group_id)
    }

    /// Collapses a group that has degenerated to "just its join".
    ///
    /// A group whose secondary operands are empty is eliminated by
    /// promoting its join one level up: into the parent's join slot if
    /// the group was primary, otherwise into the group's own position in
    /// the parent's operand list (preserving position). At the root the
    /// join can only be promoted if it is itself a group; a bare rule
    /// cannot stand as root, so the degenerate root group is kept.
    fn collapse_check(&mut self, group_id: &GroupId) -> Result<(), QueryError> {
        let (join, primary, parent) = {
            let group = self.group(group_id)?;
            if !group.operands.is_empty() {
                return Ok(());
            }
            (group.join.clone(), group.primary, group.parent.clone())
        };

        match parent {
            Some(parent_id) => {
                // The promoted entity inherits the collapsed group's slot
                // and primary flag.
                match &join {
                    OperandRef::Rule(rule_id) => {
                        let rule = self.rule_mut(rule_id)?;
                        rule.group = parent_id.clone();
                        rule.primary = primary;
                    }
                    OperandRef::Group(child_id) => {
                        let child = self.group_mut(child_id)?;
                        child.parent = Some(parent_id.clone());
                        child.primary = primary;
                    }
                }
                let own_ref = OperandRef::Group(group_id.clone());
                let parent = self.group_mut(&parent_id)?;
                if primary {
                    parent.join = join;
                } else if let Some(slot) = parent
                    .operands
                    .iter_mut()
                    .find(|reference| **reference == own_ref)
                {
                    *slot = join;
                }
                self.groups.remove(group_id);
            }
            None => match join {
                OperandRef::Group(child_id) => {
                    {
                        let child = self.group_mut(&child_id)?;
                        child.parent = None;
                        child.primary = false;
                    }
                    self.groups.remove(group_id);
                    self.root = child_id;
                }
                // A root group may hold nothing but its join rule; the
                // root must stay a group, so no collapse happens.
                OperandRef::Rule(_) => {}
            },
        }
        Ok(())
    }

    fn create_default_rule(&mut self, group: &GroupId, primary: bool) -> RuleId {
        let id = self.allocator.allocate_rule();
        self.rules.insert(
            id.clone(),
            RuleRecord {
                id: id.clone(),
                group: group.clone(),
                primary,
                payload: QueryRule::default(),
            },
        );
        id
    }
}
