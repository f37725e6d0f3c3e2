//! Infix rendering of the stored expression.

use boolq_core::errors::QueryError;
use boolq_core::{GroupId, OperandRef, RuleId};

use crate::store::QueryStore;

/// Renders the stored expression as an infix equation string.
///
/// Each group renders its join followed by its secondary operands in
/// stored order, separated by the group operator and wrapped in
/// parentheses; leaves render as the first four characters of their
/// identifier. The outermost parentheses are stripped.
pub fn render_equation(store: &QueryStore) -> Result<String, QueryError> {
    let rendered = render_group(store, store.root_id())?;
    Ok(rendered
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .map(str::to_owned)
        .unwrap_or(rendered))
}

fn render_group(store: &QueryStore, id: &GroupId) -> Result<String, QueryError> {
    let group = store.group(id)?;
    let mut parts = Vec::with_capacity(group.operands.len() + 1);
    for operand in std::iter::once(&group.join).chain(group.operands.iter()) {
        let part = match operand {
            OperandRef::Rule(rule_id) => {
                store.rule(rule_id)?;
                short_label(rule_id)
            }
            OperandRef::Group(child_id) => render_group(store, child_id)?,
        };
        parts.push(part);
    }
    let separator = format!(" {} ", group.op.as_str());
    Ok(format!("({})", parts.join(&separator)))
}

fn short_label(id: &RuleId) -> String {
    id.as_str().chars().take(4).collect()
}
