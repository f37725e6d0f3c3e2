use std::fs;

use boolq_core::wire::{BoolOp, Condition, QueryNode, QueryOperand, QueryRule};
use boolq_store::QueryStore;
use proptest::prelude::*;

fn dropdown(value: &str) -> QueryOperand {
    QueryOperand::Rule(QueryRule::Dropdown {
        condition: Condition::Is,
        value: Some(value.to_owned()),
    })
}

fn text(value: &str) -> QueryOperand {
    QueryOperand::Rule(QueryRule::Text {
        value: Some(value.to_owned()),
    })
}

fn node(rule: QueryOperand, operator: BoolOp, operands: Vec<QueryOperand>) -> QueryNode {
    QueryNode {
        rule: Box::new(rule),
        operator,
        operands,
    }
}

#[test]
fn flat_tree_round_trips() {
    let query = node(
        dropdown("a"),
        BoolOp::And,
        vec![text("b"), dropdown("c")],
    );
    let store = QueryStore::from_query_seeded(&query, 11).unwrap();
    store.check_invariants().unwrap();
    assert_eq!(store.group_count(), 1);
    assert_eq!(store.rule_count(), 3);
    assert_eq!(store.to_query().unwrap(), query);
}

#[test]
fn nested_tree_round_trips() {
    let inner = node(dropdown("x"), BoolOp::Or, vec![text("y")]);
    let query = node(
        QueryOperand::Node(node(dropdown("j"), BoolOp::And, vec![text("k")])),
        BoolOp::And,
        vec![QueryOperand::Node(inner), dropdown("z")],
    );
    let store = QueryStore::from_query_seeded(&query, 12).unwrap();
    store.check_invariants().unwrap();
    assert_eq!(store.group_count(), 3);
    assert_eq!(store.rule_count(), 5);
    assert_eq!(store.to_query().unwrap(), query);
}

#[test]
fn operand_order_is_preserved_exactly() {
    let query = node(
        dropdown("join"),
        BoolOp::Or,
        vec![text("one"), text("two"), text("three"), text("four")],
    );
    let store = QueryStore::from_query_seeded(&query, 13).unwrap();
    let reconstructed = store.to_query().unwrap();
    assert_eq!(reconstructed.operands, query.operands);
}

#[test]
fn import_rejects_invalid_shape_without_a_store() {
    let doc = r#"{
        "rule": { "where": "text", "data": {} },
        "operands": []
    }"#;
    assert!(QueryStore::import_json(doc).is_err());
}

#[test]
fn import_rejects_empty_operand_position_node() {
    let doc = r#"{
        "rule": { "where": "text", "data": {} },
        "operator": "and",
        "operands": [
            { "rule": { "where": "text", "data": {} }, "operator": "or", "operands": [] }
        ]
    }"#;
    let err = QueryStore::import_json(doc).unwrap_err();
    assert_eq!(err.info().code, "empty-operands");
}

#[test]
fn export_and_reimport_through_a_file() {
    let query = node(
        dropdown("a"),
        BoolOp::And,
        vec![QueryOperand::Node(node(text("b"), BoolOp::Or, vec![text("c")]))],
    );
    let store = QueryStore::from_query_seeded(&query, 14).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("query.json");
    fs::write(&path, store.export_json().unwrap()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let reimported = QueryStore::import_json(&content).unwrap();
    reimported.check_invariants().unwrap();
    assert_eq!(reimported.to_query().unwrap(), query);
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        Just(Condition::Is),
        Just(Condition::IsNot),
        Just(Condition::Contains),
        Just(Condition::DoesNotContain),
    ]
}

fn arb_op() -> impl Strategy<Value = BoolOp> {
    prop_oneof![Just(BoolOp::And), Just(BoolOp::Or)]
}

fn arb_rule() -> impl Strategy<Value = QueryRule> {
    prop_oneof![
        (arb_condition(), proptest::option::of("[a-z]{1,6}"))
            .prop_map(|(condition, value)| QueryRule::Dropdown { condition, value }),
        proptest::option::of("[a-z]{1,6}").prop_map(|value| QueryRule::Text { value }),
    ]
}

fn arb_query() -> impl Strategy<Value = QueryNode> {
    let leaf = arb_rule().prop_map(QueryOperand::Rule);
    let operand = leaf.prop_recursive(3, 24, 4, |inner| {
        (
            inner.clone(),
            arb_op(),
            proptest::collection::vec(inner, 1..4),
        )
            .prop_map(|(rule, operator, operands)| {
                QueryOperand::Node(QueryNode {
                    rule: Box::new(rule),
                    operator,
                    operands,
                })
            })
    });
    (
        operand.clone(),
        arb_op(),
        proptest::collection::vec(operand, 1..4),
    )
        .prop_map(|(rule, operator, operands)| QueryNode {
            rule: Box::new(rule),
            operator,
            operands,
        })
}

proptest! {
    #[test]
    fn random_trees_round_trip(query in arb_query(), seed in any::<u64>()) {
        query.validate().unwrap();
        let store = QueryStore::from_query_seeded(&query, seed).unwrap();
        store.check_invariants().unwrap();
        prop_assert_eq!(store.to_query().unwrap(), query);
    }
}
