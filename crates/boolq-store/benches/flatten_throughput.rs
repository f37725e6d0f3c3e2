use boolq_core::wire::{BoolOp, Condition, QueryNode, QueryOperand, QueryRule};
use boolq_store::{render_equation, QueryStore};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn leaf(value: &str) -> QueryOperand {
    QueryOperand::Rule(QueryRule::Dropdown {
        condition: Condition::Is,
        value: Some(value.to_owned()),
    })
}

fn deep_query(depth: usize, width: usize) -> QueryNode {
    let mut operands: Vec<QueryOperand> = (0..width).map(|i| leaf(&format!("w{i}"))).collect();
    if depth > 0 {
        operands.push(QueryOperand::Node(deep_query(depth - 1, width)));
    }
    QueryNode {
        rule: Box::new(leaf("join")),
        operator: if depth % 2 == 0 { BoolOp::And } else { BoolOp::Or },
        operands,
    }
}

fn bench_transforms(c: &mut Criterion) {
    let query = deep_query(8, 6);

    c.bench_function("flatten_deep", |b| {
        b.iter(|| QueryStore::from_query_seeded(black_box(&query), 1).unwrap())
    });

    let store = QueryStore::from_query_seeded(&query, 1).unwrap();
    c.bench_function("reconstruct_deep", |b| {
        b.iter(|| black_box(&store).to_query().unwrap())
    });

    c.bench_function("render_equation_deep", |b| {
        b.iter(|| render_equation(black_box(&store)).unwrap())
    });

    c.bench_function("check_invariants_deep", |b| {
        b.iter(|| black_box(&store).check_invariants().unwrap())
    });
}

criterion_group!(benches, bench_transforms);
criterion_main!(benches);
