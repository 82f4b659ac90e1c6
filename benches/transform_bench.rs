//! Benchmarks for the tile transform.
//!
//! Measures lowering of algebra DAGs into statement forests. All
//! operations are pure Rust — no database required.
//!
//! Run with: `cargo bench --bench transform_bench`

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqltile::algebra::{
    BinFn, BinOp, ColSpec, Expr, Literal, NullaryOp, ProjectCol, TableOp, Ty, UnOp,
};
use sqltile::dag::{AlgebraDag, NodeId};
use sqltile::transform;

// ── Helpers ────────────────────────────────────────────────────────────────

struct Builder {
    nodes: HashMap<NodeId, TableOp>,
    next: u64,
}

impl Builder {
    fn new() -> Self {
        Builder {
            nodes: HashMap::new(),
            next: 0,
        }
    }

    fn add(&mut self, op: TableOp) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(id, op);
        id
    }

    fn build(self, roots: Vec<NodeId>) -> AlgebraDag<TableOp> {
        AlgebraDag::new(self.nodes, roots)
    }
}

fn leaf() -> TableOp {
    TableOp::Nullary(NullaryOp::LitTable {
        rows: vec![vec![Literal::Int(1), Literal::Int(2)]],
        schema: vec![
            ColSpec {
                name: "x".into(),
                ty: Ty::Int,
            },
            ColSpec {
                name: "y".into(),
                ty: Ty::Int,
            },
        ],
    })
}

fn filter(child: NodeId) -> TableOp {
    TableOp::Unary(
        UnOp::Select(Expr::BinApp {
            op: BinFn::Gt,
            left: Box::new(Expr::Col("x".into())),
            right: Box::new(Expr::Const(Literal::Int(0))),
        }),
        child,
    )
}

fn projection(child: NodeId) -> TableOp {
    TableOp::Unary(
        UnOp::Project(vec![
            ProjectCol {
                alias: "x".into(),
                expr: Expr::Col("x".into()),
            },
            ProjectCol {
                alias: "y".into(),
                expr: Expr::Col("y".into()),
            },
        ]),
        child,
    )
}

/// A single statement pipeline: table → filter × depth → project.
fn chain_dag(depth: usize) -> AlgebraDag<TableOp> {
    let mut b = Builder::new();
    let mut cur = b.add(leaf());
    for _ in 0..depth {
        cur = b.add(filter(cur));
    }
    let root = b.add(projection(cur));
    b.build(vec![root])
}

/// Fan-out-heavy sharing: each layer's node is consumed by two nodes of
/// the next layer, so every inner node is materialized once and
/// referenced twice.
fn shared_dag(layers: usize) -> AlgebraDag<TableOp> {
    let mut b = Builder::new();
    let base = b.add(leaf());
    let mut current = vec![b.add(filter(base))];
    for _ in 0..layers {
        let mut next = Vec::with_capacity(current.len() * 2);
        for &node in &current {
            next.push(b.add(projection(node)));
            next.push(b.add(filter(node)));
        }
        current = next;
    }
    // Pair the final layer up into unions so the forest has fewer roots
    // than leaves.
    let roots = current
        .chunks(2)
        .map(|pair| match pair {
            [a, b_in] => b.add(TableOp::Binary(BinOp::DisjUnion, *a, *b_in)),
            [a] => *a,
            _ => unreachable!(),
        })
        .collect();
    b.build(roots)
}

// ── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");
    for depth in [4usize, 16, 64] {
        let dag = chain_dag(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &dag, |b, dag| {
            b.iter(|| transform(black_box(dag)).unwrap());
        });
    }
    group.finish();
}

fn bench_shared(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_fanout");
    for layers in [2usize, 4, 6] {
        let dag = shared_dag(layers);
        group.bench_with_input(BenchmarkId::from_parameter(layers), &dag, |b, dag| {
            b.iter(|| transform(black_box(dag)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chain, bench_shared);
criterion_main!(benches);
