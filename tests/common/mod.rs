//! Shared DAG builders for integration tests.

// Each test binary compiles its own copy; not every binary uses every
// helper.
#![allow(dead_code)]

use std::collections::HashMap;

use sqltile::algebra::{
    BinFn, ColSpec, Expr, JoinPred, JoinRel, Literal, NullaryOp, ProjectCol, TableOp, Ty, UnOp,
};
use sqltile::dag::{AlgebraDag, NodeId};
use sqltile::sql::ExtId;
use sqltile::tile::TileTree;

/// Accumulates nodes under sequential ids and finishes into a DAG.
pub struct DagBuilder {
    nodes: HashMap<NodeId, TableOp>,
    next: u64,
}

impl DagBuilder {
    pub fn new() -> Self {
        DagBuilder {
            nodes: HashMap::new(),
            next: 0,
        }
    }

    pub fn add(&mut self, op: TableOp) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(id, op);
        id
    }

    pub fn build(self, roots: Vec<NodeId>) -> AlgebraDag<TableOp> {
        AlgebraDag::new(self.nodes, roots)
    }
}

pub fn int_table(cols: &[&str], rows: Vec<Vec<i64>>) -> TableOp {
    TableOp::Nullary(NullaryOp::LitTable {
        rows: rows
            .into_iter()
            .map(|r| r.into_iter().map(Literal::Int).collect())
            .collect(),
        schema: cols
            .iter()
            .map(|name| ColSpec {
                name: (*name).into(),
                ty: Ty::Int,
            })
            .collect(),
    })
}

pub fn col(name: &str) -> Expr {
    Expr::Col(name.into())
}

pub fn gt(left: Expr, right: i64) -> Expr {
    Expr::BinApp {
        op: BinFn::Gt,
        left: Box::new(left),
        right: Box::new(Expr::Const(Literal::Int(right))),
    }
}

pub fn select_op(pred: Expr, child: NodeId) -> TableOp {
    TableOp::Unary(UnOp::Select(pred), child)
}

pub fn project_op(cols: &[&str], child: NodeId) -> TableOp {
    TableOp::Unary(
        UnOp::Project(
            cols.iter()
                .map(|name| ProjectCol {
                    alias: (*name).into(),
                    expr: col(name),
                })
                .collect(),
        ),
        child,
    )
}

pub fn eq_pred(left: &str, right: &str) -> JoinPred {
    JoinPred {
        left: col(left),
        right: col(right),
        rel: JoinRel::Eq,
    }
}

/// Every external id referenced anywhere inside a tile, in encounter
/// order.
pub fn collect_references(tile: &TileTree, out: &mut Vec<ExtId>) {
    match tile {
        TileTree::Tile { children, .. } => {
            for (_, child) in children {
                collect_references(child, out);
            }
        }
        TileTree::Reference { id, .. } => out.push(*id),
    }
}
