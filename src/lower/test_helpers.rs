//! Shared builders for operator lowering tests.

use std::collections::HashMap;

use crate::algebra::{
    BinFn, ColSpec, Expr, JoinPred, JoinRel, Literal, NullaryOp, ProjectCol, TableCol, TableOp, Ty,
    UnOp,
};
use crate::dag::{AlgebraDag, NodeId};

/// Accumulates nodes under sequential ids and finishes into a DAG.
pub(crate) struct DagBuilder {
    nodes: HashMap<NodeId, TableOp>,
    next: u64,
}

impl DagBuilder {
    pub(crate) fn new() -> Self {
        DagBuilder {
            nodes: HashMap::new(),
            next: 0,
        }
    }

    pub(crate) fn add(&mut self, op: TableOp) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        self.nodes.insert(id, op);
        id
    }

    pub(crate) fn build(self, roots: Vec<NodeId>) -> AlgebraDag<TableOp> {
        AlgebraDag::new(self.nodes, roots)
    }
}

pub(crate) fn lit_table(rows: Vec<Vec<Literal>>, schema: &[(&str, Ty)]) -> TableOp {
    TableOp::Nullary(NullaryOp::LitTable {
        rows,
        schema: schema
            .iter()
            .map(|(name, ty)| ColSpec {
                name: (*name).into(),
                ty: *ty,
            })
            .collect(),
    })
}

pub(crate) fn table_ref(table: &str, columns: &[(&str, &str, Ty)]) -> TableOp {
    TableOp::Nullary(NullaryOp::TableRef {
        table: table.into(),
        columns: columns
            .iter()
            .map(|(physical, logical, ty)| TableCol {
                physical: (*physical).into(),
                logical: (*logical).into(),
                ty: *ty,
            })
            .collect(),
    })
}

pub(crate) fn project_op(cols: &[(&str, Expr)], child: NodeId) -> TableOp {
    TableOp::Unary(
        UnOp::Project(
            cols.iter()
                .map(|(alias, expr)| ProjectCol {
                    alias: (*alias).into(),
                    expr: expr.clone(),
                })
                .collect(),
        ),
        child,
    )
}

pub(crate) fn select_op(pred: Expr, child: NodeId) -> TableOp {
    TableOp::Unary(UnOp::Select(pred), child)
}

pub(crate) fn eq_pred(left: &str, right: &str) -> JoinPred {
    JoinPred {
        left: col(left),
        right: col(right),
        rel: JoinRel::Eq,
    }
}

pub(crate) fn col(name: &str) -> Expr {
    Expr::Col(name.into())
}

pub(crate) fn int(v: i64) -> Literal {
    Literal::Int(v)
}

pub(crate) fn string(v: &str) -> Literal {
    Literal::Str(v.into())
}

pub(crate) fn int_e(v: i64) -> Expr {
    Expr::Const(Literal::Int(v))
}

pub(crate) fn gt(left: Expr, right: Expr) -> Expr {
    Expr::BinApp {
        op: BinFn::Gt,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub(crate) fn plus(left: Expr, right: Expr) -> Expr {
    Expr::BinApp {
        op: BinFn::Plus,
        left: Box::new(left),
        right: Box::new(right),
    }
}
