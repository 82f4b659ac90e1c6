//! Lowering of cross, equi-, and theta-joins.
//!
//! All three build the same merged open statement: both inputs' from
//! lists concatenated, select-lists concatenated left-then-right, and
//! where-clauses ANDed. Join conditions are translated per side before
//! the merge — each side's expressions resolve only against that
//! input's columns — and then ANDed in as ordinary predicates.

use crate::algebra::{BinFn, JoinPred, JoinRel, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::{SelectStmt, ValueExpr, inline_column};
use crate::tile::{OpenBody, TileTree, to_open, translate_expr};
use crate::transform::{TransformCtx, lower_node};

/// Both inputs lowered and opened, ready for predicate translation.
pub(crate) struct JoinInputs {
    pub left: OpenBody,
    pub right: OpenBody,
}

pub(crate) fn open_inputs(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
) -> Result<JoinInputs, CompileError> {
    let left_tile = lower_node(ctx, dag, left)?;
    let right_tile = lower_node(ctx, dag, right)?;
    Ok(JoinInputs {
        left: to_open(left_tile, ctx),
        right: to_open(right_tile, ctx),
    })
}

pub(crate) fn rel_to_fn(rel: JoinRel) -> BinFn {
    match rel {
        JoinRel::Eq => BinFn::Eq,
        JoinRel::NEq => BinFn::NEq,
        JoinRel::Gt => BinFn::Gt,
        JoinRel::GtE => BinFn::GtE,
        JoinRel::Lt => BinFn::Lt,
        JoinRel::LtE => BinFn::LtE,
    }
}

/// Merge two open bodies into one open product statement, ANDing the
/// given join conditions into the combined where-clause.
fn merge(inputs: JoinInputs, conds: Vec<ValueExpr>) -> TileTree {
    let JoinInputs {
        left: OpenBody {
            body: lbody,
            children: mut children,
        },
        right: OpenBody {
            body: rbody,
            children: rchildren,
        },
    } = inputs;

    let mut body = SelectStmt {
        select: lbody.select,
        from: lbody.from,
        where_: lbody.where_,
        ..SelectStmt::new()
    };
    body.select.extend(rbody.select);
    body.from.extend(rbody.from);
    if let Some(rwhere) = rbody.where_ {
        body.and_where(rwhere);
    }
    for cond in conds {
        body.and_where(cond);
    }
    children.extend(rchildren);
    TileTree::open(body, children)
}

pub fn lower_cross(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
) -> Result<TileTree, CompileError> {
    let inputs = open_inputs(ctx, dag, left, right)?;
    Ok(merge(inputs, vec![]))
}

pub fn lower_eq_join(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
    left_col: &str,
    right_col: &str,
) -> Result<TileTree, CompileError> {
    let inputs = open_inputs(ctx, dag, left, right)?;
    let cond = ValueExpr::BinApp {
        op: BinFn::Eq,
        left: Box::new(inline_column(&inputs.left.body.select, left_col)),
        right: Box::new(inline_column(&inputs.right.body.select, right_col)),
    };
    Ok(merge(inputs, vec![cond]))
}

pub fn lower_theta_join(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
    preds: &[JoinPred],
) -> Result<TileTree, CompileError> {
    let inputs = open_inputs(ctx, dag, left, right)?;
    let conds = preds
        .iter()
        .map(|p| ValueExpr::BinApp {
            op: rel_to_fn(p.rel),
            left: Box::new(translate_expr(&p.left, &inputs.left.body.select)),
            right: Box::new(translate_expr(&p.right, &inputs.right.body.select)),
        })
        .collect();
    Ok(merge(inputs, conds))
}
