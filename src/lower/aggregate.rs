//! Lowering of grouping and aggregation.
//!
//! The select-list becomes grouping keys followed by aggregate
//! applications, all translated against the input. Keys that are
//! compile-time constants keep their select-list column but are dropped
//! from GROUP BY, where a bare constant would be an ordinal position in
//! most dialects. The result is closed.

use crate::algebra::{AggrPair, GroupKey, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::{SelectCol, ValueExpr};
use crate::tile::{OpenBody, TileTree, to_open, translate_expr};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_aggr(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    keys: &[GroupKey],
    aggrs: &[AggrPair],
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let env = body.select;

    let mut select = Vec::with_capacity(keys.len() + aggrs.len());
    let mut group_by = Vec::new();
    for key in keys {
        let expr = translate_expr(&key.expr, &env);
        if !key.expr.is_const() {
            group_by.push(expr.clone());
        }
        select.push(SelectCol {
            alias: key.alias.clone(),
            expr,
        });
    }
    for aggr in aggrs {
        select.push(SelectCol {
            alias: aggr.alias.clone(),
            expr: ValueExpr::Aggr {
                fun: aggr.fun,
                arg: Box::new(translate_expr(&aggr.arg, &env)),
            },
        });
    }

    body.select = select;
    body.group_by = group_by;
    Ok(TileTree::closed(body, children))
}
