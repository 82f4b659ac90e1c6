//! Lowering of row selection.
//!
//! ANDs the translated predicate into the input's where-clause. Select
//! never changes the exposed schema and the result stays open, so
//! filter chains collapse into a single statement.

use crate::algebra::{Expr, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::tile::{OpenBody, TileTree, to_open, translate_expr};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_filter(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    pred: &Expr,
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let pred = translate_expr(pred, &body.select);
    body.and_where(pred);
    Ok(TileTree::open(body, children))
}
