//! Lowering of projection.
//!
//! Replaces the input's select-list with the projected columns, each
//! translated so input references are inlined eagerly. The result stays
//! open.

use crate::algebra::{ProjectCol, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::SelectCol;
use crate::tile::{OpenBody, TileTree, to_open, translate_expr};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_project(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    cols: &[ProjectCol],
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let select = cols
        .iter()
        .map(|c| SelectCol {
            alias: c.alias.clone(),
            expr: translate_expr(&c.expr, &body.select),
        })
        .collect();
    body.select = select;
    Ok(TileTree::open(body, children))
}
