//! Lowering of bag union and bag difference.
//!
//! Both arms are taken plain — their statements embed as written, open
//! or not — and joined under a set-operation from-part with a fresh
//! alias. The outer statement re-exposes the left arm's schema, which
//! SQL set operations fix as the result schema.

use crate::algebra::TableOp;
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::{FromPart, SelectCol, SelectStmt, SetOpKind, ValueExpr};
use crate::tile::{TileTree, to_plain};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_set_op(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
    op: SetOpKind,
) -> Result<TileTree, CompileError> {
    let left_tile = lower_node(ctx, dag, left)?;
    let right_tile = lower_node(ctx, dag, right)?;
    let mut lplain = to_plain(left_tile, ctx);
    let rplain = to_plain(right_tile, ctx);

    let alias = ctx.next_alias();
    let schema = lplain.body.output_names();
    let select = schema
        .iter()
        .map(|col| SelectCol {
            alias: col.clone(),
            expr: ValueExpr::qualified(alias.clone(), col.clone()),
        })
        .collect();
    let body = SelectStmt {
        select,
        from: vec![FromPart::SetOp {
            op,
            left: Box::new(lplain.body),
            right: Box::new(rplain.body),
            alias,
        }],
        ..SelectStmt::new()
    };
    lplain.children.extend(rplain.children);
    Ok(TileTree::open(body, lplain.children))
}
