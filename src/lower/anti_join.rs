//! Lowering of anti-joins: the semi-join strategies under negation,
//! yielding `NOT IN` / `NOT EXISTS`.

use crate::algebra::{JoinPred, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::lower::semi_join::lower_semi_join;
use crate::tile::TileTree;
use crate::transform::TransformCtx;

pub fn lower_anti_join(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
    preds: &[JoinPred],
) -> Result<TileTree, CompileError> {
    lower_semi_join(ctx, dag, left, right, preds, true)
}
