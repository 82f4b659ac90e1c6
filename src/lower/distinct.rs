//! Lowering of duplicate elimination: sets the DISTINCT flag on the
//! input statement and closes the tile.

use crate::algebra::TableOp;
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::tile::{OpenBody, TileTree, to_open};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_distinct(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    body.distinct = true;
    Ok(TileTree::closed(body, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Ty, UnOp};
    use crate::lower::test_helpers::*;
    use crate::transform::transform;

    #[test]
    fn test_distinct_sets_flag_and_closes() {
        let mut b = DagBuilder::new();
        let lit = b.add(lit_table(vec![vec![int(1)]], &[("x", Ty::Int)]));
        let d = b.add(TableOp::Unary(UnOp::Distinct, lit));
        let dag = b.build(vec![d]);

        let (roots, _) = transform(&dag).unwrap();
        let TileTree::Tile { open, body, .. } = &roots[0] else {
            panic!("expected a tile");
        };
        assert!(!open);
        assert!(body.distinct);
        assert_eq!(body.output_names(), vec!["x"]);
    }
}
