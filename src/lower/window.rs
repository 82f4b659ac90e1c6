//! Lowering of the row-numbering operators.
//!
//! Each appends one window-function column to the input's select-list.
//! The result is always closed: the window value depends on the exact
//! row set, so merging a later filter into the same statement would
//! change it.

use crate::algebra::{Expr, SortSpec, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::{SelectCol, ValueExpr, WinFn};
use crate::tile::{OpenBody, TileTree, to_open, translate_expr, translate_sort};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_row_num(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    alias: &str,
    order: &[SortSpec],
    partition: &[Expr],
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let window = ValueExpr::Window {
        fun: WinFn::RowNumber,
        partition: partition
            .iter()
            .map(|e| translate_expr(e, &body.select))
            .collect(),
        order: translate_sort(order, &body.select),
    };
    body.select.push(SelectCol {
        alias: alias.to_owned(),
        expr: window,
    });
    Ok(TileTree::closed(body, children))
}

pub fn lower_rank(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    alias: &str,
    order: &[SortSpec],
    dense: bool,
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let fun = if dense { WinFn::DenseRank } else { WinFn::Rank };
    let window = ValueExpr::Window {
        fun,
        partition: vec![],
        order: translate_sort(order, &body.select),
    };
    body.select.push(SelectCol {
        alias: alias.to_owned(),
        expr: window,
    });
    Ok(TileTree::closed(body, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{SortDir, Ty, UnOp};
    use crate::lower::test_helpers::*;
    use crate::transform::transform;

    fn row_num_dag(partition: Vec<Expr>) -> AlgebraDag<TableOp> {
        let mut b = DagBuilder::new();
        let lit = b.add(lit_table(
            vec![vec![int(1), int(10)]],
            &[("k", Ty::Int), ("v", Ty::Int)],
        ));
        let rn = b.add(TableOp::Unary(
            UnOp::RowNum {
                alias: "rn".into(),
                order: vec![SortSpec {
                    expr: col("v"),
                    dir: SortDir::Desc,
                }],
                partition,
            },
            lit,
        ));
        b.build(vec![rn])
    }

    #[test]
    fn test_row_num_appends_column_and_closes() {
        let (roots, _) = transform(&row_num_dag(vec![col("k")])).unwrap();
        let TileTree::Tile { open, body, .. } = &roots[0] else {
            panic!("expected a tile");
        };
        assert!(!open, "window output must not be mergeable");
        assert_eq!(body.output_names(), vec!["k", "v", "rn"]);

        let ValueExpr::Window { fun, partition, order } = &body.select[2].expr else {
            panic!("expected a window expression");
        };
        assert_eq!(*fun, WinFn::RowNumber);
        assert_eq!(partition.len(), 1);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].dir, SortDir::Desc);
    }

    #[test]
    fn test_row_num_inlines_order_columns() {
        // The ORDER BY must capture the input column's value expression,
        // not its name.
        let (roots, _) = transform(&row_num_dag(vec![])).unwrap();
        let TileTree::Tile { body, .. } = &roots[0] else {
            panic!("expected a tile");
        };
        let ValueExpr::Window { order, .. } = &body.select[2].expr else {
            panic!("expected a window expression");
        };
        assert!(matches!(
            order[0].expr,
            ValueExpr::Column { prefix: Some(_), .. }
        ));
    }

    #[test]
    fn test_rank_variants() {
        let mut b = DagBuilder::new();
        let lit = b.add(lit_table(vec![vec![int(1)]], &[("v", Ty::Int)]));
        let dense = b.add(TableOp::Unary(
            UnOp::RowRank {
                alias: "r".into(),
                order: vec![SortSpec {
                    expr: col("v"),
                    dir: SortDir::Asc,
                }],
            },
            lit,
        ));
        let sparse = b.add(TableOp::Unary(
            UnOp::Rank {
                alias: "r".into(),
                order: vec![SortSpec {
                    expr: col("v"),
                    dir: SortDir::Asc,
                }],
            },
            lit,
        ));
        let dag = b.build(vec![dense, sparse]);

        let (roots, _) = transform(&dag).unwrap();
        let fun_of = |t: &TileTree| {
            let TileTree::Tile { body, .. } = t else {
                panic!("expected a tile");
            };
            let ValueExpr::Window { fun, .. } = body.select.last().unwrap().expr.clone() else {
                panic!("expected a window expression");
            };
            fun
        };
        assert_eq!(fun_of(&roots[0]), WinFn::DenseRank);
        assert_eq!(fun_of(&roots[1]), WinFn::Rank);
    }
}
