//! Lowering of the final serialization operator.
//!
//! Serialize fixes the external row format: an optional structure
//! column `descr`, an optional absolute position column `pos`, and the
//! payload renamed `item1..itemN`. When an ordering is requested the
//! statement gets an ORDER BY on descr then position. Serialize output
//! is terminal, so the tile is always closed.

use crate::algebra::{SerPos, SortDir, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::sql::{OrderExpr, SelectCol, ValueExpr, inline_column};
use crate::tile::{OpenBody, TileTree, to_open};
use crate::transform::{TransformCtx, lower_node};

pub fn lower_serialize(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    child: NodeId,
    descr: &Option<String>,
    pos: &SerPos,
    payload: &[String],
) -> Result<TileTree, CompileError> {
    let input = lower_node(ctx, dag, child)?;
    let OpenBody { mut body, children } = to_open(input, ctx);
    let env = body.select;

    let mut select = Vec::with_capacity(payload.len() + 2);
    let mut order_by = Vec::new();

    if let Some(descr_col) = descr {
        let expr = inline_column(&env, descr_col);
        order_by.push(asc(expr.clone()));
        select.push(SelectCol {
            alias: "descr".into(),
            expr,
        });
    }
    match pos {
        SerPos::Abs(pos_col) => {
            let expr = inline_column(&env, pos_col);
            order_by.push(asc(expr.clone()));
            select.push(SelectCol {
                alias: "pos".into(),
                expr,
            });
        }
        SerPos::Rel(cols) => {
            // Ordering only; no position column in the output.
            for c in cols {
                order_by.push(asc(inline_column(&env, c)));
            }
        }
        SerPos::None => {
            // Unordered output: a descr entry pushed above would order
            // an explicitly unordered result.
            order_by.clear();
        }
    }
    for (i, payload_col) in payload.iter().enumerate() {
        select.push(SelectCol {
            alias: format!("item{}", i + 1),
            expr: inline_column(&env, payload_col),
        });
    }

    body.select = select;
    body.order_by = order_by;
    Ok(TileTree::closed(body, children))
}

fn asc(expr: ValueExpr) -> OrderExpr {
    OrderExpr {
        expr,
        dir: SortDir::Asc,
    }
}
