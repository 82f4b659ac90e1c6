//! Lowering of semi-joins (and, via negation, anti-joins).
//!
//! Two strategies, picked by predicate shape:
//!
//! * exactly one equality between two bare column references lowers to
//!   `left_col IN (SELECT right_col FROM right)` — uncorrelated, and
//!   the form planners recognize best;
//! * everything else lowers to a correlated
//!   `EXISTS (SELECT * FROM right WHERE preds)`, with the left sides of
//!   the predicates resolving against the outer statement.
//!
//! The boundary is deliberately narrow: even a single non-equality
//! predicate, or an equality over computed expressions, takes the
//! EXISTS path.

use crate::algebra::{Expr, JoinPred, JoinRel, TableOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::lower::join::{JoinInputs, open_inputs, rel_to_fn};
use crate::sql::{SelectCol, SelectStmt, ValueExpr, inline_column};
use crate::tile::{OpenBody, TileTree, translate_expr};
use crate::transform::TransformCtx;

pub fn lower_semi_join(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    left: NodeId,
    right: NodeId,
    preds: &[JoinPred],
    negate: bool,
) -> Result<TileTree, CompileError> {
    let JoinInputs {
        left: OpenBody {
            body: mut lbody,
            children: mut children,
        },
        right: OpenBody {
            body: rbody,
            children: rchildren,
        },
    } = open_inputs(ctx, dag, left, right)?;

    let cond = match single_column_equality(preds) {
        Some((left_col, right_col)) => {
            let sub = SelectStmt {
                select: vec![SelectCol {
                    alias: right_col.to_owned(),
                    expr: inline_column(&rbody.select, right_col),
                }],
                from: rbody.from,
                where_: rbody.where_,
                ..SelectStmt::new()
            };
            ValueExpr::In {
                expr: Box::new(inline_column(&lbody.select, left_col)),
                sub: Box::new(sub),
            }
        }
        None => {
            let mut sub = SelectStmt {
                // Rendered as a bare `*`; the alias is never printed.
                select: vec![SelectCol {
                    alias: "*".into(),
                    expr: ValueExpr::Star,
                }],
                from: rbody.from,
                where_: rbody.where_,
                ..SelectStmt::new()
            };
            for pred in preds {
                sub.and_where(ValueExpr::BinApp {
                    op: rel_to_fn(pred.rel),
                    // Correlated: the left side reads the outer
                    // statement's columns.
                    left: Box::new(translate_expr(&pred.left, &lbody.select)),
                    right: Box::new(translate_expr(&pred.right, &rbody.select)),
                });
            }
            ValueExpr::Exists(Box::new(sub))
        }
    };

    let cond = if negate {
        ValueExpr::Not(Box::new(cond))
    } else {
        cond
    };
    lbody.and_where(cond);
    children.extend(rchildren);
    Ok(TileTree::open(lbody, children))
}

/// The `IN`-strategy trigger: exactly one `Eq` predicate whose two sides
/// are bare column references.
fn single_column_equality(preds: &[JoinPred]) -> Option<(&str, &str)> {
    match preds {
        [JoinPred {
            left: Expr::Col(l),
            right: Expr::Col(r),
            rel: JoinRel::Eq,
        }] => Some((l.as_str(), r.as_str())),
        _ => None,
    }
}
