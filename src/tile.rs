//! The tile model: SQL fragments and the merge/inline rules that decide
//! how they compose.
//!
//! A tile is either a statement fragment ([`TileTree::Tile`]) or a
//! reference to a fragment materialized elsewhere
//! ([`TileTree::Reference`]). The `open` flag records the mergeability
//! invariant of the carried statement — see [`SelectStmt::is_open`] —
//! and the two conversion modes below bridge "tile" and "statement the
//! next operator can extend".

use serde::{Deserialize, Serialize};

use crate::algebra::{Expr, SortSpec};
use crate::sql::{
    ExtId, FromPart, OrderExpr, SelectCol, SelectStmt, ValueExpr, VarId, inline_column,
};
use crate::transform::TransformCtx;

/// The tile transform's result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileTree {
    /// A SQL fragment with the children its from-clause references via
    /// internal variable ids.
    Tile {
        /// Mergeability of `body`; must always match `body.is_open()`
        /// or be conservatively `false`.
        open: bool,
        body: SelectStmt,
        children: Vec<(VarId, TileTree)>,
    },
    /// A pointer to a fragment materialized in the dependency list,
    /// together with the exact, ordered column names it exposes.
    Reference { id: ExtId, schema: Vec<String> },
}

impl TileTree {
    /// A tile whose flag tracks the body's actual shape.
    pub fn open(body: SelectStmt, children: Vec<(VarId, TileTree)>) -> Self {
        let open = body.is_open();
        TileTree::Tile {
            open,
            body,
            children,
        }
    }

    /// A tile marked non-mergeable regardless of the body's shape (used
    /// by operators that compute genuinely new derived columns).
    pub fn closed(body: SelectStmt, children: Vec<(VarId, TileTree)>) -> Self {
        TileTree::Tile {
            open: false,
            body,
            children,
        }
    }

    /// The ordered column names this tile exposes.
    pub fn schema(&self) -> Vec<String> {
        match self {
            TileTree::Tile { body, .. } => body.output_names(),
            TileTree::Reference { schema, .. } => schema.clone(),
        }
    }

    /// Pretty-printed JSON dump, for debugging and for handing compiled
    /// output to an external serializer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A statement a lowering rule may keep extending, plus the child tiles
/// its from-clause references.
#[derive(Debug)]
pub struct OpenBody {
    pub body: SelectStmt,
    pub children: Vec<(VarId, TileTree)>,
}

/// A statement taken as-is, with its mergeability flag preserved.
#[derive(Debug)]
pub struct PlainBody {
    pub open: bool,
    pub body: SelectStmt,
    pub children: Vec<(VarId, TileTree)>,
}

/// Wrap a reference leaf as a from-clause entry over a fresh internal
/// variable, re-exposing its schema via plain column references.
fn wrap_reference(id: ExtId, schema: Vec<String>, ctx: &mut TransformCtx) -> OpenBody {
    let var = ctx.next_var();
    let alias = ctx.next_alias();
    let select = schema
        .iter()
        .map(|col| SelectCol {
            alias: col.clone(),
            expr: ValueExpr::qualified(alias.clone(), col.clone()),
        })
        .collect();
    let body = SelectStmt {
        select,
        from: vec![FromPart::Variable {
            id: var,
            alias,
        }],
        ..SelectStmt::new()
    };
    OpenBody {
        body,
        children: vec![(var, TileTree::Reference { id, schema })],
    }
}

/// Embed a non-open statement as a from-clause sub-query under a fresh
/// alias, re-exposing its schema via plain column references.
fn wrap_subquery(
    body: SelectStmt,
    children: Vec<(VarId, TileTree)>,
    ctx: &mut TransformCtx,
) -> OpenBody {
    let alias = ctx.next_alias();
    let select = body
        .output_names()
        .into_iter()
        .map(|col| SelectCol {
            alias: col.clone(),
            expr: ValueExpr::qualified(alias.clone(), col),
        })
        .collect();
    let wrapped = SelectStmt {
        select,
        from: vec![FromPart::SubQuery {
            body: Box::new(body),
            alias,
        }],
        ..SelectStmt::new()
    };
    OpenBody {
        body: wrapped,
        children,
    }
}

/// Open conversion: a statement the caller can keep merging into.
///
/// Open tiles come back as-is; closed tiles are embedded as a sub-query;
/// reference leaves become a from-clause entry over a fresh variable,
/// recorded as a new child dependency of the caller.
pub fn to_open(tile: TileTree, ctx: &mut TransformCtx) -> OpenBody {
    match tile {
        TileTree::Tile {
            open: true,
            body,
            children,
        } => OpenBody { body, children },
        TileTree::Tile {
            open: false,
            body,
            children,
        } => wrap_subquery(body, children, ctx),
        TileTree::Reference { id, schema } => wrap_reference(id, schema, ctx),
    }
}

/// Plain conversion: the statement untouched, for callers that do not
/// merge further (e.g. set-operation arms). Reference leaves are wrapped
/// exactly as in open conversion.
pub fn to_plain(tile: TileTree, ctx: &mut TransformCtx) -> PlainBody {
    match tile {
        TileTree::Tile {
            open,
            body,
            children,
        } => PlainBody {
            open,
            body,
            children,
        },
        TileTree::Reference { id, schema } => {
            let OpenBody { body, children } = wrap_reference(id, schema, ctx);
            PlainBody {
                open: true,
                body,
                children,
            }
        }
    }
}

/// Translate an algebra expression against a select-list, inlining every
/// bare column reference the list defines.
///
/// Inlining is mandatory: a later stage may drop referenced columns, so
/// expressions must capture their value now, not by name.
pub fn translate_expr(expr: &Expr, env: &[SelectCol]) -> ValueExpr {
    match expr {
        Expr::Col(name) => inline_column(env, name),
        Expr::Const(lit) => ValueExpr::Lit(lit.clone()),
        Expr::BinApp { op, left, right } => ValueExpr::BinApp {
            op: *op,
            left: Box::new(translate_expr(left, env)),
            right: Box::new(translate_expr(right, env)),
        },
        Expr::UnApp { op, arg } => ValueExpr::UnApp {
            op: *op,
            arg: Box::new(translate_expr(arg, env)),
        },
        Expr::If { cond, then_, else_ } => ValueExpr::Case {
            cond: Box::new(translate_expr(cond, env)),
            then_: Box::new(translate_expr(then_, env)),
            else_: Box::new(translate_expr(else_, env)),
        },
    }
}

/// Translate a sort specification against a select-list.
pub fn translate_sort(specs: &[SortSpec], env: &[SelectCol]) -> Vec<OrderExpr> {
    specs
        .iter()
        .map(|s| OrderExpr {
            expr: translate_expr(&s.expr, env),
            dir: s.dir,
        })
        .collect()
}
