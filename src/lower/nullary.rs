//! Lowering of leaf relations: literal tables, empty tables, and base
//! table references.
//!
//! Leaves are never extracted into the dependency list, so every
//! consumer gets its own copy under fresh aliases.

use crate::algebra::{ColSpec, Literal, NullaryOp, Ty, UnFn};
use crate::error::CompileError;
use crate::sql::{FromPart, SelectCol, SelectStmt, ValueExpr};
use crate::tile::TileTree;
use crate::transform::TransformCtx;

pub fn lower_nullary(ctx: &mut TransformCtx, op: &NullaryOp) -> Result<TileTree, CompileError> {
    match op {
        NullaryOp::LitTable { rows, schema } => Ok(lower_lit_table(ctx, rows, schema)),
        NullaryOp::EmptyTable { schema } => Ok(lower_empty_table(ctx, schema)),
        NullaryOp::TableRef { table, columns } => {
            let alias = ctx.next_alias();
            let select = columns
                .iter()
                .map(|c| SelectCol {
                    alias: c.logical.clone(),
                    expr: ValueExpr::qualified(alias.clone(), c.logical.clone()),
                })
                .collect();
            let body = SelectStmt {
                select,
                from: vec![FromPart::Table {
                    name: table.clone(),
                    alias,
                    columns: columns
                        .iter()
                        .map(|c| (c.physical.clone(), c.logical.clone()))
                        .collect(),
                }],
                ..SelectStmt::new()
            };
            Ok(TileTree::open(body, vec![]))
        }
    }
}

fn lower_lit_table(ctx: &mut TransformCtx, rows: &[Vec<Literal>], schema: &[ColSpec]) -> TileTree {
    if rows.is_empty() {
        // VALUES needs at least one row; emit a typed-null row and guard
        // it with a contradiction so the relation is provably empty.
        let mut tile = lower_empty_table(ctx, schema);
        if let TileTree::Tile { ref mut body, .. } = tile {
            body.and_where(ValueExpr::Lit(Literal::Bool(false)));
        }
        return tile;
    }
    let alias = ctx.next_alias();
    let value_rows = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .zip(schema)
                .map(|(lit, col)| {
                    let value = ValueExpr::Lit(lit.clone());
                    // The first row fixes the column types for the whole
                    // VALUES list.
                    if i == 0 { cast(value, col.ty) } else { value }
                })
                .collect()
        })
        .collect();
    values_tile(alias, value_rows, schema)
}

fn lower_empty_table(ctx: &mut TransformCtx, schema: &[ColSpec]) -> TileTree {
    let alias = ctx.next_alias();
    let null_row = schema
        .iter()
        .map(|col| cast(ValueExpr::Lit(Literal::Null), col.ty))
        .collect();
    values_tile(alias, vec![null_row], schema)
}

fn values_tile(alias: String, rows: Vec<Vec<ValueExpr>>, schema: &[ColSpec]) -> TileTree {
    let columns: Vec<String> = schema.iter().map(|c| c.name.clone()).collect();
    let select = columns
        .iter()
        .map(|name| SelectCol {
            alias: name.clone(),
            expr: ValueExpr::qualified(alias.clone(), name.clone()),
        })
        .collect();
    let body = SelectStmt {
        select,
        from: vec![FromPart::Values {
            rows,
            alias,
            columns,
        }],
        ..SelectStmt::new()
    };
    TileTree::open(body, vec![])
}

fn cast(value: ValueExpr, ty: Ty) -> ValueExpr {
    ValueExpr::UnApp {
        op: UnFn::Cast(ty),
        arg: Box::new(value),
    }
}
