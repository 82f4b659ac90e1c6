//! Target-SQL statement shape.
//!
//! The transform populates [`SelectStmt`] values; a separate
//! pretty-printer serializes them to literal SQL text. The central
//! invariant is *openness*: a statement is open (mergeable into a
//! consuming statement without a sub-query wrapper) iff only its
//! select-list, from-list, and where-predicate are populated —
//! group-by, order-by, and the distinct flag are all empty/false.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algebra::{AggrFn, BinFn, Literal, SortDir, UnFn};

/// Identifier of an externally materialized sub-plan (dependency-list
/// entry). Monotonically increasing from 0 within one transform run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ExtId(pub usize);

impl fmt::Display for ExtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transient identifier threading an unresolved external reference
/// through a from-clause until the pretty-printer binds it to the
/// dependency's name. Independent counter from [`ExtId`] and aliases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Window functions emitted by the row-numbering operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinFn {
    RowNumber,
    DenseRank,
    Rank,
}

impl WinFn {
    pub fn sql_name(&self) -> &'static str {
        match self {
            WinFn::RowNumber => "ROW_NUMBER",
            WinFn::DenseRank => "DENSE_RANK",
            WinFn::Rank => "RANK",
        }
    }
}

/// A value expression inside a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueExpr {
    /// `prefix.name` or bare `name`.
    Column {
        prefix: Option<String>,
        name: String,
    },
    /// A literal constant.
    Lit(Literal),
    /// `left op right`.
    BinApp {
        op: BinFn,
        left: Box<ValueExpr>,
        right: Box<ValueExpr>,
    },
    /// `op arg`; covers negation, logical NOT of a scalar, and casts.
    UnApp { op: UnFn, arg: Box<ValueExpr> },
    /// `CASE WHEN cond THEN then_ ELSE else_ END`.
    Case {
        cond: Box<ValueExpr>,
        then_: Box<ValueExpr>,
        else_: Box<ValueExpr>,
    },
    /// `expr IN (sub)`.
    In {
        expr: Box<ValueExpr>,
        sub: Box<SelectStmt>,
    },
    /// `EXISTS (sub)`.
    Exists(Box<SelectStmt>),
    /// `NOT pred` — used to negate `IN` / `EXISTS` for anti-joins.
    Not(Box<ValueExpr>),
    /// `*` — only inside `EXISTS` sub-queries.
    Star,
    /// `fun() OVER (PARTITION BY ... ORDER BY ...)`.
    Window {
        fun: WinFn,
        partition: Vec<ValueExpr>,
        order: Vec<OrderExpr>,
    },
    /// `fun(arg)` aggregate application.
    Aggr {
        fun: AggrFn,
        arg: Box<ValueExpr>,
    },
}

impl ValueExpr {
    /// Bare column reference without a table qualifier.
    pub fn col(name: impl Into<String>) -> Self {
        ValueExpr::Column {
            prefix: None,
            name: name.into(),
        }
    }

    /// Column reference qualified with a from-clause alias.
    pub fn qualified(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        ValueExpr::Column {
            prefix: Some(prefix.into()),
            name: name.into(),
        }
    }
}

/// One select-list entry: `expr AS alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCol {
    pub alias: String,
    pub expr: ValueExpr,
}

/// One order-by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderExpr {
    pub expr: ValueExpr,
    pub dir: SortDir,
}

/// The set operations produced by union/difference lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    UnionAll,
    ExceptAll,
}

impl SetOpKind {
    pub fn sql_name(&self) -> &'static str {
        match self {
            SetOpKind::UnionAll => "UNION ALL",
            SetOpKind::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// One from-clause entry. Every entry introduced by this crate carries a
/// fresh, globally unique alias of the form `a<N>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromPart {
    /// A named base table with physical-to-logical column aliasing.
    Table {
        name: String,
        alias: String,
        /// `(physical, logical)` pairs, in schema order.
        columns: Vec<(String, String)>,
    },
    /// An embedded sub-query.
    SubQuery { body: Box<SelectStmt>, alias: String },
    /// An inline `VALUES` list with named columns.
    Values {
        rows: Vec<Vec<ValueExpr>>,
        alias: String,
        columns: Vec<String>,
    },
    /// A two-sided set operation wrapped as a sub-query.
    SetOp {
        op: SetOpKind,
        left: Box<SelectStmt>,
        right: Box<SelectStmt>,
        alias: String,
    },
    /// An unresolved reference to an externally materialized sub-plan,
    /// addressed by internal variable id until the printer binds it.
    Variable { id: VarId, alias: String },
}

impl FromPart {
    /// The alias this entry is addressed by.
    pub fn alias(&self) -> &str {
        match self {
            FromPart::Table { alias, .. }
            | FromPart::SubQuery { alias, .. }
            | FromPart::Values { alias, .. }
            | FromPart::SetOp { alias, .. }
            | FromPart::Variable { alias, .. } => alias,
        }
    }
}

/// A SQL `SELECT` statement under construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectStmt {
    pub distinct: bool,
    pub select: Vec<SelectCol>,
    pub from: Vec<FromPart>,
    pub where_: Option<ValueExpr>,
    pub group_by: Vec<ValueExpr>,
    pub order_by: Vec<OrderExpr>,
}

impl SelectStmt {
    /// An empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this statement may be merged into a consuming statement
    /// without a sub-query wrapper: only select/from/where populated.
    pub fn is_open(&self) -> bool {
        !self.distinct && self.group_by.is_empty() && self.order_by.is_empty()
    }

    /// The ordered column names this statement exposes.
    pub fn output_names(&self) -> Vec<String> {
        self.select.iter().map(|c| c.alias.clone()).collect()
    }

    /// AND a predicate into the where-clause: an absent clause becomes
    /// the predicate itself.
    pub fn and_where(&mut self, pred: ValueExpr) {
        self.where_ = Some(match self.where_.take() {
            None => pred,
            Some(existing) => ValueExpr::BinApp {
                op: BinFn::And,
                left: Box::new(existing),
                right: Box::new(pred),
            },
        });
    }
}

/// Translate a bare column name against a select-list, substituting the
/// stored expression so the value is captured now rather than by name.
///
/// Resolution is left-biased on duplicate aliases — the earliest
/// definition shadows. A name with no matching alias passes through
/// unresolved: it must refer to an outer or base-table column.
pub fn inline_column(select: &[SelectCol], name: &str) -> ValueExpr {
    for col in select {
        if col.alias == name {
            return col.expr.clone();
        }
    }
    ValueExpr::col(name)
}
