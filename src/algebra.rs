//! Table-algebra intermediate representation.
//!
//! The front end lowers a source query into a DAG of these operators;
//! this crate's transform consumes them. Operators are grouped by arity:
//! [`NullaryOp`] (leaf relations), [`UnOp`] (one input), [`BinOp`] (two
//! inputs). A ternary arity class exists in the IR but is never produced
//! by the operators this backend lowers — reaching one during the
//! transform is a fatal internal error.
//!
//! All types are serde-serializable so plans can be stored and reloaded
//! by an external deserializer.

use serde::{Deserialize, Serialize};

use crate::dag::{NodeId, Operator};

/// Scalar type of an algebra column, used for typed NULL casts and
/// literal-table schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ty {
    Int,
    Dec,
    Double,
    Bool,
    Str,
    Date,
}

impl Ty {
    /// The SQL spelling used in `CAST (... AS ...)`.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Ty::Int => "INTEGER",
            Ty::Dec => "DECIMAL",
            Ty::Double => "DOUBLE PRECISION",
            Ty::Bool => "BOOLEAN",
            Ty::Str => "TEXT",
            Ty::Date => "DATE",
        }
    }
}

/// A literal value appearing in the algebra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Null,
}

/// One column of a leaf relation's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColSpec {
    pub name: String,
    pub ty: Ty,
}

/// One column of a referenced base table: the physical name in the
/// database mapped to the logical name the algebra uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCol {
    pub physical: String,
    pub logical: String,
    pub ty: Ty,
}

/// Binary scalar functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinFn {
    Plus,
    Minus,
    Times,
    Div,
    Modulo,
    Gt,
    Lt,
    GtE,
    LtE,
    Eq,
    NEq,
    And,
    Or,
    Like,
    Concat,
}

impl BinFn {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            BinFn::Plus => "+",
            BinFn::Minus => "-",
            BinFn::Times => "*",
            BinFn::Div => "/",
            BinFn::Modulo => "%",
            BinFn::Gt => ">",
            BinFn::Lt => "<",
            BinFn::GtE => ">=",
            BinFn::LtE => "<=",
            BinFn::Eq => "=",
            BinFn::NEq => "<>",
            BinFn::And => "AND",
            BinFn::Or => "OR",
            BinFn::Like => "LIKE",
            BinFn::Concat => "||",
        }
    }
}

/// Unary scalar functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnFn {
    Not,
    Neg,
    Cast(Ty),
}

/// A scalar expression over the columns of an operator's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A bare column reference, resolved against the input's select-list
    /// during lowering.
    Col(String),
    /// A literal constant.
    Const(Literal),
    /// `left op right`.
    BinApp {
        op: BinFn,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `op arg`.
    UnApp { op: UnFn, arg: Box<Expr> },
    /// `CASE WHEN cond THEN then_ ELSE else_ END`.
    If {
        cond: Box<Expr>,
        then_: Box<Expr>,
        else_: Box<Expr>,
    },
}

impl Expr {
    /// Whether this expression is a compile-time constant — no column
    /// reference anywhere in it. Constant grouping keys are dropped from
    /// `GROUP BY` during lowering.
    pub fn is_const(&self) -> bool {
        match self {
            Expr::Col(_) => false,
            Expr::Const(_) => true,
            Expr::BinApp { left, right, .. } => left.is_const() && right.is_const(),
            Expr::UnApp { arg, .. } => arg.is_const(),
            Expr::If { cond, then_, else_ } => {
                cond.is_const() && then_.is_const() && else_.is_const()
            }
        }
    }
}

/// Sort direction for window specifications and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    Asc,
    Desc,
}

/// One entry of a sort specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub expr: Expr,
    pub dir: SortDir,
}

/// Aggregate functions supported by [`UnOp::Aggr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggrFn {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    BoolAnd,
    BoolOr,
}

impl AggrFn {
    pub fn sql_name(&self) -> &'static str {
        match self {
            AggrFn::Sum => "SUM",
            AggrFn::Avg => "AVG",
            AggrFn::Min => "MIN",
            AggrFn::Max => "MAX",
            AggrFn::Count => "COUNT",
            AggrFn::BoolAnd => "BOOL_AND",
            AggrFn::BoolOr => "BOOL_OR",
        }
    }
}

/// One aggregate application: `fun(arg) AS alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggrPair {
    pub fun: AggrFn,
    pub arg: Expr,
    pub alias: String,
}

/// One grouping key: the key expression and the output column it is
/// exposed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    pub alias: String,
    pub expr: Expr,
}

/// One projected column: `expr AS alias`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCol {
    pub alias: String,
    pub expr: Expr,
}

/// Comparison relation of a join predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinRel {
    Eq,
    NEq,
    Gt,
    GtE,
    Lt,
    LtE,
}

impl JoinRel {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            JoinRel::Eq => "=",
            JoinRel::NEq => "<>",
            JoinRel::Gt => ">",
            JoinRel::GtE => ">=",
            JoinRel::Lt => "<",
            JoinRel::LtE => "<=",
        }
    }
}

/// One join predicate: `left rel right`, where `left` reads the left
/// input's columns and `right` the right input's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPred {
    pub left: Expr,
    pub right: Expr,
    pub rel: JoinRel,
}

/// Position column handling for [`UnOp::Serialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SerPos {
    /// An absolute position column taken from the input.
    Abs(String),
    /// A relative order given by a column list; no position column is
    /// emitted, only the ordering.
    Rel(Vec<String>),
    /// No ordering requested.
    None,
}

/// Leaf relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NullaryOp {
    /// An inline literal table. An empty row list denotes a provably
    /// empty relation.
    LitTable {
        rows: Vec<Vec<Literal>>,
        schema: Vec<ColSpec>,
    },
    /// An empty relation carrying only a typed schema.
    EmptyTable { schema: Vec<ColSpec> },
    /// A named base table with physical-to-logical column mapping.
    TableRef {
        table: String,
        columns: Vec<TableCol>,
    },
}

/// Operators with one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnOp {
    /// Append a `ROW_NUMBER()` column.
    RowNum {
        alias: String,
        order: Vec<SortSpec>,
        partition: Vec<Expr>,
    },
    /// Append a `DENSE_RANK()` column.
    RowRank { alias: String, order: Vec<SortSpec> },
    /// Append a `RANK()` column.
    Rank { alias: String, order: Vec<SortSpec> },
    /// Replace the select-list.
    Project(Vec<ProjectCol>),
    /// Filter rows by a predicate.
    Select(Expr),
    /// Remove duplicate rows.
    Distinct,
    /// Group and aggregate.
    Aggr {
        keys: Vec<GroupKey>,
        aggrs: Vec<AggrPair>,
    },
    /// Final projection to the external row format: optional structure
    /// column, optional position, payload renamed `item1..itemN`.
    Serialize {
        descr: Option<String>,
        pos: SerPos,
        payload: Vec<String>,
    },
}

/// Operators with two inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinOp {
    /// Cartesian product.
    Cross,
    /// Equi-join on one bare column per side.
    EqJoin { left: String, right: String },
    /// Join on arbitrary comparison predicates. An empty predicate list
    /// degenerates to a cross join.
    ThetaJoin(Vec<JoinPred>),
    /// Keep left rows with at least one right match.
    SemiJoin(Vec<JoinPred>),
    /// Keep left rows with no right match.
    AntiJoin(Vec<JoinPred>),
    /// Bag union (`UNION ALL`).
    DisjUnion,
    /// Bag difference (`EXCEPT ALL`).
    Difference,
}

/// A table-algebra operator, grouped by arity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableOp {
    Nullary(NullaryOp),
    Unary(UnOp, NodeId),
    Binary(BinOp, NodeId, NodeId),
    /// Present in the IR for completeness; never lowered to SQL.
    Ternary(NodeId, NodeId, NodeId),
}

impl TableOp {
    /// Short operator tag for diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            TableOp::Nullary(NullaryOp::LitTable { .. }) => "LitTable",
            TableOp::Nullary(NullaryOp::EmptyTable { .. }) => "EmptyTable",
            TableOp::Nullary(NullaryOp::TableRef { .. }) => "TableRef",
            TableOp::Unary(UnOp::RowNum { .. }, _) => "RowNum",
            TableOp::Unary(UnOp::RowRank { .. }, _) => "RowRank",
            TableOp::Unary(UnOp::Rank { .. }, _) => "Rank",
            TableOp::Unary(UnOp::Project(_), _) => "Project",
            TableOp::Unary(UnOp::Select(_), _) => "Select",
            TableOp::Unary(UnOp::Distinct, _) => "Distinct",
            TableOp::Unary(UnOp::Aggr { .. }, _) => "Aggr",
            TableOp::Unary(UnOp::Serialize { .. }, _) => "Serialize",
            TableOp::Binary(BinOp::Cross, _, _) => "Cross",
            TableOp::Binary(BinOp::EqJoin { .. }, _, _) => "EqJoin",
            TableOp::Binary(BinOp::ThetaJoin(_), _, _) => "ThetaJoin",
            TableOp::Binary(BinOp::SemiJoin(_), _, _) => "SemiJoin",
            TableOp::Binary(BinOp::AntiJoin(_), _, _) => "AntiJoin",
            TableOp::Binary(BinOp::DisjUnion, _, _) => "DisjUnion",
            TableOp::Binary(BinOp::Difference, _, _) => "Difference",
            TableOp::Ternary(_, _, _) => "Ternary",
        }
    }

    /// Whether this operator is a candidate for sharing extraction.
    ///
    /// Nullary operators are cheap to duplicate; extracting them would
    /// materialize a reference for something as simple as a literal.
    pub fn is_branch_candidate(&self) -> bool {
        matches!(self, TableOp::Unary(..) | TableOp::Binary(..) | TableOp::Ternary(..))
    }
}

impl Operator for TableOp {
    fn children(&self) -> Vec<NodeId> {
        match self {
            TableOp::Nullary(_) => vec![],
            TableOp::Unary(_, c) => vec![*c],
            TableOp::Binary(_, l, r) => vec![*l, *r],
            TableOp::Ternary(a, b, c) => vec![*a, *b, *c],
        }
    }

    fn replace_child(&self, old: NodeId, new: NodeId) -> Self {
        let swap = |c: NodeId| if c == old { new } else { c };
        match self {
            TableOp::Nullary(_) => self.clone(),
            TableOp::Unary(op, c) => TableOp::Unary(op.clone(), swap(*c)),
            TableOp::Binary(op, l, r) => TableOp::Binary(op.clone(), swap(*l), swap(*r)),
            TableOp::Ternary(a, b, c) => TableOp::Ternary(swap(*a), swap(*b), swap(*c)),
        }
    }
}
