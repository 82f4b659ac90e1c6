//! sqltile — SQL code generation for a table-algebra DAG.
//!
//! This crate is the backend stage of a query compiler: it takes a DAG
//! of relational operators ([`algebra::TableOp`] nodes in an
//! [`dag::AlgebraDag`]) and compiles it into a forest of `SELECT`
//! statement shapes ([`tile::TileTree`]), one per root, plus an ordered
//! list of materialized shared sub-plans.
//!
//! The entry point is [`transform::transform`]. The central idea is the
//! *tile*: a statement fragment that is either open (mergeable into its
//! consumer, so operator chains collapse into single statements) or
//! closed (extendable only through a sub-query wrapper). Each algebra
//! operator's lowering rule in [`lower`] decides which, and shared
//! sub-graphs are lowered once and referenced by id from every
//! consumer.
//!
//! The output is an abstract statement tree ([`sql::SelectStmt`]); the
//! crate does not render SQL text and does not talk to a database.

pub mod algebra;
pub mod dag;
pub mod error;
pub mod lower;
pub mod sql;
pub mod tile;
pub mod transform;

pub use dag::{AlgebraDag, NodeId, Operator};
pub use error::CompileError;
pub use sql::{ExtId, SelectStmt, VarId};
pub use tile::TileTree;
pub use transform::transform;
