//! The tile transform driver.
//!
//! Walks the algebra DAG bottom-up and lowers every root to a
//! [`TileTree`], dispatching to the per-operator rules in
//! [`crate::lower`]. Sharing is handled here: a unary or binary node
//! with more than one parent is lowered exactly once, appended to the
//! run-global dependency list under a fresh external id, and every
//! consumer receives a [`TileTree::Reference`] to it. Nullary nodes are
//! never extracted — duplicating a literal or a table reference is
//! cheaper than materializing a named sub-plan for it.
//!
//! The traversal is a pure, synchronous recursion over an immutable DAG
//! plus one mutable [`TransformCtx`] threaded by unique reference; ids
//! are assigned in strictly increasing, traversal-deterministic order,
//! so two runs on identical input produce structurally identical output.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::algebra::{BinOp, TableOp, UnOp};
use crate::dag::{AlgebraDag, NodeId};
use crate::error::CompileError;
use crate::lower;
use crate::sql::{ExtId, VarId};
use crate::tile::TileTree;

/// Mutable compiler state for one `transform` invocation.
///
/// Owns the memo table, the three independent monotonic counters, and
/// the append-only dependency log. Never shared across invocations, so
/// independent `transform` calls cannot interfere.
pub struct TransformCtx {
    /// Distinct-parent count per node, computed once from the input DAG.
    parent_counts: HashMap<NodeId, usize>,
    /// Nodes already materialized: node → (external id, exposed schema).
    /// Grows monotonically; entries are never rewritten during a run.
    memo: HashMap<NodeId, (ExtId, Vec<String>)>,
    /// Materialized sub-plans in post-order of first use. A dependency
    /// is appended only after all of its own dependencies, so the list
    /// never contains a forward reference.
    deps: Vec<(ExtId, TileTree)>,
    ext_counter: usize,
    alias_counter: usize,
    var_counter: usize,
}

impl TransformCtx {
    /// Create a context over a precomputed parent-count index.
    pub fn new(parent_counts: HashMap<NodeId, usize>) -> Self {
        TransformCtx {
            parent_counts,
            memo: HashMap::new(),
            deps: Vec::new(),
            ext_counter: 0,
            alias_counter: 0,
            var_counter: 0,
        }
    }

    /// Mint a fresh, globally unique from-clause alias `a<N>`.
    pub fn next_alias(&mut self) -> String {
        let n = self.alias_counter;
        self.alias_counter += 1;
        format!("a{n}")
    }

    /// Mint a fresh internal variable id.
    pub fn next_var(&mut self) -> VarId {
        let v = VarId(self.var_counter);
        self.var_counter += 1;
        v
    }

    fn next_ext(&mut self) -> ExtId {
        let e = ExtId(self.ext_counter);
        self.ext_counter += 1;
        e
    }

    fn parent_count(&self, node: NodeId) -> usize {
        self.parent_counts.get(&node).copied().unwrap_or(0)
    }
}

/// Compile an algebra DAG into a forest of SQL statement tiles.
///
/// Returns one root tile per input root, in root-list order, together
/// with the ordered dependency list of materialized shared sub-plans.
pub fn transform(
    dag: &AlgebraDag<TableOp>,
) -> Result<(Vec<TileTree>, Vec<(ExtId, TileTree)>), CompileError> {
    let mut ctx = TransformCtx::new(dag.parent_counts());
    let mut roots = Vec::with_capacity(dag.roots().len());
    for &root in dag.roots() {
        roots.push(lower_node(&mut ctx, dag, root)?);
    }
    debug!(
        roots = roots.len(),
        dependencies = ctx.deps.len(),
        aliases = ctx.alias_counter,
        "tile transform complete"
    );
    Ok((roots, ctx.deps))
}

/// Lower one DAG node, extracting it into the dependency list when it is
/// branch-eligible and shared.
pub(crate) fn lower_node(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    node: NodeId,
) -> Result<TileTree, CompileError> {
    let op = dag.operator(node)?;
    if op.is_branch_candidate() && ctx.parent_count(node) > 1 {
        if let Some((id, schema)) = ctx.memo.get(&node) {
            trace!(%node, ext = %id, "memo hit, emitting reference");
            return Ok(TileTree::Reference {
                id: *id,
                schema: schema.clone(),
            });
        }
        let tile = lower_operator(ctx, dag, node)?;
        let schema = tile.schema();
        let id = ctx.next_ext();
        ctx.deps.push((id, tile));
        ctx.memo.insert(node, (id, schema.clone()));
        trace!(%node, ext = %id, op = op.tag(), "materialized shared node");
        Ok(TileTree::Reference { id, schema })
    } else {
        lower_operator(ctx, dag, node)
    }
}

/// Dispatch to the operator-specific lowering rule.
fn lower_operator(
    ctx: &mut TransformCtx,
    dag: &AlgebraDag<TableOp>,
    node: NodeId,
) -> Result<TileTree, CompileError> {
    match dag.operator(node)? {
        TableOp::Nullary(op) => lower::nullary::lower_nullary(ctx, op),
        TableOp::Unary(op, child) => {
            let child = *child;
            match op {
                UnOp::RowNum {
                    alias,
                    order,
                    partition,
                } => lower::window::lower_row_num(ctx, dag, child, alias, order, partition),
                UnOp::RowRank { alias, order } => {
                    lower::window::lower_rank(ctx, dag, child, alias, order, true)
                }
                UnOp::Rank { alias, order } => {
                    lower::window::lower_rank(ctx, dag, child, alias, order, false)
                }
                UnOp::Project(cols) => lower::project::lower_project(ctx, dag, child, cols),
                UnOp::Select(pred) => lower::filter::lower_filter(ctx, dag, child, pred),
                UnOp::Distinct => lower::distinct::lower_distinct(ctx, dag, child),
                UnOp::Aggr { keys, aggrs } => {
                    lower::aggregate::lower_aggr(ctx, dag, child, keys, aggrs)
                }
                UnOp::Serialize {
                    descr,
                    pos,
                    payload,
                } => lower::serialize::lower_serialize(ctx, dag, child, descr, pos, payload),
            }
        }
        TableOp::Binary(op, left, right) => {
            let (left, right) = (*left, *right);
            match op {
                BinOp::Cross => lower::join::lower_cross(ctx, dag, left, right),
                BinOp::EqJoin { left: lc, right: rc } => {
                    lower::join::lower_eq_join(ctx, dag, left, right, lc, rc)
                }
                BinOp::ThetaJoin(preds) => {
                    lower::join::lower_theta_join(ctx, dag, left, right, preds)
                }
                BinOp::SemiJoin(preds) => {
                    lower::semi_join::lower_semi_join(ctx, dag, left, right, preds, false)
                }
                BinOp::AntiJoin(preds) => {
                    lower::anti_join::lower_anti_join(ctx, dag, left, right, preds)
                }
                BinOp::DisjUnion => lower::set_op::lower_set_op(
                    ctx,
                    dag,
                    left,
                    right,
                    crate::sql::SetOpKind::UnionAll,
                ),
                BinOp::Difference => lower::set_op::lower_set_op(
                    ctx,
                    dag,
                    left,
                    right,
                    crate::sql::SetOpKind::ExceptAll,
                ),
            }
        }
        TableOp::Ternary(..) => Err(CompileError::TernaryOperator(node)),
    }
}
