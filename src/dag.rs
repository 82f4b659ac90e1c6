//! Generic algebra DAG: node storage, parent tracking, topological sort,
//! and dead-node pruning.
//!
//! The DAG is an arena — a dense map from integer node id to operator
//! payload — plus a distinguished list of root ids. Nodes legitimately
//! have multiple incoming edges (shared sub-expressions), so the graph is
//! never represented as an owned tree of boxed nodes.
//!
//! The container knows nothing about SQL; it sees its payload only
//! through the [`Operator`] capability. It holds the input algebra for
//! the tile transform and supports local rewrites (fresh-id insertion,
//! child replacement) used by DAG-level passes.
//!
//! # Prior Art — Graph Algorithms
//!
//! Topological ordering uses Kahn's algorithm:
//! - Kahn, A.B. (1962). "Topological sorting of large networks."
//!   Communications of the ACM, 5(11), 558–562.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Identifies a vertex in an algebra DAG.
///
/// Stable for the lifetime of one DAG instance. Nodes inserted during
/// rewriting receive fresh ids strictly greater than any existing id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability every algebra-operator representation must expose to the
/// DAG container: its outgoing edges, and edge rewiring.
pub trait Operator {
    /// Child node ids, in operator-argument order.
    fn children(&self) -> Vec<NodeId>;

    /// A copy of this operator with every occurrence of `old` among its
    /// children replaced by `new`. Operators without `old` as a child
    /// return an unchanged copy.
    fn replace_child(&self, old: NodeId, new: NodeId) -> Self;
}

/// In-memory DAG of algebra operators with explicit root statements.
///
/// Invariants assumed (validated by the producer, not here): every child
/// id referenced by an operator exists in the node map, and the edge
/// relation is acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgebraDag<O> {
    /// Arena: node id → operator payload.
    nodes: HashMap<NodeId, O>,
    /// Statements to ultimately emit, in emission order.
    roots: Vec<NodeId>,
    /// Next fresh id; strictly greater than every id in `nodes`.
    next_id: u64,
}

impl<O: Operator> AlgebraDag<O> {
    /// Build a DAG from a node map and a root list.
    pub fn new(nodes: HashMap<NodeId, O>, roots: Vec<NodeId>) -> Self {
        let next_id = nodes.keys().map(|n| n.0 + 1).max().unwrap_or(0);
        AlgebraDag {
            nodes,
            roots,
            next_id,
        }
    }

    /// The root node ids, in emission order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` exists in the arena.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Look up the operator stored under `node`.
    ///
    /// A missing node is a producer bug, reported as a fatal error.
    pub fn operator(&self, node: NodeId) -> Result<&O, CompileError> {
        self.nodes
            .get(&node)
            .ok_or(CompileError::UnknownNode(node))
    }

    /// Child ids of `node`, via the [`Operator`] capability.
    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>, CompileError> {
        Ok(self.operator(node)?.children())
    }

    /// All nodes whose children list contains `node`.
    ///
    /// Computed by scanning the arena; callers that need the whole
    /// relation at once use [`AlgebraDag::parent_counts`].
    pub fn parents(&self, node: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, op)| op.children().contains(&node))
            .map(|(&id, _)| id)
            .collect();
        out.sort_unstable();
        out
    }

    /// Incoming-edge count for every node, counting one per distinct
    /// parent (a parent consuming the same child twice counts once).
    pub fn parent_counts(&self) -> HashMap<NodeId, usize> {
        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        for op in self.nodes.values() {
            let mut seen = HashSet::new();
            for child in op.children() {
                if seen.insert(child) {
                    *counts.entry(child).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// The set of nodes reachable from `node` (including `node` itself).
    pub fn reachable_from(&self, node: NodeId) -> Result<HashSet<NodeId>, CompileError> {
        let mut seen = HashSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if seen.insert(n) {
                stack.extend(self.children(n)?);
            }
        }
        Ok(seen)
    }

    /// All nodes reachable from the roots, in topological order
    /// (children before parents).
    ///
    /// Kahn's algorithm restricted to the reachable sub-graph; the edge
    /// direction used here is child → parent, so zero in-degree means
    /// "all children already emitted".
    pub fn topological_sort(&self) -> Result<Vec<NodeId>, CompileError> {
        let mut reachable = HashSet::new();
        for &root in &self.roots {
            reachable.extend(self.reachable_from(root)?);
        }

        // Remaining-children count per reachable node.
        let mut pending: HashMap<NodeId, usize> = HashMap::new();
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for &n in &reachable {
            let children = self.children(n)?;
            let distinct: HashSet<NodeId> = children.into_iter().collect();
            pending.insert(n, distinct.len());
            for c in distinct {
                dependents.entry(c).or_default().push(n);
            }
        }

        let mut queue: VecDeque<NodeId> = {
            let mut leaves: Vec<NodeId> = pending
                .iter()
                .filter(|&(_, deg)| *deg == 0)
                .map(|(&n, _)| n)
                .collect();
            leaves.sort_unstable();
            leaves.into()
        };

        let mut order = Vec::with_capacity(reachable.len());
        while let Some(n) = queue.pop_front() {
            order.push(n);
            if let Some(deps) = dependents.get(&n) {
                for &d in deps {
                    let deg = pending
                        .get_mut(&d)
                        .ok_or(CompileError::UnknownNode(d))?;
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(d);
                    }
                }
            }
        }

        if order.len() != reachable.len() {
            return Err(CompileError::Internal(
                "cycle in algebra DAG: topological sort did not cover all reachable nodes"
                    .to_string(),
            ));
        }
        Ok(order)
    }

    /// Drop every node unreachable from any root.
    ///
    /// Returns the ids that were removed.
    pub fn prune_unreachable(&mut self) -> Result<Vec<NodeId>, CompileError> {
        let mut live = HashSet::new();
        for &root in &self.roots {
            live.extend(self.reachable_from(root)?);
        }
        let mut removed: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|n| !live.contains(n))
            .copied()
            .collect();
        removed.sort_unstable();
        for n in &removed {
            self.nodes.remove(n);
        }
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "pruned unreachable algebra nodes");
        }
        Ok(removed)
    }

    /// Insert a new operator, minting a fresh id strictly greater than
    /// any existing id.
    pub fn insert(&mut self, op: O) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, op);
        id
    }

    /// Rewire one edge of `parent` from `old` to `new`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), CompileError> {
        let rewired = self.operator(parent)?.replace_child(old, new);
        self.nodes.insert(parent, rewired);
        Ok(())
    }
}
