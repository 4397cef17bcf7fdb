//! Sweep order for the interval solver.
//!
//! The state graph is cyclic, so there is no topological order. A DFS
//! post-order from the root is used instead: it tends to visit deeper states
//! before the states that lead to them, so one sweep carries more information
//! toward the root than an index-ascending sweep would. The fixed point does
//! not depend on this order, only the number of sweeps needed to reach it.

use crate::compact::{CompactGraph, NodeId};

/// Post-order DFS from the root, using an explicit stack.
///
/// Every reachable id appears exactly once; unreachable ids are omitted.
pub fn elimination_order(graph: &CompactGraph) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(graph.len());
    let mut visited = vec![false; graph.len()];
    let mut stack: Vec<(NodeId, bool)> = vec![(graph.root(), false)];

    while let Some((current, expanded)) = stack.pop() {
        if expanded {
            order.push(current);
            continue;
        }
        if visited[current.index()] {
            continue;
        }
        visited[current.index()] = true;
        stack.push((current, true));
        stack.extend(graph.node(current).successors().map(|id| (id, false)));
    }

    order
}
