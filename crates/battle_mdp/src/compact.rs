//! Dense, index-addressed form of the state graph.
//!
//! [`compact`] walks the lazy graph breadth-first from a root key, numbering
//! keys in discovery order. Parents and children end up with nearby ids,
//! which keeps the solver's sweeps cache friendly.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::graph::{Key, LazyGraph, Successors};
use crate::moves::MoveId;

/// Dense vertex index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index as u32)
    }
}

/// A compacted vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Value is the max over options
    Choice { options: Vec<NodeId> },
    /// Value is the probability-weighted sum over outcomes
    Chance {
        /// Move whose outcomes these are
        action: MoveId,
        outcomes: Vec<(NodeId, f64)>,
    },
    /// Absorbing vertex with a fixed value
    Terminal { value: f64 },
}

impl Node {
    /// Successor ids in stored order.
    pub fn successors(&self) -> impl Iterator<Item = NodeId> + '_ {
        let options: &[NodeId] = match self {
            Node::Choice { options } => options,
            _ => &[],
        };
        let outcomes: &[(NodeId, f64)] = match self {
            Node::Chance { outcomes, .. } => outcomes,
            _ => &[],
        };
        options
            .iter()
            .copied()
            .chain(outcomes.iter().map(|&(id, _)| id))
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal { .. })
    }
}

/// Flat vertex array plus the root id.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CompactGraph {
    /// Wrap a hand-built vertex array.
    ///
    /// Every successor id must index into `nodes`.
    pub fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root.index() < nodes.len());
        debug_assert!(nodes
            .iter()
            .flat_map(Node::successors)
            .all(|id| id.index() < nodes.len()));
        Self { nodes, root }
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest deviation of a chance vertex's outcome total from 1.0.
    pub fn max_probability_error(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Chance { outcomes, .. } => {
                    Some((outcomes.iter().map(|(_, p)| p).sum::<f64>() - 1.0).abs())
                }
                _ => None,
            })
            .fold(0.0, f64::max)
    }
}

/// Breadth-first compaction of everything reachable from `root`.
///
/// Each key is expanded exactly once. The root always gets id 0.
pub fn compact<'s>(graph: &mut LazyGraph<'s>, root: Key<'s>) -> CompactGraph {
    let mut ids: FxHashMap<Key<'s>, NodeId> = FxHashMap::default();
    let mut queue: VecDeque<Key<'s>> = VecDeque::new();
    let mut nodes: Vec<Node> = Vec::new();

    ids.insert(root, NodeId(0));
    queue.push_back(root);

    let mut id_of = |key: Key<'s>, queue: &mut VecDeque<Key<'s>>| -> NodeId {
        let next = NodeId::from(ids.len());
        *ids.entry(key).or_insert_with(|| {
            queue.push_back(key);
            next
        })
    };

    while let Some(key) = queue.pop_front() {
        let node = match graph.successors(key) {
            Successors::Choice(options) => Node::Choice {
                options: options.iter().map(|&k| id_of(k, &mut queue)).collect(),
            },
            Successors::Chance { action, outcomes } => Node::Chance {
                action: *action,
                outcomes: outcomes
                    .iter()
                    .map(|&(k, p)| (id_of(k, &mut queue), p))
                    .collect(),
            },
            Successors::Terminal(value) => Node::Terminal { value: *value },
        };
        nodes.push(node);
    }

    debug!(nodes = nodes.len(), "compacted state graph");
    CompactGraph::new(nodes, NodeId(0))
}
