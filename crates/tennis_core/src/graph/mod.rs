//! # Markov Graph
//!
//! The point-level score graph of one game. Nodes live in an arena owned by
//! [`MarkovGraph`] and refer to each other through [`NodeId`] handles, so the
//! graph is a plain value that walkers borrow immutably.
//!
//! Built once by [`GraphBuilder`], never mutated afterwards.

mod builder;

pub use builder::GraphBuilder;

use fxhash::FxHashMap;

/// Handle to a node inside its [`MarkovGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shape of a node: either it ends the game or it has both successors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Terminal,
    Branch { on_p: NodeId, on_q: NodeId },
}

/// One score state
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovNode {
    /// `None` only for the shared anonymous leaf that stands in for an
    /// empty child reference.
    id: Option<String>,
    prob_p: f64,
    prob_q: f64,
    kind: NodeKind,
}

impl MarkovNode {
    pub(crate) fn new(id: Option<String>, prob_p: f64, prob_q: f64, kind: NodeKind) -> Self {
        Self { id, prob_p, prob_q, kind }
    }

    pub(crate) fn anonymous_leaf() -> Self {
        Self::new(None, 0.0, 0.0, NodeKind::Terminal)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Probability that P wins the point played from this state
    pub fn prob_p(&self) -> f64 {
        self.prob_p
    }

    /// Stored independently of `prob_p`; the walker only reads `prob_p`.
    pub fn prob_q(&self) -> f64 {
        self.prob_q
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal)
    }

    /// `(on_p, on_q)` for branch nodes
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Terminal => None,
            NodeKind::Branch { on_p, on_q } => Some((on_p, on_q)),
        }
    }
}

/// Immutable DAG of score states rooted at the start state
#[derive(Debug, Clone)]
pub struct MarkovGraph {
    nodes: Vec<MarkovNode>,
    index: FxHashMap<String, NodeId>,
    root: NodeId,
    /// Longest path (in points) from each node to a terminal
    depth: Vec<usize>,
}

impl MarkovGraph {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &MarkovNode {
        self.node(self.root)
    }

    /// Panics if `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> &MarkovNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: &str) -> Option<&MarkovNode> {
        self.index.get(id).map(|&n| self.node(n))
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MarkovNode> {
        self.nodes.iter()
    }

    /// Number of nodes, including the anonymous leaf if one was needed.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum number of points a single game can last on this graph.
    pub fn longest_path(&self) -> usize {
        self.depth[self.root.0]
    }

    /// Display name for a node (anonymous leaves have none).
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_accessors() {
        let leaf = MarkovNode::anonymous_leaf();
        assert!(leaf.is_terminal());
        assert_eq!(leaf.children(), None);
        assert_eq!(leaf.id(), None);

        let branch = MarkovNode::new(
            Some("0-0".to_string()),
            0.6,
            0.4,
            NodeKind::Branch { on_p: NodeId(1), on_q: NodeId(2) },
        );
        assert!(!branch.is_terminal());
        assert_eq!(branch.children(), Some((NodeId(1), NodeId(2))));
        assert_eq!(branch.id(), Some("0-0"));
    }
}
