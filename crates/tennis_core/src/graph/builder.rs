//! Graph construction from a [`TransitionTable`]
//!
//! Resolution is an explicit depth-first worklist. A node is marked
//! `OnPath` while its descendants are being resolved and `Done` once it has
//! been placed in the arena, so:
//! - a child that is `Done` is shared, not rebuilt;
//! - a child that is `OnPath` closes a cycle and the build fails.
//!
//! Children are always placed before their parent, which lets the longest
//! path to a terminal be computed in the same pass.

use super::{MarkovGraph, MarkovNode, NodeId, NodeKind};
use crate::error::{Result, SimError};
use crate::table::{NodeSpec, TransitionTable};
use fxhash::FxHashMap;

const ROOT_REFERENCE: &str = "<root>";

#[derive(Debug, Clone, Copy)]
enum Mark {
    OnPath,
    Done(NodeId),
}

struct Frame<'t> {
    spec: &'t NodeSpec,
    expanded: bool,
}

/// Builds a [`MarkovGraph`] from the rows of a transition table
pub struct GraphBuilder<'t> {
    table: &'t TransitionTable,
}

impl<'t> GraphBuilder<'t> {
    pub fn new(table: &'t TransitionTable) -> Self {
        Self { table }
    }

    /// Resolve `root_id` and everything reachable from it.
    ///
    /// # Errors
    /// * [`SimError::Lookup`] - a referenced id has no row
    /// * [`SimError::Cycle`] - the rows reachable from the root are not a DAG
    /// * [`SimError::Config`] - blank root id
    pub fn build(&self, root_id: &str) -> Result<MarkovGraph> {
        let root_id = root_id.trim();
        if root_id.is_empty() {
            return Err(SimError::config("root id must not be empty"));
        }
        let root_spec = self.spec(root_id, ROOT_REFERENCE)?;

        let mut nodes: Vec<MarkovNode> = Vec::new();
        let mut depth: Vec<usize> = Vec::new();
        let mut index: FxHashMap<String, NodeId> = FxHashMap::default();
        let mut marks: FxHashMap<&'t str, Mark> = FxHashMap::default();
        let mut leaf: Option<NodeId> = None;

        let mut stack = vec![Frame { spec: root_spec, expanded: false }];

        while let Some(top) = stack.last_mut() {
            let spec = top.spec;

            if !top.expanded {
                match marks.get(spec.id.as_str()) {
                    // Queued twice before its first visit finished
                    Some(Mark::Done(_)) => {
                        stack.pop();
                        continue;
                    }
                    Some(Mark::OnPath) => return Err(cycle_error(&stack, &spec.id)),
                    None => {}
                }
                top.expanded = true;
                marks.insert(spec.id.as_str(), Mark::OnPath);

                // Q first so the P branch is explored (and placed) first
                for child in [&spec.on_q, &spec.on_p].into_iter().flatten() {
                    match marks.get(child.as_str()) {
                        Some(Mark::OnPath) => return Err(cycle_error(&stack, child)),
                        Some(Mark::Done(_)) => {}
                        None => {
                            let child_spec = self.spec(child, &spec.id)?;
                            stack.push(Frame { spec: child_spec, expanded: false });
                        }
                    }
                }
                continue;
            }

            stack.pop();

            let mut resolve = |child: &Option<String>| -> Result<NodeId> {
                match child {
                    None => Ok(*leaf.get_or_insert_with(|| {
                        nodes.push(MarkovNode::anonymous_leaf());
                        depth.push(0);
                        NodeId(nodes.len() - 1)
                    })),
                    Some(child) => match marks.get(child.as_str()) {
                        Some(Mark::Done(id)) => Ok(*id),
                        _ => Err(SimError::invariant(format!(
                            "child '{}' of '{}' was not resolved before its parent",
                            child, spec.id
                        ))),
                    },
                }
            };
            let on_p = resolve(&spec.on_p)?;
            let on_q = resolve(&spec.on_q)?;

            let id = NodeId(nodes.len());
            nodes.push(MarkovNode::new(
                Some(spec.id.clone()),
                spec.prob_p,
                spec.prob_q,
                NodeKind::Branch { on_p, on_q },
            ));
            depth.push(1 + depth[on_p.0].max(depth[on_q.0]));
            index.insert(spec.id.clone(), id);
            marks.insert(spec.id.as_str(), Mark::Done(id));
        }

        let root = index.get(root_id).copied().ok_or_else(|| {
            SimError::invariant(format!("root '{}' missing after build", root_id))
        })?;

        let skipped = self.table.len().saturating_sub(index.len());
        if skipped > 0 {
            tracing::debug!(skipped, root = root_id, "rows unreachable from root were ignored");
        }
        tracing::debug!(nodes = nodes.len(), longest_path = depth[root.0], "graph built");

        Ok(MarkovGraph { nodes, index, root, depth })
    }

    fn spec(&self, id: &str, referenced_by: &str) -> Result<&'t NodeSpec> {
        self.table.get(id).ok_or_else(|| SimError::Lookup {
            id: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }
}

/// Cycle path from the first occurrence of `closing` on the current path.
fn cycle_error(stack: &[Frame<'_>], closing: &str) -> SimError {
    let on_path: Vec<&str> =
        stack.iter().filter(|f| f.expanded).map(|f| f.spec.id.as_str()).collect();
    let start = on_path.iter().position(|id| *id == closing).unwrap_or(0);
    let mut path: Vec<String> = on_path[start..].iter().map(|id| id.to_string()).collect();
    path.push(closing.to_string());
    SimError::Cycle { path }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, f64, &str, &str)]) -> TransitionTable {
        TransitionTable::from_specs(
            rows.iter()
                .map(|&(id, p, on_p, on_q)| NodeSpec::new(id, p, 1.0 - p, Some(on_p), Some(on_q))),
        )
        .unwrap()
    }

    #[test]
    fn test_single_row_links_to_shared_leaf() {
        let t = table(&[("0-0", 1.0, "", "")]);
        let graph = GraphBuilder::new(&t).build("0-0").unwrap();

        assert_eq!(graph.len(), 2);
        let (on_p, on_q) = graph.root_node().children().unwrap();
        assert_eq!(on_p, on_q);
        assert!(graph.node(on_p).is_terminal());
        assert_eq!(graph.name_of(on_p), None);
        assert_eq!(graph.longest_path(), 1);
    }

    #[test]
    fn test_shared_children_are_not_duplicated() {
        let t = table(&[
            ("A", 0.1, "B", "C"),
            ("B", 0.3, "D", "E"),
            ("C", 0.5, "D", "E"),
            ("D", 0.5, "", ""),
            ("E", 0.5, "", ""),
        ]);
        let graph = GraphBuilder::new(&t).build("A").unwrap();

        // 5 rows + 1 anonymous leaf
        assert_eq!(graph.len(), 6);
        let b = graph.get("B").unwrap().children().unwrap();
        let c = graph.get("C").unwrap().children().unwrap();
        assert_eq!(b, c);
        assert_eq!(graph.longest_path(), 3);
        assert!((graph.root_node().prob_q() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_missing_reference_is_lookup_error() {
        let t = table(&[("A", 0.5, "B", "")]);
        let err = GraphBuilder::new(&t).build("A").unwrap_err();
        match err {
            SimError::Lookup { id, referenced_by } => {
                assert_eq!(id, "B");
                assert_eq!(referenced_by, "A");
            }
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_root_is_lookup_error() {
        let t = table(&[("A", 0.5, "", "")]);
        let err = GraphBuilder::new(&t).build("0-0").unwrap_err();
        assert!(matches!(err, SimError::Lookup { referenced_by, .. } if referenced_by == ROOT_REFERENCE));
    }

    #[test]
    fn test_cycle_is_rejected_with_path() {
        let t = table(&[("A", 0.5, "B", ""), ("B", 0.5, "", "C"), ("C", 0.5, "A", "")]);
        let err = GraphBuilder::new(&t).build("A").unwrap_err();
        match err {
            SimError::Cycle { path } => assert_eq!(path, vec!["A", "B", "C", "A"]),
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let t = table(&[("A", 0.5, "A", "")]);
        let err = GraphBuilder::new(&t).build("A").unwrap_err();
        assert!(matches!(err, SimError::Cycle { path } if path == vec!["A", "A"]));
    }

    #[test]
    fn test_unreachable_rows_are_ignored() {
        let t = table(&[("A", 0.5, "", ""), ("orphan", 0.5, "missing", "")]);
        let graph = GraphBuilder::new(&t).build("A").unwrap();
        assert!(graph.get("orphan").is_none());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let ids: Vec<String> = (0..50_000).map(|i| format!("n{}", i)).collect();
        let specs = ids.iter().enumerate().map(|(i, id)| {
            let next = ids.get(i + 1).map(String::as_str).unwrap_or("");
            NodeSpec::new(id.as_str(), 0.5, 0.5, Some(next), Some(""))
        });
        let t = TransitionTable::from_specs(specs).unwrap();

        let graph = GraphBuilder::new(&t).build("n0").unwrap();
        assert_eq!(graph.longest_path(), 50_000);
    }

    #[test]
    fn test_every_node_has_zero_or_two_children() {
        let t = crate::table::standard::standard_game_table(0.55, 3).unwrap();
        let graph = GraphBuilder::new(&t).build("0-0").unwrap();

        for node in graph.nodes() {
            match node.kind() {
                NodeKind::Terminal => assert!(node.id().is_none()),
                NodeKind::Branch { on_p, on_q } => {
                    assert!(on_p.index() < graph.len());
                    assert!(on_q.index() < graph.len());
                }
            }
        }
    }
}
