//! petgraph-based event hierarchy of a pathway (`hasEvent` closure).

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use tracing::warn;

use crate::source::class::{self, attr};
use crate::source::{Database, Record};

pub struct EventHierarchy {
    pub graph: DiGraph<i64, ()>,
    pub node_indices: HashMap<i64, NodeIndex>,
    /// Events in first-visit pre-order, following the stored `hasEvent` order.
    pub order: Vec<i64>,
    pathways: HashSet<i64>,
}

impl EventHierarchy {
    /// Walk `hasEvent` from `root`. Dangling references are skipped with a warning.
    pub fn build(db: &dyn Database, root: &Record) -> Self {
        let mut hierarchy = EventHierarchy {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            order: Vec::new(),
            pathways: HashSet::new(),
        };
        let root_idx = hierarchy.index_of(root.id());
        hierarchy.pathways.insert(root.id());
        let mut visited = HashSet::from([root.id()]);
        hierarchy.walk(db, root, root_idx, &mut visited);

        if is_cyclic_directed(&hierarchy.graph) {
            warn!(pathway = root.id(), "event hierarchy contains a cycle");
        }
        hierarchy
    }

    fn index_of(&mut self, id: i64) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.node_indices.insert(id, idx);
        idx
    }

    fn walk(&mut self, db: &dyn Database, parent: &Record, parent_idx: NodeIndex, visited: &mut HashSet<i64>) {
        for child_id in parent.references(attr::HAS_EVENT) {
            let Some(child) = db.record(child_id) else {
                warn!(parent = parent.id(), event = child_id, "hasEvent references a missing record");
                continue;
            };
            let child_idx = self.index_of(child_id);
            if self.graph.find_edge(parent_idx, child_idx).is_none() {
                self.graph.add_edge(parent_idx, child_idx, ());
            }
            if !visited.insert(child_id) {
                continue;
            }
            self.order.push(child_id);
            if class::is_pathway(&child.schema_class) {
                self.pathways.insert(child_id);
                self.walk(db, child, child_idx, visited);
            }
        }
    }

    pub fn is_pathway(&self, id: i64) -> bool {
        self.pathways.contains(&id)
    }

    /// Descendant pathways in stored order.
    pub fn subpathways(&self) -> Vec<i64> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.is_pathway(*id))
            .collect()
    }

    /// Non-pathway events reachable from `id`, in stored order.
    pub fn closure(&self, id: i64) -> Vec<i64> {
        let Some(&start) = self.node_indices.get(&id) else {
            return vec![];
        };
        let mut reachable = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(nx) = dfs.next(&self.graph) {
            reachable.insert(self.graph[nx]);
        }
        self.order
            .iter()
            .copied()
            .filter(|e| *e != id && reachable.contains(e) && !self.is_pathway(*e))
            .collect()
    }
}
