//! Dependency graphs over the resource universe.
//!
//! Two directed graphs are built over the same node set (every loaded
//! resource): the *containment graph* (parent owns child, a forest by
//! construction) and the *link graph* (referencer depends on
//! referenced, from resolved `href`/`url(...)` references). Their
//! union, the *full dependency graph*, drives cycle detection and
//! closure computation.
//!
//! The wrapper keeps an explicit node map so the same resource is never
//! added twice, suppresses duplicate edges, and preserves insertion
//! order — graph construction iterates resources in load order, so
//! every derived ordering (DFS, toposort) is deterministic.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::resource::ResourceId;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// A directed graph over resources with stable insertion order.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    graph: DiGraph<ResourceId, ()>,
    node_map: HashMap<ResourceId, NodeIndex>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if it doesn't already exist, returning its index.
    fn ensure_node(&mut self, node: ResourceId) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node);
            self.node_map.insert(node, index);
            index
        }
    }

    /// Adds an isolated node. Used to give every resource a presence in
    /// the graph even when it has no edges.
    pub fn add_node(&mut self, node: ResourceId) {
        self.ensure_node(node);
    }

    /// Adds a `from` → `to` dependency edge, suppressing duplicates.
    pub fn add_edge(&mut self, from: ResourceId, to: ResourceId) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);
        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, node: ResourceId) -> bool {
        self.node_map.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> Vec<ResourceId> {
        self.graph.node_indices().map(|idx| self.graph[idx]).collect()
    }

    /// Direct successors of a node, in edge insertion order.
    pub fn direct_deps(&self, node: ResourceId) -> Vec<ResourceId> {
        match self.node_map.get(&node) {
            // petgraph yields neighbors most-recent-first; reverse to
            // restore insertion order.
            Some(&idx) => {
                let mut deps: Vec<_> = self.graph.neighbors(idx).map(|i| self.graph[i]).collect();
                deps.reverse();
                deps
            }
            None => Vec::new(),
        }
    }

    /// Detects a cycle using DFS with colors. Returns one offending
    /// cycle path, first node repeated at the end, or `None` when the
    /// graph is acyclic.
    pub fn detect_cycle(&self) -> Option<Vec<ResourceId>> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            colors.insert(node, Color::White);
        }

        for node in self.graph.node_indices() {
            if colors.get(&node) == Some(&Color::White)
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                return Some(cycle.into_iter().map(|idx| self.graph[idx]).collect());
            }
        }
        None
    }

    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    // Found a cycle; slice the path from where it starts.
                    let cycle_start = path
                        .iter()
                        .position(|n| *n == neighbor)
                        .unwrap_or_default();
                    let mut cycle = path[cycle_start..].to_vec();
                    // Repeat the entry node to show the cycle closes.
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Topological order with dependencies first. `None` if the graph
    /// has a cycle (callers check cycles beforehand).
    pub fn topological_order(&self) -> Option<Vec<ResourceId>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Some(indices.into_iter().rev().map(|idx| self.graph[idx]).collect()),
            Err(_) => None,
        }
    }

    /// Everything reachable from `start` (excluding `start` itself,
    /// unless it sits on a cycle through itself). BFS.
    pub fn descendants(&self, start: ResourceId) -> HashSet<ResourceId> {
        let mut reached = HashSet::new();
        let mut queue = VecDeque::new();

        if let Some(&start_idx) = self.node_map.get(&start) {
            queue.push_back(start_idx);
            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors(current) {
                    if reached.insert(self.graph[neighbor]) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        reached
    }

    /// Union of two graphs: all nodes and edges of `self`, then all of
    /// `other`, insertion orders preserved in that sequence.
    pub fn compose(&self, other: &ResourceGraph) -> ResourceGraph {
        let mut composed = ResourceGraph::new();
        for graph in [self, other] {
            for idx in graph.graph.node_indices() {
                composed.add_node(graph.graph[idx]);
            }
            for edge in graph.graph.edge_indices() {
                if let Some((a, b)) = graph.graph.edge_endpoints(edge) {
                    composed.add_edge(graph.graph[a], graph.graph[b]);
                }
            }
        }
        composed
    }

    /// Renders the dependency tree under `root` as indented text, with
    /// `label` naming each node. Repeated nodes are marked instead of
    /// re-expanded.
    pub fn to_tree_string(&self, root: ResourceId, label: &dyn Fn(ResourceId) -> String) -> String {
        let mut result = String::new();
        let mut visited = HashSet::new();
        result.push_str(&label(root));
        result.push('\n');
        visited.insert(root);
        let deps = self.direct_deps(root);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(*dep, &mut result, "", i == deps.len() - 1, label, &mut visited);
        }
        result
    }

    fn build_tree_string(
        &self,
        node: ResourceId,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        label: &dyn Fn(ResourceId) -> String,
        visited: &mut HashSet<ResourceId>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        result.push_str(&format!("{}{}{}\n", prefix, connector, label(node)));

        if !visited.insert(node) {
            let child_prefix = if is_last {
                format!("{prefix}    ")
            } else {
                format!("{prefix}│   ")
            };
            result.push_str(&format!("{child_prefix}└── (repeated)\n"));
            return;
        }

        let deps = self.direct_deps(node);
        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(*dep, result, &child_prefix, i == deps.len() - 1, label, visited);
        }
    }
}
