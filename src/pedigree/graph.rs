use crate::error::{Result, SuccessionError};
use crate::types::{ComputationState, Person};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use tracing::debug;

/// Pedigree as a directed parent -> child graph, one vertex per name.
///
/// Vertices are created on first reference and reused afterwards through the
/// name map. Every recorded relationship adds two edges, and repeated records
/// add parallel edges rather than being collapsed.
#[derive(Debug, Default)]
pub struct RelatednessGraph {
    graph: DiGraph<Person, ()>,
    node_map: HashMap<String, NodeIndex>,
    founder: Option<String>,
    state: ComputationState,
}

impl RelatednessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph, parallel edges included
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_computed(&self) -> bool {
        self.state == ComputationState::Computed
    }

    pub fn founder(&self) -> Option<&str> {
        self.founder.as_deref()
    }

    /// Record that `child` descends from `parent_a` and `parent_b`.
    pub fn add_relationship(&mut self, child: &str, parent_a: &str, parent_b: &str) -> Result<()> {
        self.ensure_mutable()?;

        let a = self.ensure_vertex(parent_a);
        let c = self.ensure_vertex(child);
        self.graph.add_edge(a, c, ());
        let b = self.ensure_vertex(parent_b);
        self.graph.add_edge(b, c, ());

        debug!("Added relationship {} <- ({}, {})", child, parent_a, parent_b);
        Ok(())
    }

    /// Designate the vertex relatedness is measured from.
    ///
    /// The vertex itself is materialized when propagation starts, so naming the
    /// founder early does not change vertex order.
    pub fn set_founder(&mut self, name: &str) -> Result<()> {
        self.ensure_mutable()?;
        self.founder = Some(name.to_string());
        Ok(())
    }

    /// All vertices in first-insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Person> + '_ {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    fn vertex(&self, name: &str) -> Option<&Person> {
        self.node_map.get(name).map(|&index| &self.graph[index])
    }

    pub fn relatedness(&self, name: &str) -> Option<f64> {
        self.vertex(name).map(Person::relatedness)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Names of the direct children of `name`, one entry per edge
    pub fn children_of(&self, name: &str) -> Vec<String> {
        self.node_map
            .get(name)
            .map(|&index| {
                self.children(index)
                    .into_iter()
                    .map(|child| self.graph[child].name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let mut root_vertices = 0;
        let mut leaf_vertices = 0;

        for index in self.graph.node_indices() {
            if self.graph.neighbors_directed(index, Direction::Incoming).next().is_none() {
                root_vertices += 1;
            }
            if self.graph.neighbors_directed(index, Direction::Outgoing).next().is_none() {
                leaf_vertices += 1;
            }
        }

        GraphStatistics {
            total_vertices: self.node_count(),
            total_edges: self.edge_count(),
            root_vertices,
            leaf_vertices,
        }
    }

    pub(crate) fn inner(&self) -> &DiGraph<Person, ()> {
        &self.graph
    }

    pub(crate) fn person(&self, index: NodeIndex) -> &Person {
        &self.graph[index]
    }

    pub(crate) fn person_mut(&mut self, index: NodeIndex) -> &mut Person {
        &mut self.graph[index]
    }

    /// Outgoing neighbours in edge insertion order, repeated for parallel edges.
    pub(crate) fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks a node's edge list newest first
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .collect();
        children.reverse();
        children
    }

    /// Resolve the founder vertex and reset its coefficient to 1.0.
    pub(crate) fn prepare_founder(&mut self) -> Result<NodeIndex> {
        let name = self.founder.clone().ok_or(SuccessionError::FounderNotSet)?;
        let index = self.ensure_vertex(&name);
        self.graph[index].set_relatedness(1.0);
        Ok(index)
    }

    pub(crate) fn mark_computed(&mut self) {
        self.state = ComputationState::Computed;
    }

    fn ensure_vertex(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(name) {
            return index;
        }
        let index = self.graph.add_node(Person::new(name, 0.0));
        self.node_map.insert(name.to_string(), index);
        index
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_computed() {
            return Err(SuccessionError::AlreadyComputed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
    pub total_vertices: usize,
    pub total_edges: usize,
    pub root_vertices: usize,
    pub leaf_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> RelatednessGraph {
        // F + X -> C, F + Y -> X
        let mut graph = RelatednessGraph::new();
        graph.set_founder("F").unwrap();
        graph.add_relationship("C", "F", "X").unwrap();
        graph.add_relationship("X", "F", "Y").unwrap();
        graph
    }

    fn names(graph: &RelatednessGraph) -> Vec<&str> {
        graph.vertices().map(Person::name).collect()
    }

    #[test]
    fn test_vertices_deduplicated_by_name() {
        let graph = create_test_graph();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.contains("X"));
        assert!(!graph.contains("Z"));
    }

    #[test]
    fn test_vertex_order_is_first_reference() {
        let graph = create_test_graph();
        assert_eq!(names(&graph), vec!["F", "C", "X", "Y"]);

        // Iteration restarts from the beginning each time
        assert_eq!(names(&graph), vec!["F", "C", "X", "Y"]);
    }

    #[test]
    fn test_duplicate_relationship_adds_parallel_edges() {
        let mut graph = RelatednessGraph::new();
        graph.add_relationship("C", "A", "B").unwrap();
        graph.add_relationship("C", "A", "B").unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.children_of("A"), vec!["C".to_string(), "C".to_string()]);
        assert_eq!(graph.children_of("B"), vec!["C".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let mut graph = RelatednessGraph::new();
        graph.add_relationship("B1", "P", "Q").unwrap();
        graph.add_relationship("B2", "P", "Q").unwrap();
        graph.add_relationship("B3", "P", "R").unwrap();

        assert_eq!(graph.children_of("P"), vec!["B1", "B2", "B3"]);
        assert!(graph.children_of("missing").is_empty());
    }

    #[test]
    fn test_founder_does_not_create_vertex_until_propagation() {
        let mut graph = RelatednessGraph::new();
        graph.set_founder("Solo").unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.founder(), Some("Solo"));

        let index = graph.prepare_founder().unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.person(index).relatedness(), 1.0);
    }

    #[test]
    fn test_prepare_founder_requires_founder() {
        let mut graph = RelatednessGraph::new();
        assert!(matches!(
            graph.prepare_founder(),
            Err(SuccessionError::FounderNotSet)
        ));
    }

    #[test]
    fn test_computed_graph_is_frozen() {
        let mut graph = create_test_graph();
        graph.mark_computed();

        assert_eq!(graph.state, ComputationState::Computed);
        assert!(matches!(
            graph.add_relationship("Z", "F", "Y"),
            Err(SuccessionError::AlreadyComputed)
        ));
        assert!(matches!(
            graph.set_founder("Y"),
            Err(SuccessionError::AlreadyComputed)
        ));
    }

    #[test]
    fn test_statistics() {
        let graph = create_test_graph();
        let stats = graph.statistics();

        assert_eq!(stats.total_vertices, 4);
        assert_eq!(stats.total_edges, 4);
        // F and Y have no parents; C has no children
        assert_eq!(stats.root_vertices, 2);
        assert_eq!(stats.leaf_vertices, 1);
    }
}
