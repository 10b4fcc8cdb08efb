use hashbrown::{HashMap, HashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use crate::concept::ConceptInfo;
use crate::neighbourhood::executor::RoleDirection;

/// Fully collected neighbourhood of a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighbourhoodTree {
    pub concept: ConceptInfo,
    pub neighbourhood: Vec<NeighbourEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighbourEdge {
    pub role_label: String,
    pub role_direction: RoleDirection,
    pub neighbour: NeighbourhoodTree,
}

/// Role edge in an exported graph, pointing from the player to the relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleEdge {
    pub role_label: String,
}

impl NeighbourhoodTree {
    pub fn leaf(concept: ConceptInfo) -> Self {
        Self {
            concept,
            neighbourhood: Vec::new(),
        }
    }

    pub fn push<S: Into<String>>(&mut self, role_label: S, role_direction: RoleDirection, neighbour: NeighbourhoodTree) {
        self.neighbourhood.push(NeighbourEdge {
            role_label: role_label.into(),
            role_direction,
            neighbour,
        });
    }

    pub fn with_neighbour<S: Into<String>>(mut self, role_label: S, role_direction: RoleDirection, neighbour: NeighbourhoodTree) -> Self {
        self.push(role_label, role_direction, neighbour);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.neighbourhood.is_empty()
    }

    /// Number of expansion steps along the deepest branch; a leaf has depth 0
    pub fn max_depth(&self) -> usize {
        self.neighbourhood
            .iter()
            .map(|edge| edge.neighbour.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .neighbourhood
            .iter()
            .map(|edge| edge.neighbour.node_count())
            .sum::<usize>()
    }

    /// Concepts found exactly `depth` steps from the root, left to right
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&ConceptInfo> {
        let mut level: Vec<&NeighbourhoodTree> = vec![self];
        for _ in 0..depth {
            level = level
                .into_iter()
                .flat_map(|tree| tree.neighbourhood.iter().map(|edge| &edge.neighbour))
                .collect();
        }
        level.into_iter().map(|tree| &tree.concept).collect()
    }

    /// Merge the tree into a directed graph with one node per distinct concept.
    ///
    /// Concepts revisited by the traversal share a node, and repeated role edges collapse.
    pub fn to_graph(&self) -> DiGraph<ConceptInfo, RoleEdge> {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut edges: HashSet<(NodeIndex, NodeIndex, String)> = HashSet::new();

        let root = node_for(&mut graph, &mut nodes, &self.concept);
        self.add_to_graph(root, &mut graph, &mut nodes, &mut edges);

        graph
    }

    fn add_to_graph(
        &self,
        index: NodeIndex,
        graph: &mut DiGraph<ConceptInfo, RoleEdge>,
        nodes: &mut HashMap<String, NodeIndex>,
        edges: &mut HashSet<(NodeIndex, NodeIndex, String)>,
    ) {
        for edge in &self.neighbourhood {
            let neighbour = node_for(graph, nodes, &edge.neighbour.concept);

            let (player, relationship) = match edge.role_direction {
                RoleDirection::TargetPlays => (index, neighbour),
                RoleDirection::NeighbourPlays => (neighbour, index),
            };

            if edges.insert((player, relationship, edge.role_label.clone())) {
                graph.add_edge(player, relationship, RoleEdge { role_label: edge.role_label.clone() });
            }

            edge.neighbour.add_to_graph(neighbour, graph, nodes, edges);
        }
    }
}

fn node_for(
    graph: &mut DiGraph<ConceptInfo, RoleEdge>,
    nodes: &mut HashMap<String, NodeIndex>,
    concept: &ConceptInfo,
) -> NodeIndex {
    *nodes
        .entry(concept.id.clone())
        .or_insert_with(|| graph.add_node(concept.clone()))
}
