//! Small synthetic family graphs for experiments and tests.
//!
//! People are numbered first. Parentships follow, one per ordered pair of
//! distinct people, then siblingships, one per unordered pair. Every concept id
//! is its position in that sequence.

use hashbrown::HashMap;
use crate::concept::ConceptInfo;
use crate::error::{GraphError, Result};
use crate::graph::KnowledgeGraph;

pub const PERSON: &str = "person";
pub const PARENTSHIP: &str = "parentship";
pub const SIBLINGSHIP: &str = "siblingship";
pub const PARENT: &str = "parent";
pub const CHILD: &str = "child";
pub const SIBLING: &str = "sibling";

/// Build a family graph of `num_people` people where everyone is related to everyone
pub fn family_graph(num_people: usize) -> Result<KnowledgeGraph> {
    if num_people == 0 {
        return Err(GraphError::invalid_parameter("num_people must be greater than 0"));
    }

    let mut builder = KnowledgeGraph::builder();
    let mut next_id = 0usize;

    for _ in 0..num_people {
        builder = builder.entity(next_id.to_string(), PERSON);
        next_id += 1;
    }

    for parent in 0..num_people {
        for child in 0..num_people {
            if parent == child {
                continue;
            }
            let id = next_id.to_string();
            next_id += 1;
            builder = builder
                .relationship(id.clone(), PARENTSHIP)
                .role_player(id.clone(), PARENT, parent.to_string())
                .role_player(id, CHILD, child.to_string());
        }
    }

    for a in 0..num_people {
        for b in (a + 1)..num_people {
            let id = next_id.to_string();
            next_id += 1;
            builder = builder
                .relationship(id.clone(), SIBLINGSHIP)
                .role_player(id.clone(), SIBLING, a.to_string())
                .role_player(id, SIBLING, b.to_string());
        }
    }

    log::debug!("Generated family graph: {} people, {} concepts", num_people, next_id);

    builder.build()
}

/// Find the relationship of `relationship_type` whose players fill `roles` in order.
///
/// `roles[i]` must be played by `players[i]`; the relationship may not have any other players.
pub fn find_relationship<'g>(
    graph: &'g KnowledgeGraph,
    relationship_type: &str,
    roles: &[&str],
    players: &[&str],
) -> Result<Option<&'g ConceptInfo>> {
    if roles.len() != players.len() {
        return Err(GraphError::invalid_parameter(format!(
            "{} roles given for {} players",
            roles.len(),
            players.len()
        )));
    }

    let mut wanted: Vec<(&str, &str)> = roles.iter().copied().zip(players.iter().copied()).collect();
    wanted.sort_unstable();

    let found = graph.concepts_of_type(relationship_type).find(|relationship| {
        let mut actual: Vec<(&str, &str)> = graph
            .roleplayers(&relationship.id)
            .iter()
            .map(|(role, player)| (role.as_str(), player.as_str()))
            .collect();
        actual.sort_unstable();
        actual == wanted
    });

    Ok(found)
}

/// 0/1 labels on the concepts and role edges of a graph, used as model inputs or targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLabels {
    concepts: HashMap<String, u8>,
    /// relationship id -> label per role player, aligned with `KnowledgeGraph::roleplayers`
    role_players: HashMap<String, Vec<u8>>,
}

impl GraphLabels {
    /// People are labelled 1; every other concept and every role edge is labelled 0
    pub fn base(graph: &KnowledgeGraph) -> Self {
        let mut labels = Self::default();

        for concept in graph.indexes.concepts.values() {
            let label = u8::from(concept.type_label == PERSON);
            labels.concepts.insert(concept.id.clone(), label);

            let roleplayers = graph.roleplayers(&concept.id);
            if !roleplayers.is_empty() {
                labels.role_players.insert(concept.id.clone(), vec![0; roleplayers.len()]);
            }
        }

        labels
    }

    pub fn concept(&self, concept_id: &str) -> Option<u8> {
        self.concepts.get(concept_id).copied()
    }

    /// Label of the edge where `player_id` plays `role_label` in `relationship_id`
    pub fn role_player(&self, graph: &KnowledgeGraph, relationship_id: &str, role_label: &str, player_id: &str) -> Option<u8> {
        let position = graph
            .roleplayers(relationship_id)
            .iter()
            .position(|(role, player)| role == role_label && player == player_id)?;
        self.role_players.get(relationship_id)?.get(position).copied()
    }

    /// Label a relationship and all of its role edges 1
    pub fn mark_relationship(&mut self, graph: &KnowledgeGraph, relationship_id: &str) -> Result<()> {
        let relationship = graph
            .concept(relationship_id)
            .ok_or_else(|| GraphError::concept_not_found(relationship_id))?;

        if !relationship.is_relationship() {
            return Err(GraphError::invalid_parameter(format!(
                "concept '{}' is not a relationship",
                relationship_id
            )));
        }

        self.concepts.insert(relationship_id.to_string(), 1);
        self.role_players
            .insert(relationship_id.to_string(), vec![1; graph.roleplayers(relationship_id).len()]);

        Ok(())
    }

    /// Mark the parentship in which `parent` is the parent of `child`
    pub fn add_parentship(&mut self, graph: &KnowledgeGraph, parent: &str, child: &str) -> Result<()> {
        self.mark_found(graph, PARENTSHIP, &[PARENT, CHILD], &[parent, child])
    }

    /// Mark the siblingship between `a` and `b`
    pub fn add_siblingship(&mut self, graph: &KnowledgeGraph, a: &str, b: &str) -> Result<()> {
        self.mark_found(graph, SIBLINGSHIP, &[SIBLING, SIBLING], &[a, b])
    }

    fn mark_found(&mut self, graph: &KnowledgeGraph, relationship_type: &str, roles: &[&str], players: &[&str]) -> Result<()> {
        let relationship = find_relationship(graph, relationship_type, roles, players)?.ok_or_else(|| {
            GraphError::invalid_parameter(format!("no {} between {}", relationship_type, players.join(" and ")))
        })?;
        self.mark_relationship(graph, &relationship.id)
    }
}
