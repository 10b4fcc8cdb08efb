use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use crate::concept::ConceptInfo;
use crate::error::{GraphError, Result};
use crate::graph::KnowledgeGraph;

/// Which side of a role relationship a query looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDirection {
    /// Relationships in which the concept plays a role
    RolesPlayed,
    /// Players of the roles of a relationship concept
    Roleplayers,
}

/// Who plays the role connecting a target concept to its neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleDirection {
    /// The target plays a role in the neighbour (the neighbour is a relationship)
    TargetPlays,
    /// The neighbour plays a role in the target (the target is a relationship)
    NeighbourPlays,
}

impl RoleDirection {
    pub fn as_u8(&self) -> u8 {
        match self {
            RoleDirection::TargetPlays => 0,
            RoleDirection::NeighbourPlays => 1,
        }
    }
}

/// A neighbour reached through a single role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbour {
    pub role_label: String,
    pub role_direction: RoleDirection,
    pub neighbour: ConceptInfo,
}

impl Neighbour {
    pub fn new<S: Into<String>>(role_label: S, role_direction: RoleDirection, neighbour: ConceptInfo) -> Self {
        Self {
            role_label: role_label.into(),
            role_direction,
            neighbour,
        }
    }
}

pub type NeighbourIter<'a> = Box<dyn Iterator<Item = Result<Neighbour>> + 'a>;

/// Issues one neighbourhood query for a concept and streams the answers
pub trait TraversalExecutor: Send + Sync {
    fn execute(&self, direction: QueryDirection, concept: &ConceptInfo) -> Result<NeighbourIter<'_>>;
}

impl<E: TraversalExecutor + ?Sized> TraversalExecutor for &E {
    fn execute(&self, direction: QueryDirection, concept: &ConceptInfo) -> Result<NeighbourIter<'_>> {
        (**self).execute(direction, concept)
    }
}

/// Query text plus the answer variables that hold the role and the neighbour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub query: String,
    pub role_variable: String,
    pub neighbour_variable: String,
    pub role_direction: RoleDirection,
}

impl QueryTemplate {
    pub fn roles_played() -> Self {
        Self {
            query: "match $x id {}; $relationship($role: $x); get $relationship, $role;".to_string(),
            role_variable: "role".to_string(),
            neighbour_variable: "relationship".to_string(),
            role_direction: RoleDirection::TargetPlays,
        }
    }

    pub fn roleplayers() -> Self {
        Self {
            query: "match $relationship id {}; $relationship($role: $x) isa {}; get $x, $role;".to_string(),
            role_variable: "role".to_string(),
            neighbour_variable: "x".to_string(),
            role_direction: RoleDirection::NeighbourPlays,
        }
    }

    /// Fill each `{}` slot with the next argument. Surplus arguments are ignored.
    pub fn render(&self, args: &[&str]) -> Result<String> {
        let mut pieces = self.query.split("{}");
        let mut rendered = String::with_capacity(self.query.len() + args.iter().map(|a| a.len()).sum::<usize>());
        let mut args = args.iter();

        if let Some(head) = pieces.next() {
            rendered.push_str(head);
        }

        for piece in pieces {
            let arg = args.next().ok_or_else(|| {
                GraphError::invalid_parameter(format!("not enough arguments to render '{}'", self.query))
            })?;
            rendered.push_str(arg);
            rendered.push_str(piece);
        }

        Ok(rendered)
    }
}

/// Executes neighbourhood queries against an in-memory `KnowledgeGraph`
#[derive(Debug, Clone)]
pub struct GraphExecutor<'g> {
    graph: &'g KnowledgeGraph,
    roles_played_query: QueryTemplate,
    roleplayers_query: QueryTemplate,
}

impl<'g> GraphExecutor<'g> {
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        Self::with_templates(graph, QueryTemplate::roles_played(), QueryTemplate::roleplayers())
    }

    pub fn with_templates(
        graph: &'g KnowledgeGraph,
        roles_played_query: QueryTemplate,
        roleplayers_query: QueryTemplate,
    ) -> Self {
        Self {
            graph,
            roles_played_query,
            roleplayers_query,
        }
    }

    pub fn graph(&self) -> &'g KnowledgeGraph {
        self.graph
    }

    fn neighbours(
        &self,
        pairs: &'g [(String, String)],
        role_direction: RoleDirection,
    ) -> NeighbourIter<'g> {
        let graph = self.graph;
        Box::new(pairs.iter().map(move |(role_label, neighbour_id)| -> Result<Neighbour> {
            let neighbour = graph
                .concept(neighbour_id)
                .cloned()
                .ok_or_else(|| GraphError::concept_not_found(neighbour_id.clone()))?;
            Ok(Neighbour::new(role_label.clone(), role_direction, neighbour))
        }))
    }
}

impl TraversalExecutor for GraphExecutor<'_> {
    fn execute(&self, direction: QueryDirection, concept: &ConceptInfo) -> Result<NeighbourIter<'_>> {
        if !self.graph.has_concept(&concept.id) {
            return Err(GraphError::concept_not_found(concept.id.clone()));
        }

        match direction {
            QueryDirection::RolesPlayed => {
                let query = self.roles_played_query.render(&[concept.id.as_str()])?;
                log::debug!("{}", query);
                Ok(self.neighbours(self.graph.roles_played(&concept.id), self.roles_played_query.role_direction))
            }
            QueryDirection::Roleplayers => {
                let query = self.roleplayers_query.render(&[concept.id.as_str(), concept.type_label.as_str()])?;
                log::debug!("{}", query);
                if !concept.is_relationship() {
                    return Ok(Box::new(std::iter::empty()));
                }
                Ok(self.neighbours(self.graph.roleplayers(&concept.id), self.roleplayers_query.role_direction))
            }
        }
    }
}

/// Executor answering from a fixed table of responses keyed by direction and concept id
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    responses: HashMap<(QueryDirection, String), Vec<Neighbour>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response<S: Into<String>>(mut self, direction: QueryDirection, concept_id: S, neighbours: Vec<Neighbour>) -> Self {
        self.responses.insert((direction, concept_id.into()), neighbours);
        self
    }
}

impl TraversalExecutor for MockExecutor {
    fn execute(&self, direction: QueryDirection, concept: &ConceptInfo) -> Result<NeighbourIter<'_>> {
        match self.responses.get(&(direction, concept.id.clone())) {
            Some(neighbours) => Ok(Box::new(neighbours.iter().cloned().map(Ok::<Neighbour, GraphError>))),
            None => Ok(Box::new(std::iter::empty())),
        }
    }
}
