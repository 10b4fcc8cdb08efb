use arrow::record_batch::RecordBatch;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use crate::concept::{BaseType, ConceptInfo};
use crate::error::Result;
use crate::graph::ConceptIndexes;
use crate::graph::indexes::read_role_players;

/// One role-player row: `player_id` plays `role_label` in `relationship_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePlayer {
    pub relationship_id: String,
    pub role_label: String,
    pub player_id: String,
}

impl RolePlayer {
    pub fn new<R: Into<String>, L: Into<String>, P: Into<String>>(relationship_id: R, role_label: L, player_id: P) -> Self {
        Self {
            relationship_id: relationship_id.into(),
            role_label: role_label.into(),
            player_id: player_id.into(),
        }
    }
}

/// JSON interchange form of a knowledge graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub concepts: Vec<ConceptInfo>,
    pub role_players: Vec<RolePlayer>,
}

/// Knowledge graph held as Arrow tables of concepts and role players
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    pub concepts: RecordBatch,
    pub role_players: RecordBatch,
    pub indexes: ConceptIndexes,
}

impl KnowledgeGraph {
    /// Create a new graph from concepts and role-player RecordBatches
    pub fn new(concepts: RecordBatch, role_players: RecordBatch) -> Result<Self> {
        let indexes = ConceptIndexes::build(&concepts, &role_players)?;

        Ok(KnowledgeGraph {
            concepts,
            role_players,
            indexes,
        })
    }

    pub fn builder() -> KnowledgeGraphBuilder {
        KnowledgeGraphBuilder::default()
    }

    pub fn concepts_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("type_label", DataType::Utf8, false),
            Field::new("base_type", DataType::Utf8, false),
            Field::new("data_type", DataType::Utf8, true),
            Field::new("value", DataType::Utf8, true),
        ]))
    }

    pub fn role_players_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("relationship_id", DataType::Utf8, false),
            Field::new("role_label", DataType::Utf8, false),
            Field::new("player_id", DataType::Utf8, false),
        ]))
    }

    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let mut builder = Self::builder();
        builder.concepts = document.concepts;
        builder.role_players = document.role_players;
        builder.build()
    }

    pub fn to_document(&self) -> Result<GraphDocument> {
        Ok(GraphDocument {
            concepts: self.indexes.concepts.values().cloned().collect(),
            role_players: read_role_players(&self.role_players)?,
        })
    }

    /// Load a graph from a JSON `GraphDocument` file
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    pub fn concept(&self, concept_id: &str) -> Option<&ConceptInfo> {
        self.indexes.concept(concept_id)
    }

    pub fn has_concept(&self, concept_id: &str) -> bool {
        self.indexes.has_concept(concept_id)
    }

    pub fn concept_count(&self) -> usize {
        self.indexes.concepts.len()
    }

    pub fn role_player_count(&self) -> usize {
        self.indexes.role_player_count
    }

    /// (role label, relationship id) pairs for every role `concept_id` plays
    pub fn roles_played(&self, concept_id: &str) -> &[(String, String)] {
        self.indexes.roles_played(concept_id)
    }

    /// (role label, player id) pairs of a relationship
    pub fn roleplayers(&self, relationship_id: &str) -> &[(String, String)] {
        self.indexes.roleplayers(relationship_id)
    }

    pub fn concepts_of_type<'a>(&'a self, type_label: &str) -> impl Iterator<Item = &'a ConceptInfo> + 'a {
        let type_label = type_label.to_owned();
        self.indexes
            .concepts
            .values()
            .filter(move |c| c.type_label == type_label)
    }

    pub fn concept_ids(&self) -> impl Iterator<Item = &String> {
        self.indexes.concepts.keys()
    }

    /// Distinct concept type labels, in first-seen order
    pub fn type_labels(&self) -> Vec<String> {
        let labels: IndexSet<&str> = self
            .indexes
            .concepts
            .values()
            .map(|concept| concept.type_label.as_str())
            .collect();
        labels.into_iter().map(str::to_owned).collect()
    }

    /// Distinct role labels, in first-seen order
    pub fn role_labels(&self) -> Vec<String> {
        let labels: IndexSet<&str> = self
            .indexes
            .concepts
            .keys()
            .flat_map(|relationship_id| self.indexes.roleplayers(relationship_id))
            .map(|(role, _)| role.as_str())
            .collect();
        labels.into_iter().map(str::to_owned).collect()
    }
}

/// Programmatic construction of a `KnowledgeGraph`
#[derive(Debug, Default)]
pub struct KnowledgeGraphBuilder {
    concepts: Vec<ConceptInfo>,
    role_players: Vec<RolePlayer>,
}

impl KnowledgeGraphBuilder {
    pub fn concept(mut self, concept: ConceptInfo) -> Self {
        self.concepts.push(concept);
        self
    }

    pub fn entity<I: Into<String>, T: Into<String>>(self, id: I, type_label: T) -> Self {
        self.concept(ConceptInfo::new(id, type_label, BaseType::Entity))
    }

    pub fn relationship<I: Into<String>, T: Into<String>>(self, id: I, type_label: T) -> Self {
        self.concept(ConceptInfo::new(id, type_label, BaseType::Relationship))
    }

    pub fn role_player<R: Into<String>, L: Into<String>, P: Into<String>>(
        mut self,
        relationship_id: R,
        role_label: L,
        player_id: P,
    ) -> Self {
        self.role_players.push(RolePlayer::new(relationship_id, role_label, player_id));
        self
    }

    pub fn add_concept(&mut self, concept: ConceptInfo) -> &mut Self {
        self.concepts.push(concept);
        self
    }

    pub fn add_role_player(&mut self, role_player: RolePlayer) -> &mut Self {
        self.role_players.push(role_player);
        self
    }

    pub fn build(self) -> Result<KnowledgeGraph> {
        let concepts = concepts_batch(&self.concepts)?;
        let role_players = role_players_batch(&self.role_players)?;
        KnowledgeGraph::new(concepts, role_players)
    }
}

fn concepts_batch(concepts: &[ConceptInfo]) -> Result<RecordBatch> {
    let ids = StringArray::from_iter_values(concepts.iter().map(|c| c.id.as_str()));
    let type_labels = StringArray::from_iter_values(concepts.iter().map(|c| c.type_label.as_str()));
    let base_types = StringArray::from_iter_values(concepts.iter().map(|c| c.base_type.as_str()));
    let data_types: StringArray = concepts
        .iter()
        .map(|c| c.data_type.map(|d| d.as_str()))
        .collect();
    let values: StringArray = concepts
        .iter()
        .map(|c| c.value.as_ref().map(|v| v.to_string()))
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(ids),
        Arc::new(type_labels),
        Arc::new(base_types),
        Arc::new(data_types),
        Arc::new(values),
    ];

    Ok(RecordBatch::try_new(KnowledgeGraph::concepts_schema(), columns)?)
}

fn role_players_batch(role_players: &[RolePlayer]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(role_players.iter().map(|r| r.relationship_id.as_str()))),
        Arc::new(StringArray::from_iter_values(role_players.iter().map(|r| r.role_label.as_str()))),
        Arc::new(StringArray::from_iter_values(role_players.iter().map(|r| r.player_id.as_str()))),
    ];

    Ok(RecordBatch::try_new(KnowledgeGraph::role_players_schema(), columns)?)
}
