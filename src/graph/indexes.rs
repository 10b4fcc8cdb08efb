use arrow::record_batch::RecordBatch;
use arrow::array::{Array, StringArray};
use hashbrown::HashMap;
use indexmap::IndexMap;
use crate::concept::{AttributeValue, BaseType, ConceptInfo, DataType};
use crate::error::{GraphError, Result};
use crate::graph::RolePlayer;

/// Lookup structures over the concepts and role-player rows of a knowledge graph.
///
/// Role-player lists keep the row order of the input batch, which is what the
/// ordered sampler relies on to be deterministic.
#[derive(Debug, Clone, Default)]
pub struct ConceptIndexes {
    pub concepts: IndexMap<String, ConceptInfo>,
    /// player id -> (role label, relationship id)
    pub roles_played: HashMap<String, Vec<(String, String)>>,
    /// relationship id -> (role label, player id)
    pub roleplayers: HashMap<String, Vec<(String, String)>>,
    pub role_player_count: usize,
}

impl ConceptIndexes {
    pub fn build(concepts: &RecordBatch, role_players: &RecordBatch) -> Result<Self> {
        let concepts = read_concepts(concepts)?;
        let role_players = read_role_players(role_players)?;
        Self::from_records(concepts, role_players)
    }

    pub fn from_records(concepts: Vec<ConceptInfo>, role_players: Vec<RolePlayer>) -> Result<Self> {
        let mut indexes = ConceptIndexes::default();

        for concept in concepts {
            if indexes.concepts.contains_key(&concept.id) {
                return Err(GraphError::graph_construction(format!(
                    "duplicate concept id '{}'",
                    concept.id
                )));
            }
            indexes.concepts.insert(concept.id.clone(), concept);
        }

        for rp in role_players {
            let relationship = indexes
                .concepts
                .get(&rp.relationship_id)
                .ok_or_else(|| GraphError::concept_not_found(rp.relationship_id.clone()))?;

            if !relationship.is_relationship() {
                return Err(GraphError::graph_construction(format!(
                    "concept '{}' is a {}, only relationships have role players",
                    rp.relationship_id, relationship.base_type
                )));
            }

            if !indexes.concepts.contains_key(&rp.player_id) {
                return Err(GraphError::concept_not_found(rp.player_id));
            }

            indexes
                .roles_played
                .entry(rp.player_id.clone())
                .or_default()
                .push((rp.role_label.clone(), rp.relationship_id.clone()));

            indexes
                .roleplayers
                .entry(rp.relationship_id)
                .or_default()
                .push((rp.role_label, rp.player_id));

            indexes.role_player_count += 1;
        }

        Ok(indexes)
    }

    pub fn concept(&self, concept_id: &str) -> Option<&ConceptInfo> {
        self.concepts.get(concept_id)
    }

    pub fn has_concept(&self, concept_id: &str) -> bool {
        self.concepts.contains_key(concept_id)
    }

    pub fn roles_played(&self, concept_id: &str) -> &[(String, String)] {
        self.roles_played.get(concept_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roleplayers(&self, relationship_id: &str) -> &[(String, String)] {
        self.roleplayers.get(relationship_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
    let column = batch.column_by_name(name).ok_or_else(|| {
        GraphError::graph_construction(format!("missing column '{}'", name))
    })?;

    column.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
        GraphError::graph_construction(format!("column '{}' must be String", name))
    })
}

fn optional_string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<Option<&'b StringArray>> {
    match batch.column_by_name(name) {
        Some(_) => string_column(batch, name).map(Some),
        None => Ok(None),
    }
}

fn required_value(array: &StringArray, row: usize, name: &str) -> Result<String> {
    if array.is_null(row) {
        return Err(GraphError::graph_construction(format!(
            "column '{}' has a null at row {}",
            name, row
        )));
    }
    Ok(array.value(row).to_string())
}

fn optional_value(array: Option<&StringArray>, row: usize) -> Option<&str> {
    array.filter(|a| !a.is_null(row)).map(|a| a.value(row))
}

/// Expected schema: id, type_label, base_type (String), [data_type, value (String, nullable)]
fn read_concepts(batch: &RecordBatch) -> Result<Vec<ConceptInfo>> {
    let ids = string_column(batch, "id")?;
    let type_labels = string_column(batch, "type_label")?;
    let base_types = string_column(batch, "base_type")?;
    let data_types = optional_string_column(batch, "data_type")?;
    let values = optional_string_column(batch, "value")?;

    let mut concepts = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let id = required_value(ids, row, "id")?;
        let type_label = required_value(type_labels, row, "type_label")?;
        let base_type: BaseType = required_value(base_types, row, "base_type")?
            .parse()
            .map_err(|e: GraphError| GraphError::graph_construction(e.to_string()))?;

        let concept = match (optional_value(data_types, row), optional_value(values, row)) {
            (Some(data_type), Some(raw)) => {
                let data_type: DataType = data_type
                    .parse()
                    .map_err(|e: GraphError| GraphError::graph_construction(e.to_string()))?;
                let value = AttributeValue::parse(data_type, raw)
                    .map_err(|e| GraphError::graph_construction(format!("row {}: {}", row, e)))?;
                ConceptInfo {
                    id,
                    type_label,
                    base_type,
                    data_type: Some(data_type),
                    value: Some(value),
                }
            }
            (None, None) => ConceptInfo::new(id, type_label, base_type),
            _ => {
                return Err(GraphError::graph_construction(format!(
                    "concept '{}' must carry both data_type and value, or neither",
                    id
                )))
            }
        };

        concepts.push(concept);
    }

    Ok(concepts)
}

/// Expected schema: relationship_id, role_label, player_id (String)
pub(crate) fn read_role_players(batch: &RecordBatch) -> Result<Vec<RolePlayer>> {
    let relationship_ids = string_column(batch, "relationship_id")?;
    let role_labels = string_column(batch, "role_label")?;
    let player_ids = string_column(batch, "player_id")?;

    (0..batch.num_rows())
        .map(|row| {
            Ok(RolePlayer {
                relationship_id: required_value(relationship_ids, row, "relationship_id")?,
                role_label: required_value(role_labels, row, "role_label")?,
                player_id: required_value(player_ids, row, "player_id")?,
            })
        })
        .collect()
}
