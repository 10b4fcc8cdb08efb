use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use hashbrown::HashMap;
use indexmap::IndexSet;
use std::sync::Arc;
use crate::concept::{AttributeValue, ConceptInfo};
use crate::error::{GraphError, Result};
use crate::graph::KnowledgeGraph;
use crate::neighbourhood::{NeighbourEdge, NeighbourhoodTree};

/// Dense integer codes for a fixed vocabulary of labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEncoder {
    labels: IndexSet<String>,
}

impl TypeEncoder {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert<S: Into<String>>(&mut self, label: S) -> u32 {
        let (index, _) = self.labels.insert_full(label.into());
        index as u32
    }

    pub fn encode(&self, label: &str) -> Result<u32> {
        self.labels
            .get_index_of(label)
            .map(|index| index as u32)
            .ok_or_else(|| GraphError::invalid_parameter(format!("unknown label '{}'", label)))
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.labels.get_index(code as usize).map(String::as_str)
    }

    pub fn one_hot(&self, label: &str) -> Result<Vec<u8>> {
        let code = self.encode(label)? as usize;
        let mut encoding = vec![0u8; self.labels.len()];
        encoding[code] = 1;
        Ok(encoding)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Numeric form of an attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodedValue {
    /// Not an attribute, or its type has no registered encoding
    Unencoded,
    /// Index of the value among the categories of its type
    Categorical(u32),
    /// Value rescaled to the registered range, so `min` maps to 0 and `max` to 1
    Continuous(f64),
}

/// Per attribute type encodings of values, either as categories or as a numeric range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueEncoders {
    categorical: HashMap<String, TypeEncoder>,
    continuous: HashMap<String, (f64, f64)>,
}

impl ValueEncoders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode values of `type_label` by their position in `categories`
    pub fn categorical<T, I, S>(mut self, type_label: T, categories: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical.insert(type_label.into(), TypeEncoder::new(categories));
        self
    }

    /// Encode numeric values of `type_label` relative to `[min, max]`
    pub fn continuous<T: Into<String>>(mut self, type_label: T, min: f64, max: f64) -> Result<Self> {
        let type_label = type_label.into();
        if min.is_nan() || max.is_nan() || min > max {
            return Err(GraphError::invalid_parameter(format!(
                "range of '{}' is empty: min {} is above max {}",
                type_label, min, max
            )));
        }
        self.continuous.insert(type_label, (min, max));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty() && self.continuous.is_empty()
    }

    pub fn encode(&self, concept: &ConceptInfo) -> Result<EncodedValue> {
        let value = match &concept.value {
            Some(value) => value,
            None => return Ok(EncodedValue::Unencoded),
        };

        if let Some(categories) = self.categorical.get(&concept.type_label) {
            return categories.encode(&value.to_string()).map(EncodedValue::Categorical);
        }

        if let Some(&(min, max)) = self.continuous.get(&concept.type_label) {
            let number = match value {
                AttributeValue::Long(v) => *v as f64,
                AttributeValue::Double(v) => *v,
                other => {
                    return Err(GraphError::InvalidValue {
                        value: other.to_string(),
                        data_type: other.data_type().to_string(),
                    })
                }
            };
            let span = max - min;
            let scaled = if span > 0.0 { (number - min) / span } else { 0.0 };
            return Ok(EncodedValue::Continuous(scaled));
        }

        Ok(EncodedValue::Unencoded)
    }
}

/// Vocabularies for concept types and role labels, plus attribute value encodings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEncoders {
    pub concept_types: TypeEncoder,
    pub role_types: TypeEncoder,
    pub values: ValueEncoders,
}

impl TreeEncoders {
    /// Vocabularies covering every type and role present in `graph`
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        Self {
            concept_types: TypeEncoder::new(graph.type_labels()),
            role_types: TypeEncoder::new(graph.role_labels()),
            values: ValueEncoders::default(),
        }
    }

    pub fn with_values(mut self, values: ValueEncoders) -> Self {
        self.values = values;
        self
    }

    /// Vocabularies covering the labels seen in `trees`, in first-seen order
    pub fn from_trees(trees: &[NeighbourhoodTree]) -> Self {
        let mut encoders = Self::default();
        for tree in trees {
            encoders.observe(tree);
        }
        encoders
    }

    fn observe(&mut self, tree: &NeighbourhoodTree) {
        self.concept_types.insert(tree.concept.type_label.as_str());
        for edge in &tree.neighbourhood {
            self.role_types.insert(edge.role_label.as_str());
            self.observe(&edge.neighbour);
        }
    }
}

/// Schema of the per-depth batches produced by `encode_trees`
pub fn depth_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("example", DataType::UInt32, false),
        Field::new("parent", DataType::Int64, false),
        Field::new("role_type", DataType::UInt32, true),
        Field::new("role_direction", DataType::UInt8, true),
        Field::new("neighbour_type", DataType::UInt32, false),
        Field::new("base_type", DataType::Utf8, false),
        Field::new("data_type", DataType::Utf8, true),
        Field::new("value", DataType::Utf8, true),
        Field::new("categorical_value", DataType::UInt32, true),
        Field::new("continuous_value", DataType::Float64, true),
    ]))
}

struct Row<'t> {
    example: u32,
    parent: i64,
    edge: Option<&'t NeighbourEdge>,
    tree: &'t NeighbourhoodTree,
}

/// Flatten collected trees into one RecordBatch per depth.
///
/// `parent` is the row of the parent concept in the previous depth's batch and
/// is -1 for the roots. Role columns are null at depth 0. The categorical and
/// continuous value columns are null wherever `encoders.values` has no encoding.
pub fn encode_trees(trees: &[NeighbourhoodTree], encoders: &TreeEncoders) -> Result<Vec<RecordBatch>> {
    let mut level: Vec<Row<'_>> = trees
        .iter()
        .enumerate()
        .map(|(example, tree)| Row {
            example: example as u32,
            parent: -1,
            edge: None,
            tree,
        })
        .collect();

    let mut batches = Vec::new();

    while !level.is_empty() {
        batches.push(encode_level(&level, encoders)?);

        level = level
            .iter()
            .enumerate()
            .flat_map(|(row, parent)| {
                parent.tree.neighbourhood.iter().map(move |edge| Row {
                    example: parent.example,
                    parent: row as i64,
                    edge: Some(edge),
                    tree: &edge.neighbour,
                })
            })
            .collect();
    }

    log::debug!("Encoded {} trees into {} depth batches", trees.len(), batches.len());

    Ok(batches)
}

fn encode_level(level: &[Row<'_>], encoders: &TreeEncoders) -> Result<RecordBatch> {
    let role_types = level
        .iter()
        .map(|row| row.edge.map(|edge| encoders.role_types.encode(&edge.role_label)).transpose())
        .collect::<Result<Vec<Option<u32>>>>()?;

    let neighbour_types = level
        .iter()
        .map(|row| encoders.concept_types.encode(&row.tree.concept.type_label))
        .collect::<Result<Vec<u32>>>()?;

    let examples = UInt32Array::from_iter_values(level.iter().map(|row| row.example));
    let parents = Int64Array::from_iter_values(level.iter().map(|row| row.parent));
    let role_directions: UInt8Array = level
        .iter()
        .map(|row| row.edge.map(|edge| edge.role_direction.as_u8()))
        .collect();
    let base_types = StringArray::from_iter_values(level.iter().map(|row| row.tree.concept.base_type.as_str()));
    let data_types: StringArray = level
        .iter()
        .map(|row| row.tree.concept.data_type.map(|d| d.as_str()))
        .collect();
    let values: StringArray = level
        .iter()
        .map(|row| row.tree.concept.value.as_ref().map(|v| v.to_string()))
        .collect();
    let encoded = level
        .iter()
        .map(|row| encoders.values.encode(&row.tree.concept))
        .collect::<Result<Vec<EncodedValue>>>()?;
    let categorical: UInt32Array = encoded
        .iter()
        .map(|value| match value {
            EncodedValue::Categorical(index) => Some(*index),
            _ => None,
        })
        .collect();
    let continuous: Float64Array = encoded
        .iter()
        .map(|value| match value {
            EncodedValue::Continuous(scaled) => Some(*scaled),
            _ => None,
        })
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(examples),
        Arc::new(parents),
        Arc::new(UInt32Array::from(role_types)),
        Arc::new(role_directions),
        Arc::new(UInt32Array::from(neighbour_types)),
        Arc::new(base_types),
        Arc::new(data_types),
        Arc::new(values),
        Arc::new(categorical),
        Arc::new(continuous),
    ];

    Ok(RecordBatch::try_new(depth_schema(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use crate::concept::{AttributeValue, BaseType, ConceptInfo};
    use crate::neighbourhood::RoleDirection;

    fn sample_trees() -> Vec<NeighbourhoodTree> {
        let name = NeighbourhoodTree::leaf(ConceptInfo::attribute("N1", "name", AttributeValue::String("Ada".into())));
        let ownership = NeighbourhoodTree::leaf(ConceptInfo::new("R1", "has-name", BaseType::Relationship))
            .with_neighbour("value", RoleDirection::NeighbourPlays, name);
        let ada = NeighbourhoodTree::leaf(ConceptInfo::new("P1", "person", BaseType::Entity))
            .with_neighbour("owner", RoleDirection::TargetPlays, ownership);
        let bob = NeighbourhoodTree::leaf(ConceptInfo::new("P2", "person", BaseType::Entity));
        vec![ada, bob]
    }

    #[test]
    fn test_type_encoder_codes_and_one_hot() {
        let encoder = TypeEncoder::new(["person", "parentship", "siblingship", "person"]);
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.encode("siblingship").unwrap(), 2);
        assert_eq!(encoder.decode(1), Some("parentship"));
        assert_eq!(encoder.one_hot("person").unwrap(), vec![1, 0, 0]);
        assert_eq!(encoder.one_hot("parentship").unwrap(), vec![0, 1, 0]);
        assert!(matches!(encoder.encode("company"), Err(GraphError::InvalidParameter(_))));
    }

    #[test]
    fn test_encoders_from_trees() {
        let encoders = TreeEncoders::from_trees(&sample_trees());
        assert_eq!(encoders.concept_types.labels().collect::<Vec<_>>(), vec!["person", "has-name", "name"]);
        assert_eq!(encoders.role_types.labels().collect::<Vec<_>>(), vec!["owner", "value"]);
    }

    #[test]
    fn test_one_batch_per_depth() {
        let trees = sample_trees();
        let encoders = TreeEncoders::from_trees(&trees);
        let batches = encode_trees(&trees, &encoders).unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches.iter().map(RecordBatch::num_rows).collect::<Vec<_>>(), vec![2, 1, 1]);

        let roots = &batches[0];
        assert_eq!(roots.column_by_name("role_type").unwrap().null_count(), 2);
        let parents = roots.column_by_name("parent").unwrap().as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(parents.values().to_vec(), vec![-1, -1]);

        let depth_one = &batches[1];
        let directions = depth_one
            .column_by_name("role_direction").unwrap()
            .as_any().downcast_ref::<UInt8Array>().unwrap();
        assert_eq!(directions.value(0), 0);

        let leaves = &batches[2];
        let values = leaves.column_by_name("value").unwrap().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(values.value(0), "Ada");
        let types = leaves.column_by_name("neighbour_type").unwrap().as_any().downcast_ref::<UInt32Array>().unwrap();
        assert_eq!(types.value(0), 2);
        let data_types = leaves.column_by_name("data_type").unwrap().as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(data_types.value(0), "string");
    }

    #[test]
    fn test_unknown_label_fails_encoding() {
        let trees = sample_trees();
        let encoders = TreeEncoders {
            concept_types: TypeEncoder::new(["person"]),
            role_types: TypeEncoder::new(["owner", "value"]),
            ..TreeEncoders::default()
        };
        assert!(encode_trees(&trees, &encoders).is_err());
    }

    fn attribute_trees() -> Vec<NeighbourhoodTree> {
        let colour = NeighbourhoodTree::leaf(ConceptInfo::attribute("C1", "colour", AttributeValue::String("green".into())));
        let age = NeighbourhoodTree::leaf(ConceptInfo::attribute("A1", "age", AttributeValue::Long(30)));
        let height = NeighbourhoodTree::leaf(ConceptInfo::attribute("H1", "height", AttributeValue::Double(1.5)));
        let thing = NeighbourhoodTree::leaf(ConceptInfo::new("T1", "thing", BaseType::Entity))
            .with_neighbour("has", RoleDirection::TargetPlays, colour)
            .with_neighbour("has", RoleDirection::TargetPlays, age)
            .with_neighbour("has", RoleDirection::TargetPlays, height);
        vec![thing]
    }

    #[test]
    fn test_value_encoding() {
        let values = ValueEncoders::new()
            .categorical("colour", ["red", "green", "blue"])
            .continuous("age", 20.0, 60.0)
            .unwrap();

        let green = ConceptInfo::attribute("C1", "colour", AttributeValue::String("green".into()));
        assert_eq!(values.encode(&green).unwrap(), EncodedValue::Categorical(1));

        let age = ConceptInfo::attribute("A1", "age", AttributeValue::Long(30));
        assert_eq!(values.encode(&age).unwrap(), EncodedValue::Continuous(0.25));

        let purple = ConceptInfo::attribute("C2", "colour", AttributeValue::String("purple".into()));
        assert!(matches!(values.encode(&purple), Err(GraphError::InvalidParameter(_))));

        let text_age = ConceptInfo::attribute("A2", "age", AttributeValue::String("old".into()));
        assert!(matches!(values.encode(&text_age), Err(GraphError::InvalidValue { .. })));

        let person = ConceptInfo::new("P1", "person", BaseType::Entity);
        assert_eq!(values.encode(&person).unwrap(), EncodedValue::Unencoded);

        assert!(ValueEncoders::new().continuous("age", 5.0, 1.0).is_err());
        let flat = ValueEncoders::new().continuous("age", 30.0, 30.0).unwrap();
        assert_eq!(flat.encode(&age).unwrap(), EncodedValue::Continuous(0.0));
    }

    #[test]
    fn test_value_columns_in_batches() {
        let trees = attribute_trees();
        let values = ValueEncoders::new()
            .categorical("colour", ["red", "green"])
            .continuous("age", 0.0, 100.0)
            .unwrap();
        let encoders = TreeEncoders::from_trees(&trees).with_values(values);
        let batches = encode_trees(&trees, &encoders).unwrap();

        assert_eq!(batches.len(), 2);
        let roots = &batches[0];
        assert_eq!(roots.column_by_name("categorical_value").unwrap().null_count(), 1);
        assert_eq!(roots.column_by_name("continuous_value").unwrap().null_count(), 1);

        let leaves = &batches[1];
        let categorical = leaves
            .column_by_name("categorical_value").unwrap()
            .as_any().downcast_ref::<UInt32Array>().unwrap();
        assert!(categorical.is_valid(0));
        assert_eq!(categorical.value(0), 1);
        assert!(categorical.is_null(1));
        assert!(categorical.is_null(2));

        let continuous = leaves
            .column_by_name("continuous_value").unwrap()
            .as_any().downcast_ref::<Float64Array>().unwrap();
        assert!(continuous.is_null(0));
        assert_eq!(continuous.value(1), 0.3);
        // height has no registered encoding
        assert!(continuous.is_null(2));
    }

    #[test]
    fn test_no_trees_no_batches() {
        let batches = encode_trees(&[], &TreeEncoders::default()).unwrap();
        assert!(batches.is_empty());
    }
}
