use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{GraphError, Result};

/// Meta type of a concept, as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Entity,
    Relationship,
    Attribute,
    Role,
    Type,
}

impl BaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::Entity => "entity",
            BaseType::Relationship => "relationship",
            BaseType::Attribute => "attribute",
            BaseType::Role => "role",
            BaseType::Type => "type",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "entity" => Ok(BaseType::Entity),
            "relationship" | "relation" => Ok(BaseType::Relationship),
            "attribute" => Ok(BaseType::Attribute),
            "role" => Ok(BaseType::Role),
            "type" => Ok(BaseType::Type),
            other => Err(GraphError::invalid_parameter(format!("unknown base type '{}'", other))),
        }
    }
}

/// Value type of an attribute concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Long,
    Double,
    Boolean,
    Date,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "long" => Ok(DataType::Long),
            "double" => Ok(DataType::Double),
            "boolean" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            other => Err(GraphError::invalid_parameter(format!("unknown data type '{}'", other))),
        }
    }
}

/// Typed value held by an attribute. Dates are kept in their ISO-8601 text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeValue {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(String),
}

impl AttributeValue {
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::String(_) => DataType::String,
            AttributeValue::Long(_) => DataType::Long,
            AttributeValue::Double(_) => DataType::Double,
            AttributeValue::Boolean(_) => DataType::Boolean,
            AttributeValue::Date(_) => DataType::Date,
        }
    }

    /// Parse a raw textual value according to `data_type`
    pub fn parse(data_type: DataType, raw: &str) -> Result<Self> {
        let invalid = || GraphError::InvalidValue {
            value: raw.to_string(),
            data_type: data_type.to_string(),
        };

        match data_type {
            DataType::String => Ok(AttributeValue::String(raw.to_string())),
            DataType::Long => raw.trim().parse().map(AttributeValue::Long).map_err(|_| invalid()),
            DataType::Double => raw.trim().parse().map(AttributeValue::Double).map_err(|_| invalid()),
            DataType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(AttributeValue::Boolean(true)),
                "false" => Ok(AttributeValue::Boolean(false)),
                _ => Err(invalid()),
            },
            DataType::Date => {
                if raw.trim().is_empty() {
                    Err(invalid())
                } else {
                    Ok(AttributeValue::Date(raw.trim().to_string()))
                }
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(v) | AttributeValue::Date(v) => f.write_str(v),
            AttributeValue::Long(v) => write!(f, "{}", v),
            AttributeValue::Double(v) => write!(f, "{}", v),
            AttributeValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

/// Plain description of a graph concept: identity, type and, for attributes, the value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptInfo {
    pub id: String,
    pub type_label: String,
    pub base_type: BaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
}

impl ConceptInfo {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, type_label: T, base_type: BaseType) -> Self {
        Self {
            id: id.into(),
            type_label: type_label.into(),
            base_type,
            data_type: None,
            value: None,
        }
    }

    pub fn attribute<I: Into<String>, T: Into<String>>(id: I, type_label: T, value: AttributeValue) -> Self {
        Self {
            id: id.into(),
            type_label: type_label.into(),
            base_type: BaseType::Attribute,
            data_type: Some(value.data_type()),
            value: Some(value),
        }
    }

    pub fn is_relationship(&self) -> bool {
        self.base_type == BaseType::Relationship
    }

    pub fn is_attribute(&self) -> bool {
        self.base_type == BaseType::Attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_parsing_accepts_relation_alias() {
        assert_eq!("RELATION".parse::<BaseType>().unwrap(), BaseType::Relationship);
        assert_eq!("relationship".parse::<BaseType>().unwrap(), BaseType::Relationship);
        assert_eq!("Entity".parse::<BaseType>().unwrap(), BaseType::Entity);
        assert!("thing".parse::<BaseType>().is_err());
    }

    #[test]
    fn test_attribute_value_parsing() {
        assert_eq!(AttributeValue::parse(DataType::Long, " 42").unwrap(), AttributeValue::Long(42));
        assert_eq!(AttributeValue::parse(DataType::Double, "0.5").unwrap(), AttributeValue::Double(0.5));
        assert_eq!(AttributeValue::parse(DataType::Boolean, "True").unwrap(), AttributeValue::Boolean(true));
        assert!(matches!(
            AttributeValue::parse(DataType::Long, "forty"),
            Err(GraphError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_attribute_constructor_sets_data_type() {
        let name = ConceptInfo::attribute("V1", "name", AttributeValue::String("Sundar".into()));
        assert!(name.is_attribute());
        assert_eq!(name.data_type, Some(DataType::String));
        assert_eq!(name.value.as_ref().map(|v| v.to_string()), Some("Sundar".to_string()));
    }

    #[test]
    fn test_equality_covers_all_fields() {
        let a = ConceptInfo::new("0", "person", BaseType::Entity);
        let b = ConceptInfo::new("0", "person", BaseType::Entity);
        let c = ConceptInfo::new("0", "person", BaseType::Relationship);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serde_omits_empty_attribute_fields() {
        let person = ConceptInfo::new("0", "person", BaseType::Entity);
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["base_type"], "entity");
        assert!(json.get("value").is_none());

        let back: ConceptInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, person);
    }
}
