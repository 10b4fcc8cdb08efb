pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Graph construction error: {0}")]
    GraphConstruction(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Concept not found: {0}")]
    ConceptNotFound(String),

    #[error("Invalid attribute value '{value}' for data type {data_type}")]
    InvalidValue { value: String, data_type: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub fn graph_construction<S: Into<String>>(msg: S) -> Self {
        GraphError::GraphConstruction(msg.into())
    }

    pub fn query<S: Into<String>>(msg: S) -> Self {
        GraphError::Query(msg.into())
    }

    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        GraphError::InvalidParameter(msg.into())
    }

    pub fn concept_not_found<S: Into<String>>(concept_id: S) -> Self {
        GraphError::ConceptNotFound(concept_id.into())
    }
}
