pub mod knowledge_graph;
pub mod indexes;
pub mod synthetic;
pub mod tests;

pub use knowledge_graph::{GraphDocument, KnowledgeGraph, KnowledgeGraphBuilder, RolePlayer};
pub use indexes::ConceptIndexes;
