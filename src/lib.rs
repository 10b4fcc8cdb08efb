pub mod concept;
pub mod config;
pub mod error;
pub mod graph;
pub mod ml;
pub mod neighbourhood;

pub use concept::{AttributeValue, BaseType, ConceptInfo, DataType};
pub use config::TraversalConfig;
pub use graph::{GraphDocument, KnowledgeGraph, KnowledgeGraphBuilder, RolePlayer};
pub use graph::synthetic::GraphLabels;
pub use neighbourhood::{
    collect_to_tree, ConceptWithNeighbourhood, GraphExecutor, MockExecutor, Neighbour, NeighbourRole,
    NeighbourhoodTraverser, NeighbourhoodTree, QueryDirection, RoleDirection, Sampler, SamplingMethod,
    SamplingStrategy, TraversalExecutor,
};
pub use ml::{encode_trees, EncodedValue, TreeEncoders, TypeEncoder, ValueEncoders};
pub use error::{GraphError, Result};

pub mod prelude {
    pub use crate::concept::{AttributeValue, BaseType, ConceptInfo, DataType};
    pub use crate::config::TraversalConfig;
    pub use crate::graph::{synthetic, GraphDocument, KnowledgeGraph, RolePlayer};
    pub use crate::neighbourhood::{
        collect_to_tree, GraphExecutor, NeighbourhoodTraverser, NeighbourhoodTree, QueryDirection, RoleDirection,
        Sampler, SamplingStrategy, TraversalExecutor,
    };
    pub use crate::ml::{encode_trees, TreeEncoders, ValueEncoders};
    pub use crate::error::{GraphError, Result};
}
