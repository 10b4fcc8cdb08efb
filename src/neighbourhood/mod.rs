pub mod executor;
pub mod sampling;
pub mod traversal;
pub mod tree;

pub use executor::{
    GraphExecutor, MockExecutor, Neighbour, NeighbourIter, QueryDirection, QueryTemplate, RoleDirection,
    TraversalExecutor,
};
pub use sampling::{concept_salt, OrderedSampling, Sampler, SamplingMethod, SamplingStrategy, SeededRandomSampling};
pub use traversal::{collect_to_tree, ConceptWithNeighbourhood, Neighbourhood, NeighbourRole, NeighbourhoodTraverser};
pub use tree::{NeighbourEdge, NeighbourhoodTree, RoleEdge};
