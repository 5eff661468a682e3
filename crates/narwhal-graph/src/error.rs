#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("edge {edge_id} references a missing node: {node_id}")]
    MissingEndpoint { edge_id: String, node_id: String },

    #[error("node {node_id} references a missing parent: {parent_id}")]
    MissingParent { node_id: String, parent_id: String },

    #[error("node {node_id} is its own ancestor")]
    ParentCycle { node_id: String },

    #[error("duplicate edge id: {edge_id}")]
    DuplicateEdge { edge_id: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
