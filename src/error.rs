use thiserror::Error;

/// Invariant violations found while validating a node/edge graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node id '{0}' is used by more than one node")]
    DuplicateNodeId(String),

    #[error("Edge id '{0}' is used by more than one edge")]
    DuplicateEdgeId(String),

    #[error("Node '{node_id}' references parent '{parent_id}', which does not exist")]
    MissingParent { node_id: String, parent_id: String },

    #[error("Node '{node_id}' references parent '{parent_id}', which is not a group")]
    ParentNotGroup { node_id: String, parent_id: String },

    #[error("The parent chain of node '{0}' contains a cycle")]
    ParentCycle(String),

    #[error("Edge '{edge_id}' references node '{node_id}', which does not exist")]
    DanglingEdge { edge_id: String, node_id: String },
}

/// Reasons an editor action was declined. A declined action leaves the graph
/// and its history untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Grouping needs at least two top-level steps, but only {found} were selected")]
    NotEnoughNodes { found: usize },

    #[error("Nodes have not been measured yet: {}", .0.join(", "))]
    UnmeasuredNodes(Vec<String>),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("Node '{0}' is not a group")]
    NotAGroup(String),

    #[error("Node '{0}' is not a step and cannot hold deliverables")]
    NotAStep(String),

    #[error("Deliverable '{deliverable_id}' not found on node '{node_id}'")]
    DeliverableNotFound {
        node_id: String,
        deliverable_id: String,
    },

    #[error("Cannot connect node '{0}' to itself")]
    SelfConnection(String),

    #[error("Nodes '{source_id}' and '{target_id}' are already connected")]
    DuplicateConnection {
        source_id: String,
        target_id: String,
    },

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("The clipboard is empty")]
    EmptyClipboard,

    #[error("Flow '{0}' not found")]
    FlowNotFound(String),

    #[error("A project must keep at least one flow")]
    LastFlow,

    #[error("Invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
}

/// Errors raised at the persistence boundary when encoding or decoding graph state.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("Loaded graph is invalid: {0}")]
    Invalid(#[from] GraphError),
}

/// Errors that can occur when converting an external format into a `Flow`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised while loading an `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
