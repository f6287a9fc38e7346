use super::{GraphEdge, GraphNode, Snapshot};
use serde::{Deserialize, Serialize};

/// The value type of a custom property field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Select { options: Vec<String> },
}

/// Declares a custom property that nodes of a flow may carry in their metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

/// A named, independent graph. Only one flow of a project is bound to the
/// canvas at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub title: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default)]
    pub field_schema: Vec<FieldDefinition>,
}

impl Flow {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            field_schema: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.nodes.clone(), self.edges.clone())
    }

    /// Overwrites the flow's graph with a canvas snapshot.
    pub fn store(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
    }
}
