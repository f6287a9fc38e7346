use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A directed connection between two nodes.
///
/// Edges never influence containment bounds; they are the only input the
/// layout engine orders columns by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: String::new(),
            color: None,
            icon: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Whether the edge renders an annotation that needs horizontal room.
    pub fn is_annotated(&self) -> bool {
        !self.label.trim().is_empty() || self.icon.as_deref().is_some_and(|i| !i.is_empty())
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
