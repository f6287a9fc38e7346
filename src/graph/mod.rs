//! The node/edge data model shared by every engine component.

mod edge;
mod flow;
mod index;
mod node;

pub use edge::*;
pub use flow::*;
pub use index::*;
pub use node::*;

use crate::error::GraphError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// An immutable `{nodes, edges}` pair: the unit of undo history and of persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Snapshot {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        validate(&self.nodes, &self.edges)
    }
}

/// Checks the structural invariants of a graph: unique ids, parents that exist
/// and are groups, acyclic parent chains and edges between existing nodes.
pub fn validate(nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<(), GraphError> {
    let mut ids = AHashSet::with_capacity(nodes.len());
    for node in nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNodeId(node.id.clone()));
        }
    }

    let index = NodeIndex::new(nodes);
    for node in nodes {
        let Some(parent_id) = &node.parent_id else {
            continue;
        };
        let parent = index.get(parent_id).ok_or_else(|| GraphError::MissingParent {
            node_id: node.id.clone(),
            parent_id: parent_id.clone(),
        })?;
        if !parent.is_group() {
            return Err(GraphError::ParentNotGroup {
                node_id: node.id.clone(),
                parent_id: parent_id.clone(),
            });
        }
    }

    // Every parent exists at this point, so a chain ending on a parented node is a loop.
    for node in nodes.iter().filter(|n| n.parent_id.is_some()) {
        if index
            .outermost_ancestor(&node.id)
            .is_some_and(|root| root.parent_id.is_some())
        {
            return Err(GraphError::ParentCycle(node.id.clone()));
        }
    }

    let mut edge_ids = AHashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(GraphError::DuplicateEdgeId(edge.id.clone()));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !index.contains(endpoint) {
                return Err(GraphError::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}
