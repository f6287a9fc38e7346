//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to drive an editor session.
//!
//! # Example
//!
//! ```rust
//! use zukei::prelude::*;
//!
//! let nodes = vec![
//!     GraphNode::step("a", "A", Point::ORIGIN),
//!     GraphNode::step("b", "B", Point::ORIGIN),
//! ];
//! let edges = vec![GraphEdge::new("e1", "a", "b")];
//!
//! let engine = LayoutEngine::new(&EngineConfig::default());
//! let outcome = engine.layout(&nodes, &edges);
//! assert_eq!(outcome.column_of("b"), Some(1));
//! ```

// Engine components
pub use crate::containment::ContainmentEngine;
pub use crate::editor::{Clipboard, Editor, LayoutMode, LayoutReport};
pub use crate::history::HistoryManager;
pub use crate::layout::{LayoutEngine, LayoutOutcome, LayoutStatus};
pub use crate::project::Project;
pub use crate::remap::{IdGenerator, IdentityRemapper};

// Data model
pub use crate::config::EngineConfig;
pub use crate::graph::{
    Deliverable, Flow, GraphEdge, GraphNode, NodeKind, NodePayload, Point, Size, Snapshot,
};

// Error types
pub use crate::error::{EditError, GraphError, SnapshotError};
