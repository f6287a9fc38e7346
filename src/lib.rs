//! # Zukei - Graph State Engine for Diagram Editors
//!
//! **Zukei** keeps the node/edge graph of a diagram editor consistent while it
//! is edited. The rendering surface owns drawing and interaction; Zukei takes
//! the node and edge arrays it reports, applies user actions, and hands back
//! new arrays that satisfy the editor's invariants.
//!
//! ## Components
//!
//! 1.  **Geometry** ([`geometry`]): effective node sizes and bounds, usable
//!     before the surface has measured anything.
//! 2.  **Containment** ([`containment`]): groups always wrap their children
//!     plus padding, and re-fitting a group never moves a child on screen.
//! 3.  **Layout** ([`layout`]): topological column placement of top-level
//!     nodes, with cycles degraded into a final column instead of failing.
//! 4.  **Remapping** ([`remap`]): fresh identities for copied subtrees that
//!     keep parent links intact.
//! 5.  **History** ([`history`]): bounded undo/redo over full snapshots with
//!     explicit checkpoints.
//! 6.  **Editor** ([`editor`]): the facade every action goes through, and
//!     [`project`] for switching between independent flows.
//!
//! ## Quick Start
//!
//! ```rust
//! use zukei::prelude::*;
//! use zukei::remap::SequentialIds;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut editor = Editor::builder(Snapshot::default())
//!         .with_id_generator(SequentialIds::new())
//!         .build()?;
//!
//!     let draft = editor.add_step("Draft", Point::ORIGIN, None)?;
//!     let review = editor.add_step("Review", Point::ORIGIN, None)?;
//!     let publish = editor.add_step("Publish", Point::ORIGIN, None)?;
//!     editor.connect(&draft, &review, "")?;
//!     editor.connect(&review, &publish, "approved")?;
//!
//!     let report = editor.auto_layout(LayoutMode::Interactive);
//!     assert_eq!(report.columns.len(), 3);
//!     assert_eq!(report.columns[0], vec![draft.clone()]);
//!
//!     // Every action above is one undo step.
//!     assert!(editor.undo());
//!     assert_eq!(editor.history().undo_depth(), 5);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod containment;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod layout;
pub mod prelude;
pub mod project;
pub mod remap;
pub mod snapshot;
