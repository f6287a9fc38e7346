//! The mutation facade every user action goes through.
//!
//! Each structural action follows the same sequence: validate (declining
//! with an [`EditError`] and no side effects), record a history snapshot,
//! apply the change to fresh node/edge vectors, and run a containment pass
//! when geometry may have changed.

use crate::config::EngineConfig;
use crate::containment::ContainmentEngine;
use crate::error::{EditError, GraphError};
use crate::graph::{Deliverable, GraphEdge, GraphNode, NodeIndex, NodePayload, Point, Snapshot};
use crate::history::HistoryManager;
use crate::layout::{LayoutEngine, LayoutStatus};
use crate::remap::{IdGenerator, IdKind, UuidIds, unique_id};
use ahash::AHashSet;
use itertools::Itertools;
use std::fmt;
use tracing::{debug, info};

mod clipboard;
mod structure;

pub use clipboard::Clipboard;

/// Whether a layout was requested silently or by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Silent,
    /// The surface should fit the viewport to the result and show cycle notices.
    Interactive,
}

/// What the caller needs to know after an auto-layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub status: LayoutStatus,
    pub columns: Vec<Vec<String>>,
    /// Set for interactive runs on a non-empty canvas.
    pub fit_view: bool,
}

impl LayoutReport {
    /// A user-facing notice, present only when a cycle was found.
    pub fn notice(&self) -> Option<String> {
        match &self.status {
            LayoutStatus::CycleDetected { nodes } => Some(format!(
                "Cyclic dependency detected between {}; steps that could not be ordered were placed in the last column",
                nodes.join(", ")
            )),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            LayoutStatus::Empty => return writeln!(f, "Nothing to lay out"),
            LayoutStatus::Complete => {
                writeln!(f, "Layout complete: {} column(s)", self.columns.len())?
            }
            LayoutStatus::CycleDetected { nodes } => writeln!(
                f,
                "Layout complete with a cyclic dependency between: {}",
                nodes.join(", ")
            )?,
        }
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(f, "  Column {}: {}", i + 1, column.iter().join(", "))?;
        }
        Ok(())
    }
}

/// Owns the active graph, its undo history, the selection and the clipboard.
pub struct Editor {
    history: HistoryManager<Snapshot>,
    config: EngineConfig,
    containment: ContainmentEngine,
    layout: LayoutEngine,
    ids: Box<dyn IdGenerator>,
    selection: Vec<String>,
    clipboard: Option<Clipboard>,
}

pub struct EditorBuilder {
    initial: Snapshot,
    config: EngineConfig,
    ids: Box<dyn IdGenerator>,
}

impl EditorBuilder {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            initial,
            config: EngineConfig::default(),
            ids: Box::new(UuidIds),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Validates the initial graph and builds the editor.
    pub fn build(self) -> Result<Editor, GraphError> {
        self.initial.validate()?;
        Ok(Editor {
            history: HistoryManager::with_limit(self.initial, self.config.history.limit),
            containment: ContainmentEngine::new(&self.config),
            layout: LayoutEngine::new(&self.config),
            config: self.config,
            ids: self.ids,
            selection: Vec::new(),
            clipboard: None,
        })
    }
}

impl Editor {
    pub fn builder(initial: Snapshot) -> EditorBuilder {
        EditorBuilder::new(initial)
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.history.present()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.history.present().nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.history.present().edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes().iter().find(|n| n.id == id)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager<Snapshot> {
        &self.history
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Replaces the selection, keeping only ids of existing nodes.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = NodeIndex::new(&self.history.present().nodes);
        self.selection = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| index.contains(id))
            .unique()
            .collect();
    }

    /// Replaces the graph with a loaded one and starts a fresh history.
    pub fn load(&mut self, snapshot: Snapshot) -> Result<(), GraphError> {
        snapshot.validate()?;
        info!(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "graph loaded; history reset"
        );
        self.history.reset(snapshot);
        self.selection.clear();
        Ok(())
    }

    /// Records an undo step for a gesture that will be followed by [`sync`](Self::sync)
    /// calls, such as the start of a drag.
    pub fn take_snapshot(&mut self) {
        self.history.take_snapshot();
    }

    /// Installs node/edge state reported by the rendering surface without
    /// recording history, then re-fits groups.
    pub fn sync(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.commit(nodes, edges, true);
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo();
        self.prune_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo();
        self.prune_selection();
        changed
    }

    /// Adds a step, optionally inside a group, and returns its id.
    pub fn add_step(
        &mut self,
        label: impl Into<String>,
        position: Point,
        parent: Option<&str>,
    ) -> Result<String, EditError> {
        if let Some(parent_id) = parent {
            self.require_group(parent_id)?;
        }
        let id = self.fresh_id(IdKind::Node);
        let mut step = GraphNode::step(id.clone(), label, position);
        step.parent_id = parent.map(str::to_string);

        self.history.take_snapshot();
        let mut nodes = self.nodes().to_vec();
        nodes.push(step);
        self.commit(nodes, self.edges().to_vec(), parent.is_some());
        debug!(node_id = %id, "step added");
        Ok(id)
    }

    /// Connects two nodes and returns the new edge id.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        label: impl Into<String>,
    ) -> Result<String, EditError> {
        self.require_node(source)?;
        self.require_node(target)?;
        if source == target {
            return Err(self.decline(EditError::SelfConnection(source.to_string())));
        }
        if self
            .edges()
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(self.decline(EditError::DuplicateConnection {
                source_id: source.to_string(),
                target_id: target.to_string(),
            }));
        }

        let id = self.fresh_id(IdKind::Edge);
        self.history.take_snapshot();
        let mut edges = self.edges().to_vec();
        edges.push(GraphEdge::new(id.clone(), source, target).with_label(label));
        self.commit(self.nodes().to_vec(), edges, false);
        Ok(id)
    }

    /// Moves a node to `position` (relative to its parent, if any).
    pub fn move_node(&mut self, id: &str, position: Point) -> Result<(), EditError> {
        self.require_node(id)?;
        self.history.take_snapshot();
        let nodes = self
            .nodes()
            .iter()
            .cloned()
            .map(|mut n| {
                if n.id == id {
                    n.position = position;
                }
                n
            })
            .collect();
        self.commit(nodes, self.edges().to_vec(), true);
        Ok(())
    }

    /// Edits a node's display data.
    pub fn update_node(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut NodePayload),
    ) -> Result<(), EditError> {
        let pos = self.require_node(id)?;
        self.history.take_snapshot();
        let mut nodes = self.nodes().to_vec();
        edit(&mut nodes[pos].payload);
        self.commit(nodes, self.edges().to_vec(), false);
        Ok(())
    }

    /// Changes the annotation of an edge. Labels and icons widen the column
    /// gap on the next layout.
    pub fn label_edge(
        &mut self,
        id: &str,
        label: impl Into<String>,
        icon: Option<String>,
    ) -> Result<(), EditError> {
        let pos = self
            .edges()
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| self.decline(EditError::EdgeNotFound(id.to_string())))?;
        self.history.take_snapshot();
        let mut edges = self.edges().to_vec();
        edges[pos].label = label.into();
        edges[pos].icon = icon;
        self.commit(self.nodes().to_vec(), edges, false);
        Ok(())
    }

    /// Appends a deliverable to a step and returns its id.
    pub fn add_deliverable(
        &mut self,
        step_id: &str,
        label: impl Into<String>,
    ) -> Result<String, EditError> {
        let pos = self.require_node(step_id)?;
        if self.nodes()[pos].is_group() {
            return Err(self.decline(EditError::NotAStep(step_id.to_string())));
        }
        let id = self.fresh_id(IdKind::Deliverable);

        self.history.take_snapshot();
        let mut nodes = self.nodes().to_vec();
        if let Some(deliverables) = nodes[pos].deliverables_mut() {
            deliverables.push(Deliverable::new(id.clone(), label));
        }
        self.commit(nodes, self.edges().to_vec(), true);
        Ok(id)
    }

    pub fn remove_deliverable(&mut self, step_id: &str, deliverable_id: &str) -> Result<(), EditError> {
        let pos = self.require_node(step_id)?;
        if !self.nodes()[pos]
            .deliverables()
            .iter()
            .any(|d| d.id == deliverable_id)
        {
            return Err(self.decline(EditError::DeliverableNotFound {
                node_id: step_id.to_string(),
                deliverable_id: deliverable_id.to_string(),
            }));
        }

        self.history.take_snapshot();
        let mut nodes = self.nodes().to_vec();
        if let Some(deliverables) = nodes[pos].deliverables_mut() {
            deliverables.retain(|d| d.id != deliverable_id);
        }
        self.commit(nodes, self.edges().to_vec(), true);
        Ok(())
    }

    /// Lays out the top-level nodes in columns and re-fits groups.
    ///
    /// An empty canvas is reported through [`LayoutStatus::Empty`] and records
    /// no history.
    pub fn auto_layout(&mut self, mode: LayoutMode) -> LayoutReport {
        let outcome = self.layout.layout(self.nodes(), self.edges());
        if outcome.status == LayoutStatus::Empty {
            return LayoutReport {
                status: outcome.status,
                columns: Vec::new(),
                fit_view: false,
            };
        }

        self.history.take_snapshot();
        self.commit(outcome.nodes, self.edges().to_vec(), true);
        info!(columns = outcome.columns.len(), ?mode, "auto layout applied");
        LayoutReport {
            status: outcome.status,
            columns: outcome.columns,
            fit_view: mode == LayoutMode::Interactive,
        }
    }

    /// Installs a new present state, re-fitting groups when geometry changed.
    fn commit(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, geometry_changed: bool) {
        let nodes = if geometry_changed {
            self.containment.resize(&nodes)
        } else {
            nodes
        };
        self.history.set_state(Snapshot::new(nodes, edges));
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let present: AHashSet<&str> = self
            .history
            .present()
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        self.selection.retain(|id| present.contains(id.as_str()));
    }

    /// Generates an id that is not used by any node, deliverable or edge.
    fn fresh_id(&mut self, kind: IdKind) -> String {
        let taken = taken_ids(self.history.present());
        unique_id(self.ids.as_mut(), kind, |id| taken.contains(id))
    }

    fn require_node(&self, id: &str) -> Result<usize, EditError> {
        self.nodes()
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| self.decline(EditError::NodeNotFound(id.to_string())))
    }

    fn require_group(&self, id: &str) -> Result<usize, EditError> {
        let pos = self.require_node(id)?;
        if !self.nodes()[pos].is_group() {
            return Err(self.decline(EditError::NotAGroup(id.to_string())));
        }
        Ok(pos)
    }

    fn decline(&self, error: EditError) -> EditError {
        debug!(reason = %error, "action declined");
        error
    }
}

/// Every id in use by a node, deliverable or edge of `snapshot`.
pub(crate) fn taken_ids(snapshot: &Snapshot) -> AHashSet<&str> {
    snapshot
        .nodes
        .iter()
        .flat_map(|n| std::iter::once(n.id.as_str()).chain(n.deliverables().iter().map(|d| d.id.as_str())))
        .chain(snapshot.edges.iter().map(|e| e.id.as_str()))
        .collect()
}
