use super::{Editor, taken_ids};
use crate::error::EditError;
use crate::graph::{GraphEdge, GraphNode, NodeIndex, Point};
use crate::remap::IdentityRemapper;
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

/// A detached copy of nodes and the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Absolute origin, at capture time, of every parent group that was not
    /// itself captured. Used to place copies whose group is gone by paste time.
    pub parent_origins: AHashMap<String, Point>,
}

impl Clipboard {
    /// Captures `roots`, everything nested inside them, and the edges whose
    /// endpoints were both captured. Node order follows `nodes`, so parents
    /// stay ahead of their children.
    pub fn capture<S: AsRef<str>>(nodes: &[GraphNode], edges: &[GraphEdge], roots: &[S]) -> Self {
        let index = NodeIndex::new(nodes);
        let mut included: AHashSet<&str> = AHashSet::new();
        for root in roots.iter().map(AsRef::as_ref) {
            if let Some(node) = index.get(root) {
                included.insert(node.id.as_str());
                included.extend(index.descendants_of(root));
            }
        }

        let parent_origins = nodes
            .iter()
            .filter(|n| included.contains(n.id.as_str()))
            .filter_map(|n| n.parent_id.as_deref())
            .filter(|parent| !included.contains(parent))
            .filter_map(|parent| Some((parent.to_string(), index.absolute_position(parent)?)))
            .collect();

        Self {
            nodes: nodes
                .iter()
                .filter(|n| included.contains(n.id.as_str()))
                .cloned()
                .collect(),
            edges: edges
                .iter()
                .filter(|e| {
                    included.contains(e.source.as_str()) && included.contains(e.target.as_str())
                })
                .cloned()
                .collect(),
            parent_origins,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Editor {
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    /// Copies the selection to the clipboard. Returns the number of nodes copied.
    pub fn copy_selection(&mut self) -> Result<usize, EditError> {
        let captured = Clipboard::capture(self.nodes(), self.edges(), &self.selection);
        if captured.is_empty() {
            return Err(self.decline(EditError::EmptySelection));
        }
        let count = captured.nodes.len();
        self.clipboard = Some(captured);
        debug!(nodes = count, "selection copied");
        Ok(count)
    }

    /// Inserts a fresh copy of the clipboard and selects it. Returns the new node ids.
    pub fn paste(&mut self) -> Result<Vec<String>, EditError> {
        let Some(clipboard) = self.clipboard.clone().filter(|c| !c.is_empty()) else {
            return Err(self.decline(EditError::EmptyClipboard));
        };
        Ok(self.insert_copy(&clipboard))
    }

    /// Copies the selection in place without touching the clipboard.
    pub fn duplicate_selection(&mut self) -> Result<Vec<String>, EditError> {
        let captured = Clipboard::capture(self.nodes(), self.edges(), &self.selection);
        if captured.is_empty() {
            return Err(self.decline(EditError::EmptySelection));
        }
        Ok(self.insert_copy(&captured))
    }

    fn insert_copy(&mut self, source: &Clipboard) -> Vec<String> {
        let offset = self.config.clipboard.paste_offset;
        let taken = taken_ids(self.history.present());
        let mut copy = IdentityRemapper::new(self.ids.as_mut(), offset)
            .reserve(taken.iter().copied())
            .remap(&source.nodes, &source.edges);

        // A copied child whose original group is gone (pasted into another
        // flow, or deleted meanwhile) lands on the top level instead, at the
        // absolute spot the group gave it when it was copied.
        let existing: AHashSet<&str> = self.nodes().iter().map(|n| n.id.as_str()).collect();
        let copied: AHashSet<String> = copy.id_map.values().cloned().collect();
        for node in &mut copy.nodes {
            let Some(parent) = node.parent_id.as_deref() else {
                continue;
            };
            if copied.contains(parent) || existing.contains(parent) {
                continue;
            }
            match source.parent_origins.get(parent) {
                Some(&origin) => node.position = node.position + origin,
                None => warn!(node_id = %node.id, "origin of missing parent group unknown; keeping relative position"),
            }
            warn!(node_id = %node.id, "parent group of pasted node no longer exists; detaching");
            node.parent_id = None;
        }

        let roots: Vec<String> = copy
            .nodes
            .iter()
            .filter(|n| n.parent_id.as_ref().is_none_or(|p| !copied.contains(p)))
            .map(|n| n.id.clone())
            .collect();
        let new_ids: Vec<String> = copy.nodes.iter().map(|n| n.id.clone()).collect();

        self.history.take_snapshot();
        let mut nodes = self.nodes().to_vec();
        nodes.extend(copy.nodes);
        let mut edges = self.edges().to_vec();
        edges.extend(copy.edges);
        self.commit(nodes, edges, true);
        self.selection = roots;
        debug!(nodes = new_ids.len(), "copy inserted");
        new_ids
    }
}
