use super::Editor;
use crate::error::EditError;
use crate::geometry::bounds_of;
use crate::graph::{GraphNode, NodeIndex, Point};
use crate::remap::IdKind;
use ahash::AHashSet;
use tracing::debug;

impl Editor {
    /// Wraps the selected top-level steps in a new group and returns its id.
    ///
    /// Declined when fewer than two eligible steps are selected, or when any of
    /// them has not been measured by the rendering surface yet.
    pub fn group_selection(&mut self, label: impl Into<String>) -> Result<String, EditError> {
        let selected: AHashSet<&str> = self.selection.iter().map(String::as_str).collect();
        let eligible: Vec<&GraphNode> = self
            .nodes()
            .iter()
            .filter(|n| selected.contains(n.id.as_str()) && n.is_top_level() && !n.is_group())
            .collect();

        if eligible.len() < 2 {
            return Err(self.decline(EditError::NotEnoughNodes {
                found: eligible.len(),
            }));
        }
        let unmeasured: Vec<String> = eligible
            .iter()
            .filter(|n| n.measured_size().is_none())
            .map(|n| n.id.clone())
            .collect();
        if !unmeasured.is_empty() {
            return Err(self.decline(EditError::UnmeasuredNodes(unmeasured)));
        }

        let padding = self.config.containment.padding;
        let Some(bounds) = bounds_of(eligible.iter().copied(), &self.config.geometry) else {
            return Err(self.decline(EditError::NotEnoughNodes { found: 0 }));
        };
        let members: AHashSet<String> = eligible.iter().map(|n| n.id.clone()).collect();

        let group_id = self.fresh_id(IdKind::Node);
        let frame = bounds.inflate(padding);
        let mut group = GraphNode::group(group_id.clone(), label, frame.origin());
        group.width = Some(frame.width());
        group.height = Some(frame.height());

        self.history.take_snapshot();
        let mut nodes = Vec::with_capacity(self.nodes().len() + 1);
        let mut pending = Some(group);
        for node in self.nodes() {
            let mut node = node.clone();
            if members.contains(&node.id) {
                // Parents must precede their children.
                if let Some(group) = pending.take() {
                    nodes.push(group);
                }
                node.parent_id = Some(group_id.clone());
                node.position = node.position - frame.origin();
            }
            nodes.push(node);
        }
        self.commit(nodes, self.edges().to_vec(), true);
        self.selection = vec![group_id.clone()];
        debug!(group_id = %group_id, members = members.len(), "selection grouped");
        Ok(group_id)
    }

    /// Dissolves a group. Its children keep their absolute position and move
    /// up to the group's own parent; edges attached to the group are removed.
    pub fn ungroup(&mut self, group_id: &str) -> Result<(), EditError> {
        let pos = self.require_group(group_id)?;
        let group = self.nodes()[pos].clone();

        self.history.take_snapshot();
        let nodes: Vec<GraphNode> = self
            .nodes()
            .iter()
            .filter(|n| n.id != group.id)
            .cloned()
            .map(|mut n| {
                if n.parent_id.as_deref() == Some(group.id.as_str()) {
                    n.position = n.position + group.position;
                    n.parent_id = group.parent_id.clone();
                }
                n
            })
            .collect();
        let edges = self
            .edges()
            .iter()
            .filter(|e| !e.touches(&group.id))
            .cloned()
            .collect();
        self.commit(nodes, edges, true);
        debug!(group_id = %group.id, "group dissolved");
        Ok(())
    }

    /// Deletes nodes together with everything nested inside them and every
    /// edge attached to a deleted node. Returns the number of nodes removed.
    pub fn delete_nodes<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize, EditError> {
        if ids.is_empty() {
            return Err(self.decline(EditError::EmptySelection));
        }
        let index = NodeIndex::new(self.nodes());
        let mut doomed: AHashSet<String> = AHashSet::new();
        for id in ids.iter().map(AsRef::as_ref) {
            if !index.contains(id) {
                continue;
            }
            doomed.insert(id.to_string());
            doomed.extend(index.descendants_of(id).into_iter().map(str::to_string));
        }
        if doomed.is_empty() {
            let missing = ids[0].as_ref().to_string();
            return Err(self.decline(EditError::NodeNotFound(missing)));
        }

        self.history.take_snapshot();
        let nodes = self
            .nodes()
            .iter()
            .filter(|n| !doomed.contains(&n.id))
            .cloned()
            .collect();
        let edges = self
            .edges()
            .iter()
            .filter(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target))
            .cloned()
            .collect();
        self.commit(nodes, edges, true);
        debug!(removed = doomed.len(), "nodes deleted");
        Ok(doomed.len())
    }

    pub fn delete_edges<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize, EditError> {
        let doomed: AHashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let removed = self
            .edges()
            .iter()
            .filter(|e| doomed.contains(e.id.as_str()))
            .count();
        if removed == 0 {
            return Err(match ids.first() {
                Some(id) => self.decline(EditError::EdgeNotFound(id.as_ref().to_string())),
                None => self.decline(EditError::EmptySelection),
            });
        }

        self.history.take_snapshot();
        let edges = self
            .edges()
            .iter()
            .filter(|e| !doomed.contains(e.id.as_str()))
            .cloned()
            .collect();
        self.commit(self.nodes().to_vec(), edges, false);
        Ok(removed)
    }

    /// Deletes the selected nodes.
    pub fn delete_selection(&mut self) -> Result<usize, EditError> {
        let selection = self.selection.clone();
        self.delete_nodes(&selection)
    }

    /// Converts a child's relative position into absolute canvas coordinates.
    pub fn absolute_position(&self, id: &str) -> Option<Point> {
        NodeIndex::new(self.nodes()).absolute_position(id)
    }
}
