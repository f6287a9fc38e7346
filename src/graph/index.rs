use super::{GraphNode, Point};
use ahash::{AHashMap, AHashSet};

/// Id lookups over a flat node slice.
///
/// Parent links are plain ids, so every structural query goes through this
/// index instead of following references.
pub struct NodeIndex<'a> {
    nodes: &'a [GraphNode],
    positions: AHashMap<&'a str, usize>,
    children: AHashMap<&'a str, Vec<usize>>,
}

impl<'a> NodeIndex<'a> {
    pub fn new(nodes: &'a [GraphNode]) -> Self {
        let mut positions = AHashMap::with_capacity(nodes.len());
        let mut children: AHashMap<&str, Vec<usize>> = AHashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            positions.entry(node.id.as_str()).or_insert(i);
            if let Some(parent) = &node.parent_id {
                children.entry(parent.as_str()).or_default().push(i);
            }
        }
        Self {
            nodes,
            positions,
            children,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a GraphNode> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Direct children of `id`, in slice order.
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &'a GraphNode> + '_ {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(|&i| &self.nodes[i])
    }

    /// Slice positions of the direct children of `id`.
    pub fn child_positions(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every node whose parent chain reaches `id`, excluding `id` itself.
    pub fn descendants_of(&self, id: &str) -> AHashSet<&'a str> {
        let mut found: AHashSet<&'a str> = AHashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for child in self.children_of(current) {
                if found.insert(child.id.as_str()) {
                    stack.push(child.id.as_str());
                }
            }
        }
        found.remove(id);
        found
    }

    /// The top-most node reachable by following parent links from `id`.
    ///
    /// Stops at a missing parent or at the first repeated id, so a malformed
    /// chain never loops.
    pub fn outermost_ancestor(&self, id: &str) -> Option<&'a GraphNode> {
        let mut current = self.get(id)?;
        let mut seen: AHashSet<&str> = AHashSet::new();
        seen.insert(current.id.as_str());
        while let Some(parent_id) = &current.parent_id {
            match self.get(parent_id) {
                Some(parent) if seen.insert(parent.id.as_str()) => current = parent,
                _ => break,
            }
        }
        Some(current)
    }

    /// Canvas position of `id`, adding up positions along its parent chain.
    pub fn absolute_position(&self, id: &str) -> Option<Point> {
        let mut current = self.get(id)?;
        let mut position = current.position;
        for _ in 0..self.nodes.len() {
            let Some(parent) = current.parent_id.as_deref().and_then(|p| self.get(p)) else {
                break;
            };
            position = position + parent.position;
            current = parent;
        }
        Some(position)
    }

    /// Number of ancestors above `id`. Zero for top-level nodes.
    pub fn depth_of(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.get(id);
        while let Some(parent) = current
            .and_then(|n| n.parent_id.as_deref())
            .and_then(|p| self.get(p))
        {
            depth += 1;
            if depth > self.nodes.len() {
                break;
            }
            current = Some(parent);
        }
        depth
    }
}
