use crate::config::{ContainmentConfig, EngineConfig, GeometryConfig};
use crate::geometry::{bounds_of, effective_size};
use crate::graph::{GraphNode, NodeIndex, Point, Size};
use std::cmp::Reverse;
use tracing::debug;

/// Keeps every group wrapped around its children.
///
/// A group is re-fitted to the bounds of its direct children plus a fixed
/// padding. When the group's origin moves, its children are shifted back by the
/// same amount so their absolute canvas position stays where the user put it.
pub struct ContainmentEngine {
    geometry: GeometryConfig,
    settings: ContainmentConfig,
}

impl ContainmentEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            geometry: config.geometry.clone(),
            settings: config.containment.clone(),
        }
    }

    /// Returns a copy of `nodes` in which every non-empty group bounds its children.
    ///
    /// The pass is idempotent: running it on its own output changes nothing,
    /// because corrections at or below the configured epsilon are skipped.
    /// Groups are processed deepest first, so a nested group is settled before
    /// the group around it measures it.
    pub fn resize(&self, nodes: &[GraphNode]) -> Vec<GraphNode> {
        let index = NodeIndex::new(nodes);
        let mut next = nodes.to_vec();

        let mut groups: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_group())
            .map(|(i, _)| i)
            .collect();
        groups.sort_by_key(|&i| Reverse(index.depth_of(&nodes[i].id)));

        let mut resized = 0usize;
        for group_pos in groups {
            let children = index.child_positions(&nodes[group_pos].id);
            if children.is_empty() {
                continue;
            }
            let Some(bounds) = bounds_of(children.iter().map(|&c| &next[c]), &self.geometry) else {
                continue;
            };

            let padding = self.settings.padding;
            let shift = Point::new(bounds.min_x - padding, bounds.min_y - padding);
            let size = Size::new(bounds.width() + 2.0 * padding, bounds.height() + 2.0 * padding);
            let current = effective_size(&next[group_pos], &self.geometry);

            let eps = self.settings.epsilon;
            if shift.x.abs() <= eps
                && shift.y.abs() <= eps
                && (size.width - current.width).abs() <= eps
                && (size.height - current.height).abs() <= eps
            {
                continue;
            }

            let group = &mut next[group_pos];
            group.position = group.position + shift;
            group.width = Some(size.width);
            group.height = Some(size.height);
            debug!(
                group_id = %group.id,
                dx = shift.x,
                dy = shift.y,
                width = size.width,
                height = size.height,
                "group refitted to children"
            );

            for &child in children {
                next[child].position = next[child].position - shift;
            }
            resized += 1;
        }

        if resized > 0 {
            debug!(resized, "containment pass complete");
        }
        next
    }
}
