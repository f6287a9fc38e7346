//! Size and bounds computations shared by the layout and containment engines.

use crate::config::GeometryConfig;
use crate::graph::{GraphNode, NodeKind, Point, Size};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of_node(node: &GraphNode, geometry: &GeometryConfig) -> Self {
        let size = effective_size(node, geometry);
        Self {
            min_x: node.position.x,
            min_y: node.position.y,
            max_x: node.position.x + size.width,
            max_y: node.position.y + size.height,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn origin(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the box by `margin` on every side.
    pub fn inflate(self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

/// The size a node occupies, measured or derived.
///
/// Each dimension falls back independently: an unmeasured width becomes the
/// default column width, an unmeasured height is derived from the header and
/// one row per deliverable.
pub fn effective_size(node: &GraphNode, geometry: &GeometryConfig) -> Size {
    let width = node.width.unwrap_or(geometry.default_width);
    let height = node.height.unwrap_or_else(|| {
        let rows = match &node.kind {
            NodeKind::Step { deliverables } => deliverables.len(),
            NodeKind::Group => 0,
        };
        geometry.header_height + rows as f64 * geometry.deliverable_row_height + geometry.vertical_padding
    });
    Size::new(width, height)
}

/// Bounds of a set of nodes, using each node's own `position`.
///
/// Returns `None` for an empty set, or when any coordinate is not finite, so
/// callers never write sentinel values back into node state.
pub fn bounds_of<'a>(
    nodes: impl IntoIterator<Item = &'a GraphNode>,
    geometry: &GeometryConfig,
) -> Option<Bounds> {
    nodes
        .into_iter()
        .map(|node| Bounds::of_node(node, geometry))
        .reduce(Bounds::union)
        .filter(Bounds::is_finite)
}
