use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, Sub};

/// A point on the canvas. Relative to the parent group's origin when the owning
/// node has a parent, absolute otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A sub-item of a step. Deliverables have no position of their own; they are
/// stacked inside the body of the step that owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Deliverable {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            icon: None,
            metadata: BTreeMap::new(),
        }
    }
}

/// The kind of a node. Only steps carry deliverables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Step { deliverables: Vec<Deliverable> },
    Group,
}

impl NodeKind {
    pub fn step() -> Self {
        NodeKind::Step {
            deliverables: Vec::new(),
        }
    }
}

/// Display data shared by every node kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub label: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl NodePayload {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// A step or group on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Enclosing group, if any. Defines containment, not render order.
    pub parent_id: Option<String>,
    pub position: Point,
    /// Measured width, `None` until the rendering surface reports it.
    pub width: Option<f64>,
    /// Measured height, `None` until the rendering surface reports it.
    pub height: Option<f64>,
    pub kind: NodeKind,
    pub payload: NodePayload,
}

impl GraphNode {
    pub fn step(id: impl Into<String>, label: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            position,
            width: None,
            height: None,
            kind: NodeKind::step(),
            payload: NodePayload::labeled(label),
        }
    }

    pub fn group(id: impl Into<String>, label: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            position,
            width: None,
            height: None,
            kind: NodeKind::Group,
            payload: NodePayload::labeled(label),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.width = Some(size.width);
        self.height = Some(size.height);
        self
    }

    pub fn with_deliverables(mut self, items: Vec<Deliverable>) -> Self {
        if let NodeKind::Step { deliverables } = &mut self.kind {
            *deliverables = items;
        }
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns the explicit size when both dimensions have been measured.
    pub fn measured_size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Size::new(width, height)),
            _ => None,
        }
    }

    pub fn deliverables(&self) -> &[Deliverable] {
        match &self.kind {
            NodeKind::Step { deliverables } => deliverables,
            NodeKind::Group => &[],
        }
    }

    pub fn deliverables_mut(&mut self) -> Option<&mut Vec<Deliverable>> {
        match &mut self.kind {
            NodeKind::Step { deliverables } => Some(deliverables),
            NodeKind::Group => None,
        }
    }
}
