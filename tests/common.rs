//! Common test utilities for building graphs and editors.
use zukei::prelude::*;
use zukei::remap::SequentialIds;

/// A measured step at `(x, y)`.
#[allow(dead_code)]
pub fn step(id: &str, x: f64, y: f64) -> GraphNode {
    GraphNode::step(id, id.to_uppercase(), Point::new(x, y)).with_size(Size::new(200.0, 100.0))
}

/// An unmeasured step at the origin.
#[allow(dead_code)]
pub fn bare_step(id: &str) -> GraphNode {
    GraphNode::step(id, id.to_uppercase(), Point::ORIGIN)
}

/// A measured group at `(x, y)`.
#[allow(dead_code)]
pub fn group(id: &str, x: f64, y: f64, width: f64, height: f64) -> GraphNode {
    GraphNode::group(id, id.to_uppercase(), Point::new(x, y)).with_size(Size::new(width, height))
}

/// A measured step inside `parent`, positioned relative to it.
#[allow(dead_code)]
pub fn child(id: &str, parent: &str, x: f64, y: f64) -> GraphNode {
    step(id, x, y).with_parent(parent)
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge::new(format!("{}->{}", source, target), source, target)
}

/// Steps `ids[0] -> ids[1] -> ...`, all at the origin.
#[allow(dead_code)]
pub fn chain(ids: &[&str]) -> Snapshot {
    let nodes = ids.iter().map(|id| step(id, 0.0, 0.0)).collect();
    let edges = ids.windows(2).map(|w| edge(w[0], w[1])).collect();
    Snapshot::new(nodes, edges)
}

/// A group `g` at (100, 100) holding two children, already fitted with the
/// default padding of 60.
///
/// Children `a` (60, 60) and `b` (360, 60) are 200x100 each, so the group is
/// 620 x 220.
#[allow(dead_code)]
pub fn fitted_group() -> Snapshot {
    Snapshot::new(
        vec![
            group("g", 100.0, 100.0, 620.0, 220.0),
            child("a", "g", 60.0, 60.0),
            child("b", "g", 360.0, 60.0),
        ],
        vec![],
    )
}

/// An editor over `snapshot` with deterministic ids (`node-1`, `edge-2`, ...).
#[allow(dead_code)]
pub fn editor(snapshot: Snapshot) -> Editor {
    Editor::builder(snapshot)
        .with_id_generator(SequentialIds::new())
        .build()
        .expect("Fixture graph should be valid")
}

#[allow(dead_code)]
pub fn find<'a>(nodes: &'a [GraphNode], id: &str) -> &'a GraphNode {
    nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("node '{}' should exist", id))
}

/// Absolute position of `id`, following parent links.
#[allow(dead_code)]
pub fn absolute(nodes: &[GraphNode], id: &str) -> Point {
    let node = find(nodes, id);
    match &node.parent_id {
        Some(parent) => node.position + absolute(nodes, parent),
        None => node.position,
    }
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[allow(dead_code)]
pub fn assert_point(actual: Point, x: f64, y: f64) {
    assert_close(actual.x, x);
    assert_close(actual.y, y);
}
