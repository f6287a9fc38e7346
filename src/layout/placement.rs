use super::ranking::UnitEdge;
use crate::config::{GeometryConfig, LayoutConfig};
use crate::geometry::effective_size;
use crate::graph::{GraphNode, Point};
use itertools::Itertools;

/// Computes the canvas position of every unit from its column assignment.
///
/// Columns run left to right starting at x = 0; each column is as wide as
/// its widest member. Members stack top to bottom and the stack is centred
/// on y = 0.
pub(super) fn place_columns(
    units: &[&GraphNode],
    columns: &[Vec<usize>],
    edges: &[UnitEdge],
    geometry: &GeometryConfig,
    settings: &LayoutConfig,
) -> Vec<Point> {
    let mut column_of = vec![0usize; units.len()];
    for (col, members) in columns.iter().enumerate() {
        for &unit in members {
            column_of[unit] = col;
        }
    }

    let annotated = annotated_boundaries(columns.len(), &column_of, edges);
    let mut positions = vec![Point::ORIGIN; units.len()];
    let mut x = 0.0;

    for (col, members) in columns.iter().enumerate() {
        let sizes = members
            .iter()
            .map(|&unit| effective_size(units[unit], geometry))
            .collect_vec();
        let column_width = sizes.iter().map(|s| s.width).fold(0.0, f64::max);
        let stack_height = sizes.iter().map(|s| s.height).sum::<f64>()
            + settings.row_gap * members.len().saturating_sub(1) as f64;

        let mut y = -stack_height / 2.0;
        for (&unit, size) in members.iter().zip(&sizes) {
            positions[unit] = Point::new(x, y);
            y += size.height + settings.row_gap;
        }

        let gap = if annotated.get(col).copied().unwrap_or(false) {
            settings.annotated_column_gap
        } else {
            settings.column_gap
        };
        x += column_width + gap;
    }
    positions
}

/// For each boundary `i` (between column `i` and `i + 1`), whether an
/// annotated edge spans it.
fn annotated_boundaries(column_count: usize, column_of: &[usize], edges: &[UnitEdge]) -> Vec<bool> {
    let mut annotated = vec![false; column_count.saturating_sub(1)];
    for edge in edges.iter().filter(|e| e.annotated) {
        let (a, b) = (column_of[edge.from], column_of[edge.to]);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for flag in &mut annotated[lo..hi] {
            *flag = true;
        }
    }
    annotated
}
