use crate::config::{EngineConfig, GeometryConfig, LayoutConfig};
use crate::graph::{GraphEdge, GraphNode};
use tracing::{debug, warn};

mod placement;
mod ranking;

use placement::place_columns;
use ranking::{LayoutUnits, assign_columns, unit_edges};

/// How a layout run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStatus {
    /// There was nothing to lay out; the nodes are returned unchanged.
    Empty,
    Complete,
    /// Layout finished, but some top-level nodes could not be ordered and were
    /// placed together in the final column. `nodes` lists only those that lie
    /// on a cycle; nodes merely downstream of one are not included.
    CycleDetected { nodes: Vec<String> },
}

/// The result of a layout run.
#[derive(Debug, Clone)]
pub struct LayoutOutcome {
    pub nodes: Vec<GraphNode>,
    /// Top-level node ids per column, left to right.
    pub columns: Vec<Vec<String>>,
    pub status: LayoutStatus,
}

impl LayoutOutcome {
    pub fn has_cycle(&self) -> bool {
        matches!(self.status, LayoutStatus::CycleDetected { .. })
    }

    /// Index of the column holding `node_id`, if it is a top-level node.
    pub fn column_of(&self, node_id: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.iter().any(|id| id == node_id))
    }
}

/// Arranges top-level nodes into columns following the direction of edges.
///
/// Groups are positioned as single units and nodes inside a group are never
/// touched, so children keep their offsets relative to the group.
pub struct LayoutEngine {
    geometry: GeometryConfig,
    settings: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            geometry: config.geometry.clone(),
            settings: config.layout.clone(),
        }
    }

    pub fn layout(&self, nodes: &[GraphNode], edges: &[GraphEdge]) -> LayoutOutcome {
        let units = LayoutUnits::new(nodes);
        if units.is_empty() {
            debug!("layout skipped: no top-level nodes");
            return LayoutOutcome {
                nodes: nodes.to_vec(),
                columns: Vec::new(),
                status: LayoutStatus::Empty,
            };
        }

        let dag = unit_edges(&units, edges);
        let ranked = assign_columns(units.len(), &dag);
        let positions = place_columns(
            &units.units,
            &ranked.columns,
            &dag,
            &self.geometry,
            &self.settings,
        );

        let mut next = nodes.to_vec();
        for node in next.iter_mut().filter(|n| n.is_top_level()) {
            if let Some(unit) = units.unit_of(&node.id) {
                node.position = positions[unit];
            }
        }

        let columns: Vec<Vec<String>> = ranked
            .columns
            .iter()
            .map(|members| members.iter().map(|&u| units.units[u].id.clone()).collect())
            .collect();

        let status = if ranked.cyclic.is_empty() {
            LayoutStatus::Complete
        } else {
            let cyclic: Vec<String> = ranked
                .cyclic
                .iter()
                .map(|&u| units.units[u].id.clone())
                .collect();
            warn!(
                count = cyclic.len(),
                nodes = %cyclic.join(", "),
                unordered = ranked.unordered.len(),
                "cyclic dependency detected; placing unordered nodes in the last column"
            );
            LayoutStatus::CycleDetected { nodes: cyclic }
        };

        debug!(
            units = units.len(),
            edges = dag.len(),
            columns = columns.len(),
            "layout assigned columns"
        );

        LayoutOutcome {
            nodes: next,
            columns,
            status,
        }
    }
}
