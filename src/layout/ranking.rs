use crate::graph::{GraphEdge, GraphNode, NodeIndex};
use ahash::AHashMap;
use itertools::Itertools;

/// The top-level nodes of a graph, which are the units the layout positions.
/// Nodes inside a group resolve to the unit of their outermost ancestor.
pub(super) struct LayoutUnits<'a> {
    pub units: Vec<&'a GraphNode>,
    unit_of: AHashMap<&'a str, usize>,
}

impl<'a> LayoutUnits<'a> {
    pub fn new(nodes: &'a [GraphNode]) -> Self {
        let index = NodeIndex::new(nodes);
        let units: Vec<&GraphNode> = nodes.iter().filter(|n| n.is_top_level()).collect();
        let unit_pos: AHashMap<&str, usize> = units
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let unit_of = nodes
            .iter()
            .filter_map(|node| {
                let root = index.outermost_ancestor(&node.id)?;
                let unit = unit_pos.get(root.id.as_str())?;
                Some((node.id.as_str(), *unit))
            })
            .collect();

        Self { units, unit_of }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit_of(&self, node_id: &str) -> Option<usize> {
        self.unit_of.get(node_id).copied()
    }
}

/// A connection between two different layout units. Parallel edges collapse
/// into one; the result is annotated if any of them was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct UnitEdge {
    pub from: usize,
    pub to: usize,
    pub annotated: bool,
}

pub(super) fn unit_edges(units: &LayoutUnits, edges: &[GraphEdge]) -> Vec<UnitEdge> {
    let mut result: Vec<UnitEdge> = Vec::new();
    let mut seen: AHashMap<(usize, usize), usize> = AHashMap::new();

    for edge in edges {
        let (Some(from), Some(to)) = (units.unit_of(&edge.source), units.unit_of(&edge.target))
        else {
            continue;
        };
        // Connections inside one group do not order anything.
        if from == to {
            continue;
        }
        match seen.get(&(from, to)) {
            Some(&pos) => result[pos].annotated |= edge.is_annotated(),
            None => {
                seen.insert((from, to), result.len());
                result.push(UnitEdge {
                    from,
                    to,
                    annotated: edge.is_annotated(),
                });
            }
        }
    }
    result
}

/// Units partitioned into columns, plus the units no topological order could reach.
#[derive(Debug, Clone, Default)]
pub(super) struct Columns {
    pub columns: Vec<Vec<usize>>,
    /// Every unit Kahn's algorithm never reached, in unit order.
    pub unordered: Vec<usize>,
    /// The subset of `unordered` that lies on a directed cycle.
    pub cyclic: Vec<usize>,
}

/// Kahn's algorithm, one column per zero in-degree frontier.
///
/// Units whose in-degree never drops to zero sit on or behind a cycle; they
/// are gathered in unit order into one extra, final column.
pub(super) fn assign_columns(unit_count: usize, edges: &[UnitEdge]) -> Columns {
    let mut in_degree = vec![0usize; unit_count];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); unit_count];
    for edge in edges {
        successors[edge.from].push(edge.to);
        in_degree[edge.to] += 1;
    }

    let mut placed = vec![false; unit_count];
    let mut frontier: Vec<usize> = (0..unit_count).filter(|&u| in_degree[u] == 0).collect();
    let mut columns = Vec::new();

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &unit in &frontier {
            placed[unit] = true;
            for &succ in &successors[unit] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    next.push(succ);
                }
            }
        }
        columns.push(frontier);
        frontier = next.into_iter().sorted_unstable().collect();
    }

    let unordered: Vec<usize> = (0..unit_count).filter(|&u| !placed[u]).collect();
    let cyclic = units_on_cycles(&unordered, &successors);
    if !unordered.is_empty() {
        columns.push(unordered.clone());
    }
    Columns {
        columns,
        unordered,
        cyclic,
    }
}

/// Units of `candidates` that belong to a strongly connected component of
/// more than one unit (Kosaraju, restricted to `candidates`). Self-loops never
/// reach this point, so those components are exactly the cycles.
fn units_on_cycles(candidates: &[usize], successors: &[Vec<usize>]) -> Vec<usize> {
    let unit_count = successors.len();
    let mut inside = vec![false; unit_count];
    for &unit in candidates {
        inside[unit] = true;
    }
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); unit_count];
    for &unit in candidates {
        for &succ in successors[unit].iter().filter(|&&s| inside[s]) {
            predecessors[succ].push(unit);
        }
    }

    let mut visited = vec![false; unit_count];
    let mut finished = Vec::with_capacity(candidates.len());
    for &start in candidates {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (unit, cursor) = *top;
            match successors[unit].get(cursor) {
                Some(&succ) => {
                    top.1 += 1;
                    if inside[succ] && !visited[succ] {
                        visited[succ] = true;
                        stack.push((succ, 0));
                    }
                }
                None => {
                    finished.push(unit);
                    stack.pop();
                }
            }
        }
    }

    let mut component = vec![usize::MAX; unit_count];
    let mut sizes: Vec<usize> = Vec::new();
    for &root in finished.iter().rev() {
        if component[root] != usize::MAX {
            continue;
        }
        let id = sizes.len();
        let mut size = 0;
        component[root] = id;
        let mut stack = vec![root];
        while let Some(unit) = stack.pop() {
            size += 1;
            for &pred in &predecessors[unit] {
                if component[pred] == usize::MAX {
                    component[pred] = id;
                    stack.push(pred);
                }
            }
        }
        sizes.push(size);
    }

    candidates
        .iter()
        .copied()
        .filter(|&unit| sizes[component[unit]] > 1)
        .collect()
}

