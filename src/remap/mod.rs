//! Fresh identities for copied subtrees.

use crate::graph::{GraphEdge, GraphNode, Point};
use ahash::{AHashMap, AHashSet};
use tracing::debug;
use uuid::Uuid;

mod ids;

pub use ids::*;

/// How many times a generator may hand out a taken id before the remapper
/// falls back to a random suffix.
const MAX_ATTEMPTS: usize = 64;

/// A remapped copy of nodes and the edges between them.
#[derive(Debug, Clone, Default)]
pub struct Remapped {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Original node id to new node id.
    pub id_map: AHashMap<String, String>,
}

/// Gives a copied set of nodes new, unique identities.
///
/// Parent links are rewritten only when the parent is part of the same copy.
/// A node whose parent stays behind keeps pointing at that original parent,
/// so duplicating a lone child lands the copy next to it in the same group,
/// while duplicating a whole group carries its children along.
///
/// ```rust
/// use zukei::graph::{GraphNode, Point};
/// use zukei::remap::{IdentityRemapper, SequentialIds};
///
/// let group = GraphNode::group("g", "Group", Point::ORIGIN);
/// let child = GraphNode::step("a", "A", Point::new(10.0, 10.0)).with_parent("g");
///
/// let mut ids = SequentialIds::new();
/// let mut remapper = IdentityRemapper::new(&mut ids, Point::new(50.0, 50.0));
/// let copy = remapper.remap_nodes(&[group, child]);
///
/// assert_eq!(copy.nodes[1].parent_id.as_deref(), Some(copy.nodes[0].id.as_str()));
/// ```
pub struct IdentityRemapper<'a> {
    ids: &'a mut dyn IdGenerator,
    taken: AHashSet<String>,
    offset: Point,
}

impl<'a> IdentityRemapper<'a> {
    /// `offset` is added to the position of every copy root, i.e. every node
    /// whose parent is not part of the copy.
    pub fn new(ids: &'a mut dyn IdGenerator, offset: Point) -> Self {
        Self {
            ids,
            taken: AHashSet::new(),
            offset,
        }
    }

    /// Marks ids already in use so no generated id collides with them.
    pub fn reserve<'s>(mut self, existing: impl IntoIterator<Item = &'s str>) -> Self {
        self.taken.extend(existing.into_iter().map(str::to_string));
        self
    }

    pub fn remap_nodes(&mut self, subset: &[GraphNode]) -> Remapped {
        let mut id_map: AHashMap<String, String> = AHashMap::with_capacity(subset.len());
        for node in subset {
            self.taken.insert(node.id.clone());
            for deliverable in node.deliverables() {
                self.taken.insert(deliverable.id.clone());
            }
        }
        for node in subset {
            let fresh = self.fresh(IdKind::Node);
            id_map.insert(node.id.clone(), fresh);
        }

        let nodes: Vec<GraphNode> = subset
            .iter()
            .map(|node| {
                let mut copy = node.clone();
                copy.id = id_map[&node.id].clone();
                match node.parent_id.as_ref().and_then(|p| id_map.get(p)) {
                    Some(new_parent) => copy.parent_id = Some(new_parent.clone()),
                    None => copy.position = copy.position + self.offset,
                }
                if let Some(deliverables) = copy.deliverables_mut() {
                    for deliverable in deliverables.iter_mut() {
                        deliverable.id = self.fresh(IdKind::Deliverable);
                    }
                }
                copy
            })
            .collect();

        debug!(nodes = nodes.len(), "remapped node identities");
        Remapped {
            nodes,
            edges: Vec::new(),
            id_map,
        }
    }

    /// Remaps nodes and every edge whose endpoints were both copied.
    pub fn remap(&mut self, nodes: &[GraphNode], edges: &[GraphEdge]) -> Remapped {
        let mut remapped = self.remap_nodes(nodes);
        for edge in edges {
            self.taken.insert(edge.id.clone());
        }
        remapped.edges = edges
            .iter()
            .filter_map(|edge| {
                let source = remapped.id_map.get(&edge.source)?;
                let target = remapped.id_map.get(&edge.target)?;
                let mut copy = edge.clone();
                copy.id = self.fresh(IdKind::Edge);
                copy.source = source.clone();
                copy.target = target.clone();
                Some(copy)
            })
            .collect();
        remapped
    }

    fn fresh(&mut self, kind: IdKind) -> String {
        let id = unique_id(&mut *self.ids, kind, |id| self.taken.contains(id));
        self.taken.insert(id.clone());
        id
    }
}

/// Draws ids from `ids` until one is not `taken`, falling back to a random
/// suffix if the generator keeps colliding.
pub(crate) fn unique_id(
    ids: &mut dyn IdGenerator,
    kind: IdKind,
    taken: impl Fn(&str) -> bool,
) -> String {
    for _ in 0..MAX_ATTEMPTS {
        let id = ids.next_id(kind);
        if !taken(&id) {
            return id;
        }
    }
    format!("{}_{}", kind.prefix(), Uuid::new_v4().simple())
}
