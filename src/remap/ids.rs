use uuid::Uuid;

/// The entity an id is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Node,
    Deliverable,
    Edge,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Node => "node",
            IdKind::Deliverable => "deliverable",
            IdKind::Edge => "edge",
        }
    }
}

/// Source of fresh identifiers for copied and newly created entities.
pub trait IdGenerator: Send {
    fn next_id(&mut self, kind: IdKind) -> String;
}

/// Random v4 UUIDs, prefixed with the entity kind (`node_…`, `edge_…`).
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        format!("{}_{}", kind.prefix(), Uuid::new_v4().simple())
    }
}

/// Deterministic ids (`node-1`, `node-2`, `edge-3`, …) sharing one counter.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        self.counter += 1;
        format!("{}-{}", kind.prefix(), self.counter)
    }
}
