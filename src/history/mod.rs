use crate::graph::Snapshot;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A bounded, linear undo/redo history of full graph states.
///
/// History is only recorded at explicit checkpoints: callers invoke
/// [`take_snapshot`](Self::take_snapshot) *before* a structural change and
/// then install the result with [`set_state`](Self::set_state). Intermediate
/// states (a drag in progress, for instance) can be set repeatedly without
/// creating undo steps.
#[derive(Debug, Clone)]
pub struct HistoryManager<S: Clone = Snapshot> {
    past: VecDeque<S>,
    present: S,
    future: VecDeque<S>,
    limit: usize,
}

impl<S: Clone> HistoryManager<S> {
    pub fn new(initial: S) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: S, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            limit,
        }
    }

    pub fn present(&self) -> &S {
        &self.present
    }

    /// Records the present state as an undo step and discards the redo stack.
    pub fn take_snapshot(&mut self) {
        self.past.push_back(self.present.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        debug!(depth = self.past.len(), "history snapshot taken");
    }

    /// Replaces the present state without touching either stack.
    pub fn set_state(&mut self, next: S) {
        self.present = next;
    }

    /// Steps back one state. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        debug!(past = self.past.len(), future = self.future.len(), "undo");
        true
    }

    /// Re-applies the most recently undone state. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        debug!(past = self.past.len(), future = self.future.len(), "redo");
        true
    }

    /// Starts a fresh history rooted at `state`. Used whenever the graph on the
    /// canvas is swapped for a different flow or project.
    pub fn reset(&mut self, state: S) {
        self.past.clear();
        self.future.clear();
        self.present = state;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
