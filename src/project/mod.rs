use crate::config::EngineConfig;
use crate::editor::Editor;
use crate::error::{EditError, GraphError};
use crate::graph::Flow;
use crate::remap::{IdGenerator, UuidIds};
use tracing::info;
use uuid::Uuid;

/// A set of independent flows, one of which is bound to the editor.
///
/// Switching flows is a checkpoint boundary: the canvas is written back into
/// the active flow's record and the target flow is loaded with a fresh
/// history, so undo never crosses from one flow into another.
pub struct Project {
    flows: Vec<Flow>,
    active: usize,
    editor: Editor,
}

impl Project {
    pub fn new(flows: Vec<Flow>) -> Result<Self, GraphError> {
        Self::open(flows, EngineConfig::default(), UuidIds)
    }

    /// Opens a project with the first flow active. An empty list gets one
    /// untitled flow.
    pub fn open(
        mut flows: Vec<Flow>,
        config: EngineConfig,
        ids: impl IdGenerator + 'static,
    ) -> Result<Self, GraphError> {
        if flows.is_empty() {
            flows.push(Flow::new(new_flow_id(), "Untitled flow"));
        }
        for flow in &flows {
            crate::graph::validate(&flow.nodes, &flow.edges)?;
        }
        let editor = Editor::builder(flows[0].snapshot())
            .with_config(config)
            .with_id_generator(ids)
            .build()?;
        info!(flows = flows.len(), "project opened");
        Ok(Self {
            flows,
            active: 0,
            editor,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// The active flow's record. Its graph reflects the canvas as of the last
    /// flush; use [`Editor::snapshot`] for the live state.
    pub fn active_flow(&self) -> &Flow {
        &self.flows[self.active]
    }

    pub fn flow_ids(&self) -> Vec<&str> {
        self.flows.iter().map(|f| f.id.as_str()).collect()
    }

    /// All flows, with the active one carrying the current canvas.
    pub fn flows(&self) -> Vec<Flow> {
        let mut flows = self.flows.clone();
        flows[self.active].store(self.editor.snapshot().clone());
        flows
    }

    pub fn into_flows(mut self) -> Vec<Flow> {
        self.flush();
        self.flows
    }

    /// Writes the canvas back into the active flow's record.
    pub fn flush(&mut self) {
        self.flows[self.active].store(self.editor.snapshot().clone());
    }

    pub fn switch_flow(&mut self, flow_id: &str) -> Result<(), EditError> {
        let target = self.position_of(flow_id)?;
        if target == self.active {
            return Ok(());
        }
        self.flush();
        self.editor.load(self.flows[target].snapshot())?;
        self.active = target;
        info!(flow_id, "switched active flow");
        Ok(())
    }

    /// Appends an empty flow and returns its id. The active flow does not change.
    pub fn add_flow(&mut self, title: impl Into<String>) -> String {
        let flow = Flow::new(new_flow_id(), title);
        let id = flow.id.clone();
        self.flows.push(flow);
        id
    }

    pub fn rename_flow(&mut self, flow_id: &str, title: impl Into<String>) -> Result<(), EditError> {
        let pos = self.position_of(flow_id)?;
        self.flows[pos].title = title.into();
        Ok(())
    }

    /// Removes a flow. Removing the active flow activates its neighbour.
    pub fn remove_flow(&mut self, flow_id: &str) -> Result<Flow, EditError> {
        let pos = self.position_of(flow_id)?;
        if self.flows.len() == 1 {
            return Err(EditError::LastFlow);
        }
        if pos == self.active {
            let neighbour = if pos + 1 < self.flows.len() { pos + 1 } else { pos - 1 };
            let neighbour_id = self.flows[neighbour].id.clone();
            self.switch_flow(&neighbour_id)?;
        }
        let removed = self.flows.remove(pos);
        if self.active > pos {
            self.active -= 1;
        }
        info!(flow_id, "flow removed");
        Ok(removed)
    }

    fn position_of(&self, flow_id: &str) -> Result<usize, EditError> {
        self.flows
            .iter()
            .position(|f| f.id == flow_id)
            .ok_or_else(|| EditError::FlowNotFound(flow_id.to_string()))
    }
}

fn new_flow_id() -> String {
    format!("flow_{}", Uuid::new_v4().simple())
}
