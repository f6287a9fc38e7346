//! The persistence boundary: encoding graph state for the storage layer.
//!
//! JSON is used for files exchanged with other tools, bincode for compact
//! storage. Every decode validates the graph before handing it out.

use crate::config::EngineConfig;
use crate::error::SnapshotError;
use crate::graph::{Flow, Snapshot};
use crate::project::Project;
use crate::remap::UuidIds;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

mod conversion;

pub use conversion::*;

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (snapshot, _): (Snapshot, usize) =
            decode_from_slice(bytes, standard()).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| {
            SnapshotError::Encode(format!("Could not write to file '{}': {}", path.display(), e))
        })
    }

    /// Loads a snapshot written by [`save`](Self::save).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            SnapshotError::Decode(format!("Could not read file '{}': {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }
}

impl Flow {
    /// Serializes the flow in the engine's own JSON shape, the format
    /// `graph-gen` writes and `zukei-cli --input flow` reads.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let flow: Flow =
            serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        crate::graph::validate(&flow.nodes, &flow.edges)?;
        Ok(flow)
    }
}

/// On-disk form of a project.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    active: Option<String>,
    flows: Vec<Flow>,
}

impl Project {
    /// Serializes every flow, including the live canvas of the active one.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        let file = ProjectFile {
            active: Some(self.active_flow().id.clone()),
            flows: self.flows(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Opens a project from JSON. History starts empty.
    pub fn from_json(json: &str, config: EngineConfig) -> Result<Self, SnapshotError> {
        let file: ProjectFile =
            serde_json::from_str(json).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        let mut project = Project::open(file.flows, config, UuidIds)?;
        if let Some(active) = file.active {
            if let Err(e) = project.switch_flow(&active) {
                warn!(flow_id = %active, error = %e, "stored active flow unavailable; using the first flow");
            }
        }
        Ok(project)
    }
}
