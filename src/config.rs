use crate::error::ConfigError;
use crate::graph::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fallback dimensions used until the rendering surface has measured a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub default_width: f64,
    pub header_height: f64,
    pub deliverable_row_height: f64,
    pub vertical_padding: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            default_width: 280.0,
            header_height: 56.0,
            deliverable_row_height: 36.0,
            vertical_padding: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentConfig {
    /// Margin kept between a group's border and the bounds of its children.
    pub padding: f64,
    /// Shifts and size changes at or below this value are ignored.
    pub epsilon: f64,
}

impl Default for ContainmentConfig {
    fn default() -> Self {
        Self {
            padding: 60.0,
            epsilon: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between two adjacent columns.
    pub column_gap: f64,
    /// Gap used instead when an edge across the boundary carries a label or icon.
    pub annotated_column_gap: f64,
    /// Vertical gap between stacked nodes of one column.
    pub row_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap: 120.0,
            annotated_column_gap: 240.0,
            row_gap: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Offset applied to pasted copies so they do not cover the original.
    pub paste_offset: Point,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            paste_offset: Point::new(50.0, 50.0),
        }
    }
}

/// Every tunable constant of the engine.
///
/// All sections are optional when deserializing, so a config file only needs
/// to name the values it overrides:
///
/// ```rust
/// use zukei::config::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "containment": { "padding": 40.0 } }"#).unwrap();
/// assert_eq!(config.containment.padding, 40.0);
/// assert_eq!(config.history.limit, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geometry: GeometryConfig,
    pub containment: ContainmentConfig,
    pub layout: LayoutConfig,
    pub history: HistoryConfig,
    pub clipboard: ClipboardConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
