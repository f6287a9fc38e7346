use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use zukei::error::ConversionError;
use zukei::prelude::*;
use zukei::snapshot::IntoFlow;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These mirror the node/edge arrays a canvas library exports and are only
// used here for conversion.

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    title: Option<String>,
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type", default = "default_node_type")]
    node_type: String,
    #[serde(alias = "parentId", alias = "parentNode")]
    parent_id: Option<String>,
    #[serde(default)]
    position: RawPosition,
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default)]
    data: RawNodeData,
}

#[derive(Deserialize, Default)]
struct RawPosition {
    x: f64,
    y: f64,
}

#[derive(Deserialize, Default)]
struct RawNodeData {
    #[serde(default)]
    label: String,
    color: Option<String>,
    icon: Option<String>,
    #[serde(default)]
    deliverables: Vec<RawDeliverable>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawDeliverable {
    id: String,
    #[serde(default)]
    label: String,
    color: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    data: RawEdgeData,
}

#[derive(Deserialize, Default)]
struct RawEdgeData {
    color: Option<String>,
    icon: Option<String>,
}

fn default_node_type() -> String {
    "step".to_string()
}

// --- Converter Implementation ---

impl IntoFlow for RawGraph {
    fn into_flow(self) -> Result<Flow, ConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|raw| {
                let kind = match raw.node_type.as_str() {
                    "group" => NodeKind::Group,
                    "step" => NodeKind::Step {
                        deliverables: raw
                            .data
                            .deliverables
                            .into_iter()
                            .map(|d| Deliverable {
                                id: d.id,
                                label: d.label,
                                color: d.color,
                                icon: d.icon,
                                metadata: BTreeMap::new(),
                            })
                            .collect(),
                    },
                    other => {
                        return Err(ConversionError::ValidationError(format!(
                            "node '{}' has unknown type '{}'",
                            raw.id, other
                        )));
                    }
                };
                Ok(GraphNode {
                    id: raw.id,
                    parent_id: raw.parent_id,
                    position: Point::new(raw.position.x, raw.position.y),
                    width: raw.width,
                    height: raw.height,
                    kind,
                    payload: NodePayload {
                        label: raw.data.label,
                        color: raw.data.color,
                        icon: raw.data.icon,
                        metadata: raw.data.metadata,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self
            .edges
            .into_iter()
            .map(|raw| GraphEdge {
                id: raw.id,
                source: raw.source,
                target: raw.target,
                label: raw.label.unwrap_or_default(),
                color: raw.data.color,
                icon: raw.data.icon,
                metadata: BTreeMap::new(),
            })
            .collect();

        let mut flow = Flow::new("imported", self.title.unwrap_or_else(|| "Imported flow".to_string()));
        flow.nodes = nodes;
        flow.edges = edges;
        Ok(flow)
    }
}

/// Shape of the input file.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Canvas node/edge arrays (`type`, `parentId`, `data`)
    Canvas,
    /// A serialized `Flow`, as written by `graph-gen`
    Flow,
}

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Bincode,
}

/// Lays out a diagram graph and re-fits its groups
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph JSON file
    graph_path: String,

    /// Shape of the input file
    #[arg(short, long, value_enum, default_value_t = InputFormat::Canvas)]
    input: InputFormat,

    /// Where to write the laid-out graph
    #[arg(short, long, default_value = "layout.json")]
    output: String,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Optional engine config JSON overriding the defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Only re-fit groups, keep node positions as they are
    #[arg(long)]
    containment_only: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Loading and Conversion ---
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };
    let graph_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            &cli.graph_path, e
        ))
    });
    let flow = match cli.input {
        InputFormat::Canvas => {
            let raw: RawGraph = serde_json::from_str(&graph_json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse graph JSON: {}", e))
            });
            raw.into_flow()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert graph: {}", e)))
        }
        InputFormat::Flow => Flow::from_json(&graph_json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e))),
    };

    println!(
        "Loaded '{}': {} nodes, {} edges",
        flow.title,
        flow.nodes.len(),
        flow.edges.len()
    );

    let mut editor = Editor::builder(flow.snapshot())
        .with_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid graph: {}", e)));

    // --- 2. Layout ---
    let layout_start = Instant::now();
    if cli.containment_only {
        let snapshot = editor.snapshot().clone();
        editor.sync(snapshot.nodes, snapshot.edges);
        println!("Groups re-fitted.");
    } else {
        let report = editor.auto_layout(LayoutMode::Silent);
        print!("{}", report);
        if let Some(notice) = report.notice() {
            eprintln!("Warning: {}", notice);
        }
    }
    let layout_duration = layout_start.elapsed();

    // --- 3. Output ---
    let written = match cli.format {
        OutputFormat::Json => editor
            .snapshot()
            .to_json()
            .and_then(|json| {
                fs::write(&cli.output, json)
                    .map_err(|e| SnapshotError::Encode(e.to_string()))
            }),
        OutputFormat::Bincode => editor.snapshot().save(&cli.output),
    };
    if let Err(e) = written {
        exit_with_error(&format!("Failed to write '{}': {}", cli.output, e));
    }
    println!("  -> Wrote laid-out graph to '{}'", cli.output);

    println!("\n--- Performance Summary ---");
    println!("Layout + Containment: {:?}", layout_duration);
    println!("Total Execution:      {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
