use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use std::fs;
use zukei::graph::{Deliverable, Flow, GraphEdge, GraphNode, Point, Size};

/// A CLI tool to generate random flows for exercising the Zukei engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated flow JSON to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Number of layers (the column count a clean layout should produce)
    #[arg(long, default_value_t = 5)]
    layers: usize,

    /// Maximum number of steps per layer
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Probability that a layer is wrapped in a group
    #[arg(long, default_value_t = 0.2)]
    group_chance: f64,

    /// Number of back edges to add, each of which introduces a cycle
    #[arg(long, default_value_t = 0)]
    back_edges: usize,

    /// Leave nodes unmeasured, as they are before the surface renders them
    #[arg(long)]
    unmeasured: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.layers == 0 || cli.width == 0 {
        eprintln!("Error: --layers and --width must both be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.group_chance) {
        eprintln!(
            "Error: --group-chance ({}) must be between 0 and 1",
            cli.group_chance
        );
        std::process::exit(1);
    }

    println!(
        "Generating flow ({} layers, up to {} steps each)...",
        cli.layers, cli.width
    );

    let mut flow = Flow::new("generated", "Generated flow");
    let layers = generate_layers(&mut rng, &mut flow, &cli);
    generate_forward_edges(&mut rng, &mut flow, &layers);
    generate_back_edges(&mut rng, &mut flow, &layers, cli.back_edges);

    let json_output = flow.to_json()?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} nodes and {} edges to '{}'",
        flow.nodes.len(),
        flow.edges.len(),
        cli.output
    );
    println!("Lay it out with: zukei-cli --input flow {}", cli.output);

    Ok(())
}

/// Creates the steps of each layer, scattered randomly. Returns the step ids per layer.
fn generate_layers(rng: &mut ThreadRng, flow: &mut Flow, cli: &Cli) -> Vec<Vec<String>> {
    let mut layers = Vec::with_capacity(cli.layers);

    for layer in 0..cli.layers {
        let count = rng.random_range(1..=cli.width);
        let group_id = (count > 1 && rng.random_bool(cli.group_chance)).then(|| {
            let id = format!("group-{}", layer);
            flow.nodes.push(GraphNode::group(
                id.clone(),
                format!("Phase {}", layer + 1),
                random_point(rng),
            ));
            id
        });

        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let id = format!("step-{}-{}", layer, i);
            let deliverables = (0..rng.random_range(0..=3))
                .map(|d| Deliverable::new(format!("{}-d{}", id, d), format!("Output {}", d + 1)))
                .collect();
            let mut step = GraphNode::step(id.clone(), format!("Step {}.{}", layer + 1, i + 1), random_point(rng))
                .with_deliverables(deliverables);
            if !cli.unmeasured {
                let height = 80.0 + step.deliverables().len() as f64 * 36.0;
                step = step.with_size(Size::new(rng.random_range(200.0..320.0), height));
            }
            if let Some(group_id) = &group_id {
                step = step.with_parent(group_id.clone());
            }
            flow.nodes.push(step);
            ids.push(id);
        }
        if group_id.is_some() {
            println!("-> Layer {}: {} step(s) in a group.", layer + 1, count);
        }
        layers.push(ids);
    }

    layers
}

/// Connects every step to at least one step of the next layer.
fn generate_forward_edges(rng: &mut ThreadRng, flow: &mut Flow, layers: &[Vec<String>]) {
    for (layer, pair) in layers.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        for (i, source) in from.iter().enumerate() {
            let target = &to[rng.random_range(0..to.len())];
            let mut edge = GraphEdge::new(format!("edge-{}-{}", layer, i), source, target);
            if rng.random_bool(0.25) {
                edge = edge.with_label("on approval");
            }
            flow.edges.push(edge);
        }
    }
}

fn generate_back_edges(rng: &mut ThreadRng, flow: &mut Flow, layers: &[Vec<String>], count: usize) {
    if layers.len() < 2 {
        return;
    }
    for i in 0..count {
        let late = rng.random_range(1..layers.len());
        let early = rng.random_range(0..late);
        let source = &layers[late][rng.random_range(0..layers[late].len())];
        let target = &layers[early][rng.random_range(0..layers[early].len())];
        flow.edges.push(GraphEdge::new(format!("back-{}", i), source, target));
    }
    if count > 0 {
        println!("-> Added {} back edge(s).", count);
    }
}

fn random_point(rng: &mut ThreadRng) -> Point {
    Point::new(rng.random_range(-500.0..1500.0), rng.random_range(-500.0..1500.0))
}
