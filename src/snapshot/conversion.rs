use crate::error::ConversionError;
use crate::graph::Flow;

/// A trait for external file formats that can be converted into a `Flow`.
///
/// Import adapters implement this on their own parsed structures; the engine
/// never needs to know the file format.
///
/// # Example
///
/// ```rust
/// use zukei::prelude::*;
/// use zukei::snapshot::IntoFlow;
/// use zukei::error::ConversionError;
///
/// struct Outline {
///     title: String,
///     steps: Vec<String>,
/// }
///
/// impl IntoFlow for Outline {
///     fn into_flow(self) -> Result<Flow, ConversionError> {
///         let mut flow = Flow::new("outline", self.title);
///         for (i, label) in self.steps.into_iter().enumerate() {
///             flow.nodes.push(GraphNode::step(format!("s{}", i), label, Point::ORIGIN));
///         }
///         for i in 1..flow.nodes.len() {
///             flow.edges.push(GraphEdge::new(format!("e{}", i), format!("s{}", i - 1), format!("s{}", i)));
///         }
///         Ok(flow)
///     }
/// }
///
/// let flow = Outline { title: "Plan".into(), steps: vec!["Draft".into(), "Review".into()] }
///     .into_flow()
///     .unwrap();
/// assert_eq!(flow.edges.len(), 1);
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a flow.
    fn into_flow(self) -> Result<Flow, ConversionError>;
}
