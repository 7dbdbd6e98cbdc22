//! Flow-graph layout engine for use-case and process diagrams
//!
//! A [`FlowGraph`] holds a main flow of nodes; nodes may own alternate flows
//! that branch off and merge back at an end node. [`LayoutCalculator`]
//! assigns every node a column and a row, turns them into positions, computes
//! flow bounds and routes the connectors.
//!
//! # Example
//!
//! ```rust
//! use flowgraph_layout::{FlowGraph, LayoutCalculator, Size};
//!
//! let mut graph: FlowGraph = FlowGraph::new();
//! let main = graph.main_flow();
//! for _ in 0..3 {
//!     let node = graph.create_node();
//!     graph.node_mut(node).size = Size::new(150.0, 60.0);
//!     graph.add_node(main, node).unwrap();
//! }
//!
//! let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();
//! assert_eq!(result.connections().len(), 2);
//! assert_eq!(graph.nodes()[1].position.y, 120.0);
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod layout;
pub mod report;

pub use document::{DocumentError, GraphDocument};
pub use error::GraphError;
pub use graph::{Flow, FlowGraph, FlowId, FlowKind, GraphObject, Node, NodeId, Positioned};
pub use layout::{
    ConfigError, ConnectionInfo, ConnectionSide, Endpoint, LayoutCalculator, LayoutConfig,
    LayoutError, LayoutResult, MinMax, Position, Rect, Size,
};
pub use report::LayoutReport;

use thiserror::Error;

/// Errors that can occur in the document pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("report error: {0}")]
    Report(#[from] toml::ser::Error),
}

/// Build the graph described by a TOML document and lay it out
///
/// # Example
///
/// ```rust
/// use flowgraph_layout::{arrange_document, LayoutConfig};
///
/// let (graph, result) = arrange_document(
///     r#"
///     main = ["a", "b"]
///     [[node]]
///     id = "a"
///     [[node]]
///     id = "b"
///     "#,
///     &LayoutConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.connections().len(), 1);
/// assert_eq!(graph.nodes()[0].size.width, 150.0);
/// ```
pub fn arrange_document(
    source: &str,
    config: &LayoutConfig,
) -> Result<(FlowGraph<String>, LayoutResult), Error> {
    let mut graph = GraphDocument::from_str(source)?.build()?;
    let result = LayoutCalculator::new(config.clone()).arrange_graph(&mut graph)?;
    Ok((graph, result))
}

/// Lay out a TOML graph document and render the report as TOML
pub fn layout_to_toml(source: &str, config: &LayoutConfig) -> Result<String, Error> {
    let (graph, result) = arrange_document(source, config)?;
    Ok(LayoutReport::new(&graph, &result).to_toml()?)
}
