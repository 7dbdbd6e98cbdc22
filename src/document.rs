//! TOML description of a flow graph
//!
//! A document lists the nodes, the node ids of the main flow, and one table
//! per alternate flow:
//!
//! ```toml
//! main = ["login", "check", "done"]
//!
//! [[node]]
//! id = "login"
//! width = 150.0
//! height = 60.0
//!
//! [[node]]
//! id = "check"
//!
//! [[node]]
//! id = "retry"
//!
//! [[node]]
//! id = "done"
//!
//! [[alternate]]
//! id = "wrong-password"
//! start = "check"
//! end = "login"
//! nodes = ["retry"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::GraphError;
use crate::graph::{FlowGraph, FlowId, NodeId};
use crate::layout::types::Size;

/// Errors that can occur when loading or building a graph document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read graph document: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse graph document TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown node '{id}' referenced by '{referenced_by}'")]
    UnknownNode { id: String, referenced_by: String },
    #[error("duplicate id '{id}'")]
    DuplicateId { id: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A node entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub hidden: bool,
}

/// An alternate flow entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternateSpec {
    pub id: String,
    /// Branching node; may be left out to describe a detached flow
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// A parsed graph document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub main: Vec<String>,
    #[serde(default, rename = "alternate")]
    pub alternates: Vec<AlternateSpec>,
}

impl GraphDocument {
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the graph. Node and flow tags hold the document ids.
    ///
    /// Structural completeness (every flow non-empty, every branch attached
    /// and merged) is left to layout validation.
    pub fn build(&self) -> Result<FlowGraph<String>, DocumentError> {
        let mut graph = FlowGraph::new();
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        for spec in &self.nodes {
            if ids.contains_key(spec.id.as_str()) {
                return Err(DocumentError::DuplicateId {
                    id: spec.id.clone(),
                });
            }
            let id = graph.create_node();
            let node = graph.node_mut(id);
            node.size = Size::new(spec.width, spec.height);
            node.hidden = spec.hidden;
            node.tag = Some(spec.id.clone());
            ids.insert(spec.id.as_str(), id);
        }

        let lookup = |id: &str, referenced_by: &str| {
            ids.get(id).copied().ok_or_else(|| DocumentError::UnknownNode {
                id: id.to_string(),
                referenced_by: referenced_by.to_string(),
            })
        };

        let main = graph.main_flow();
        for id in &self.main {
            graph.add_node(main, lookup(id, "main")?)?;
        }

        let mut flows: HashMap<&str, FlowId> = HashMap::new();
        for spec in &self.alternates {
            if flows.contains_key(spec.id.as_str()) {
                return Err(DocumentError::DuplicateId {
                    id: spec.id.clone(),
                });
            }
            let flow = graph.create_alternate_flow();
            {
                let alternate = graph.flow_mut(flow);
                alternate.collapsed = spec.collapsed;
                alternate.hidden = spec.hidden;
                alternate.tag = Some(spec.id.clone());
            }
            for id in &spec.nodes {
                graph.add_node(flow, lookup(id, &spec.id)?)?;
            }
            if let Some(start) = &spec.start {
                graph.add_alternate_flow(lookup(start, &spec.id)?, flow)?;
            }
            if let Some(end) = &spec.end {
                graph.set_end_node(flow, lookup(end, &spec.id)?)?;
            }
            flows.insert(spec.id.as_str(), flow);
        }

        Ok(graph)
    }
}
