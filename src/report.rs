//! Serializable summary of a layout pass

use std::fmt::Display;

use serde::Serialize;

use crate::graph::{FlowGraph, FlowId, NodeId};
use crate::layout::{ConnectionInfo, Endpoint, LayoutResult, Rect};

/// Kind of a connector, as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Direct,
    Branch,
    Return,
}

impl ConnectionKind {
    pub fn of(connection: &ConnectionInfo) -> Self {
        if connection.is_return_connector {
            Self::Return
        } else if connection.is_straight() {
            Self::Direct
        } else {
            Self::Branch
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionReport {
    pub from: String,
    pub to: String,
    pub kind: ConnectionKind,
    pub points: Vec<[f64; 2]>,
}

/// Geometry of every placed object plus the connectors, labelled by tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub bounds: Rect,
    #[serde(rename = "node")]
    pub nodes: Vec<NodeReport>,
    #[serde(rename = "flow")]
    pub flows: Vec<FlowReport>,
    #[serde(rename = "connection")]
    pub connections: Vec<ConnectionReport>,
}

impl LayoutReport {
    /// Objects without a tag are labelled by their id
    pub fn new<T: Display>(graph: &FlowGraph<T>, result: &LayoutResult) -> Self {
        let nodes = result
            .placed_nodes()
            .iter()
            .map(|&id| {
                let node = graph.node(id);
                NodeReport {
                    id: node_label(graph, id),
                    x: node.position.x,
                    y: node.position.y,
                    width: node.size.width,
                    height: node.size.height,
                }
            })
            .collect();

        let flows = result
            .placed_flows()
            .iter()
            .map(|&id| {
                let flow = graph.flow(id);
                FlowReport {
                    id: flow_label(graph, id),
                    x: flow.position.x,
                    y: flow.position.y,
                    width: flow.size.width,
                    height: flow.size.height,
                    collapsed: flow.is_collapsed(),
                }
            })
            .collect();

        let connections = result
            .connections()
            .iter()
            .map(|connection| ConnectionReport {
                from: endpoint_label(graph, connection.start),
                to: endpoint_label(graph, connection.end),
                kind: ConnectionKind::of(connection),
                points: connection.points.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        Self {
            bounds: result.bounds,
            nodes,
            flows,
            connections,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

fn node_label<T: Display>(graph: &FlowGraph<T>, id: NodeId) -> String {
    graph
        .node(id)
        .tag
        .as_ref()
        .map_or_else(|| id.to_string(), ToString::to_string)
}

fn flow_label<T: Display>(graph: &FlowGraph<T>, id: FlowId) -> String {
    graph
        .flow(id)
        .tag
        .as_ref()
        .map_or_else(|| id.to_string(), ToString::to_string)
}

fn endpoint_label<T: Display>(graph: &FlowGraph<T>, endpoint: Endpoint) -> String {
    match endpoint {
        Endpoint::Node(id) => node_label(graph, id),
        Endpoint::Placeholder(id) => flow_label(graph, id),
    }
}
