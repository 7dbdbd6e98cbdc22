//! Error types for the layout engine

use thiserror::Error;

use crate::graph::{FlowId, NodeId};

/// Structural problems found before any geometry is computed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("At least one flow has no nodes")]
    EmptyFlow { flow: FlowId },

    #[error("At least one alternate row has no start node")]
    MissingStartNode { flow: FlowId },

    #[error("At least one alternate row has no end node")]
    MissingEndNode { flow: FlowId },

    #[error("At least one node is not part of any flow")]
    OrphanNode { node: NodeId },

    #[error("At least one alternate flow is nested inside itself")]
    CyclicFlow { flow: FlowId },
}

impl LayoutError {
    /// Flow the error refers to, if any
    pub fn flow(&self) -> Option<FlowId> {
        match self {
            Self::EmptyFlow { flow }
            | Self::MissingStartNode { flow }
            | Self::MissingEndNode { flow }
            | Self::CyclicFlow { flow } => Some(*flow),
            Self::OrphanNode { .. } => None,
        }
    }

    /// Node the error refers to, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::OrphanNode { node } => Some(*node),
            _ => None,
        }
    }
}
