//! Error types for graph construction

use thiserror::Error;

use crate::graph::{FlowId, NodeId};

/// Errors raised by the graph mutation methods.
///
/// All of them mean an object was already wired to something else; the graph
/// is left unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{node} already belongs to {flow}")]
    NodeAlreadyAssigned { node: NodeId, flow: FlowId },

    #[error("{flow} is already attached to {start_node}")]
    StartNodeAlreadyAssigned { flow: FlowId, start_node: NodeId },

    #[error("{flow} is the main flow and cannot be used as an alternate flow")]
    NotAlternate { flow: FlowId },
}
