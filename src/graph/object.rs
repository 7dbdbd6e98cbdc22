//! Flows, nodes and the identifiers that link them

use std::fmt;

use serde::Serialize;

use crate::layout::types::{Position, Rect, Size};

/// Index of a node inside its [`FlowGraph`](super::FlowGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// Index of a flow inside its [`FlowGraph`](super::FlowGraph). The main flow is always index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FlowId(pub(crate) usize);

impl FlowId {
    pub(crate) const MAIN: FlowId = FlowId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow #{}", self.0)
    }
}

/// Any object that takes part in layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphObject {
    Flow(FlowId),
    Node(NodeId),
}

impl From<FlowId> for GraphObject {
    fn from(id: FlowId) -> Self {
        GraphObject::Flow(id)
    }
}

impl From<NodeId> for GraphObject {
    fn from(id: NodeId) -> Self {
        GraphObject::Node(id)
    }
}

/// Geometry shared by flows and nodes
pub trait Positioned {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
    fn size(&self) -> Size;
    fn set_size(&mut self, size: Size);
    fn is_hidden(&self) -> bool;

    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position(), self.size())
    }
}

/// Role of a flow in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Main,
    Alternate {
        /// Branching node owning the flow
        start_node: Option<NodeId>,
        /// Node where the flow merges back
        end_node: Option<NodeId>,
    },
}

/// An ordered sequence of nodes
#[derive(Debug, Clone)]
pub struct Flow<T = ()> {
    id: FlowId,
    kind: FlowKind,
    nodes: Vec<NodeId>,
    /// Render as a single placeholder instead of expanding the nodes. Ignored on the main flow.
    pub collapsed: bool,
    pub hidden: bool,
    pub position: Position,
    pub size: Size,
    pub tag: Option<T>,
}

impl<T> Flow<T> {
    pub(crate) fn new(id: FlowId, kind: FlowKind) -> Self {
        Self {
            id,
            kind,
            nodes: Vec::new(),
            collapsed: false,
            hidden: false,
            position: Position::default(),
            size: Size::default(),
            tag: None,
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    pub fn is_alternate(&self) -> bool {
        matches!(self.kind, FlowKind::Alternate { .. })
    }

    pub fn start_node(&self) -> Option<NodeId> {
        match self.kind {
            FlowKind::Main => None,
            FlowKind::Alternate { start_node, .. } => start_node,
        }
    }

    pub fn end_node(&self) -> Option<NodeId> {
        match self.kind {
            FlowKind::Main => None,
            FlowKind::Alternate { end_node, .. } => end_node,
        }
    }

    /// Nodes in traversal order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn first_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed && self.is_alternate()
    }

    pub(crate) fn push_node(&mut self, node: NodeId) {
        self.nodes.push(node);
    }

    pub(crate) fn set_start_node(&mut self, node: NodeId) {
        if let FlowKind::Alternate { start_node, .. } = &mut self.kind {
            *start_node = Some(node);
        }
    }

    pub(crate) fn set_end_node(&mut self, node: NodeId) {
        if let FlowKind::Alternate { end_node, .. } = &mut self.kind {
            *end_node = Some(node);
        }
    }
}

impl<T> Positioned for Flow<T> {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// A single step of a flow
#[derive(Debug, Clone)]
pub struct Node<T = ()> {
    id: NodeId,
    flow: Option<FlowId>,
    alternate_flows: Vec<FlowId>,
    pub hidden: bool,
    pub position: Position,
    pub size: Size,
    pub tag: Option<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            flow: None,
            alternate_flows: Vec::new(),
            hidden: false,
            position: Position::default(),
            size: Size::default(),
            tag: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Flow the node was added to
    pub fn flow(&self) -> Option<FlowId> {
        self.flow
    }

    /// Outgoing branches in creation order
    pub fn alternate_flows(&self) -> &[FlowId] {
        &self.alternate_flows
    }

    pub fn is_branching(&self) -> bool {
        !self.alternate_flows.is_empty()
    }

    pub(crate) fn set_flow(&mut self, flow: FlowId) {
        self.flow = Some(flow);
    }

    pub(crate) fn push_alternate_flow(&mut self, flow: FlowId) {
        self.alternate_flows.push(flow);
    }
}

impl<T> Positioned for Node<T> {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}
