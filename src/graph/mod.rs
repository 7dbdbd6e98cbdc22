//! In-memory model of a flow diagram
//!
//! A [`FlowGraph`] owns every flow and node; objects refer to each other through
//! [`FlowId`] and [`NodeId`] indices. Objects can only be created through the
//! graph factories, so an id is only meaningful for the graph that issued it.

pub mod object;

pub use object::{Flow, FlowId, FlowKind, GraphObject, Node, NodeId, Positioned};

use crate::error::GraphError;

/// Root container: the main flow plus every alternate flow and node
#[derive(Debug, Clone)]
pub struct FlowGraph<T = ()> {
    flows: Vec<Flow<T>>,
    nodes: Vec<Node<T>>,
}

impl<T> Default for FlowGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlowGraph<T> {
    /// Create a graph holding an empty main flow
    pub fn new() -> Self {
        Self {
            flows: vec![Flow::new(FlowId::MAIN, FlowKind::Main)],
            nodes: Vec::new(),
        }
    }

    pub fn main_flow(&self) -> FlowId {
        FlowId::MAIN
    }

    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id));
        id
    }

    pub fn create_alternate_flow(&mut self) -> FlowId {
        let id = FlowId(self.flows.len());
        self.flows.push(Flow::new(
            id,
            FlowKind::Alternate {
                start_node: None,
                end_node: None,
            },
        ));
        id
    }

    /// Every flow, main flow first
    pub fn flows(&self) -> &[Flow<T>] {
        &self.flows
    }

    /// Alternate flows in creation order
    pub fn alternate_flows(&self) -> &[Flow<T>] {
        &self.flows[1..]
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    pub fn flow(&self, id: FlowId) -> &Flow<T> {
        &self.flows[id.0]
    }

    pub fn flow_mut(&mut self, id: FlowId) -> &mut Flow<T> {
        &mut self.flows[id.0]
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    pub fn object(&self, object: GraphObject) -> &dyn Positioned {
        match object {
            GraphObject::Flow(id) => self.flow(id),
            GraphObject::Node(id) => self.node(id),
        }
    }

    pub fn object_mut(&mut self, object: GraphObject) -> &mut dyn Positioned {
        match object {
            GraphObject::Flow(id) => self.flow_mut(id),
            GraphObject::Node(id) => self.node_mut(id),
        }
    }

    /// Append `node` to `flow`. A node can join exactly one flow, once.
    pub fn add_node(&mut self, flow: FlowId, node: NodeId) -> Result<(), GraphError> {
        if let Some(current) = self.node(node).flow() {
            return Err(GraphError::NodeAlreadyAssigned {
                node,
                flow: current,
            });
        }
        self.node_mut(node).set_flow(flow);
        self.flow_mut(flow).push_node(node);
        Ok(())
    }

    /// Attach `flow` as the next branch of `node`
    pub fn add_alternate_flow(&mut self, node: NodeId, flow: FlowId) -> Result<(), GraphError> {
        match self.flow(flow).kind() {
            FlowKind::Main => return Err(GraphError::NotAlternate { flow }),
            FlowKind::Alternate {
                start_node: Some(start_node),
                ..
            } => return Err(GraphError::StartNodeAlreadyAssigned { flow, start_node }),
            FlowKind::Alternate { .. } => {}
        }
        self.flow_mut(flow).set_start_node(node);
        self.node_mut(node).push_alternate_flow(flow);
        Ok(())
    }

    /// Set the node where `flow` merges back. Can be reassigned until layout.
    pub fn set_end_node(&mut self, flow: FlowId, node: NodeId) -> Result<(), GraphError> {
        if !self.flow(flow).is_alternate() {
            return Err(GraphError::NotAlternate { flow });
        }
        self.flow_mut(flow).set_end_node(node);
        Ok(())
    }

    /// Flow containing the start node of `flow`; `None` for the main flow or a detached branch
    pub fn parent_flow(&self, flow: FlowId) -> Option<FlowId> {
        self.flow(flow)
            .start_node()
            .and_then(|node| self.node(node).flow())
    }

    /// True when `candidate` is `flow` itself or one of its enclosing flows.
    ///
    /// A `None` candidate matches any flow.
    pub fn is_child(&self, flow: FlowId, candidate: Option<FlowId>) -> bool {
        let Some(candidate) = candidate else {
            return true;
        };
        let mut current = Some(flow);
        // bounded so a self-nested branch cannot loop forever
        for _ in 0..self.flows.len() {
            match current {
                Some(id) if id == candidate => return true,
                Some(id) => current = self.parent_flow(id),
                None => return false,
            }
        }
        false
    }

    /// Every node and nested alternate flow reachable from `flow`, in pre-order.
    ///
    /// `flow` itself is not part of the result.
    pub fn child_objects(&self, flow: FlowId) -> Vec<GraphObject> {
        let mut objects = Vec::new();
        let mut visited = vec![false; self.flows.len()];
        self.collect_objects(flow, &mut objects, &mut visited);
        objects.remove(0);
        objects
    }

    fn collect_objects(
        &self,
        flow: FlowId,
        objects: &mut Vec<GraphObject>,
        visited: &mut [bool],
    ) {
        if visited[flow.0] {
            return;
        }
        visited[flow.0] = true;
        objects.push(GraphObject::Flow(flow));
        for &node in self.flow(flow).nodes() {
            objects.push(GraphObject::Node(node));
            for &branch in self.node(node).alternate_flows() {
                self.collect_objects(branch, objects, visited);
            }
        }
    }
}
