//! Connector synthesis between laid-out nodes

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{FlowGraph, FlowId, GraphObject, NodeId, Positioned};

use super::config::LayoutConfig;
use super::context::LayoutContext;
use super::engine::{active_branches, merge_node, visible_nodes, Grid};
use super::types::{Position, Rect};

/// Side of a rectangle a connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl ConnectionSide {
    /// Midpoint of this side of `rect`
    pub fn attachment_point(self, rect: &Rect) -> Position {
        match self {
            Self::Top => Position::new(rect.center_x(), rect.y),
            Self::Bottom => Position::new(rect.center_x(), rect.bottom()),
            Self::Left => Position::new(rect.x, rect.center_y()),
            Self::Right => Position::new(rect.right(), rect.center_y()),
        }
    }
}

/// One end of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Endpoint {
    Node(NodeId),
    /// The placeholder drawn for a collapsed alternate flow
    Placeholder(FlowId),
}

impl From<Endpoint> for GraphObject {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Node(id) => GraphObject::Node(id),
            Endpoint::Placeholder(id) => GraphObject::Flow(id),
        }
    }
}

/// A routed, directed connector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionInfo {
    pub start: Endpoint,
    pub end: Endpoint,
    pub start_side: ConnectionSide,
    pub end_side: ConnectionSide,
    /// Connector from the last node of a branch back to its end node
    pub is_return_connector: bool,
    /// Route after leaving the start attachment point, ending on the end
    /// attachment point. Empty for a straight connector.
    pub points: Vec<Position>,
}

impl ConnectionInfo {
    fn straight(start: Endpoint, end: Endpoint) -> Self {
        Self {
            start,
            end,
            start_side: ConnectionSide::Bottom,
            end_side: ConnectionSide::Top,
            is_return_connector: false,
            points: Vec::new(),
        }
    }

    pub fn is_straight(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Position> {
        self.points.last().copied()
    }
}

/// Build every connector of the graph in traversal order
pub(crate) fn build_connections<T>(
    graph: &FlowGraph<T>,
    ctx: &LayoutContext,
    grid: &Grid,
    config: &LayoutConfig,
) -> Vec<ConnectionInfo> {
    let mut router = Router {
        graph,
        ctx,
        grid,
        config,
        lanes: HashMap::new(),
        connections: Vec::new(),
    };
    router.route_flow(graph.main_flow());
    router.connections
}

struct Router<'a, T> {
    graph: &'a FlowGraph<T>,
    ctx: &'a LayoutContext,
    grid: &'a Grid,
    config: &'a LayoutConfig,
    /// Vertical return lanes already used beside a column
    lanes: HashMap<(usize, ConnectionSide), usize>,
    connections: Vec<ConnectionInfo>,
}

impl<T> Router<'_, T> {
    fn route_flow(&mut self, flow: FlowId) {
        let nodes = visible_nodes(self.graph, flow);
        for (index, &node) in nodes.iter().enumerate() {
            if let Some(&next) = nodes.get(index + 1) {
                self.connections.push(ConnectionInfo::straight(
                    Endpoint::Node(node),
                    Endpoint::Node(next),
                ));
            }

            for branch in active_branches(self.graph, node) {
                let collapsed = self.graph.flow(branch).is_collapsed();
                let branch_nodes = visible_nodes(self.graph, branch);
                let (first, last) = match (collapsed, branch_nodes.first(), branch_nodes.last()) {
                    (false, Some(&first), Some(&last)) => {
                        (Endpoint::Node(first), Endpoint::Node(last))
                    }
                    _ => (Endpoint::Placeholder(branch), Endpoint::Placeholder(branch)),
                };

                let connection = self.branch_connector(Endpoint::Node(node), first);
                self.connections.push(connection);
                if !collapsed {
                    self.route_flow(branch);
                }
                if let Some(end) = self.merge_target(branch) {
                    let connection = self.return_connector(last, end);
                    self.connections.push(connection);
                }
            }
        }
    }

    /// Endpoint a branch merges into, if it is laid out
    fn merge_target(&self, branch: FlowId) -> Option<Endpoint> {
        let end = merge_node(self.graph, branch)?;
        let target = match self.ctx.resolve(end) {
            GraphObject::Node(id) => Endpoint::Node(id),
            GraphObject::Flow(id) => Endpoint::Placeholder(id),
        };
        self.ctx.row(target).map(|_| target)
    }

    fn rect(&self, endpoint: Endpoint) -> Rect {
        match endpoint {
            Endpoint::Node(id) => self.graph.node(id).bounds(),
            Endpoint::Placeholder(id) => self.grid.placeholder_rect(self.ctx, id, self.config),
        }
    }

    fn cell(&self, endpoint: Endpoint) -> (usize, usize) {
        let data = self.ctx.get(endpoint).copied().unwrap_or_default();
        (data.col as usize, data.row.unwrap_or(0))
    }

    /// Drop below the source, cross over to the target column, drop into its top
    fn branch_connector(&self, start: Endpoint, end: Endpoint) -> ConnectionInfo {
        let source = self.rect(start);
        let target = self.rect(end);
        let mid = source.bottom() + (target.y - source.bottom()) / 2.0;
        let mut connection = ConnectionInfo::straight(start, end);
        connection.points = vec![
            Position::new(source.center_x(), mid),
            Position::new(target.center_x(), mid),
            ConnectionSide::Top.attachment_point(&target),
        ];
        connection
    }

    fn return_connector(&mut self, start: Endpoint, end: Endpoint) -> ConnectionInfo {
        let source = self.rect(start);
        let target = self.rect(end);
        let (source_col, source_row) = self.cell(start);
        let (target_col, target_row) = self.cell(end);
        let entry = ConnectionSide::Top.attachment_point(&target);
        let half_gap = self.config.vertical_cell_spacing / 2.0;
        let lane_above_end = self.grid.rows[target_row].start - half_gap;

        let points = if target_row > source_row {
            if source_col == target_col {
                vec![entry]
            } else {
                vec![
                    Position::new(source.center_x(), lane_above_end),
                    Position::new(target.center_x(), lane_above_end),
                    entry,
                ]
            }
        } else {
            // loop-back: leave downwards, climb in a lane beside the source column
            let lane_below_source = self.grid.rows[source_row].end() + half_gap;
            let side = if source_col >= target_col {
                ConnectionSide::Right
            } else {
                ConnectionSide::Left
            };
            let gap = if side == ConnectionSide::Left && source_col == 0 {
                self.config.horizontal_cell_spacing / 2.0
            } else {
                self.config.horizontal_cell_spacing
            };
            let used = self.lanes.entry((source_col, side)).or_insert(0);
            *used += 1;
            // lanes past the gap width share the outermost lane
            let lane = (*used).min(lane_capacity(gap, self.config.flow_spacing));
            let offset = self.config.flow_spacing * lane as f64;
            let column = self.grid.columns[source_col];
            let lane_x = match side {
                ConnectionSide::Left => column.start - offset,
                _ => column.end() + offset,
            };
            vec![
                Position::new(source.center_x(), lane_below_source),
                Position::new(lane_x, lane_below_source),
                Position::new(lane_x, lane_above_end),
                Position::new(target.center_x(), lane_above_end),
                entry,
            ]
        };

        ConnectionInfo {
            start,
            end,
            start_side: ConnectionSide::Bottom,
            end_side: ConnectionSide::Top,
            is_return_connector: true,
            points,
        }
    }
}

/// Number of lanes that fit strictly inside a gap of `gap` pixels
fn lane_capacity(gap: f64, spacing: f64) -> usize {
    if spacing <= 0.0 || gap <= spacing {
        return 1;
    }
    ((gap / spacing).ceil() as usize).saturating_sub(1).max(1)
}
