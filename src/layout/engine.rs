//! Layout computation engine
//!
//! [`LayoutCalculator::arrange_graph`] runs four stages over a [`FlowGraph`]:
//!
//! 1. **Validation**: structural checks, see [`validate`]
//! 2. **Ranking**: rows are assigned depth-first, then columns are packed so
//!    branches never overlap
//! 3. **Placement**: ranks become pixel positions; flow bounds are derived
//! 4. **Routing**: connectors are synthesized, see [`super::routing`]
//!
//! Ranks are kept in a [`LayoutContext`] that only lives for one call.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::graph::{FlowGraph, FlowId, GraphObject, NodeId, Positioned};

use super::config::LayoutConfig;
use super::context::LayoutContext;
use super::error::LayoutError;
use super::routing::{self, ConnectionInfo};
use super::types::{MinMax, Rect, Size};

/// Computes positions, sizes and connectors for a flow graph
#[derive(Debug, Clone, Default)]
pub struct LayoutCalculator {
    config: LayoutConfig,
}

/// What a layout pass produced besides the geometry written into the graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    connections: Vec<ConnectionInfo>,
    nodes: Vec<NodeId>,
    flows: Vec<FlowId>,
    /// Smallest rectangle containing every placed node and placeholder
    pub bounds: Rect,
    pub row_count: usize,
    pub column_count: usize,
}

impl LayoutResult {
    /// Connectors in traversal order
    pub fn connections(&self) -> &[ConnectionInfo] {
        &self.connections
    }

    pub fn into_connections(self) -> Vec<ConnectionInfo> {
        self.connections
    }

    pub fn return_connectors(&self) -> impl Iterator<Item = &ConnectionInfo> {
        self.connections.iter().filter(|c| c.is_return_connector)
    }

    /// Nodes that received a position, in creation order. Hidden nodes and
    /// nodes inside collapsed flows are not part of it.
    pub fn placed_nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Flows that received bounds, in creation order
    pub fn placed_flows(&self) -> &[FlowId] {
        &self.flows
    }

    pub fn is_placed(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}

impl LayoutCalculator {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph` in place.
    ///
    /// Writes `position` and `size` of every visible node and flow. Nothing is
    /// written when validation fails.
    pub fn arrange_graph<T>(&self, graph: &mut FlowGraph<T>) -> Result<LayoutResult, LayoutError> {
        validate(graph)?;
        debug!(
            nodes = graph.nodes().len(),
            flows = graph.flows().len(),
            "arranging flow graph"
        );

        self.apply_default_sizes(graph);

        let mut ctx = LayoutContext::new();
        let main = graph.main_flow();
        if visible_nodes(graph, main).is_empty() {
            debug!("main flow has no visible node");
            return Ok(LayoutResult::default());
        }

        ctx.entry(main).row = Some(0);
        self.assign_rows(graph, &mut ctx, main, 0);
        self.place_branches(graph, &mut ctx, main);
        resolve_columns(graph, &mut ctx, main, 0);
        normalize_columns(&mut ctx);

        let grid = Grid::measure(graph, &ctx, &self.config);
        debug!(
            rows = grid.rows.len(),
            columns = grid.columns.len(),
            "ranks assigned"
        );

        self.position_nodes(graph, &ctx, &grid);
        self.compute_flow_bounds(graph, &ctx, &grid, main);

        let connections = routing::build_connections(graph, &ctx, &grid, &self.config);
        debug!(connections = connections.len(), "connectors routed");

        let mut nodes = Vec::new();
        let mut flows = Vec::new();
        for (object, _) in ctx.placed() {
            match object {
                GraphObject::Node(id) => nodes.push(id),
                GraphObject::Flow(id) => flows.push(id),
            }
        }
        nodes.sort();
        flows.sort();

        Ok(LayoutResult {
            connections,
            nodes,
            flows,
            bounds: grid.content_bounds(graph, &ctx, &self.config),
            row_count: grid.rows.len(),
            column_count: grid.columns.len(),
        })
    }

    fn apply_default_sizes<T>(&self, graph: &mut FlowGraph<T>) {
        let default = self.default_size();
        for index in 0..graph.nodes().len() {
            let node = graph.node_mut(NodeId(index));
            if node.size.is_empty() {
                node.size = default;
            }
        }
    }

    fn default_size(&self) -> Size {
        Size::new(self.config.node_default_width, self.config.node_default_height)
    }

    // ============================================
    // Rows
    // ============================================

    /// Assign rows to the visible nodes of `flow`, starting at `start_row`.
    /// Returns the last row the flow occupies.
    fn assign_rows<T>(
        &self,
        graph: &FlowGraph<T>,
        ctx: &mut LayoutContext,
        flow: FlowId,
        start_row: usize,
    ) -> usize {
        let mut previous: Option<usize> = None;
        for node in visible_nodes(graph, flow) {
            let mut row = previous.map_or(start_row, |p| p + 1);
            if let Some(merge_row) = ctx.get(node).and_then(|d| d.merge_row) {
                row = row.max(merge_row);
            }
            ctx.entry(node).row = Some(row);

            for branch in active_branches(graph, node) {
                let branch_row = row + 1;
                ctx.entry(branch).row = Some(branch_row);
                let last_row = if graph.flow(branch).is_collapsed() {
                    collapse(graph, ctx, branch);
                    branch_row
                } else {
                    self.assign_rows(graph, ctx, branch, branch_row)
                };
                ctx.entry(branch).last_row = Some(last_row);

                if let Some(end) = merge_node(graph, branch) {
                    // an end node that already has a row is a loop-back merge
                    if ctx.row(ctx.resolve(end)).is_none() {
                        let data = ctx.entry(end);
                        data.merge_row = Some(
                            data.merge_row
                                .map_or(last_row + 1, |r| r.max(last_row + 1)),
                        );
                    }
                }
            }
            previous = Some(row);
        }
        let last_row = previous.unwrap_or(start_row);
        ctx.entry(flow).last_row = Some(last_row);
        last_row
    }

    // ============================================
    // Columns
    // ============================================

    /// Pack the branches of `flow` next to it and return the occupied shape,
    /// relative to the column of `flow`.
    fn place_branches<T>(&self, graph: &FlowGraph<T>, ctx: &mut LayoutContext, flow: FlowId) -> Shape {
        let mut shape = Shape::default();
        let first_row = ctx.row(flow).unwrap_or(0);
        shape.occupy(0, first_row, reach(graph, ctx, flow));

        for node in visible_nodes(graph, flow) {
            for (index, branch) in active_branches(graph, node).into_iter().enumerate() {
                let child = if graph.flow(branch).is_collapsed() {
                    let mut child = Shape::default();
                    let row = ctx.row(branch).unwrap_or(first_row);
                    child.occupy(0, row, reach(graph, ctx, branch));
                    child
                } else {
                    self.place_branches(graph, ctx, branch)
                };

                let step = if index % 2 == 0 { 1 } else { -1 };
                let mut offset = step;
                while shape.collides(&child, offset) {
                    offset += step;
                }
                trace!(%branch, offset, "branch placed");
                shape.merge(&child, offset);
                ctx.entry(branch).col = offset;
            }
        }
        shape
    }

    // ============================================
    // Placement
    // ============================================

    fn position_nodes<T>(&self, graph: &mut FlowGraph<T>, ctx: &LayoutContext, grid: &Grid) {
        let entry = visible_nodes(graph, graph.main_flow()).first().copied();
        let placed: Vec<(NodeId, usize, usize)> = ctx
            .placed()
            .filter_map(|(object, data)| match object {
                GraphObject::Node(id) => Some((id, data.col as usize, data.row.unwrap_or(0))),
                GraphObject::Flow(_) => None,
            })
            .collect();

        for (id, col, row) in placed {
            let node = graph.node_mut(id);
            let mut position = grid.cell_rect(col, row, node.size).position();
            if Some(id) == entry && !self.config.disable_vertical_displacement {
                position.y -= self.config.vertical_cell_spacing / 4.0;
            }
            node.position = position;
        }
    }

    /// Bounds of an expanded flow: the extent of its nodes and nested flows, seeded at the origin
    fn compute_flow_bounds<T>(
        &self,
        graph: &mut FlowGraph<T>,
        ctx: &LayoutContext,
        grid: &Grid,
        flow: FlowId,
    ) -> Rect {
        let mut bounds = if graph.flow(flow).is_collapsed() {
            grid.placeholder_rect(ctx, flow, &self.config)
        } else {
            let mut xs = MinMax::new();
            let mut ys = MinMax::new();
            let mut include = |rect: Rect| {
                xs.update(rect.x);
                xs.update(rect.right());
                ys.update(rect.y);
                ys.update(rect.bottom());
            };
            for node in visible_nodes(graph, flow) {
                include(graph.node(node).bounds());
                for branch in active_branches(graph, node) {
                    include(self.compute_flow_bounds(graph, ctx, grid, branch));
                }
            }
            Rect::new(xs.min, ys.min, xs.extent(), ys.extent())
        };
        bounds.inflate(self.config.flow_padding);

        let flow = graph.flow_mut(flow);
        flow.position = bounds.position();
        flow.size = bounds.size();
        bounds
    }
}

/// Check the structural invariants of `graph`.
///
/// Each check runs over the whole graph before the next one starts, so the
/// reported error kind does not depend on creation order.
pub fn validate<T>(graph: &FlowGraph<T>) -> Result<(), LayoutError> {
    if let Some(flow) = graph.flows().iter().find(|f| f.nodes().is_empty()) {
        return Err(LayoutError::EmptyFlow { flow: flow.id() });
    }
    if let Some(flow) = graph
        .alternate_flows()
        .iter()
        .find(|f| f.start_node().is_none())
    {
        return Err(LayoutError::MissingStartNode { flow: flow.id() });
    }
    if let Some(flow) = graph
        .alternate_flows()
        .iter()
        .find(|f| f.end_node().is_none())
    {
        return Err(LayoutError::MissingEndNode { flow: flow.id() });
    }
    if let Some(node) = graph.nodes().iter().find(|n| n.flow().is_none()) {
        return Err(LayoutError::OrphanNode { node: node.id() });
    }
    if let Some(flow) = graph
        .alternate_flows()
        .iter()
        .find(|f| !graph.is_child(f.id(), Some(graph.main_flow())))
    {
        return Err(LayoutError::CyclicFlow { flow: flow.id() });
    }
    Ok(())
}

/// Nodes of `flow` that take part in layout
pub(crate) fn visible_nodes<T>(graph: &FlowGraph<T>, flow: FlowId) -> Vec<NodeId> {
    graph
        .flow(flow)
        .nodes()
        .iter()
        .copied()
        .filter(|&node| !graph.node(node).hidden)
        .collect()
}

/// Branches of a visible node that take part in layout
pub(crate) fn active_branches<T>(graph: &FlowGraph<T>, node: NodeId) -> Vec<FlowId> {
    graph
        .node(node)
        .alternate_flows()
        .iter()
        .copied()
        .filter(|&flow| !graph.flow(flow).hidden && !visible_nodes(graph, flow).is_empty())
        .collect()
}

/// Node a branch merges into: its end node, or the first visible node after a
/// hidden end node in that node's flow. `None` when nothing visible follows.
pub(crate) fn merge_node<T>(graph: &FlowGraph<T>, branch: FlowId) -> Option<NodeId> {
    let end = graph.flow(branch).end_node()?;
    if !graph.node(end).hidden {
        return Some(end);
    }
    let nodes = graph.flow(graph.node(end).flow()?).nodes();
    let index = nodes.iter().position(|&node| node == end)?;
    nodes[index + 1..]
        .iter()
        .copied()
        .find(|&node| !graph.node(node).hidden)
}

/// Mark everything inside a collapsed flow as replaced by its placeholder.
/// Objects already replaced by an enclosing collapsed flow keep that replacement.
fn collapse<T>(graph: &FlowGraph<T>, ctx: &mut LayoutContext, flow: FlowId) {
    for object in graph.child_objects(flow) {
        let data = ctx.entry(object);
        if data.replacement.is_none() {
            data.replacement = Some(GraphObject::Flow(flow));
        }
    }
}

/// Last row a flow reserves in its column. A branch merging further down keeps
/// its column free until the row above its end node.
fn reach<T>(graph: &FlowGraph<T>, ctx: &LayoutContext, flow: FlowId) -> usize {
    let data = ctx.get(flow).copied().unwrap_or_default();
    let last_row = data.last_row.or(data.row).unwrap_or(0);
    let end_row = merge_node(graph, flow).and_then(|end| ctx.row(ctx.resolve(end)));
    match end_row {
        Some(end_row) if end_row > last_row => end_row - 1,
        _ => last_row,
    }
}

/// Turn relative branch offsets into columns, with the main flow at `col`
fn resolve_columns<T>(graph: &FlowGraph<T>, ctx: &mut LayoutContext, flow: FlowId, col: i32) {
    ctx.entry(flow).col = col;
    for node in visible_nodes(graph, flow) {
        ctx.entry(node).col = col;
        for branch in active_branches(graph, node) {
            let branch_col = col + ctx.col(branch);
            if graph.flow(branch).is_collapsed() {
                ctx.entry(branch).col = branch_col;
            } else {
                resolve_columns(graph, ctx, branch, branch_col);
            }
        }
    }
}

/// Shift every column so the leftmost one is 0
fn normalize_columns(ctx: &mut LayoutContext) {
    let placed: Vec<GraphObject> = ctx.placed().map(|(object, _)| object).collect();
    let min = placed.iter().map(|&o| ctx.col(o)).min().unwrap_or(0);
    for object in placed {
        ctx.entry(object).col -= min;
    }
}

/// Row intervals occupied per relative column
#[derive(Debug, Default, Clone)]
struct Shape {
    cells: BTreeMap<i32, Vec<(usize, usize)>>,
}

impl Shape {
    fn occupy(&mut self, col: i32, first: usize, last: usize) {
        self.cells.entry(col).or_default().push((first, last));
    }

    /// Would `other`, shifted by `offset` columns, overlap this shape
    fn collides(&self, other: &Shape, offset: i32) -> bool {
        other.cells.iter().any(|(col, spans)| {
            self.cells.get(&(col + offset)).is_some_and(|taken| {
                spans
                    .iter()
                    .any(|&(a, b)| taken.iter().any(|&(c, d)| a <= d && c <= b))
            })
        })
    }

    fn merge(&mut self, other: &Shape, offset: i32) {
        for (col, spans) in &other.cells {
            self.cells
                .entry(col + offset)
                .or_default()
                .extend(spans.iter().copied());
        }
    }
}

/// A column or a row of the layout grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Band {
    pub start: f64,
    pub extent: f64,
}

impl Band {
    pub fn end(&self) -> f64 {
        self.start + self.extent
    }
}

/// Pixel extents of every column and row
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub columns: Vec<Band>,
    pub rows: Vec<Band>,
}

impl Grid {
    fn measure<T>(graph: &FlowGraph<T>, ctx: &LayoutContext, config: &LayoutConfig) -> Self {
        let mut widths: Vec<f64> = Vec::new();
        let mut heights: Vec<Option<f64>> = Vec::new();

        for (object, data) in ctx.placed() {
            let size = match object {
                GraphObject::Node(id) => graph.node(id).size,
                GraphObject::Flow(id) if graph.flow(id).is_collapsed() => {
                    Size::new(config.node_default_width, config.node_default_height)
                }
                GraphObject::Flow(_) => continue,
            };
            let col = data.col as usize;
            let row = data.row.unwrap_or(0);
            if widths.len() <= col {
                widths.resize(col + 1, config.node_default_width);
            }
            if heights.len() <= row {
                heights.resize(row + 1, None);
            }
            widths[col] = widths[col].max(size.width);
            heights[row] = Some(heights[row].map_or(size.height, |h| h.max(size.height)));
        }

        let columns = bands(
            widths.into_iter(),
            config.horizontal_cell_spacing / 2.0,
            config.horizontal_cell_spacing,
        );
        let rows = bands(
            heights
                .into_iter()
                .map(|h| h.unwrap_or(config.node_default_height)),
            config.vertical_cell_spacing,
            config.vertical_cell_spacing,
        );
        Self { columns, rows }
    }

    /// Rectangle of `size` centered in the cell at (`col`, `row`)
    pub fn cell_rect(&self, col: usize, row: usize, size: Size) -> Rect {
        let column = self.columns[col];
        let band = self.rows[row];
        Rect::new(
            column.start + (column.extent - size.width) / 2.0,
            band.start + (band.extent - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    /// Compact rectangle standing in for a collapsed flow, before padding
    pub fn placeholder_rect(&self, ctx: &LayoutContext, flow: FlowId, config: &LayoutConfig) -> Rect {
        let data = ctx.get(flow).copied().unwrap_or_default();
        self.cell_rect(
            data.col as usize,
            data.row.unwrap_or(0),
            Size::new(config.node_default_width, config.node_default_height),
        )
    }

    fn content_bounds<T>(&self, graph: &FlowGraph<T>, ctx: &LayoutContext, config: &LayoutConfig) -> Rect {
        let rects: Vec<Rect> = ctx
            .placed()
            .filter_map(|(object, _)| match object {
                GraphObject::Node(id) => Some(graph.node(id).bounds()),
                GraphObject::Flow(id) if graph.flow(id).is_collapsed() => {
                    Some(self.placeholder_rect(ctx, id, config))
                }
                GraphObject::Flow(_) => None,
            })
            .collect();
        Rect::union_all(&rects)
    }
}

fn bands(extents: impl Iterator<Item = f64>, first: f64, gap: f64) -> Vec<Band> {
    let mut start = first;
    extents
        .map(|extent| {
            let band = Band { start, extent };
            start += extent + gap;
            band
        })
        .collect()
}
