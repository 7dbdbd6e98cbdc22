//! Calibrated layout scenarios for the flow-graph calculator

use flowgraph_layout::{
    FlowGraph, FlowId, LayoutCalculator, LayoutConfig, NodeId, Position, Rect, Size,
};
use pretty_assertions::assert_eq;

fn sized_node(graph: &mut FlowGraph, width: f64, height: f64) -> NodeId {
    let node = graph.create_node();
    graph.node_mut(node).size = Size::new(width, height);
    node
}

fn add(graph: &mut FlowGraph, flow: FlowId, width: f64, height: f64) -> NodeId {
    let node = sized_node(graph, width, height);
    graph.add_node(flow, node).unwrap();
    node
}

fn branch(graph: &mut FlowGraph, start: NodeId, end: NodeId, len: usize) -> (FlowId, Vec<NodeId>) {
    let flow = graph.create_alternate_flow();
    let nodes = (0..len).map(|_| add(graph, flow, 150.0, 60.0)).collect();
    graph.add_alternate_flow(start, flow).unwrap();
    graph.set_end_node(flow, end).unwrap();
    (flow, nodes)
}

fn position(graph: &FlowGraph, node: NodeId) -> Position {
    graph.node(node).position
}

fn flow_bounds(graph: &FlowGraph, flow: FlowId) -> Rect {
    let flow = graph.flow(flow);
    Rect::from_parts(flow.position, flow.size)
}

struct Branching {
    graph: FlowGraph,
    main: Vec<NodeId>,
    right: (FlowId, Vec<NodeId>),
    left: (FlowId, Vec<NodeId>),
}

/// Main flow n0, n1 (30x30, branching), n2, n3; two branches from n1 merging at n3
fn branching_graph(right_len: usize, left_len: usize) -> Branching {
    let mut graph = FlowGraph::new();
    let main_flow = graph.main_flow();
    let n0 = add(&mut graph, main_flow, 150.0, 60.0);
    let n1 = add(&mut graph, main_flow, 30.0, 30.0);
    let n2 = add(&mut graph, main_flow, 150.0, 60.0);
    let n3 = add(&mut graph, main_flow, 150.0, 60.0);
    let right = branch(&mut graph, n1, n3, right_len);
    let left = branch(&mut graph, n1, n3, left_len);
    Branching {
        graph,
        main: vec![n0, n1, n2, n3],
        right,
        left,
    }
}

#[test]
fn test_sequential_main_flow() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let nodes: Vec<NodeId> = (0..3).map(|_| add(&mut graph, main, 150.0, 60.0)).collect();

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, nodes[0]), Position::new(30.0, 22.5));
    assert_eq!(position(&graph, nodes[1]), Position::new(30.0, 120.0));
    assert_eq!(position(&graph, nodes[2]), Position::new(30.0, 210.0));
    assert_eq!(result.connections().len(), 2);
    assert_eq!(result.row_count, 3);
    assert_eq!(result.column_count, 1);
    assert_eq!(flow_bounds(&graph, main), Rect::new(-5.0, -5.0, 190.0, 280.0));
}

#[test]
fn test_nodes_without_size_use_defaults() {
    let mut graph: FlowGraph = FlowGraph::new();
    let main = graph.main_flow();
    let nodes: Vec<NodeId> = (0..3)
        .map(|_| {
            let node = graph.create_node();
            graph.add_node(main, node).unwrap();
            node
        })
        .collect();

    LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(graph.node(nodes[0]).size, Size::new(150.0, 60.0));
    assert_eq!(position(&graph, nodes[2]), Position::new(30.0, 210.0));
}

#[test]
fn test_vertical_displacement_can_be_disabled() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let first = add(&mut graph, main, 150.0, 60.0);
    let second = add(&mut graph, main, 150.0, 60.0);

    let config = LayoutConfig::default().with_vertical_displacement(false);
    LayoutCalculator::new(config).arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, first), Position::new(30.0, 30.0));
    assert_eq!(position(&graph, second), Position::new(30.0, 120.0));
}

#[test]
fn test_two_branches_fan_out_left_and_right() {
    let Branching {
        mut graph,
        main,
        right,
        left,
    } = branching_graph(1, 1);

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, main[0]), Position::new(240.0, 22.5));
    assert_eq!(position(&graph, main[1]), Position::new(300.0, 120.0));
    assert_eq!(position(&graph, main[2]), Position::new(240.0, 180.0));
    assert_eq!(position(&graph, main[3]), Position::new(240.0, 270.0));
    assert_eq!(position(&graph, right.1[0]), Position::new(450.0, 180.0));
    assert_eq!(position(&graph, left.1[0]), Position::new(30.0, 180.0));
    assert_eq!(result.connections().len(), 7);
    assert_eq!(result.column_count, 3);
}

#[test]
fn test_collapsed_branch_is_a_placeholder() {
    let Branching {
        mut graph,
        main,
        right,
        left,
    } = branching_graph(3, 2);
    graph.flow_mut(left.0).collapsed = true;

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(flow_bounds(&graph, left.0), Rect::new(25.0, 175.0, 160.0, 70.0));
    assert_eq!(flow_bounds(&graph, right.0), Rect::new(-5.0, -5.0, 610.0, 430.0));

    // the end node sits below the longest expanded branch only
    assert_eq!(position(&graph, main[3]), Position::new(240.0, 450.0));
    assert_eq!(result.row_count, 6);

    for node in &left.1 {
        assert!(!result.is_placed(*node));
    }
    assert!(result.is_placed(right.1[2]));
    assert_eq!(position(&graph, right.1[2]), Position::new(450.0, 360.0));

    assert_eq!(
        flow_bounds(&graph, graph.main_flow()),
        Rect::new(-10.0, -10.0, 620.0, 525.0)
    );
    assert_eq!(result.bounds, Rect::new(30.0, 22.5, 570.0, 487.5));
}

#[test]
fn test_expanding_collapsed_branch_moves_end_node() {
    let Branching {
        mut graph, main, ..
    } = branching_graph(1, 4);

    LayoutCalculator::default().arrange_graph(&mut graph).unwrap();
    // left branch spans rows 2..=5, so the end node lands on row 6
    assert_eq!(position(&graph, main[3]).y, 30.0 + 90.0 + 60.0 + 4.0 * 90.0);
}

#[test]
fn test_nested_branches() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let a = add(&mut graph, main, 150.0, 60.0);
    let b = add(&mut graph, main, 150.0, 60.0);
    let c = add(&mut graph, main, 150.0, 60.0);

    let outer = graph.create_alternate_flow();
    let p = add(&mut graph, outer, 150.0, 60.0);
    let q = add(&mut graph, outer, 150.0, 60.0);
    graph.add_alternate_flow(b, outer).unwrap();
    graph.set_end_node(outer, c).unwrap();

    let inner = graph.create_alternate_flow();
    let r = add(&mut graph, inner, 150.0, 60.0);
    graph.add_alternate_flow(p, inner).unwrap();
    graph.set_end_node(inner, q).unwrap();

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, a), Position::new(30.0, 22.5));
    assert_eq!(position(&graph, b), Position::new(30.0, 120.0));
    assert_eq!(position(&graph, p), Position::new(240.0, 210.0));
    assert_eq!(position(&graph, r), Position::new(450.0, 300.0));
    assert_eq!(position(&graph, q), Position::new(240.0, 390.0));
    assert_eq!(position(&graph, c), Position::new(30.0, 480.0));
    assert_eq!(result.connections().len(), 7);
    assert_eq!(result.column_count, 3);
}

#[test]
fn test_branches_of_different_rows_share_a_column() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let nodes: Vec<NodeId> = (0..5).map(|_| add(&mut graph, main, 150.0, 60.0)).collect();
    let (_, first) = branch(&mut graph, nodes[1], nodes[3], 1);
    let (_, second) = branch(&mut graph, nodes[2], nodes[4], 1);

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(result.column_count, 2);
    assert_eq!(position(&graph, first[0]), Position::new(240.0, 210.0));
    assert_eq!(position(&graph, second[0]), Position::new(240.0, 300.0));
    assert_eq!(position(&graph, nodes[3]), Position::new(30.0, 300.0));
    assert_eq!(position(&graph, nodes[4]), Position::new(30.0, 390.0));
}

#[test]
fn test_third_branch_goes_further_right() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let a = add(&mut graph, main, 150.0, 60.0);
    let b = add(&mut graph, main, 150.0, 60.0);
    let c = add(&mut graph, main, 150.0, 60.0);
    let (_, x) = branch(&mut graph, b, c, 1);
    let (_, y) = branch(&mut graph, b, c, 1);
    let (_, z) = branch(&mut graph, b, c, 1);

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(result.column_count, 4);
    assert_eq!(position(&graph, a).x, 240.0);
    assert_eq!(position(&graph, y[0]).x, 30.0);
    assert_eq!(position(&graph, x[0]).x, 450.0);
    assert_eq!(position(&graph, z[0]).x, 660.0);
}

#[test]
fn test_hidden_node_is_skipped() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let a = add(&mut graph, main, 150.0, 60.0);
    let b = add(&mut graph, main, 150.0, 60.0);
    let c = add(&mut graph, main, 150.0, 60.0);
    graph.node_mut(b).hidden = true;

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, a), Position::new(30.0, 22.5));
    assert_eq!(position(&graph, c), Position::new(30.0, 120.0));
    assert!(!result.is_placed(b));
    assert_eq!(result.placed_nodes(), &[a, c]);
    assert_eq!(result.connections().len(), 1);
}

#[test]
fn test_hidden_branch_is_skipped() {
    let Branching {
        mut graph,
        right,
        left,
        ..
    } = branching_graph(1, 1);
    graph.flow_mut(left.0).hidden = true;

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(result.column_count, 2);
    assert!(!result.placed_flows().contains(&left.0));
    assert!(result.placed_flows().contains(&right.0));
    assert_eq!(result.connections().len(), 5);
}

#[test]
fn test_branch_into_hidden_end_merges_at_next_visible_node() {
    let mut graph = FlowGraph::new();
    let main = graph.main_flow();
    let a = add(&mut graph, main, 150.0, 60.0);
    let b = add(&mut graph, main, 150.0, 60.0);
    let c = add(&mut graph, main, 150.0, 60.0);
    let d = add(&mut graph, main, 150.0, 60.0);
    let (_, side) = branch(&mut graph, b, c, 3);
    graph.node_mut(c).hidden = true;

    let result = LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    assert_eq!(position(&graph, a), Position::new(30.0, 22.5));
    assert_eq!(position(&graph, side[0]), Position::new(240.0, 210.0));
    assert_eq!(position(&graph, side[2]), Position::new(240.0, 390.0));
    assert_eq!(position(&graph, d), Position::new(30.0, 480.0));
    assert!(position(&graph, d).y > position(&graph, side[2]).y);
    assert_eq!(result.row_count, 6);
    assert_eq!(result.return_connectors().count(), 1);
}

#[test]
fn test_repeated_layout_is_identical() {
    let Branching { mut graph, .. } = branching_graph(2, 1);
    let calculator = LayoutCalculator::default();

    let first = calculator.arrange_graph(&mut graph).unwrap();
    let positions: Vec<Position> = graph.nodes().iter().map(|n| n.position).collect();
    let second = calculator.arrange_graph(&mut graph).unwrap();
    let again: Vec<Position> = graph.nodes().iter().map(|n| n.position).collect();

    assert_eq!(first, second);
    assert_eq!(positions, again);
}

#[test]
fn test_rows_increase_along_each_flow() {
    let Branching {
        mut graph, ..
    } = branching_graph(3, 2);
    LayoutCalculator::default().arrange_graph(&mut graph).unwrap();

    for flow in graph.flows() {
        let ys: Vec<f64> = flow
            .nodes()
            .iter()
            .map(|&n| graph.node(n).position.y)
            .collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]), "{ys:?}");
    }
}
