use std::collections::BTreeMap;

use qldpc_core::errors::{ErrorInfo, QldpcError};
use qldpc_core::Pauli;

use crate::ids::Node;
use crate::operator::QuditOperator;
use crate::tanner::{ClassicalGraph, QuditGraph};

/// Relabels pairs of nodes in a hypergraph product as nodes of the product graph.
///
/// Pairs are visited in lexicographic order. A pair of two data nodes or two check nodes
/// (sectors (0, 0) and (1, 1)) becomes the next data node. A mixed pair (sectors (0, 1) and
/// (1, 0)) becomes the next check node.
pub fn product_node_map(
    nodes_a: impl IntoIterator<Item = Node>,
    nodes_b: impl IntoIterator<Item = Node>,
) -> BTreeMap<(Node, Node), Node> {
    let mut sorted_a: Vec<Node> = nodes_a.into_iter().collect();
    let mut sorted_b: Vec<Node> = nodes_b.into_iter().collect();
    sorted_a.sort();
    sorted_b.sort();

    let mut map = BTreeMap::new();
    let (mut next_data, mut next_check) = (0, 0);
    for &node_a in &sorted_a {
        for &node_b in &sorted_b {
            let node = if node_a.is_data == node_b.is_data {
                next_data += 1;
                Node::data(next_data - 1)
            } else {
                next_check += 1;
                Node::check(next_check - 1)
            };
            map.insert((node_a, node_b), node);
        }
    }
    map
}

/// Hypergraph product of two classical Tanner graphs.
///
/// The product starts from the Cartesian product of the two graphs. Check nodes in sector
/// (0, 1) apply Z-type operators and check nodes in sector (1, 0) apply X-type operators.
/// Edges between sector (0, 1) and sector (0, 0) are negated so that checks commute over any
/// field. With `conjugate`, operators on sector (1, 1) qudits swap type.
pub fn graph_product(
    graph_a: &ClassicalGraph,
    graph_b: &ClassicalGraph,
    conjugate: bool,
) -> Result<QuditGraph, QldpcError> {
    if graph_a.field() != graph_b.field() {
        return Err(QldpcError::Graph(
            ErrorInfo::new("field-mismatch", "graph product factors use different fields")
                .with_context("lhs", graph_a.field().to_string())
                .with_context("rhs", graph_b.field().to_string()),
        ));
    }
    let field = graph_a.field();
    let node_map = product_node_map(graph_a.nodes(), graph_b.nodes());

    let mut product_edges = Vec::new();
    for node_a in graph_a.nodes() {
        for (check_b, data_b, value) in graph_b.edges() {
            product_edges.push(((node_a, check_b), (node_a, data_b), value));
        }
    }
    for node_b in graph_b.nodes() {
        for (check_a, data_a, value) in graph_a.edges() {
            product_edges.push(((check_a, node_b), (data_a, node_b), value));
        }
    }

    let mut graph = QuditGraph::new(field);
    for &node in node_map.values() {
        graph.add_node(node);
    }
    for (fst, snd, value) in product_edges {
        let (qudit, check) = if fst.0.is_data == fst.1.is_data {
            (fst, snd)
        } else {
            (snd, fst)
        };

        let mut op = QuditOperator::of_type(Pauli::Z, value);
        if !check.0.is_data {
            op = op.conjugated();
        }
        if conjugate && !qudit.0.is_data {
            op = op.conjugated();
        }
        if qudit.0.is_data && check.0.is_data {
            op = op.negated(field);
        }
        graph.add_edge(node_map[&check], node_map[&qudit], op)?;
    }
    Ok(graph)
}
