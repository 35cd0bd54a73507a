use qldpc_core::GaloisField;
use qldpc_graph::{graph_product, product_node_map, ClassicalGraph, EdgeNode, Node, QuditOperator, Subgraph, UndirectedEdge};

#[test]
fn neighbors_follow_sort_keys() {
    let mut subgraph: Subgraph<u8, char> = Subgraph::new();
    subgraph.add_edge(0, 'a', Some(vec![2]));
    subgraph.add_edge(0, 'b', Some(vec![0]));
    subgraph.add_edge(0, 'c', Some(vec![1]));
    subgraph.add_edge(1, 'a', None);
    subgraph.add_edge(1, 'c', None);
    assert_eq!(subgraph.sorted_neighbors(&0), vec![&'b', &'c', &'a']);
    assert_eq!(subgraph.sorted_neighbors(&1), vec![&'a', &'c']);
    assert_eq!(subgraph.sinks().len(), 3);
    assert_eq!(subgraph.degree(&0), 3);
}

#[test]
fn undirected_conversion_creates_edge_sinks() {
    let edges = vec![
        UndirectedEdge::new(0u8, 1u8),
        UndirectedEdge::new(1, 2),
        UndirectedEdge {
            a: 2,
            b: 0,
            sort: Some((vec![5], vec![0])),
        },
    ];
    let subgraph = Subgraph::from_undirected(edges);
    assert_eq!(subgraph.sources().count(), 3);
    assert_eq!(subgraph.num_edges(), 6);
    assert_eq!(
        subgraph.sorted_neighbors(&0),
        vec![&EdgeNode::new(0, 2), &EdgeNode::new(0, 1)]
    );
}

#[test]
fn node_map_assigns_sectors() {
    let nodes_a = [Node::data(0), Node::data(1), Node::check(0)];
    let nodes_b = [Node::data(0), Node::check(0)];
    let map = product_node_map(nodes_a, nodes_b);
    assert_eq!(map[&(Node::data(1), Node::data(0))], Node::data(1));
    assert_eq!(map[&(Node::data(1), Node::check(0))], Node::check(1));
    assert_eq!(map[&(Node::check(0), Node::data(0))], Node::check(2));
    assert_eq!(map[&(Node::check(0), Node::check(0))], Node::data(2));
}

#[test]
fn product_of_single_edges_commutes() {
    let field = GaloisField::new(3).unwrap();
    let mut graph = ClassicalGraph::new(&field);
    graph.add_edge(Node::check(0), Node::data(0), 1).unwrap();
    let product = graph_product(&graph, &graph, false).unwrap();
    assert_eq!(product.num_data_nodes(), 2);
    assert_eq!(product.num_check_nodes(), 2);
    // sector (0, 1) check on sector (0, 0) qudit carries a negated Z operator
    assert_eq!(
        product.edge(Node::check(0), Node::data(0)),
        Some(QuditOperator::new(0, 2))
    );
    assert_eq!(
        product.edge(Node::check(1), Node::data(0)),
        Some(QuditOperator::new(1, 0))
    );
}
