use proptest::prelude::*;
use qldpc_core::{FieldMatrix, GaloisField};
use qldpc_graph::{ClassicalGraph, Node, QuditGraph};

fn matrix_strategy(order: u32, max_cols: usize) -> impl Strategy<Value = (usize, usize, Vec<u32>)> {
    (1usize..6, 1usize..max_cols).prop_flat_map(move |(rows, cols)| {
        (
            Just(rows),
            Just(cols),
            prop::collection::vec(0u32..order, rows * cols),
        )
    })
}

proptest! {
    #[test]
    fn classical_graph_round_trips((rows, cols, data) in matrix_strategy(3, 9)) {
        let field = GaloisField::new(3).unwrap();
        let matrix = FieldMatrix::from_flat(&field, rows, cols, data).unwrap();
        let graph = ClassicalGraph::from_matrix(&matrix);
        prop_assert_eq!(graph.num_check_nodes(), rows);
        prop_assert_eq!(graph.num_data_nodes(), cols);
        prop_assert_eq!(graph.to_matrix().unwrap(), matrix);
    }

    #[test]
    fn qudit_graph_round_trips((rows, half, data) in matrix_strategy(4, 6)) {
        let field = GaloisField::new(4).unwrap();
        let mut full = data.clone();
        full.extend(data.iter().rev());
        let matrix = FieldMatrix::from_flat(&field, rows, 2 * half, full).unwrap();
        let graph = QuditGraph::from_matrix(&matrix).unwrap();
        prop_assert_eq!(graph.to_matrix().unwrap(), matrix);
    }
}

#[test]
fn edges_must_point_from_checks_to_data() {
    let mut graph = ClassicalGraph::new(&GaloisField::binary());
    let err = graph
        .add_edge(Node::data(0), Node::check(0), 1)
        .expect_err("reversed edge");
    assert_eq!(err.code(), "invalid-edge");
}

#[test]
fn sparse_indices_cannot_become_a_matrix() {
    let mut graph = ClassicalGraph::new(&GaloisField::binary());
    graph.add_edge(Node::check(0), Node::data(3), 1).unwrap();
    let err = graph.to_matrix().expect_err("data index 3 with one data node");
    assert_eq!(err.code(), "sparse-node-indices");
}

#[test]
fn data_nodes_sort_first() {
    let mut nodes = vec![Node::check(0), Node::data(2), Node::check(1), Node::data(0)];
    nodes.sort();
    assert_eq!(
        nodes,
        vec![Node::data(0), Node::data(2), Node::check(0), Node::check(1)]
    );
}
