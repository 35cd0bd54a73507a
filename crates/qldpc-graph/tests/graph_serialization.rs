use qldpc_core::{FieldMatrix, GaloisField};
use qldpc_graph::{
    canonical_graph_hash, graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json,
    ClassicalGraph, QuditGraph,
};

fn sample_matrix() -> FieldMatrix {
    let field = GaloisField::new(5).unwrap();
    FieldMatrix::from_rows(&field, &[[1, 0, 4, 0], [0, 2, 0, 0], [0, 0, 0, 0]]).unwrap()
}

#[test]
fn json_round_trip_preserves_hash() {
    let graph = ClassicalGraph::from_matrix(&sample_matrix());
    let hash_before = canonical_graph_hash(&graph).unwrap();
    let json = graph_to_json(&graph).unwrap();
    let restored: ClassicalGraph = graph_from_json(&json).unwrap();
    assert_eq!(restored, graph);
    assert_eq!(canonical_graph_hash(&restored).unwrap(), hash_before);
}

#[test]
fn bytes_round_trip_for_qudit_graphs() {
    let field = GaloisField::binary();
    let matrix = FieldMatrix::from_rows(&field, &[[1, 1, 0, 0, 1, 1]]).unwrap();
    let graph = QuditGraph::from_matrix(&matrix).unwrap();
    let bytes = graph_to_bytes(&graph).unwrap();
    let restored: QuditGraph = graph_from_bytes(&bytes).unwrap();
    assert_eq!(restored.to_matrix().unwrap(), matrix);
}

#[test]
fn hash_distinguishes_edge_values() {
    let field = GaloisField::new(3).unwrap();
    let lhs = FieldMatrix::from_rows(&field, &[[1, 1]]).unwrap();
    let rhs = FieldMatrix::from_rows(&field, &[[1, 2]]).unwrap();
    let hash_lhs = canonical_graph_hash(&ClassicalGraph::from_matrix(&lhs)).unwrap();
    let hash_rhs = canonical_graph_hash(&ClassicalGraph::from_matrix(&rhs)).unwrap();
    assert_ne!(hash_lhs, hash_rhs);
}

#[test]
fn rejects_values_outside_the_field() {
    let json = r#"{"field_order":2,"nodes":[],"edges":[{"check":0,"data":0,"value":3}]}"#;
    let err = graph_from_json::<u32>(json).expect_err("3 is not in GF(2)");
    assert_eq!(err.code(), "element-out-of-range");
}
