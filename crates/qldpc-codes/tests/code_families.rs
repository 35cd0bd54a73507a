use std::sync::Arc;

use qldpc_codes::{
    AbstractCode, CSSCode, ChainComplex, ClassicalCode, GeneralizedSurfaceCode, QTCode,
    SurfaceCode, TannerCode, ToricCode,
};
use qldpc_core::{FieldMatrix, GaloisField, Pauli, RngHandle};
use qldpc_graph::UndirectedEdge;
use qldpc_group::{Group, Member};

fn recomputed_distance(code: &CSSCode, pauli: Pauli) -> usize {
    CSSCode::from_matrices(code.matrix_x().clone(), code.matrix_z().clone())
        .unwrap()
        .get_distance_exact(Some(pauli), None)
        .unwrap()
}

fn fresh_distance(code: &ClassicalCode) -> usize {
    ClassicalCode::new(code.matrix().clone())
        .get_distance_exact(None)
        .unwrap()
}

#[test]
fn hamming_codes() {
    let binary = ClassicalCode::hamming(3, &GaloisField::binary()).unwrap();
    assert_eq!((binary.num_bits(), binary.dimension()), (7, 4));
    assert_eq!(fresh_distance(&binary), 3);

    let ternary = ClassicalCode::hamming(2, &GaloisField::new(3).unwrap()).unwrap();
    assert_eq!((ternary.num_bits(), ternary.dimension()), (4, 2));
    assert_eq!(fresh_distance(&ternary), 3);

    let err = ClassicalCode::hamming(1, &GaloisField::binary()).expect_err("rank 1");
    assert_eq!(err.code(), "invalid-hamming");
}

#[test]
fn reed_solomon_codes_are_mds() {
    let code = ClassicalCode::reed_solomon(7, 3).unwrap();
    assert_eq!(code.field().order(), 8);
    assert_eq!((code.num_bits(), code.dimension()), (7, 3));
    assert_eq!(fresh_distance(&code), 5);

    let err = ClassicalCode::reed_solomon(6, 3).expect_err("6 is not 2^m - 1");
    assert_eq!(err.code(), "invalid-reed-solomon");
}

#[test]
fn bch_codes() {
    let code = ClassicalCode::bch(15, 7).unwrap();
    assert_eq!(code.field().order(), 2);
    assert_eq!((code.num_bits(), code.dimension()), (15, 7));
    assert_eq!(code.get_distance_exact(None).unwrap(), 5);

    let code = ClassicalCode::bch(15, 5).unwrap();
    assert_eq!(code.get_distance_exact(None).unwrap(), 7);

    let err = ClassicalCode::bch(15, 6).expect_err("no BCH code has k = 6");
    assert_eq!(err.code(), "invalid-bch");
}

#[test]
fn reed_muller_codes() {
    let code = ClassicalCode::reed_muller(1, 3).unwrap();
    assert_eq!((code.num_bits(), code.dimension()), (8, 4));
    assert_eq!(fresh_distance(&code), 4);

    let dual = ClassicalCode::reed_muller(1, 4).unwrap().dual();
    assert!(ClassicalCode::equiv(&dual, &ClassicalCode::reed_muller(2, 4).unwrap()));

    let err = ClassicalCode::reed_muller(4, 3).expect_err("r > m");
    assert_eq!(err.code(), "invalid-reed-muller");
}

#[test]
fn rotated_surface_code_distances() {
    let binary = GaloisField::binary();
    let code = SurfaceCode::new(2, 3, true, &binary, false).unwrap();
    let css = code.css();
    assert_eq!((css.num_qudits(), css.dimension()), (6, 1));
    assert_eq!(css.get_distance_exact(Some(Pauli::X), None).unwrap(), 3);
    assert_eq!(recomputed_distance(css, Pauli::X), 3);
    assert_eq!(recomputed_distance(css, Pauli::Z), 2);
    assert!(css.is_valid());

    let ternary = SurfaceCode::new(3, 4, true, &GaloisField::new(3).unwrap(), false).unwrap();
    assert!(ternary.css().is_valid());
    assert_eq!(ternary.css().dimension(), 1);
    let rotated_toric = ToricCode::new(4, 6, true, &GaloisField::new(5).unwrap(), false).unwrap();
    assert!(rotated_toric.css().is_valid());

    let conjugated = SurfaceCode::new(3, 3, true, &binary, true).unwrap();
    assert_eq!(conjugated.css().conjugated_qudits(), &[1, 3, 5, 7]);
}

#[test]
fn unrotated_surface_code_distances() {
    let code = SurfaceCode::new(2, 3, false, &GaloisField::binary(), false).unwrap();
    let css = code.css();
    assert_eq!((css.num_qudits(), css.dimension()), (8, 1));
    assert_eq!(recomputed_distance(css, Pauli::X), 3);
    assert_eq!(recomputed_distance(css, Pauli::Z), 2);
}

#[test]
fn toric_codes() {
    let binary = GaloisField::binary();
    let unrotated = ToricCode::new(3, 3, false, &binary, false).unwrap();
    assert_eq!((unrotated.css().num_qudits(), unrotated.css().dimension()), (18, 2));
    assert_eq!(recomputed_distance(unrotated.css(), Pauli::Z), 3);

    let rotated = ToricCode::new(4, 4, true, &binary, false).unwrap();
    assert_eq!((rotated.css().num_qudits(), rotated.css().dimension()), (16, 2));
    assert!(rotated.css().is_valid());
    assert_eq!(recomputed_distance(rotated.css(), Pauli::X), 4);

    let err = ToricCode::new(3, 4, true, &binary, false).expect_err("odd side");
    assert_eq!(err.code(), "invalid-toric");
}

#[test]
fn generalized_surface_codes() {
    let binary = GaloisField::binary();
    let planar = GeneralizedSurfaceCode::new(3, 2, false, &binary, Vec::new()).unwrap();
    assert_eq!((planar.css().num_qudits(), planar.css().dimension()), (13, 1));
    assert!(planar.css().is_valid());

    let periodic = GeneralizedSurfaceCode::new(3, 3, true, &binary, Vec::new()).unwrap();
    assert_eq!((periodic.css().num_qudits(), periodic.css().dimension()), (81, 3));
    assert!(periodic.css().is_valid());

    let err = GeneralizedSurfaceCode::new(3, 1, false, &binary, Vec::new()).expect_err("dim 1");
    assert_eq!(err.code(), "invalid-dimension");
}

#[test]
fn chain_complex_tensor_products_square_to_zero() {
    let field = GaloisField::new(3).unwrap();
    let base = ClassicalCode::ring(3, &field);
    let chain = ChainComplex::new(vec![base.matrix().clone()]).unwrap();
    let link = ChainComplex::new(vec![base.matrix().transpose()]).unwrap();
    let product = ChainComplex::tensor_product(&chain, &link).unwrap();
    assert_eq!(product.num_links(), 2);
    assert_eq!(product.dim(1), 18);
    assert!(product.op(1).matmul(&product.op(2)).unwrap().is_zero());

    let cube = ChainComplex::tensor_product(&product, &link).unwrap();
    assert_eq!(cube.num_links(), 3);
    assert!(cube.op(2).matmul(&cube.op(3)).unwrap().is_zero());
    assert_eq!(cube.truncate(2).num_links(), 2);

    let ones = FieldMatrix::from_rows(&GaloisField::binary(), &[[1, 1]]).unwrap();
    let column = FieldMatrix::from_rows(&GaloisField::binary(), &[[1], [0]]).unwrap();
    let err = ChainComplex::new(vec![ones, column]).expect_err("nonzero composition");
    assert_eq!(err.code(), "invalid-chain-complex");
}

#[test]
fn tanner_code_on_complete_graph() {
    let field = GaloisField::binary();
    let subcode = ClassicalCode::random(6, 3, &field, &mut RngHandle::from_seed(3)).unwrap();
    let num_vertices = subcode.num_bits() + 1;
    let edges = (0..num_vertices)
        .flat_map(|a| (a + 1..num_vertices).map(move |b| UndirectedEdge::new(a, b)));
    let tanner = TannerCode::from_undirected(edges, subcode.clone()).unwrap();
    let code = tanner.code();
    assert_eq!(code.num_bits(), num_vertices * (num_vertices - 1) / 2);
    assert_eq!(code.num_checks(), num_vertices * subcode.num_checks());
    assert!(code.get_weight() <= subcode.get_weight());
}

#[test]
fn tanner_code_rejects_degree_mismatch() {
    let subcode = ClassicalCode::repetition(3, &GaloisField::binary());
    let edges = vec![UndirectedEdge::new(0, 1), UndirectedEdge::new(1, 2)];
    let err = TannerCode::from_undirected(edges, subcode).expect_err("vertex 0 has degree 1");
    assert_eq!(err.code(), "invalid-subgraph");
}

#[test]
fn quantum_tanner_code_on_the_torus() {
    let group = Arc::new(Group::abelian(&[4, 4]).unwrap());
    let x = Member::from_index(4);
    let y = Member::from_index(1);
    let subset_a = [x, group.inv(x)];
    let subset_b = [y, group.inv(y)];
    let field = GaloisField::binary();
    let subcode = ClassicalCode::from_rows(&[[1, 1]], 2).unwrap();

    let code = QTCode::new(&group, &subset_a, &subset_b, subcode.clone(), subcode, false, Vec::new()).unwrap();
    let css = code.css();
    assert!(css.is_valid());
    assert_eq!(css.field(), &field);
    assert_eq!((css.num_qudits(), css.dimension()), (16, 2));
    assert_eq!(css.get_distance_exact(None, None).unwrap(), 4);
    assert_eq!(code.complex().faces().len(), 16);
}

#[test]
fn quantum_tanner_code_checks_subcode_lengths() {
    let group = Arc::new(Group::cyclic(6).unwrap());
    let subset = [Member::from_index(1), Member::from_index(5)];
    let code = ClassicalCode::repetition(3, &GaloisField::binary());
    let err = QTCode::new(&group, &subset, &subset, code.clone(), code, false, Vec::new())
        .expect_err("subsets have two members");
    assert_eq!(err.code(), "subcode-length-mismatch");
}

/// `D_7 × Z_5` with subsets separated by their `Z_5` component, which conjugation preserves.
fn dihedral_times_cyclic() -> (Arc<Group>, Vec<Member>, Vec<Member>) {
    let dihedral = Group::dihedral(7).unwrap();
    let group = Arc::new(Group::product(&dihedral, &Group::cyclic(5).unwrap()));
    let rotation = Member::from_index(1);
    let reflection = Member::from_index(2);
    let member = |d: Member, z: usize| Member::from_index(d.index() * 5 + z);
    let rotation_inv = dihedral.inv(rotation);
    let subset_a = vec![
        member(rotation, 1),
        member(rotation_inv, 4),
        member(reflection, 1),
        member(reflection, 4),
    ];
    let subset_b = vec![
        member(rotation, 2),
        member(rotation_inv, 3),
        member(reflection, 2),
        member(reflection, 3),
    ];
    (group, subset_a, subset_b)
}

#[test]
fn quantum_tanner_code_on_a_nonabelian_group() {
    let (group, subset_a, subset_b) = dihedral_times_cyclic();
    assert!(!group.is_abelian());
    for (order, rows) in [(2, [[1, 1, 0, 0], [0, 0, 1, 1]]), (3, [[1, 1, 0, 0], [0, 0, 1, 2]])] {
        let subcode = ClassicalCode::from_rows(&rows, order).unwrap();
        for bipartite in [false, true] {
            let code = QTCode::new(
                &group,
                &subset_a,
                &subset_b,
                subcode.clone(),
                subcode.clone(),
                bipartite,
                Vec::new(),
            )
            .unwrap();
            assert!(code.complex().satisfies_total_no_conjugacy());
            let css = code.css();
            assert!(css.is_valid(), "order {order}, bipartite {bipartite}");
            assert_eq!((css.num_qudits(), css.dimension()), (560, 80));
        }
    }
}

#[test]
fn quantum_tanner_code_rejects_conjugate_subsets() {
    let group = Arc::new(Group::dihedral(5).unwrap());
    let rotation = Member::from_index(1);
    let reflection = Member::from_index(2);
    let subset_a = [rotation, group.inv(rotation), reflection];
    let subset_b = [
        group.pow(rotation, 2),
        group.pow(rotation, -2),
        group.mul(rotation, reflection),
    ];
    let subcode = ClassicalCode::from_rows(&[[1, 1, 1]], 2).unwrap();
    for bipartite in [false, true] {
        let err = QTCode::new(
            &group,
            &subset_a,
            &subset_b,
            subcode.clone(),
            subcode.clone(),
            bipartite,
            Vec::new(),
        )
        .expect_err("reflections in A and B are conjugate");
        assert_eq!(err.code(), "css-incompatible");
    }
}
