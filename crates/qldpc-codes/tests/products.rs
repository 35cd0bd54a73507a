use std::sync::Arc;

use qldpc_codes::{AbstractCode, ClassicalCode, Expr, GBCode, HGPCode, LPCode, QCCode, Sector};
use qldpc_core::{FieldMatrix, GaloisField, RngHandle};
use qldpc_graph::Node;
use qldpc_group::{Element, Group, Member, Protograph};

fn random_code(bits: usize, checks: usize, field: &GaloisField, seed: u64) -> ClassicalCode {
    ClassicalCode::random(bits, checks, field, &mut RngHandle::from_seed(seed)).unwrap()
}

#[test]
fn hgp_matrix_matches_graph_product() {
    for (order, conjugate) in [(2, false), (3, false), (3, true)] {
        let field = GaloisField::new(order).unwrap();
        let code_a = random_code(10, 8, &field, 1);
        let code_b = random_code(7, 3, &field, 2);
        let graph = HGPCode::get_graph_product(code_a.graph().unwrap(), code_b.graph().unwrap(), conjugate).unwrap();
        let code = HGPCode::new(code_a, code_b, conjugate).unwrap();
        assert_eq!(code.css().graph().unwrap(), &graph);
        assert_eq!(graph.to_matrix().unwrap(), *code.css().matrix());
    }
}

#[test]
fn hgp_sectors() {
    let field = GaloisField::binary();
    let code_a = random_code(5, 3, &field, 4);
    let code_b = random_code(4, 2, &field, 5);
    let code = HGPCode::new(code_a, code_b, true).unwrap();
    assert_eq!(code.sector_size(), [[20, 10], [12, 6]]);
    assert_eq!(code.css().num_qudits(), 26);
    assert_eq!(code.css().conjugated_qudits(), (20..26).collect::<Vec<_>>().as_slice());

    let node_map = HGPCode::get_product_node_map(
        [Node::data(0), Node::data(1), Node::check(0)],
        [Node::data(0), Node::check(0)],
    );
    assert_eq!(node_map[&(Node::data(1), Node::check(0))], Node::check(1));
    assert_eq!(node_map[&(Node::check(0), Node::check(0))], Node::data(2));
}

#[test]
fn trivial_lift_reproduces_the_hypergraph_product() {
    let field = GaloisField::new(3).unwrap();
    let code_a = random_code(5, 3, &field, 6);
    let code_b = random_code(4, 3, &field, 7);
    let lifted = LPCode::new(
        Protograph::from_matrix(code_a.matrix()),
        Protograph::from_matrix(code_b.matrix()),
        false,
    )
    .unwrap();
    let product = HGPCode::new(code_a, code_b, false).unwrap();
    assert_eq!(lifted.css().matrix_x(), product.css().matrix_x());
    assert_eq!(lifted.css().matrix_z(), product.css().matrix_z());
    assert_eq!(lifted.sector_size(), product.sector_size());
}

#[test]
fn lifted_product_over_a_cyclic_group() {
    let group = Arc::new(Group::cyclic(5).unwrap());
    let field = GaloisField::binary();
    let member = |index| Element::from_member(&group, &field, Member::from_index(index));
    let entries = vec![
        vec![member(0), member(1), member(2)],
        vec![member(0), member(3), member(4)],
    ];
    let protograph = Protograph::new(&group, &field, entries).unwrap();
    let code = LPCode::new(protograph.clone(), protograph, false).unwrap();
    assert!(code.css().is_valid());
    assert_eq!(code.css().num_qudits(), 5 * (3 * 3 + 2 * 2));
    assert_eq!(code.sector_size(), [[45, 30], [30, 20]]);
}

#[test]
fn lifted_product_rejects_different_groups() {
    let field = GaloisField::binary();
    let proto = |group: Group| {
        let group = Arc::new(group);
        Protograph::new(&group, &field, vec![vec![Element::one(&group, &field)]]).unwrap()
    };
    let err = LPCode::new(proto(Group::cyclic(3).unwrap()), proto(Group::cyclic(4).unwrap()), false)
        .expect_err("groups differ");
    assert_eq!(err.code(), "group-mismatch");
}

#[test]
fn generalized_bicycle_codes() {
    let group = Arc::new(Group::cyclic(7).unwrap());
    let field = GaloisField::binary();
    let poly = |members: &[usize]| {
        Element::from_terms(&group, &field, members.iter().map(|&index| (Member::from_index(index), 1))).unwrap()
    };
    let code = GBCode::from_elements(&poly(&[0, 1, 3]), &poly(&[0, 2, 3])).unwrap();
    assert!(code.css().is_valid());
    assert_eq!(code.css().num_qudits(), 14);
    assert_eq!(code.matrix_a().shape(), (7, 7));
}

#[test]
fn bicycle_matrices_must_commute() {
    let binary = GaloisField::binary();
    let matrix_a = FieldMatrix::from_rows(&binary, &[[1, 1], [0, 1]]).unwrap();
    let matrix_b = FieldMatrix::from_rows(&binary, &[[1, 0], [1, 1]]).unwrap();
    let err = GBCode::new(matrix_a, matrix_b, Vec::new()).expect_err("AB != BA");
    assert_eq!(err.code(), "non-commuting-generators");
}

fn toric_qc_code(size: usize, conjugate: bool) -> QCCode {
    QCCode::new(
        (size, size),
        Expr::constant(1) + Expr::x(),
        Expr::constant(1) + Expr::y(),
        &GaloisField::binary(),
        conjugate,
    )
    .unwrap()
}

#[test]
fn quasi_cyclic_toric_code() {
    let code = toric_qc_code(4, false);
    assert_eq!((code.css().num_qudits(), code.css().dimension()), (32, 2));
    assert!(code.css().is_valid());

    let conjugated = toric_qc_code(4, true);
    assert_eq!(conjugated.css().conjugated_qudits(), (16..32).collect::<Vec<_>>().as_slice());
}

#[test]
fn toric_layout_checks_address_nearest_neighbors() {
    let code = toric_qc_code(4, false);
    let layouts = code.get_toric_mappings().unwrap();
    assert!(!layouts.is_empty());
    for layout in &layouts {
        assert_eq!(layout.torus_shape(), (4, 4));
        let (shifts_x, shifts_z) = code.get_check_shifts(layout, false).unwrap();
        for shifts in [&shifts_x, &shifts_z] {
            assert_eq!(shifts.len(), 4);
            for &(dx, dy) in shifts {
                assert_eq!(dx.abs() + dy.abs(), 1, "shift ({dx}, {dy})");
            }
        }

        let (checks_x, checks_z) = code.get_toric_checks(layout).unwrap();
        assert!(checks_x.matmul(&checks_z.transpose()).unwrap().is_zero());
        assert_eq!(checks_x.rank(), code.css().matrix_x().rank());
    }
}

#[test]
fn toric_qubit_positions() {
    assert_eq!(QCCode::get_toric_qubit_pos(1, 2, Sector::L, (4, 4), false), (2, 4));
    assert_eq!(QCCode::get_toric_qubit_pos(1, 2, Sector::R, (4, 4), false), (3, 5));
    assert_eq!(QCCode::get_toric_qubit_pos(5, 2, Sector::X, (4, 4), false), (3, 4));
    assert_eq!(QCCode::get_toric_qubit_pos(3, 0, Sector::Z, (4, 4), true), (3, 2));
}

#[test]
fn disconnected_codes_have_no_toric_layout() {
    let code = QCCode::new(
        (2, 3),
        Expr::constant(1) + Expr::y(),
        Expr::constant(1) + Expr::monomial(0, 2),
        &GaloisField::binary(),
        false,
    )
    .unwrap();
    assert!(code.get_toric_mappings().unwrap().is_empty());
}

#[test]
fn polynomial_terms_and_exponents() {
    let poly = Expr::x() * Expr::y() + Expr::monomial(2, -1) + Expr::constant(1);
    let exponents: Vec<(i64, i64)> = poly.terms().into_iter().map(|term| term.exponents().unwrap()).collect();
    assert_eq!(exponents, vec![(1, 1), (2, -1), (0, 0)]);
    let err = poly.exponents().expect_err("a sum has several terms");
    assert_eq!(err.code(), "invalid-monomial");
}
