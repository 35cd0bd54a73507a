use proptest::prelude::*;
use qldpc_codes::{AbstractCode, CSSCode, ClassicalCode, HGPCode, QuditCode};
use qldpc_core::{FieldMatrix, GaloisField, Pauli, QldpcError, RngHandle};
use qldpc_decoder::{DecodeSession, Decoder, DecoderConfig, DecoderOptions, Retry, RetryPolicy};

fn session(seed: u64) -> DecodeSession {
    DecodeSession::new(DecoderConfig::default(), seed)
}

fn hgp(code_a: ClassicalCode, code_b: ClassicalCode) -> CSSCode {
    HGPCode::new(code_a, code_b, false).unwrap().into_css()
}

fn assert_logical_ops_are_canonical(code: &CSSCode) {
    let ops = code.get_logical_ops();
    let (ops_x, ops_z) = (ops.get(Pauli::X), ops.get(Pauli::Z));
    let dimension = code.dimension();
    assert_eq!(ops.dimension(), dimension);
    assert_eq!(ops_x.shape(), (dimension, code.num_qudits()));
    assert!(code.matrix_z().matmul(&ops_x.transpose()).unwrap().is_zero());
    assert!(code.matrix_x().matmul(&ops_z.transpose()).unwrap().is_zero());
    assert_eq!(
        ops_x.matmul(&ops_z.transpose()).unwrap(),
        FieldMatrix::identity(code.field(), dimension)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn hypergraph_products_commute(seed in any::<u64>(), order in prop::sample::select(vec![2u32, 3, 5])) {
        let field = GaloisField::new(order).unwrap();
        let mut rng = RngHandle::from_seed(seed);
        let code_a = ClassicalCode::random(5, 3, &field, &mut rng).unwrap();
        let code_b = ClassicalCode::random(4, 3, &field, &mut rng).unwrap();
        let code = hgp(code_a, code_b);
        prop_assert!(code.is_valid());
        prop_assert!(code.matrix_x().matmul(&code.matrix_z().transpose()).unwrap().is_zero());
    }

    #[test]
    fn logical_operators_pair_up(seed in any::<u64>(), order in prop::sample::select(vec![2u32, 3])) {
        let field = GaloisField::new(order).unwrap();
        let mut rng = RngHandle::from_seed(seed);
        let code_a = ClassicalCode::random(4, 2, &field, &mut rng).unwrap();
        let code_b = ClassicalCode::random(3, 2, &field, &mut rng).unwrap();
        assert_logical_ops_are_canonical(&hgp(code_a, code_b));
    }
}

#[test]
fn hgp_of_repetition_codes_is_a_surface_code() {
    let binary = GaloisField::binary();
    let code = hgp(ClassicalCode::repetition(3, &binary), ClassicalCode::repetition(3, &binary));
    let (n, k, d, _) = code.get_code_params(None, &mut session(0)).unwrap();
    assert_eq!((n, k, d), (13, 1, 3));
}

#[test]
fn hgp_of_ring_codes_is_a_toric_code() {
    let binary = GaloisField::binary();
    let code = hgp(ClassicalCode::ring(3, &binary), ClassicalCode::ring(3, &binary));
    let (n, k, d, w) = code.get_code_params(None, &mut session(0)).unwrap();
    assert_eq!((n, k, d, w), (18, 2, 3, 4));
}

#[test]
fn distance_bounds_never_undercut_the_exact_distance() {
    let field = GaloisField::new(3).unwrap();
    let code = hgp(ClassicalCode::ring(3, &field), ClassicalCode::repetition(3, &field));
    let exact = code.get_distance_exact(None, None).unwrap();
    let mut session = session(9);
    for pauli in [None, Some(Pauli::X), Some(Pauli::Z)] {
        let bound = code.get_distance_bound(pauli, 10, None, &mut session).unwrap();
        assert!(bound >= exact, "bound {bound} below exact distance {exact}");
    }
}

#[test]
fn logical_operators_after_reduction() {
    let binary = GaloisField::binary();
    let mut code = hgp(ClassicalCode::ring(3, &binary), ClassicalCode::ring(3, &binary));
    let mut session = session(21);
    let reduced = code.reduce_logical_ops(None, &mut session).unwrap();
    assert!(reduced <= 2 * code.dimension());
    assert_logical_ops_are_canonical(&code);
    for pauli in Pauli::both() {
        for row in code.get_logical_ops().get(pauli).iter_rows() {
            assert!(row.iter().filter(|&&value| value != 0).count() >= 3);
        }
    }

    let err = code
        .reduce_logical_op(Pauli::X, 2, &mut session)
        .expect_err("only two logical qubits");
    assert_eq!(err.code(), "logical-index-out-of-range");
}

#[test]
fn random_logical_operators_have_trivial_syndrome() {
    let field = GaloisField::new(3).unwrap();
    let code = hgp(ClassicalCode::ring(3, &field), ClassicalCode::ring(3, &field));
    let mut session = session(4);
    for pauli in Pauli::both() {
        let op = match code.get_random_logical_op(pauli, true, &mut session).unwrap() {
            Retry::Success(op) => op,
            Retry::Exhausted { attempts } => panic!("no logical operator after {attempts} attempts"),
        };
        let checks = match pauli {
            Pauli::X => code.matrix_z(),
            Pauli::Z => code.matrix_x(),
        };
        assert!(checks.mul_vec(&op).unwrap().iter().all(|&value| value == 0));
        assert!(op.iter().any(|&value| value != 0));
    }
}

#[test]
fn incompatible_checks_are_rejected() {
    let binary = GaloisField::binary();
    let matrix_x = FieldMatrix::from_rows(&binary, &[[1, 0]]).unwrap();
    let matrix_z = FieldMatrix::from_rows(&binary, &[[1, 1]]).unwrap();
    let err = CSSCode::from_matrices(matrix_x.clone(), matrix_z.clone()).expect_err("checks anticommute");
    assert_eq!(err.code(), "css-incompatible");

    let longer = FieldMatrix::from_rows(&binary, &[[1, 1, 0]]).unwrap();
    let err = CSSCode::from_matrices(matrix_x, longer).expect_err("different lengths");
    assert_eq!(err.code(), "css-incompatible");
}

#[test]
fn overall_matrix_puts_z_checks_first() {
    let binary = GaloisField::binary();
    let matrix_x = FieldMatrix::from_rows(&binary, &[[1, 1, 1, 1]]).unwrap();
    let matrix_z = FieldMatrix::from_rows(&binary, &[[1, 1, 0, 0], [0, 0, 1, 1]]).unwrap();
    let code = CSSCode::from_matrices(matrix_x, matrix_z).unwrap();
    let expected = FieldMatrix::from_rows(
        &binary,
        &[
            [0, 0, 0, 0, 1, 1, 0, 0],
            [0, 0, 0, 0, 0, 0, 1, 1],
            [1, 1, 1, 1, 0, 0, 0, 0],
        ],
    )
    .unwrap();
    assert_eq!(code.matrix(), &expected);
    assert_eq!(code.get_weight(), 4);
    assert_eq!(code.dimension(), 1);
}

#[test]
fn stabilizers_round_trip() {
    let field = GaloisField::new(3).unwrap();
    let code = hgp(ClassicalCode::repetition(2, &field), ClassicalCode::repetition(3, &field));
    let qudit_code = code.to_qudit_code();
    let stabilizers = qudit_code.get_stabilizers();
    assert_eq!(stabilizers.len(), qudit_code.num_checks());
    let parsed = QuditCode::from_stabilizers(&stabilizers, &field).unwrap();
    assert_eq!(parsed, qudit_code);

    let binary = QuditCode::from_stabilizers(&["X X I", "Z Y Z"], &GaloisField::binary()).unwrap();
    assert_eq!(binary.get_stabilizers(), vec!["X X I", "Z Y Z"]);
    assert_eq!(binary.get_weight(), 3);
}

#[test]
fn stabilizers_must_have_equal_lengths() {
    let err = QuditCode::from_stabilizers(&["X X", "Z"], &GaloisField::binary())
        .expect_err("second stabilizer is short");
    assert_eq!(err.code(), "stabilizer-length-mismatch");
}

#[test]
fn conjugation_swaps_operator_types() {
    let binary = GaloisField::binary();
    let matrix = FieldMatrix::from_rows(&binary, &[[1, 0, 0, 1]]).unwrap();
    let conjugated = QuditCode::conjugate(&matrix, &[1]).unwrap();
    assert_eq!(conjugated, FieldMatrix::from_rows(&binary, &[[1, 1, 0, 0]]).unwrap());
    let err = QuditCode::conjugate(&matrix, &[2]).expect_err("qudit 2 does not exist");
    assert_eq!(err.code(), "qudit-out-of-range");
}

struct ZeroDecoder;

impl Decoder for ZeroDecoder {
    fn decode(
        &mut self,
        matrix: &FieldMatrix,
        _syndrome: &[u32],
        _options: &DecoderOptions,
    ) -> Result<Vec<u32>, QldpcError> {
        Ok(vec![0; matrix.cols()])
    }
}

#[test]
fn exhausted_css_bounds_are_reported() {
    let binary = GaloisField::binary();
    let code = hgp(ClassicalCode::ring(3, &binary), ClassicalCode::ring(3, &binary));
    let config = DecoderConfig {
        retry: RetryPolicy { max_attempts: 2 },
        ..DecoderConfig::default()
    };
    let mut session = DecodeSession::with_decoder(Box::new(ZeroDecoder), config, RngHandle::from_seed(5));
    let err = code
        .get_distance_bound(Some(Pauli::X), 4, None, &mut session)
        .expect_err("no trial can solve the nontrivial constraint");
    assert_eq!(err.code(), "distance-bound-exhausted");
    assert_eq!(err.info().context.get("trials").map(String::as_str), Some("4"));
    assert_eq!(err.info().context.get("operation").map(String::as_str), Some("css_distance_bound"));
}
