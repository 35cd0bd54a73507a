use qldpc_core::GaloisField;
use qldpc_graph::QuditOperator;

#[test]
fn qubit_tokens_cover_paulis() {
    let field = GaloisField::binary();
    for (token, op) in [
        ("I", QuditOperator::new(0, 0)),
        ("X", QuditOperator::new(1, 0)),
        ("Y", QuditOperator::new(1, 1)),
        ("Z", QuditOperator::new(0, 1)),
    ] {
        assert_eq!(op.to_token(&field), token);
        assert_eq!(QuditOperator::from_token(token, &field).unwrap(), op);
    }
}

#[test]
fn qudit_tokens_omit_trivial_factors() {
    let field = GaloisField::new(5).unwrap();
    assert_eq!(QuditOperator::new(2, 0).to_token(&field), "X(2)");
    assert_eq!(QuditOperator::new(0, 4).to_token(&field), "Z(4)");
    assert_eq!(QuditOperator::new(1, 3).to_token(&field), "X(1)Z(3)");
    assert_eq!(
        QuditOperator::from_token("X(1)Z(3)", &field).unwrap(),
        QuditOperator::new(1, 3)
    );
}

#[test]
fn malformed_tokens_are_rejected() {
    let field = GaloisField::new(3).unwrap();
    for token in ["", "Y", "X(1", "Z(1)X(2)", "X()"] {
        let err = QuditOperator::from_token(token, &field).expect_err(token);
        assert_eq!(err.code(), "invalid-operator-token");
    }
}
