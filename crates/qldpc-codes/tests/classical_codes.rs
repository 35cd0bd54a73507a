use proptest::prelude::*;
use qldpc_codes::{AbstractCode, ClassicalCode};
use qldpc_core::{FieldMatrix, GaloisField, QldpcError, RngHandle};
use qldpc_decoder::{DecodeSession, Decoder, DecoderConfig, DecoderOptions, RetryPolicy};

fn session(seed: u64) -> DecodeSession {
    DecodeSession::new(DecoderConfig::default(), seed)
}

/// Decoder that never finds a nonzero solution.
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

fn failing_session() -> DecodeSession {
    let config = DecoderConfig {
        retry: RetryPolicy { max_attempts: 2 },
        ..DecoderConfig::default()
    };
    DecodeSession::with_decoder(Box::new(ZeroDecoder), config, RngHandle::from_seed(0))
}

fn field(order: u32) -> GaloisField {
    GaloisField::new(order).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dual_codes_are_orthogonal(seed in any::<u64>(), order in prop::sample::select(vec![2u32, 3, 4])) {
        let field = field(order);
        let mut rng = RngHandle::from_seed(seed);
        let code = ClassicalCode::random(8, 5, &field, &mut rng).unwrap();
        let dual = code.dual();

        prop_assert!(code.matrix().matmul(&code.generator().transpose()).unwrap().is_zero());
        prop_assert_eq!(code.dimension() + dual.dimension(), code.num_bits());
        prop_assert!(ClassicalCode::equiv(&dual.dual(), &code));
        prop_assert!(ClassicalCode::equiv(&!&dual, &code));

        let word = code.get_random_word(&mut rng);
        prop_assert!(code.contains(&word).unwrap());
    }

    #[test]
    fn random_codes_have_no_empty_rows_or_columns(seed in any::<u64>()) {
        let mut rng = RngHandle::from_seed(seed);
        let code = ClassicalCode::random(6, 4, &GaloisField::binary(), &mut rng).unwrap();
        for row in 0..code.num_checks() {
            prop_assert!(code.matrix().row_weight(row) > 0);
        }
        for col in 0..code.num_bits() {
            prop_assert!(code.matrix().column_weight(col) > 0);
        }
    }
}

#[test]
fn random_codes_are_reproducible() {
    let field = field(3);
    let code_a = ClassicalCode::random(10, 6, &field, &mut RngHandle::from_seed(11)).unwrap();
    let code_b = ClassicalCode::random(10, 6, &field, &mut RngHandle::from_seed(11)).unwrap();
    assert_eq!(code_a, code_b);
}

#[test]
fn repetition_code_parameters() {
    let code = ClassicalCode::repetition(5, &GaloisField::binary());
    assert_eq!(code.get_code_params(None, &mut session(0)).unwrap(), (5, 1, 5, 2));
    assert!(code.contains(&[1, 1, 1, 1, 1]).unwrap());
    assert!(!code.contains(&[1, 1, 0, 1, 1]).unwrap());

    let ternary = ClassicalCode::repetition(3, &field(3));
    assert!(ternary.contains(&[2, 2, 2]).unwrap());
    assert!(!ternary.contains(&[1, 2, 2]).unwrap());
}

#[test]
fn ring_code_has_one_redundant_check() {
    let code = ClassicalCode::ring(4, &GaloisField::binary());
    assert_eq!(code.num_checks(), 4);
    assert_eq!(code.rank(), 3);
    assert_eq!(code.get_distance_exact(None).unwrap(), 4);
}

#[test]
fn words_start_from_zero_and_cover_the_code() {
    let code = ClassicalCode::from_rows(&[[1, 1, 0], [0, 1, 1]], 3).unwrap();
    let words: Vec<Vec<u32>> = code.words().collect();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0], vec![0, 0, 0]);
    for word in &words {
        assert!(code.contains(word).unwrap());
    }
}

#[test]
fn tensor_product_multiplies_parameters() {
    let binary = GaloisField::binary();
    let code_a = ClassicalCode::hamming(3, &binary).unwrap();
    let code_b = ClassicalCode::repetition(3, &binary);
    let product = ClassicalCode::tensor_product(&code_a, &code_b).unwrap();
    assert_eq!(product.num_bits(), 21);
    assert_eq!(product.dimension(), 4);
    assert_eq!(product.get_distance_exact(None).unwrap(), 9);
}

#[test]
fn tensor_product_rejects_mixed_fields() {
    let code_a = ClassicalCode::repetition(3, &GaloisField::binary());
    let code_b = ClassicalCode::repetition(3, &field(3));
    let err = ClassicalCode::tensor_product(&code_a, &code_b).expect_err("fields differ");
    assert_eq!(err.code(), "field-mismatch");
}

#[test]
fn puncture_and_shorten_remove_bits() {
    let code = ClassicalCode::hamming(3, &GaloisField::binary()).unwrap();

    let punctured = code.puncture(&[6]).unwrap();
    assert_eq!(punctured.num_bits(), 6);
    assert_eq!(punctured.dimension(), 4);
    assert_eq!(punctured.get_distance_exact(None).unwrap(), 2);

    let shortened = code.shorten(&[6]).unwrap();
    assert_eq!(shortened.num_bits(), 6);
    assert_eq!(shortened.dimension(), 3);
    for word in shortened.words() {
        let mut extended = word.clone();
        extended.push(0);
        assert!(code.contains(&extended).unwrap());
    }

    let err = code.shorten(&[7]).expect_err("bit 7 does not exist");
    assert_eq!(err.code(), "bit-out-of-range");
}

#[test]
fn distance_from_a_vector() {
    let code = ClassicalCode::repetition(5, &GaloisField::binary());
    assert_eq!(code.get_distance_exact(Some(&[1, 1, 0, 0, 0])).unwrap(), 2);
    assert_eq!(code.get_distance_exact(Some(&[1, 1, 1, 0, 1])).unwrap(), 1);
    let err = code.get_distance_exact(Some(&[1, 1])).expect_err("wrong length");
    assert_eq!(err.code(), "vector-length-mismatch");
}

#[test]
fn distance_bounds_never_undercut_the_exact_distance() {
    let field = field(3);
    let mut rng = RngHandle::from_seed(5);
    let code = ClassicalCode::random(9, 5, &field, &mut rng).unwrap();
    if code.dimension() == 0 {
        return;
    }
    let exact = ClassicalCode::new(code.matrix().clone()).get_distance_exact(None).unwrap();
    let mut session = session(17);
    let bound = code.get_distance_bound(20, None, &mut session).unwrap();
    assert!(bound >= exact, "bound {bound} below exact distance {exact}");
    assert!(bound <= code.num_bits());
}

#[test]
fn zero_dimensional_codes_have_no_distance() {
    let code = ClassicalCode::new(FieldMatrix::identity(&GaloisField::binary(), 3));
    assert_eq!(code.dimension(), 0);
    let err = code.get_distance_exact(None).expect_err("no nonzero words");
    assert_eq!(err.code(), "trivial-code");
    let err = code
        .get_one_distance_bound(None, &mut session(1))
        .expect_err("no nonzero words");
    assert_eq!(err.code(), "trivial-code");
}

#[test]
fn classical_graph_round_trips_through_the_matrix() {
    let code = ClassicalCode::hamming(3, &GaloisField::binary()).unwrap();
    let graph = code.graph().unwrap();
    assert_eq!(graph.to_matrix().unwrap(), *code.matrix());
    assert_eq!(code.get_weight(), 4);
}

#[test]
fn exhausted_distance_bounds_are_reported() {
    let code = ClassicalCode::repetition(5, &GaloisField::binary());
    let err = code
        .get_distance_bound(3, None, &mut failing_session())
        .expect_err("the decoder never satisfies the constraint");
    assert_eq!(err.code(), "distance-bound-exhausted");
    assert_eq!(err.info().context.get("trials").map(String::as_str), Some("3"));
}

#[test]
fn random_codes_give_up_after_the_retry_bound() {
    let binary = GaloisField::binary();
    let mut rng = RngHandle::from_seed(2);
    let policy = RetryPolicy { max_attempts: 0 };
    let err = ClassicalCode::random_with_policy(4, 3, &binary, policy, &mut rng)
        .expect_err("no draws allowed");
    assert_eq!(err.code(), "random-code-exhausted");

    // a single column of 64 checks is almost never free of zeros
    let err = ClassicalCode::random(1, 64, &binary, &mut rng).expect_err("zero entries");
    assert_eq!(err.code(), "random-code-exhausted");
}
