use qldpc_core::errors::QldpcError;
use qldpc_core::{FieldMatrix, GaloisField, RngHandle};
use qldpc_decoder::{
    DecodeSession, Decoder, DecoderConfig, DecoderOptions, InformationSetDecoder, Retry,
    RetryPolicy,
};

struct AlwaysZero;

impl Decoder for AlwaysZero {
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
fn isd_solves_consistent_systems() {
    let field = GaloisField::new(3).unwrap();
    let matrix = FieldMatrix::from_rows(&field, &[[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 2]]).unwrap();
    let syndrome = vec![1, 0, 2];
    let mut decoder = InformationSetDecoder::new(5);
    let options = DecoderOptions::for_field(&field, None).unwrap();
    let solution = decoder.decode(&matrix, &syndrome, &options).unwrap();
    assert_eq!(matrix.mul_vec(&solution).unwrap(), syndrome);
}

#[test]
fn isd_returns_zero_for_inconsistent_systems() {
    let field = GaloisField::binary();
    let matrix = FieldMatrix::from_rows(&field, &[[1, 1], [1, 1]]).unwrap();
    let mut decoder = InformationSetDecoder::new(5);
    let solution = decoder
        .decode(&matrix, &[1, 0], &DecoderOptions::default())
        .unwrap();
    assert_eq!(solution, vec![0, 0]);
}

#[test]
fn decode_exact_rejects_misses_and_retry_reports_exhaustion() {
    let field = GaloisField::binary();
    let matrix = FieldMatrix::from_rows(&field, &[[1, 0, 1]]).unwrap();
    let config = DecoderConfig {
        options: DecoderOptions::default(),
        retry: RetryPolicy { max_attempts: 3 },
    };
    let mut session = DecodeSession::with_decoder(Box::new(AlwaysZero), config, RngHandle::from_seed(0));
    let options = session.options_for(&field, None).unwrap();
    let mut calls = 0;
    let outcome = session
        .retry("test", |session| {
            calls += 1;
            session.decode_exact(&matrix, &[1], &options)
        })
        .unwrap();
    assert_eq!(outcome, Retry::Exhausted { attempts: 3 });
    assert_eq!(calls, 3);
}

#[test]
fn retry_stops_at_first_success() {
    let mut session = DecodeSession::new(DecoderConfig::default(), 11);
    let mut calls = 0;
    let outcome = session
        .retry("count", |_| {
            calls += 1;
            Ok((calls == 4).then_some(calls))
        })
        .unwrap();
    assert_eq!(outcome.success(), Some(4));
}

proptest::proptest! {
    #[test]
    fn isd_reproduces_syndromes_of_random_errors(seed in proptest::prelude::any::<u64>()) {
        let field = GaloisField::new(3).unwrap();
        let matrix = FieldMatrix::from_rows(
            &field,
            &[[1, 2, 0, 1, 0, 0], [0, 1, 1, 0, 1, 0], [1, 0, 2, 0, 0, 1]],
        )
        .unwrap();
        let error: Vec<u32> = (0..matrix.cols()).map(|idx| ((seed >> (4 * idx)) % 3) as u32).collect();
        let syndrome = matrix.mul_vec(&error).unwrap();
        let mut decoder = InformationSetDecoder::new(seed);
        let options = DecoderOptions::for_field(&field, None).unwrap();
        let solution = decoder.decode(&matrix, &syndrome, &options).unwrap();
        proptest::prop_assert_eq!(matrix.mul_vec(&solution).unwrap(), syndrome);
    }
}
