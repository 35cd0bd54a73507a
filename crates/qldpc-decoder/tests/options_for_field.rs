use qldpc_core::GaloisField;
use qldpc_decoder::{DecoderConfig, DecoderOptions};

#[test]
fn binary_fields_keep_default_options() {
    let options = DecoderOptions::for_field(&GaloisField::binary(), Some(3)).unwrap();
    assert_eq!(options, DecoderOptions::default());
}

#[test]
fn prime_fields_switch_to_ilp() {
    let options = DecoderOptions::for_field(&GaloisField::new(5).unwrap(), Some(3)).unwrap();
    assert!(options.with_ilp);
    assert_eq!(options.modulus, Some(5));
    assert_eq!(options.lower_bound_row, Some(3));
}

#[test]
fn extension_fields_are_rejected() {
    let err = DecoderOptions::for_field(&GaloisField::new(4).unwrap(), None).expect_err("GF(4)");
    assert_eq!(err.code(), "nonprime-field");
}

#[test]
fn config_round_trips_through_json() {
    let config = DecoderConfig::default();
    assert_eq!(config.retry.max_attempts, 100);
    let json = serde_json::to_string(&config).unwrap();
    let restored: DecoderConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}
