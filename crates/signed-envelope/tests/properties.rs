//! Property tests for seal/open.

use proptest::prelude::*;
use signed_envelope::{
    EnvelopeCodecApi, EnvelopeConfig, FingerprintAlgorithm, Salts, SignedEnvelopeCodec, Value,
};

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        prop::num::f64::NORMAL.prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Seq),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6).prop_map(Value::Map),
        ]
    })
}

fn salt_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9]{0,12}".prop_map(Value::Str),
    ]
}

fn codec(allow_untrusted: bool) -> SignedEnvelopeCodec {
    SignedEnvelopeCodec::new(EnvelopeConfig::default().with_allow_untrusted_data(allow_untrusted))
        .unwrap()
}

proptest! {
    #[test]
    fn roundtrip_is_trusted(
        value in value_strategy(),
        prefix in salt_strategy(),
        suffix in salt_strategy(),
    ) {
        let codec = codec(false);
        let salts = Salts::new(prefix, suffix);

        let envelope = codec.seal(&value, &salts).unwrap();
        let opened = codec.open(envelope.as_str(), &salts).unwrap();

        prop_assert!(opened.trusted);
        prop_assert_eq!(opened.value, value);
    }

    #[test]
    fn single_char_edit_is_detected(
        value in value_strategy(),
        index in any::<prop::sample::Index>(),
    ) {
        let codec = codec(true);
        let salts = Salts::new("A", "B");
        let envelope = codec.seal(&value, &salts).unwrap();

        let mut chars: Vec<char> = envelope.as_str().chars().collect();
        let idx = index.index(chars.len());
        chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        if let Ok(opened) = codec.open(&tampered, &salts) {
            prop_assert!(!opened.trusted);
        }
    }

    #[test]
    fn different_salts_are_untrusted(
        value in value_strategy(),
        prefix in salt_strategy(),
        suffix in salt_strategy(),
        other in salt_strategy(),
    ) {
        prop_assume!(other != suffix);
        let codec = codec(true);
        let envelope = codec.seal(&value, &Salts::new(prefix.clone(), suffix)).unwrap();

        let opened = codec.open(envelope.as_str(), &Salts::new(prefix, other)).unwrap();
        prop_assert!(!opened.trusted);
    }

    #[test]
    fn different_prefix_is_untrusted(
        value in value_strategy(),
        prefix in salt_strategy(),
        suffix in salt_strategy(),
        other in salt_strategy(),
    ) {
        prop_assume!(other != prefix);
        let codec = codec(true);
        let envelope = codec.seal(&value, &Salts::new(prefix, suffix.clone())).unwrap();

        let opened = codec.open(envelope.as_str(), &Salts::new(other, suffix)).unwrap();
        prop_assert!(!opened.trusted);
    }

    #[test]
    fn fingerprint_length_is_fixed(
        value in value_strategy(),
        algorithm in prop::sample::select(FingerprintAlgorithm::ALL.to_vec()),
    ) {
        let codec = SignedEnvelopeCodec::new(EnvelopeConfig::default().with_algorithm(algorithm))
            .unwrap();
        let envelope = codec.seal(&value, &Salts::none()).unwrap();

        let (fingerprint, payload) = envelope.parts(algorithm.text_len()).unwrap();
        prop_assert_eq!(fingerprint.len(), algorithm.text_len());
        prop_assert_eq!(payload.len() % 4, 0);
    }

    #[test]
    fn open_is_idempotent(
        value in value_strategy(),
        garbage in "[A-Za-z0-9+/=]{0,64}",
    ) {
        let codec = codec(true);
        let salts = Salts::new("A", "B");
        let envelope = codec.seal(&value, &salts).unwrap();

        for input in [envelope.as_str(), garbage.as_str()] {
            let first = codec.open(input, &salts).map_err(|e| e.to_string());
            let second = codec.open(input, &salts).map_err(|e| e.to_string());
            prop_assert_eq!(first, second);
        }
    }
}
