//! Signed Envelope Codec Service
//!
//! Orchestrates serialization, text encoding and fingerprinting to seal
//! values and to open received envelopes under the configured trust policy.

use shared_crypto::{constant_time_eq, text};
use shared_types::{SerializationError, TokenSerializer, Value, ValueSerializer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::domain::envelope::split;
use crate::domain::fingerprint::{self, SaltText};
use crate::domain::{Envelope, EnvelopeConfig, Opened, Salts};
use crate::error::{EnvelopeError, MalformedReason};
use crate::metrics::{MetricsRecorder, NoOpMetrics, OpenOutcome};
use crate::ports::EnvelopeCodecApi;

/// Envelope codec implementation
///
/// Immutable after construction. Share it behind an `Arc` and call `seal`
/// and `open` from any number of threads.
pub struct SignedEnvelopeCodec {
    config: EnvelopeConfig,
    serializer: Arc<dyn ValueSerializer>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl SignedEnvelopeCodec {
    /// Create a codec with the default serializer and no metrics
    ///
    /// # Errors
    /// `EnvelopeError::Config` if the configuration does not validate.
    pub fn new(config: EnvelopeConfig) -> Result<Self, EnvelopeError> {
        config.validate()?;
        Ok(Self {
            config,
            serializer: Arc::new(TokenSerializer::new()),
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Replace the value serializer
    pub fn with_serializer(mut self, serializer: Arc<dyn ValueSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Attach a metrics recorder
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    fn encode_value(&self, value: &Value) -> Result<String, EnvelopeError> {
        let bytes = self
            .serializer
            .serialize(value)
            .map_err(EnvelopeError::UnsupportedValue)?;
        Ok(text::encode(&bytes))
    }

    fn salt_text(&self, salts: &Salts) -> Result<SaltText, EnvelopeError> {
        Ok(SaltText {
            prefix: self.encode_value(&salts.prefix)?,
            suffix: self.encode_value(&salts.suffix)?,
        })
    }

    fn seal_text(&self, payload_text: &str, salts: &SaltText) -> Result<Envelope, EnvelopeError> {
        let fingerprint =
            fingerprint::compute(self.config.algorithm, self.config.mode, salts, payload_text)?;
        Ok(Envelope::from_parts(fingerprint, payload_text))
    }

    fn open_inner(&self, envelope: &str, salts: &Salts) -> Result<Opened, EnvelopeError> {
        let min = self.fingerprint_text_len();

        if envelope.len() > self.config.max_envelope_len {
            return Err(EnvelopeError::MalformedEnvelope(MalformedReason::TooLong {
                len: envelope.len(),
                max: self.config.max_envelope_len,
            }));
        }
        if envelope.len() < min {
            return Err(EnvelopeError::MalformedEnvelope(MalformedReason::TooShort {
                len: envelope.len(),
                min,
            }));
        }

        // Fixed split point; the fingerprint segment is never inspected here.
        let (_, payload_text) = split(envelope, min)
            .ok_or(EnvelopeError::MalformedEnvelope(MalformedReason::InvalidEncoding))?;
        let payload = text::decode(payload_text)
            .map_err(|_| EnvelopeError::MalformedEnvelope(MalformedReason::InvalidEncoding))?;

        // An undecodable payload is indistinguishable from a forged one.
        let value = match self.serializer.deserialize(&payload) {
            Ok(value) => value,
            Err(_) => return self.untrusted(Value::Null),
        };

        // Re-serializing the recovered value must reproduce the received
        // payload byte for byte, so the whole envelope is recomputed.
        let salt_text = self.salt_text(salts)?;
        let payload_text = match self.encode_value(&value) {
            Ok(text) => text,
            Err(_) => return self.untrusted(Value::Null),
        };
        let expected = self.seal_text(&payload_text, &salt_text)?;
        let trusted = constant_time_eq(expected.as_str(), envelope);

        if !trusted {
            return self.untrusted(value);
        }
        Ok(Opened { value, trusted })
    }

    /// Apply the untrusted-data policy.
    fn untrusted(&self, value: Value) -> Result<Opened, EnvelopeError> {
        if self.config.allow_untrusted_data {
            Ok(Opened {
                value,
                trusted: false,
            })
        } else {
            Err(EnvelopeError::UntrustedEnvelope)
        }
    }
}

impl EnvelopeCodecApi for SignedEnvelopeCodec {
    fn seal(&self, value: &Value, salts: &Salts) -> Result<Envelope, EnvelopeError> {
        let start = Instant::now();

        let payload_text = self.encode_value(value)?;
        let salt_text = self.salt_text(salts)?;
        let envelope = self.seal_text(&payload_text, &salt_text)?;

        // Never hand out an envelope this codec would refuse to open.
        if envelope.len() > self.config.max_envelope_len {
            warn!(
                kind = %value.kind(),
                len = envelope.len(),
                max = self.config.max_envelope_len,
                "refusing to seal oversized value"
            );
            return Err(EnvelopeError::UnsupportedValue(
                SerializationError::SizeLimitExceeded {
                    limit: self.config.max_envelope_len as u64,
                },
            ));
        }

        self.metrics.record_seal(start.elapsed());
        debug!(
            algorithm = %self.config.algorithm,
            mode = %self.config.mode,
            kind = %value.kind(),
            len = envelope.len(),
            "sealed envelope"
        );
        Ok(envelope)
    }

    fn open(&self, envelope: &str, salts: &Salts) -> Result<Opened, EnvelopeError> {
        let start = Instant::now();
        let result = self.open_inner(envelope, salts);

        let outcome = match &result {
            Ok(opened) if opened.trusted => OpenOutcome::Trusted,
            Err(EnvelopeError::MalformedEnvelope(_)) => OpenOutcome::Malformed,
            _ => OpenOutcome::Untrusted,
        };
        self.metrics.record_open(start.elapsed(), outcome);

        match (&result, outcome) {
            (Err(EnvelopeError::MalformedEnvelope(reason)), _) => {
                warn!(%reason, "rejected malformed envelope");
            }
            (_, OpenOutcome::Untrusted) => {
                warn!(
                    len = envelope.len(),
                    permissive = self.config.allow_untrusted_data,
                    "envelope failed trust check"
                );
            }
            (Ok(opened), _) => debug!(
                len = envelope.len(),
                kind = %opened.value.kind(),
                "opened trusted envelope"
            ),
            _ => {}
        }
        result
    }

    fn fingerprint_text_len(&self) -> usize {
        self.config.algorithm.text_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnvelopeConfigBuilder, FingerprintMode};
    use crate::metrics::Metrics;
    use shared_crypto::FingerprintAlgorithm;

    fn strict() -> SignedEnvelopeCodec {
        SignedEnvelopeCodec::new(EnvelopeConfig::default()).unwrap()
    }

    fn permissive() -> SignedEnvelopeCodec {
        SignedEnvelopeCodec::new(EnvelopeConfig::default().with_allow_untrusted_data(true)).unwrap()
    }

    #[test]
    fn test_seal_layout() {
        let codec = strict();
        let salts = Salts::new("A", "B");
        let value = Value::Int(10);

        let envelope = codec.seal(&value, &salts).unwrap();
        let (fp, payload) = envelope.parts(27).unwrap();

        let ser = TokenSerializer::new();
        let payload_text = text::encode(&ser.serialize(&value).unwrap());
        assert_eq!(payload, payload_text);

        let mut input = text::encode(&ser.serialize(&Value::from("A")).unwrap());
        input.push_str(&payload_text);
        input.push_str(&text::encode(&ser.serialize(&Value::from("B")).unwrap()));
        assert_eq!(fp, FingerprintAlgorithm::Sha1.fingerprint_text(input.as_bytes()));
    }

    #[test]
    fn test_seal_is_deterministic() {
        let codec = strict();
        let salts = Salts::new("p", "s");
        let value = Value::map([("a", Value::Int(1)), ("b", Value::from("x"))]);
        assert_eq!(codec.seal(&value, &salts).unwrap(), codec.seal(&value, &salts).unwrap());
    }

    #[test]
    fn test_open_roundtrip() {
        let codec = strict();
        let salts = Salts::new("A", "B");
        let envelope = codec.seal(&Value::Int(10), &salts).unwrap();

        let opened = codec.open(envelope.as_str(), &salts).unwrap();
        assert_eq!(opened, Opened { value: Value::Int(10), trusted: true });
    }

    #[test]
    fn test_wrong_salt_strict_and_permissive() {
        let salts = Salts::new("A", "B");
        let other = Salts::new("A", "C");

        let envelope = strict().seal(&Value::Int(10), &salts).unwrap();

        let err = strict().open(envelope.as_str(), &other).unwrap_err();
        assert!(err.is_untrusted());

        let opened = permissive().open(envelope.as_str(), &other).unwrap();
        assert!(!opened.trusted);
        assert_eq!(opened.value, Value::Int(10));
    }

    #[test]
    fn test_short_envelope_is_malformed() {
        let err = strict().open("abc", &Salts::none()).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::MalformedEnvelope(MalformedReason::TooShort { len: 3, min: 27 })
        ));
    }

    #[test]
    fn test_bad_payload_encoding_is_malformed() {
        let envelope = format!("{}{}", "A".repeat(27), "not*base64");
        let err = permissive().open(&envelope, &Salts::none()).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::MalformedEnvelope(MalformedReason::InvalidEncoding)
        ));
    }

    #[test]
    fn test_undecodable_payload_follows_policy() {
        let envelope = format!("{}{}", "A".repeat(27), text::encode(b"\xFF\xFF\xFF"));

        let err = strict().open(&envelope, &Salts::none()).unwrap_err();
        assert!(err.is_untrusted());

        let opened = permissive().open(&envelope, &Salts::none()).unwrap();
        assert_eq!(
            opened,
            Opened {
                value: Value::Null,
                trusted: false
            }
        );
    }

    #[test]
    fn test_envelope_length_limit() {
        let config = EnvelopeConfigBuilder::new().max_envelope_len(64).build().unwrap();
        let codec = SignedEnvelopeCodec::new(config).unwrap();

        let err = codec.seal(&Value::from("x".repeat(100)), &Salts::none()).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::UnsupportedValue(SerializationError::SizeLimitExceeded { limit: 64 })
        ));

        // Anything seal accepts, open accepts.
        let envelope = codec.seal(&Value::from("x"), &Salts::none()).unwrap();
        assert!(envelope.len() <= 64);
        assert!(codec.open(envelope.as_str(), &Salts::none()).unwrap().trusted);

        let oversized = format!("{}{}", envelope, "AAAA".repeat(16));
        let err = codec.open(&oversized, &Salts::none()).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::MalformedEnvelope(MalformedReason::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_non_finite_value_is_unsupported() {
        let err = strict().seal(&Value::Float(f64::NAN), &Salts::none()).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::UnsupportedValue(SerializationError::NonFiniteFloat)
        ));

        let err = strict()
            .seal(&Value::Int(1), &Salts::new(f64::INFINITY, Value::Null))
            .unwrap_err();
        assert!(matches!(err, EnvelopeError::UnsupportedValue(_)));
    }

    #[test]
    fn test_hmac_mode_roundtrip_and_differs() {
        let config = EnvelopeConfig::default().with_mode(FingerprintMode::Hmac);
        let keyed = SignedEnvelopeCodec::new(config).unwrap();
        let salts = Salts::new("A", "B");

        let envelope = keyed.seal(&Value::Int(10), &salts).unwrap();
        assert!(keyed.open(envelope.as_str(), &salts).unwrap().trusted);
        assert_ne!(envelope, strict().seal(&Value::Int(10), &salts).unwrap());
        assert!(strict().open(envelope.as_str(), &salts).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnvelopeConfig {
            max_envelope_len: 10,
            ..EnvelopeConfig::default()
        };
        assert!(matches!(
            SignedEnvelopeCodec::new(config),
            Err(EnvelopeError::Config(_))
        ));
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new());
        let codec = SignedEnvelopeCodec::new(EnvelopeConfig::default())
            .unwrap()
            .with_metrics(metrics.clone());
        let salts = Salts::new("A", "B");

        let envelope = codec.seal(&Value::Int(1), &salts).unwrap();
        let _ = codec.open(envelope.as_str(), &salts);
        let _ = codec.open(envelope.as_str(), &Salts::none());
        let _ = codec.open("short", &salts);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.seals, 1);
        assert_eq!(snapshot.opens_trusted, 1);
        assert_eq!(snapshot.opens_untrusted, 1);
        assert_eq!(snapshot.opens_malformed, 1);
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SignedEnvelopeCodec>();
    }
}
