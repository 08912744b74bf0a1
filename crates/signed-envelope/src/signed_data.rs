//! Stateful signed-data holder
//!
//! Keeps a salt pair together with the last value sealed or envelope opened,
//! for callers that round-trip a single piece of state (a cookie, a hidden
//! form field) through an untrusted channel.
//!
//! ```ignore
//! let codec = Arc::new(SignedEnvelopeCodec::new(EnvelopeConfig::default())?);
//! let mut data = SignedData::new(codec.clone(), Salts::new("A", "B"));
//! let envelope = data.set_unsigned_data(Value::Int(10))?.clone();
//!
//! let mut received = SignedData::new(codec, Salts::new("A", "B"));
//! assert_eq!(received.set_signed_data(envelope)?, Some(&Value::Int(10)));
//! ```

use shared_types::Value;
use std::sync::Arc;

use crate::domain::{Envelope, Salts};
use crate::error::EnvelopeError;
use crate::ports::EnvelopeCodecApi;
use crate::service::SignedEnvelopeCodec;

/// Salt pair plus the most recent sealed or opened data.
pub struct SignedData<C: EnvelopeCodecApi = SignedEnvelopeCodec> {
    codec: Arc<C>,
    salts: Salts,
    unsigned: Option<Value>,
    signed: Option<Envelope>,
    trusted: Option<bool>,
}

impl<C: EnvelopeCodecApi> SignedData<C> {
    pub fn new(codec: Arc<C>, salts: Salts) -> Self {
        Self {
            codec,
            salts,
            unsigned: None,
            signed: None,
            trusted: None,
        }
    }

    /// Seal `value` with the stored salts and keep both sides.
    pub fn set_unsigned_data(&mut self, value: impl Into<Value>) -> Result<&Envelope, EnvelopeError> {
        let value = value.into();
        let envelope = self.codec.seal(&value, &self.salts)?;

        self.unsigned = Some(value);
        self.trusted = Some(true);
        Ok(self.signed.insert(envelope))
    }

    /// Open `envelope` with the stored salts.
    ///
    /// Returns the value only when trusted. A permissive codec keeps the
    /// untrusted value available through [`SignedData::unsigned_data`]. On
    /// error the envelope is still recorded and marked untrusted.
    pub fn set_signed_data(
        &mut self,
        envelope: impl Into<Envelope>,
    ) -> Result<Option<&Value>, EnvelopeError> {
        let envelope = envelope.into();
        let result = self.codec.open(envelope.as_str(), &self.salts);
        self.signed = Some(envelope);

        match result {
            Ok(opened) => {
                self.trusted = Some(opened.trusted);
                let value = self.unsigned.insert(opened.value);
                Ok(opened.trusted.then_some(&*value))
            }
            Err(e) => {
                self.unsigned = None;
                self.trusted = Some(false);
                Err(e)
            }
        }
    }

    pub fn unsigned_data(&self) -> Option<&Value> {
        self.unsigned.as_ref()
    }

    pub fn signed_data(&self) -> Option<&Envelope> {
        self.signed.as_ref()
    }

    /// `None` until data has been set.
    pub fn is_trusted(&self) -> Option<bool> {
        self.trusted
    }

    pub fn salts(&self) -> &Salts {
        &self.salts
    }

    /// Replace the prefix salt. Clears held data.
    pub fn set_salt_prefix(&mut self, prefix: impl Into<Value>) {
        self.salts.prefix = prefix.into();
        self.clear();
    }

    /// Replace the suffix salt. Clears held data.
    pub fn set_salt_suffix(&mut self, suffix: impl Into<Value>) {
        self.salts.suffix = suffix.into();
        self.clear();
    }

    fn clear(&mut self) {
        self.unsigned = None;
        self.signed = None;
        self.trusted = None;
    }
}
