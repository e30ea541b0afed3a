// ABOUTME: Serialization of a Collection to and from its on-disk JSON envelope.
// ABOUTME: Normalizes legacy bare-list and bare-scalar files into a Collection at decode time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::Collection;
use crate::record::Record;

/// Envelope version written by this build.
pub const ENVELOPE_VERSION: u32 = 1;

/// Errors that can occur while encoding or decoding a persisted collection.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported envelope version {found}")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    version: u32,
    records: Collection,
}

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    records: &'a Collection,
}

/// A value stored by an older writer: either a plain string or a raw byte array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl From<LegacyValue> for Record {
    fn from(value: LegacyValue) -> Self {
        match value {
            LegacyValue::Text(text) => Record::Text(text),
            LegacyValue::Bytes(bytes) => Record::from_bytes(bytes),
        }
    }
}

// Variant order matters: the current envelope is tried first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredForm {
    Current(Envelope),
    LegacyList(Vec<LegacyValue>),
    LegacyScalar(LegacyValue),
}

/// A decoded collection plus whether it came from a legacy layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub collection: Collection,
    pub legacy: bool,
}

/// Serialize a collection into the current envelope.
pub fn encode_collection(collection: &Collection) -> Result<Vec<u8>, EnvelopeError> {
    let envelope = EnvelopeRef {
        version: ENVELOPE_VERSION,
        records: collection,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Parse persisted bytes into a collection. Legacy layouts are accepted and
/// flagged so the caller can log the migration; the next write replaces them
/// with the current envelope.
pub fn decode_collection(bytes: &[u8]) -> Result<Decoded, EnvelopeError> {
    let form: StoredForm = serde_json::from_slice(bytes)?;

    match form {
        StoredForm::Current(envelope) => {
            if envelope.version > ENVELOPE_VERSION {
                return Err(EnvelopeError::UnsupportedVersion {
                    found: envelope.version,
                });
            }
            Ok(Decoded {
                collection: envelope.records,
                legacy: false,
            })
        }
        StoredForm::LegacyList(values) => Ok(Decoded {
            collection: values.into_iter().map(Record::from).collect(),
            legacy: true,
        }),
        StoredForm::LegacyScalar(value) => Ok(Decoded {
            collection: Collection::from_records(vec![Record::from(value)]),
            legacy: true,
        }),
    }
}
