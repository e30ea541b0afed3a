// ABOUTME: Defines Record, a single opaque text value held by the store.
// ABOUTME: Payloads that are not valid UTF-8 are kept as raw bytes and rendered lossily.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// One stored value. Identity is the text content itself; there is no id or
/// timestamp attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    /// A payload that decoded cleanly as UTF-8.
    Text(String),
    /// A payload that failed UTF-8 decoding, kept verbatim.
    Bytes(Vec<u8>),
}

impl Record {
    /// Build a record from raw request bytes. Valid UTF-8 becomes `Text`,
    /// anything else is kept as `Bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(err) => Self::Bytes(err.into_bytes()),
        }
    }

    /// The text representation used for rendering and exact-match deletion.
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// True when the payload did not decode as UTF-8.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
