//! Versioned JSON representation of a persisted collection.
//!
//! Version 1 wraps the items in an envelope: `{"version": 1, "items": [...]}`.
//! A bare JSON array is read as version 0, the layout the web dashboard wrote.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const CURRENT_VERSION: u32 = 1;
pub const LEGACY_VERSION: u32 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed collection: {0}")]
    Malformed(String),

    #[error("unsupported collection version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed(err.to_string())
    }
}

/// A successfully decoded collection and the layout version it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub version: u32,
    pub items: Vec<T>,
}

impl<T> Decoded<T> {
    pub fn is_current(&self) -> bool {
        self.version == CURRENT_VERSION
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    version: u64,
    items: Value,
}

pub fn encode<T: Serialize>(items: &[T]) -> serde_json::Result<String> {
    serde_json::to_string(&EnvelopeOut {
        version: CURRENT_VERSION,
        items,
    })
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<Decoded<T>, DecodeError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(_) => {
            let items = serde_json::from_str(raw)?;
            Ok(Decoded {
                version: LEGACY_VERSION,
                items,
            })
        }
        value @ Value::Object(_) => {
            let header: EnvelopeHeader = serde_json::from_value(value)?;
            let version = u32::try_from(header.version)
                .ok()
                .filter(|version| *version <= CURRENT_VERSION)
                .ok_or(DecodeError::UnsupportedVersion {
                    found: header.version,
                    supported: CURRENT_VERSION,
                })?;
            let items = serde_json::from_value(header.items)?;
            Ok(Decoded { version, items })
        }
        other => Err(DecodeError::Malformed(format!(
            "expected an array or an envelope object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
