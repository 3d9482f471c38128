//! Codec Module
//!
//! Converts values to and from the byte payloads kept by a store.
//!
//! Two codecs ship with the crate: [`JsonCodec`] (text) and [`BincodeCodec`]
//! (binary). [`Format`] names one of them and is what entities return when
//! they override the engine-wide default.

mod binary;
mod json;

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

pub use binary::BincodeCodec;
pub use json::JsonCodec;

// == Codec Error ==
/// Failure raised while encoding or decoding a payload.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Text codec failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Binary codec failure
    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    /// Encoding produced zero bytes, which a store reads back as absence
    #[error("codec produced an empty payload")]
    EmptyPayload,

    /// Failure reported by a caller-provided codec
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

// == Codec Trait ==
/// Two-operation serializer contract consumed by the cache engine.
///
/// Any implementation that round-trips a value of the entity's shape can be
/// used as the engine default.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Serializes `value` into a payload.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Deserializes a payload produced by [`Codec::encode`].
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        (**self).encode(value)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        (**self).decode(data)
    }
}

// == Format ==
/// One of the built-in codecs, selectable at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON text encoding
    #[default]
    Json,
    /// Compact binary encoding
    Bincode,
}

impl Codec for Format {
    fn name(&self) -> &'static str {
        match self {
            Format::Json => JsonCodec.name(),
            Format::Bincode => BincodeCodec.name(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Format::Json => JsonCodec.encode(value),
            Format::Bincode => BincodeCodec.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        match self {
            Format::Json => JsonCodec.decode(data),
            Format::Bincode => BincodeCodec.decode(data),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "bincode" | "binary" => Ok(Format::Bincode),
            other => Err(format!("unknown codec '{}'", other)),
        }
    }
}
