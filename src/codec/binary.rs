//! Binary codec backed by bincode.
//!
//! Bincode is not self-describing: payloads only decode into the exact type
//! shape they were encoded from.

use serde::{de::DeserializeOwned, Serialize};

use super::{Codec, CodecError};

/// Compact binary codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        Ok(bincode::deserialize(data)?)
    }
}
