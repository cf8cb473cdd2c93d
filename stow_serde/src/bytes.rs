//! Serialization/deserialization

use crate::{Error, Result};
use bincode::Options;
use log::trace;
use serde::{de::DeserializeOwned, ser::Serialize};

/// A trait for types that can be serialized to bytes
pub trait ToBytes {
    /// Serializes to bytes
    fn to_bytes(&self) -> Result<Vec<u8>>;
}

/// A trait for types that can be deserialized from bytes
pub trait FromBytes: Sized {
    /// Deserializes from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

impl<T> ToBytes for T
where
    T: Serialize + ?Sized,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Codec::default().encode(self)
    }
}

impl<T> FromBytes for T
where
    T: DeserializeOwned,
{
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Codec::default().decode(bytes)
    }
}

/// The binary encoding used for stored values
///
/// Integers are written big-endian at their full width and decoding rejects
/// any bytes left over after the value. An optional limit caps the encoded
/// size in both directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Codec {
    limit: Option<u64>,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl Codec {
    /// Creates a codec with no size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec that refuses encodings larger than `limit` bytes
    pub fn with_limit(limit: u64) -> Self {
        Self { limit: Some(limit) }
    }

    /// Gets the size limit, if any
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Encodes a value
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let bytes = match self.limit {
            Some(limit) => options().with_limit(limit).serialize(value),
            None => options().serialize(value),
        }
        .map_err(Error::Encoding)?;
        trace!("encoded {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Decodes a value
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.check_decoding_limit(bytes.len() as u64)?;
        let x = options().deserialize(bytes).map_err(Error::Decoding)?;
        trace!("decoded {} bytes", bytes.len());
        Ok(x)
    }

    /// Fails if `len` bytes are more than this codec will decode
    pub(crate) fn check_decoding_limit(&self, len: u64) -> Result<()> {
        match self.limit {
            Some(limit) if len > limit => {
                Err(Error::Decoding(Box::new(bincode::ErrorKind::SizeLimit)))
            }
            _ => Ok(()),
        }
    }
}
