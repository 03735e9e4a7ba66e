//! Shared encode/decode surface for the header and every frame variant.

use crate::error::{ensure_marshal_len, FrameError};
use bytes::BytesMut;

/// A structure with a fixed wire representation.
pub trait WireFormat: Sized {
    /// Number of bytes `encode` produces.
    fn encoded_len(&self) -> usize;

    /// Writes the wire bytes into the front of `buf` and returns how many
    /// were written.
    ///
    /// Fails with [`FrameError::TooShortToMarshalBinary`] before touching
    /// `buf` if it cannot hold [`encoded_len`](Self::encoded_len) bytes.
    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError>;

    /// Decodes a value from the front of `buf`.
    fn decode(buf: &[u8]) -> Result<Self, FrameError>;

    /// Encodes into a freshly allocated buffer.
    fn encode(&self) -> Result<BytesMut, FrameError> {
        let mut buf = BytesMut::zeroed(self.encoded_len());
        let written = self.encode_to(&mut buf)?;
        buf.truncate(written);
        Ok(buf)
    }
}

/// Length check shared by every `encode_to` implementation.
pub(crate) fn check_capacity<T: WireFormat>(value: &T, buf: &[u8]) -> Result<usize, FrameError> {
    let needed = value.encoded_len();
    ensure_marshal_len(buf, needed)?;
    Ok(needed)
}
