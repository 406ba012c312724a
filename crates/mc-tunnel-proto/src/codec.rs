//! Protocol encoding/decoding traits and helpers.
//!
//! All numbers on the wire are big-endian. Strings are a signed 16-bit count
//! of UTF-16 code units followed by the code units themselves.

use std::future::Future;

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ProtoError;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a byte stream, consuming exactly its encoded length.
pub trait ProtoDecode: Sized {
    fn proto_decode<R>(r: &mut R) -> impl Future<Output = Result<Self, ProtoError>> + Send
    where
        R: AsyncRead + Unpin + Send;
}

/// Longest string or byte array an i16 length prefix can declare.
pub const MAX_PREFIXED_LEN: usize = i16::MAX as usize;

/// Write a protocol string (i16 code unit count + UTF-16BE code units).
///
/// Strings longer than [`MAX_PREFIXED_LEN`] code units are cut at that
/// length so the count stays readable.
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    let units: Vec<u16> = s.encode_utf16().take(MAX_PREFIXED_LEN).collect();
    buf.put_i16(units.len() as i16);
    for unit in units {
        buf.put_u16(unit);
    }
}

/// Read a protocol string.
///
/// The declared count is trusted: exactly that many code units are consumed.
/// Unpaired surrogates decode to U+FFFD.
pub async fn read_string<R: AsyncRead + Unpin>(r: &mut R) -> Result<String, ProtoError> {
    let len = r.read_i16().await?;
    if len < 0 {
        return Err(ProtoError::InvalidData(format!(
            "negative string length {len}"
        )));
    }
    let mut raw = vec![0u8; len as usize * 2];
    r.read_exact(&mut raw).await?;
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

pub async fn read_bool<R: AsyncRead + Unpin>(r: &mut R) -> Result<bool, ProtoError> {
    Ok(r.read_u8().await? != 0)
}

/// Write an i16 length-prefixed byte array, cut at [`MAX_PREFIXED_LEN`] bytes.
pub fn write_byte_array(buf: &mut impl BufMut, data: &[u8]) {
    let data = &data[..data.len().min(MAX_PREFIXED_LEN)];
    buf.put_i16(data.len() as i16);
    buf.put_slice(data);
}

/// Read an i16 length-prefixed byte array.
pub async fn read_byte_array<R: AsyncRead + Unpin>(r: &mut R) -> Result<Vec<u8>, ProtoError> {
    let len = r.read_i16().await?;
    if len < 0 {
        return Err(ProtoError::InvalidData(format!(
            "negative byte array length {len}"
        )));
    }
    let mut data = vec![0u8; len as usize];
    r.read_exact(&mut data).await?;
    Ok(data)
}

/// Consume and discard `count` bytes. A count of zero or less consumes nothing.
pub async fn skip_bytes<R: AsyncRead + Unpin>(r: &mut R, count: i32) -> Result<(), ProtoError> {
    if count <= 0 {
        return Ok(());
    }
    let wanted = count as u64;
    let skipped = tokio::io::copy(&mut (&mut *r).take(wanted), &mut tokio::io::sink()).await?;
    if skipped < wanted {
        return Err(ProtoError::UnexpectedEof);
    }
    Ok(())
}
