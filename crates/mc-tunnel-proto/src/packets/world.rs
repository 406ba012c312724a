//! Chunk, block and world effect packets. All are skipped.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_string, skip_bytes};
use crate::error::ProtoError;

/// 0x33: chunk coordinates and bitmaps, then an i32-sized compressed run.
pub(crate) async fn skip_map_chunk<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    skip_bytes(r, 13).await?;
    let len = r.read_i32().await?;
    skip_bytes(r, len).await
}

/// 0x34
pub(crate) async fn skip_multi_block_change<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i32().await?;
    r.read_i16().await?;
    let len = r.read_i32().await?;
    skip_bytes(r, len).await
}

/// 0x38: chunk bulk.
///
/// A leading (i16 count, i32 length) pair and the `count * 12 + length`
/// bytes it spans are consumed first, then the regular header (count,
/// length, sky light flag) and its payload. Both spans use wrapping i32
/// arithmetic; a negative span consumes nothing.
pub(crate) async fn skip_map_chunk_bulk<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    let count = r.read_i16().await? as i32;
    let len = r.read_i32().await?;
    skip_bytes(r, count.wrapping_mul(12).wrapping_add(len)).await?;

    let chunk_count = r.read_i16().await? as i32;
    let data_len = r.read_i32().await?;
    r.read_u8().await?;
    skip_bytes(r, chunk_count.wrapping_mul(12).wrapping_add(data_len)).await
}

/// 0x3C: origin and radius, affected block records, player motion.
pub(crate) async fn skip_explosion<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    skip_bytes(r, 28).await?;
    let records = r.read_i32().await?;
    skip_bytes(r, records.wrapping_mul(3)).await?;
    skip_bytes(r, 12).await
}

/// 0x3E
pub(crate) async fn skip_named_sound_effect<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    read_string(r).await?;
    skip_bytes(r, 12 + 4 + 1).await
}

#[cfg(test)]
mod tests {
    use crate::codec::write_string;
    use crate::packets::{decode_packet, id};
    use bytes::{BufMut, BytesMut};

    async fn remaining_after(packet_id: u8, body: &[u8]) -> usize {
        let mut r = body;
        decode_packet(packet_id, &mut r, None).await.unwrap();
        r.len()
    }

    #[tokio::test]
    async fn map_chunk_skips_payload() {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0u8; 13]);
        buf.put_i32(5);
        buf.put_slice(&[1, 2, 3, 4, 5]);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::MAP_CHUNK, &buf).await, 1);
    }

    #[tokio::test]
    async fn multi_block_change() {
        let mut buf = BytesMut::new();
        buf.put_i32(0);
        buf.put_i32(0);
        buf.put_i16(2);
        buf.put_i32(8);
        buf.put_slice(&[0u8; 8]);
        assert_eq!(remaining_after(id::MULTI_BLOCK_CHANGE, &buf).await, 0);
    }

    #[tokio::test]
    async fn chunk_bulk_reads_both_headers() {
        let mut buf = BytesMut::new();
        // leading pair: 1 * 12 + 4 bytes
        buf.put_i16(1);
        buf.put_i32(4);
        buf.put_slice(&[0u8; 16]);
        // regular header: 2 chunks, 10 data bytes, sky light flag
        buf.put_i16(2);
        buf.put_i32(10);
        buf.put_u8(1);
        buf.put_slice(&[0u8; 24 + 10]);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::MAP_CHUNK_BULK, &buf).await, 1);
    }

    #[tokio::test]
    async fn chunk_bulk_negative_span_skips_nothing() {
        let mut buf = BytesMut::new();
        buf.put_i16(-1);
        buf.put_i32(0);
        buf.put_i16(0);
        buf.put_i32(0);
        buf.put_u8(0);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::MAP_CHUNK_BULK, &buf).await, 1);
    }

    #[tokio::test]
    async fn explosion_records() {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0u8; 28]);
        buf.put_i32(3);
        buf.put_slice(&[0u8; 9]);
        buf.put_slice(&[0u8; 12]);
        assert_eq!(remaining_after(id::EXPLOSION, &buf).await, 0);
    }

    #[tokio::test]
    async fn named_sound() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "random.click");
        buf.put_slice(&[0u8; 17]);
        buf.put_u8(0xEE);
        assert_eq!(remaining_after(id::NAMED_SOUND_EFFECT, &buf).await, 1);
    }
}
