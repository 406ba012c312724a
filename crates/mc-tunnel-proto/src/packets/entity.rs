//! Entity packets with variable-length bodies. The tunnel tracks no
//! entities, so each of these is consumed and dropped.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_string, skip_bytes, ProtoDecode};
use crate::error::ProtoError;
use crate::item_stack::skip_slot;
use crate::metadata::EntityMetadata;

/// 0x05: entity id, slot index, item.
pub(crate) async fn skip_entity_equipment<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i16().await?;
    skip_slot(r).await
}

/// 0x14: entity id, player name, position/look/held item, metadata.
pub(crate) async fn skip_named_entity_spawn<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    read_string(r).await?;
    skip_bytes(r, 16).await?;
    EntityMetadata::proto_decode(r).await?;
    Ok(())
}

/// 0x17: object spawn. A positive trailing flag adds a velocity triple.
pub(crate) async fn skip_spawn_object<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i8().await?;
    skip_bytes(r, 12).await?;
    r.read_i8().await?;
    r.read_i8().await?;
    if r.read_i32().await? > 0 {
        skip_bytes(r, 6).await?;
    }
    Ok(())
}

/// 0x18: mob spawn, ending in metadata.
pub(crate) async fn skip_spawn_mob<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i8().await?;
    skip_bytes(r, 12 + 3 + 6).await?;
    EntityMetadata::proto_decode(r).await?;
    Ok(())
}

/// 0x19: painting.
pub(crate) async fn skip_spawn_painting<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    read_string(r).await?;
    skip_bytes(r, 16).await
}

/// 0x1D: a byte count of entity ids.
pub(crate) async fn skip_destroy_entity<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    let count = r.read_i8().await? as i32;
    skip_bytes(r, count * 4).await
}

/// 0x28
pub(crate) async fn skip_entity_metadata<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    EntityMetadata::proto_decode(r).await?;
    Ok(())
}

/// 0x2C: entity id, then `n` properties, each with its own modifier list.
pub(crate) async fn skip_entity_properties<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    let properties = r.read_i32().await?;
    for _ in 0..properties {
        read_string(r).await?;
        r.read_f64().await?;
        let modifiers = r.read_i16().await?;
        for _ in 0..modifiers {
            // uuid (two longs), amount, operation
            skip_bytes(r, 8 + 8 + 8 + 1).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::codec::{write_string, ProtoEncode};
    use crate::error::ProtoError;
    use crate::metadata::{EntityMetadata, MetadataEntry, MetadataValue, METADATA_END};
    use crate::packets::{decode_packet, id};
    use bytes::{BufMut, BytesMut};

    async fn consumes_all(packet_id: u8, mut body: BytesMut) {
        body.put_u8(0xEE);
        let mut r = &body[..];
        decode_packet(packet_id, &mut r, None).await.unwrap();
        assert_eq!(r, &[0xEE], "0x{packet_id:02x}");
    }

    #[tokio::test]
    async fn named_entity_spawn() {
        let mut buf = BytesMut::new();
        buf.put_i32(7);
        write_string(&mut buf, "Notch");
        buf.put_slice(&[0u8; 16]);
        EntityMetadata(vec![MetadataEntry {
            index: 0,
            value: MetadataValue::Byte(0),
        }])
        .proto_encode(&mut buf);
        consumes_all(id::NAMED_ENTITY_SPAWN, buf).await;
    }

    #[tokio::test]
    async fn spawn_object_with_and_without_velocity() {
        for (flag, extra) in [(0, 0usize), (-5, 0), (3, 6)] {
            let mut buf = BytesMut::new();
            buf.put_i32(1);
            buf.put_i8(10);
            buf.put_slice(&[0u8; 12]);
            buf.put_i8(0);
            buf.put_i8(0);
            buf.put_i32(flag);
            buf.put_slice(&vec![0u8; extra]);
            consumes_all(id::SPAWN_OBJECT, buf).await;
        }
    }

    #[tokio::test]
    async fn spawn_mob() {
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_i8(50);
        buf.put_slice(&[0u8; 21]);
        buf.put_u8(METADATA_END);
        consumes_all(id::SPAWN_MOB, buf).await;
    }

    #[tokio::test]
    async fn destroy_entity_counts() {
        let mut buf = BytesMut::new();
        buf.put_i8(2);
        buf.put_slice(&[0u8; 8]);
        consumes_all(id::DESTROY_ENTITY, buf).await;

        let mut buf = BytesMut::new();
        buf.put_i8(-3);
        consumes_all(id::DESTROY_ENTITY, buf).await;
    }

    #[tokio::test]
    async fn entity_properties_with_modifiers() {
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_i32(2);
        write_string(&mut buf, "generic.movementSpeed");
        buf.put_f64(0.1);
        buf.put_i16(1);
        buf.put_slice(&[0u8; 25]);
        write_string(&mut buf, "generic.maxHealth");
        buf.put_f64(20.0);
        buf.put_i16(0);
        consumes_all(id::ENTITY_PROPERTIES, buf).await;
    }

    #[tokio::test]
    async fn metadata_packet_without_terminator_fails() {
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_u8(0x00);
        let mut r = &buf[..];
        assert!(matches!(
            decode_packet(id::ENTITY_METADATA, &mut r, None).await,
            Err(ProtoError::UnexpectedEof)
        ));
    }
}
