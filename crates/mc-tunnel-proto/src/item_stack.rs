//! ItemStack type and slot serialization.
//!
//! Represents an item in a window slot, an entity's equipment or a metadata entry.
//!
//! ```text
//! i16(id)          : <= 0 means the slot is empty, nothing follows
//! i8(count)
//! i16(damage)
//! i16(tag_length)  : <= 0 means no tag
//! [u8; tag_length] : compressed NBT, kept opaque
//! ```

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{skip_bytes, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// A non-empty item stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Item id, always positive.
    pub id: i16,
    pub count: i8,
    /// Damage or variant metadata.
    pub damage: i16,
    /// Opaque compressed NBT. Empty when the stack carries no tag.
    pub tag: Vec<u8>,
}

impl ItemStack {
    /// Create a simple item stack with no tag.
    pub fn new(id: i16, count: i8, damage: i16) -> Self {
        Self {
            id,
            count,
            damage,
            tag: Vec::new(),
        }
    }
}

/// A slot: an item stack or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slot(pub Option<ItemStack>);

impl Slot {
    pub const EMPTY: Slot = Slot(None);

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl ProtoEncode for Slot {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let Some(stack) = &self.0 else {
            buf.put_i16(-1);
            return;
        };
        buf.put_i16(stack.id);
        buf.put_i8(stack.count);
        buf.put_i16(stack.damage);
        if stack.tag.is_empty() {
            buf.put_i16(-1);
        } else {
            buf.put_i16(stack.tag.len() as i16);
            buf.put_slice(&stack.tag);
        }
    }
}

impl ProtoDecode for Slot {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let id = r.read_i16().await?;
        if id <= 0 {
            return Ok(Slot(None));
        }
        let count = r.read_i8().await?;
        let damage = r.read_i16().await?;
        let tag_len = r.read_i16().await?;
        let tag = if tag_len > 0 {
            let mut tag = vec![0u8; tag_len as usize];
            r.read_exact(&mut tag).await?;
            tag
        } else {
            Vec::new()
        };
        Ok(Slot(Some(ItemStack {
            id,
            count,
            damage,
            tag,
        })))
    }
}

/// Consume one slot without keeping it.
pub async fn skip_slot<R: AsyncRead + Unpin>(r: &mut R) -> Result<(), ProtoError> {
    if r.read_i16().await? > 0 {
        r.read_i8().await?;
        r.read_i16().await?;
        let tag_len = r.read_i16().await?;
        skip_bytes(r, tag_len as i32).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[tokio::test]
    async fn empty_slot_consumes_only_the_id() {
        for id in [0i16, -1, i16::MIN] {
            let mut raw = BytesMut::new();
            raw.put_i16(id);
            raw.put_slice(&[0xAA, 0xBB, 0xCC]);
            let mut r = &raw[..];
            let slot = Slot::proto_decode(&mut r).await.unwrap();
            assert!(slot.is_empty());
            assert_eq!(r, &[0xAA, 0xBB, 0xCC]);

            let mut r = &raw[..];
            skip_slot(&mut r).await.unwrap();
            assert_eq!(r.len(), 3);
        }
    }

    #[tokio::test]
    async fn stack_without_tag() {
        let raw = [0x01, 0x15, 0x40, 0x00, 0x03, 0xFF, 0xFF];
        let mut r = &raw[..];
        let slot = Slot::proto_decode(&mut r).await.unwrap();
        assert_eq!(slot, Slot(Some(ItemStack::new(0x0115, 64, 3))));
        assert!(r.is_empty());
    }

    #[tokio::test]
    async fn stack_with_tag() {
        let stack = ItemStack {
            id: 276,
            count: 1,
            damage: 0,
            tag: vec![0x1F, 0x8B, 0x08, 0x00],
        };
        let mut buf = BytesMut::new();
        Slot(Some(stack.clone())).proto_encode(&mut buf);
        assert_eq!(buf.len(), 2 + 1 + 2 + 2 + 4);

        let mut r = &buf[..];
        assert_eq!(Slot::proto_decode(&mut r).await.unwrap().0, Some(stack));

        let mut r = &buf[..];
        skip_slot(&mut r).await.unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn empty_slot_encodes_minus_one() {
        let mut buf = BytesMut::new();
        Slot::EMPTY.proto_encode(&mut buf);
        assert_eq!(&buf[..], &[0xFF, 0xFF]);
    }

    #[tokio::test]
    async fn truncated_tag_is_eof() {
        let raw = [0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x05, 0x01];
        let mut r = &raw[..];
        assert!(matches!(
            Slot::proto_decode(&mut r).await,
            Err(ProtoError::UnexpectedEof)
        ));
    }
}
