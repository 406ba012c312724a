//! Entity metadata: a self-terminating list of typed entries.
//!
//! Each entry starts with one tag byte. The top three bits select the value
//! type, the bottom five bits are the entry index. A tag byte of `0x7F` ends
//! the list.

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::item_stack::Slot;

/// Tag byte that terminates a metadata list.
pub const METADATA_END: u8 = 0x7F;

/// A typed metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Slot(Slot),
    Position { x: i32, y: i32, z: i32 },
    /// Type 7 has no assigned payload and carries nothing.
    Unassigned,
}

impl MetadataValue {
    /// The 3-bit type id used in the tag byte.
    pub fn type_id(&self) -> u8 {
        match self {
            MetadataValue::Byte(_) => 0,
            MetadataValue::Short(_) => 1,
            MetadataValue::Int(_) => 2,
            MetadataValue::Float(_) => 3,
            MetadataValue::String(_) => 4,
            MetadataValue::Slot(_) => 5,
            MetadataValue::Position { .. } => 6,
            MetadataValue::Unassigned => 7,
        }
    }
}

/// A single entity metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    /// Entry index (0-31).
    pub index: u8,
    pub value: MetadataValue,
}

/// A full metadata list, as carried by spawn and metadata packets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityMetadata(pub Vec<MetadataEntry>);

impl ProtoEncode for EntityMetadata {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        for entry in &self.0 {
            buf.put_u8((entry.value.type_id() << 5) | (entry.index & 0x1F));
            match &entry.value {
                MetadataValue::Byte(v) => buf.put_i8(*v),
                MetadataValue::Short(v) => buf.put_i16(*v),
                MetadataValue::Int(v) => buf.put_i32(*v),
                MetadataValue::Float(v) => buf.put_f32(*v),
                MetadataValue::String(v) => write_string(buf, v),
                MetadataValue::Slot(v) => v.proto_encode(buf),
                MetadataValue::Position { x, y, z } => {
                    buf.put_i32(*x);
                    buf.put_i32(*y);
                    buf.put_i32(*z);
                }
                MetadataValue::Unassigned => {}
            }
        }
        buf.put_u8(METADATA_END);
    }
}

impl ProtoDecode for EntityMetadata {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut entries = Vec::new();
        loop {
            let tag = r.read_u8().await?;
            if tag == METADATA_END {
                break;
            }
            let value = match (tag & 0xE0) >> 5 {
                0 => MetadataValue::Byte(r.read_i8().await?),
                1 => MetadataValue::Short(r.read_i16().await?),
                2 => MetadataValue::Int(r.read_i32().await?),
                3 => MetadataValue::Float(r.read_f32().await?),
                4 => MetadataValue::String(read_string(r).await?),
                5 => MetadataValue::Slot(Slot::proto_decode(r).await?),
                6 => MetadataValue::Position {
                    x: r.read_i32().await?,
                    y: r.read_i32().await?,
                    z: r.read_i32().await?,
                },
                _ => MetadataValue::Unassigned,
            };
            entries.push(MetadataEntry {
                index: tag & 0x1F,
                value,
            });
        }
        Ok(EntityMetadata(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_stack::ItemStack;
    use bytes::BytesMut;

    #[tokio::test]
    async fn empty_list_is_one_byte() {
        let raw = [METADATA_END, 0x42];
        let mut r = &raw[..];
        let meta = EntityMetadata::proto_decode(&mut r).await.unwrap();
        assert!(meta.0.is_empty());
        assert_eq!(r, &[0x42]);
    }

    #[tokio::test]
    async fn every_type_roundtrips() {
        let meta = EntityMetadata(vec![
            MetadataEntry {
                index: 0,
                value: MetadataValue::Byte(-2),
            },
            MetadataEntry {
                index: 1,
                value: MetadataValue::Short(300),
            },
            MetadataEntry {
                index: 2,
                value: MetadataValue::Int(70_000),
            },
            MetadataEntry {
                index: 6,
                value: MetadataValue::Float(20.0),
            },
            MetadataEntry {
                index: 10,
                value: MetadataValue::String("Steve".into()),
            },
            MetadataEntry {
                index: 12,
                value: MetadataValue::Slot(Slot(Some(ItemStack::new(1, 1, 0)))),
            },
            MetadataEntry {
                index: 17,
                value: MetadataValue::Position { x: 1, y: 64, z: -3 },
            },
        ]);
        let mut buf = BytesMut::new();
        meta.proto_encode(&mut buf);
        buf.put_u8(0x99);

        let mut r = &buf[..];
        let decoded = EntityMetadata::proto_decode(&mut r).await.unwrap();
        assert_eq!(decoded, meta);
        assert_eq!(r, &[0x99]);
    }

    #[tokio::test]
    async fn tag_bits_split_type_and_index() {
        // 0x45 = type 2 (int), index 5
        let raw = [0x45, 0x00, 0x00, 0x01, 0x00, METADATA_END];
        let mut r = &raw[..];
        let meta = EntityMetadata::proto_decode(&mut r).await.unwrap();
        assert_eq!(
            meta.0,
            vec![MetadataEntry {
                index: 5,
                value: MetadataValue::Int(256),
            }]
        );
    }

    #[tokio::test]
    async fn unassigned_type_has_no_payload() {
        let raw = [0xE3, 0x00, 0x01, METADATA_END];
        let mut r = &raw[..];
        let meta = EntityMetadata::proto_decode(&mut r).await.unwrap();
        assert_eq!(meta.0.len(), 2);
        assert_eq!(meta.0[0].value, MetadataValue::Unassigned);
        assert_eq!(meta.0[1].value, MetadataValue::Byte(1));
    }

    #[tokio::test]
    async fn missing_terminator_is_eof() {
        let raw = [0x00, 0x01];
        let mut r = &raw[..];
        assert!(matches!(
            EntityMetadata::proto_decode(&mut r).await,
            Err(ProtoError::UnexpectedEof)
        ));
    }
}
