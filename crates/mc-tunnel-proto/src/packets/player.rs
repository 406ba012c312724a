//! Player state packets: keep-alive, health, respawn, position and kick.

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{read_bool, read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::item_stack::skip_slot;
use crate::types::Dimension;

/// Keep-alive (0x00). The client answers with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: i32,
}

impl ProtoEncode for KeepAlive {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.id);
    }
}

impl ProtoDecode for KeepAlive {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            id: r.read_i32().await?,
        })
    }
}

/// Update health (0x08).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateHealth {
    pub health: f32,
    pub food: i16,
    pub saturation: f32,
}

impl ProtoEncode for UpdateHealth {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f32(self.health);
        buf.put_i16(self.food);
        buf.put_f32(self.saturation);
    }
}

impl ProtoDecode for UpdateHealth {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            health: r.read_f32().await?,
            food: r.read_i16().await?,
            saturation: r.read_f32().await?,
        })
    }
}

/// Respawn (0x09).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Respawn {
    /// Sent as an i32; only the low byte is meaningful.
    pub dimension: Dimension,
    pub difficulty: i8,
    pub game_mode: i8,
    pub world_height: i16,
    pub level_type: String,
}

impl ProtoEncode for Respawn {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.dimension.id() as i32);
        buf.put_i8(self.difficulty);
        buf.put_i8(self.game_mode);
        buf.put_i16(self.world_height);
        write_string(buf, &self.level_type);
    }
}

impl ProtoDecode for Respawn {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            dimension: Dimension::from_id(r.read_i32().await? as i8),
            difficulty: r.read_i8().await?,
            game_mode: r.read_i8().await?,
            world_height: r.read_i16().await?,
            level_type: read_string(r).await?,
        })
    }
}

/// Player position (0x0B), client-bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPosition {
    pub x: f64,
    pub stance: f64,
    pub y: f64,
    pub z: f64,
    pub on_ground: bool,
}

impl ProtoEncode for PlayerPosition {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.stance);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        buf.put_u8(self.on_ground as u8);
    }
}

impl ProtoDecode for PlayerPosition {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            x: r.read_f64().await?,
            stance: r.read_f64().await?,
            y: r.read_f64().await?,
            z: r.read_f64().await?,
            on_ground: read_bool(r).await?,
        })
    }
}

/// Player position and look (0x0D).
///
/// The two directions order the vertical fields differently: the server
/// sends stance before y, the client sends y before stance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionLook {
    pub x: f64,
    pub y: f64,
    pub stance: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl PlayerPositionLook {
    /// Encode in server-bound field order.
    pub fn encode_serverbound(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.y);
        buf.put_f64(self.stance);
        buf.put_f64(self.z);
        buf.put_f32(self.yaw);
        buf.put_f32(self.pitch);
        buf.put_u8(self.on_ground as u8);
    }
}

impl ProtoEncode for PlayerPositionLook {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f64(self.x);
        buf.put_f64(self.stance);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        buf.put_f32(self.yaw);
        buf.put_f32(self.pitch);
        buf.put_u8(self.on_ground as u8);
    }
}

impl ProtoDecode for PlayerPositionLook {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let x = r.read_f64().await?;
        let stance = r.read_f64().await?;
        let y = r.read_f64().await?;
        let z = r.read_f64().await?;
        Ok(Self {
            x,
            y,
            stance,
            z,
            yaw: r.read_f32().await?,
            pitch: r.read_f32().await?,
            on_ground: read_bool(r).await?,
        })
    }
}

/// Disconnect / kick (0xFF).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    pub reason: String,
}

impl ProtoEncode for Disconnect {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.reason);
    }
}

impl ProtoDecode for Disconnect {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            reason: read_string(r).await?,
        })
    }
}

/// Player block placement (0x0F): location, face, held item and cursor.
pub(crate) async fn skip_block_placement<R>(r: &mut R) -> Result<(), ProtoError>
where
    R: AsyncRead + Unpin + Send,
{
    r.read_i32().await?;
    r.read_i8().await?;
    r.read_i32().await?;
    r.read_i8().await?;
    skip_slot(r).await?;
    r.read_i8().await?;
    r.read_i8().await?;
    r.read_i8().await?;
    Ok(())
}
