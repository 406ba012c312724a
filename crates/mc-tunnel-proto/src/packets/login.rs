//! Login phase packets: handshake, encryption key exchange, login request
//! and client status.

use bytes::BufMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{
    read_byte_array, read_string, write_byte_array, write_string, ProtoDecode, ProtoEncode,
};
use crate::error::ProtoError;
use crate::types::Dimension;

/// Handshake (0x02). Client-bound copies of this id are never valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: u8,
    pub username: String,
    pub host: String,
    pub port: i32,
}

impl ProtoEncode for Handshake {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.protocol_version);
        write_string(buf, &self.username);
        write_string(buf, &self.host);
        buf.put_i32(self.port);
    }
}

/// Login request (0x01), sent by the server once login succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub entity_id: i32,
    pub level_type: String,
    pub game_mode: i8,
    pub dimension: Dimension,
    pub difficulty: i8,
    pub max_players: i8,
}

impl ProtoEncode for LoginRequest {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.entity_id);
        write_string(buf, &self.level_type);
        buf.put_i8(self.game_mode);
        buf.put_i8(self.dimension.id());
        buf.put_i8(self.difficulty);
        buf.put_i8(0);
        buf.put_i8(self.max_players);
    }
}

impl ProtoDecode for LoginRequest {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let entity_id = r.read_i32().await?;
        let level_type = read_string(r).await?;
        let game_mode = r.read_i8().await?;
        let dimension = Dimension::from_id(r.read_i8().await?);
        let difficulty = r.read_i8().await?;
        let _unused = r.read_i8().await?;
        let max_players = r.read_i8().await?;
        Ok(Self {
            entity_id,
            level_type,
            game_mode,
            dimension,
            difficulty,
            max_players,
        })
    }
}

/// Encryption key request (0xFD): the server's DER public key and a verify token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKeyRequest {
    pub server_id: String,
    pub public_key: Vec<u8>,
    pub verify_token: Vec<u8>,
}

impl ProtoEncode for EncryptionKeyRequest {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_string(buf, &self.server_id);
        write_byte_array(buf, &self.public_key);
        write_byte_array(buf, &self.verify_token);
    }
}

impl ProtoDecode for EncryptionKeyRequest {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            server_id: read_string(r).await?,
            public_key: read_byte_array(r).await?,
            verify_token: read_byte_array(r).await?,
        })
    }
}

/// Encryption key response (0xFC).
///
/// Client-bound it is the server's acknowledgement (normally two empty
/// arrays). Server-bound it carries the RSA-encrypted shared secret and
/// verify token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncryptionKeyResponse {
    pub shared_secret: Vec<u8>,
    pub verify_token: Vec<u8>,
}

impl ProtoEncode for EncryptionKeyResponse {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        write_byte_array(buf, &self.shared_secret);
        write_byte_array(buf, &self.verify_token);
    }
}

impl ProtoDecode for EncryptionKeyResponse {
    async fn proto_decode<R>(r: &mut R) -> Result<Self, ProtoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Self {
            shared_secret: read_byte_array(r).await?,
            verify_token: read_byte_array(r).await?,
        })
    }
}

/// Client status (0xCD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    /// Ready to log in after the key exchange.
    InitialSpawn,
    /// Respawn after death.
    Respawn,
}

impl ProtoEncode for ClientStatus {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i8(match self {
            ClientStatus::InitialSpawn => 0,
            ClientStatus::Respawn => 1,
        });
    }
}
