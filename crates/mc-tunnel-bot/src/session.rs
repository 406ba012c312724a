//! Handshake and session state machine.
//!
//! ```text
//! Disconnected -> Handshaking -> AwaitingKeyExchange -> LoggingIn -> Ready <-> Dead
//!                                                                      |
//!                                             any state -> Disconnected
//! ```
//!
//! The receive task owns the [`Session`]: it reads one packet at a time and
//! applies it to the shared tunnel state, answering the server where the
//! protocol requires it before the next packet is read.

use std::io;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::task::{ready, Context, Poll};

use mc_tunnel_crypto::{CryptoError, KeyExchange, StreamDecryptor};
use mc_tunnel_proto::packets::{
    decode_packet, id, ClientStatus, ClientboundPacket, EncryptionKeyRequest,
    EncryptionKeyResponse, PlayerPositionLook,
};
use tokio::io::{AsyncRead, AsyncReadExt, BufReader, ReadBuf};
use tracing::{debug, info};

use crate::connector::BoxedReader;
use crate::error::{TunnelError, TunnelExit};
use crate::tunnel::Shared;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    /// Handshake sent, waiting for the server's key request.
    Handshaking,
    /// Encrypted shared secret sent, waiting for the server's acknowledgement.
    AwaitingKeyExchange,
    /// Encryption is on and login was requested; waiting for the first position.
    LoggingIn,
    Ready,
    /// Health dropped to zero; a respawn was requested.
    Dead,
}

impl SessionState {
    pub fn is_ready(self) -> bool {
        self == SessionState::Ready
    }
}

/// Inbound half of a connection.
///
/// Bytes are decrypted as they leave the buffer, so anything the buffer
/// already holds when encryption is switched on is still decrypted.
pub struct PacketReader {
    inner: BufReader<BoxedReader>,
    decryptor: Option<StreamDecryptor>,
}

impl PacketReader {
    pub fn new(inner: BoxedReader) -> Self {
        Self {
            inner: BufReader::new(inner),
            decryptor: None,
        }
    }

    pub fn enable_decryption(&mut self, decryptor: StreamDecryptor) {
        self.decryptor = Some(decryptor);
    }
}

impl AsyncRead for PacketReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        if let Some(decryptor) = this.decryptor.as_mut() {
            decryptor.decrypt(&mut buf.filled_mut()[before..]);
        }
        Poll::Ready(Ok(()))
    }
}

/// Per-connection protocol state owned by the receive task.
pub struct Session {
    reader: PacketReader,
    keys: Option<KeyExchange>,
    last_packet: Option<u8>,
}

impl Session {
    pub fn new(reader: BoxedReader) -> Self {
        Self {
            reader: PacketReader::new(reader),
            keys: None,
            last_packet: None,
        }
    }

    /// Read the next packet.
    ///
    /// A clean end of stream before the id byte is [`TunnelError::ConnectionClosed`];
    /// one inside a packet body is a decode error.
    pub async fn next_packet(&mut self) -> Result<ClientboundPacket, TunnelError> {
        let packet_id = match self.reader.read_u8().await {
            Ok(packet_id) => packet_id,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(TunnelError::ConnectionClosed)
            }
            Err(e) => return Err(TunnelError::Transport(e)),
        };
        Ok(decode_packet(packet_id, &mut self.reader, self.last_packet).await?)
    }

    /// Apply one packet. Returns an exit when the server ended the session.
    pub async fn handle(
        &mut self,
        shared: &Shared,
        packet: ClientboundPacket,
    ) -> Result<Option<TunnelExit>, TunnelError> {
        let packet_id = packet.id();
        match packet {
            ClientboundPacket::KeepAlive(keep_alive) => {
                shared
                    .writer
                    .lock()
                    .await
                    .send(id::KEEP_ALIVE, &keep_alive)
                    .await?;
            }
            ClientboundPacket::LoginRequest(login) => {
                // Fails when an earlier login already set the id; that one is kept.
                shared
                    .entity_id
                    .compare_exchange(0, login.entity_id, Ordering::AcqRel, Ordering::Acquire)
                    .ok();
                shared.with_position(|p| p.dimension = login.dimension);
                debug!("Logged in as entity {} in {}", login.entity_id, login.dimension);
            }
            ClientboundPacket::UpdateHealth(update) => {
                shared.with_position(|p| p.health = update.health);
                if update.health <= 0.0 {
                    shared.set_state(SessionState::Dead);
                    shared
                        .writer
                        .lock()
                        .await
                        .send(id::CLIENT_STATUS, &ClientStatus::Respawn)
                        .await?;
                }
            }
            ClientboundPacket::Respawn(respawn) => {
                shared.with_position(|p| p.dimension = respawn.dimension);
            }
            ClientboundPacket::PlayerPosition(update) => {
                shared.with_position(|p| p.apply_position(&update));
            }
            ClientboundPacket::PlayerPositionLook(update) => {
                let echo = shared.with_position(|p| {
                    p.apply_position_look(&update);
                    p.to_packet()
                });
                if !shared.state().is_ready() {
                    send_position(shared, &echo).await?;
                    if shared.state() != SessionState::Dead {
                        info!("Bot {} ready", shared.name);
                    }
                    shared.set_state(SessionState::Ready);
                }
            }
            ClientboundPacket::EncryptionKeyRequest(request) => {
                self.request_encryption(shared, &request).await?;
            }
            ClientboundPacket::EncryptionKeyResponse(_) => {
                self.enable_encryption(shared).await?;
            }
            ClientboundPacket::Disconnect(disconnect) => {
                return Ok(Some(TunnelExit::Kicked(disconnect.reason)));
            }
            ClientboundPacket::Ignored(_) => {}
        }
        self.last_packet = Some(packet_id);
        Ok(None)
    }

    async fn request_encryption(
        &mut self,
        shared: &Shared,
        request: &EncryptionKeyRequest,
    ) -> Result<(), TunnelError> {
        debug!("Key request from server {:?}", request.server_id);
        let keys = KeyExchange::new(&request.public_key, &request.verify_token)?;
        let response = EncryptionKeyResponse {
            shared_secret: keys.encrypted_secret()?,
            verify_token: keys.encrypted_verify_token()?,
        };
        self.keys = Some(keys);
        shared.set_state(SessionState::AwaitingKeyExchange);
        shared
            .writer
            .lock()
            .await
            .send(id::ENCRYPTION_KEY_RESPONSE, &response)
            .await?;
        Ok(())
    }

    async fn enable_encryption(&mut self, shared: &Shared) -> Result<(), TunnelError> {
        let keys = self.keys.take().ok_or(CryptoError::MissingKeyRequest)?;
        let (encryptor, decryptor) = keys.ciphers();
        self.reader.enable_decryption(decryptor);
        {
            let mut writer = shared.writer.lock().await;
            writer.enable_encryption(encryptor);
            writer
                .send(id::CLIENT_STATUS, &ClientStatus::InitialSpawn)
                .await?;
        }
        debug!("Encryption enabled");
        shared.set_state(SessionState::LoggingIn);
        Ok(())
    }
}

/// Report the current position with a server-bound 0x0D.
pub(crate) async fn send_position(
    shared: &Shared,
    position: &PlayerPositionLook,
) -> Result<(), TunnelError> {
    shared
        .writer
        .lock()
        .await
        .send_with(id::PLAYER_POSITION_LOOK, |buf| {
            position.encode_serverbound(buf)
        })
        .await?;
    Ok(())
}
